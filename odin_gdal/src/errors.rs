/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use thiserror::Error;
use gdal::errors::GdalError;
use gdal_sys::{CPLGetLastErrorMsg, CPLGetLastErrorNo, CPLErrorReset};
use crate::pc_char_to_string;

pub type Result<T> = std::result::Result<T, OdinGdalError>;

#[derive(Error,Debug)]
pub enum OdinGdalError {

    #[error("GDAL error: {0}")]
    Error( #[from] GdalError),

    // last error as reported by CPLGetLastErrorMsg, for direct gdal_sys calls
    #[error("GDAL call failed ({0}): {1}")]
    LastGdalError(i32, String),

    #[error("invalid spatial reference: {0}")]
    InvalidSrs(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("warp failed: {0}")]
    WarpError(String),

    #[error("command failed: {0}")]
    CommandError(String),

    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("C string error: {0}")]
    NulError( #[from] std::ffi::NulError),

    #[error("{0}")]
    MiscError(String)
}

pub fn misc_error (msg: impl ToString)->OdinGdalError {
    OdinGdalError::MiscError(msg.to_string())
}

pub fn invalid_srs (msg: impl ToString)->OdinGdalError {
    OdinGdalError::InvalidSrs(msg.to_string())
}

pub fn invalid_geometry (msg: impl ToString)->OdinGdalError {
    OdinGdalError::InvalidGeometry(msg.to_string())
}

pub fn warp_error (msg: impl ToString)->OdinGdalError {
    OdinGdalError::WarpError(msg.to_string())
}

pub fn command_error (msg: impl ToString)->OdinGdalError {
    OdinGdalError::CommandError(msg.to_string())
}

/// pick up (and reset) the last error of the current thread. Use after gdal_sys calls that
/// signal failure through their return value
pub fn last_gdal_error ()->OdinGdalError {
    unsafe {
        let err_no = CPLGetLastErrorNo();
        let msg = pc_char_to_string( CPLGetLastErrorMsg());
        CPLErrorReset();
        OdinGdalError::LastGdalError( err_no, msg)
    }
}
