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

use std::fmt;
use thiserror::Error;
use odin_gdal::{GdalError, errors::OdinGdalError};

pub type Result<T> = std::result::Result<T, OdinMosaicError>;

/// the pipeline step an error originated from
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Stage {
    Config,
    Extract,
    Merge,
    Buffer,
    Hull,
    Cutline,
    Crop,
}

impl fmt::Display for Stage {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Extract => "extract",
            Stage::Merge => "merge",
            Stage::Buffer => "buffer",
            Stage::Hull => "hull",
            Stage::Cutline => "cutline",
            Stage::Crop => "crop",
        };
        f.write_str(name)
    }
}

#[derive(Error,Debug)]
pub enum OdinMosaicError {

    #[error("{0}: no valid pixels")]
    NoValidPixels(Stage),

    #[error("{0}: degenerate geometry: {1}")]
    DegenerateGeometry(Stage, String),

    #[error("{0}: CRS error: {1}")]
    CrsError(Stage, String),

    #[error("{0}: reprojection failed: {1}")]
    ReprojectionError(Stage, String),

    #[error("crop failed: primary warp: {primary}, fallback command: {fallback}")]
    CropFailed { primary: String, fallback: String },

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("invalid input: {0}")]
    InputError(String),

    // generic self-created error
    #[error("{0}: mosaic operation failed: {1}")]
    OpFailedError(Stage, String),

    // pass through errors of stages that don't create their own
    #[error("{stage}: {source}")]
    StageError { stage: Stage, #[source] source: Box<OdinMosaicError> },

    #[error("mosaic IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("ODIN gdal error {0}")]
    OdinGdalError( #[from] OdinGdalError),

    #[error("GDAL error {0}")]
    GdalError( #[from] GdalError),

    #[error("GeoJSON error {0}")]
    GeoJsonError( #[from] geojson::Error),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),
}

impl OdinMosaicError {
    /// the stage this error is attributed to, if any
    pub fn stage (&self) -> Option<Stage> {
        use OdinMosaicError::*;
        match self {
            NoValidPixels(stage) | DegenerateGeometry(stage,_) | CrsError(stage,_) |
            ReprojectionError(stage,_) | OpFailedError(stage,_) | StageError{stage,..} => Some(*stage),
            CropFailed{..} => Some(Stage::Crop),
            InvalidThreshold(_) | ConfigError(_) => Some(Stage::Config),
            _ => None
        }
    }

    /// attribute an error to `stage` unless it already names one
    pub fn at (self, stage: Stage) -> Self {
        if self.stage().is_some() { self } else { OdinMosaicError::StageError { stage, source: Box::new(self) } }
    }

    pub fn is_no_valid_pixels (&self) -> bool {
        match self {
            OdinMosaicError::NoValidPixels(_) => true,
            OdinMosaicError::StageError{source,..} => source.is_no_valid_pixels(),
            _ => false
        }
    }

    pub fn is_degenerate (&self) -> bool {
        match self {
            OdinMosaicError::DegenerateGeometry(..) => true,
            OdinMosaicError::StageError{source,..} => source.is_degenerate(),
            _ => false
        }
    }
}

pub fn op_failed (stage: Stage, msg: impl ToString) -> OdinMosaicError {
    OdinMosaicError::OpFailedError( stage, msg.to_string())
}

pub fn degenerate (stage: Stage, msg: impl ToString) -> OdinMosaicError {
    OdinMosaicError::DegenerateGeometry( stage, msg.to_string())
}

pub fn crs_error (stage: Stage, msg: impl ToString) -> OdinMosaicError {
    OdinMosaicError::CrsError( stage, msg.to_string())
}

pub fn reprojection_failed (stage: Stage, msg: impl ToString) -> OdinMosaicError {
    OdinMosaicError::ReprojectionError( stage, msg.to_string())
}

pub fn invalid_threshold (msg: impl ToString) -> OdinMosaicError {
    OdinMosaicError::InvalidThreshold( msg.to_string())
}

pub fn config_error (msg: impl ToString) -> OdinMosaicError {
    OdinMosaicError::ConfigError( msg.to_string())
}

pub fn input_error (msg: impl ToString) -> OdinMosaicError {
    OdinMosaicError::InputError( msg.to_string())
}
