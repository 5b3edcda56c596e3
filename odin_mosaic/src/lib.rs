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
#![allow(unused)]

//! cropping of drone orthomosaics to the convex hull of their (inward buffered) valid pixel region

pub mod errors;
pub mod config;
pub mod threshold;
pub mod tiles;
pub mod extract;
pub mod geometry;
pub mod crs;
pub mod buffer;
pub mod hull;
pub mod cutline;
pub mod pipeline;

use std::path::{Path, PathBuf};
use geo::MultiPolygon;

pub use config::MosaicConfig;
pub use threshold::AreaThreshold;
pub use crs::CrsContext;
pub use pipeline::{Roi, CropReport, crop_mosaic, delimit_roi, shrink_roi, StageTimer};
pub use errors::{OdinMosaicError, Result, Stage};

/// a (multi) polygon region. Which CRS it is in is tracked separately by a [`CrsContext`]
pub type Region = MultiPolygon<f64>;

/// "<dir>/<stem>_cropped.<ext>" for a given input path
pub fn default_output_path (input: &Path) -> PathBuf {
    let stem = input.file_stem().map( |s| s.to_string_lossy().to_string()).unwrap_or_else( || "mosaic".to_string());
    let filename = match input.extension() {
        Some(ext) => format!("{}_cropped.{}", stem, ext.to_string_lossy()),
        None => format!("{}_cropped", stem),
    };
    input.with_file_name( filename)
}
