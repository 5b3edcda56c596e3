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

use std::{fs, path::Path, thread::available_parallelism};
use serde::{Deserialize, Serialize};
use crate::errors::{Result, config_error};

/// tunables of the cropping pipeline. All fields have defaults so that config files only need to
/// specify what they change, e.g.
/// ```ron
/// MosaicConfig( tile_size: 1024, warp_memory: Some("25%") )
/// ```
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct MosaicConfig {
    /// edge length in pixels of the extraction tiles
    pub tile_size: usize,

    /// COG block size in pixels, has to be a multiple of 16
    pub cog_block_size: usize,

    /// percent-of-area threshold for the second (refinement) pass
    pub refine_threshold: f64,

    pub two_pass: bool,

    /// fill interior holes of the extracted ROI
    pub close_holes: bool,

    /// segments per quarter circle for buffer arcs
    pub buffer_quad_segs: u32,

    /// extraction worker threads, also used for warp and COG compression threads
    pub workers: usize,

    /// upper bound for accepted thresholds (percent)
    pub max_threshold: f64,

    /// external command for the fallback crop
    pub gdalwarp_cmd: String,

    /// optional "-wm" value for warping (MB or percentage of RAM)
    pub warp_memory: Option<String>,
}

/// 80% of the available cores, but at least one
pub fn default_workers () -> usize {
    let cores = available_parallelism().map( |n| n.get()).unwrap_or(1);
    ((cores as f64) - 0.2 * (cores as f64)).floor().max(1.0) as usize
}

impl Default for MosaicConfig {
    fn default () -> Self {
        MosaicConfig {
            tile_size: 2048,
            cog_block_size: 512,
            refine_threshold: 0.001,
            two_pass: true,
            close_holes: false,
            buffer_quad_segs: 8,
            workers: default_workers(),
            max_threshold: 100.0,
            gdalwarp_cmd: "gdalwarp".to_string(),
            warp_memory: None,
        }
    }
}

impl MosaicConfig {
    pub fn from_ron_str (s: &str) -> Result<Self> {
        let config: MosaicConfig = ron::from_str(s).map_err( |e| config_error( format!("{e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load (path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err( config_error( format!("config file not found: {}", path.display())))
        }
        let contents = fs::read_to_string(path)?;
        MosaicConfig::from_ron_str( &contents)
    }

    pub fn validate (&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err( config_error("tile_size has to be positive"))
        }
        if self.cog_block_size == 0 || self.cog_block_size % 16 != 0 {
            return Err( config_error( format!("cog_block_size {} is not a positive multiple of 16", self.cog_block_size)))
        }
        if !self.max_threshold.is_finite() || self.max_threshold < 0.0 {
            return Err( config_error( format!("invalid max_threshold {}", self.max_threshold)))
        }
        if !self.refine_threshold.is_finite() || self.refine_threshold < 0.0 || self.refine_threshold > self.max_threshold {
            return Err( config_error( format!("refine_threshold {} outside of [0,{}]", self.refine_threshold, self.max_threshold)))
        }
        if self.workers == 0 {
            return Err( config_error("workers has to be at least 1"))
        }
        if self.buffer_quad_segs == 0 {
            return Err( config_error("buffer_quad_segs has to be at least 1"))
        }
        if self.gdalwarp_cmd.trim().is_empty() {
            return Err( config_error("empty gdalwarp_cmd"))
        }
        Ok(())
    }
}
