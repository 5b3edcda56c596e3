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

//! the two-pass crop pipeline

use std::{path::{Path, PathBuf}, time::Instant};
use geo::Area;
use tempfile::TempPath;
use tracing::info;
use odin_gdal::{Dataset, RasterInfo};

use crate::{Region, AreaThreshold, MosaicConfig};
use crate::extract::{ValiditySource, extract_polygons};
use crate::geometry::{merge_polygons, close_holes};
use crate::crs::CrsContext;
use crate::buffer::negative_buffer;
use crate::hull::convex_hull;
use crate::cutline::{CropOptions, crop_to_cutline};
use crate::errors::{OdinMosaicError, Result, Stage, input_error};

/// logs "[i/n] stage" when a stage starts and its elapsed time when it completes. Errors get attributed
/// to the stage they occurred in
pub struct StageTimer {
    n_stages: usize,
    current: usize,
}

impl StageTimer {
    pub fn new (n_stages: usize) -> Self {
        StageTimer { n_stages, current: 0 }
    }

    pub fn run <T,F> (&mut self, stage: Stage, f: F) -> Result<T> where F: FnOnce()->Result<T> {
        self.current += 1;
        info!("[{}/{}] {}", self.current, self.n_stages, stage);

        let t0 = Instant::now();
        let res = f().map_err( |e| e.at(stage));
        match &res {
            Ok(_) => info!("[{}/{}] {} done in {:.2?}", self.current, self.n_stages, stage, t0.elapsed()),
            Err(e) => info!("[{}/{}] {} failed after {:.2?}: {}", self.current, self.n_stages, stage, t0.elapsed(), e),
        }
        res
    }
}

/// the delimited region of interest of a raster
#[derive(Debug,Clone)]
pub struct Roi {
    pub region: Region,
    pub crs: CrsContext,
    pub validity: ValiditySource,
    pub info: RasterInfo,
}

impl Roi {
    /// area in units of the raster CRS
    pub fn area (&self) -> f64 { self.region.unsigned_area() }
}

/// per-pass outcome, mostly used for reporting
#[derive(Debug,Clone)]
pub struct PassReport {
    pub roi_area: f64,
    pub cropped_area: f64,
}

#[derive(Debug,Clone)]
pub struct CropReport {
    pub output: PathBuf,
    pub passes: Vec<PassReport>,
}

/// extract and merge the valid pixel region of the raster at `path`
pub fn delimit_roi (path: &Path, config: &MosaicConfig, timer: &mut StageTimer) -> Result<Roi> {
    let crs = {
        let ds = Dataset::open(path).map_err( |e| input_error( format!("cannot open raster {}: {e}", path.display())))?;
        CrsContext::from_dataset( &ds)?
    };

    let extraction = timer.run( Stage::Extract, || extract_polygons( path, config.tile_size, config.workers))?;
    if extraction.polygons.is_empty() {
        return Err( OdinMosaicError::NoValidPixels( Stage::Extract))
    }

    let region = timer.run( Stage::Merge, || {
        let region = merge_polygons( extraction.polygons)?;
        Ok( if config.close_holes { close_holes( &region) } else { region } )
    })?;

    Ok( Roi { region, crs, validity: extraction.validity, info: extraction.info } )
}

/// buffer and hull a delimited ROI
pub fn shrink_roi (roi: &Roi, threshold: AreaThreshold, config: &MosaicConfig, timer: &mut StageTimer) -> Result<Region> {
    let buffered = timer.run( Stage::Buffer, || negative_buffer( &roi.region, &roi.crs, threshold, config.buffer_quad_segs))?;
    timer.run( Stage::Hull, || convex_hull( &buffered))
}

fn crop_options (config: &MosaicConfig, validity: &ValiditySource) -> CropOptions {
    CropOptions {
        block_size: config.cog_block_size,
        threads: config.workers,
        warp_memory: config.warp_memory.clone(),
        gdalwarp_cmd: config.gdalwarp_cmd.clone(),
        dst_alpha: validity.has_alpha(),
        cutline_dir: None,
    }
}

fn run_pass (src: &Path, tgt: &Path, threshold: AreaThreshold, config: &MosaicConfig, timer: &mut StageTimer) -> Result<PassReport> {
    let roi = delimit_roi( src, config, timer)?;
    let hull = shrink_roi( &roi, threshold, config, timer)?;

    let opts = crop_options( config, &roi.validity);
    timer.run( Stage::Crop, || crop_to_cutline( src, tgt, &hull, &roi.crs, &opts))?;

    Ok( PassReport { roi_area: roi.area(), cropped_area: hull.unsigned_area() } )
}

/// temp path for the intermediate raster of the first pass, next to the final output
fn intermediate_path (output: &Path) -> Result<TempPath> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = tempfile::Builder::new()
        .prefix(".odin_mosaic_pass1_")
        .suffix(".tif")
        .tempfile_in( dir)?;
    Ok( file.into_temp_path() )
}

/// crop the orthomosaic at `input` to the convex hull of its (shrunk) valid region and write the result as COG to `output`.
/// In two-pass mode the first pass writes an intermediate raster that is delimited and cropped again with the (small)
/// refine threshold
pub fn crop_mosaic (input: &Path, output: &Path, threshold: AreaThreshold, config: &MosaicConfig) -> Result<CropReport> {
    config.validate()?;
    if !input.is_file() {
        return Err( input_error( format!("raster not found: {}", input.display())))
    }

    let t0 = Instant::now();
    let mut passes = Vec::new();

    if config.two_pass {
        let refine_threshold = AreaThreshold::new( config.refine_threshold, config.max_threshold)?;
        let mut timer = StageTimer::new( 10);

        let intermediate = intermediate_path( output)?;
        passes.push( run_pass( input, &intermediate, threshold, config, &mut timer)?);
        passes.push( run_pass( &intermediate, output, refine_threshold, config, &mut timer)?);

        if let Err(e) = intermediate.close() {
            tracing::warn!("failed to remove intermediate raster: {}", e);
        }
    } else {
        let mut timer = StageTimer::new( 5);
        passes.push( run_pass( input, output, threshold, config, &mut timer)?);
    }

    info!("cropped {} -> {} in {:.2?}", input.display(), output.display(), t0.elapsed());
    Ok( CropReport { output: output.to_path_buf(), passes } )
}
