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
#[macro_use]
extern crate lazy_static;

use std::path::{Path, PathBuf};
use clap::Parser;
use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;
use odin_gdal::get_driver_name_from_filename;
use odin_mosaic::{MosaicConfig, AreaThreshold, crop_mosaic, default_output_path};

/// clap command line arguments
#[derive(Parser,Debug)]
#[command(version, about = "crop_mosaic - crop orthomosaic to the convex hull of its inward buffered valid region")]
struct CliOpts {
    /// input orthomosaic raster
    #[arg(long = "mosaic_image", alias = "mosaic-image")]
    mosaic_image: PathBuf,

    /// inward buffer distance as percent of the ROI area (0.005 means 0.005%)
    #[arg(long = "threshold_area", alias = "threshold-area", allow_hyphen_values = true)]
    threshold_area: f64,

    /// output COG (*.tif, default is <input>_cropped.<ext>)
    #[arg(long = "raster_output", alias = "raster-output")]
    raster_output: Option<PathBuf>,

    /// optional RON config file with pipeline settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// skip the refinement pass
    #[arg(long)]
    single_pass: bool,

    /// number of worker threads (default is 80% of cores)
    #[arg(long)]
    workers: Option<usize>,

    /// edge length of extraction tiles in pixels
    #[arg(long)]
    tile_size: Option<usize>,
}

lazy_static! {
    static ref ARGS: CliOpts = CliOpts::parse();
}

fn check_output (output: &Path) -> Result<()> {
    if get_driver_name_from_filename( output) != Some("GTiff") {
        bail!("output has to be a *.tif or *.tiff file: {}", output.display())
    }
    let dir = output.parent().filter( |p| !p.as_os_str().is_empty()).unwrap_or( Path::new("."));
    if !dir.is_dir() {
        bail!("output directory does not exist: {}", dir.display())
    }
    Ok(())
}

fn main () -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"))) // use RUST_LOG to override
        .init();

    let input = ARGS.mosaic_image.as_path();
    if !input.is_file() {
        bail!("input raster not found: {}", input.display())
    }

    let output = ARGS.raster_output.clone().unwrap_or_else( || default_output_path( input));
    check_output( &output)?;

    let mut config = match &ARGS.config {
        Some(path) => MosaicConfig::load( path)?,
        None => MosaicConfig::default()
    };
    if ARGS.single_pass { config.two_pass = false }
    if let Some(workers) = ARGS.workers { config.workers = workers }
    if let Some(tile_size) = ARGS.tile_size { config.tile_size = tile_size }
    config.validate()?;

    let threshold = AreaThreshold::new( ARGS.threshold_area, config.max_threshold)?;
    let report = crop_mosaic( input, &output, threshold, &config)?;

    for (i,pass) in report.passes.iter().enumerate() {
        println!("pass {}: ROI area {:.2}, cropped area {:.2}", i+1, pass.roi_area, pass.cropped_area);
    }
    println!("cropped mosaic at {}", report.output.display());
    Ok(())
}
