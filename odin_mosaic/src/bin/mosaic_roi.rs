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

use std::path::PathBuf;
use clap::Parser;
use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;
use odin_mosaic::{MosaicConfig, AreaThreshold, StageTimer, delimit_roi, shrink_roi, cutline::{cutline_polygon, write_boundary_file}};

/// clap command line arguments
#[derive(Parser,Debug)]
#[command(version, about = "mosaic_roi - write the valid pixel region of an orthomosaic as GeoJSON")]
struct CliOpts {
    /// input orthomosaic raster
    #[arg(long = "mosaic_image", alias = "mosaic-image")]
    mosaic_image: PathBuf,

    /// if set, buffer inward by this percent of the ROI area and take the convex hull
    #[arg(long = "threshold_area", alias = "threshold-area", allow_hyphen_values = true)]
    threshold_area: Option<f64>,

    /// optional RON config file with pipeline settings
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    workers: Option<usize>,

    /// output GeoJSON file
    output: PathBuf,
}

lazy_static! {
    static ref ARGS: CliOpts = CliOpts::parse();
}

fn main () -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    if !ARGS.mosaic_image.is_file() {
        bail!("input raster not found: {}", ARGS.mosaic_image.display())
    }

    let mut config = match &ARGS.config {
        Some(path) => MosaicConfig::load( path)?,
        None => MosaicConfig::default()
    };
    if let Some(workers) = ARGS.workers { config.workers = workers }
    config.validate()?;

    let n_stages = if ARGS.threshold_area.is_some() { 4 } else { 2 };
    let mut timer = StageTimer::new( n_stages);

    let roi = delimit_roi( &ARGS.mosaic_image, &config, &mut timer)?;
    println!("ROI: {} parts, area {:.2}", roi.region.0.len(), roi.area());

    let region = match ARGS.threshold_area {
        Some(percent) => {
            let threshold = AreaThreshold::new( percent, config.max_threshold)?;
            shrink_roi( &roi, threshold, &config, &mut timer)?
        }
        None => roi.region.clone()
    };

    let polygon = cutline_polygon( &region, &roi.crs)?;
    write_boundary_file( &polygon, &ARGS.output)?;
    println!("boundary written to {}", ARGS.output.display());
    Ok(())
}
