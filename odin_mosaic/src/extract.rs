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

//! tile parallel extraction of valid pixel polygons

use std::path::Path;
use geo::Polygon;
use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{debug, info};
use odin_gdal::{Dataset, RasterInfo, get_raster_info, pixel_area, find_alpha_band, has_alpha_mask, is_rgba_layout, read_window, read_pixel, polygonize::polygonize_mask};

use crate::tiles::{TileWindow, tile_windows};
use crate::errors::{OdinMosaicError, Result, Stage, input_error, op_failed};

/// which band(s) decide if a pixel carries data
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum ValiditySource {
    /// valid where alpha > 0
    Alpha { band: usize },

    /// invalid where all of the first `bands` bands equal `nodata`
    NoData { bands: usize, nodata: f64 },
}

impl ValiditySource {
    pub fn detect (ds: &Dataset) -> Result<Self> {
        let n_bands = ds.raster_count();
        if n_bands == 0 {
            return Err( input_error("raster has no bands"))
        }

        if let Some(band) = find_alpha_band(ds) {
            debug!("validity from band {band} (alpha color interpretation)");
            return Ok( ValiditySource::Alpha { band } )
        }

        if n_bands == 4 {
            if has_alpha_mask(ds) {
                debug!("validity from band 4 (alpha mask flags)");
                return Ok( ValiditySource::Alpha { band: 4 } )
            }
            if is_rgba_layout(ds) {
                debug!("validity from band 4 (RGB + extra band layout)");
                return Ok( ValiditySource::Alpha { band: 4 } )
            }
        }

        // no alpha - fall back to a nodata comparison over the color bands. If band 1 has no nodata value
        // we assume the top left corner pixel is outside of the mosaic
        let band = ds.rasterband(1)?;
        let nodata = match band.no_data_value() {
            Some(v) => v,
            None => read_pixel( &band, 0, 0)?
        };
        debug!("no alpha band, validity from nodata {nodata} over {} band(s)", n_bands.min(3));
        Ok( ValiditySource::NoData { bands: n_bands.min(3), nodata } )
    }

    pub fn has_alpha (&self) -> bool {
        matches!( self, ValiditySource::Alpha{..})
    }

    /// the binary (0/1) validity mask for a window
    pub fn read_mask (&self, ds: &Dataset, tile: &TileWindow) -> Result<Vec<u8>> {
        match *self {
            ValiditySource::Alpha { band } => {
                let band = ds.rasterband(band)?;
                let alpha: Vec<f64> = read_window( &band, tile.x_off, tile.y_off, tile.width, tile.height)?;
                Ok( alpha.into_iter().map( |a| (a > 0.0) as u8).collect() )
            }
            ValiditySource::NoData { bands, nodata } => {
                let mut mask = vec![0u8; tile.pixel_count()];
                for i in 1..=bands {
                    let band = ds.rasterband(i)?;
                    let values: Vec<f64> = read_window( &band, tile.x_off, tile.y_off, tile.width, tile.height)?;
                    for (m,v) in mask.iter_mut().zip( values) {
                        if !is_nodata( v, nodata) { *m = 1 }
                    }
                }
                Ok(mask)
            }
        }
    }
}

fn is_nodata (v: f64, nodata: f64) -> bool {
    if nodata.is_nan() { v.is_nan() } else { v == nodata }
}

/// raw extraction result, polygons are in raster (world) coordinates
#[derive(Debug)]
pub struct Extraction {
    pub polygons: Vec<Polygon<f64>>,
    pub info: RasterInfo,
    pub validity: ValiditySource,
    pub n_tiles: usize,
    pub n_valid_tiles: usize,
}

/// polygons of a single tile. Each call opens its own read-only Dataset so that tiles can be processed concurrently
pub fn extract_tile (path: &Path, validity: &ValiditySource, info: &RasterInfo, tile: &TileWindow) -> Result<Vec<Polygon<f64>>> {
    let ds = Dataset::open(path)?;
    let mask = validity.read_mask( &ds, tile)?;
    drop(ds);

    if !mask.iter().any( |m| *m != 0) {
        return Ok( Vec::new())
    }

    let gt = info.window_transform( tile.x_off, tile.y_off);
    Ok( polygonize_mask( mask, tile.width, tile.height, &gt)? )
}

/// extract the polygons of all valid pixels of the raster at `path`, using `workers` threads for `tile_size` windows.
/// Any tile failure fails the whole extraction
pub fn extract_polygons (path: &Path, tile_size: usize, workers: usize) -> Result<Extraction> {
    let (info, validity) = {
        let ds = Dataset::open(path).map_err( |e| input_error( format!("cannot open raster {}: {e}", path.display())))?;
        (get_raster_info( &ds)?, ValiditySource::detect( &ds)?)
    };

    let tiles = tile_windows( info.cols, info.rows, tile_size);
    info!("extracting {}x{} raster in {} tiles on {} workers ({:?})", info.cols, info.rows, tiles.len(), workers, validity);
    debug!("pixel area: {}", pixel_area( &info.geo_transform));

    let pool = ThreadPoolBuilder::new()
        .num_threads( workers.max(1))
        .thread_name( |i| format!("extract-{i}"))
        .build()
        .map_err( |e| op_failed( Stage::Extract, e))?;

    let results: Vec<Vec<Polygon<f64>>> = pool.install( || {
        tiles.par_iter()
            .map( |tile| extract_tile( path, &validity, &info, tile))
            .collect::<Result<Vec<_>>>()
    })?;

    let n_valid_tiles = results.iter().filter( |r| !r.is_empty()).count();
    let polygons: Vec<Polygon<f64>> = results.into_iter().flatten().collect();
    debug!("{} polygons from {} of {} tiles", polygons.len(), n_valid_tiles, tiles.len());

    Ok( Extraction { polygons, info, validity, n_tiles: tiles.len(), n_valid_tiles } )
}
