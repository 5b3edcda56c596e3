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

//! geographic cutline files and the cutline based COG crop

use std::{fs, path::{Path, PathBuf}};
use geo::{MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use tempfile::TempPath;
use tracing::{info, warn};
use odin_gdal::{warp::CutlineWarpBuilder, geometry::collect_polygons};

use crate::Region;
use crate::crs::{CrsContext, reproject};
use crate::geometry::{ensure_valid, largest_polygon};
use crate::errors::{OdinMosaicError, Result, Stage, degenerate, op_failed};

/// output settings of the crop warp
#[derive(Debug,Clone)]
pub struct CropOptions {
    pub block_size: usize,
    pub threads: usize,
    pub warp_memory: Option<String>,
    pub gdalwarp_cmd: String,
    /// add an alpha band to the output (set if the source validity comes from alpha)
    pub dst_alpha: bool,
    /// where to put the temporary cutline file (system temp dir if not set)
    pub cutline_dir: Option<PathBuf>,
}

/// the single lon/lat polygon used as cutline for `region`. Multipolygons are reduced to their largest part
pub fn cutline_polygon (region: &Region, crs: &CrsContext) -> Result<Polygon<f64>> {
    let geographic = reproject( region, crs, &CrsContext::wgs84(), Stage::Cutline)?;
    let geographic = ensure_valid( geographic, Stage::Cutline)?;
    largest_polygon( &geographic).cloned().ok_or_else( || degenerate( Stage::Cutline, "no cutline polygon"))
}

fn boundary_json (polygon: &Polygon<f64>) -> Result<String> {
    let feature = Feature {
        bbox: None,
        geometry: Some( geojson::Geometry::new( geojson::Value::from(polygon))),
        id: None,
        properties: Some( JsonObject::new()),
        foreign_members: None,
    };
    let fc = FeatureCollection { bbox: None, features: vec![feature], foreign_members: None };
    Ok( serde_json::to_string( &fc)? )
}

/// write a single feature GeoJSON boundary file
pub fn write_boundary_file (polygon: &Polygon<f64>, path: impl AsRef<Path>) -> Result<()> {
    fs::write( path, boundary_json(polygon)?)?;
    Ok(())
}

/// write `polygon` (lon/lat) into a uniquely named temporary GeoJSON file that is removed when the returned path is dropped.
/// The file is created in `dir` or the system temp dir
pub fn write_cutline (polygon: &Polygon<f64>, dir: Option<&Path>) -> Result<TempPath> {
    let json = boundary_json(polygon)?;
    let mut builder = tempfile::Builder::new();
    builder.prefix("odin_mosaic_cutline_").suffix(".geojson");
    let file = match dir {
        Some(dir) => builder.tempfile_in( dir)?,
        None => builder.tempfile()?
    };
    fs::write( file.path(), json)?;
    Ok( file.into_temp_path() )
}

/// read the polygonal content of a GeoJSON file (lon/lat)
pub fn read_boundary_file (path: impl AsRef<Path>) -> Result<Region> {
    let gj: GeoJson = fs::read_to_string( path.as_ref())?.parse()?;
    let collection = geojson::quick_collection( &gj)?;

    let mut polygons = Vec::new();
    for g in collection.0 {
        collect_polygons( g, &mut polygons);
    }
    if polygons.is_empty() {
        return Err( degenerate( Stage::Cutline, format!("no polygon in {}", path.as_ref().display())))
    }
    Ok( MultiPolygon(polygons) )
}

fn remove_partial_output (path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("failed to remove partial output {}: {}", path.display(), e);
        }
    }
}

pub fn crop_warp (src: &Path, tgt: &Path, cutline: &Path, opts: &CropOptions) -> Result<CutlineWarpBuilder> {
    let mut warp = CutlineWarpBuilder::new( src, tgt);
    warp.set_tgt_format("COG")?
        .set_cutline( cutline)
        .set_crop_to_cutline(true)
        .set_overwrite(true)
        .set_multithread(true)
        .set_dst_alpha( opts.dst_alpha)
        .set_warp_memory( opts.warp_memory.clone())
        .add_create_option( "BIGTIFF", "YES")
        .add_create_option( "COMPRESS", "DEFLATE")
        .add_create_option( "BLOCKSIZE", opts.block_size)
        .add_create_option( "NUM_THREADS", opts.threads)
        .add_warp_option( "OPTIMIZE_SIZE", "TRUE")
        .add_warp_option( "NUM_THREADS", opts.threads);
    Ok(warp)
}

/// crop the raster at `src` to the `region` (given in `crs`) and write a COG to `tgt`. If the in-process warp
/// fails we try the external gdalwarp command once. No partial output is left if both fail
pub fn crop_to_cutline (src: &Path, tgt: &Path, region: &Region, crs: &CrsContext, opts: &CropOptions) -> Result<()> {
    let polygon = cutline_polygon( region, crs)?;
    let cutline = write_cutline( &polygon, opts.cutline_dir.as_deref()).map_err( |e| e.at( Stage::Cutline))?;

    let warp = crop_warp( src, tgt, &cutline, opts).map_err( |e| e.at( Stage::Crop))?;
    info!("cropping {} -> {}", src.display(), tgt.display());

    let res = match warp.exec() {
        Ok(()) => Ok(()),
        Err(primary) => {
            remove_partial_output( tgt);
            warn!("GDALWarp failed: {}, falling back to {}", primary, opts.gdalwarp_cmd);

            match warp.exec_cli( &opts.gdalwarp_cmd) {
                Ok(()) => Ok(()),
                Err(fallback) => {
                    remove_partial_output( tgt);
                    Err( OdinMosaicError::CropFailed { primary: primary.to_string(), fallback: fallback.to_string() })
                }
            }
        }
    };

    if let Err(e) = cutline.close() {
        warn!("failed to remove cutline file: {}", e);
    }
    res
}
