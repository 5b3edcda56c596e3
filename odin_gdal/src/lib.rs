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

pub mod errors;
pub mod geometry;
pub mod polygonize;
pub mod warp;

use gdal::{errors::CplErrType, Metadata};
use lazy_static::lazy_static;
use static_init::{constructor};
use std::{collections::HashMap, ffi::{CStr, c_char}, path::Path};
use tracing::debug;

// we re-export these so that other crates don't have to use a direct gdal depedency to import.
// this is to ensure we run bindgen for new GDAL versions that don't yet have pre-computed bindings in gdal-sys
pub use gdal::{self, Driver, DriverManager, Dataset, errors::GdalError, GeoTransform, GeoTransformEx, cpl::CslStringList};
pub use gdal::raster::{GdalType, GdalDataType, RasterBand, Buffer, ColorInterpretation};
pub use gdal::spatial_ref::{CoordTransform, CoordTransformOptions, SpatialRef};

use gdal_sys::{self, CPLErr, OSRAxisMappingStrategy};

use crate::errors::{Result, misc_error, invalid_srs, last_gdal_error, OdinGdalError};


lazy_static! {
    // note that we can't automatically populate this by iterating over DriverManager since some
    // drivers use the same file extension
    static ref EXT_MAP: HashMap<&'static str, &'static str> = HashMap::from( [ // file extension -> driver short name
        ("tif", "GTiff"),
        ("tiff", "GTiff"),
        ("vrt", "VRT"),
        ("png", "PNG"),
        ("jpg", "JPEG"),

        ("json", "GeoJSON"),
        ("geojson", "GeoJSON"),
        ("shp", "ESRI Shapefile"),
    ]);
}

#[constructor(0)]
extern "C" fn _initialize_gdal() {
    gdal::config::set_error_handler(trace_gdal_error);
}

// GDAL reports recoverable problems through its error channel. Results are checked explicitly, so
// we only keep a debug trace instead of letting GDAL print to stderr
fn trace_gdal_error (cpl_et: CplErrType, ec: i32, msg: &str) {
    debug!("GDAL {:?} ({}): {}", cpl_et, ec, msg);
}

/// case insensitive lookup of the GDAL driver short name for the extension of `filename`
pub fn get_driver_name_from_filename (filename: impl AsRef<Path>) -> Option<&'static str> {
    filename.as_ref().extension()
        .and_then( |ext| ext.to_str())
        .and_then( |ext| get_driver_name_for_extension( ext.to_ascii_lowercase().as_str()))
}

/// Note that filename extension has to be lowercase
pub fn get_driver_name_for_extension (ext: &str) -> Option<&'static str> {
    EXT_MAP.get( ext).map(|v| &**v)
}

pub fn pc_char_to_string (pc_char: *const c_char) -> String {
    if pc_char.is_null() { return String::new() }
    let cstr = unsafe { CStr::from_ptr(pc_char) };
    String::from_utf8_lossy(cstr.to_bytes()).to_string()
}

pub fn ok_ce_none (res: CPLErr::Type) -> Result<()> {
    if res == CPLErr::CE_None { Ok(()) } else { Err(last_gdal_error()) }
}

pub fn to_csl_string_list (strings: &[String]) -> Result<CslStringList> {
    let mut csl = CslStringList::new();
    for s in strings {
        csl.add_string(s.as_str())?;
    }
    Ok(csl)
}

/// check if the driver for `name` is registered and has the given capability (e.g. "DCAP_VECTOR")
pub fn driver_has_capability (name: &str, capability: &str) -> bool {
    match DriverManager::get_driver_by_name(name) {
        Ok(driver) => driver.metadata_item( capability, "").map( |v| v.eq_ignore_ascii_case("YES")).unwrap_or(false),
        Err(_) => false
    }
}

/* #region geo transforms *****************************************************************************************/

pub fn new_geotransform (x_upper_left: f64, x_resolution: f64, row_rotation: f64,
                         y_upper_left: f64, col_rotation: f64, y_resolution: f64) -> GeoTransform {
    [x_upper_left,x_resolution,row_rotation,y_upper_left,col_rotation,y_resolution]
}

/// the transform of a raster window with upper left pixel (x_off,y_off) - this is the parent transform
/// with its origin moved to the window origin
pub fn window_geotransform (gt: &GeoTransform, x_off: usize, y_off: usize) -> GeoTransform {
    let (x,y) = (x_off as f64, y_off as f64);
    new_geotransform( gt[0] + x*gt[1] + y*gt[2], gt[1], gt[2],
                      gt[3] + x*gt[4] + y*gt[5], gt[4], gt[5])
}

/// area covered by a single pixel in units of the raster SRS
pub fn pixel_area (gt: &GeoTransform) -> f64 {
    (gt[1]*gt[5] - gt[2]*gt[4]).abs()
}

/* #endregion geo transforms */

/* #region SpatialRef based coordinate transformations ************************************************************/

/// switch to (lon,lat) / (easting,northing) axis order regardless of the authority definition, so that
/// x always refers to the easting/longitude axis
pub fn with_gis_axis_order (srs: SpatialRef) -> SpatialRef {
    unsafe { gdal_sys::OSRSetAxisMappingStrategy( srs.to_c_hsrs(), OSRAxisMappingStrategy::OAMS_TRADITIONAL_GIS_ORDER); }
    srs
}

/// resolve a SRS from anything GDAL accepts as user input (WKT, "EPSG:nnnn", PROJ strings..)
pub fn srs_from_definition (def: &str) -> Result<SpatialRef> {
    let def = def.trim();
    if def.is_empty() { return Err( invalid_srs("empty SRS definition")) }

    SpatialRef::from_definition(def)
        .map( with_gis_axis_order)
        .map_err( |e| invalid_srs( format!("cannot resolve '{def}': {e}")))
}

/// EPSG:4326 in (lon,lat) order
pub fn srs_lon_lat () -> Result<SpatialRef> {
    Ok( with_gis_axis_order( SpatialRef::from_epsg(4326)?) )
}

pub fn srs_utm_n (zone: u32) -> Result<SpatialRef> {
    Ok( with_gis_axis_order( SpatialRef::from_epsg(32600 + zone)?) )
}

pub fn srs_utm_s (zone: u32) -> Result<SpatialRef> {
    Ok( with_gis_axis_order( SpatialRef::from_epsg(32700 + zone)?) )
}

/// the plain 6 degree UTM zone for a longitude, without the Norway/Svalbard exceptions
pub fn naive_utm_zone (lon_deg: f64) -> u32 {
    (((lon_deg + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u32 + 1
}

/// get the UTM SpatialRef (and zone) for a given geographic position. Hemisphere is determined by latitude
pub fn srs_utm_from_lon_lat (lon_deg: f64, lat_deg: f64, opt_zone: Option<u32>) -> Result<(SpatialRef,u32)> {
    if !lon_deg.is_finite() || !lat_deg.is_finite() {
        return Err( misc_error( format!("invalid position for UTM zone: {lon_deg},{lat_deg}")))
    }

    let zone = if let Some(zone) = opt_zone {
        if zone >= 1 && zone <= 60 { zone } else {
            return Err( misc_error( format!("invalid UTM zone: {}", zone)))
        }
    } else {
        naive_utm_zone( lon_deg)
    };

    let srs = if lat_deg < 0.0 { srs_utm_s( zone)? } else { srs_utm_n( zone)? };
    Ok( (srs,zone) )
}

/// transformation between two SpatialRefs. If `exact` is set we do not allow PROJ to fall back
/// to ballpark transformations (e.g. ignoring datum shifts)
pub fn coord_transform (s_srs: &SpatialRef, t_srs: &SpatialRef, exact: bool) -> Result<CoordTransform> {
    if exact {
        let mut ct_options = CoordTransformOptions::new()?;
        ct_options.desired_accuracy( 0.0);
        ct_options.set_ballpark_allowed(false);
        Ok( CoordTransform::new_with_options( s_srs, t_srs, &ct_options)? )
    } else {
        Ok( CoordTransform::new( s_srs, t_srs)? )
    }
}

pub fn transform_point_2d (transform: &CoordTransform, x: f64, y: f64) -> Result<(f64,f64)> {
    let mut ax: [f64;1] = [x];
    let mut ay: [f64;1] = [y];
    let mut az: [f64;0] = [];

    transform.transform_coords(&mut ax, &mut ay, &mut az)?;
    Ok((ax[0],ay[0]))
}

/// in-place transformation of coordinate arrays
pub fn transform_coords_2d (transform: &CoordTransform, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
    if xs.len() != ys.len() { return Err( misc_error("coordinate arrays of different length")) }
    if xs.is_empty() { return Ok(()) }

    let mut zs: [f64;0] = [];
    transform.transform_coords( xs, ys, &mut zs)?;

    if xs.iter().chain( ys.iter()).all( |v| v.is_finite()) {
        Ok(())
    } else {
        Err( misc_error("coordinate transformation produced non-finite values"))
    }
}

/* #endregion SpatialRef based coordinate transformations */

/* #region generic Dataset/Rasterband access **********************************************************************/

/// the raster metadata we need to carry around once the Dataset is closed
#[derive(Debug,Clone)]
pub struct RasterInfo {
    pub cols: usize,
    pub rows: usize,
    pub n_bands: usize,
    pub geo_transform: GeoTransform,
    pub srs_wkt: Option<String>,
}

impl RasterInfo {
    pub fn window_transform (&self, x_off: usize, y_off: usize) -> GeoTransform {
        window_geotransform( &self.geo_transform, x_off, y_off)
    }
}

pub fn get_raster_info (ds: &Dataset) -> Result<RasterInfo> {
    let (cols,rows) = ds.raster_size();
    let n_bands = ds.raster_count();
    let geo_transform = ds.geo_transform()?;
    let srs_wkt = ds.spatial_ref().ok().and_then( |srs| srs.to_wkt().ok()).filter( |wkt| !wkt.is_empty());

    Ok( RasterInfo { cols, rows, n_bands, geo_transform, srs_wkt } )
}

/// 1-based index of the first band that is flagged as alpha channel
pub fn find_alpha_band (ds: &Dataset) -> Option<usize> {
    for band_index in 1..=ds.raster_count() {
        if let Ok(band) = ds.rasterband( band_index) {
            if band.color_interpretation() == ColorInterpretation::AlphaBand {
                return Some(band_index)
            }
        }
    }
    None
}

/// true if the mask of the first band is derived from an alpha band (GMF_ALPHA). GDAL uses the last band in this case
pub fn has_alpha_mask (ds: &Dataset) -> bool {
    ds.rasterband(1).ok()
        .and_then( |band| band.mask_flags().ok())
        .map( |flags| flags.is_alpha())
        .unwrap_or(false)
}

/// true for 4 band rasters with red, green, blue color bands and a fourth band that is not a color channel
pub fn is_rgba_layout (ds: &Dataset) -> bool {
    use ColorInterpretation::*;

    if ds.raster_count() != 4 { return false }
    let interps: Vec<ColorInterpretation> = (1..=4)
        .filter_map( |i| ds.rasterband(i).ok())
        .map( |band| band.color_interpretation())
        .collect();

    matches!( interps.as_slice(), [RedBand, GreenBand, BlueBand, Undefined | AlphaBand])
}

/// read a rectangular window of a band (in row major order). GDAL converts to `T` if the band type differs
pub fn read_window <T: Copy + Default + GdalType> (band: &RasterBand, x_off: usize, y_off: usize, width: usize, height: usize) -> Result<Vec<T>> {
    let mut buf: Vec<T> = vec![T::default(); width * height];
    band.read_into_slice( (x_off as isize, y_off as isize), (width,height), (width,height), &mut buf, None)?;
    Ok(buf)
}

pub fn read_pixel (band: &RasterBand, x: usize, y: usize) -> Result<f64> {
    let mut data = [0.0f64;1];
    band.read_into_slice( (x as isize, y as isize), (1,1), (1,1), &mut data, None)?;
    Ok(data[0])
}

/// create an in-memory raster dataset
pub fn create_mem_dataset <T: GdalType> (width: usize, height: usize, n_bands: usize) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name("MEM")?;
    Ok( driver.create_with_band_type::<T,_>( "", width, height, n_bands)? )
}

/// create an in-memory vector dataset. GDAL 3.11 merged the "Memory" vector driver into MEM, older
/// versions only have vector support in "Memory"
pub fn create_mem_vector_dataset () -> Result<Dataset> {
    for name in ["Memory", "MEM"] {
        if driver_has_capability( name, "DCAP_VECTOR") {
            let driver = DriverManager::get_driver_by_name(name)?;
            return Ok( driver.create_vector_only("")? )
        }
    }
    Err( misc_error("no in-memory vector driver available"))
}

/* #endregion generic Dataset/Rasterband access */
