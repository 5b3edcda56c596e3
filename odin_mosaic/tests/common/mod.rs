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

//! synthetic orthomosaics for tests

use std::path::Path;
use odin_gdal::{DriverManager, Buffer, SpatialRef, ColorInterpretation, CslStringList, GeoTransform};

/// 1m pixels with the upper left corner at (500000,4000048) in UTM zone 18N
pub fn utm_geotransform () -> GeoTransform {
    [500000.0, 1.0, 0.0, 4000048.0, 0.0, -1.0]
}

/// create a RGBA GeoTIFF with constant color and the given alpha values
pub fn create_rgba_tif <F> (path: &Path, cols: usize, rows: usize, gt: GeoTransform, epsg: u32, alpha: F)
    where F: Fn(usize,usize)->u8
{
    create_rgb4_tif( path, cols, rows, gt, epsg, true, alpha)
}

/// create a RGB GeoTIFF with a fourth band that has no color interpretation (unspecified extra sample)
pub fn create_rgb_extra_tif <F> (path: &Path, cols: usize, rows: usize, gt: GeoTransform, epsg: u32, alpha: F)
    where F: Fn(usize,usize)->u8
{
    create_rgb4_tif( path, cols, rows, gt, epsg, false, alpha)
}

fn create_rgb4_tif <F> (path: &Path, cols: usize, rows: usize, gt: GeoTransform, epsg: u32, flag_alpha: bool, alpha: F)
    where F: Fn(usize,usize)->u8
{
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut co = CslStringList::new();
    co.add_string("PHOTOMETRIC=RGB").unwrap();
    if flag_alpha { co.add_string("ALPHA=YES").unwrap(); }

    let mut ds = driver.create_with_band_type_with_options::<u8,_>( path, cols, rows, 4, &co).unwrap();
    ds.set_geo_transform( &gt).unwrap();
    ds.set_spatial_ref( &SpatialRef::from_epsg(epsg).unwrap()).unwrap();

    for b in 1..=3 {
        let mut band = ds.rasterband(b).unwrap();
        let mut buf = Buffer::new( (cols,rows), vec![100u8 + b as u8; cols*rows]);
        band.write( (0,0), (cols,rows), &mut buf).unwrap();
    }

    let mut data = Vec::with_capacity( cols*rows);
    for y in 0..rows {
        for x in 0..cols { data.push( alpha(x,y)); }
    }
    let mut band = ds.rasterband(4).unwrap();
    if flag_alpha { band.set_color_interpretation( ColorInterpretation::AlphaBand).unwrap(); }
    let mut buf = Buffer::new( (cols,rows), data);
    band.write( (0,0), (cols,rows), &mut buf).unwrap();
}

/// create a 3 band GeoTIFF without alpha where `valid` pixels get a color and all others are 0 (nodata)
pub fn create_rgb_nodata_tif <F> (path: &Path, cols: usize, rows: usize, gt: GeoTransform, epsg: u32, set_nodata: bool, valid: F)
    where F: Fn(usize,usize)->bool
{
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut ds = driver.create_with_band_type::<u8,_>( path, cols, rows, 3).unwrap();
    ds.set_geo_transform( &gt).unwrap();
    ds.set_spatial_ref( &SpatialRef::from_epsg(epsg).unwrap()).unwrap();

    for b in 1..=3 {
        let mut data = Vec::with_capacity( cols*rows);
        for y in 0..rows {
            for x in 0..cols { data.push( if valid(x,y) { 50u8 * b as u8 } else { 0 }); }
        }
        let mut band = ds.rasterband(b).unwrap();
        if set_nodata { band.set_no_data_value( Some(0.0)).unwrap(); }
        let mut buf = Buffer::new( (cols,rows), data);
        band.write( (0,0), (cols,rows), &mut buf).unwrap();
    }
}
