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

mod common;

use geo::Area;
use odin_gdal::Dataset;
use odin_mosaic::{extract::{ValiditySource, extract_polygons}, geometry::merge_polygons};
use common::{create_rgba_tif, create_rgb_extra_tif, create_rgb_nodata_tif, utm_geotransform};

/// run with "cargo test --test test_extract -- --nocapture"

const COLS: usize = 64;
const ROWS: usize = 48;

// a rectangle with a square hole that crosses tile boundaries
fn is_valid_pixel (x: usize, y: usize) -> bool {
    (4..60).contains(&x) && (2..44).contains(&y) && !((20..30).contains(&x) && (10..20).contains(&y))
}

fn n_valid_pixels () -> usize {
    (0..ROWS).flat_map( |y| (0..COLS).map( move |x| (x,y))).filter( |(x,y)| is_valid_pixel(*x,*y)).count()
}

#[test]
fn test_alpha_extraction_area () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ortho.tif");
    create_rgba_tif( &path, COLS, ROWS, utm_geotransform(), 32618, |x,y| if is_valid_pixel(x,y) { 255 } else { 0 });

    let expected = n_valid_pixels() as f64; // 1m² pixels
    assert_eq!( expected, 2252.0);

    for tile_size in [16, 2048] {
        let extraction = extract_polygons( &path, tile_size, 4).unwrap();
        assert!( extraction.validity.has_alpha());
        println!("tile size {}: {} polygons from {} of {} tiles", tile_size, extraction.polygons.len(), extraction.n_valid_tiles, extraction.n_tiles);

        let raw_area: f64 = extraction.polygons.iter().map( |p| p.unsigned_area()).sum();
        assert!( (raw_area - expected).abs() < 1e-6);

        let region = merge_polygons( extraction.polygons).unwrap();
        assert_eq!( region.0.len(), 1);
        assert_eq!( region.0[0].interiors().len(), 1);
        assert!( (region.unsigned_area() - expected).abs() < 1e-6);
    }
}

#[test]
fn test_rgb_extra_band_is_alpha () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ortho_rgbx.tif");
    create_rgb_extra_tif( &path, COLS, ROWS, utm_geotransform(), 32618, |x,y| if is_valid_pixel(x,y) { 255 } else { 0 });

    let ds = Dataset::open( &path).unwrap();
    assert_eq!( ds.raster_count(), 4);
    assert_eq!( ValiditySource::detect( &ds).unwrap(), ValiditySource::Alpha { band: 4 });

    // color bands are constant, a nodata comparison would see the whole raster as valid
    let extraction = extract_polygons( &path, 16, 2).unwrap();
    let raw_area: f64 = extraction.polygons.iter().map( |p| p.unsigned_area()).sum();
    println!("rgb + extra band: {} polygons, area {}", extraction.polygons.len(), raw_area);
    assert!( (raw_area - n_valid_pixels() as f64).abs() < 1e-6);
}

#[test]
fn test_tiles_without_data_are_skipped () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ortho.tif");
    // only the upper left 16x16 tile has data
    create_rgba_tif( &path, COLS, ROWS, utm_geotransform(), 32618, |x,y| if x < 10 && y < 10 { 255 } else { 0 });

    let extraction = extract_polygons( &path, 16, 2).unwrap();
    assert_eq!( extraction.n_tiles, 12);
    assert_eq!( extraction.n_valid_tiles, 1);
}

#[test]
fn test_nodata_extraction () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ortho_rgb.tif");
    create_rgb_nodata_tif( &path, COLS, ROWS, utm_geotransform(), 32618, false, is_valid_pixel);

    let ds = Dataset::open( &path).unwrap();
    assert_eq!( ValiditySource::detect( &ds).unwrap(), ValiditySource::NoData { bands: 3, nodata: 0.0 });
    drop(ds);

    let extraction = extract_polygons( &path, 16, 3).unwrap();
    let region = merge_polygons( extraction.polygons).unwrap();
    assert!( (region.unsigned_area() - n_valid_pixels() as f64).abs() < 1e-6);
}

#[test]
fn test_no_valid_pixels () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.tif");
    create_rgba_tif( &path, COLS, ROWS, utm_geotransform(), 32618, |_,_| 0);

    let extraction = extract_polygons( &path, 16, 2).unwrap();
    assert!( extraction.polygons.is_empty());
    assert_eq!( extraction.n_valid_tiles, 0);

    let err = merge_polygons( extraction.polygons).unwrap_err();
    assert!( err.is_no_valid_pixels());
}

#[test]
fn test_missing_raster () {
    assert!( extract_polygons( std::path::Path::new("/nonexistent/ortho.tif"), 16, 1).is_err());
}
