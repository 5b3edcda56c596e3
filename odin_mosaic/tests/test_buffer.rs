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

use geo::{Area, MultiPolygon, Polygon, polygon};
use odin_mosaic::{AreaThreshold, CrsContext, Stage, buffer::negative_buffer, crs::{metric_crs_for, reproject, utm_for_lon_lat},
                  geometry::ensure_valid};
use odin_gdal::geometry::is_valid;

/// run with "cargo test --test test_buffer -- --nocapture"

fn rect (x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon( vec![ polygon![ (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1) ]])
}

fn threshold (percent: f64) -> AreaThreshold {
    AreaThreshold::new( percent, 100.0).unwrap()
}

#[test]
fn test_projected_buffer () {
    let crs = CrsContext::from_definition("EPSG:32618").unwrap();
    assert!( !crs.is_geographic());

    let region = rect( 500000.0, 4000000.0, 501000.0, 4001000.0);
    assert_eq!( metric_crs_for( &region, &crs).unwrap(), crs);

    // 0.001% of 1km² is 10m
    let shrunk = negative_buffer( &region, &crs, threshold(0.001), 8).unwrap();
    println!("buffered area: {}", shrunk.unsigned_area());
    assert!( (shrunk.unsigned_area() - 980.0*980.0).abs() < 1.0);
    assert!( is_valid( &shrunk).unwrap());
}

#[test]
fn test_geographic_buffer () {
    let crs = CrsContext::from_definition("EPSG:4326").unwrap();
    assert!( crs.is_geographic());

    let region = rect( -75.01, -10.01, -74.99, -9.99);
    let shrunk = negative_buffer( &region, &crs, threshold(0.005), 8).unwrap();

    assert!( !shrunk.0.is_empty());
    assert!( shrunk.unsigned_area() < region.unsigned_area());
    assert!( is_valid( &shrunk).unwrap());
}

#[test]
fn test_utm_zone_selection () {
    let crs = CrsContext::wgs84();

    let region = rect( -75.01, -10.01, -74.99, -9.99);
    assert_eq!( metric_crs_for( &region, &crs).unwrap().definition(), "EPSG:32718");

    let region = rect( -60.01, 9.99, -59.99, 10.01);
    assert_eq!( metric_crs_for( &region, &crs).unwrap().definition(), "EPSG:32621");

    assert_eq!( utm_for_lon_lat( -75.0, 45.0).unwrap(), CrsContext::utm( 18, false));
}

#[test]
fn test_reprojection_round_trip () {
    let wgs84 = CrsContext::wgs84();
    let utm = CrsContext::utm( 18, true);
    let region = rect( -75.01, -10.01, -74.99, -9.99);

    let projected = reproject( &region, &wgs84, &utm, Stage::Buffer).unwrap();
    let back = reproject( &projected, &utm, &wgs84, Stage::Buffer).unwrap();

    let rel = (back.unsigned_area() - region.unsigned_area()).abs() / region.unsigned_area();
    println!("relative round trip area error: {rel}");
    assert!( rel < 1e-6);
    assert!( projected.unsigned_area() > 4.0e6); // ~2.2km x 2.2km
}

#[test]
fn test_collapse_is_degenerate () {
    let crs = CrsContext::utm( 18, false);
    let region = rect( 500000.0, 4000000.0, 500100.0, 4000100.0);

    // 1% of 10000m² is 100m, which consumes the whole 100m square
    let err = negative_buffer( &region, &crs, threshold(1.0), 8).unwrap_err();
    assert!( err.is_degenerate());
    assert_eq!( err.stage(), Some(Stage::Buffer));
}

#[test]
fn test_zero_threshold () {
    let crs = CrsContext::utm( 18, false);
    let region = rect( 500000.0, 4000000.0, 500100.0, 4000100.0);

    let res = negative_buffer( &region, &crs, AreaThreshold::zero(), 8).unwrap();
    assert_eq!( res, ensure_valid( region.clone(), Stage::Buffer).unwrap());
    assert_eq!( res.unsigned_area(), region.unsigned_area());
}

#[test]
fn test_invalid_crs () {
    assert!( CrsContext::from_definition("no such crs").is_err());
    assert!( CrsContext::from_definition("").is_err());
}
