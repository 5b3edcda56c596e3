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

use odin_gdal::warp::CutlineWarpBuilder;

/// run with "cargo test --test test_warp -- --nocapture"

#[test]
fn test_cutline_args () {
    let mut warp = CutlineWarpBuilder::new( "/data/in.tif", "/data/out.tif");
    warp.set_tgt_format("COG").unwrap()
        .set_cutline("/tmp/cut.geojson")
        .set_crop_to_cutline(true)
        .set_dst_alpha(true)
        .set_multithread(true)
        .set_overwrite(true)
        .add_create_option("COMPRESS", "DEFLATE")
        .add_create_option("BLOCKSIZE", 512)
        .add_warp_option("NUM_THREADS", "ALL_CPUS");

    let args = warp.app_args();
    println!("{}", args.join(" "));

    let pos = |s: &str| args.iter().position( |a| a == s);
    assert_eq!( args[ pos("-of").unwrap() + 1], "COG");
    assert_eq!( args[ pos("-cutline").unwrap() + 1], "/tmp/cut.geojson");
    assert!( pos("-crop_to_cutline").unwrap() > pos("-cutline").unwrap());
    assert!( pos("-dstalpha").is_some());
    assert!( pos("-multi").is_some());
    assert!( pos("-overwrite").is_some());
    assert!( pos("COMPRESS=DEFLATE").is_some());
    assert!( pos("BLOCKSIZE=512").is_some());
    assert!( pos("NUM_THREADS=ALL_CPUS").is_some());

    let cli = warp.cli_args();
    assert_eq!( &cli[cli.len()-2..], &["/data/in.tif".to_string(), "/data/out.tif".to_string()]);
}

#[test]
fn test_defaults () {
    let warp = CutlineWarpBuilder::new( "in.tif", "out.geojson");
    let args = warp.app_args();
    assert_eq!( args, vec!["-of".to_string(), "GeoJSON".to_string()]); // format from extension, no cutline

    let warp = CutlineWarpBuilder::new( "in.tif", "out.xyz");
    assert_eq!( warp.app_args()[1], "GTiff");

    let mut warp = CutlineWarpBuilder::new( "in.tif", "out.tif");
    assert!( warp.set_tgt_format("NO_SUCH_DRIVER").is_err());
}

#[test]
fn test_missing_command () {
    let warp = CutlineWarpBuilder::new( "in.tif", "out.tif");
    assert!( warp.exec_cli("/nonexistent/gdalwarp").is_err());
}
