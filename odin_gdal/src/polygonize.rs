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

use std::ptr::null_mut;
use gdal::vector::{LayerAccess, LayerOptions, OGRwkbGeometryType};
use geo::Polygon;

use crate::{Buffer, GeoTransform, create_mem_dataset, create_mem_vector_dataset, ok_ce_none};
use crate::geometry::collect_polygons;
use crate::errors::{Result, misc_error};

/// vectorize the 4-connected regions of non-zero pixels in a row major `mask` of `width` x `height` pixels.
/// Returned polygons are in the coordinates of `geo_transform`. Zero valued pixels are excluded through
/// the mask band, i.e. they never produce polygons
pub fn polygonize_mask (mask: Vec<u8>, width: usize, height: usize, geo_transform: &GeoTransform) -> Result<Vec<Polygon<f64>>> {
    if mask.len() != width * height {
        return Err( misc_error( format!("mask size {} does not match {}x{}", mask.len(), width, height)))
    }
    if width == 0 || height == 0 || mask.iter().all( |v| *v == 0) {
        return Ok( Vec::new())
    }

    let mut mask_ds = create_mem_dataset::<u8>( width, height, 1)?;
    mask_ds.set_geo_transform( geo_transform)?;
    {
        let mut band = mask_ds.rasterband(1)?;
        let mut buf = Buffer::new( (width,height), mask);
        band.write( (0,0), (width,height), &mut buf)?;
    }
    let band = mask_ds.rasterband(1)?;

    let mut vec_ds = create_mem_vector_dataset()?;
    let mut layer = vec_ds.create_layer( LayerOptions {
        name: "mask",
        ty: OGRwkbGeometryType::wkbPolygon,
        ..Default::default()
    })?;

    let res = unsafe {
        gdal_sys::GDALPolygonize( band.c_rasterband(), band.c_rasterband(), layer.c_layer(), -1, null_mut(), None, null_mut())
    };
    ok_ce_none(res)?;

    let mut polygons = Vec::new();
    for feature in layer.features() {
        if let Some(geom) = feature.geometry() {
            if !geom.is_empty() {
                collect_polygons( geom.to_geo()?, &mut polygons);
            }
        }
    }
    Ok(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mask () {
        let gt: GeoTransform = [0.0, 1.0, 0.0, 0.0, 0.0, -1.0];
        let polys = polygonize_mask( vec![0u8; 12], 4, 3, &gt).unwrap();
        assert!( polys.is_empty());
    }

    #[test]
    fn test_size_mismatch () {
        let gt: GeoTransform = [0.0, 1.0, 0.0, 0.0, 0.0, -1.0];
        assert!( polygonize_mask( vec![1u8; 11], 4, 3, &gt).is_err());
    }
}
