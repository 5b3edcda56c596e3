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

use geo::Area;
use tracing::info;
use odin_gdal::geometry::buffer;

use crate::{Region, AreaThreshold};
use crate::crs::{CrsContext, metric_crs_for, reproject};
use crate::geometry::ensure_valid;
use crate::errors::{Result, Stage, degenerate, op_failed};

/// shrink `region` (given in `crs`) inwards by `threshold` percent of its metric area. The distance is
/// computed and applied in a metric CRS, the result is returned in `crs`
pub fn negative_buffer (region: &Region, crs: &CrsContext, threshold: AreaThreshold, quad_segs: u32) -> Result<Region> {
    let region = ensure_valid( region.clone(), Stage::Buffer)?;
    if threshold.is_zero() {
        return Ok(region)
    }

    let metric_crs = metric_crs_for( &region, crs)?;
    let metric_region = reproject( &region, crs, &metric_crs, Stage::Buffer)?;

    let area = metric_region.unsigned_area();
    let distance = threshold.buffer_distance( area);
    info!("buffering region of {:.1} m² by -{:.3} m ({})", area, distance, threshold);

    let shrunk = buffer( &metric_region, -distance, quad_segs).map_err( |e| op_failed( Stage::Buffer, e))?;
    if shrunk.0.is_empty() || shrunk.unsigned_area() <= 0.0 {
        return Err( degenerate( Stage::Buffer, format!("threshold {threshold} consumes the whole region ({distance:.3} m)")))
    }

    let shrunk = reproject( &shrunk, &metric_crs, crs, Stage::Buffer)?;
    ensure_valid( shrunk, Stage::Buffer)
}
