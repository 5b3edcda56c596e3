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

//! repair, merge and simplification of ROI polygons

use std::panic::{AssertUnwindSafe, catch_unwind};
use geo::{Area, Contains, MultiPolygon, Polygon, unary_union};
use tracing::{debug, warn};
use odin_gdal::geometry::{is_valid, zero_buffer};

use crate::Region;
use crate::errors::{OdinMosaicError, Result, Stage, degenerate, op_failed};

fn has_area (p: &Polygon<f64>) -> bool {
    !p.exterior().0.is_empty() && p.unsigned_area() > 0.0
}

/// drop empty and zero-area polygons, repair invalid ones with a zero width buffer
pub fn clean_polygons (polygons: Vec<Polygon<f64>>, stage: Stage) -> Result<Vec<Polygon<f64>>> {
    let mut cleaned = Vec::with_capacity( polygons.len());

    for p in polygons.into_iter().filter( has_area) {
        let mp = MultiPolygon( vec![p]);
        if is_valid( &mp).map_err( |e| op_failed( stage, e))? {
            cleaned.extend( mp.0);
        } else {
            let repaired = zero_buffer( &mp).map_err( |e| op_failed( stage, e))?;
            cleaned.extend( repaired.0.into_iter().filter( has_area));
        }
    }
    Ok(cleaned)
}

/// geo's boolean ops report unrecoverable numerical problems by panicking
pub fn try_union (polygons: &[Polygon<f64>]) -> Option<Region> {
    match catch_unwind( AssertUnwindSafe( || unary_union( polygons.iter()))) {
        Ok(region) => Some(region),
        Err(_) => {
            debug!("union of {} polygons aborted, treated as failed", polygons.len());
            None
        }
    }
}

fn is_usable (region: &Region) -> bool {
    !region.0.is_empty() && is_valid( region).unwrap_or(false)
}

/// union of all extracted polygons into a single valid region
pub fn merge_polygons (polygons: Vec<Polygon<f64>>) -> Result<Region> {
    merge_with( polygons, try_union)
}

/// merge with an explicit union operation. If the first union fails or yields an invalid region
/// the union is retried once over zero-buffer repaired inputs
pub fn merge_with<F> (polygons: Vec<Polygon<f64>>, union: F) -> Result<Region>
    where F: Fn(&[Polygon<f64>]) -> Option<Region>
{
    if polygons.is_empty() {
        return Err( OdinMosaicError::NoValidPixels( Stage::Merge))
    }

    let n_input = polygons.len();
    let cleaned = clean_polygons( polygons, Stage::Merge)?;
    if cleaned.is_empty() {
        return Err( degenerate( Stage::Merge, format!("none of {n_input} polygons has a positive area")))
    }
    debug!("merging {} of {} polygons", cleaned.len(), n_input);

    if let Some(merged) = union( &cleaned) {
        if is_usable( &merged) {
            return ensure_valid( merged, Stage::Merge)
        }
    }

    warn!("union of {} polygons invalid, retrying with repaired inputs", cleaned.len());
    let mut repaired: Vec<Polygon<f64>> = Vec::with_capacity( cleaned.len());
    for p in cleaned {
        let mp = zero_buffer( &MultiPolygon( vec![p])).map_err( |e| op_failed( Stage::Merge, e))?;
        repaired.extend( mp.0.into_iter().filter( has_area));
    }
    debug!("retrying union over {} zero-buffered polygons", repaired.len());

    let merged = union( &repaired).ok_or_else( || op_failed( Stage::Merge, "polygon union failed"))?;
    ensure_valid( merged, Stage::Merge)
}

/// drop zero-area parts and repair OGC invalid regions. Fails if nothing with a positive area remains
pub fn ensure_valid (region: Region, stage: Stage) -> Result<Region> {
    let region = MultiPolygon( region.0.into_iter().filter( has_area).collect());
    if region.0.is_empty() {
        return Err( degenerate( stage, "region has no area"))
    }

    if is_valid( &region).map_err( |e| op_failed( stage, e))? {
        return Ok(region)
    }

    let repaired = zero_buffer( &region).map_err( |e| op_failed( stage, e))?;
    let repaired = MultiPolygon( repaired.0.into_iter().filter( has_area).collect());
    if repaired.0.is_empty() {
        Err( degenerate( stage, "region is empty after repair"))
    } else {
        Ok(repaired)
    }
}

/// the polygon with the largest area
pub fn largest_polygon (region: &Region) -> Option<&Polygon<f64>> {
    region.0.iter().max_by( |a,b| a.unsigned_area().total_cmp( &b.unsigned_area()))
}

/// fill holes. The largest component keeps only its exterior ring, components inside of it are
/// absorbed and all others are kept (without holes) as separate parts
pub fn close_holes (region: &Region) -> Region {
    let Some(largest) = largest_polygon( region) else { return region.clone() };
    let filled = Polygon::new( largest.exterior().clone(), vec![]);

    let mut parts = vec![ filled.clone()];
    for p in &region.0 {
        if std::ptr::eq( p, largest) { continue }
        if !filled.contains(p) {
            parts.push( Polygon::new( p.exterior().clone(), vec![]));
        }
    }
    MultiPolygon(parts)
}
