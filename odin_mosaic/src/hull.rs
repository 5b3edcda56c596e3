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

use geo::{Area, ConvexHull, MultiPolygon};
use crate::Region;
use crate::geometry::ensure_valid;
use crate::errors::{Result, Stage, degenerate};

/// convex hull of all parts of `region`
pub fn convex_hull (region: &Region) -> Result<Region> {
    if region.0.is_empty() {
        return Err( degenerate( Stage::Hull, "empty region"))
    }

    let hull = region.convex_hull();
    if hull.unsigned_area() <= 0.0 {
        return Err( degenerate( Stage::Hull, "hull has no area"))
    }
    ensure_valid( MultiPolygon( vec![hull]), Stage::Hull)
}
