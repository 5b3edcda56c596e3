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

use std::{fmt, str::FromStr};
use crate::errors::{Result, invalid_threshold};

/// a non-negative percentage of the ROI area. A value of 0.005 means 0.005 percent (not half a percent)
#[derive(Debug,Clone,Copy,PartialEq,PartialOrd)]
pub struct AreaThreshold(f64);

impl AreaThreshold {
    pub fn new (percent: f64, max_percent: f64) -> Result<Self> {
        if !percent.is_finite() {
            Err( invalid_threshold( format!("{percent} is not a finite number")))
        } else if percent < 0.0 {
            Err( invalid_threshold( format!("{percent} is negative")))
        } else if percent > max_percent {
            Err( invalid_threshold( format!("{percent} exceeds maximum of {max_percent} percent")))
        } else {
            Ok( AreaThreshold(percent) )
        }
    }

    pub fn zero () -> Self { AreaThreshold(0.0) }

    pub fn percent (&self) -> f64 { self.0 }

    pub fn is_zero (&self) -> bool { self.0 == 0.0 }

    /// the (metric) shrink distance for a region of the given area
    pub fn buffer_distance (&self, area: f64) -> f64 {
        area * self.0 / 100.0
    }
}

impl fmt::Display for AreaThreshold {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// parse without upper bound. Use [`AreaThreshold::new`] to check against a configured maximum
impl FromStr for AreaThreshold {
    type Err = crate::errors::OdinMosaicError;

    fn from_str (s: &str) -> Result<Self> {
        let s = s.trim();
        let v: f64 = s.trim_end_matches('%').trim().parse().map_err( |_| invalid_threshold( format!("'{s}' is not a number")))?;
        AreaThreshold::new( v, f64::INFINITY)
    }
}
