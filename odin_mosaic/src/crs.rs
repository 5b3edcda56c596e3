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

use geo::Centroid;
use tracing::debug;
use odin_gdal::{Dataset, SpatialRef, srs_from_definition, srs_utm_from_lon_lat, coord_transform, geometry::transform_multi_polygon};

use crate::Region;
use crate::errors::{Result, Stage, crs_error, reprojection_failed};

/// the coordinate reference system a region is expressed in
#[derive(Debug,Clone,PartialEq)]
pub struct CrsContext {
    definition: String,
    is_geographic: bool,
}

impl CrsContext {
    /// resolve a CRS from WKT, an authority code ("EPSG:32618") or a PROJ string
    pub fn from_definition (def: &str) -> Result<Self> {
        let srs = srs_from_definition(def).map_err( |e| crs_error( Stage::Config, e))?;
        Ok( CrsContext { definition: def.trim().to_string(), is_geographic: srs.is_geographic() } )
    }

    /// the CRS of a raster. Rasters without CRS are rejected since we can't compute metric areas for them
    pub fn from_dataset (ds: &Dataset) -> Result<Self> {
        let wkt = ds.spatial_ref().ok()
            .and_then( |srs| srs.to_wkt().ok())
            .filter( |wkt| !wkt.trim().is_empty())
            .ok_or_else( || crs_error( Stage::Extract, "raster has no spatial reference"))?;
        CrsContext::from_definition( &wkt)
    }

    /// EPSG:4326 with (lon,lat) axis order
    pub fn wgs84 () -> Self {
        CrsContext { definition: "EPSG:4326".to_string(), is_geographic: true }
    }

    pub fn utm (zone: u32, south: bool) -> Self {
        let epsg = if south { 32700 + zone } else { 32600 + zone };
        CrsContext { definition: format!("EPSG:{epsg}"), is_geographic: false }
    }

    pub fn definition (&self) -> &str { &self.definition }

    pub fn is_geographic (&self) -> bool { self.is_geographic }

    pub fn spatial_ref (&self) -> Result<SpatialRef> {
        self.resolve( Stage::Config)
    }

    fn resolve (&self, stage: Stage) -> Result<SpatialRef> {
        srs_from_definition( &self.definition).map_err( |e| crs_error( stage, e))
    }
}

/// the UTM zone CRS for a geographic position
pub fn utm_for_lon_lat (lon: f64, lat: f64) -> Result<CrsContext> {
    let (_,zone) = srs_utm_from_lon_lat( lon, lat, None).map_err( |e| crs_error( Stage::Buffer, e))?;
    Ok( CrsContext::utm( zone, lat < 0.0) )
}

/// a CRS with linear (meter) units that is locally accurate for `region`. Projected CRSs are used as-is,
/// geographic ones are replaced by the UTM zone of the region centroid
pub fn metric_crs_for (region: &Region, crs: &CrsContext) -> Result<CrsContext> {
    if !crs.is_geographic() {
        return Ok( crs.clone())
    }

    let centroid = region.centroid().ok_or_else( || crs_error( Stage::Buffer, "region has no centroid"))?;
    let utm = utm_for_lon_lat( centroid.x(), centroid.y())?;
    debug!("selected {} for centroid {:.5},{:.5}", utm.definition(), centroid.x(), centroid.y());
    Ok(utm)
}

/// explicit reprojection of a region. Returns a copy if both contexts are the same
pub fn reproject (region: &Region, from: &CrsContext, to: &CrsContext, stage: Stage) -> Result<Region> {
    if from == to {
        return Ok( region.clone())
    }

    let s_srs = from.resolve( stage)?;
    let t_srs = to.resolve( stage)?;
    let transform = coord_transform( &s_srs, &t_srs, false)
        .map_err( |e| reprojection_failed( stage, format!("no transformation {} -> {}: {e}", short_name(from), short_name(to))))?;

    transform_multi_polygon( &transform, region)
        .map_err( |e| reprojection_failed( stage, format!("{} -> {}: {e}", short_name(from), short_name(to))))
}

// WKT definitions are too verbose for error messages
fn short_name (crs: &CrsContext) -> String {
    let def = crs.definition();
    if def.len() > 40 {
        let name: String = def.chars().take(40).collect();
        format!("{name}..")
    } else {
        def.to_string()
    }
}
