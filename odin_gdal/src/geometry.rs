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

//! bridge between `geo` geometries and the OGR (GEOS backed) geometry operations we need for
//! topologically correct buffering and validity repair

use gdal::vector::{Geometry, ToGdal};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use geo_types::Geometry as GeoGeometry;

use crate::{CoordTransform, transform_coords_2d};
use crate::errors::{Result, invalid_geometry};

/// turn a geo geometry into its polygonal parts. Points and lines are dropped
pub fn collect_polygons (geom: GeoGeometry<f64>, acc: &mut Vec<Polygon<f64>>) {
    match geom {
        GeoGeometry::Polygon(p) => acc.push(p),
        GeoGeometry::MultiPolygon(mp) => acc.extend( mp.0),
        GeoGeometry::GeometryCollection(gc) => {
            for g in gc.0 { collect_polygons( g, acc) }
        }
        GeoGeometry::Rect(r) => acc.push( r.to_polygon()),
        GeoGeometry::Triangle(t) => acc.push( t.to_polygon()),
        _ => {}
    }
}

pub fn to_ogr (mp: &MultiPolygon<f64>) -> Result<Geometry> {
    Ok( mp.to_gdal()? )
}

/// polygonal content of an OGR geometry. Empty geometries map to an empty MultiPolygon
pub fn from_ogr (geom: &Geometry) -> Result<MultiPolygon<f64>> {
    if geom.is_empty() { return Ok( MultiPolygon(Vec::new())) }

    let mut polygons = Vec::new();
    collect_polygons( geom.to_geo()?, &mut polygons);
    Ok( MultiPolygon(polygons) )
}

/// OGC validity as determined by GEOS
pub fn is_valid (mp: &MultiPolygon<f64>) -> Result<bool> {
    if mp.0.is_empty() { return Ok(true) }
    Ok( to_ogr(mp)?.is_valid() )
}

/// positive distances grow, negative distances shrink the geometry. Parts that collapse
/// are removed by GEOS, which can leave us with an empty result
pub fn buffer (mp: &MultiPolygon<f64>, distance: f64, n_quad_segs: u32) -> Result<MultiPolygon<f64>> {
    if !distance.is_finite() { return Err( invalid_geometry( format!("non-finite buffer distance {distance}"))) }
    if mp.0.is_empty() { return Ok( mp.clone()) }

    let geom = to_ogr(mp)?;
    let buffered = geom.buffer( distance, n_quad_segs)?;
    from_ogr( &buffered)
}

/// the classic zero distance buffer repair. Resolves self intersections and ring orientation
/// issues but can drop the lobes of bow-tie shapes
pub fn zero_buffer (mp: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
    buffer( mp, 0.0, 8)
}

fn transform_ring (transform: &CoordTransform, ring: &LineString<f64>) -> Result<LineString<f64>> {
    let (mut xs, mut ys): (Vec<f64>,Vec<f64>) = ring.0.iter().map( |c| (c.x, c.y)).unzip();
    transform_coords_2d( transform, &mut xs, &mut ys)?;
    Ok( LineString( xs.into_iter().zip( ys).map( |(x,y)| Coord{x,y}).collect()) )
}

/// vertex-wise reprojection of all rings. Ring topology is preserved, densification is not applied
pub fn transform_multi_polygon (transform: &CoordTransform, mp: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
    let mut polygons = Vec::with_capacity( mp.0.len());
    for p in &mp.0 {
        let exterior = transform_ring( transform, p.exterior())?;
        let mut interiors = Vec::with_capacity( p.interiors().len());
        for r in p.interiors() {
            interiors.push( transform_ring( transform, r)?);
        }
        polygons.push( Polygon::new( exterior, interiors));
    }
    Ok( MultiPolygon(polygons) )
}
