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

/// a rectangular pixel window of the raster grid
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct TileWindow {
    pub x_off: usize,
    pub y_off: usize,
    pub width: usize,
    pub height: usize,
}

impl TileWindow {
    pub fn pixel_count (&self) -> usize { self.width * self.height }
}

/// partition a `cols` x `rows` grid into `tile_size` windows, row by row. Windows in the last
/// row/column are clipped to the grid
pub fn tile_windows (cols: usize, rows: usize, tile_size: usize) -> Vec<TileWindow> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::with_capacity( cols.div_ceil(tile_size) * rows.div_ceil(tile_size));

    for y_off in (0..rows).step_by(tile_size) {
        let height = tile_size.min( rows - y_off);
        for x_off in (0..cols).step_by(tile_size) {
            let width = tile_size.min( cols - x_off);
            tiles.push( TileWindow { x_off, y_off, width, height });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition () {
        let (cols,rows) = (5000, 3001);
        let tiles = tile_windows( cols, rows, 2048);
        assert_eq!( tiles.len(), 3 * 2);

        let total: usize = tiles.iter().map( |t| t.pixel_count()).sum();
        assert_eq!( total, cols * rows);

        // every pixel is covered exactly once
        let mut covered = vec![0u8; cols*rows];
        for t in &tiles {
            for y in t.y_off..t.y_off+t.height {
                for x in t.x_off..t.x_off+t.width { covered[y*cols + x] += 1; }
            }
        }
        assert!( covered.iter().all( |c| *c == 1));

        let last = tiles.last().unwrap();
        assert_eq!( (last.x_off, last.y_off, last.width, last.height), (4096, 2048, 904, 953));
    }

    #[test]
    fn test_small_grid () {
        assert_eq!( tile_windows( 10, 10, 2048), vec![ TileWindow{ x_off: 0, y_off: 0, width: 10, height: 10 }]);
        assert!( tile_windows( 0, 10, 16).is_empty());
    }
}
