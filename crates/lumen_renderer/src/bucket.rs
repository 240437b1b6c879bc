//! Image partitioning into tiles (buckets) that render independently.

use serde::{Deserialize, Serialize};

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// A rectangular pixel region `[left, right) x [bottom, top)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
    pub top: u32,
}

impl Tile {
    pub fn new(left: u32, bottom: u32, right: u32, top: u32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.top - self.bottom
    }

    pub fn pixel_count(&self) -> u32 {
        self.width() * self.height()
    }

    pub fn contains(&self, i: u32, j: u32) -> bool {
        (self.left..self.right).contains(&i) && (self.bottom..self.top).contains(&j)
    }

    /// Pixels row by row from the bottom, odd rows right to left.
    pub fn serpentine(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.bottom..self.top).flat_map(move |j| {
            let row = (self.left..self.right).map(move |i| (i, j));
            let reversed = (j - self.bottom) % 2 == 1;
            let (forward, backward) = if reversed {
                (None, Some(row.rev()))
            } else {
                (Some(row), None)
            };
            forward.into_iter().flatten().chain(backward.into_iter().flatten())
        })
    }
}

/// Order in which tiles are queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileOrder {
    /// Bottom row first, left to right
    #[default]
    RowMajor,
    /// Centre of the image first, then outward
    Spiral,
}

/// Cover the image with tiles of at most `tile_size` pixels a side. Edge
/// tiles are clipped to the image.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32, order: TileOrder) -> Vec<Tile> {
    if tile_size == 0 {
        return Vec::new();
    }

    let mut tiles = Vec::new();
    for bottom in (0..height).step_by(tile_size as usize) {
        for left in (0..width).step_by(tile_size as usize) {
            let right = left.saturating_add(tile_size).min(width);
            let top = bottom.saturating_add(tile_size).min(height);
            tiles.push(Tile::new(left, bottom, right, top));
        }
    }

    if order == TileOrder::Spiral {
        sort_spiral(&mut tiles, width, height);
    }
    tiles
}

/// The single tile of side `2 * window + 1` centred on pixel `(i, j)`,
/// clipped to the image.
pub fn debug_tile(width: u32, height: u32, i: u32, j: u32, window: u32) -> Tile {
    Tile::new(
        i.saturating_sub(window),
        j.saturating_sub(window),
        i.saturating_add(window + 1).min(width),
        j.saturating_add(window + 1).min(height),
    )
}

/// Sort tiles by distance of their centre from the image centre. Ties keep
/// row-major order.
fn sort_spiral(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let dist = |t: &Tile| {
        let x = (t.left + t.right) as f32 / 2.0;
        let y = (t.bottom + t.top) as f32 / 2.0;
        (x - center_x).powi(2) + (y - center_y).powi(2)
    };

    tiles.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}
