//! Generic grid for tile data

use crate::core::types::{GridCoord, Vec2};

/// Rendered width of one isometric tile (screen units)
pub const TILE_WIDTH: f32 = 64.0;
/// Rendered height of one isometric tile (screen units)
pub const TILE_HEIGHT: f32 = 32.0;

/// Generic 2D grid stored row-major
///
/// A 0x0 grid is valid; every lookup on it simply returns `None`.
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// Build a grid by evaluating `f` at every coordinate
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(GridCoord) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(GridCoord::new(x, y)));
            }
        }
        Self { width, height, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<&T> {
        if self.contains(coord) {
            self.data.get(coord.y * self.width + coord.x)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut T> {
        if self.contains(coord) {
            self.data.get_mut(coord.y * self.width + coord.x)
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, coord: GridCoord, value: T) {
        if let Some(cell) = self.get_mut(coord) {
            *cell = value;
        }
    }

    /// Row-major iteration over every cell
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &T)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, cell)| (GridCoord::new(i % width, i / width), cell))
    }
}

/// Project a tile to isometric screen coordinates (tile center)
pub fn project_to_screen(coord: GridCoord) -> Vec2 {
    let x = coord.x as f32;
    let y = coord.y as f32;
    Vec2::new(
        (x - y) * TILE_WIDTH / 2.0,
        (x + y) * TILE_HEIGHT / 2.0 + TILE_HEIGHT / 2.0,
    )
}
