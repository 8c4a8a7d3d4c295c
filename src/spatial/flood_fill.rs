//! Bounded breadth-first region discovery

use crate::city::tile::{Tile, TileGrid};
use crate::core::types::GridCoord;
use ahash::AHashSet;
use std::collections::VecDeque;

/// Collect the 4-connected region of tiles matching `predicate` around `start`.
///
/// Stops once `max_size` tiles have been collected, so arbitrarily large
/// regions (the sea, a sprawling road net) cost at most `max_size` visits.
/// An off-grid or non-matching start yields an empty region.
pub fn flood_fill_region<F>(
    grid: &TileGrid,
    start: GridCoord,
    predicate: F,
    max_size: usize,
) -> Vec<GridCoord>
where
    F: Fn(&Tile) -> bool,
{
    let mut region = Vec::new();
    if max_size == 0 {
        return region;
    }
    match grid.get(start) {
        Some(tile) if predicate(tile) => {}
        _ => return region,
    }

    let mut visited = AHashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        region.push(current);
        if region.len() >= max_size {
            break;
        }

        for neighbor in current.neighbors4() {
            if !visited.insert(neighbor) {
                continue;
            }
            if grid.get(neighbor).is_some_and(|tile| predicate(tile)) {
                queue.push_back(neighbor);
            }
        }
    }

    region
}
