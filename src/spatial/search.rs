//! Category scans and windowed nearest-neighbor search
//!
//! Both are plain scans with no incremental index. They run at event cadence
//! (spawn, trip start) on a bounded grid, not once per agent per tick.

use crate::city::category::{BuildingCategory, CategoryIndex};
use crate::city::tile::{Tile, TileGrid};
use crate::core::types::GridCoord;

/// Every tile belonging to `category`, in row-major order
pub fn find_by_category(grid: &TileGrid, category: BuildingCategory, index: &CategoryIndex) -> Vec<GridCoord> {
    grid.iter()
        .filter(|(coord, tile)| index.matches(category, *coord, tile))
        .map(|(coord, _)| coord)
        .collect()
}

/// Nearest tile of `category` inside the square window of half-width `max_radius`
///
/// Ties on squared distance go to the first tile in row-major order.
pub fn find_nearest_in_category(
    grid: &TileGrid,
    origin: GridCoord,
    category: BuildingCategory,
    max_radius: usize,
    index: &CategoryIndex,
) -> Option<GridCoord> {
    find_nearest_matching(grid, origin, max_radius, |coord, tile| {
        index.matches(category, coord, tile)
    })
}

/// Nearest tile satisfying `predicate` inside the window around `origin`
pub fn find_nearest_matching<F>(
    grid: &TileGrid,
    origin: GridCoord,
    max_radius: usize,
    predicate: F,
) -> Option<GridCoord>
where
    F: Fn(GridCoord, &Tile) -> bool,
{
    if grid.is_empty() {
        return None;
    }

    let x_min = origin.x.saturating_sub(max_radius);
    let y_min = origin.y.saturating_sub(max_radius);
    let x_max = origin.x.saturating_add(max_radius).min(grid.width - 1);
    let y_max = origin.y.saturating_add(max_radius).min(grid.height - 1);
    if x_min > x_max || y_min > y_max {
        return None;
    }

    let mut best: Option<(usize, GridCoord)> = None;
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let coord = GridCoord::new(x, y);
            let Some(tile) = grid.get(coord) else {
                continue;
            };
            if !predicate(coord, tile) {
                continue;
            }
            let dist_sq = coord.distance_sq(&origin);
            if best.map_or(true, |(d, _)| dist_sq < d) {
                best = Some((dist_sq, coord));
            }
        }
    }

    best.map(|(_, coord)| coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::category::CategoryTable;
    use crate::city::tile::BuildingType;

    fn index() -> CategoryIndex {
        CategoryIndex::from_table(&CategoryTable::default(), 0)
    }

    fn grid_with_shops(shops: &[GridCoord]) -> TileGrid {
        let mut grid = TileGrid::from_fn(30, 30, |_| Tile::new(BuildingType::Road));
        for &shop in shops {
            grid.set(shop, Tile::new(BuildingType::ShopSmall));
        }
        grid
    }

    #[test]
    fn test_find_by_category_row_major() {
        let grid = grid_with_shops(&[GridCoord::new(5, 9), GridCoord::new(20, 1), GridCoord::new(1, 9)]);
        let found = find_by_category(&grid, BuildingCategory::Commercial, &index());
        assert_eq!(
            found,
            vec![GridCoord::new(20, 1), GridCoord::new(1, 9), GridCoord::new(5, 9)]
        );
    }

    #[test]
    fn test_find_by_category_empty_grid() {
        let grid = TileGrid::new(0, 0);
        assert!(find_by_category(&grid, BuildingCategory::Park, &index()).is_empty());
    }

    #[test]
    fn test_nearest_picks_closest() {
        let grid = grid_with_shops(&[GridCoord::new(10, 10), GridCoord::new(14, 12)]);
        let nearest = find_nearest_in_category(&grid, GridCoord::new(13, 12), BuildingCategory::Commercial, 10, &index());
        assert_eq!(nearest, Some(GridCoord::new(14, 12)));
    }

    #[test]
    fn test_nearest_outside_window_is_none() {
        let grid = grid_with_shops(&[GridCoord::new(25, 25)]);
        let nearest = find_nearest_in_category(&grid, GridCoord::new(2, 2), BuildingCategory::Commercial, 5, &index());
        assert_eq!(nearest, None);
    }

    #[test]
    fn test_window_corner_counts() {
        // Chebyshev corner of the window is inside even though its Euclidean
        // distance exceeds the radius
        let grid = grid_with_shops(&[GridCoord::new(8, 8)]);
        let nearest = find_nearest_in_category(&grid, GridCoord::new(5, 5), BuildingCategory::Commercial, 3, &index());
        assert_eq!(nearest, Some(GridCoord::new(8, 8)));
    }

    #[test]
    fn test_tie_goes_to_row_major_first() {
        let grid = grid_with_shops(&[GridCoord::new(12, 10), GridCoord::new(10, 8), GridCoord::new(8, 10)]);
        let nearest = find_nearest_in_category(&grid, GridCoord::new(10, 10), BuildingCategory::Commercial, 5, &index());
        assert_eq!(nearest, Some(GridCoord::new(10, 8)));
    }

    #[test]
    fn test_origin_off_grid_still_searches_window() {
        let grid = grid_with_shops(&[GridCoord::new(29, 29)]);
        let nearest = find_nearest_in_category(&grid, GridCoord::new(32, 32), BuildingCategory::Commercial, 4, &index());
        assert_eq!(nearest, Some(GridCoord::new(29, 29)));

        let far = find_nearest_in_category(&grid, GridCoord::new(100, 100), BuildingCategory::Commercial, 4, &index());
        assert_eq!(far, None);
    }
}
