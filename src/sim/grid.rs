//! Arena terrain grid
//!
//! Cells are stored row-major. Border cells are always Solid; after setup the
//! grid only changes through [`Grid::destroy_block`].

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_GRID_CELLS;
use crate::error::GridError;
use crate::{cell_center, pixel_to_cell};

/// Terrain in a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Permanent, blocks movement and blasts
    Solid,
    /// Destructible, absorbs the blast that destroys it
    Brick,
    /// Walkable and inert
    PowerUp,
}

impl Cell {
    /// Whether players may stand in this cell
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Empty | Cell::PowerUp)
    }
}

/// The arena grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tile_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an arena with a Solid border and an Empty interior
    pub fn new(width: i32, height: i32, tile_size: f32) -> Result<Self, GridError> {
        if width < 3 || height < 3 {
            return Err(GridError::TooSmall { width, height });
        }
        let len = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_GRID_CELLS)
            .ok_or(GridError::TooLarge { width, height })?;
        let mut grid = Self {
            width,
            height,
            tile_size,
            cells: vec![Cell::Empty; len as usize],
        };
        for y in 0..height {
            for x in 0..width {
                if grid.is_border(IVec2::new(x, y)) {
                    let idx = grid.index(IVec2::new(x, y));
                    grid.cells[idx] = Cell::Solid;
                }
            }
        }
        Ok(grid)
    }

    /// Build the classic arena: Solid border, Solid pillars on even/even
    /// cells, and Bricks scattered over the rest with `brick_density`
    /// probability. The 3x3 corner pockets stay free of bricks and the spawn
    /// cells free of pillars, whatever the parity of the size. A non-finite
    /// density counts as 0.
    pub fn classic(
        width: i32,
        height: i32,
        tile_size: f32,
        brick_density: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height, tile_size)?;
        let density = if brick_density.is_finite() {
            brick_density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let spawns = grid.corner_spawns();

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let pos = IVec2::new(x, y);
                let idx = grid.index(pos);
                if x % 2 == 0 && y % 2 == 0 && !spawns.contains(&pos) {
                    grid.cells[idx] = Cell::Solid;
                    continue;
                }
                let in_pocket = (x <= 2 || x >= width - 3) && (y <= 2 || y >= height - 3);
                if !in_pocket && rng.random_bool(density) {
                    grid.cells[idx] = Cell::Brick;
                }
            }
        }

        log::debug!(
            "Generated {}x{} arena with {} bricks",
            width,
            height,
            grid.count(Cell::Brick)
        );
        Ok(grid)
    }

    /// Setup-only builder: replace an interior cell
    pub fn with_cell(mut self, x: i32, y: i32, cell: Cell) -> Result<Self, GridError> {
        let pos = IVec2::new(x, y);
        if !self.in_bounds(pos) {
            return Err(self.out_of_bounds(pos));
        }
        if self.is_border(pos) {
            if cell == Cell::Solid {
                return Ok(self);
            }
            return Err(GridError::BorderImmutable { x, y });
        }
        let idx = self.index(pos);
        self.cells[idx] = cell;
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    #[inline]
    fn is_border(&self, pos: IVec2) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x == self.width - 1 || pos.y == self.height - 1
    }

    #[inline]
    fn index(&self, pos: IVec2) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    fn out_of_bounds(&self, pos: IVec2) -> GridError {
        GridError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Terrain at a cell; fails outside the grid
    pub fn cell_at(&self, x: i32, y: i32) -> Result<Cell, GridError> {
        let pos = IVec2::new(x, y);
        if !self.in_bounds(pos) {
            return Err(self.out_of_bounds(pos));
        }
        Ok(self.cells[self.index(pos)])
    }

    /// Terrain at a cell, `None` outside the grid
    #[inline]
    pub fn get(&self, pos: IVec2) -> Option<Cell> {
        self.in_bounds(pos).then(|| self.cells[self.index(pos)])
    }

    /// Whether a player may stand at the cell; false off the grid
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(IVec2::new(x, y)).is_some_and(Cell::is_walkable)
    }

    /// Turn a Brick into Empty. Anything else (including off-grid) is a no-op.
    /// Returns whether a brick was destroyed.
    pub fn destroy_block(&mut self, x: i32, y: i32) -> bool {
        let pos = IVec2::new(x, y);
        if self.get(pos) != Some(Cell::Brick) {
            return false;
        }
        let idx = self.index(pos);
        self.cells[idx] = Cell::Empty;
        log::debug!("Brick destroyed at ({}, {})", x, y);
        true
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Grid cell containing a pixel position
    #[inline]
    pub fn pixel_to_cell(&self, pos: Vec2) -> IVec2 {
        pixel_to_cell(pos, self.tile_size)
    }

    /// Pixel center of a cell
    #[inline]
    pub fn cell_to_pixel(&self, cell: IVec2) -> Vec2 {
        cell_center(cell, self.tile_size)
    }

    /// The four corner spawn cells, in player order
    pub fn corner_spawns(&self) -> [IVec2; 4] {
        [
            IVec2::new(1, 1),
            IVec2::new(self.width - 2, self.height - 2),
            IVec2::new(self.width - 2, 1),
            IVec2::new(1, self.height - 2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn is_border(grid: &Grid, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x == grid.width() - 1 || y == grid.height() - 1
    }

    #[test]
    fn test_new_grid_has_solid_border() {
        let grid = Grid::new(5, 4, 48.0).unwrap();
        for y in 0..4 {
            for x in 0..5 {
                let expected = if is_border(&grid, x, y) { Cell::Solid } else { Cell::Empty };
                assert_eq!(grid.cell_at(x, y).unwrap(), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_too_small() {
        assert_eq!(
            Grid::new(2, 5, 48.0),
            Err(GridError::TooSmall { width: 2, height: 5 })
        );
    }

    #[test]
    fn test_too_large() {
        assert_eq!(
            Grid::new(70_000, 70_000, 48.0),
            Err(GridError::TooLarge { width: 70_000, height: 70_000 })
        );
        assert_eq!(
            Grid::new(MAX_GRID_CELLS, 3, 48.0),
            Err(GridError::TooLarge { width: MAX_GRID_CELLS, height: 3 })
        );
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let grid = Grid::new(5, 5, 48.0).unwrap();
        assert!(matches!(grid.cell_at(5, 0), Err(GridError::OutOfBounds { x: 5, y: 0, .. })));
        assert!(matches!(grid.cell_at(0, -1), Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn test_walkability_clamps() {
        let grid = Grid::new(5, 5, 48.0)
            .unwrap()
            .with_cell(2, 2, Cell::Brick)
            .unwrap()
            .with_cell(3, 3, Cell::PowerUp)
            .unwrap();
        assert!(grid.is_walkable(1, 1));
        assert!(grid.is_walkable(3, 3));
        assert!(!grid.is_walkable(2, 2));
        assert!(!grid.is_walkable(-1, 2));
        assert!(!grid.is_walkable(2, 99));
    }

    #[test]
    fn test_destroy_block_only_affects_bricks() {
        let mut grid = Grid::new(5, 5, 48.0).unwrap().with_cell(2, 2, Cell::Brick).unwrap();
        assert!(grid.destroy_block(2, 2));
        assert_eq!(grid.cell_at(2, 2).unwrap(), Cell::Empty);
        // Second call is a no-op
        assert!(!grid.destroy_block(2, 2));
        assert_eq!(grid.cell_at(2, 2).unwrap(), Cell::Empty);

        let before = grid.clone();
        assert!(!grid.destroy_block(0, 0));
        assert!(!grid.destroy_block(1, 1));
        assert!(!grid.destroy_block(-3, 40));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_border_is_immutable() {
        let grid = Grid::new(5, 5, 48.0).unwrap();
        assert_eq!(
            grid.clone().with_cell(0, 2, Cell::Empty),
            Err(GridError::BorderImmutable { x: 0, y: 2 })
        );
        assert!(grid.with_cell(0, 2, Cell::Solid).is_ok());
    }

    #[test]
    fn test_classic_layout() {
        let mut rng = Pcg32::seed_from_u64(42);
        let grid = Grid::classic(15, 13, 48.0, 1.0, &mut rng).unwrap();

        // Pillars on even/even interior cells
        assert_eq!(grid.cell_at(2, 2).unwrap(), Cell::Solid);
        assert_eq!(grid.cell_at(12, 10).unwrap(), Cell::Solid);
        // Corner pockets are clear
        for spawn in grid.corner_spawns() {
            assert!(grid.is_walkable(spawn.x, spawn.y));
        }
        assert_eq!(grid.cell_at(2, 1).unwrap(), Cell::Empty);
        assert_eq!(grid.cell_at(1, 2).unwrap(), Cell::Empty);
        // Full density fills everything else
        assert_eq!(grid.cell_at(5, 5).unwrap(), Cell::Brick);
        assert_eq!(grid.cell_at(7, 1).unwrap(), Cell::Brick);
    }

    #[test]
    fn test_classic_even_sizes_keep_spawns_open() {
        for (width, height) in [(16, 14), (4, 4), (6, 9)] {
            let grid = Grid::classic(width, height, 48.0, 1.0, &mut Pcg32::seed_from_u64(3)).unwrap();
            for spawn in grid.corner_spawns() {
                assert!(grid.is_walkable(spawn.x, spawn.y), "{width}x{height} spawn {spawn}");
            }
        }
        // Pillars away from the spawns are untouched
        let grid = Grid::classic(16, 14, 48.0, 0.0, &mut Pcg32::seed_from_u64(3)).unwrap();
        assert_eq!(grid.cell_at(12, 12).unwrap(), Cell::Solid);
        assert_eq!(grid.cell_at(14, 10).unwrap(), Cell::Solid);
    }

    #[test]
    fn test_classic_non_finite_density_places_no_bricks() {
        for density in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let grid = Grid::classic(15, 13, 48.0, density, &mut Pcg32::seed_from_u64(1)).unwrap();
            assert_eq!(grid.count(Cell::Brick), 0);
        }
    }

    #[test]
    fn test_classic_is_deterministic() {
        let a = Grid::classic(15, 13, 48.0, 0.4, &mut Pcg32::seed_from_u64(7)).unwrap();
        let b = Grid::classic(15, 13, 48.0, 0.4, &mut Pcg32::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pixel_conversions() {
        let grid = Grid::new(15, 13, 48.0).unwrap();
        assert_eq!(grid.cell_to_pixel(IVec2::new(1, 1)), Vec2::new(72.0, 72.0));
        assert_eq!(grid.pixel_to_cell(Vec2::new(72.0, 100.0)), IVec2::new(1, 2));
    }

    proptest! {
        #[test]
        fn prop_border_never_walkable(
            width in 3i32..40,
            height in 3i32..40,
            density in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let grid = Grid::classic(width, height, 16.0, density, &mut Pcg32::seed_from_u64(seed)).unwrap();
            for x in 0..width {
                prop_assert!(!grid.is_walkable(x, 0));
                prop_assert!(!grid.is_walkable(x, height - 1));
            }
            for y in 0..height {
                prop_assert!(!grid.is_walkable(0, y));
                prop_assert!(!grid.is_walkable(width - 1, y));
            }
        }

        #[test]
        fn prop_destroy_block_idempotent(
            seed in any::<u64>(),
            x in -2i32..17,
            y in -2i32..15,
        ) {
            let mut once = Grid::classic(15, 13, 48.0, 0.5, &mut Pcg32::seed_from_u64(seed)).unwrap();
            let before = once.get(IVec2::new(x, y));
            once.destroy_block(x, y);
            let mut twice = once.clone();
            twice.destroy_block(x, y);
            prop_assert_eq!(&once, &twice);
            match before {
                Some(Cell::Brick) => prop_assert_eq!(once.get(IVec2::new(x, y)), Some(Cell::Empty)),
                other => prop_assert_eq!(once.get(IVec2::new(x, y)), other),
            }
        }
    }
}
