//! Players and the grid-constrained movement controller
//!
//! Positions are continuous pixels; the grid cell is always derived from the
//! pixel position and never stored.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::bomb::{BombId, BombRegistry, PlacementRequest};
use super::grid::Grid;
use crate::consts::*;
use crate::error::PlacementError;

/// Player identifier (also the owner id of their bombs and blasts)
pub type PlayerId = u32;

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit pixel offset (y grows downward)
    pub fn offset(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Visual state handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Move,
    Attack,
    /// Terminal; set when the player dies
    Dead,
}

/// Power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// One more bomb armed at a time
    ExtraBomb,
    /// Blast reaches one cell further
    LongerExplosion,
    /// Faster movement
    SpeedBoost,
}

/// Directional intent for one tick (each 0.0 - 1.0)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub up: f32,
    pub down: f32,
    pub left: f32,
    pub right: f32,
}

impl MoveIntent {
    /// Direction along the dominant axis, if any.
    /// Vertical wins only when strictly stronger; ties go horizontal.
    pub fn dominant(&self) -> Option<Direction> {
        let vertical = (self.up - self.down).abs();
        let horizontal = (self.left - self.right).abs();
        if vertical > horizontal {
            if self.up > self.down {
                Some(Direction::Up)
            } else {
                Some(Direction::Down)
            }
        } else if self.left > self.right {
            Some(Direction::Left)
        } else if self.right > self.left {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Summed strength of all four direction signals
    pub fn held(&self) -> f32 {
        self.up + self.down + self.left + self.right
    }
}

/// A player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Pixel position (center of the sprite)
    pub position: Vec2,
    /// Once false, stays false for the rest of the round
    pub alive: bool,
    pub bomb_capacity: u32,
    /// Bombs this player has armed that have not gone off yet
    pub active_bombs: Vec<BombId>,
    pub blast_range: i32,
    /// Speed multiplier over the base move speed
    pub move_speed: f32,
    pub facing: Direction,
    pub animation: AnimationState,
    /// Seconds of attack animation left
    #[serde(default)]
    pub attack_timer: f32,
}

impl Player {
    pub fn new(id: PlayerId, position: Vec2) -> Self {
        Self {
            id,
            position,
            alive: true,
            bomb_capacity: STARTING_BOMB_CAPACITY,
            active_bombs: Vec::new(),
            blast_range: STARTING_BLAST_RANGE,
            move_speed: 1.0,
            facing: Direction::default(),
            animation: AnimationState::Idle,
            attack_timer: 0.0,
        }
    }

    /// Grid cell containing the player's position
    #[inline]
    pub fn cell(&self, tile_size: f32) -> IVec2 {
        crate::pixel_to_cell(self.position, tile_size)
    }

    /// Mark the player dead. Returns false if they already were.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.animation = AnimationState::Dead;
        self.attack_timer = 0.0;
        true
    }

    /// Credit back a detonated bomb. Only bombs this player armed count,
    /// and each one only once.
    pub fn bomb_detonated(&mut self, bomb: BombId) -> bool {
        match self.active_bombs.iter().position(|&b| b == bomb) {
            Some(idx) => {
                self.active_bombs.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    /// Bombs still available to place
    pub fn bombs_available(&self) -> u32 {
        self.bomb_capacity.saturating_sub(self.active_bombs.len() as u32)
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::ExtraBomb => self.bomb_capacity += 1,
            PowerUpKind::LongerExplosion => self.blast_range += 1,
            PowerUpKind::SpeedBoost => self.move_speed += SPEED_BOOST_STEP,
        }
        log::debug!("Player {} picked up {:?}", self.id, kind);
    }
}

/// Nudge `value` toward `center`: snap when close, ease when near, else leave it
pub fn align_toward(value: f32, center: f32) -> f32 {
    let diff = center - value;
    if diff.abs() < ALIGN_SNAP_DISTANCE {
        center
    } else if diff.abs() < ALIGN_EASE_DISTANCE {
        value + diff.signum() * ALIGN_EASE_STEP
    } else {
        value
    }
}

/// Movement and bomb placement rules shared by every player
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Pixels per second at speed multiplier 1.0
    pub base_speed: f32,
    pub fuse_seconds: f32,
    pub attack_duration: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            base_speed: BASE_MOVE_SPEED,
            fuse_seconds: FUSE_SECONDS,
            attack_duration: ATTACK_DURATION,
        }
    }
}

impl PlayerController {
    /// Move the player along the dominant input axis if the target cell is
    /// walkable, aligning the other axis to the lane. Returns whether the
    /// player moved.
    pub fn update_movement(
        &self,
        player: &mut Player,
        grid: &Grid,
        intent: MoveIntent,
        dt: f32,
    ) -> bool {
        if !player.alive {
            return false;
        }

        if player.attack_timer > 0.0 {
            player.attack_timer = (player.attack_timer - dt).max(0.0);
        }

        let start = player.position;
        if let Some(dir) = intent.dominant() {
            player.facing = dir;

            // No tunnelling through a wall on a long frame
            let step = (self.base_speed * player.move_speed * dt).min(grid.tile_size() * 0.5);
            let current = player.cell(grid.tile_size());
            let candidate = start + dir.offset() * step;
            let candidate_cell = grid.pixel_to_cell(candidate);
            let target = if dir.is_vertical() {
                IVec2::new(current.x, candidate_cell.y)
            } else {
                IVec2::new(candidate_cell.x, current.y)
            };

            if grid.is_walkable(target.x, target.y) {
                let center = grid.cell_to_pixel(target);
                if dir.is_vertical() {
                    player.position.y = candidate.y;
                    player.position.x = align_toward(start.x, center.x);
                } else {
                    player.position.x = candidate.x;
                    player.position.y = align_toward(start.y, center.y);
                }
            }
        }

        let moved = player.position != start;
        player.animation = if moved {
            AnimationState::Move
        } else if player.animation == AnimationState::Attack && player.attack_timer > 0.0 {
            AnimationState::Attack
        } else {
            AnimationState::Idle
        };
        moved
    }

    /// Start the attack animation
    pub fn start_attack(&self, player: &mut Player) {
        if !player.alive {
            return;
        }
        player.animation = AnimationState::Attack;
        player.attack_timer = self.attack_duration;
    }

    /// Arm a bomb on the player's current cell
    pub fn request_bomb_placement(
        &self,
        player: &mut Player,
        grid: &Grid,
        bombs: &mut BombRegistry,
    ) -> Result<BombId, PlacementError> {
        if !player.alive {
            return Err(PlacementError::PlayerDead(player.id));
        }
        let id = bombs.place(
            grid,
            PlacementRequest {
                cell: player.cell(grid.tile_size()),
                owner: player.id,
                range: player.blast_range,
                fuse: self.fuse_seconds,
                capacity: player.bomb_capacity,
            },
        )?;
        player.active_bombs.push(id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;

    const DT: f32 = 1.0 / 64.0; // 2px per step at base speed

    fn arena() -> Grid {
        Grid::new(9, 9, 48.0)
            .unwrap()
            .with_cell(3, 1, Cell::Solid)
            .unwrap()
    }

    fn player_at(grid: &Grid, x: i32, y: i32) -> Player {
        Player::new(1, grid.cell_to_pixel(IVec2::new(x, y)))
    }

    fn right() -> MoveIntent {
        MoveIntent {
            right: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_dominant_axis() {
        let up = MoveIntent { up: 1.0, ..Default::default() };
        assert_eq!(up.dominant(), Some(Direction::Up));
        assert_eq!(right().dominant(), Some(Direction::Right));
        // Ties go horizontal
        let diagonal = MoveIntent { down: 1.0, left: 1.0, ..Default::default() };
        assert_eq!(diagonal.dominant(), Some(Direction::Left));
        // Opposing inputs cancel
        let opposed = MoveIntent { left: 1.0, right: 1.0, ..Default::default() };
        assert_eq!(opposed.dominant(), None);
        assert_eq!(MoveIntent::default().dominant(), None);
    }

    #[test]
    fn test_moves_along_free_lane() {
        let grid = arena();
        let controller = PlayerController::default();
        let mut player = player_at(&grid, 1, 2);

        assert!(controller.update_movement(&mut player, &grid, right(), DT));
        assert_eq!(player.position, Vec2::new(74.0, 120.0));
        assert_eq!(player.facing, Direction::Right);
        assert_eq!(player.animation, AnimationState::Move);
    }

    #[test]
    fn test_blocked_by_solid() {
        let grid = arena();
        let controller = PlayerController::default();
        // Right edge of cell (2, 1); (3, 1) is Solid
        let mut player = Player::new(1, Vec2::new(143.0, 72.0));

        assert!(!controller.update_movement(&mut player, &grid, right(), DT));
        assert_eq!(player.position, Vec2::new(143.0, 72.0));
        assert_eq!(player.facing, Direction::Right);
        assert_eq!(player.animation, AnimationState::Idle);
    }

    #[test]
    fn test_border_stops_player() {
        let grid = arena();
        let controller = PlayerController::default();
        let mut player = Player::new(1, Vec2::new(49.0, 72.0));
        let left = MoveIntent { left: 1.0, ..Default::default() };
        assert!(!controller.update_movement(&mut player, &grid, left, DT));
        assert_eq!(player.cell(48.0), IVec2::new(1, 1));
    }

    #[test]
    fn test_lane_alignment() {
        let grid = arena();
        let controller = PlayerController::default();

        // Within snap distance: snapped to the row center
        let mut player = Player::new(1, Vec2::new(72.0, 123.0));
        controller.update_movement(&mut player, &grid, right(), DT);
        assert_eq!(player.position.y, 120.0);

        // Within ease distance: one step toward the center
        let mut player = Player::new(1, Vec2::new(72.0, 130.0));
        controller.update_movement(&mut player, &grid, right(), DT);
        assert_eq!(player.position.y, 128.0);

        // Far off center: left alone
        let mut player = Player::new(1, Vec2::new(72.0, 142.0));
        controller.update_movement(&mut player, &grid, right(), DT);
        assert_eq!(player.position.y, 142.0);
    }

    #[test]
    fn test_vertical_movement_aligns_column() {
        let grid = arena();
        let controller = PlayerController::default();
        let mut player = Player::new(1, Vec2::new(75.0, 120.0));
        let down = MoveIntent { down: 1.0, ..Default::default() };
        assert!(controller.update_movement(&mut player, &grid, down, DT));
        assert_eq!(player.position, Vec2::new(72.0, 122.0));
        assert_eq!(player.facing, Direction::Down);
    }

    #[test]
    fn test_attack_holds_until_finished() {
        let grid = arena();
        let controller = PlayerController::default();
        let mut player = player_at(&grid, 1, 2);

        controller.start_attack(&mut player);
        controller.update_movement(&mut player, &grid, MoveIntent::default(), 0.1);
        assert_eq!(player.animation, AnimationState::Attack);
        controller.update_movement(&mut player, &grid, MoveIntent::default(), 0.25);
        assert_eq!(player.animation, AnimationState::Idle);
    }

    #[test]
    fn test_dead_players_do_not_move() {
        let grid = arena();
        let controller = PlayerController::default();
        let mut player = player_at(&grid, 1, 2);
        assert!(player.kill());
        assert!(!player.kill());
        assert!(!controller.update_movement(&mut player, &grid, right(), DT));
        assert_eq!(player.animation, AnimationState::Dead);
    }

    #[test]
    fn test_bomb_placement_tracks_identity() {
        let mut grid = arena();
        let controller = PlayerController::default();
        let mut bombs = BombRegistry::new();
        let mut player = player_at(&grid, 1, 2);

        let id = controller
            .request_bomb_placement(&mut player, &grid, &mut bombs)
            .unwrap();
        assert_eq!(player.active_bombs, vec![id]);
        assert_eq!(player.bombs_available(), 0);
        assert_eq!(
            controller.request_bomb_placement(&mut player, &grid, &mut bombs),
            Err(PlacementError::CellOccupiedByBomb)
        );

        let detonations = bombs.tick(FUSE_SECONDS, &mut grid);
        assert_eq!(detonations.len(), 1);
        assert!(player.bomb_detonated(id));
        // No double credit
        assert!(!player.bomb_detonated(id));
        assert_eq!(player.bombs_available(), 1);
    }

    #[test]
    fn test_dead_players_cannot_place() {
        let grid = arena();
        let controller = PlayerController::default();
        let mut bombs = BombRegistry::new();
        let mut player = player_at(&grid, 1, 2);
        player.kill();
        assert_eq!(
            controller.request_bomb_placement(&mut player, &grid, &mut bombs),
            Err(PlacementError::PlayerDead(1))
        );
    }

    #[test]
    fn test_power_ups() {
        let mut player = Player::new(1, Vec2::ZERO);
        player.apply_power_up(PowerUpKind::ExtraBomb);
        player.apply_power_up(PowerUpKind::LongerExplosion);
        player.apply_power_up(PowerUpKind::SpeedBoost);
        assert_eq!(player.bomb_capacity, 2);
        assert_eq!(player.blast_range, 2);
        assert!((player.move_speed - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_align_toward() {
        assert_eq!(align_toward(70.0, 72.0), 72.0);
        assert_eq!(align_toward(60.0, 72.0), 62.0);
        assert_eq!(align_toward(84.0, 72.0), 82.0);
        assert_eq!(align_toward(40.0, 72.0), 40.0);
    }
}
