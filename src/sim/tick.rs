//! Simulation driver
//!
//! Owns the grid, both registries, the players and the round resolver, and
//! advances them in a fixed order every tick:
//! movement/intents -> fuses -> blasts -> blast aging -> collisions/score.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bomb::{BombId, BombRegistry};
use super::explosion::ExplosionRegistry;
use super::grid::{Cell, Grid};
use super::player::{MoveIntent, Player, PlayerController, PlayerId};
use super::round::{RoundOutcome, RoundPhase, RoundResolver};
use super::snapshot::Snapshot;
use crate::consts::{MAX_PLAYERS, MIN_PLAYERS};
use crate::error::{PlacementError, SetupError};
use crate::settings::Settings;

/// Input for one player for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub up: f32,
    pub down: f32,
    pub left: f32,
    pub right: f32,
    pub attack: bool,
    /// Bomb key held; a bomb is placed on the press edge only
    pub place_bomb: bool,
}

impl TickInput {
    pub fn movement(&self) -> MoveIntent {
        MoveIntent {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    BombPlaced {
        player: PlayerId,
        bomb: BombId,
        cell: IVec2,
    },
    BombDetonated {
        bomb: BombId,
        owner: PlayerId,
        cell: IVec2,
    },
    BlockDestroyed {
        cell: IVec2,
    },
    PlayerKilled {
        victim: PlayerId,
        credited: Vec<PlayerId>,
    },
    RoundOver {
        outcome: RoundOutcome,
    },
}

/// One round of the arena
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    grid: Grid,
    bombs: BombRegistry,
    explosions: ExplosionRegistry,
    players: Vec<Player>,
    controller: PlayerController,
    resolver: RoundResolver,
    /// Bomb key state last tick, per player (for edge detection)
    bomb_held: Vec<bool>,
    time_ticks: u64,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Set up a round on a generated classic arena with corner spawns
    pub fn new(settings: Settings) -> Result<Self, SetupError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let grid = Grid::classic(
            settings.grid_width,
            settings.grid_height,
            settings.tile_size,
            settings.brick_density,
            &mut rng,
        )?;
        let spawns: Vec<IVec2> = grid
            .corner_spawns()
            .into_iter()
            .take(settings.player_count)
            .collect();
        Self::with_grid(settings, grid, &spawns)
    }

    /// Set up a round on a supplied grid. Player `i + 1` spawns at `spawns[i]`;
    /// `settings.player_count` is not consulted.
    pub fn with_grid(settings: Settings, mut grid: Grid, spawns: &[IVec2]) -> Result<Self, SetupError> {
        settings.validate()?;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&spawns.len()) {
            return Err(SetupError::PlayerCount {
                got: spawns.len(),
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }

        let mut players = Vec::with_capacity(spawns.len());
        for (idx, &spawn) in spawns.iter().enumerate() {
            if grid.get(spawn) == Some(Cell::Brick) {
                log::warn!("Spawn cell {} held a brick; clearing it", spawn);
                grid.destroy_block(spawn.x, spawn.y);
            }
            if !grid.is_walkable(spawn.x, spawn.y) {
                return Err(SetupError::BlockedSpawn {
                    x: spawn.x,
                    y: spawn.y,
                });
            }

            let mut player = Player::new(idx as PlayerId + 1, grid.cell_to_pixel(spawn));
            player.bomb_capacity = settings.starting_bomb_capacity;
            player.blast_range = settings.starting_blast_range;
            players.push(player);
        }

        let controller = PlayerController {
            base_speed: settings.base_move_speed,
            fuse_seconds: settings.fuse_seconds,
            attack_duration: settings.attack_duration,
        };

        log::info!(
            "Round started: {}x{} arena, {} players",
            grid.width(),
            grid.height(),
            players.len()
        );

        Ok(Self {
            explosions: ExplosionRegistry::new(settings.explosion_ttl),
            bombs: BombRegistry::new(),
            resolver: RoundResolver::new(&players),
            bomb_held: vec![false; players.len()],
            controller,
            players,
            grid,
            settings,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Advance the round by `dt` seconds. `inputs[i]` drives player `i + 1`;
    /// missing inputs count as idle. Does nothing once the round is over.
    pub fn tick(&mut self, inputs: &[TickInput], dt: f32) {
        self.events.clear();
        if self.resolver.is_over() {
            return;
        }
        self.time_ticks += 1;

        // Movement and intents
        for (idx, player) in self.players.iter_mut().enumerate() {
            let input = inputs.get(idx).copied().unwrap_or_default();
            let intent = input.movement();

            self.controller
                .update_movement(player, &self.grid, intent, dt);

            if input.attack && intent.held() <= 1.0 {
                self.controller.start_attack(player);
            }

            let pressed = input.place_bomb && !self.bomb_held[idx];
            self.bomb_held[idx] = input.place_bomb;
            if !pressed {
                continue;
            }
            match self
                .controller
                .request_bomb_placement(player, &self.grid, &mut self.bombs)
            {
                Ok(bomb) => self.events.push(SimEvent::BombPlaced {
                    player: player.id,
                    bomb,
                    cell: player.cell(self.grid.tile_size()),
                }),
                Err(err) => log::debug!("Player {} bomb rejected: {}", player.id, err),
            }
        }

        // Fuses and blasts
        for detonation in self.bombs.tick(dt, &mut self.grid) {
            let bomb = &detonation.bomb;
            if let Some(owner) = self.players.iter_mut().find(|p| p.id == bomb.owner) {
                owner.bomb_detonated(bomb.id);
            }
            self.events.push(SimEvent::BombDetonated {
                bomb: bomb.id,
                owner: bomb.owner,
                cell: bomb.cell,
            });
            self.events.extend(
                detonation
                    .blast
                    .destroyed
                    .iter()
                    .map(|&cell| SimEvent::BlockDestroyed { cell }),
            );
            self.explosions.spawn(detonation.blast.cells);
        }

        self.explosions.tick(dt);

        // Collisions, score, win condition
        let kills = self
            .resolver
            .resolve(&mut self.players, &self.explosions, self.grid.tile_size());
        self.events.extend(kills.into_iter().map(|kill| SimEvent::PlayerKilled {
            victim: kill.victim,
            credited: kill.credited,
        }));
        if self.resolver.is_over() {
            self.events.push(SimEvent::RoundOver {
                outcome: self.resolver.outcome(),
            });
        }

        log::trace!(
            "Tick {}: {} bombs, {} blast cells",
            self.time_ticks,
            self.bombs.len(),
            self.explosions.len()
        );
    }

    /// Place a bomb for a player outside the tick loop
    pub fn request_bomb_placement(&mut self, player: PlayerId) -> Result<BombId, PlacementError> {
        if self.resolver.is_over() {
            return Err(PlacementError::RoundOver);
        }
        let Some(p) = self.players.iter_mut().find(|p| p.id == player) else {
            return Err(PlacementError::UnknownPlayer(player));
        };
        let bomb = self
            .controller
            .request_bomb_placement(p, &self.grid, &mut self.bombs)?;
        self.events.push(SimEvent::BombPlaced {
            player,
            bomb,
            cell: p.cell(self.grid.tile_size()),
        });
        Ok(bomb)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bombs(&self) -> &BombRegistry {
        &self.bombs
    }

    pub fn explosions(&self) -> &ExplosionRegistry {
        &self.explosions
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Mutable access for round setup (stats, power-ups)
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn resolver(&self) -> &RoundResolver {
        &self.resolver
    }

    pub fn phase(&self) -> RoundPhase {
        self.resolver.phase()
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.resolver.outcome()
    }

    /// Events from the most recent tick
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
