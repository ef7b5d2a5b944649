//! Round resolution: blast collisions, kills, score, and the win condition

use std::collections::{BTreeMap, BTreeSet};

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::explosion::ExplosionRegistry;
use super::player::{Player, PlayerId};

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    #[default]
    Playing,
    /// Terminal
    Over,
}

/// How the round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundOutcome {
    #[default]
    InProgress,
    /// Nobody survived
    Draw,
    Winner(PlayerId),
}

/// A player killed this tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kill {
    pub victim: PlayerId,
    pub cell: IVec2,
    /// Distinct owners of the blasts that hit the victim (victim excluded)
    pub credited: Vec<PlayerId>,
}

/// Collision, score and game-over bookkeeping for one round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundResolver {
    phase: RoundPhase,
    outcome: RoundOutcome,
    scores: BTreeMap<PlayerId, u32>,
}

impl RoundResolver {
    /// Fresh round with every player on zero
    pub fn new(players: &[Player]) -> Self {
        Self {
            phase: RoundPhase::Playing,
            outcome: RoundOutcome::InProgress,
            scores: players.iter().map(|p| (p.id, 0)).collect(),
        }
    }

    /// Kill every living player standing in a live blast, credit the blast
    /// owners, then re-evaluate the win condition.
    pub fn resolve(
        &mut self,
        players: &mut [Player],
        explosions: &ExplosionRegistry,
        tile_size: f32,
    ) -> Vec<Kill> {
        if self.phase == RoundPhase::Over {
            return Vec::new();
        }

        let mut kills = Vec::new();
        for player in players.iter_mut().filter(|p| p.alive) {
            let cell = player.cell(tile_size);
            let owners = explosions.occupies(cell);
            if owners.is_empty() || !player.kill() {
                continue;
            }

            // One point per distinct killer, however many blast cells overlap
            let credited: Vec<PlayerId> = owners
                .into_iter()
                .filter(|&owner| owner != player.id)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            for &owner in &credited {
                *self.scores.entry(owner).or_insert(0) += 1;
            }

            log::debug!(
                "Player {} killed at {} (credited: {:?})",
                player.id,
                cell,
                credited
            );
            kills.push(Kill {
                victim: player.id,
                cell,
                credited,
            });
        }

        self.outcome = Self::evaluate(players);
        if self.outcome != RoundOutcome::InProgress {
            self.phase = RoundPhase::Over;
            log::info!("Round over: {:?}", self.outcome);
        }
        kills
    }

    /// Outcome for the current alive set
    pub fn evaluate(players: &[Player]) -> RoundOutcome {
        let mut alive = players.iter().filter(|p| p.alive);
        match (alive.next(), alive.next()) {
            (None, _) => RoundOutcome::Draw,
            (Some(p), None) => RoundOutcome::Winner(p.id),
            _ => RoundOutcome::InProgress,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::Over
    }

    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores.get(&player).copied().unwrap_or(0)
    }

    pub fn scores(&self) -> &BTreeMap<PlayerId, u32> {
        &self.scores
    }
}
