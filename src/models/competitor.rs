//! Competitor data structures.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor (used in matches and lookups).
pub type CompetitorId = Uuid;

/// Which half of the bracket a competitor is seeded into. The two halves are
/// paired independently, so competitors from opposite groups can only meet in
/// the final.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedGroup {
    A,
    B,
}

/// A competitor registered in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub tournament_id: TournamentId,
    pub seed_group: SeedGroup,
    /// False once the competitor has lost a decided match.
    pub active: bool,
}

impl Competitor {
    /// Create a new active competitor in the given tournament and seed group.
    pub fn new(
        name: impl Into<String>,
        tournament_id: TournamentId,
        seed_group: SeedGroup,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tournament_id,
            seed_group,
            active: true,
        }
    }

    /// Mark the competitor as eliminated.
    pub fn eliminate(&mut self) {
        self.active = false;
    }
}
