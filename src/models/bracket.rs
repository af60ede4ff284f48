//! BracketMatch, MatchState, and BracketStage.

use crate::models::competitor::CompetitorId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Whether a match still needs a result.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    #[default]
    Pending,
    Finished,
}

/// Which slot of the bracket this match fills.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketStage {
    /// A regular knockout match in rounds 1..expected_rounds-1.
    Elimination,
    /// Third-place match between the semifinal losers.
    Consolation,
    /// The championship match between the two group survivors.
    Final,
}

/// A single bracket match: one or two competitors and an optional winner.
/// A match with no `competitor_b` is a bye and is created already finished.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based round number within the tournament's bracket.
    pub round: u32,
    pub competitor_a: CompetitorId,
    /// None when the match is a bye.
    pub competitor_b: Option<CompetitorId>,
    /// Set only when `state` is Finished.
    pub winner: Option<CompetitorId>,
    pub state: MatchState,
    pub stage: BracketStage,
}

impl BracketMatch {
    /// A two-sided match waiting for a result.
    pub fn pending(
        tournament_id: TournamentId,
        round: u32,
        stage: BracketStage,
        competitor_a: CompetitorId,
        competitor_b: CompetitorId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            competitor_a,
            competitor_b: Some(competitor_b),
            winner: None,
            state: MatchState::Pending,
            stage,
        }
    }

    /// A bye: the sole competitor advances without playing, so the match is
    /// born finished with that competitor as winner.
    pub fn bye(
        tournament_id: TournamentId,
        round: u32,
        stage: BracketStage,
        competitor: CompetitorId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            competitor_a: competitor,
            competitor_b: None,
            winner: Some(competitor),
            state: MatchState::Finished,
            stage,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == MatchState::Finished
    }

    /// The competitor that lost this match, if one can be identified.
    /// Byes and pending matches have no loser.
    pub fn loser(&self) -> Option<CompetitorId> {
        match (self.winner, self.competitor_b) {
            (Some(winner), Some(b)) => {
                if winner == self.competitor_a {
                    Some(b)
                } else {
                    Some(self.competitor_a)
                }
            }
            _ => None,
        }
    }
}
