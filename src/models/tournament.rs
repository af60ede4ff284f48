//! Tournament aggregate and TournamentError.

use crate::models::bracket::{BracketMatch, BracketStage, MatchId};
use crate::models::competitor::{Competitor, CompetitorId, SeedGroup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// No tournament with this id.
    TournamentNotFound(TournamentId),
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// Fewer than two competitor names supplied at registration.
    InsufficientCompetitors { supplied: usize },
    /// Registration attempted after the roster was locked.
    AlreadyStarted,
    /// Two registered names collide (names are unique, case-insensitive).
    DuplicateCompetitor(String),
    /// The declared winner is on neither side of the match.
    InvalidWinner(String),
    /// A result was already recorded for this match.
    AlreadyFinished(MatchId),
    /// Tournament end date is not strictly after its start date.
    InvalidSchedule,
    /// Bracket math reached a state that should be unreachable.
    InvariantViolation(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TournamentNotFound(id) => {
                write!(f, "Tournament with ID {} not found", id)
            }
            TournamentError::MatchNotFound(id) => write!(f, "Match with ID {} not found", id),
            TournamentError::InsufficientCompetitors { supplied } => {
                write!(f, "Need at least 2 competitors to register (got {})", supplied)
            }
            TournamentError::AlreadyStarted => write!(f, "Tournament has already started"),
            TournamentError::DuplicateCompetitor(name) => {
                write!(f, "Competitor name {:?} is already registered", name)
            }
            TournamentError::InvalidWinner(name) => {
                write!(f, "{:?} is not a competitor in this match", name)
            }
            TournamentError::AlreadyFinished(id) => {
                write!(f, "Match {} already has a result", id)
            }
            TournamentError::InvalidSchedule => {
                write!(f, "Tournament end date must be after its start date")
            }
            TournamentError::InvariantViolation(detail) => {
                write!(f, "Bracket invariant violated: {}", detail)
            }
        }
    }
}

/// Full tournament state: schedule, roster, and bracket history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    /// Elimination rounds needed for the field size; fixed at registration.
    pub expected_rounds: u32,
    /// True once competitors are registered and the roster is locked.
    pub is_active: bool,
    pub competitors: Vec<Competitor>,
    /// Every match ever created for this tournament, across all rounds.
    pub matches: Vec<BracketMatch>,
}

impl Tournament {
    /// Create a tournament with an empty roster. The end date must be
    /// strictly after the start date.
    pub fn new(
        name: impl Into<String>,
        date_start: DateTime<Utc>,
        date_end: DateTime<Utc>,
    ) -> Result<Self, TournamentError> {
        if date_end <= date_start {
            return Err(TournamentError::InvalidSchedule);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date_start,
            date_end,
            expected_rounds: 0,
            is_active: false,
            competitors: Vec::new(),
            matches: Vec::new(),
        })
    }

    /// Look up a competitor by id.
    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Mutable competitor lookup by id.
    pub fn competitor_mut(&mut self, id: CompetitorId) -> Option<&mut Competitor> {
        self.competitors.iter_mut().find(|c| c.id == id)
    }

    /// Competitors still in the running.
    pub fn active_competitors(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.iter().filter(|c| c.active)
    }

    /// Ids of the still-active competitors in one seed group, in roster order.
    pub fn active_in_group(&self, group: SeedGroup) -> Vec<CompetitorId> {
        self.competitors
            .iter()
            .filter(|c| c.active && c.seed_group == group)
            .map(|c| c.id)
            .collect()
    }

    /// Highest round number present, or 0 when no matches exist.
    pub fn current_round(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    /// The round the final occupies, one past the consolation slot.
    pub fn target_round(&self) -> u32 {
        self.expected_rounds + 1
    }

    /// The unique consolation or final match, if it has been created.
    /// Elimination matches are not unique per stage; use round lookups instead.
    pub fn stage_match(&self, stage: BracketStage) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.stage == stage)
    }

    /// Mutable match lookup by id.
    pub fn find_match_mut(&mut self, id: MatchId) -> Option<&mut BracketMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }
}
