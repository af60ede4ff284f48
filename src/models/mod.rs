//! Data structures for the tournament engine: competitors, matches, tournaments.

mod bracket;
mod competitor;
mod tournament;

pub use bracket::{BracketMatch, BracketStage, MatchId, MatchState};
pub use competitor::{Competitor, CompetitorId, SeedGroup};
pub use tournament::{Tournament, TournamentError, TournamentId};
