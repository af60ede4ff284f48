//! Knockout tournament web app: library with models and bracket logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance, bracket_phase, list_matches, materialize, pair, register_competitors, set_winner,
    top_four, BracketPhase, MatchView, Pairing, RoundMatches, Standings, TopFour,
};
pub use models::{
    BracketMatch, BracketStage, Competitor, CompetitorId, MatchId, MatchState, SeedGroup,
    Tournament, TournamentError, TournamentId,
};
