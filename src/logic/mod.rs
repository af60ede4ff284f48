//! Tournament business logic: registration, pairing, progression, results.

mod pairing;
mod progression;
mod roster;
mod standings;
mod winner;

pub use pairing::{materialize, pair, Pairing};
pub use progression::{advance, bracket_phase, BracketPhase};
pub use roster::register_competitors;
pub use standings::{list_matches, top_four, MatchView, RoundMatches, Standings, TopFour};
pub use winner::set_winner;
