//! Bracket progression: decide and perform the next build step for a
//! tournament.
//!
//! The bracket occupies rounds 1..=expected_rounds+1: eliminations up to
//! expected_rounds-1, the consolation slot at expected_rounds, and the final
//! one past it. Nothing here is stored between calls; the phase is re-derived
//! from the persisted matches every time, so `advance` can be retried freely.

use crate::logic::pairing;
use crate::models::{
    BracketMatch, BracketStage, CompetitorId, MatchState, SeedGroup, Tournament, TournamentError,
};
use rand::Rng;

/// Where the bracket stands, derived from the match history alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BracketPhase {
    /// No matches yet.
    Empty,
    /// The most recent round still has a pending match.
    RoundInProgress,
    /// The most recent round is decided and more eliminations are needed.
    RoundComplete,
    /// Two competitors remain but the third-place match has not been created.
    AwaitingConsolation,
    /// Two competitors remain and the consolation slot is settled; the final
    /// has not been created.
    AwaitingFinal,
    /// Final and consolation are both decided.
    Complete,
}

/// Classify the bracket. Read-only; `advance` acts on the result.
pub fn bracket_phase(tournament: &Tournament) -> Result<BracketPhase, TournamentError> {
    let current = tournament.current_round();
    let latest_pending = tournament
        .matches
        .iter()
        .any(|m| m.round == current && m.state == MatchState::Pending);
    if latest_pending {
        return Ok(BracketPhase::RoundInProgress);
    }
    if tournament.stage_match(BracketStage::Final).is_some() {
        // A pending final would have been caught above.
        return Ok(BracketPhase::Complete);
    }

    match tournament.active_competitors().count() {
        n @ (0 | 1) => {
            let violation =
                format!("{} active competitors but no final match exists", n);
            log::error!("tournament {}: {}", tournament.id, violation);
            Err(TournamentError::InvariantViolation(violation))
        }
        2 => {
            if consolation_due(tournament) {
                Ok(BracketPhase::AwaitingConsolation)
            } else {
                Ok(BracketPhase::AwaitingFinal)
            }
        }
        _ if tournament.matches.is_empty() => Ok(BracketPhase::Empty),
        _ => Ok(BracketPhase::RoundComplete),
    }
}

/// A third-place match is owed once the bracket is down to two competitors,
/// unless the field was too small to ever have semifinals (two-competitor
/// tournaments go straight to the final).
fn consolation_due(tournament: &Tournament) -> bool {
    tournament.expected_rounds >= 2
        && tournament.stage_match(BracketStage::Consolation).is_none()
}

/// Advance the bracket one step if a step is due. Safe to call repeatedly:
/// while the latest round has a pending match, or once the bracket is
/// complete, this is a no-op.
pub fn advance<R: Rng>(tournament: &mut Tournament, rng: &mut R) -> Result<(), TournamentError> {
    match bracket_phase(tournament)? {
        BracketPhase::RoundInProgress | BracketPhase::Complete => Ok(()),
        BracketPhase::Empty | BracketPhase::RoundComplete => build_next_round(tournament, rng),
        BracketPhase::AwaitingConsolation => build_consolation(tournament),
        BracketPhase::AwaitingFinal => build_final(tournament),
    }
}

/// Pair the still-active competitors of each seed group independently and
/// persist the resulting matches at the next round number.
fn build_next_round<R: Rng>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    let round = tournament.current_round() + 1;
    let mut new_matches = Vec::new();
    for group in [SeedGroup::A, SeedGroup::B] {
        let pool = tournament.active_in_group(group);
        let pairings = pairing::pair(pool, rng);
        new_matches.extend(pairing::materialize(&pairings, tournament.id, round));
    }
    log::debug!(
        "tournament {}: built round {} with {} match(es)",
        tournament.id,
        round,
        new_matches.len()
    );
    tournament.matches.extend(new_matches);
    Ok(())
}

/// Create the third-place match from the semifinal losers. With a single
/// identifiable loser (a semifinal was a bye) the slot is recorded as already
/// decided, bye-style.
fn build_consolation(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let semifinal_round = tournament.current_round();
    let losers: Vec<CompetitorId> = tournament
        .matches
        .iter()
        .filter(|m| m.round == semifinal_round)
        .filter_map(|m| m.loser())
        .collect();

    let round = tournament.target_round() - 1;
    let consolation = match losers[..] {
        [a, b] => BracketMatch::pending(tournament.id, round, BracketStage::Consolation, a, b),
        [sole_loser] => BracketMatch::bye(tournament.id, round, BracketStage::Consolation, sole_loser),
        _ => {
            let violation = format!(
                "round {} yielded {} losers for the consolation slot",
                semifinal_round,
                losers.len()
            );
            log::error!("tournament {}: {}", tournament.id, violation);
            return Err(TournamentError::InvariantViolation(violation));
        }
    };
    log::debug!(
        "tournament {}: built consolation at round {}",
        tournament.id,
        round
    );
    tournament.matches.push(consolation);
    Ok(())
}

/// Create the final between the two remaining active competitors.
fn build_final(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let finalists: Vec<CompetitorId> = tournament.active_competitors().map(|c| c.id).collect();
    let (a, b) = match finalists[..] {
        [a, b] => (a, b),
        _ => {
            let violation = format!("{} finalists for the final match", finalists.len());
            log::error!("tournament {}: {}", tournament.id, violation);
            return Err(TournamentError::InvariantViolation(violation));
        }
    };
    let round = tournament.target_round();
    log::debug!("tournament {}: built final at round {}", tournament.id, round);
    tournament
        .matches
        .push(BracketMatch::pending(tournament.id, round, BracketStage::Final, a, b));
    Ok(())
}
