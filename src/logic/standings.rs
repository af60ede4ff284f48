//! Match listing and final standings.

use crate::models::{BracketStage, CompetitorId, MatchId, MatchState, Tournament, TournamentError};
use serde::Serialize;
use std::collections::BTreeMap;

/// One match as rendered to callers: competitor names instead of ids.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchView {
    pub match_id: MatchId,
    pub round: u32,
    pub competitor_a: String,
    /// Absent for byes.
    pub competitor_b: Option<String>,
    pub winner: Option<String>,
    pub state: MatchState,
}

/// One round's matches under its "Round N" label.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundMatches {
    pub round: String,
    pub matches: Vec<MatchView>,
}

/// Matches grouped per round, labelled "Round N", in bracket order. Matches
/// keep their creation order within a round.
pub fn list_matches(tournament: &Tournament) -> Vec<RoundMatches> {
    let mut rounds: BTreeMap<u32, Vec<MatchView>> = BTreeMap::new();
    for m in &tournament.matches {
        rounds.entry(m.round).or_default().push(MatchView {
            match_id: m.id,
            round: m.round,
            competitor_a: display_name(tournament, m.competitor_a),
            competitor_b: m.competitor_b.map(|id| display_name(tournament, id)),
            winner: m.winner.map(|id| display_name(tournament, id)),
            state: m.state,
        });
    }
    rounds
        .into_iter()
        .map(|(round, matches)| RoundMatches {
            round: format!("Round {}", round),
            matches,
        })
        .collect()
}

/// Final ranking: 1st/2nd from the final, 3rd/4th from the consolation.
/// Third and fourth are absent when the field was too small to fill them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TopFour {
    pub first: String,
    pub second: String,
    pub third: Option<String>,
    pub fourth: Option<String>,
}

/// Outcome of a standings request: either the bracket still has matches to
/// play, or it has produced a full ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "ranking", rename_all = "snake_case")]
pub enum Standings {
    InProgress,
    Decided(TopFour),
}

/// Compute 1st-4th place once the final (and the consolation, when one
/// exists) is decided; `InProgress` until then.
pub fn top_four(tournament: &Tournament) -> Result<Standings, TournamentError> {
    let final_match = match tournament.stage_match(BracketStage::Final) {
        Some(m) if m.is_finished() => m,
        _ => return Ok(Standings::InProgress),
    };
    let consolation = tournament.stage_match(BracketStage::Consolation);
    if consolation.is_some_and(|m| !m.is_finished()) {
        return Ok(Standings::InProgress);
    }

    let first = final_match.winner.ok_or_else(|| {
        TournamentError::InvariantViolation("finished final has no winner".to_string())
    })?;
    let second = final_match.loser().ok_or_else(|| {
        TournamentError::InvariantViolation("final has no second competitor".to_string())
    })?;
    // No consolation slot only happens for two-competitor fields, which have
    // nobody left to rank third.
    let (third, fourth) = match consolation {
        Some(m) => (m.winner, m.loser()),
        None => (None, None),
    };

    Ok(Standings::Decided(TopFour {
        first: display_name(tournament, first),
        second: display_name(tournament, second),
        third: third.map(|id| display_name(tournament, id)),
        fourth: fourth.map(|id| display_name(tournament, id)),
    }))
}

/// Render path only: an unknown id falls back to the raw id rather than
/// failing the whole listing.
fn display_name(tournament: &Tournament, id: CompetitorId) -> String {
    tournament
        .competitor(id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| id.to_string())
}
