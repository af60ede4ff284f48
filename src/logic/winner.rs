//! Winner resolution for pending matches.

use crate::models::{
    BracketMatch, CompetitorId, MatchId, MatchState, Tournament, TournamentError,
};

/// Record `winner_name` as the winner of the match and eliminate the loser.
///
/// Rejected with `AlreadyFinished` for decided matches (byes are born
/// finished, so they land here too) and `InvalidWinner` when the name is on
/// neither side. This is the only path that clears a competitor's `active`
/// flag.
pub fn set_winner(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner_name: &str,
) -> Result<BracketMatch, TournamentError> {
    let (side_a, side_b) = {
        let m = tournament
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        if m.is_finished() {
            return Err(TournamentError::AlreadyFinished(match_id));
        }
        (m.competitor_a, m.competitor_b)
    };

    let (winner_id, loser_id) = if has_name(tournament, side_a, winner_name) {
        (side_a, side_b)
    } else {
        match side_b {
            Some(b) if has_name(tournament, b, winner_name) => (b, Some(side_a)),
            _ => return Err(TournamentError::InvalidWinner(winner_name.to_string())),
        }
    };

    if let Some(loser_id) = loser_id {
        let loser = tournament.competitor_mut(loser_id).ok_or_else(|| {
            TournamentError::InvariantViolation(format!(
                "match {} references unknown competitor {}",
                match_id, loser_id
            ))
        })?;
        loser.eliminate();
    }

    let m = tournament
        .find_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.winner = Some(winner_id);
    m.state = MatchState::Finished;
    Ok(m.clone())
}

fn has_name(tournament: &Tournament, id: CompetitorId, name: &str) -> bool {
    tournament.competitor(id).map(|c| c.name.as_str()) == Some(name)
}
