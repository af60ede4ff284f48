//! Round pairing: shuffle a pool into match pairs, with an automatic bye for
//! an odd leftover.

use crate::models::{BracketMatch, BracketStage, CompetitorId, TournamentId};
use rand::seq::SliceRandom;
use rand::Rng;

/// One slot produced for a round: a real match or an automatic bye.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pairing {
    Versus(CompetitorId, CompetitorId),
    Bye(CompetitorId),
}

/// Shuffle `pool` and pair consecutive entries. An odd pool leaves one
/// competitor over after the shuffle; that competitor becomes a bye.
/// A pool of `k` yields `k / 2` Versus pairings and `k % 2` byes.
pub fn pair<R: Rng>(mut pool: Vec<CompetitorId>, rng: &mut R) -> Vec<Pairing> {
    pool.shuffle(rng);
    let mut pairings: Vec<Pairing> = pool
        .chunks_exact(2)
        .map(|pair| Pairing::Versus(pair[0], pair[1]))
        .collect();
    if pool.len() % 2 == 1 {
        // chunks_exact leaves exactly the last entry unpaired
        pairings.push(Pairing::Bye(pool[pool.len() - 1]));
    }
    pairings
}

/// Turn pairings into matches for one round. Versus pairings become pending
/// matches; byes are created already finished with their competitor as winner,
/// so no result submission is needed (or accepted) for them.
pub fn materialize(
    pairings: &[Pairing],
    tournament_id: TournamentId,
    round: u32,
) -> Vec<BracketMatch> {
    pairings
        .iter()
        .map(|pairing| match *pairing {
            Pairing::Versus(a, b) => {
                BracketMatch::pending(tournament_id, round, BracketStage::Elimination, a, b)
            }
            Pairing::Bye(competitor) => {
                BracketMatch::bye(tournament_id, round, BracketStage::Elimination, competitor)
            }
        })
        .collect()
}
