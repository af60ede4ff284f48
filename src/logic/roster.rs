//! Competitor registration: seed-group split and roster lock.

use crate::models::{Competitor, SeedGroup, Tournament, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Register `names` into the tournament: shuffle, assign alternating seed
/// groups (so group sizes differ by at most one), compute the expected round
/// count, and lock the roster. A locked tournament rejects any further
/// registration with `AlreadyStarted`.
pub fn register_competitors<R: Rng>(
    tournament: &mut Tournament,
    names: &[String],
    rng: &mut R,
) -> Result<Vec<Competitor>, TournamentError> {
    if tournament.is_active {
        return Err(TournamentError::AlreadyStarted);
    }
    if names.len() < 2 {
        return Err(TournamentError::InsufficientCompetitors {
            supplied: names.len(),
        });
    }
    // Winners are declared by name, so duplicates would be ambiguous.
    for (i, name) in names.iter().enumerate() {
        if names[..i].iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateCompetitor(name.clone()));
        }
    }

    let mut shuffled: Vec<&String> = names.iter().collect();
    shuffled.shuffle(rng);

    let competitors: Vec<Competitor> = shuffled
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let group = if i % 2 == 0 { SeedGroup::A } else { SeedGroup::B };
            Competitor::new(name.as_str(), tournament.id, group)
        })
        .collect();

    tournament.expected_rounds = expected_rounds(names.len());
    tournament.is_active = true;
    tournament.competitors = competitors.clone();
    Ok(competitors)
}

/// ceil(log2(n)): rounds of halving until a single survivor remains.
fn expected_rounds(field_size: usize) -> u32 {
    field_size.next_power_of_two().trailing_zeros()
}
