//! Integration tests for bracket progression: round building, byes,
//! consolation and final construction, winner resolution, standings.

use chrono::{TimeZone, Utc};
use knockout_tournament_web::{
    advance, bracket_phase, list_matches, register_competitors, set_winner, top_four,
    BracketPhase, BracketStage, MatchState, Standings, Tournament, TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn tournament_with(names: &[&str]) -> Tournament {
    let mut t = Tournament::new(
        "Test Open",
        Utc.with_ymd_and_hms(2024, 1, 29, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 2, 5, 18, 0, 0).unwrap(),
    )
    .unwrap();
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    register_competitors(&mut t, &names, &mut rng()).unwrap();
    t
}

fn name_of(t: &Tournament, id: Uuid) -> String {
    t.competitor(id).unwrap().name.clone()
}

/// Resolve every pending match in the latest round in favor of side A.
fn resolve_latest_round(t: &mut Tournament) {
    let round = t.current_round();
    let pending: Vec<(Uuid, Uuid)> = t
        .matches
        .iter()
        .filter(|m| m.round == round && m.state == MatchState::Pending)
        .map(|m| (m.id, m.competitor_a))
        .collect();
    for (match_id, competitor_a) in pending {
        let winner = name_of(t, competitor_a);
        set_winner(t, match_id, &winner).unwrap();
    }
}

#[test]
fn two_competitor_field_goes_straight_to_final() {
    let mut t = tournament_with(&["Ana", "Bruno"]);
    let mut r = rng();
    advance(&mut t, &mut r).unwrap();

    assert_eq!(t.matches.len(), 1);
    let final_match = t.matches[0].clone();
    assert_eq!(final_match.stage, BracketStage::Final);
    assert_eq!(final_match.round, t.expected_rounds + 1);
    assert_eq!(final_match.state, MatchState::Pending);

    set_winner(&mut t, final_match.id, "Ana").unwrap();
    match top_four(&t).unwrap() {
        Standings::Decided(ranking) => {
            assert_eq!(ranking.first, "Ana");
            assert_eq!(ranking.second, "Bruno");
            assert_eq!(ranking.third, None);
            assert_eq!(ranking.fourth, None);
        }
        Standings::InProgress => panic!("two-competitor bracket should be decided"),
    }
}

#[test]
fn advance_is_a_noop_while_a_round_is_pending() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    let mut r = rng();
    advance(&mut t, &mut r).unwrap();
    assert_eq!(t.matches.len(), 2);

    advance(&mut t, &mut r).unwrap();
    assert_eq!(t.matches.len(), 2, "second advance must not build anything");
    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::RoundInProgress);
}

#[test]
fn round_one_pairs_within_seed_groups() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    advance(&mut t, &mut rng()).unwrap();

    assert_eq!(t.matches.len(), 2);
    for m in &t.matches {
        assert_eq!(m.round, 1);
        assert_eq!(m.state, MatchState::Pending);
        let a = t.competitor(m.competitor_a).unwrap();
        let b = t.competitor(m.competitor_b.unwrap()).unwrap();
        assert_eq!(a.seed_group, b.seed_group, "round 1 must not cross groups");
    }
}

#[test]
fn odd_seed_group_gets_a_bye() {
    // 3 competitors split 2/1: the pair plays, the loner advances on a bye
    let mut t = tournament_with(&["Ana", "Bruno", "Carla"]);
    advance(&mut t, &mut rng()).unwrap();

    assert_eq!(t.matches.len(), 2);
    let real = t.matches.iter().find(|m| m.competitor_b.is_some()).unwrap();
    assert_eq!(real.state, MatchState::Pending);
    let bye = t.matches.iter().find(|m| m.competitor_b.is_none()).unwrap();
    assert_eq!(bye.state, MatchState::Finished);
    assert_eq!(bye.winner, Some(bye.competitor_a));
}

#[test]
fn losing_competitor_is_deactivated() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    advance(&mut t, &mut rng()).unwrap();

    let m = t.matches[0].clone();
    let winner = name_of(&t, m.competitor_a);
    let loser_id = m.competitor_b.unwrap();
    set_winner(&mut t, m.id, &winner).unwrap();

    assert!(!t.competitor(loser_id).unwrap().active);
    let deactivated = t.competitors.iter().filter(|c| !c.active).count();
    assert_eq!(deactivated, 1, "only the loser's flag may change");
}

#[test]
fn four_competitor_end_to_end() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    let mut r = rng();

    advance(&mut t, &mut r).unwrap();
    assert_eq!(t.matches.len(), 2);
    let semifinal_winners: Vec<String> =
        t.matches.iter().map(|m| name_of(&t, m.competitor_a)).collect();
    let semifinal_losers: Vec<String> = t
        .matches
        .iter()
        .map(|m| name_of(&t, m.competitor_b.unwrap()))
        .collect();
    resolve_latest_round(&mut t);

    // both semifinals decided: next step is the third-place match
    advance(&mut t, &mut r).unwrap();
    let consolation = t.stage_match(BracketStage::Consolation).unwrap().clone();
    assert_eq!(consolation.round, 2);
    assert_eq!(consolation.state, MatchState::Pending);
    let consolation_names = vec![
        name_of(&t, consolation.competitor_a),
        name_of(&t, consolation.competitor_b.unwrap()),
    ];
    for loser in &semifinal_losers {
        assert!(consolation_names.contains(loser));
    }

    // the pending consolation blocks the final
    advance(&mut t, &mut r).unwrap();
    assert!(t.stage_match(BracketStage::Final).is_none());

    resolve_latest_round(&mut t);
    advance(&mut t, &mut r).unwrap();
    let final_match = t.stage_match(BracketStage::Final).unwrap().clone();
    assert_eq!(final_match.round, 3);
    let finalist_names = vec![
        name_of(&t, final_match.competitor_a),
        name_of(&t, final_match.competitor_b.unwrap()),
    ];
    for winner in &semifinal_winners {
        assert!(finalist_names.contains(winner));
    }

    resolve_latest_round(&mut t);
    let ranking = match top_four(&t).unwrap() {
        Standings::Decided(ranking) => ranking,
        Standings::InProgress => panic!("bracket should be decided"),
    };
    assert_eq!(ranking.first, name_of(&t, final_match.competitor_a));
    assert_eq!(ranking.second, name_of(&t, final_match.competitor_b.unwrap()));
    assert_eq!(ranking.third.as_deref(), Some(consolation_names[0].as_str()));
    assert_eq!(ranking.fourth.as_deref(), Some(consolation_names[1].as_str()));

    // the decided bracket is inert
    let built = t.matches.len();
    advance(&mut t, &mut r).unwrap();
    assert_eq!(t.matches.len(), built);
}

#[test]
fn phases_track_bracket_progress() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    let mut r = rng();

    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::Empty);
    advance(&mut t, &mut r).unwrap();
    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::RoundInProgress);
    resolve_latest_round(&mut t);
    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::AwaitingConsolation);
    advance(&mut t, &mut r).unwrap();
    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::RoundInProgress);
    resolve_latest_round(&mut t);
    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::AwaitingFinal);
    advance(&mut t, &mut r).unwrap();
    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::RoundInProgress);
    resolve_latest_round(&mut t);
    assert_eq!(bracket_phase(&t).unwrap(), BracketPhase::Complete);
}

#[test]
fn three_competitor_field_pre_decides_consolation() {
    let mut t = tournament_with(&["Ana", "Bruno", "Carla"]);
    let mut r = rng();

    advance(&mut t, &mut r).unwrap();
    let real = t.matches.iter().find(|m| m.competitor_b.is_some()).unwrap();
    let semifinal_loser = name_of(&t, real.competitor_b.unwrap());
    resolve_latest_round(&mut t);

    // only one identifiable loser: the third-place slot is settled on creation
    advance(&mut t, &mut r).unwrap();
    let consolation = t.stage_match(BracketStage::Consolation).unwrap().clone();
    assert_eq!(consolation.round, 2);
    assert_eq!(consolation.state, MatchState::Finished);
    assert_eq!(consolation.competitor_b, None);
    assert_eq!(name_of(&t, consolation.winner.unwrap()), semifinal_loser);

    advance(&mut t, &mut r).unwrap();
    let final_match = t.stage_match(BracketStage::Final).unwrap().clone();
    assert_eq!(final_match.round, 3);
    resolve_latest_round(&mut t);

    let ranking = match top_four(&t).unwrap() {
        Standings::Decided(ranking) => ranking,
        Standings::InProgress => panic!("bracket should be decided"),
    };
    assert_eq!(ranking.third, Some(semifinal_loser));
    assert_eq!(ranking.fourth, None);
}

#[test]
fn set_winner_validates_name_and_state() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    advance(&mut t, &mut rng()).unwrap();
    let match_id = t.matches[0].id;

    assert!(matches!(
        set_winner(&mut t, match_id, "Zed"),
        Err(TournamentError::InvalidWinner(_))
    ));

    let winner = name_of(&t, t.matches[0].competitor_a);
    set_winner(&mut t, match_id, &winner).unwrap();
    assert!(matches!(
        set_winner(&mut t, match_id, &winner),
        Err(TournamentError::AlreadyFinished(_))
    ));

    assert!(matches!(
        set_winner(&mut t, Uuid::new_v4(), &winner),
        Err(TournamentError::MatchNotFound(_))
    ));
}

#[test]
fn bye_match_rejects_result_submission() {
    let mut t = tournament_with(&["Ana", "Bruno", "Carla"]);
    advance(&mut t, &mut rng()).unwrap();
    let bye = t.matches.iter().find(|m| m.competitor_b.is_none()).unwrap().clone();
    let sole = name_of(&t, bye.competitor_a);
    assert!(matches!(
        set_winner(&mut t, bye.id, &sole),
        Err(TournamentError::AlreadyFinished(_))
    ));
}

#[test]
fn standings_stay_in_progress_until_bracket_resolves() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    let mut r = rng();

    assert_eq!(top_four(&t).unwrap(), Standings::InProgress);
    advance(&mut t, &mut r).unwrap();
    assert_eq!(top_four(&t).unwrap(), Standings::InProgress);
    resolve_latest_round(&mut t);
    advance(&mut t, &mut r).unwrap(); // consolation created
    assert_eq!(top_four(&t).unwrap(), Standings::InProgress);
    resolve_latest_round(&mut t);
    advance(&mut t, &mut r).unwrap(); // final created
    assert_eq!(top_four(&t).unwrap(), Standings::InProgress);
    resolve_latest_round(&mut t);
    assert!(matches!(top_four(&t).unwrap(), Standings::Decided(_)));
}

#[test]
fn list_matches_groups_rounds_with_labels() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    let mut r = rng();
    advance(&mut t, &mut r).unwrap();
    resolve_latest_round(&mut t);
    advance(&mut t, &mut r).unwrap(); // consolation lands in round 2

    let rounds = list_matches(&t);
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].round, "Round 1");
    assert_eq!(rounds[1].round, "Round 2");
    assert_eq!(rounds[0].matches.len(), 2);
    for view in &rounds[0].matches {
        assert_eq!(view.state, MatchState::Finished);
        assert!(view.winner.is_some());
        assert!(view.competitor_b.is_some());
    }
    assert_eq!(rounds[1].matches.len(), 1);
    assert!(rounds[1].matches[0].winner.is_none());
}

#[test]
fn eight_competitor_field_produces_full_ranking() {
    let names: Vec<String> = (0..8).map(|i| format!("C{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
    let mut t = tournament_with(&name_refs);
    let mut r = rng();

    let mut decided = None;
    for _ in 0..16 {
        advance(&mut t, &mut r).unwrap();
        if let Standings::Decided(ranking) = top_four(&t).unwrap() {
            decided = Some(ranking);
            break;
        }
        resolve_latest_round(&mut t);
    }
    let ranking = decided.expect("eight-competitor bracket should resolve");
    assert!(ranking.third.is_some());
    assert!(ranking.fourth.is_some());

    // structure: eliminations fill rounds 1..=2, consolation 3, final 4
    let final_match = t.stage_match(BracketStage::Final).unwrap();
    assert_eq!(final_match.round, t.expected_rounds + 1);
    let consolation = t.stage_match(BracketStage::Consolation).unwrap();
    assert_eq!(consolation.round, t.expected_rounds);
    for m in &t.matches {
        if m.stage == BracketStage::Elimination {
            assert!(m.round < t.expected_rounds);
            if let Some(b) = m.competitor_b {
                let ga = t.competitor(m.competitor_a).unwrap().seed_group;
                let gb = t.competitor(b).unwrap().seed_group;
                assert_eq!(ga, gb, "eliminations never cross seed groups");
            }
        }
    }
}

#[test]
fn nine_competitor_field_runs_to_completion() {
    let names: Vec<String> = (0..9).map(|i| format!("C{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
    let mut t = tournament_with(&name_refs);
    let mut r = rng();

    let mut decided = None;
    for _ in 0..32 {
        advance(&mut t, &mut r).unwrap();
        if let Standings::Decided(ranking) = top_four(&t).unwrap() {
            decided = Some(ranking);
            break;
        }
        resolve_latest_round(&mut t);
    }
    let ranking = decided.expect("nine-competitor bracket should resolve");
    assert!(ranking.third.is_some());
    // every round waits for the one before it
    let mut rounds: Vec<u32> = t.matches.iter().map(|m| m.round).collect();
    rounds.sort();
    rounds.dedup();
    assert_eq!(rounds, (1..=t.expected_rounds + 1).collect::<Vec<u32>>());
}
