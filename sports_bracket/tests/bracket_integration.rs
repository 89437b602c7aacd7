//! Integration tests for bracket construction
//!
//! These tests build complete brackets through the public API and check the
//! placement rules: sizing, byes, seed positions and first-round pairings.

#[cfg(test)]
mod bracket_tests {
    use sports_bracket::bracket::{BracketBuilder, bracket_size};
    use sports_bracket::shuffle::{KeepOrder, RandomShuffler, ReverseOrder};
    use sports_bracket::{MatchStatus, Participant, ParticipantSet, TournamentError};

    fn roster(unseeded: usize, seeds: &[u32]) -> ParticipantSet {
        let mut players: Vec<Participant> = seeds
            .iter()
            .map(|&seed| {
                Participant::new(100 + seed as i64, format!("Seed {seed}")).with_seed(seed)
            })
            .collect();
        players.extend((1..=unseeded).map(|i| Participant::new(i as i64, format!("Player {i}"))));
        ParticipantSet::new(players).unwrap()
    }

    fn first_round_ids(bracket: &sports_bracket::Bracket) -> Vec<i64> {
        let mut ids: Vec<i64> = bracket
            .round(1)
            .flat_map(|m| [m.player1, m.player2])
            .flatten()
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_five_unseeded_players() {
        let bracket = BracketBuilder::new()
            .build(&roster(5, &[]), &mut RandomShuffler::seeded(11))
            .unwrap();

        assert_eq!(bracket.size, 8);
        assert_eq!(bracket.total_rounds, 3);
        assert_eq!(bracket.matches.len(), 7);
        assert_eq!(bracket.bye_count(), 3);
        assert_eq!(first_round_ids(&bracket), vec![1, 2, 3, 4, 5]);
        assert!(
            bracket
                .round(1)
                .all(|m| m.player1.is_some() || m.player2.is_some())
        );
    }

    #[test]
    fn test_five_players_never_pair_two_byes() {
        for seed in 0..200 {
            let bracket = BracketBuilder::new()
                .build(&roster(5, &[]), &mut RandomShuffler::seeded(seed))
                .unwrap();
            for m in bracket.round(1) {
                assert!(
                    m.player1.is_some() || m.player2.is_some(),
                    "bye-vs-bye with rng seed {seed}"
                );
            }
        }
    }

    #[test]
    fn test_bronze_match_added_after_final() {
        let bracket = BracketBuilder::new()
            .with_bronze_match(true)
            .build(&roster(6, &[]), &mut KeepOrder)
            .unwrap();

        assert_eq!(bracket.matches.len(), 8);
        let bronze = bracket.bronze_match().unwrap();
        assert_eq!((bronze.round, bronze.match_number), (3, 2));
        assert_eq!(bronze.status, MatchStatus::Upcoming);
        assert!(bronze.player1.is_none() && bronze.player2.is_none());
        assert_eq!(bracket.round(3).count(), 1);
    }

    #[test]
    fn test_two_player_bracket_has_no_bronze() {
        let bracket = BracketBuilder::new()
            .with_bronze_match(true)
            .build(&roster(2, &[]), &mut KeepOrder)
            .unwrap();

        assert_eq!(bracket.size, 2);
        assert_eq!(bracket.total_rounds, 1);
        assert!(!bracket.has_bronze_match);
        assert_eq!(bracket.matches.len(), 1);
    }

    #[test]
    fn test_top_two_seeds_at_opposite_ends() {
        for shuffle_seed in 0..20 {
            let bracket = BracketBuilder::new()
                .build(
                    &roster(8, &[1, 2, 3, 4, 5, 6, 7, 8]),
                    &mut RandomShuffler::seeded(shuffle_seed),
                )
                .unwrap();

            assert_eq!(bracket.size, 16);
            assert_eq!(bracket.match_at(1, 1).unwrap().player1, Some(101));
            assert_eq!(bracket.match_at(1, 8).unwrap().player2, Some(102));

            // Seeds 3 and 4 hold positions 7 and 8 in some order.
            let middle = [
                bracket.match_at(1, 4).unwrap().player2,
                bracket.match_at(1, 5).unwrap().player1,
            ];
            assert!(middle.contains(&Some(103)));
            assert!(middle.contains(&Some(104)));
        }
    }

    #[test]
    fn test_top_seeds_receive_byes_first() {
        let bracket = BracketBuilder::new()
            .build(&roster(3, &[1, 2]), &mut KeepOrder)
            .unwrap();

        assert_eq!(bracket.size, 8);
        assert_eq!(bracket.bye_count(), 3);

        let first = bracket.match_at(1, 1).unwrap();
        assert_eq!(first.status, MatchStatus::Bye);
        assert_eq!(first.winner, Some(101));
        let last = bracket.match_at(1, 4).unwrap();
        assert_eq!(last.status, MatchStatus::Bye);
        assert_eq!(last.winner, Some(102));

        // The top seed's neighbour pair is a real match.
        let second = bracket.match_at(1, 2).unwrap();
        assert!(second.player1.is_some() && second.player2.is_some());
        assert_eq!(second.status, MatchStatus::Upcoming);
    }

    #[test]
    fn test_bye_winners_prefilled_into_round_two() {
        let bracket = BracketBuilder::new()
            .build(&roster(3, &[1, 2]), &mut KeepOrder)
            .unwrap();

        let semi_top = bracket.match_at(2, 1).unwrap();
        assert_eq!(semi_top.player1, Some(101));
        assert_eq!(semi_top.player2, None);

        let semi_bottom = bracket.match_at(2, 2).unwrap();
        assert_eq!(semi_bottom.player1, bracket.match_at(1, 3).unwrap().winner);
        assert_eq!(semi_bottom.player2, Some(102));
    }

    #[test]
    fn test_out_of_range_seeds_are_unseeded() {
        let players = vec![
            Participant::new(1, "A").with_seed(12),
            Participant::new(2, "B").with_seed(0),
            Participant::new(3, "C"),
            Participant::new(4, "D"),
        ];
        let roster = ParticipantSet::new(players).unwrap();
        assert!(roster.seeded().is_empty());

        let bracket = BracketBuilder::new().build(&roster, &mut ReverseOrder).unwrap();
        assert_eq!(first_round_ids(&bracket), vec![1, 2, 3, 4]);
        assert_eq!(bracket.bye_count(), 0);
    }

    #[test]
    fn test_rejects_too_few_participants() {
        let err = BracketBuilder::new()
            .build(&ParticipantSet::default(), &mut KeepOrder)
            .unwrap_err();
        assert_eq!(
            err,
            TournamentError::InsufficientParticipants {
                needed: 2,
                current: 0
            }
        );
    }

    #[test]
    fn test_ranked_bracket_gives_byes_to_top_ranks() {
        let bracket = BracketBuilder::new().build_ranked(&[10, 20, 30, 40, 50, 60]).unwrap();

        assert_eq!(bracket.size, bracket_size(6));
        assert_eq!(bracket.bye_count(), 2);
        assert_eq!(bracket.match_at(1, 1).unwrap().winner, Some(10));
        assert_eq!(bracket.match_at(1, 2).unwrap().winner, Some(20));

        let third = bracket.match_at(1, 3).unwrap();
        assert_eq!((third.player1, third.player2), (Some(30), Some(40)));
        let fourth = bracket.match_at(1, 4).unwrap();
        assert_eq!((fourth.player1, fourth.player2), (Some(50), Some(60)));

        let semi = bracket.match_at(2, 1).unwrap();
        assert_eq!((semi.player1, semi.player2), (Some(10), Some(20)));
    }

    #[test]
    fn test_ranked_bracket_rejects_duplicates() {
        let err = BracketBuilder::new().build_ranked(&[1, 2, 1]).unwrap_err();
        assert_eq!(err, TournamentError::DuplicateParticipant(1));
    }

    #[test]
    fn test_bracket_serializes_status_lowercase() {
        let bracket = BracketBuilder::new()
            .build(&roster(3, &[]), &mut KeepOrder)
            .unwrap();
        let json = serde_json::to_string(&bracket).unwrap();
        assert!(json.contains("\"status\":\"bye\""));
        assert!(json.contains("\"status\":\"upcoming\""));
    }
}
