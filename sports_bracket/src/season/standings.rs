//! Standings tables computed from completed round-robin matches.

use log::debug;
use std::cmp::Reverse;
use std::collections::HashMap;

use super::models::{
    Group, GroupStandings, POINTS_FOR_DRAW, POINTS_FOR_LOSS, POINTS_FOR_WIN, StandingsRow,
    StatCategory, StatRecord,
};
use crate::models::{Match, MatchStatus, ParticipantId};

/// Aggregates round-0 results into ranked tables.
///
/// Ranking: points, then goal difference, then goals for, all descending. Rows still
/// tied keep their declaration order. Standings are a view: recompute on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandingsCalculator;

impl StandingsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Table over `members`, in declaration order before ranking.
    ///
    /// Only completed round-0 matches between two members count.
    pub fn compute(
        &self,
        members: &[ParticipantId],
        group: Option<u32>,
        matches: &[Match],
        stats: &[StatRecord],
    ) -> Vec<StandingsRow> {
        let mut rows: Vec<StandingsRow> = members
            .iter()
            .map(|&id| StandingsRow::new(id, group))
            .collect();
        let index: HashMap<ParticipantId, usize> =
            members.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        for m in matches
            .iter()
            .filter(|m| m.is_round_robin() && m.status == MatchStatus::Completed)
        {
            let (Some(p1), Some(p2)) = (m.player1, m.player2) else {
                continue;
            };
            let (Some(&i1), Some(&i2)) = (index.get(&p1), index.get(&p2)) else {
                continue;
            };
            tally(&mut rows, m, i1, i2);
        }

        for record in stats {
            if let Some(&i) = index.get(&record.participant) {
                match record.category {
                    StatCategory::YellowCard => rows[i].yellow_cards += record.count,
                    StatCategory::RedCard => rows[i].red_cards += record.count,
                }
            }
        }

        rank(&mut rows);
        rows
    }

    /// Table of a single group, using only that group's matches
    pub fn compute_group(
        &self,
        group: &Group,
        matches: &[Match],
        stats: &[StatRecord],
    ) -> GroupStandings {
        let group_matches: Vec<Match> = matches
            .iter()
            .filter(|m| m.group_number == Some(group.number))
            .cloned()
            .collect();
        let rows = self.compute(&group.members, Some(group.number), &group_matches, stats);
        debug!(
            "Group {} standings: {} rows from {} matches",
            group.number,
            rows.len(),
            group_matches.len()
        );
        GroupStandings {
            group: group.number,
            rows,
        }
    }

    /// Independently computed table for every group, in group order
    pub fn compute_all_groups(
        &self,
        groups: &[Group],
        matches: &[Match],
        stats: &[StatRecord],
    ) -> Vec<GroupStandings> {
        groups
            .iter()
            .map(|group| self.compute_group(group, matches, stats))
            .collect()
    }

    /// Event-wide table when no groups exist; members in order of first appearance
    pub fn compute_event(&self, matches: &[Match], stats: &[StatRecord]) -> Vec<StandingsRow> {
        let mut members: Vec<ParticipantId> = Vec::new();
        for m in matches.iter().filter(|m| m.is_round_robin()) {
            for id in [m.player1, m.player2].into_iter().flatten() {
                if !members.contains(&id) {
                    members.push(id);
                }
            }
        }
        self.compute(&members, None, matches, stats)
    }
}

fn tally(rows: &mut [StandingsRow], m: &Match, i1: usize, i2: usize) {
    rows[i1].played += 1;
    rows[i2].played += 1;

    if let Some(score) = m.score {
        rows[i1].goals_for += score.player1;
        rows[i1].goals_against += score.player2;
        rows[i2].goals_for += score.player2;
        rows[i2].goals_against += score.player1;
    }

    let winner = m.winner.and_then(|w| {
        if Some(w) == m.player1 {
            Some((i1, i2))
        } else if Some(w) == m.player2 {
            Some((i2, i1))
        } else {
            None
        }
    });

    match (winner, m.score) {
        (Some((w, l)), _) => {
            rows[w].wins += 1;
            rows[w].points += POINTS_FOR_WIN;
            rows[l].losses += 1;
            rows[l].points += POINTS_FOR_LOSS;
        }
        (None, Some(score)) if score.is_draw() => {
            for i in [i1, i2] {
                rows[i].draws += 1;
                rows[i].points += POINTS_FOR_DRAW;
            }
        }
        // Unequal score without a declared winner: goals only.
        _ => {}
    }
}

/// Stable sort: points, goal difference, goals for
fn rank(rows: &mut [StandingsRow]) {
    rows.sort_by_key(|row| {
        (
            Reverse(row.points),
            Reverse(row.goal_difference()),
            Reverse(row.goals_for),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Score;

    fn completed(
        match_number: u32,
        group: u32,
        p1: ParticipantId,
        p2: ParticipantId,
        winner: Option<ParticipantId>,
        score: Option<Score>,
    ) -> Match {
        let mut m = Match::round_robin(match_number, group, p1, p2);
        m.status = MatchStatus::Completed;
        m.winner = winner;
        m.score = score;
        m
    }

    #[test]
    fn test_draw_awards_one_point_each() {
        let matches = vec![completed(1, 1, 1, 2, None, Some(Score::new(2, 2)))];
        let rows = StandingsCalculator::new().compute(&[1, 2], Some(1), &matches, &[]);
        for row in &rows {
            assert_eq!(row.points, 1);
            assert_eq!(row.wins, 0);
            assert_eq!(row.losses, 0);
            assert_eq!(row.draws, 1);
            assert_eq!(row.goal_difference(), 0);
        }
    }

    #[test]
    fn test_win_with_score() {
        let matches = vec![completed(1, 1, 1, 2, Some(1), Some(Score::new(3, 1)))];
        let rows = StandingsCalculator::new().compute(&[1, 2], Some(1), &matches, &[]);
        assert_eq!(rows[0].participant, 1);
        assert_eq!((rows[0].points, rows[0].wins), (3, 1));
        assert_eq!(rows[0].goal_difference(), 2);
        assert_eq!(rows[1].participant, 2);
        assert_eq!((rows[1].points, rows[1].losses), (0, 1));
        assert_eq!(rows[1].goal_difference(), -2);
    }

    #[test]
    fn test_winner_without_score_still_scores() {
        let matches = vec![completed(1, 1, 1, 2, Some(2), None)];
        let rows = StandingsCalculator::new().compute(&[1, 2], None, &matches, &[]);
        assert_eq!(rows[0].participant, 2);
        assert_eq!(rows[0].points, 3);
        assert_eq!(rows[0].goals_for, 0);
    }

    #[test]
    fn test_unfinished_and_elimination_matches_ignored() {
        let mut upcoming = Match::round_robin(1, 1, 1, 2);
        upcoming.winner = Some(1);
        let mut knockout = Match::between(1, 1, 1, 2);
        knockout.status = MatchStatus::Completed;
        knockout.winner = Some(1);

        let rows =
            StandingsCalculator::new().compute(&[1, 2], None, &[upcoming, knockout], &[]);
        assert!(rows.iter().all(|r| r.played == 0 && r.points == 0));
    }

    #[test]
    fn test_tie_breaks_goal_difference_then_goals_for() {
        // All three end on 3 points.
        let matches = vec![
            completed(1, 1, 1, 2, Some(1), Some(Score::new(1, 0))),
            completed(2, 1, 2, 3, Some(2), Some(Score::new(4, 1))),
            completed(3, 1, 3, 1, Some(3), Some(Score::new(2, 0))),
        ];
        let rows = StandingsCalculator::new().compute(&[1, 2, 3], Some(1), &matches, &[]);
        let order: Vec<_> = rows.iter().map(|r| r.participant).collect();
        // 2: +2 (gf 4), 3: -1 (gf 3), 1: -1 (gf 1)
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_full_tie_keeps_declaration_order() {
        let rows = StandingsCalculator::new().compute(&[9, 4, 6], None, &[], &[]);
        let order: Vec<_> = rows.iter().map(|r| r.participant).collect();
        assert_eq!(order, vec![9, 4, 6]);
    }

    #[test]
    fn test_cards_tallied_by_category() {
        let stats = vec![
            StatRecord::new(1, StatCategory::YellowCard, 2),
            StatRecord::new(1, StatCategory::RedCard, 1),
            StatRecord::new(1, StatCategory::YellowCard, 1),
            StatRecord::new(99, StatCategory::RedCard, 5),
        ];
        let rows = StandingsCalculator::new().compute(&[1, 2], None, &[], &stats);
        assert_eq!(rows[0].yellow_cards, 3);
        assert_eq!(rows[0].red_cards, 1);
        assert_eq!(rows[1].red_cards, 0);
    }

    #[test]
    fn test_groups_computed_independently() {
        let groups = vec![Group::new(1, vec![1, 2]), Group::new(2, vec![3, 4])];
        let matches = vec![
            completed(1, 1, 1, 2, Some(2), None),
            completed(2, 2, 3, 4, Some(3), None),
        ];
        let tables = StandingsCalculator::new().compute_all_groups(&groups, &matches, &[]);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].leader().unwrap().participant, 2);
        assert_eq!(tables[1].leader().unwrap().participant, 3);
        assert!(tables[1].rows.iter().all(|r| r.group == Some(2)));
    }

    #[test]
    fn test_event_table_without_groups() {
        let matches = vec![completed(1, 1, 5, 6, Some(6), Some(Score::new(0, 2)))];
        let rows = StandingsCalculator::new().compute_event(&matches, &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].participant, 6);
    }
}
