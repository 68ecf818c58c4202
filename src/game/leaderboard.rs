//! Leaderboard projection — a ranked view over the player store.
//!
//! Pure function of the store's contents, recomputed on demand. Ordering:
//! score descending, ties broken by correct count descending. Ties beyond
//! that keep store order (stable sort); no further key is defined.

use crate::game::players::PlayerRecord;

/// One leaderboard row: a 1-based rank over a borrowed record.
#[derive(Debug, Clone, Copy)]
pub struct RankedPlayer<'a> {
    pub rank: usize,
    pub record: &'a PlayerRecord,
}

/// Rank all records. The input slice is not mutated.
pub fn ranked(records: &[PlayerRecord]) -> Vec<RankedPlayer<'_>> {
    let mut sorted: Vec<&PlayerRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.correct_count.cmp(&a.correct_count))
    });
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedPlayer { rank: i + 1, record })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nickname: &str, score: u32, correct: u32) -> PlayerRecord {
        PlayerRecord {
            nickname: nickname.to_string(),
            correct_count: correct,
            attempt_count: correct,
            score,
            completed_architectures: Vec::new(),
            last_played: 0,
            is_online: false,
        }
    }

    #[test]
    fn orders_by_score_then_correct_count() {
        let records = vec![
            record("A", 80, 4),
            record("B", 90, 1),
            record("C", 80, 5),
        ];
        let board = ranked(&records);
        let names: Vec<&str> = board.iter().map(|r| r.record.nickname.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 2);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn full_ties_keep_store_order() {
        let records = vec![record("first", 50, 2), record("second", 50, 2)];
        let board = ranked(&records);
        assert_eq!(board[0].record.nickname, "first");
        assert_eq!(board[1].record.nickname, "second");
    }

    #[test]
    fn empty_store_yields_empty_board() {
        assert!(ranked(&[]).is_empty());
    }

    #[test]
    fn input_is_not_mutated() {
        let records = vec![record("low", 10, 1), record("high", 90, 9)];
        let _ = ranked(&records);
        assert_eq!(records[0].nickname, "low");
    }
}
