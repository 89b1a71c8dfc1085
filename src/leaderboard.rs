//! Leaderboard aggregation.
//!
//! Scores are summed per user, zero-score sends are ignored, and users are
//! ranked by total. Ties keep the order in which users were first seen and
//! still get distinct ranks, so ranks are always exactly `1..=N`.

use std::collections::HashMap;

use serde::Serialize;

use crate::logging::trace;
use crate::record::SendRecord;
use crate::scoring::score;

/// One row of a leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub score: u64,
}

struct Tally {
    user_id: String,
    display_name: Option<String>,
    score: u64,
}

/// Rank users by the summed score of their sends.
pub fn rank<'a, I>(records: I) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a SendRecord>,
{
    rank_with_names(records, &HashMap::new())
}

/// Like [`rank`], but display names found in `names` (keyed by user id)
/// take precedence over the names carried on the records.
pub fn rank_with_names<'a, I>(records: I, names: &HashMap<String, String>) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = &'a SendRecord>,
{
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<Tally> = Vec::new();

    for record in records {
        let points = score(record);
        if points == 0 {
            continue;
        }

        let slot = *order.entry(record.user_id.as_str()).or_insert_with(|| {
            tallies.push(Tally {
                user_id: record.user_id.clone(),
                display_name: None,
                score: 0,
            });
            tallies.len() - 1
        });

        if let Some(tally) = tallies.get_mut(slot) {
            tally.score = tally.score.saturating_add(points);
            if !record.user_name.is_empty() {
                tally.display_name = Some(record.user_name.clone());
            }
        }
    }

    // Stable: equal totals stay in first-seen order.
    tallies.sort_by(|a, b| b.score.cmp(&a.score));

    trace!(users = tallies.len(), "ranked leaderboard");

    tallies
        .into_iter()
        .enumerate()
        .map(|(i, tally)| {
            let display_name = names
                .get(&tally.user_id)
                .cloned()
                .or(tally.display_name)
                .unwrap_or_else(|| tally.user_id.clone());
            LeaderboardEntry {
                rank: i + 1,
                user_id: tally.user_id,
                display_name,
                score: tally.score,
            }
        })
        .collect()
}
