//! Property-based tests for scoring, ranking and weekly trends.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;
use sendboard::record::{RawRecord, SendRecord, Status, normalize_at};
use sendboard::scoring::{attempts_penalty, score, score_parts};
use sendboard::{TREND_WEEKS, rank, weekly_trend};

const USERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap()
}

fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Onsight),
        Just(Status::Flash),
        Just(Status::Send),
        Just(Status::Projecting),
        Just(Status::Fail),
        "[a-z ]{0,8}".prop_map(Status::Unknown),
    ]
}

fn attempts_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..=10).prop_map(|n| n.to_string()),
        Just("10+".to_string()),
        Just("?".to_string()),
    ]
}

fn send_strategy() -> impl Strategy<Value = SendRecord> {
    (
        0usize..USERS.len(),
        0u32..=12,
        status_strategy(),
        attempts_strategy(),
        0i64..(30 * 7 * 24),
    )
        .prop_map(|(user, grade, status, attempts, hours_ago)| {
            let user_id = USERS.get(user).copied().unwrap_or("alice").to_string();
            SendRecord {
                id: format!("{}-{}", user_id, hours_ago),
                color: "Green".into(),
                grade: format!("V{}", grade),
                status,
                attempts,
                feeling: String::new(),
                image_url: String::new(),
                user_name: String::new(),
                user_email: String::new(),
                timestamp: as_of() - Duration::hours(hours_ago),
                is_shared: true,
                user_id,
            }
        })
}

proptest! {
    #[test]
    fn incomplete_sends_score_zero(
        grade in 0u32..100,
        status in prop_oneof![
            Just(Status::Projecting),
            Just(Status::Fail),
            "[a-z]{1,8}".prop_map(Status::Unknown),
        ],
        attempts in attempts_strategy(),
    ) {
        prop_assert_eq!(score_parts(&format!("V{}", grade), &status, &attempts), 0);
    }

    #[test]
    fn v0_scores_zero(status in status_strategy(), attempts in attempts_strategy()) {
        prop_assert_eq!(score_parts("V0", &status, &attempts), 0);
    }

    #[test]
    fn score_is_monotone_in_grade(
        low in 0u32..50,
        step in 0u32..50,
        status in status_strategy(),
        attempts in attempts_strategy(),
    ) {
        let lower = score_parts(&format!("V{}", low), &status, &attempts);
        let higher = score_parts(&format!("V{}", low + step), &status, &attempts);
        prop_assert!(lower <= higher);
    }

    #[test]
    fn penalty_strictly_decreases_with_attempts(n in 1u32..10) {
        let fewer = attempts_penalty(&n.to_string());
        let more = attempts_penalty(&(n + 1).to_string());
        prop_assert!(fewer > more);
        prop_assert_eq!(attempts_penalty("10+"), attempts_penalty("10"));
    }

    #[test]
    fn leaderboard_is_dense_and_sorted(records in prop::collection::vec(send_strategy(), 0..40)) {
        let board = rank(&records);

        for (i, entry) in board.iter().enumerate() {
            prop_assert_eq!(entry.rank, i + 1);
            prop_assert!(entry.score > 0);
        }
        for pair in board.windows(2) {
            if let [a, b] = pair {
                prop_assert!(a.score >= b.score);
            }
        }

        let total: u64 = records.iter().map(score).sum();
        let ranked: u64 = board.iter().map(|e| e.score).sum();
        prop_assert_eq!(total, ranked);

        let scoring_users = USERS
            .iter()
            .filter(|u| records.iter().any(|r| r.user_id == **u && score(r) > 0))
            .count();
        prop_assert_eq!(board.len(), scoring_users);
    }

    #[test]
    fn trend_has_fixed_weekly_dates(records in prop::collection::vec(send_strategy(), 0..40)) {
        let points = weekly_trend(&records, as_of());

        prop_assert_eq!(points.len(), TREND_WEEKS);
        prop_assert_eq!(points.last().map(|p| p.date), Some(as_of().date_naive()));
        for pair in points.windows(2) {
            if let [a, b] = pair {
                prop_assert_eq!((b.date - a.date).num_days(), 7);
            }
        }
        for point in &points {
            prop_assert!((0.0..=12.0).contains(&point.average_grade));
        }
    }

    #[test]
    fn normalize_keeps_populated_fields(
        color in "[A-Za-z]{1,10}",
        grade in 0u32..=15,
        status in status_strategy(),
        attempts in attempts_strategy(),
        user_id in "[a-z0-9]{1,12}",
        shared in any::<bool>(),
        hours_ago in 0i64..10_000,
    ) {
        let timestamp = as_of() - Duration::hours(hours_ago);
        let raw: RawRecord = match json!({
            "color": color,
            "grade": format!("V{}", grade),
            "status": status.as_str(),
            "attempts": attempts,
            "feeling": "pumped",
            "imageUrl": "https://example.com/a.jpg",
            "userId": user_id,
            "userName": "Climber",
            "userEmail": "c@example.com",
            "timestamp": timestamp.to_rfc3339(),
            "isShared": shared,
        }) {
            serde_json::Value::Object(map) => map,
            _ => RawRecord::new(),
        };

        let record = normalize_at("send-1", &raw, as_of());

        prop_assert_eq!(record.id, "send-1");
        prop_assert_eq!(record.color, color);
        prop_assert_eq!(record.grade, format!("V{}", grade));
        prop_assert_eq!(record.status, status);
        prop_assert_eq!(record.attempts, attempts);
        prop_assert_eq!(record.user_id, user_id);
        prop_assert_eq!(record.timestamp, timestamp);
        prop_assert_eq!(record.is_shared, shared);
    }
}

#[test]
fn normalize_defaults_an_empty_map() {
    let record = normalize_at("empty", &RawRecord::new(), as_of());

    assert_eq!(record.color, "Color");
    assert_eq!(record.grade, "V?");
    assert_eq!(record.attempts, "?");
    assert_eq!(record.user_id, "unknown");
    assert_eq!(record.user_email, "unknown@example.com");
    assert_eq!(record.timestamp, as_of());
    assert!(!record.is_shared);
    assert_eq!(score(&record), 0);
}

#[test]
fn worked_examples() {
    assert_eq!(score_parts("V5", &Status::Onsight, "1"), 2500);
    assert_eq!(score_parts("V3", &Status::Send, "10+"), 90);
}
