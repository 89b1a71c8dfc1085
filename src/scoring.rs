//! Per-send scoring.
//!
//! ```text
//! score = grade * 10 * status_multiplier * attempts_penalty
//! ```
//!
//! Only completed sends (Onsight, Flash, Send) have a non-zero multiplier,
//! so projects and failures never count toward a leaderboard.

use crate::record::{SendRecord, Status};

/// Points per V-grade.
pub const POINTS_PER_GRADE: u64 = 10;

/// Attempts label for "more than ten tries".
pub const TEN_PLUS: &str = "10+";

/// Parse a V-grade such as `"V5"` or `"v5"` into its number.
///
/// Returns `None` when the remainder is not an integer (`"V?"`, `"5.10a"`).
/// Negative numbers parse; scoring clamps them to zero.
pub fn parse_grade(grade: &str) -> Option<i64> {
    let trimmed = grade.trim();
    let digits = trimmed
        .strip_prefix('V')
        .or_else(|| trimmed.strip_prefix('v'))
        .unwrap_or(trimmed);
    digits.parse().ok()
}

/// Grade number used for scoring: unparseable or negative grades count as 0.
pub fn grade_number(grade: &str) -> u64 {
    parse_grade(grade)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

/// Multiplier rewarding cleaner sends.
pub fn status_multiplier(status: &Status) -> u64 {
    match status {
        Status::Onsight => 5,
        Status::Flash => 4,
        Status::Send => 3,
        _ => 0,
    }
}

/// Bonus for fewer attempts: `11 - n` for 1 to 10 tries, 1 for `"10+"` or
/// anything unreadable.
pub fn attempts_penalty(attempts: &str) -> u64 {
    if attempts == TEN_PLUS {
        return 1;
    }
    match attempts.trim().parse::<u64>() {
        Ok(n @ 1..=10) => 11 - n,
        _ => 1,
    }
}

/// Score a single send.
pub fn score(record: &SendRecord) -> u64 {
    score_parts(&record.grade, &record.status, &record.attempts)
}

/// Score from the three inputs that matter, without building a record.
pub fn score_parts(grade: &str, status: &Status, attempts: &str) -> u64 {
    grade_number(grade)
        .saturating_mul(POINTS_PER_GRADE)
        .saturating_mul(status_multiplier(status))
        .saturating_mul(attempts_penalty(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grade() {
        assert_eq!(parse_grade("V5"), Some(5));
        assert_eq!(parse_grade("v12"), Some(12));
        assert_eq!(parse_grade("V0"), Some(0));
        assert_eq!(parse_grade("7"), Some(7));
        assert_eq!(parse_grade("V-1"), Some(-1));
        assert_eq!(parse_grade("V?"), None);
        assert_eq!(parse_grade(""), None);
        assert_eq!(parse_grade("V5+"), None);
    }

    #[test]
    fn test_grade_number_clamps() {
        assert_eq!(grade_number("V-3"), 0);
        assert_eq!(grade_number("V?"), 0);
        assert_eq!(grade_number("V8"), 8);
    }

    #[test]
    fn test_attempts_penalty() {
        assert_eq!(attempts_penalty("1"), 10);
        assert_eq!(attempts_penalty("5"), 6);
        assert_eq!(attempts_penalty("10"), 1);
        assert_eq!(attempts_penalty("10+"), 1);
        assert_eq!(attempts_penalty("0"), 1);
        assert_eq!(attempts_penalty("11"), 1);
        assert_eq!(attempts_penalty("?"), 1);
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(score_parts("V5", &Status::Onsight, "1"), 2500);
        assert_eq!(score_parts("V3", &Status::Send, "10+"), 90);
        assert_eq!(score_parts("V4", &Status::Flash, "1"), 1600);
    }

    #[test]
    fn test_incomplete_sends_score_zero() {
        assert_eq!(score_parts("V9", &Status::Projecting, "1"), 0);
        assert_eq!(score_parts("V9", &Status::Fail, "1"), 0);
        assert_eq!(score_parts("V9", &Status::Unknown("Top".into()), "1"), 0);
    }

    #[test]
    fn test_huge_grade_saturates() {
        let grade = format!("V{}", i64::MAX);
        assert_eq!(score_parts(&grade, &Status::Onsight, "1"), u64::MAX);
    }
}
