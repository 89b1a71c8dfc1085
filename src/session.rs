//! The most recent climbing session.

use crate::record::SendRecord;

/// Sends logged on the same UTC day as the newest send, newest first.
pub fn last_session<'a, I>(records: I) -> Vec<&'a SendRecord>
where
    I: IntoIterator<Item = &'a SendRecord>,
{
    let mut sends: Vec<&SendRecord> = records.into_iter().collect();
    sends.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let Some(day) = sends.first().map(|r| r.timestamp.date_naive()) else {
        return Vec::new();
    };

    sends
        .into_iter()
        .take_while(|r| r.timestamp.date_naive() == day)
        .collect()
}
