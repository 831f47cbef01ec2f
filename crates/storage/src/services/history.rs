use std::collections::HashMap;

use chrono::Datelike;

use crate::dto::history::{CompetitionResultEntry, MonthResults};

/// Bucket participations by the calendar month of `created_at`.
///
/// Buckets come out in order of first appearance and entries keep their input
/// order, so callers control ordering through the query that produced `entries`.
pub fn group_by_month(entries: Vec<CompetitionResultEntry>) -> Vec<MonthResults> {
    let mut buckets: Vec<MonthResults> = Vec::new();
    let mut index: HashMap<(i32, u32), usize> = HashMap::new();

    for entry in entries {
        let key = (entry.created_at.year(), entry.created_at.month());

        let position = *index.entry(key).or_insert_with(|| {
            buckets.push(MonthResults {
                month: format!("{}-{}", key.1, key.0),
                count: 0,
                results: Vec::new(),
            });
            buckets.len() - 1
        });

        let bucket = &mut buckets[position];
        bucket.count += 1;
        bucket.results.push(entry);
    }

    buckets
}
