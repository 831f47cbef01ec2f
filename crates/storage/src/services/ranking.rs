use crate::models::RaceDuration;

/// How many finishers a leaderboard shows
pub const LEADERBOARD_SIZE: usize = 3;

/// Anything carrying an optional `HH:MM:SS` result
pub trait Timed {
    fn duration(&self) -> Option<&str>;
}

impl Timed for Option<String> {
    fn duration(&self) -> Option<&str> {
        self.as_deref()
    }
}

fn parse(duration: Option<&str>) -> Option<RaceDuration> {
    duration.and_then(|value| value.parse().ok())
}

/// Fastest recorded duration, or `None` when nobody has a usable time
pub fn fastest_duration<'a, I>(durations: I) -> Option<RaceDuration>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    durations.into_iter().filter_map(parse).min()
}

/// Sort ascending by duration; rows without a parsable time go last in read order
pub fn rank_by_duration<T: Timed>(entries: &mut [T]) {
    entries.sort_by_key(|entry| match parse(entry.duration()) {
        Some(duration) => (false, duration.total_seconds()),
        None => (true, 0),
    });
}

/// The first `limit` entries after [`rank_by_duration`]
pub fn top_by_duration<T: Timed>(mut entries: Vec<T>, limit: usize) -> Vec<T> {
    rank_by_duration(&mut entries);
    entries.truncate(limit);
    entries
}
