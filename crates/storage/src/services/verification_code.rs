use chrono::{Duration, NaiveDateTime};
use rand::Rng;

pub const CODE_LENGTH: usize = 6;

/// Wrong guesses a pending code survives; a new code resets the count
pub const MAX_CODE_ATTEMPTS: i32 = 5;

/// Generate a zero-padded numeric one-time code
pub fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// Oldest `created_at` a code may carry and still be accepted at `now`
pub fn valid_since(now: NaiveDateTime, ttl: Duration) -> NaiveDateTime {
    now - ttl
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_older_than_ttl_fall_outside_window() {
        let since = valid_since(at(10, 6), Duration::minutes(5));

        assert_eq!(since, at(10, 1));
        assert!(at(10, 0) < since);
        assert!(at(10, 2) >= since);
    }
}
