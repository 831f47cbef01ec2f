use sqlx::PgPool;
use storage::{
    models::{Participant, RaceDuration},
    repository::participant::ParticipantRepository,
};

use crate::error::{AdminError, Result};

fn parse_result(duration: &str, position: Option<i32>) -> Result<RaceDuration> {
    if position.is_some_and(|position| position < 1) {
        return Err(AdminError::ValidationError(
            "Position must be at least 1".to_string(),
        ));
    }

    duration
        .parse()
        .map_err(|e| AdminError::ValidationError(format!("{}: {}", duration, e)))
}

/// Store a participant's finishing time, normalized to `HH:MM:SS`
pub async fn record_result(
    pool: &PgPool,
    participant_id: i32,
    duration: &str,
    position: Option<i32>,
) -> Result<Participant> {
    let duration = parse_result(duration, position)?;

    let participant = ParticipantRepository::new(pool)
        .record_result(participant_id, duration, position)
        .await?;

    tracing::info!(
        "Recorded {} for participant {}",
        duration,
        participant.participant_id
    );

    Ok(participant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_is_normalized() {
        assert_eq!(parse_result("1:05:09", Some(2)).unwrap().to_string(), "01:05:09");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_result("65 minutes", None).is_err());
        assert!(parse_result("00:61:00", None).is_err());
        assert!(parse_result("00:30:00", Some(0)).is_err());
    }
}
