// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_config::{duration_bounds, AppConfig};
use shared_models::Appointment;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    #[serde(default)]
    pub reason: String,
    /// ISO-8601 timestamp; must carry an explicit offset.
    pub apt_start: String,
    pub apt_duration: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListQuery {
    pub apt_date: NaiveDate,
    pub doctor_id: Option<Uuid>,
}

// ==============================================================================
// CONFLICT DETECTION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
    pub conflicting_appointments: Vec<Appointment>,
}

// ==============================================================================
// ERROR MODELS
// ==============================================================================

/// Business-rule reasons for refusing an otherwise well-formed request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingRejection {
    PastStart,
    DoctorUnavailable,
    Conflict,
}

impl fmt::Display for SchedulingRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingRejection::PastStart => write!(f, "Appointments must be scheduled at a later time"),
            SchedulingRejection::DoctorUnavailable => write!(f, "Doctor is inactive or doesn't exist"),
            SchedulingRejection::Conflict => write!(f, "Doctor has a conflicting appointment"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Rejected(SchedulingRejection),

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl AppointmentError {
    pub fn rejection(&self) -> Option<SchedulingRejection> {
        match self {
            AppointmentError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

// ==============================================================================
// VALIDATION
// ==============================================================================

#[derive(Debug, Clone)]
pub struct AppointmentValidationRules {
    pub min_appointment_duration: i64,
    pub max_appointment_duration: i64,
}

impl Default for AppointmentValidationRules {
    fn default() -> Self {
        Self {
            min_appointment_duration: 15,
            max_appointment_duration: 180,
        }
    }
}

impl AppointmentValidationRules {
    pub fn from_config(config: &AppConfig) -> Self {
        let (min, max) = duration_bounds(config.min_appointment_minutes, config.max_appointment_minutes);
        Self {
            min_appointment_duration: min,
            max_appointment_duration: max,
        }
    }

    pub fn check_duration(&self, minutes: i64) -> Result<Duration, AppointmentError> {
        if minutes < self.min_appointment_duration || minutes > self.max_appointment_duration {
            return Err(AppointmentError::ValidationError(format!(
                "apt_duration must be between {} and {} minutes",
                self.min_appointment_duration, self.max_appointment_duration
            )));
        }
        Ok(Duration::minutes(minutes))
    }
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses an ISO-8601 start instant and normalizes it to UTC.
///
/// Offset-less input is rejected rather than assumed to be UTC.
pub fn parse_aware_start(raw: &str) -> Result<DateTime<Utc>, AppointmentError> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Some(canonical) = canonical_offset(raw) {
        for format in AWARE_FORMATS {
            if let Ok(ts) = DateTime::parse_from_str(&canonical, format) {
                return Ok(ts.with_timezone(&Utc));
            }
        }
    }

    if NAIVE_FORMATS.iter().any(|format| NaiveDateTime::parse_from_str(raw, format).is_ok()) {
        return Err(AppointmentError::ValidationError(
            "apt_start must be timezone-aware".to_string(),
        ));
    }

    Err(AppointmentError::ValidationError(format!(
        "apt_start '{}' is not a valid ISO-8601 timestamp",
        raw
    )))
}

/// Rewrites a trailing `Z`, `+hh` or `+hhmm` offset as `+hh:mm`.
///
/// Only the part after the date is searched, so the date's own dashes are
/// never taken for a negative offset. Returns `None` when no offset is present.
fn canonical_offset(raw: &str) -> Option<String> {
    if !raw.is_ascii() || raw.len() <= 10 {
        return None;
    }
    let (date, rest) = raw.split_at(10);

    if let Some(body) = rest.strip_suffix(['Z', 'z']) {
        return Some(format!("{}{}+00:00", date, body));
    }

    let sign_at = rest.rfind(['+', '-'])?;
    let (body, offset) = rest.split_at(sign_at);
    let (sign, digits) = offset.split_at(1);

    let (hours, minutes) = match digits.len() {
        2 => (digits, "00"),
        4 => digits.split_at(2),
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(format!("{}{}{}{}:{}", date, body, sign, hours, minutes))
}

/// UTC day as a half-open window `[00:00, next day 00:00)`.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::default()).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn test_parse_normalizes_offsets_to_utc() {
        let expected = Utc.with_ymd_and_hms(2030, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(parse_aware_start("2030-03-05T10:00:00Z").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05T15:30:00+05:30").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05 05:00:00-05:00").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05T11:00:00+0100").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05T10:00:00.000z").unwrap(), expected);
    }

    #[test]
    fn test_parse_accepts_minute_precision_and_short_offsets() {
        let expected = Utc.with_ymd_and_hms(2030, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(parse_aware_start("2030-03-05T15:30+05:30").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05T10:00Z").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05 07:00-03:00").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05T15:00:00+05").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05T07:00-03").unwrap(), expected);
        assert_eq!(parse_aware_start("2030-03-05T12:00+0200").unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_naive_timestamps() {
        for raw in ["2030-03-05T10:00:00", "2030-03-05 10:00:00.250", "2030-03-05T10:00"] {
            assert_matches!(
                parse_aware_start(raw),
                Err(AppointmentError::ValidationError(msg)) if msg == "apt_start must be timezone-aware"
            );
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["next tuesday", "2030-03-05T10:00+5", "2030-03-05T10:00+05:3x"] {
            assert_matches!(
                parse_aware_start(raw),
                Err(AppointmentError::ValidationError(msg)) if msg.contains("not a valid ISO-8601")
            );
        }
    }

    #[test]
    fn test_duration_bounds_are_inclusive() {
        let rules = AppointmentValidationRules::default();
        assert!(rules.check_duration(15).is_ok());
        assert!(rules.check_duration(180).is_ok());
        assert_matches!(rules.check_duration(14), Err(AppointmentError::ValidationError(_)));
        assert_matches!(rules.check_duration(181), Err(AppointmentError::ValidationError(_)));
        assert_matches!(rules.check_duration(-30), Err(AppointmentError::ValidationError(_)));
    }

    #[test]
    fn test_rules_follow_config() {
        let config = AppConfig {
            min_appointment_minutes: 20,
            max_appointment_minutes: 60,
            ..AppConfig::default()
        };
        let rules = AppointmentValidationRules::from_config(&config);
        assert!(rules.check_duration(20).is_ok());
        assert!(rules.check_duration(15).is_err());
        assert!(rules.check_duration(90).is_err());
    }

    #[test]
    fn test_rules_never_accept_durations_the_table_rejects() {
        let config = AppConfig {
            min_appointment_minutes: 10,
            max_appointment_minutes: 240,
            ..AppConfig::default()
        };
        let rules = AppointmentValidationRules::from_config(&config);
        assert!(rules.check_duration(10).is_err());
        assert!(rules.check_duration(181).is_err());
        assert!(rules.check_duration(180).is_ok());
    }

    #[test]
    fn test_day_window_covers_full_day() {
        let (start, end) = day_window(NaiveDate::from_ymd_opt(2030, 3, 5).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2030, 3, 5, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2030, 3, 6, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rejection_messages() {
        let err = AppointmentError::Rejected(SchedulingRejection::Conflict);
        assert_eq!(err.to_string(), "Doctor has a conflicting appointment");
        assert_eq!(err.rejection(), Some(SchedulingRejection::Conflict));
        assert_eq!(AppointmentError::PatientNotFound.rejection(), None);
    }
}
