use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    #[serde(default)]
    pub reason: String,
    pub apt_start: DateTime<Utc>,
    pub apt_duration: i64,
    pub apt_created_at: DateTime<Utc>,
}

impl Appointment {
    /// Exclusive end of the booked interval.
    pub fn apt_end(&self) -> DateTime<Utc> {
        self.apt_start + Duration::minutes(self.apt_duration)
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.apt_start < end && self.apt_end() > start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub reason: String,
    pub apt_start: DateTime<Utc>,
    pub apt_duration: i64,
}

impl NewAppointment {
    pub fn apt_end(&self) -> DateTime<Utc> {
        self.apt_start + Duration::minutes(self.apt_duration)
    }
}
