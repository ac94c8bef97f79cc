use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::EntityStore;

use crate::models::{AppointmentError, ConflictCheckResponse};

pub struct ConflictDetectionService {
    store: Arc<dyn EntityStore>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Finds the doctor's appointments intersecting `[start_time, end_time)`.
    pub async fn check_conflicts(
        &self,
        doctor_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<ConflictCheckResponse, AppointmentError> {
        debug!("Checking conflicts for doctor {} from {} to {}",
               doctor_id, start_time, end_time);

        let candidates = self.store
            .appointments_overlapping(doctor_id, start_time, end_time)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        // Stores filter server side as well
        let conflicting_appointments: Vec<_> = candidates
            .into_iter()
            .filter(|apt| apt.doctor_id == doctor_id)
            .filter(|apt| appointments_overlap(start_time, end_time, apt.apt_start, apt.apt_end()))
            .collect();

        let has_conflict = !conflicting_appointments.is_empty();
        if has_conflict {
            warn!("Conflict detected for doctor {} - {} conflicting appointments",
                  doctor_id, conflicting_appointments.len());
        }

        Ok(ConflictCheckResponse {
            has_conflict,
            conflicting_appointments,
        })
    }
}

/// Half-open interval intersection; touching endpoints do not overlap.
pub fn appointments_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, 5, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_overlap_half_open() {
        // existing [10:00, 10:30)
        let (s, e) = (at(10, 0), at(10, 30));

        assert!(appointments_overlap(at(10, 15), at(10, 45), s, e));
        assert!(appointments_overlap(at(9, 45), at(10, 1), s, e));
        assert!(appointments_overlap(at(9, 0), at(11, 0), s, e));
        assert!(!appointments_overlap(at(10, 30), at(11, 0), s, e));
        assert!(!appointments_overlap(at(9, 45), at(10, 0), s, e));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = (at(10, 0), at(10, 0) + Duration::minutes(45));
        let b = (at(10, 40), at(11, 10));
        assert_eq!(
            appointments_overlap(a.0, a.1, b.0, b.1),
            appointments_overlap(b.0, b.1, a.0, a.1)
        );
    }
}
