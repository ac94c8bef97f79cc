use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    #[serde(alias = "active_status")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    /// Only active doctors can take new appointments.
    pub fn accepts_appointments(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialty: String,
    pub active: bool,
}
