use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::Minutes;

/// Operational status of a chair. Providers have no status in this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChairStatus {
    Available,
    Occupied,
    Maintenance,
}

/// A schedulable treatment chair (operatory). Read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chair {
    pub id: String,
    pub name: String,
    pub status: ChairStatus,
}

/// A treating provider. Read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
}

/// Static appointment-type catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: String,
    pub name: String,
    pub duration_minutes: Minutes,
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

/// A booked appointment. The interval is half-open: `[start, end)` in minutes
/// since midnight on `date`, so an appointment ending at 10:00 does not
/// collide with one starting at 10:00.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient: String,
    pub provider_id: String,
    pub chair_id: String,
    pub type_id: String,
    pub date: NaiveDate,
    pub start: Minutes,
    pub end: Minutes,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn duration_minutes(&self) -> Minutes {
        self.end - self.start
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }
}
