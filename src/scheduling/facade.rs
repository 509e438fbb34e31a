use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::conflict::find_conflicts;
use super::store::AppointmentStore;
use super::time::{Minutes, MINUTES_PER_DAY};
use super::types::{Appointment, AppointmentStatus, ChairStatus};
use super::utilization::utilization;
use crate::error::ScheduleError;
use crate::reference::ReferenceCatalog;

/// A proposed booking as it arrives from the consumer. `end` may be omitted,
/// in which case the appointment type's standard duration is applied.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRequest {
    pub patient: String,
    pub provider_id: String,
    pub chair_id: String,
    pub type_id: String,
    pub date: NaiveDate,
    pub start: Minutes,
    pub end: Option<Minutes>,
}

/// Optional filters for `list_appointments`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppointmentFilter {
    pub provider_id: Option<String>,
    pub chair_id: Option<String>,
    pub search_text: Option<String>,
}

/// Composes the store, conflict detector and utilization calculator behind
/// one API. Mutations on a given `(chair, date)` partition are serialized by
/// a dedicated mutex, so two proposals for the same chair and day cannot both
/// pass the conflict check and then both commit, while bookings on different
/// chairs or days do not contend.
pub struct SchedulingService {
    store: RwLock<AppointmentStore>,
    partition_locks: Mutex<HashMap<(String, NaiveDate), Arc<Mutex<()>>>>,
    catalog: ReferenceCatalog,
    working_window_minutes: u32,
}

impl SchedulingService {
    pub fn new(catalog: ReferenceCatalog, working_window_minutes: u32) -> Self {
        SchedulingService {
            store: RwLock::new(AppointmentStore::new()),
            partition_locks: Mutex::new(HashMap::new()),
            catalog,
            working_window_minutes,
        }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Validates the request, checks for collisions and, only if the slot is
    /// free, commits the appointment as `confirmed`. On collision nothing is
    /// persisted and every colliding appointment is returned in the error.
    pub fn propose(&self, request: AppointmentRequest) -> Result<Appointment, ScheduleError> {
        let candidate = self.build_candidate(request)?;

        // Hold the partition lock across check and commit so no other
        // proposal for the same chair and day can interleave.
        let partition = self.partition_lock(&candidate.chair_id, candidate.date);
        let _guard = partition.lock().unwrap();

        self.commit_locked(candidate)
    }

    /// Persists an already built candidate. The colliding-interval check is
    /// repeated under the partition lock, so a candidate that went stale
    /// between its conflict check and the commit is still rejected rather
    /// than double-booking the chair.
    pub fn commit(&self, candidate: Appointment) -> Result<Appointment, ScheduleError> {
        let partition = self.partition_lock(&candidate.chair_id, candidate.date);
        let _guard = partition.lock().unwrap();
        self.commit_locked(candidate)
    }

    fn commit_locked(&self, candidate: Appointment) -> Result<Appointment, ScheduleError> {
        let existing = self
            .store
            .read()
            .unwrap()
            .list_by_chair_and_date(&candidate.chair_id, candidate.date);
        let conflicts = find_conflicts(&candidate, &existing);
        if !conflicts.is_empty() {
            return Err(ScheduleError::Conflict(conflicts));
        }

        self.store.write().unwrap().add(candidate.clone())?;
        log::info!(
            "Booked {} for {} on {} {} ({}-{})",
            candidate.id,
            candidate.patient,
            candidate.chair_id,
            candidate.date,
            super::time::minutes_to_time_string(candidate.start),
            super::time::minutes_to_time_string(candidate.end),
        );
        Ok(candidate)
    }

    /// Enforces the appointment lifecycle: confirmed -> in-progress ->
    /// completed, with cancellation allowed from confirmed or in-progress.
    /// Completed and cancelled are terminal.
    pub fn transition(
        &self,
        id: &str,
        target: AppointmentStatus,
    ) -> Result<Appointment, ScheduleError> {
        use AppointmentStatus::{Cancelled, Completed, Confirmed, InProgress};

        let mut store = self.store.write().unwrap();
        let current = store
            .get(id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))?;

        let legal = matches!(
            (current.status, target),
            (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        );
        if !legal {
            return Err(ScheduleError::InvalidTransition {
                from: status_name(current.status).to_string(),
                to: status_name(target).to_string(),
            });
        }
        store.update_status(id, target)
    }

    /// Cancellation keeps the record for audit; it only changes status, which
    /// removes the appointment from conflict checks and utilization.
    pub fn cancel(&self, id: &str) -> Result<Appointment, ScheduleError> {
        self.transition(id, AppointmentStatus::Cancelled)
    }

    pub fn get(&self, id: &str) -> Result<Appointment, ScheduleError> {
        self.store
            .read()
            .unwrap()
            .get(id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }

    /// Booked percentage of the configured working window for one chair-day.
    pub fn get_utilization(&self, chair_id: &str, date: NaiveDate) -> Result<u32, ScheduleError> {
        if self.catalog.chair(chair_id).is_none() {
            return Err(ScheduleError::InvalidRequest(format!(
                "unknown chair: {}",
                chair_id
            )));
        }
        let appointments = self
            .store
            .read()
            .unwrap()
            .list_by_chair_and_date(chair_id, date);
        utilization(chair_id, date, &appointments, self.working_window_minutes)
    }

    /// Appointments for `date`, ascending by start then id, optionally
    /// narrowed by provider, chair and a case-insensitive patient-name search.
    pub fn list_appointments(
        &self,
        date: NaiveDate,
        filter: &AppointmentFilter,
    ) -> Vec<Appointment> {
        let search = filter.search_text.as_ref().map(|s| s.to_lowercase());
        self.store
            .read()
            .unwrap()
            .list_by_date(date)
            .into_iter()
            .filter(|a| match &filter.provider_id {
                Some(provider) => &a.provider_id == provider,
                None => true,
            })
            .filter(|a| match &filter.chair_id {
                Some(chair) => &a.chair_id == chair,
                None => true,
            })
            .filter(|a| match &search {
                Some(text) => a.patient.to_lowercase().contains(text),
                None => true,
            })
            .collect()
    }

    fn build_candidate(&self, request: AppointmentRequest) -> Result<Appointment, ScheduleError> {
        let chair = self.catalog.chair(&request.chair_id).ok_or_else(|| {
            ScheduleError::InvalidRequest(format!("unknown chair: {}", request.chair_id))
        })?;
        if chair.status == ChairStatus::Maintenance {
            return Err(ScheduleError::InvalidRequest(format!(
                "chair {} is under maintenance",
                chair.id
            )));
        }
        if self.catalog.provider(&request.provider_id).is_none() {
            return Err(ScheduleError::InvalidRequest(format!(
                "unknown provider: {}",
                request.provider_id
            )));
        }
        let appointment_type = self.catalog.appointment_type(&request.type_id).ok_or_else(|| {
            ScheduleError::InvalidRequest(format!(
                "unknown appointment type: {}",
                request.type_id
            ))
        })?;
        if request.patient.trim().is_empty() {
            return Err(ScheduleError::InvalidRequest(
                "patient name is required".to_string(),
            ));
        }

        if request.start >= MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidRequest(
                "start time must fall within the day".to_string(),
            ));
        }
        let end = match request.end {
            Some(end) => end,
            None => request
                .start
                .checked_add(appointment_type.duration_minutes)
                .ok_or_else(|| {
                    ScheduleError::InvalidRequest(
                        "appointment may not run past midnight".to_string(),
                    )
                })?,
        };
        if request.start >= end {
            return Err(ScheduleError::InvalidRequest(
                "appointment must end after it starts".to_string(),
            ));
        }
        if end > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidRequest(
                "appointment may not run past midnight".to_string(),
            ));
        }

        Ok(Appointment {
            id: Uuid::new_v4().to_string(),
            patient: request.patient.trim().to_string(),
            provider_id: request.provider_id,
            chair_id: request.chair_id,
            type_id: request.type_id,
            date: request.date,
            start: request.start,
            end,
            status: AppointmentStatus::Confirmed,
        })
    }

    fn partition_lock(&self, chair_id: &str, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self.partition_locks.lock().unwrap();
        locks
            .entry((chair_id.to_string(), date))
            .or_default()
            .clone()
    }
}

fn status_name(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Confirmed => "confirmed",
        AppointmentStatus::InProgress => "in-progress",
        AppointmentStatus::Completed => "completed",
        AppointmentStatus::Cancelled => "cancelled",
    }
}
