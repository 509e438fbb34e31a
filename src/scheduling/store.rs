use std::collections::HashMap;

use chrono::NaiveDate;

use super::types::{Appointment, AppointmentStatus};
use crate::error::ScheduleError;

/// Owns the appointment collection. Nothing is ever physically deleted:
/// cancellation is a status change, so the audit trail and utilization
/// history stay intact. Callers receive clones, never references into the
/// map, so interval data used by the conflict math cannot be aliased.
#[derive(Debug, Default)]
pub struct AppointmentStore {
    appointments: HashMap<String, Appointment>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, appointment: Appointment) -> Result<String, ScheduleError> {
        if self.appointments.contains_key(&appointment.id) {
            return Err(ScheduleError::DuplicateId(appointment.id));
        }
        let id = appointment.id.clone();
        self.appointments.insert(id.clone(), appointment);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<Appointment> {
        self.appointments.get(id).cloned()
    }

    /// All appointments on `date`, ascending by start time, ties broken by id
    /// so display and tests are deterministic.
    pub fn list_by_date(&self, date: NaiveDate) -> Vec<Appointment> {
        let mut result: Vec<Appointment> = self
            .appointments
            .values()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        result
    }

    pub fn list_by_chair_and_date(&self, chair_id: &str, date: NaiveDate) -> Vec<Appointment> {
        let mut result: Vec<Appointment> = self
            .appointments
            .values()
            .filter(|a| a.chair_id == chair_id && a.date == date)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        result
    }

    /// Sets the status unconditionally. Transition legality is the scheduling
    /// facade's concern, not the store's.
    pub fn update_status(
        &mut self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ScheduleError> {
        match self.appointments.get_mut(id) {
            Some(appointment) => {
                appointment.status = status;
                Ok(appointment.clone())
            }
            None => Err(ScheduleError::NotFound(id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appt(id: &str, chair: &str, start: u16, end: u16) -> Appointment {
        Appointment {
            id: id.to_string(),
            patient: "Test Patient".to_string(),
            provider_id: "dr-1".to_string(),
            chair_id: chair.to_string(),
            type_id: "exam".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            start,
            end,
            status: AppointmentStatus::Confirmed,
        }
    }

    #[test]
    fn add_then_get_round_trips() {
        let mut store = AppointmentStore::new();
        assert!(store.is_empty());

        let id = store.add(appt("a1", "chair-1", 540, 600)).unwrap();
        assert_eq!(id, "a1");
        assert_eq!(store.get("a1").unwrap().start, 540);
        assert!(store.get("missing").is_none());
        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = AppointmentStore::new();
        store.add(appt("a1", "chair-1", 540, 600)).unwrap();
        let err = store.add(appt("a1", "chair-2", 700, 760)).unwrap_err();
        assert!(matches!(err, ScheduleError::DuplicateId(id) if id == "a1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn listing_orders_by_start_then_id() {
        let mut store = AppointmentStore::new();
        store.add(appt("b", "chair-1", 540, 600)).unwrap();
        store.add(appt("a", "chair-1", 540, 570)).unwrap();
        store.add(appt("c", "chair-2", 480, 510)).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let ids: Vec<String> = store.list_by_date(date).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        let ids: Vec<String> = store
            .list_by_chair_and_date("chair-1", date)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn update_status_on_unknown_id_is_not_found() {
        let mut store = AppointmentStore::new();
        let err = store
            .update_status("missing", AppointmentStatus::Cancelled)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound(_)));
    }

    #[test]
    fn update_status_returns_the_updated_appointment() {
        let mut store = AppointmentStore::new();
        store.add(appt("a1", "chair-1", 540, 600)).unwrap();
        let updated = store
            .update_status("a1", AppointmentStatus::Cancelled)
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Cancelled);
        assert_eq!(store.get("a1").unwrap().status, AppointmentStatus::Cancelled);
    }
}
