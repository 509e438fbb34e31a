use chrono::NaiveDate;

use super::types::Appointment;
use crate::error::ScheduleError;

/// Default working-day length: 10 hours.
pub const DEFAULT_WORKING_WINDOW_MINUTES: u32 = 600;

/// Percentage of the working window booked on `chair_id` for `date`, rounded
/// half-up. Cancelled appointments are excluded. Overlapping appointments are
/// NOT de-duplicated: their durations sum independently, so a schedule with
/// overlaps (possible in historical data predating conflict enforcement) can
/// report more than 100.
pub fn utilization(
    chair_id: &str,
    date: NaiveDate,
    appointments: &[Appointment],
    working_window_minutes: u32,
) -> Result<u32, ScheduleError> {
    if working_window_minutes == 0 {
        return Err(ScheduleError::InvalidConfiguration(
            "working window must be a positive number of minutes".to_string(),
        ));
    }

    let booked_minutes: u64 = appointments
        .iter()
        .filter(|a| a.chair_id == chair_id && a.date == date && !a.is_cancelled())
        .map(|a| a.duration_minutes() as u64)
        .sum();

    // round-half-up integer percentage
    let window = working_window_minutes as u64;
    let percent = (booked_minutes * 100 * 2 + window) / (window * 2);
    Ok(percent as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::types::AppointmentStatus;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn appt(id: &str, chair: &str, start: u16, end: u16) -> Appointment {
        Appointment {
            id: id.to_string(),
            patient: "Test Patient".to_string(),
            provider_id: "dr-1".to_string(),
            chair_id: chair.to_string(),
            type_id: "exam".to_string(),
            date: date(),
            start,
            end,
            status: AppointmentStatus::Confirmed,
        }
    }

    #[test]
    fn empty_schedule_is_zero_percent() {
        assert_eq!(utilization("chair-1", date(), &[], 600).unwrap(), 0);
    }

    #[test]
    fn three_appointments_totaling_180_of_600_is_30_percent() {
        let appts = vec![
            appt("a", "chair-1", 480, 540),
            appt("b", "chair-1", 600, 660),
            appt("c", "chair-1", 700, 760),
        ];
        assert_eq!(utilization("chair-1", date(), &appts, 600).unwrap(), 30);
    }

    #[test]
    fn fully_packed_window_is_exactly_100_percent() {
        let appts = vec![appt("a", "chair-1", 480, 1080)];
        assert_eq!(utilization("chair-1", date(), &appts, 600).unwrap(), 100);
    }

    #[test]
    fn rounds_half_up() {
        // 125 / 600 = 20.83 -> 21
        let appts = vec![appt("a", "chair-1", 480, 605)];
        assert_eq!(utilization("chair-1", date(), &appts, 600).unwrap(), 21);
        // 3 / 600 = 0.5 -> 1
        let appts = vec![appt("a", "chair-1", 480, 483)];
        assert_eq!(utilization("chair-1", date(), &appts, 600).unwrap(), 1);
        // 2 / 600 = 0.33 -> 0
        let appts = vec![appt("a", "chair-1", 480, 482)];
        assert_eq!(utilization("chair-1", date(), &appts, 600).unwrap(), 0);
    }

    #[test]
    fn cancelled_appointments_do_not_count() {
        let mut cancelled = appt("a", "chair-1", 480, 1080);
        cancelled.status = AppointmentStatus::Cancelled;
        assert_eq!(utilization("chair-1", date(), &[cancelled], 600).unwrap(), 0);
    }

    #[test]
    fn other_chairs_do_not_count() {
        let appts = vec![appt("a", "chair-2", 480, 1080)];
        assert_eq!(utilization("chair-1", date(), &appts, 600).unwrap(), 0);
    }

    #[test]
    fn overlapping_appointments_can_exceed_100_percent() {
        let appts = vec![
            appt("a", "chair-1", 480, 1080),
            appt("b", "chair-1", 480, 1080),
        ];
        assert_eq!(utilization("chair-1", date(), &appts, 600).unwrap(), 200);
    }

    #[test]
    fn zero_window_is_a_configuration_error() {
        let err = utilization("chair-1", date(), &[], 0).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
    }
}
