pub mod conflict;
pub mod facade;
pub mod store;
pub mod time;
pub mod types;
pub mod utilization;

pub use conflict::find_conflicts;
pub use facade::{AppointmentFilter, AppointmentRequest, SchedulingService};
pub use store::AppointmentStore;
pub use time::{minutes_to_time_string, parse_time_to_minutes};
pub use types::{Appointment, AppointmentStatus, AppointmentType, Chair, ChairStatus, Provider};
pub use utilization::{utilization, DEFAULT_WORKING_WINDOW_MINUTES};
