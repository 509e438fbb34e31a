use std::fs::File;
use std::io::Write;

use chrono::NaiveDate;

use crate::reference::ReferenceCatalog;
use crate::scheduling::time::minutes_to_time_string;
use crate::scheduling::types::{Appointment, AppointmentStatus};
use crate::scheduling::{AppointmentFilter, SchedulingService};

/// Formats a booking line as "HH:MM-HH:MM patient (provider, type)"
pub fn format_appointment(appointment: &Appointment, catalog: &ReferenceCatalog) -> String {
    let provider = catalog
        .provider(&appointment.provider_id)
        .map(|p| p.name.as_str())
        .unwrap_or(appointment.provider_id.as_str());
    let type_name = catalog
        .appointment_type(&appointment.type_id)
        .map(|t| t.name.as_str())
        .unwrap_or(appointment.type_id.as_str());
    let mut line = format!(
        "{}-{} {} ({}, {})",
        minutes_to_time_string(appointment.start),
        minutes_to_time_string(appointment.end),
        appointment.patient,
        provider,
        type_name,
    );
    if appointment.status == AppointmentStatus::Cancelled {
        line.push_str(" [CANCELLED]");
    }
    line
}

fn chair_appointments(
    service: &SchedulingService,
    chair_id: &str,
    date: NaiveDate,
) -> Vec<Appointment> {
    service.list_appointments(
        date,
        &AppointmentFilter {
            chair_id: Some(chair_id.to_string()),
            ..Default::default()
        },
    )
}

/// Prints the per-chair day sheet with utilization for each chair
pub fn print_day_sheet(service: &SchedulingService, date: NaiveDate) {
    println!("\n=== Day Sheet for {} ===", date);
    let catalog = service.catalog();

    for chair in &catalog.chairs {
        let appointments = chair_appointments(service, &chair.id, date);
        let utilization = service
            .get_utilization(&chair.id, date)
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|_| "n/a".to_string());

        println!("\n{} ({}) - utilization {}", chair.name, chair.id, utilization);
        if appointments.is_empty() {
            println!("  [EMPTY]");
        }
        for appointment in &appointments {
            println!("  {}", format_appointment(appointment, catalog));
        }
    }
}

/// Writes the day sheet to a file, one chair section per block
pub fn write_day_sheet_to_file(
    service: &SchedulingService,
    date: NaiveDate,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    let catalog = service.catalog();

    writeln!(file, "** Day Sheet {} **", date)?;
    for chair in &catalog.chairs {
        let appointments = chair_appointments(service, &chair.id, date);
        writeln!(file, "\n{} ({})", chair.name, chair.id)?;
        if appointments.is_empty() {
            writeln!(file, "  [EMPTY]")?;
        }
        for appointment in &appointments {
            writeln!(file, "  {}", format_appointment(appointment, catalog))?;
        }
    }

    Ok(())
}
