use std::path::Path;

use chrono::NaiveDate;

use chairside::display::{print_day_sheet, write_day_sheet_to_file};
use chairside::error::ScheduleError;
use chairside::reference::ReferenceCatalog;
use chairside::scheduling::{
    AppointmentRequest, SchedulingService, DEFAULT_WORKING_WINDOW_MINUTES,
};
use chairside::web;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let catalog = ReferenceCatalog::load_or_builtin(Path::new("config"));
    let service = SchedulingService::new(catalog, DEFAULT_WORKING_WINDOW_MINUTES);

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        println!("Starting scheduling server on port {}...", port);
        println!("API root: http://localhost:{}/api", port);

        web::start_server(port, service).await?;
        return Ok(());
    }

    // CLI mode: book a demo day and print the day sheet
    let date = NaiveDate::from_ymd_opt(2025, 1, 10).ok_or("bad demo date")?;
    println!("Booking demo day {}...", date);

    let bookings = [
        ("Maria Lopez", "dr-chen", "chair-1", "cleaning", 540, Some(585)),
        ("Dan Wright", "dr-chen", "chair-1", "filling", 600, Some(660)),
        ("Priya Natarajan", "dr-okafor", "chair-2", "crown", 540, Some(630)),
        ("Sam Becker", "hyg-mills", "chair-3", "exam", 480, None),
        // deliberately collides with Maria's 09:00-09:45 cleaning
        ("Walk-in Patient", "dr-okafor", "chair-1", "exam", 555, None),
    ];

    for (patient, provider, chair, type_id, start, end) in bookings {
        let result = service.propose(AppointmentRequest {
            patient: patient.to_string(),
            provider_id: provider.to_string(),
            chair_id: chair.to_string(),
            type_id: type_id.to_string(),
            date,
            start,
            end,
        });
        match result {
            Ok(appointment) => println!("  booked {} ({})", patient, appointment.id),
            Err(ScheduleError::Conflict(colliders)) => {
                println!(
                    "  REJECTED {}: collides with {} existing appointment(s)",
                    patient,
                    colliders.len()
                );
            }
            Err(e) => println!("  REJECTED {}: {}", patient, e),
        }
    }

    print_day_sheet(&service, date);

    let filename = "day_sheet.txt";
    write_day_sheet_to_file(&service, date, filename)?;
    println!("\nDay sheet saved to {}", filename);

    Ok(())
}
