use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::scheduling::time::parse_time_to_minutes;
use crate::scheduling::types::AppointmentStatus;
use crate::scheduling::{AppointmentFilter, AppointmentRequest, SchedulingService};

/// Shared application state. The scheduling service serializes its own
/// mutations internally, so handlers share it without an outer mutex.
pub struct AppState {
    pub service: SchedulingService,
}

#[derive(Deserialize)]
pub struct ProposeRequest {
    patient: String,
    provider_id: String,
    chair_id: String,
    type_id: String,
    date: NaiveDate,
    /// HH:MM
    start: String,
    /// HH:MM; defaults to start + the appointment type's standard duration
    end: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    status: AppointmentStatus,
}

#[derive(Deserialize)]
pub struct ListQuery {
    provider: Option<String>,
    chair: Option<String>,
    search: Option<String>,
}

#[derive(Serialize)]
pub struct UtilizationResponse {
    chair_id: String,
    date: NaiveDate,
    percent: u32,
}

fn error_response(err: ScheduleError) -> HttpResponse {
    match err {
        ScheduleError::NotFound(_) => {
            HttpResponse::NotFound().json(serde_json::json!({"success": false, "error": err.to_string()}))
        }
        ScheduleError::Conflict(ref colliders) => HttpResponse::Conflict().json(serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "conflicts": colliders,
        })),
        ScheduleError::DuplicateId(_) | ScheduleError::InvalidTransition { .. } => {
            HttpResponse::Conflict().json(serde_json::json!({"success": false, "error": err.to_string()}))
        }
        ScheduleError::InvalidRequest(_) => HttpResponse::UnprocessableEntity()
            .json(serde_json::json!({"success": false, "error": err.to_string()})),
        ScheduleError::InvalidConfiguration(_) => HttpResponse::InternalServerError()
            .json(serde_json::json!({"success": false, "error": err.to_string()})),
    }
}

fn bad_date(value: &str) -> HttpResponse {
    HttpResponse::BadRequest()
        .json(serde_json::json!({"success": false, "error": format!("invalid date: {}", value)}))
}

// Propose-and-commit endpoint
async fn propose_appointment(
    req: web::Json<ProposeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();

    let start = match parse_time_to_minutes(&req.start) {
        Some(minutes) => minutes,
        None => {
            return Ok(HttpResponse::UnprocessableEntity().json(
                serde_json::json!({"success": false, "error": format!("invalid start time: {}", req.start)}),
            ))
        }
    };
    let end = match &req.end {
        Some(raw) => match parse_time_to_minutes(raw) {
            Some(minutes) => Some(minutes),
            None => {
                return Ok(HttpResponse::UnprocessableEntity().json(
                    serde_json::json!({"success": false, "error": format!("invalid end time: {}", raw)}),
                ))
            }
        },
        None => None,
    };

    let request = AppointmentRequest {
        patient: req.patient,
        provider_id: req.provider_id,
        chair_id: req.chair_id,
        type_id: req.type_id,
        date: req.date,
        start,
        end,
    };

    match state.service.propose(request) {
        Ok(appointment) => Ok(HttpResponse::Created()
            .json(serde_json::json!({"success": true, "appointment": appointment}))),
        Err(err) => Ok(error_response(err)),
    }
}

// Cancellation endpoint (status change, never a deletion)
async fn cancel_appointment(
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match state.service.cancel(&id) {
        Ok(appointment) => Ok(HttpResponse::Ok()
            .json(serde_json::json!({"success": true, "appointment": appointment}))),
        Err(err) => Ok(error_response(err)),
    }
}

// Lifecycle transition endpoint
async fn update_status(
    id: web::Path<String>,
    req: web::Json<StatusRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match state.service.transition(&id, req.status) {
        Ok(appointment) => Ok(HttpResponse::Ok()
            .json(serde_json::json!({"success": true, "appointment": appointment}))),
        Err(err) => Ok(error_response(err)),
    }
}

// Day listing with optional provider/chair/search filters
async fn list_appointments(
    date: web::Path<String>,
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let date = match date.parse::<NaiveDate>() {
        Ok(date) => date,
        Err(_) => return Ok(bad_date(&date)),
    };
    let filter = AppointmentFilter {
        provider_id: query.provider.clone(),
        chair_id: query.chair.clone(),
        search_text: query.search.clone(),
    };
    let appointments = state.service.list_appointments(date, &filter);
    Ok(HttpResponse::Ok().json(appointments))
}

// Chair utilization endpoint
async fn get_utilization(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (chair_id, raw_date) = path.into_inner();
    let date = match raw_date.parse::<NaiveDate>() {
        Ok(date) => date,
        Err(_) => return Ok(bad_date(&raw_date)),
    };
    match state.service.get_utilization(&chair_id, date) {
        Ok(percent) => Ok(HttpResponse::Ok().json(UtilizationResponse {
            chair_id,
            date,
            percent,
        })),
        Err(err) => Ok(error_response(err)),
    }
}

// Reference catalog endpoints
async fn list_chairs(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(&state.service.catalog().chairs))
}

async fn list_appointment_types(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(&state.service.catalog().appointment_types))
}

async fn list_providers(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(&state.service.catalog().providers))
}

pub async fn start_server(port: u16, service: SchedulingService) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { service });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .route("/api/appointments", web::post().to(propose_appointment))
            .route("/api/appointments/{id}/cancel", web::post().to(cancel_appointment))
            .route("/api/appointments/{id}/status", web::post().to(update_status))
            .route("/api/appointments/{date}", web::get().to(list_appointments))
            .route("/api/utilization/{chair}/{date}", web::get().to(get_utilization))
            .route("/api/chairs", web::get().to(list_chairs))
            .route("/api/appointment-types", web::get().to(list_appointment_types))
            .route("/api/providers", web::get().to(list_providers))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
