use actix_web::{HttpResponse, web};
use salon_booking::{AppointmentQuery, BookingRequest, RescheduleRequest, StatusUpdateRequest};
use salon_models::appointment::AppointmentId;
use serde_json::json;

use crate::{Admin, ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/appointments")
            .service(
                web::resource("")
                    .route(web::post().to(create))
                    .route(web::get().to(list)),
            )
            .service(web::resource("/{id}/status").route(web::put().to(update_status)))
            .service(web::resource("/{id}/reschedule").route(web::put().to(reschedule)))
            .service(web::resource("/{id}/send-reminder").route(web::post().to(send_reminder))),
    );
}

async fn create(
    state: web::Data<AppState>,
    body: web::Json<BookingRequest>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.engine.create(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Appointment booked successfully",
        "appointment": outcome.appointment,
        "notifications": outcome.notifications,
    })))
}

async fn list(
    _admin: Admin,
    state: web::Data<AppState>,
    query: web::Query<AppointmentQuery>,
) -> Result<HttpResponse, ApiError> {
    let appointments = state.engine.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

async fn update_status(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<AppointmentId>,
    body: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let update = state
        .engine
        .update_status(path.into_inner(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Appointment {} successfully", update.appointment.appointment.status),
        "appointment": update.appointment,
        "client_notified": update.client_notified,
        "reminder_scheduled": update.reminder_scheduled,
    })))
}

async fn reschedule(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<AppointmentId>,
    body: web::Json<RescheduleRequest>,
) -> Result<HttpResponse, ApiError> {
    let update = state
        .engine
        .reschedule(path.into_inner(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Appointment rescheduled successfully",
        "appointment": update.appointment,
        "client_notified": update.client_notified,
        "reminder_scheduled": update.reminder_scheduled,
    })))
}

async fn send_reminder(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<AppointmentId>,
) -> Result<HttpResponse, ApiError> {
    state.engine.send_manual_reminder(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Reminder sent successfully" })))
}

