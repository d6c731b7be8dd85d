use actix_web::{HttpResponse, web};
use salon_booking::ReviewSubmission;
use salon_models::review::ReviewId;
use serde::Deserialize;
use serde_json::json;

use crate::{Admin, ApiError, AppState};

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reviews")
            .service(
                web::resource("")
                    .route(web::get().to(list_approved))
                    .route(web::post().to(submit)),
            )
            .service(web::resource("/all").route(web::get().to(list_all)))
            .service(web::resource("/{id}/status").route(web::put().to(set_status)))
            .service(web::resource("/{id}").route(web::delete().to(delete))),
    );
}

async fn list_approved(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.reviews.list_approved().await?))
}

async fn submit(
    state: web::Data<AppState>,
    body: web::Json<ReviewSubmission>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.reviews.submit(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Review submitted successfully! Thank you for your feedback.",
        "review": outcome.review,
        "thank_you_sent": outcome.thank_you_sent,
    })))
}

async fn list_all(_admin: Admin, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.reviews.list_all().await?))
}

async fn set_status(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<ReviewId>,
    body: web::Json<StatusBody>,
) -> Result<HttpResponse, ApiError> {
    let change = state
        .reviews
        .set_status(path.into_inner(), &body.status)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Review {} successfully", change.review.review.status),
        "review": change.review,
        "client_notified": change.client_notified,
    })))
}

async fn delete(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<ReviewId>,
) -> Result<HttpResponse, ApiError> {
    state.reviews.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Review deleted successfully" })))
}
