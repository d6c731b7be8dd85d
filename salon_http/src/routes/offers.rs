use actix_web::{HttpResponse, web};
use salon_booking::OfferRequest;
use salon_models::offer::OfferId;
use serde_json::json;

use crate::{Admin, ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/offers")
            .service(
                web::resource("")
                    .route(web::get().to(list_visible))
                    .route(web::post().to(create)),
            )
            .service(web::resource("/all").route(web::get().to(list_all)))
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update))
                    .route(web::delete().to(deactivate)),
            ),
    );
}

async fn list_visible(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.catalog.list_visible_offers().await?))
}

async fn list_all(_admin: Admin, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.catalog.list_all_offers().await?))
}

async fn create(
    _admin: Admin,
    state: web::Data<AppState>,
    body: web::Json<OfferRequest>,
) -> Result<HttpResponse, ApiError> {
    let offer = state.catalog.create_offer(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(offer))
}

async fn update(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<OfferId>,
    body: web::Json<OfferRequest>,
) -> Result<HttpResponse, ApiError> {
    let offer = state
        .catalog
        .update_offer(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(offer))
}

async fn deactivate(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<OfferId>,
) -> Result<HttpResponse, ApiError> {
    state.catalog.deactivate_offer(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Offer deleted successfully" })))
}
