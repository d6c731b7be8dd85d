use actix_web::{HttpResponse, web};
use salon_booking::ServiceRequest;
use salon_models::service::ServiceId;
use serde_json::json;

use crate::{Admin, ApiError, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/services")
            .service(
                web::resource("")
                    .route(web::get().to(list_active))
                    .route(web::post().to(create)),
            )
            // Before `/{id}`, which would otherwise capture it.
            .service(web::resource("/all").route(web::get().to(list_all)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get))
                    .route(web::put().to(update))
                    .route(web::delete().to(deactivate)),
            ),
    );
}

async fn list_active(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.catalog.list_services(false).await?))
}

async fn list_all(_admin: Admin, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.catalog.list_services(true).await?))
}

async fn get(
    state: web::Data<AppState>,
    path: web::Path<ServiceId>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.catalog.get_service(path.into_inner()).await?))
}

async fn create(
    _admin: Admin,
    state: web::Data<AppState>,
    body: web::Json<ServiceRequest>,
) -> Result<HttpResponse, ApiError> {
    let service = state.catalog.create_service(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(service))
}

async fn update(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<ServiceId>,
    body: web::Json<ServiceRequest>,
) -> Result<HttpResponse, ApiError> {
    let service = state
        .catalog
        .update_service(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(service))
}

async fn deactivate(
    _admin: Admin,
    state: web::Data<AppState>,
    path: web::Path<ServiceId>,
) -> Result<HttpResponse, ApiError> {
    state.catalog.deactivate_service(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Service deleted successfully" })))
}
