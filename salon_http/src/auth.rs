use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header::Header, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};

use crate::{ApiError, AppState};

/// Extractor guarding admin routes: `Authorization: Bearer <admin token>`.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl FromRequest for Admin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<Admin, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(ApiError::Unauthorized)?;
    let credentials = Authorization::<Bearer>::parse(req).map_err(|_| ApiError::Unauthorized)?;
    let token = credentials.as_ref().token();

    if state.admin_token.is_empty() || token != state.admin_token {
        log::warn!("Rejected admin request. [path = {}]", req.path());
        return Err(ApiError::Unauthorized);
    }

    Ok(Admin)
}
