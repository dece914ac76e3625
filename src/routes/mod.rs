// Route exports
pub mod facilities;

use actix_web::{error, web, HttpRequest};

use crate::models::ErrorResponse;

pub use facilities::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(facilities::configure),
    );
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let body = ErrorResponse::new("invalid_json", format!("Invalid JSON: {}", err));
    error::InternalError::from_response(err, actix_web::HttpResponse::BadRequest().json(body)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    let body = ErrorResponse::new("invalid_query", format!("Invalid query: {}", err));
    error::InternalError::from_response(err, actix_web::HttpResponse::BadRequest().json(body)).into()
}
