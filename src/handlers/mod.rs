pub mod auth_handlers;
pub mod bug_report_handlers;
pub mod dashboard;
pub mod test_cycle_handlers;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::errors::AppError;
use crate::tracker::TrackerStore;

/// CSRF protection for mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type: application/json.
/// Browsers cannot send cross-origin JSON with cookies via simple form POST,
/// so the Content-Type check acts as a CSRF guard without requiring tokens.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure the `/api` routes against a concrete store type.
pub fn configure<S: TrackerStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidInput(format!("Invalid JSON payload: {err}")).into()
    }));
    cfg.service(
        web::scope("/api")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/dashboard", web::get().to(dashboard::show::<S>))
            .route("/auth/login", web::post().to(auth_handlers::login::<S>))
            .route("/auth/logout", web::post().to(auth_handlers::logout))
            .route("/test-cycles", web::get().to(test_cycle_handlers::list::<S>))
            .route("/bug-reports", web::get().to(bug_report_handlers::list::<S>))
            .route("/bug-reports", web::post().to(bug_report_handlers::create::<S>)),
    );
}
