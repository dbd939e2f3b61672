use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api_structs::{LoginRequest, LoginResponse};
use crate::auth::session::{clear, set_user};
use crate::errors::AppError;
use crate::tracker::{self, TrackerStore};

/// POST /api/auth/login
pub async fn login<S: TrackerStore + 'static>(
    store: web::Data<S>,
    session: Session,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = tracker::authenticate(store.get_ref(), &body).await?;
    set_user(&session, &user)?;
    Ok(HttpResponse::Ok().json(LoginResponse { user }))
}

/// POST /api/auth/logout
pub async fn logout(session: Session) -> HttpResponse {
    clear(&session);
    HttpResponse::NoContent().finish()
}
