use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api_structs::UserQuery;
use crate::auth::session::get_user_id;
use crate::errors::AppError;
use crate::tracker::TrackerStore;

/// GET /api/dashboard?userId= (role-specific summary)
/// Without `userId`, the logged-in session user is used.
pub async fn show<S: TrackerStore + 'static>(
    store: web::Data<S>,
    session: Session,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = query
        .into_inner()
        .user_id
        .or_else(|| get_user_id(&session))
        .unwrap_or_default();

    let summary = crate::dashboard::build_summary(store.get_ref(), &user_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}
