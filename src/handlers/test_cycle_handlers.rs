use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api_structs::UserQuery;
use crate::auth::session::get_user_id;
use crate::errors::AppError;
use crate::tracker::{self, TrackerStore};

/// GET /api/test-cycles?userId=
pub async fn list<S: TrackerStore + 'static>(
    store: web::Data<S>,
    session: Session,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = query.into_inner().user_id.or_else(|| get_user_id(&session)).unwrap_or_default();
    let cycles = tracker::list_cycles(store.get_ref(), &user_id).await?;
    Ok(HttpResponse::Ok().json(cycles))
}
