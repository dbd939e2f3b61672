use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api_structs::{BugReportRequest, UserQuery};
use crate::auth::session::get_user_id;
use crate::errors::AppError;
use crate::tracker::{self, TrackerStore};

/// GET /api/bug-reports?userId=
pub async fn list<S: TrackerStore + 'static>(
    store: web::Data<S>,
    session: Session,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = query.into_inner().user_id.or_else(|| get_user_id(&session)).unwrap_or_default();
    let reports = tracker::list_bug_reports(store.get_ref(), &user_id).await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// POST /api/bug-reports, testers only.
pub async fn create<S: TrackerStore + 'static>(
    store: web::Data<S>,
    body: web::Json<BugReportRequest>,
) -> Result<HttpResponse, AppError> {
    let created = tracker::file_bug_report(store.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}
