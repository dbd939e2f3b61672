use actix_session::Session;

use crate::errors::AppError;
use crate::models::user::User;

const USER_ID_KEY: &str = "user_id";

pub fn get_user_id(session: &Session) -> Option<String> {
    session.get::<String>(USER_ID_KEY).unwrap_or(None)
}

/// Remember the logged-in user for later requests.
pub fn set_user(session: &Session, user: &User) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID_KEY, &user.id)
        .map_err(|e| AppError::Session(format!("Failed to store session: {e}")))
}

pub fn clear(session: &Session) {
    session.purge();
}
