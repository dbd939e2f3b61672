pub mod password;
pub mod session;
pub mod validate;
