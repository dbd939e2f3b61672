pub mod assignment;
pub mod bug_report;
pub mod payout;
pub mod project;
pub mod test_cycle;
pub mod user;

use rand::Rng;

/// Generate an opaque id such as `bug-3f9a…` (16 random bytes, hex).
pub fn generate_id(prefix: &str) -> String {
    let bytes: [u8; 16] = rand::rng().random();
    format!("{prefix}-{}", hex::encode(bytes))
}
