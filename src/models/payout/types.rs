use chrono::{DateTime, Utc};
use serde::Serialize;

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_PAID: &str = "PAID";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: String,
    pub tester_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Payout {
    pub fn is_paid(&self) -> bool {
        self.status == STATUS_PAID
    }
}
