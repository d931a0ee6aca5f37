use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SqlSnapshot {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}
