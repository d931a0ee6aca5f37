use crate::{models::SqlSnapshot, Db};
use chrono::Utc;

impl Db {
    pub async fn get_snapshot(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query_as::<_, SqlSnapshot>(
            "SELECT key, value, updated_at FROM snapshots WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|snapshot| {
            tracing::debug!(
                "Loaded snapshot '{}' ({} bytes, written {})",
                snapshot.key,
                snapshot.value.len(),
                snapshot.updated_at
            );
            snapshot.value
        }))
    }

    /// Replaces the whole snapshot stored under `key`.
    pub async fn save_snapshot(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().naive_utc())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
