use axum::extract::FromRef;
use domain::{Board, DomainError, Registry};
use std::sync::Arc;
use storage::SnapshotStore;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::session::SessionKey;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SnapshotStore>,
    pub sessions: SessionKey,
    pub bcrypt_cost: u32,
    // 串行化进程内的 读取-修改-写回，避免并发请求互相覆盖
    write_lock: Arc<Mutex<()>>,
}

impl FromRef<AppState> for SessionKey {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl AppState {
    pub fn new(store: Arc<dyn SnapshotStore>, sessions: SessionKey, bcrypt_cost: u32) -> Self {
        Self {
            store,
            sessions,
            bcrypt_cost,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads the board, applies `op` and saves the result. Nothing is written
    /// when `op` fails.
    pub async fn update_board<T>(
        &self,
        op: impl FnOnce(&mut Board) -> Result<T, DomainError>,
    ) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut board = self.store.load_board().await?;
        let out = op(&mut board)?;
        self.store.save_board(&board).await?;
        Ok(out)
    }

    pub async fn update_registry<T>(
        &self,
        op: impl FnOnce(&mut Registry) -> Result<T, DomainError>,
    ) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut registry = self.store.load_registry().await?;
        let out = op(&mut registry)?;
        self.store.save_registry(&registry).await?;
        Ok(out)
    }
}
