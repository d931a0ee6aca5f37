use anyhow::Context;
use async_trait::async_trait;
use domain::{Board, Registry};
use serde::{de::DeserializeOwned, Serialize};

use crate::Db;

pub const POSTS_KEY: &str = "posts";
pub const USERS_KEY: &str = "users";

/// Whole-collection persistence for the board and the user registry.
///
/// Implementors only move opaque snapshot strings; encoding lives in the
/// provided methods. A missing snapshot loads as an empty collection.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn read(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn write(&self, key: &str, value: String) -> anyhow::Result<()>;

    async fn load_board(&self) -> anyhow::Result<Board> {
        load(self, POSTS_KEY).await
    }

    async fn save_board(&self, board: &Board) -> anyhow::Result<()> {
        save(self, POSTS_KEY, board).await
    }

    async fn load_registry(&self) -> anyhow::Result<Registry> {
        load(self, USERS_KEY).await
    }

    async fn save_registry(&self, registry: &Registry) -> anyhow::Result<()> {
        save(self, USERS_KEY, registry).await
    }
}

async fn load<S, T>(store: &S, key: &str) -> anyhow::Result<T>
where
    S: SnapshotStore + ?Sized,
    T: DeserializeOwned + Default,
{
    match store.read(key).await? {
        Some(raw) => {
            serde_json::from_str(&raw).with_context(|| format!("Corrupt snapshot '{}'", key))
        }
        None => Ok(T::default()),
    }
}

async fn save<S, T>(store: &S, key: &str, value: &T) -> anyhow::Result<()>
where
    S: SnapshotStore + ?Sized,
    T: Serialize + Sync,
{
    let raw = serde_json::to_string(value)?;
    store.write(key, raw).await
}

#[async_trait]
impl SnapshotStore for Db {
    async fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.get_snapshot(key).await
    }

    async fn write(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.save_snapshot(key, &value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use domain::{Submission, VoteChoice};

    async fn round_trip(store: &dyn SnapshotStore) {
        assert!(store.load_board().await.unwrap().posts().is_empty());
        assert!(store.load_registry().await.unwrap().users().is_empty());

        let mut board = Board::default();
        let post_id = board
            .submit_post("Real Reddit", "https://www.reddit.com/", "User")
            .unwrap()
            .id()
            .to_string();
        let comment_id = board
            .comment_on_post(&post_id, Some("Haha"), "User")
            .unwrap()
            .id()
            .to_string();
        board
            .reply_to_comment(&post_id, &comment_id, Some("Nested"), "Other")
            .unwrap();
        board
            .vote_on_comment(&post_id, &comment_id, "Other", Some(VoteChoice::Upvote))
            .unwrap();
        store.save_board(&board).await.unwrap();

        let mut registry = Registry::default();
        registry.register(Some("User"), Some("password"), 4).unwrap();
        store.save_registry(&registry).await.unwrap();

        let loaded = store.load_board().await.unwrap();
        assert_eq!(loaded, board);
        let comment = loaded.comment(&post_id, &comment_id).unwrap();
        assert_eq!(comment.score(), 1);
        assert_eq!(comment.total_reply_count(), 1);

        let users = store.load_registry().await.unwrap();
        assert!(users.sign_in("User", Some("password")).is_ok());
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        let db = Db::new("sqlite::memory:").await.unwrap();
        round_trip(&db).await;
    }

    #[tokio::test]
    async fn test_memory_round_trip() {
        round_trip(&MemoryStore::default()).await;
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let store = MemoryStore::default();
        store.write(POSTS_KEY, "not json".to_string()).await.unwrap();
        let err = store.load_board().await.unwrap_err();
        assert!(err.to_string().contains("Corrupt snapshot 'posts'"));
    }
}
