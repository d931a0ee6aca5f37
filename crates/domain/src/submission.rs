use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ids;
use crate::time_format;

/// Score reported by a deleted submission so it sinks below everything else.
pub const DELETED_SCORE: i64 = -10_000;

/// State shared by posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    id: String,
    author_name: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    upvoters: BTreeSet<String>,
    #[serde(default)]
    downvoters: BTreeSet<String>,
    #[serde(default)]
    replies: Vec<Comment>,
    #[serde(default)]
    deleted: bool,
}

impl Entry {
    fn new(id: String, author_name: &str) -> Self {
        Self {
            id,
            author_name: author_name.to_string(),
            created_at: Utc::now(),
            upvoters: BTreeSet::new(),
            downvoters: BTreeSet::new(),
            replies: Vec::new(),
            deleted: false,
        }
    }

    fn tombstone(&mut self) {
        self.author_name.clear();
        self.upvoters.clear();
        self.downvoters.clear();
        self.deleted = true;
    }
}

/// Behavior common to everything that can be voted on, replied to and deleted.
///
/// Implementors only expose their [`Entry`], the id prefix handed down to
/// replies, and how to wipe their own content; everything else is provided.
pub trait Submission {
    fn entry(&self) -> &Entry;
    fn entry_mut(&mut self) -> &mut Entry;

    /// Prefix for the ids of direct replies. `None` for top-level posts.
    fn reply_prefix(&self) -> Option<&str>;

    /// Clears the variant specific content (title and link, or text).
    fn clear_content(&mut self);

    fn id(&self) -> &str {
        &self.entry().id
    }

    fn is_deleted(&self) -> bool {
        self.entry().deleted
    }

    fn author_name(&self) -> Option<&str> {
        let entry = self.entry();
        (!entry.deleted).then_some(entry.author_name.as_str())
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        let entry = self.entry();
        (!entry.deleted).then_some(entry.created_at)
    }

    /// Human readable age, e.g. "3 hours ago". `None` once deleted.
    fn elapsed_label(&self, now: DateTime<Utc>) -> Option<String> {
        self.created_at()
            .map(|created| time_format::elapsed_between(created, now))
    }

    fn replies(&self) -> &[Comment] {
        &self.entry().replies
    }

    fn replies_mut(&mut self) -> &mut [Comment] {
        &mut self.entry_mut().replies
    }

    fn score(&self) -> i64 {
        let entry = self.entry();
        if entry.deleted {
            DELETED_SCORE
        } else {
            entry.upvoters.len() as i64 - entry.downvoters.len() as i64
        }
    }

    fn is_upvoted_by(&self, user: &str) -> bool {
        self.entry().upvoters.contains(user)
    }

    fn is_downvoted_by(&self, user: &str) -> bool {
        self.entry().downvoters.contains(user)
    }

    fn upvote(&mut self, user: &str) {
        let entry = self.entry_mut();
        entry.downvoters.remove(user);
        entry.upvoters.insert(user.to_string());
    }

    fn downvote(&mut self, user: &str) {
        let entry = self.entry_mut();
        entry.upvoters.remove(user);
        entry.downvoters.insert(user.to_string());
    }

    fn remove_vote(&mut self, user: &str) {
        let entry = self.entry_mut();
        entry.upvoters.remove(user);
        entry.downvoters.remove(user);
    }

    fn add_reply(&mut self, text: &str, author: &str) -> &Comment {
        self.add_reply_with(&mut rand::thread_rng(), text, author)
    }

    /// Appends a reply whose id is drawn from `rng`.
    fn add_reply_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        text: &str,
        author: &str,
    ) -> &Comment {
        let id = ids::generate_comment_id(rng, self.reply_prefix(), self.replies());
        let replies = &mut self.entry_mut().replies;
        replies.push(Comment::new(id, text, author));
        &replies[replies.len() - 1]
    }

    /// Soft-deletes the submission. Replies are kept as they are.
    fn mark_deleted(&mut self) {
        self.clear_content();
        self.entry_mut().tombstone();
    }

    /// Number of descendants at every depth.
    fn total_reply_count(&self) -> usize {
        self.replies()
            .iter()
            .map(|reply| 1 + reply.total_reply_count())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    entry: Entry,
    title: String,
    link: String,
}

impl Post {
    /// Creates a post whose id differs from every id in `used_ids`.
    ///
    /// Title and link are expected to be validated already, see
    /// [`crate::validation::validate_post`].
    pub fn new<I, S>(title: &str, link: &str, author: &str, used_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_rng(&mut rand::thread_rng(), title, link, author, used_ids)
    }

    pub fn with_rng<R, I, S>(
        rng: &mut R,
        title: &str,
        link: &str,
        author: &str,
        used_ids: I,
    ) -> Self
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = ids::generate_post_id(rng, used_ids);
        Self {
            entry: Entry::new(id, author),
            title: title.to_string(),
            link: link.to_string(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        (!self.entry.deleted).then_some(self.title.as_str())
    }

    pub fn link(&self) -> Option<&str> {
        (!self.entry.deleted).then_some(self.link.as_str())
    }
}

impl Submission for Post {
    fn entry(&self) -> &Entry {
        &self.entry
    }

    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }

    fn reply_prefix(&self) -> Option<&str> {
        None
    }

    fn clear_content(&mut self) {
        self.title.clear();
        self.link.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(flatten)]
    entry: Entry,
    text: String,
}

impl Comment {
    fn new(id: String, text: &str, author: &str) -> Self {
        Self {
            entry: Entry::new(id, author),
            text: text.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(id: String, text: &str, author: &str) -> Self {
        Self::new(id, text, author)
    }

    pub fn text(&self) -> Option<&str> {
        (!self.entry.deleted).then_some(self.text.as_str())
    }
}

impl Submission for Comment {
    fn entry(&self) -> &Entry {
        &self.entry
    }

    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }

    fn reply_prefix(&self) -> Option<&str> {
        Some(&self.entry.id)
    }

    fn clear_content(&mut self) {
        self.text.clear();
    }
}
