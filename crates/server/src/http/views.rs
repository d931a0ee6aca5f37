use chrono::{DateTime, Utc};
use domain::{Comment, Post, Submission, ThreadLine};
use serde::Serialize;

use crate::session::Flash;

#[derive(Serialize)]
pub struct PostView {
    pub id: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub author: Option<String>,
    pub score: i64,
    pub submitted: Option<String>,
    pub reply_count: usize,
    pub deleted: bool,
    pub upvoted: bool,
    pub downvoted: bool,
}

impl PostView {
    pub fn new(post: &Post, viewer: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            id: post.id().to_string(),
            title: post.title().map(str::to_string),
            link: post.link().map(str::to_string),
            author: post.author_name().map(str::to_string),
            score: post.score(),
            submitted: post.elapsed_label(now),
            reply_count: post.total_reply_count(),
            deleted: post.is_deleted(),
            upvoted: viewer.is_some_and(|u| post.is_upvoted_by(u)),
            downvoted: viewer.is_some_and(|u| post.is_downvoted_by(u)),
        }
    }
}

#[derive(Serialize)]
pub struct CommentView {
    pub id: String,
    pub depth: usize,
    pub text: Option<String>,
    pub author: Option<String>,
    pub score: i64,
    pub submitted: Option<String>,
    pub deleted: bool,
    pub upvoted: bool,
    pub downvoted: bool,
}

impl CommentView {
    pub fn new(comment: &Comment, depth: usize, viewer: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            id: comment.id().to_string(),
            depth,
            text: comment.text().map(str::to_string),
            author: comment.author_name().map(str::to_string),
            score: comment.score(),
            submitted: comment.elapsed_label(now),
            deleted: comment.is_deleted(),
            upvoted: viewer.is_some_and(|u| comment.is_upvoted_by(u)),
            downvoted: viewer.is_some_and(|u| comment.is_downvoted_by(u)),
        }
    }

    pub fn from_line(line: ThreadLine<'_>, viewer: Option<&str>, now: DateTime<Utc>) -> Self {
        Self::new(line.comment, line.depth, viewer, now)
    }
}

#[derive(Serialize)]
pub struct HomePage {
    pub flash: Option<Flash>,
    pub user: Option<String>,
    pub posts: Vec<PostView>,
}

#[derive(Serialize)]
pub struct ThreadPage {
    pub flash: Option<Flash>,
    pub user: Option<String>,
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

#[derive(Serialize)]
pub struct CommentPage {
    pub user: Option<String>,
    pub post: PostView,
    pub comment: CommentView,
}
