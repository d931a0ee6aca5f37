use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use chrono::Utc;
use domain::{flatten_thread, ids::SEGMENT_LEN, DomainError, Submission, VoteChoice};
use serde::Deserialize;

use super::posts::VoteForm;
use crate::error::AppError;
use crate::http::views::{CommentPage, CommentView, PostView, ThreadPage};
use crate::session::{is_xhr, Session, SignedIn};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CommentForm {
    pub text: Option<String>,
}

fn thread_path(post_id: &str) -> String {
    format!("/posts/{}/comments", post_id)
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    mut session: Session,
) -> Result<Response, AppError> {
    let board = state.store.load_board().await?;
    let post = board.post(&post_id).ok_or(DomainError::PostNotFound)?;
    let viewer = session.user_name().map(str::to_string);
    let now = Utc::now();

    let page = ThreadPage {
        flash: session.take_flash(),
        post: PostView::new(post, viewer.as_deref(), now),
        comments: flatten_thread(post.replies())
            .into_iter()
            .map(|line| CommentView::from_line(line, viewer.as_deref(), now))
            .collect(),
        user: viewer,
    };

    Ok((session.cookie(), Json(page)).into_response())
}

pub async fn show_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
    session: Session,
) -> Result<Response, AppError> {
    let board = state.store.load_board().await?;
    let post = board.post(&post_id).ok_or(DomainError::PostNotFound)?;
    let comment = board.comment(&post_id, &comment_id)?;
    let viewer = session.user_name();
    let now = Utc::now();
    let depth = comment.id().len() / SEGMENT_LEN - 1;

    let page = CommentPage {
        user: viewer.map(str::to_string),
        post: PostView::new(post, viewer, now),
        comment: CommentView::new(comment, depth, viewer, now),
    };
    Ok(Json(page).into_response())
}

pub async fn post_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    SignedIn {
        user_name,
        mut session,
    }: SignedIn,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let comment_id = state
        .update_board(|board| {
            board
                .comment_on_post(&post_id, form.text.as_deref(), &user_name)
                .map(|comment| comment.id().to_string())
        })
        .await?;

    tracing::info!(%post_id, %comment_id, "Comment posted by {}", user_name);
    session.flash_success("Comment successfully posted");
    Ok(session.redirect(&thread_path(&post_id)))
}

pub async fn reply_to_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
    SignedIn {
        user_name,
        mut session,
    }: SignedIn,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let reply_id = state
        .update_board(|board| {
            board
                .reply_to_comment(&post_id, &comment_id, form.text.as_deref(), &user_name)
                .map(|reply| reply.id().to_string())
        })
        .await?;

    tracing::info!(%post_id, %reply_id, "Reply posted by {}", user_name);
    session.flash_success("Reply successfully submitted!");
    Ok(session.redirect(&thread_path(&post_id)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
    SignedIn {
        user_name,
        mut session,
    }: SignedIn,
) -> Result<Response, AppError> {
    state
        .update_board(|board| board.delete_comment(&post_id, &comment_id, &user_name))
        .await?;

    tracing::info!(%post_id, %comment_id, "Comment deleted by {}", user_name);
    session.flash_success("Comment successfully deleted");
    Ok(session.redirect(&thread_path(&post_id)))
}

pub async fn vote_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(String, String)>,
    headers: HeaderMap,
    SignedIn { user_name, session }: SignedIn,
    Form(form): Form<VoteForm>,
) -> Result<Response, AppError> {
    let choice = form.choice.as_deref().and_then(VoteChoice::parse);
    state
        .update_board(|board| board.vote_on_comment(&post_id, &comment_id, &user_name, choice))
        .await?;

    if is_xhr(&headers) {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(session.redirect(&thread_path(&post_id)))
    }
}
