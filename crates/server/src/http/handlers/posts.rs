use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use domain::{Submission, VoteChoice};
use serde::Deserialize;

use crate::error::AppError;
use crate::session::{is_xhr, SignedIn};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PostForm {
    pub title: Option<String>,
    pub link: Option<String>,
}

#[derive(Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

pub async fn submit_post(
    State(state): State<AppState>,
    SignedIn {
        user_name,
        mut session,
    }: SignedIn,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let title = form.title.unwrap_or_default();
    let link = form.link.unwrap_or_default();

    let post_id = state
        .update_board(|board| {
            board
                .submit_post(&title, &link, &user_name)
                .map(|post| post.id().to_string())
        })
        .await?;

    tracing::info!(%post_id, "Post submitted by {}", user_name);
    session.flash_success("Post successfully submitted!");
    Ok(session.redirect("/"))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    SignedIn {
        user_name,
        mut session,
    }: SignedIn,
) -> Result<Response, AppError> {
    state
        .update_board(|board| board.delete_post(&post_id, &user_name))
        .await?;

    tracing::info!(%post_id, "Post deleted by {}", user_name);
    session.flash_success("Post successfully deleted!");
    Ok(session.redirect("/"))
}

pub async fn vote_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    SignedIn { user_name, session }: SignedIn,
    Form(form): Form<VoteForm>,
) -> Result<Response, AppError> {
    let choice = form.choice.as_deref().and_then(VoteChoice::parse);
    state
        .update_board(|board| board.vote_on_post(&post_id, &user_name, choice))
        .await?;

    if is_xhr(&headers) {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(session.redirect("/"))
    }
}
