use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::error::AppError;
use crate::http::views::{HomePage, PostView};
use crate::session::Session;
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    mut session: Session,
) -> Result<Response, AppError> {
    let board = state.store.load_board().await?;
    let viewer = session.user_name().map(str::to_string);
    let now = Utc::now();

    let page = HomePage {
        flash: session.take_flash(),
        posts: board
            .ranked_posts()
            .into_iter()
            .map(|post| PostView::new(post, viewer.as_deref(), now))
            .collect(),
        user: viewer,
    };

    Ok((session.cookie(), Json(page)).into_response())
}
