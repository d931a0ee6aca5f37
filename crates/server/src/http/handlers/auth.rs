use axum::{extract::State, response::Response, Form};
use serde::Deserialize;

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub user_id: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let cost = state.bcrypt_cost;
    let name = state
        .update_registry(|registry| {
            registry
                .register(form.user_id.as_deref(), form.password.as_deref(), cost)
                .map(|user| user.name().to_string())
        })
        .await?;

    tracing::info!("Registered user {}", name);
    session.sign_in(&name);
    session.flash_success(format!("Thanks for registering, {}", name));
    Ok(session.redirect("/"))
}

pub async fn sign_in(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let registry = state.store.load_registry().await?;
    let user = registry.sign_in(
        form.user_id.as_deref().unwrap_or_default(),
        form.password.as_deref(),
    )?;

    session.sign_in(user.name());
    session.flash_success(format!("Welcome, {}", user.name()));
    Ok(session.redirect("/"))
}

pub async fn sign_out(mut session: Session) -> Response {
    session.sign_out();
    session.flash_success("Successfully signed out");
    session.redirect("/")
}
