use crate::error::DomainError;

pub const MAX_USERNAME_LEN: usize = 20;
pub const MAX_TITLE_LEN: usize = 100;

fn is_word_or_space(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace() || c == '\u{0B}'
}

/// Checks the shape of a new username. Uniqueness is checked by the registry.
pub fn validate_username(name: Option<&str>) -> Result<&str, DomainError> {
    let name = name.ok_or(DomainError::UsernameMissing)?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::UsernameBlank);
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::UsernameTooLong);
    }
    if !name.chars().all(is_word_or_space) {
        return Err(DomainError::UsernameInvalidChars);
    }
    Ok(trimmed)
}

pub fn validate_password(password: Option<&str>) -> Result<&str, DomainError> {
    let password = password.ok_or(DomainError::PasswordMissing)?;
    if password.trim().is_empty() {
        return Err(DomainError::PasswordBlank);
    }
    Ok(password)
}

pub fn validate_post(title: &str, link: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() || link.trim().is_empty() {
        return Err(DomainError::TitleOrLinkMissing);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::TitleTooLong);
    }
    if !link.starts_with("http") {
        return Err(DomainError::LinkNotHttp);
    }
    Ok(())
}

pub fn validate_comment(text: Option<&str>) -> Result<&str, DomainError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(DomainError::CommentEmpty),
    }
}
