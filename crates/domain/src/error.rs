use thiserror::Error;

/// Coarse grouping used by callers to pick a response for a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Internal,
}

/// Every expected failure of a board or registry operation.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Must enter something for your username")]
    UsernameMissing,
    #[error("Username must include alphanumeric characters")]
    UsernameBlank,
    #[error("Username must be less than 20 characters long")]
    UsernameTooLong,
    #[error("Username can only include alphanumeric characters and spaces")]
    UsernameInvalidChars,
    #[error("Sorry, that username is already taken")]
    UsernameTaken,
    #[error("Must enter something for your password")]
    PasswordMissing,
    #[error("Password must include non-space characters")]
    PasswordBlank,
    #[error("Could not store credential: {0}")]
    CredentialHash(String),

    #[error("Sorry, we don't recognize that username")]
    UnknownUser,
    #[error("Must enter a password")]
    SignInPasswordMissing,
    #[error("Invalid password.  Please try again")]
    WrongPassword,

    #[error("Must enter a title and link")]
    TitleOrLinkMissing,
    #[error("Title length must be 100 characters or less")]
    TitleTooLong,
    #[error("Link must be an http address")]
    LinkNotHttp,
    #[error("Sorry, comment must have text")]
    CommentEmpty,

    #[error("Sorry, that post doesn't exist")]
    PostNotFound,
    #[error("Sorry, that comment doesn't exist")]
    CommentNotFound,

    #[error("Posts can only be deleted by the user that submitted them")]
    NotPostAuthor,
    #[error("Only the user that submitted the comment can delete it")]
    NotCommentAuthor,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::PostNotFound | DomainError::CommentNotFound => ErrorKind::NotFound,
            DomainError::NotPostAuthor | DomainError::NotCommentAuthor => ErrorKind::Forbidden,
            DomainError::CredentialHash(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }
}
