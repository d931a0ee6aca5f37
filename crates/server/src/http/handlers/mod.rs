pub mod auth;
pub mod comments;
pub mod home;
pub mod posts;
