mod board;
mod error;
pub mod ids;
pub mod ordering;
mod registry;
mod submission;
pub mod time_format;
mod user;
pub mod validation;

pub use board::{Board, VoteChoice};
pub use error::{DomainError, ErrorKind};
pub use ordering::{flatten_thread, rank_by_score, ThreadLine};
pub use registry::Registry;
pub use submission::{Comment, Entry, Post, Submission, DELETED_SCORE};
pub use user::{Credential, User, DEFAULT_COST};
