use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids;
use crate::ordering::rank_by_score;
use crate::submission::{Comment, Post, Submission};
use crate::validation::{validate_comment, validate_post};

/// The three vote actions a user can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    Upvote,
    Downvote,
    Remove,
}

impl VoteChoice {
    /// Unknown choices map to `None` and are ignored by the vote operations.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "upvote" => Some(Self::Upvote),
            "downvote" => Some(Self::Downvote),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn apply<S: Submission>(self, target: &mut S, user: &str) {
        match self {
            Self::Upvote => target.upvote(user),
            Self::Downvote => target.downvote(user),
            Self::Remove => target.remove_vote(user),
        }
    }
}

/// Every post with its reply tree. This is the unit that gets loaded and
/// saved as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    posts: Vec<Post>,
}

impl Board {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn ranked_posts(&self) -> Vec<&Post> {
        rank_by_score(&self.posts)
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id() == post_id)
    }

    pub fn post_mut(&mut self, post_id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id() == post_id)
    }

    fn require_post_mut(&mut self, post_id: &str) -> Result<&mut Post, DomainError> {
        self.post_mut(post_id).ok_or(DomainError::PostNotFound)
    }

    fn require_comment_mut(
        &mut self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<&mut Comment, DomainError> {
        let post = self.require_post_mut(post_id)?;
        ids::find_mut(post.replies_mut(), comment_id).ok_or(DomainError::CommentNotFound)
    }

    pub fn comment(&self, post_id: &str, comment_id: &str) -> Result<&Comment, DomainError> {
        let post = self.post(post_id).ok_or(DomainError::PostNotFound)?;
        ids::find(post.replies(), comment_id).ok_or(DomainError::CommentNotFound)
    }

    pub fn submit_post(
        &mut self,
        title: &str,
        link: &str,
        author: &str,
    ) -> Result<&Post, DomainError> {
        validate_post(title, link)?;
        let post = Post::new(title, link, author, self.posts.iter().map(|p| p.id()));
        self.posts.push(post);
        Ok(&self.posts[self.posts.len() - 1])
    }

    pub fn comment_on_post(
        &mut self,
        post_id: &str,
        text: Option<&str>,
        author: &str,
    ) -> Result<&Comment, DomainError> {
        let post = self.require_post_mut(post_id)?;
        let text = validate_comment(text)?;
        Ok(post.add_reply(text, author))
    }

    pub fn reply_to_comment(
        &mut self,
        post_id: &str,
        comment_id: &str,
        text: Option<&str>,
        author: &str,
    ) -> Result<&Comment, DomainError> {
        let parent = self.require_comment_mut(post_id, comment_id)?;
        let text = validate_comment(text)?;
        Ok(parent.add_reply(text, author))
    }

    pub fn vote_on_post(
        &mut self,
        post_id: &str,
        user: &str,
        choice: Option<VoteChoice>,
    ) -> Result<(), DomainError> {
        let post = self.require_post_mut(post_id)?;
        if let Some(choice) = choice {
            choice.apply(post, user);
        }
        Ok(())
    }

    pub fn vote_on_comment(
        &mut self,
        post_id: &str,
        comment_id: &str,
        user: &str,
        choice: Option<VoteChoice>,
    ) -> Result<(), DomainError> {
        let comment = self.require_comment_mut(post_id, comment_id)?;
        if let Some(choice) = choice {
            choice.apply(comment, user);
        }
        Ok(())
    }

    pub fn delete_post(&mut self, post_id: &str, user: &str) -> Result<(), DomainError> {
        let post = self.require_post_mut(post_id)?;
        if post.author_name() != Some(user) {
            return Err(DomainError::NotPostAuthor);
        }
        post.mark_deleted();
        Ok(())
    }

    pub fn delete_comment(
        &mut self,
        post_id: &str,
        comment_id: &str,
        user: &str,
    ) -> Result<(), DomainError> {
        let comment = self.require_comment_mut(post_id, comment_id)?;
        if comment.author_name() != Some(user) {
            return Err(DomainError::NotCommentAuthor);
        }
        comment.mark_deleted();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::DELETED_SCORE;

    fn board_with_post() -> (Board, String) {
        let mut board = Board::default();
        let id = board
            .submit_post("Real Reddit", "https://www.reddit.com/", "User")
            .unwrap()
            .id()
            .to_string();
        (board, id)
    }

    #[test]
    fn test_vote_choice_parse() {
        assert_eq!(VoteChoice::parse("upvote"), Some(VoteChoice::Upvote));
        assert_eq!(VoteChoice::parse("downvote"), Some(VoteChoice::Downvote));
        assert_eq!(VoteChoice::parse("remove"), Some(VoteChoice::Remove));
        assert_eq!(VoteChoice::parse("UPVOTE"), None);
        assert_eq!(VoteChoice::parse(""), None);
    }

    #[test]
    fn test_submit_post_validates() {
        let mut board = Board::default();
        assert_eq!(
            board.submit_post("Real Reddit", "a link", "User").unwrap_err(),
            DomainError::LinkNotHttp
        );
        assert!(board.posts().is_empty());
    }

    #[test]
    fn test_submitted_post_ids_are_unique() {
        let mut board = Board::default();
        for i in 0..50 {
            board
                .submit_post(&format!("post {i}"), "https://example.org", "User")
                .unwrap();
        }
        let mut ids: Vec<&str> = board.posts().iter().map(|p| p.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_comment_and_reply_flow() {
        let (mut board, post_id) = board_with_post();
        assert_eq!(
            board.comment_on_post(&post_id, Some("  "), "User").unwrap_err(),
            DomainError::CommentEmpty
        );
        assert_eq!(
            board.comment_on_post("missing", Some("Haha"), "User").unwrap_err(),
            DomainError::PostNotFound
        );

        let comment_id = board
            .comment_on_post(&post_id, Some("Haha"), "User")
            .unwrap()
            .id()
            .to_string();
        let reply_id = board
            .reply_to_comment(&post_id, &comment_id, Some("Nice"), "Other")
            .unwrap()
            .id()
            .to_string();

        assert!(reply_id.starts_with(&comment_id));
        assert_eq!(board.comment(&post_id, &reply_id).unwrap().text(), Some("Nice"));
        assert_eq!(board.post(&post_id).unwrap().total_reply_count(), 2);

        assert_eq!(
            board
                .reply_to_comment(&post_id, "abc", Some("x"), "User")
                .unwrap_err(),
            DomainError::CommentNotFound
        );
    }

    #[test]
    fn test_voting_dispatch() {
        let (mut board, post_id) = board_with_post();
        board
            .vote_on_post(&post_id, "a", VoteChoice::parse("upvote"))
            .unwrap();
        board
            .vote_on_post(&post_id, "b", VoteChoice::parse("downvote"))
            .unwrap();
        board
            .vote_on_post(&post_id, "c", VoteChoice::parse("sideways"))
            .unwrap();
        board
            .vote_on_post(&post_id, "c", VoteChoice::parse("upvote"))
            .unwrap();
        board
            .vote_on_post(&post_id, "b", VoteChoice::parse("remove"))
            .unwrap();
        assert_eq!(board.post(&post_id).unwrap().score(), 2);

        assert_eq!(
            board
                .vote_on_post("nope", "a", Some(VoteChoice::Upvote))
                .unwrap_err(),
            DomainError::PostNotFound
        );

        let comment_id = board
            .comment_on_post(&post_id, Some("Haha"), "User")
            .unwrap()
            .id()
            .to_string();
        board
            .vote_on_comment(&post_id, &comment_id, "a", Some(VoteChoice::Downvote))
            .unwrap();
        assert_eq!(board.comment(&post_id, &comment_id).unwrap().score(), -1);
        assert_eq!(
            board
                .vote_on_comment(&post_id, "zz", "a", Some(VoteChoice::Upvote))
                .unwrap_err(),
            DomainError::CommentNotFound
        );
    }

    #[test]
    fn test_only_author_deletes() {
        let (mut board, post_id) = board_with_post();
        let comment_id = board
            .comment_on_post(&post_id, Some("Haha"), "Commenter")
            .unwrap()
            .id()
            .to_string();

        assert_eq!(
            board.delete_post(&post_id, "Commenter").unwrap_err(),
            DomainError::NotPostAuthor
        );
        assert_eq!(
            board
                .delete_comment(&post_id, &comment_id, "User")
                .unwrap_err(),
            DomainError::NotCommentAuthor
        );

        board.delete_comment(&post_id, &comment_id, "Commenter").unwrap();
        board.delete_post(&post_id, "User").unwrap();

        let post = board.post(&post_id).unwrap();
        assert!(post.is_deleted());
        assert_eq!(post.score(), DELETED_SCORE);
        assert_eq!(post.replies().len(), 1);
        assert!(post.replies()[0].is_deleted());

        // Deleting again fails: the author is gone with the content.
        assert_eq!(
            board.delete_post(&post_id, "User").unwrap_err(),
            DomainError::NotPostAuthor
        );
    }

    #[test]
    fn test_ranked_posts() {
        let (mut board, first) = board_with_post();
        let second = board
            .submit_post("Second", "http://second.example", "User")
            .unwrap()
            .id()
            .to_string();
        board
            .vote_on_post(&second, "a", Some(VoteChoice::Upvote))
            .unwrap();

        let order: Vec<&str> = board.ranked_posts().into_iter().map(|p| p.id()).collect();
        assert_eq!(order, [second.as_str(), first.as_str()]);
    }
}
