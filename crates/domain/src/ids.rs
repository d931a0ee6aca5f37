//! Submission id generation and path-encoded comment lookup.
//!
//! Post ids are opaque 12 character tokens. Comment ids are built from
//! 5 character segments, one per nesting level: a top-level comment owns a
//! single segment and each reply appends its own segment to its parent's id.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::submission::{Comment, Submission};

pub const SEGMENT_LEN: usize = 5;

const POST_LETTERS: usize = 6;
const POST_DIGITS: usize = 6;
const SEGMENT_LETTERS: usize = 2;
const SEGMENT_DIGITS: usize = 3;

fn random_token<R: Rng + ?Sized>(rng: &mut R, letters: usize, digits: usize) -> String {
    let mut chars: Vec<char> = Vec::with_capacity(letters + digits);
    for _ in 0..letters {
        chars.push(rng.gen_range(b'a'..=b'z') as char);
    }
    for _ in 0..digits {
        chars.push(rng.gen_range(b'1'..=b'9') as char);
    }
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// Generates a post id that is not contained in `used`.
pub fn generate_post_id<R, I, S>(rng: &mut R, used: I) -> String
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let used: Vec<S> = used.into_iter().collect();
    loop {
        let id = random_token(rng, POST_LETTERS, POST_DIGITS);
        if !used.iter().any(|u| u.as_ref() == id) {
            return id;
        }
    }
}

/// Generates the id of a new reply.
///
/// `parent_comment_id` is `None` when replying directly to a post. The
/// returned id never equals the id of an existing entry in `siblings`.
pub fn generate_comment_id<R: Rng + ?Sized>(
    rng: &mut R,
    parent_comment_id: Option<&str>,
    siblings: &[Comment],
) -> String {
    loop {
        let segment = random_token(rng, SEGMENT_LETTERS, SEGMENT_DIGITS);
        let id = match parent_comment_id {
            Some(prefix) => format!("{prefix}{segment}"),
            None => segment,
        };
        if !siblings.iter().any(|c| c.id() == id) {
            return id;
        }
    }
}

fn segment(id: &str, depth: usize) -> Option<&[u8]> {
    let start = depth * SEGMENT_LEN;
    id.as_bytes().get(start..start + SEGMENT_LEN)
}

/// Returns the chain of reply indexes leading to `target`, or `None`.
fn locate(replies: &[Comment], target: &str) -> Option<Vec<usize>> {
    if target.is_empty() || target.len() % SEGMENT_LEN != 0 {
        return None;
    }
    let max_depth = target.len() / SEGMENT_LEN - 1;

    let mut path = Vec::with_capacity(max_depth + 1);
    let mut level = replies;
    for depth in 0..=max_depth {
        let wanted = segment(target, depth)?;
        let index = level
            .iter()
            .position(|c| segment(c.id(), depth) == Some(wanted))?;
        path.push(index);
        level = level[index].replies();
    }
    Some(path)
}

/// Finds the comment with id `target` inside a reply tree.
///
/// Walks one segment per depth, descending only into the branch whose segment
/// matches. Malformed ids and ids from another tree yield `None`.
pub fn find<'a>(replies: &'a [Comment], target: &str) -> Option<&'a Comment> {
    let path = locate(replies, target)?;
    let (&last, ancestors) = path.split_last()?;
    let mut level = replies;
    for &i in ancestors {
        level = level[i].replies();
    }
    level.get(last)
}

/// Mutable counterpart of [`find`].
pub fn find_mut<'a>(replies: &'a mut [Comment], target: &str) -> Option<&'a mut Comment> {
    let path = locate(replies, target)?;
    let (&last, ancestors) = path.split_last()?;
    let mut level = replies;
    for &i in ancestors {
        let current = level;
        level = current[i].replies_mut();
    }
    level.get_mut(last)
}
