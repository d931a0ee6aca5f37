use std::cmp::Reverse;

use crate::submission::{Comment, Submission};

/// Orders submissions by score, highest first. Equal scores keep their
/// original relative order.
pub fn rank_by_score<T: Submission>(items: &[T]) -> Vec<&T> {
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by_key(|item| Reverse(item.score()));
    ranked
}

/// A comment together with its nesting depth, 0 for direct post replies.
#[derive(Debug, Clone, Copy)]
pub struct ThreadLine<'a> {
    pub depth: usize,
    pub comment: &'a Comment,
}

/// Flattens a reply tree depth-first, ranking every sibling list on its own.
pub fn flatten_thread(replies: &[Comment]) -> Vec<ThreadLine<'_>> {
    let mut lines = Vec::new();
    push_level(replies, 0, &mut lines);
    lines
}

fn push_level<'a>(replies: &'a [Comment], depth: usize, out: &mut Vec<ThreadLine<'a>>) {
    for comment in rank_by_score(replies) {
        out.push(ThreadLine { depth, comment });
        push_level(comment.replies(), depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{Post, DELETED_SCORE};

    fn post(title: &str) -> Post {
        Post::new(title, "https://example.org", "alice", Vec::<String>::new())
    }

    #[test]
    fn test_rank_sinks_deleted() {
        let mut posts = vec![post("three"), post("deleted"), post("one")];
        for u in ["a", "b", "c"] {
            posts[0].upvote(u);
        }
        posts[1].upvote("a");
        posts[1].mark_deleted();
        posts[2].upvote("a");

        let scores: Vec<i64> = rank_by_score(&posts).iter().map(|p| p.score()).collect();
        assert_eq!(scores, [3, 1, DELETED_SCORE]);
    }

    #[test]
    fn test_rank_is_stable() {
        let posts = vec![post("first"), post("second"), post("third")];
        let titles: Vec<_> = rank_by_score(&posts)
            .into_iter()
            .filter_map(|p| p.title())
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn test_thread_sorted_per_level() {
        let mut p = post("thread");
        p.add_reply("low", "a");
        p.add_reply("high", "b");
        p.replies_mut()[1].upvote("x");
        p.replies_mut()[0].add_reply("child of low", "c");

        // A deleted parent still shows its live children right below it.
        let high = &mut p.replies_mut()[1];
        high.add_reply("quiet", "d");
        high.add_reply("loud", "e");
        high.replies_mut()[1].upvote("y");
        high.mark_deleted();

        let lines: Vec<(usize, Option<&str>)> = flatten_thread(p.replies())
            .into_iter()
            .map(|line| (line.depth, line.comment.text()))
            .collect();
        assert_eq!(
            lines,
            [
                (0, Some("low")),
                (1, Some("child of low")),
                (0, None),
                (1, Some("loud")),
                (1, Some("quiet")),
            ]
        );
    }
}
