//! Community feed display state: likes, comment thread and composer.
//!
//! Counts here are presentation copies seeded from the catalog; nothing is
//! written back to it.

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::catalog::Catalog;

/// Handle used for comments written in this session.
pub const OWN_HANDLE: &str = "@your_username";
/// Composer placeholder when not replying.
pub const COMPOSE_PLACEHOLDER: &str = "Add a comment...";
/// Composer placeholder while replying.
pub const REPLY_PLACEHOLDER: &str = "Replying to comment...";

/// A post as displayed in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPost {
    /// Post key.
    pub id: String,
    /// Author handle.
    pub author: String,
    /// Loop title.
    pub title: String,
    /// Displayed like count.
    pub likes: u32,
    /// Whether this session liked it.
    pub liked: bool,
    /// Displayed comment count.
    pub comments: u32,
}

/// A comment as displayed in the thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Author handle.
    pub author: String,
    /// Body.
    pub text: String,
    /// Relative time label.
    pub time: String,
    /// Wall-clock time for comments posted in this session.
    pub posted_at: Option<DateTime<Local>>,
    /// Displayed like count.
    pub likes: u32,
    /// Whether this session liked it.
    pub liked: bool,
}

/// Feed posts plus the shared comment thread.
#[derive(Debug, Clone)]
pub struct CommunityFeed {
    posts: Vec<FeedPost>,
    comments: Vec<Comment>,
    placeholder: &'static str,
}

impl CommunityFeed {
    /// Seed the feed from catalog posts and comments.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            posts: catalog
                .posts
                .iter()
                .map(|post| FeedPost {
                    id: post.id.clone(),
                    author: post.author.clone(),
                    title: post.title.clone(),
                    likes: post.likes,
                    liked: false,
                    comments: post.comments,
                })
                .collect(),
            comments: catalog
                .comments
                .iter()
                .map(|seed| Comment {
                    author: seed.author.clone(),
                    text: seed.text.clone(),
                    time: seed.time.clone(),
                    posted_at: None,
                    likes: seed.likes,
                    liked: false,
                })
                .collect(),
            placeholder: COMPOSE_PLACEHOLDER,
        }
    }

    /// Posts in feed order.
    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    /// Post with the given id.
    pub fn post(&self, id: &str) -> Option<&FeedPost> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Newest first.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Hint shown in the empty comment composer.
    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    /// Every displayed comment count, in feed order.
    pub fn comment_counts(&self) -> Vec<u32> {
        self.posts.iter().map(|post| post.comments).collect()
    }

    /// Flip the like on a post, returning the new count. Unknown posts do nothing.
    pub fn toggle_like(&mut self, post_id: &str) -> Option<u32> {
        let Some(post) = self.posts.iter_mut().find(|post| post.id == post_id) else {
            debug!(post_id, "Ignoring like for unknown post");
            return None;
        };
        Some(toggle(&mut post.liked, &mut post.likes))
    }

    /// Flip the like on the comment at `index`.
    pub fn like_comment(&mut self, index: usize) -> Option<u32> {
        let comment = self.comments.get_mut(index)?;
        Some(toggle(&mut comment.liked, &mut comment.likes))
    }

    /// Point the composer at the comment at `index`.
    pub fn reply_to(&mut self, index: usize) {
        if index < self.comments.len() {
            self.placeholder = REPLY_PLACEHOLDER;
        }
    }

    /// Prepend a comment by the current user.
    ///
    /// Blank text is ignored. On success every displayed comment count goes up by
    /// one and the composer resets.
    pub fn post_comment(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.comments.insert(
            0,
            Comment {
                author: OWN_HANDLE.to_string(),
                text: text.to_string(),
                time: "now".to_string(),
                posted_at: Some(Local::now()),
                likes: 0,
                liked: false,
            },
        );
        for post in &mut self.posts {
            post.comments += 1;
        }
        self.placeholder = COMPOSE_PLACEHOLDER;
        info!(total = self.comments.len(), "Comment posted");
        true
    }
}

fn toggle(liked: &mut bool, count: &mut u32) -> u32 {
    if *liked {
        *count = count.saturating_sub(1);
    } else {
        *count += 1;
    }
    *liked = !*liked;
    *count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> CommunityFeed {
        CommunityFeed::from_catalog(&Catalog::builtin())
    }

    #[test]
    fn empty_comment_changes_nothing() {
        let mut feed = feed();
        let before = feed.comments().len();
        let counts = feed.comment_counts();

        assert!(!feed.post_comment(""));
        assert!(!feed.post_comment("   \n"));
        assert_eq!(feed.comments().len(), before);
        assert_eq!(feed.comment_counts(), counts);
    }

    #[test]
    fn posting_prepends_and_bumps_every_count() {
        let mut feed = feed();
        let before = feed.comments().len();
        let counts = feed.comment_counts();
        feed.reply_to(0);
        assert_eq!(feed.placeholder(), REPLY_PLACEHOLDER);

        assert!(feed.post_comment("  love the texture  "));
        assert_eq!(feed.comments().len(), before + 1);
        let newest = &feed.comments()[0];
        assert_eq!(newest.author, OWN_HANDLE);
        assert_eq!(newest.text, "love the texture");
        assert_eq!(newest.likes, 0);
        assert!(newest.posted_at.is_some());

        let bumped: Vec<u32> = counts.iter().map(|count| count + 1).collect();
        assert_eq!(feed.comment_counts(), bumped);
        assert_eq!(feed.placeholder(), COMPOSE_PLACEHOLDER);
    }

    #[test]
    fn likes_toggle_back_and_forth() {
        let mut feed = feed();
        let id = feed.posts()[0].id.clone();
        let start = feed.posts()[0].likes;

        assert_eq!(feed.toggle_like(&id), Some(start + 1));
        assert!(feed.post(&id).map(|post| post.liked).unwrap_or(false));
        assert_eq!(feed.toggle_like(&id), Some(start));
        assert_eq!(feed.toggle_like("missing"), None);

        let comment_likes = feed.comments()[1].likes;
        assert_eq!(feed.like_comment(1), Some(comment_likes + 1));
        assert_eq!(feed.like_comment(1), Some(comment_likes));
        assert_eq!(feed.like_comment(42), None);
    }

    #[test]
    fn reply_to_unknown_comment_keeps_placeholder() {
        let mut feed = feed();
        feed.reply_to(99);
        assert_eq!(feed.placeholder(), COMPOSE_PLACEHOLDER);
    }
}
