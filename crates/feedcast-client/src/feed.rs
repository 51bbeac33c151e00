use feedcast_protocol::{ClientEvent, Comment, LikeUpdate, Post, PostComment, PostRef, ServerEvent};
use tracing::debug;

/// One browser session's local copy of the feed, newest post first.
///
/// The view is seeded from a full fetch against the mutation API and then
/// kept current by applying broadcast events as they arrive. Applying is
/// idempotent: the same event delivered (or recorded) twice changes nothing
/// on the second pass, because every merge checks entity ids first. That is
/// what lets a session's own refetch race a broadcast without duplicating
/// posts or comments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedView {
    posts: Vec<Post>,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the view from the canonical feed fetch.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.get(post_id).is_some()
    }

    /// Whether `user_id` currently likes `post_id`, recomputed by membership
    /// in the relayed likes list.
    pub fn liked_by(&self, post_id: &str, user_id: &str) -> bool {
        self.get(post_id)
            .and_then(|p| p.likes.as_ref())
            .is_some_and(|likes| likes.iter().any(|u| u == user_id))
    }

    // -----------------------------------------------------------------------
    // Remote events
    // -----------------------------------------------------------------------

    /// Merge one broadcast from another session into the view.
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::HelloFromServer(_) => {}
            ServerEvent::PostCreated(post) => self.insert_post(post.clone()),
            ServerEvent::LikeUpdated(update) => self.replace_likes(update),
            ServerEvent::CommentAdded(pc) => self.append_comment(pc),
            ServerEvent::PostDeleted(pr) => self.remove_post(&pr.post_id),
        }
    }

    // -----------------------------------------------------------------------
    // Local mutations
    // -----------------------------------------------------------------------
    //
    // Two phases: the awaited mutation API call succeeded and handed back the
    // canonical entity, so merge it here now; then emit the returned event,
    // fire and forget. The phases are independent — a failed emission never
    // rolls the local merge back.

    /// Record a post this session created. Returns the event to emit.
    pub fn record_post(&mut self, post: Post) -> ClientEvent {
        self.insert_post(post.clone());
        ClientEvent::NewPost(post)
    }

    /// Record the canonical likes list after this session toggled a like.
    pub fn record_likes(&mut self, post_id: impl Into<String>, likes: Vec<String>) -> ClientEvent {
        let update = LikeUpdate {
            post_id: post_id.into(),
            likes,
        };
        self.replace_likes(&update);
        ClientEvent::LikeUpdated(update)
    }

    /// Record a comment this session added.
    pub fn record_comment(&mut self, post_id: impl Into<String>, comment: Comment) -> ClientEvent {
        let pc = PostComment {
            post_id: post_id.into(),
            comment,
        };
        self.append_comment(&pc);
        ClientEvent::NewComment(pc)
    }

    /// Record a deletion this session performed.
    pub fn record_delete(&mut self, post_id: impl Into<String>) -> ClientEvent {
        let pr = PostRef {
            post_id: post_id.into(),
        };
        self.remove_post(&pr.post_id);
        ClientEvent::DeletePost(pr)
    }

    // -----------------------------------------------------------------------
    // Shared merge path — local and remote mutations converge through these
    // -----------------------------------------------------------------------

    fn insert_post(&mut self, post: Post) {
        if self.contains(&post.id) {
            debug!(post = %post.id, "post already in view, skipping");
            return;
        }
        self.posts.insert(0, post);
    }

    fn replace_likes(&mut self, update: &LikeUpdate) {
        match self.posts.iter_mut().find(|p| p.id == update.post_id) {
            Some(post) => post.likes = Some(update.likes.clone()),
            // not fetched yet; the next refetch carries its likes anyway
            None => debug!(post = %update.post_id, "like update for unknown post"),
        }
    }

    fn append_comment(&mut self, pc: &PostComment) {
        let Some(post) = self.posts.iter_mut().find(|p| p.id == pc.post_id) else {
            debug!(post = %pc.post_id, "comment for unknown post");
            return;
        };
        let comments = post.comments.get_or_insert_with(Vec::new);
        if comments.iter().any(|c| c.id == pc.comment.id) {
            debug!(post = %pc.post_id, comment = %pc.comment.id, "duplicate comment, skipping");
            return;
        }
        comments.push(pc.comment.clone());
    }

    fn remove_post(&mut self, post_id: &str) {
        self.posts.retain(|p| p.id != post_id);
    }
}
