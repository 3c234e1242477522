//! The signed-in user's post collection.
//!
//! The collection changes in two ways only: a fetch replaces it and a create
//! inserts at the head. Each operation raises a flag while it runs, and a
//! second call of the same kind is refused until the flag drops.
//!
//! `clear` starts a new generation. Operations begun before it neither lower
//! the new generation's flags nor write their results into it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use minifeed_core::{Post, SelectedImage};

use crate::api::{ApiError, PostsApi};
use crate::submit::{submit_post, SubmitError};

/// Shown when a fetch fails without a backend message.
pub const LOAD_FAILED: &str = "Failed to load posts";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    /// Most recent first.
    pub posts: Vec<Post>,
    /// Fetch in progress with an empty collection.
    pub is_loading: bool,
    /// Fetch in progress with posts already shown.
    pub is_refreshing: bool,
    pub is_creating: bool,
    pub error: Option<String>,
}

impl FeedState {
    pub fn is_fetching(&self) -> bool {
        self.is_loading || self.is_refreshing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The collection was replaced with this many posts.
    Loaded(usize),
    /// Another fetch was already running; nothing was requested.
    Skipped,
    /// The feed was cleared while the request ran; the posts were dropped.
    Discarded,
}

#[derive(Debug, Clone, Copy)]
enum Flag {
    Loading,
    Refreshing,
    Creating,
}

impl Flag {
    fn slot(self, state: &mut FeedState) -> &mut bool {
        match self {
            Flag::Loading => &mut state.is_loading,
            Flag::Refreshing => &mut state.is_refreshing,
            Flag::Creating => &mut state.is_creating,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: FeedState,
    /// Bumped by `clear`.
    generation: u64,
}

/// Lowers its flag when dropped, whether the operation finished or not.
struct Pending<'a> {
    shared: &'a Mutex<Shared>,
    flag: Flag,
    generation: u64,
}

impl Pending<'_> {
    /// Run `update` if the feed has not been cleared since this was raised.
    fn apply(&self, update: impl FnOnce(&mut FeedState)) -> bool {
        let mut shared = lock(self.shared);
        if shared.generation != self.generation {
            return false;
        }
        update(&mut shared.state);
        true
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let flag = self.flag;
        self.apply(|state| *flag.slot(state) = false);
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Feed {
    api: Arc<dyn PostsApi>,
    shared: Mutex<Shared>,
}

impl Feed {
    pub fn new(api: Arc<dyn PostsApi>) -> Self {
        Self {
            api,
            shared: Mutex::new(Shared::default()),
        }
    }

    /// Raise `flag` and clear the error in the current generation.
    fn raise(&self, shared: &mut Shared, flag: Flag) -> Pending<'_> {
        *flag.slot(&mut shared.state) = true;
        shared.state.error = None;
        Pending {
            shared: &self.shared,
            flag,
            generation: shared.generation,
        }
    }

    /// Replace the collection with the user's own posts.
    ///
    /// On failure the message is kept in `FeedState::error` and the current
    /// posts stay as they were.
    pub async fn fetch_mine(&self) -> Result<FetchOutcome, ApiError> {
        let pending = {
            let mut shared = lock(&self.shared);
            if shared.state.is_fetching() {
                debug!("fetch already in progress, skipping");
                return Ok(FetchOutcome::Skipped);
            }
            let flag = if shared.state.posts.is_empty() {
                Flag::Loading
            } else {
                Flag::Refreshing
            };
            self.raise(&mut shared, flag)
        };

        match self.api.my_posts().await {
            Ok(posts) => {
                let count = posts.len();
                if !pending.apply(|state| state.posts = posts) {
                    debug!("feed cleared during fetch, dropping {} posts", count);
                    return Ok(FetchOutcome::Discarded);
                }
                debug!("loaded {} posts", count);
                Ok(FetchOutcome::Loaded(count))
            }
            Err(err) => {
                warn!("Failed to load posts: {}", err);
                let message = err
                    .backend_message()
                    .unwrap_or(LOAD_FAILED)
                    .to_string();
                pending.apply(|state| state.error = Some(message));
                Err(err)
            }
        }
    }

    /// Submit a new post and put it at the head of the collection.
    ///
    /// Fails with `SubmitError::InFlight` while another create is pending.
    /// A post created after `clear` is returned but not inserted.
    pub async fn create(
        &self,
        description: &str,
        image: Option<&SelectedImage>,
    ) -> Result<Post, SubmitError> {
        let pending = {
            let mut shared = lock(&self.shared);
            if shared.state.is_creating {
                return Err(SubmitError::InFlight);
            }
            self.raise(&mut shared, Flag::Creating)
        };

        match submit_post(self.api.as_ref(), description, image).await {
            Ok(post) => {
                if !pending.apply(|state| state.posts.insert(0, post.clone())) {
                    debug!("feed cleared during create, not inserting {}", post.id);
                }
                Ok(post)
            }
            Err(err) => {
                let message = err.user_message();
                pending.apply(|state| state.error = Some(message));
                Err(err)
            }
        }
    }

    /// Drop every post and reset the flags.
    pub fn clear(&self) {
        let mut shared = lock(&self.shared);
        shared.state = FeedState::default();
        shared.generation = shared.generation.wrapping_add(1);
        info!("Feed cleared");
    }

    pub fn clear_error(&self) {
        lock(&self.shared).state.error = None;
    }

    pub fn snapshot(&self) -> FeedState {
        lock(&self.shared).state.clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        lock(&self.shared).state.posts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::tests::{png, post, FakePosts};
    use async_trait::async_trait;
    use minifeed_core::NewPost;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Holds every call open until `gate` is notified.
    #[derive(Default)]
    struct GatedPosts {
        fetches: AtomicUsize,
        creates: AtomicUsize,
        gate: Notify,
    }

    #[async_trait]
    impl PostsApi for GatedPosts {
        async fn my_posts(&self) -> Result<Vec<Post>, ApiError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(vec![post("a", "first"), post("b", "second")])
        }

        async fn all_posts(&self) -> Result<Vec<Post>, ApiError> {
            self.my_posts().await
        }

        async fn create_post(&self, body: &NewPost) -> Result<Post, ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(post("created", &body.description))
        }
    }

    fn feed_with(posts: Vec<Post>) -> (Arc<FakePosts>, Feed) {
        let api = Arc::new(FakePosts::default());
        *api.mine.lock().unwrap() = posts;
        let feed = Feed::new(api.clone());
        (api, feed)
    }

    #[tokio::test]
    async fn test_fetch_replaces_collection() {
        let (_api, feed) = feed_with(vec![post("1", "a"), post("2", "b")]);

        assert_eq!(feed.fetch_mine().await.unwrap(), FetchOutcome::Loaded(2));
        let state = feed.snapshot();
        assert_eq!(state.posts.len(), 2);
        assert!(!state.is_loading);
        assert!(!state.is_refreshing);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_concurrent_fetch_is_skipped() {
        let api = Arc::new(GatedPosts::default());
        let feed = Feed::new(api.clone());

        let first = feed.fetch_mine();
        let second = async {
            tokio::task::yield_now().await;
            let outcome = feed.fetch_mine().await;
            assert!(feed.snapshot().is_loading);
            api.gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap(), FetchOutcome::Loaded(2));
        assert_eq!(second.unwrap(), FetchOutcome::Skipped);
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
        assert!(!feed.snapshot().is_fetching());
    }

    #[tokio::test]
    async fn test_refresh_flag_when_posts_shown() {
        let api = Arc::new(GatedPosts::default());
        let feed = Feed::new(api.clone());

        api.gate.notify_one();
        feed.fetch_mine().await.unwrap();

        let refresh = feed.fetch_mine();
        let observe = async {
            tokio::task::yield_now().await;
            let state = feed.snapshot();
            api.gate.notify_one();
            state
        };
        let (refreshed, state) = tokio::join!(refresh, observe);

        assert_eq!(refreshed.unwrap(), FetchOutcome::Loaded(2));
        assert!(state.is_refreshing);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_posts() {
        let (api, feed) = feed_with(vec![post("1", "a")]);
        feed.fetch_mine().await.unwrap();

        *api.fail_with.lock().unwrap() = Some(ApiError::Transport("offline".into()));
        assert!(feed.fetch_mine().await.is_err());

        let state = feed.snapshot();
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.error.as_deref(), Some(LOAD_FAILED));
        assert!(!state.is_refreshing);

        *api.fail_with.lock().unwrap() = Some(ApiError::Backend {
            status: 401,
            message: Some("Not authorized".to_string()),
        });
        assert!(feed.fetch_mine().await.is_err());
        assert_eq!(feed.snapshot().error.as_deref(), Some("Not authorized"));

        feed.clear_error();
        assert_eq!(feed.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_created_post_goes_first() {
        let (api, feed) = feed_with(vec![post("1", "a"), post("2", "b"), post("3", "c")]);
        feed.fetch_mine().await.unwrap();

        let image = png(32, 24);
        let created = feed.create("fresh", Some(&image)).await.unwrap();

        let posts = feed.posts();
        assert_eq!(posts.len(), 4);
        assert_eq!(posts[0], created);
        assert_eq!(posts[1].id, "1");
        assert_eq!(api.created.lock().unwrap().len(), 1);
        assert!(!feed.snapshot().is_creating);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_posts() {
        let (api, feed) = feed_with(vec![post("1", "a")]);
        feed.fetch_mine().await.unwrap();

        let err = feed.create("", Some(&png(8, 8))).await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(
            feed.snapshot().error.as_deref(),
            Some("Please enter a description for your post.")
        );

        *api.fail_with.lock().unwrap() = Some(ApiError::Transport("offline".into()));
        let err = feed.create("ok", Some(&png(8, 8))).await.unwrap_err();
        assert!(matches!(err, SubmitError::Api(_)));

        let state = feed.snapshot();
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Failed to create post"));
        assert!(!state.is_creating);
    }

    #[tokio::test]
    async fn test_second_create_while_pending_is_refused() {
        let api = Arc::new(GatedPosts::default());
        let feed = Feed::new(api.clone());
        let image = png(16, 16);

        let first = feed.create("one", Some(&image));
        let second = async {
            tokio::task::yield_now().await;
            let result = feed.create("two", Some(&image)).await;
            api.gate.notify_one();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap().description, "one");
        assert!(matches!(second, Err(SubmitError::InFlight)));
        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert_eq!(feed.posts().len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let (_api, feed) = feed_with(vec![post("1", "a")]);
        feed.fetch_mine().await.unwrap();

        feed.clear();
        assert_eq!(feed.snapshot(), FeedState::default());
    }

    /// Each fetch waits on its own gate and returns one more post than the
    /// fetch before it.
    #[derive(Default)]
    struct StagedPosts {
        fetches: AtomicUsize,
        gates: [Notify; 2],
    }

    #[async_trait]
    impl PostsApi for StagedPosts {
        async fn my_posts(&self) -> Result<Vec<Post>, ApiError> {
            let call = self.fetches.fetch_add(1, Ordering::SeqCst);
            self.gates[call].notified().await;
            Ok((0..=call).map(|i| post(&i.to_string(), "staged")).collect())
        }

        async fn all_posts(&self) -> Result<Vec<Post>, ApiError> {
            self.my_posts().await
        }

        async fn create_post(&self, body: &NewPost) -> Result<Post, ApiError> {
            Ok(post("created", &body.description))
        }
    }

    async fn wait_for(counter: &AtomicUsize, calls: usize) {
        while counter.load(Ordering::SeqCst) < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_fetch_from_before_clear_is_discarded() {
        let api = Arc::new(StagedPosts::default());
        let feed = Arc::new(Feed::new(api.clone()));

        let stale = tokio::spawn({
            let feed = feed.clone();
            async move { feed.fetch_mine().await }
        });
        wait_for(&api.fetches, 1).await;
        assert!(feed.snapshot().is_loading);

        feed.clear();
        assert!(!feed.snapshot().is_loading);

        let fresh = tokio::spawn({
            let feed = feed.clone();
            async move { feed.fetch_mine().await }
        });
        wait_for(&api.fetches, 2).await;

        api.gates[0].notify_one();
        assert_eq!(stale.await.unwrap().unwrap(), FetchOutcome::Discarded);

        // The old request must not lower the new request's flag
        let state = feed.snapshot();
        assert!(state.is_loading);
        assert!(state.posts.is_empty());

        // and a third call is still refused while the new one runs
        assert_eq!(feed.fetch_mine().await.unwrap(), FetchOutcome::Skipped);
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);

        api.gates[1].notify_one();
        assert_eq!(fresh.await.unwrap().unwrap(), FetchOutcome::Loaded(2));
        let state = feed.snapshot();
        assert!(!state.is_fetching());
        assert_eq!(state.posts.len(), 2);
    }

    #[tokio::test]
    async fn test_create_from_before_clear_is_not_inserted() {
        let api = Arc::new(GatedPosts::default());
        let feed = Arc::new(Feed::new(api.clone()));

        let pending = tokio::spawn({
            let feed = feed.clone();
            async move { feed.create("before logout", Some(&png(16, 16))).await }
        });
        wait_for(&api.creates, 1).await;
        assert!(feed.snapshot().is_creating);

        feed.clear();
        api.gate.notify_one();

        let created = pending.await.unwrap().unwrap();
        assert_eq!(created.description, "before logout");
        assert_eq!(feed.snapshot(), FeedState::default());
    }
}
