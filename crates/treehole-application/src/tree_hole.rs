//! The Tree Hole use case: a shared feed plus asynchronous post authoring.
//!
//! Creating a post is the only operation that suspends. The submission is
//! validated and recorded as pending under the write lock, the lock is
//! released while the echo is generated, and the finished post is prepended
//! under a second, short write section. Each submission resolves on its own:
//! concurrent posts land in the order their echoes complete.
//!
//! A submission that never reaches the feed (its future dropped, its task
//! aborted or panicked) releases its pending id through a drop guard, so
//! the submitting flag always clears.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use treehole_core::error::{Result, TreeholeError};
use treehole_core::feed::{FeedStore, PendingPost, Tab};
use treehole_core::post::{Comment, Mood, Post};

use crate::echo_generator::EchoGenerator;

/// Cheaply clonable handle to the feed and the echo generator.
#[derive(Clone)]
pub struct TreeHole {
    store: Arc<RwLock<FeedStore>>,
    echo: Arc<EchoGenerator>,
}

impl TreeHole {
    pub fn new(store: FeedStore, echo: EchoGenerator) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            echo: Arc::new(echo),
        }
    }

    /// Posts visible on `tab`, newest first.
    pub async fn view(&self, tab: Tab) -> Vec<Post> {
        let store = self.store.read().await;
        store.filtered_view(tab).into_iter().cloned().collect()
    }

    pub async fn post(&self, post_id: &str) -> Option<Post> {
        self.store.read().await.get(post_id).cloned()
    }

    /// True while any submission is waiting for its echo.
    pub async fn is_submitting(&self) -> bool {
        self.store.read().await.is_submitting()
    }

    pub async fn toggle_like(&self, post_id: &str) -> Option<Post> {
        self.store.write().await.toggle_like(post_id).cloned()
    }

    pub async fn toggle_save(&self, post_id: &str) -> Option<Post> {
        self.store.write().await.toggle_save(post_id).cloned()
    }

    /// Appends a comment from the local user.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for blank text, `NotFound` for an unknown post.
    pub async fn add_comment(&self, post_id: &str, text: &str) -> Result<Comment> {
        self.store
            .write()
            .await
            .add_comment(post_id, text)
            .cloned()
    }

    /// Creates a post and waits for its echo.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for blank content, before any external call.
    ///
    /// Dropping the returned future before it completes abandons the post.
    pub async fn create_post(&self, content: &str, mood: Mood) -> Result<Post> {
        let pending = self.begin(content, mood).await?;
        Ok(self.resolve(pending).await)
    }

    /// Validates and records a post, then resolves it in the background.
    ///
    /// Returns as soon as the submission is pending; await
    /// [`PendingPostHandle::wait`] for the finished post. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for blank content; nothing is spawned then.
    pub async fn submit(&self, content: &str, mood: Mood) -> Result<PendingPostHandle> {
        let pending = self.begin(content, mood).await?;
        let id = pending.id().to_string();

        let this = self.clone();
        let join = tokio::spawn(async move { this.resolve(pending).await });

        Ok(PendingPostHandle {
            id,
            join,
            store: Arc::clone(&self.store),
        })
    }

    async fn begin(&self, content: &str, mood: Mood) -> Result<PendingPost> {
        self.store.write().await.begin_post(content, mood)
    }

    async fn resolve(&self, pending: PendingPost) -> Post {
        let guard = PendingGuard::new(Arc::clone(&self.store), pending.id());

        let echo = self.echo.generate(pending.content(), pending.mood()).await;
        tracing::debug!(post_id = pending.id(), source = ?echo.source, "Echo resolved");

        let mut store = self.store.write().await;
        let post = store.finalize_post(pending, echo.text).clone();
        guard.disarm();
        post
    }
}

/// Releases a pending id on drop unless the post was finalized.
struct PendingGuard {
    store: Arc<RwLock<FeedStore>>,
    id: String,
    armed: bool,
}

impl PendingGuard {
    fn new(store: Arc<RwLock<FeedStore>>, id: &str) -> Self {
        Self {
            store,
            id: id.to_string(),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.armed {
            release_pending(&self.store, &self.id);
        }
    }
}

/// Abandons `id` without awaiting.
///
/// Takes the write lock immediately when it is free. Otherwise the release is
/// deferred to a task on the current runtime.
fn release_pending(store: &Arc<RwLock<FeedStore>>, id: &str) {
    if let Ok(mut feed) = store.try_write() {
        feed.abandon_post(id);
        return;
    }

    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            let store = Arc::clone(store);
            let id = id.to_string();
            runtime.spawn(async move {
                store.write().await.abandon_post(&id);
            });
        }
        Err(_) => tracing::warn!(post_id = id, "No runtime to release pending post"),
    }
}

/// A submitted post whose echo is still being generated.
#[derive(Debug)]
pub struct PendingPostHandle {
    id: String,
    join: JoinHandle<Post>,
    store: Arc<RwLock<FeedStore>>,
}

impl PendingPostHandle {
    /// Id the post will carry in the feed.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancels the submission if its echo has not resolved yet.
    ///
    /// The pending id is released right away, whether or not the handle is
    /// awaited afterwards.
    pub fn abort(&self) {
        self.join.abort();
        release_pending(&self.store, &self.id);
    }

    /// Waits for the post to land in the feed.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the background task was aborted or panicked; the
    /// pending entry is released so the feed stops reporting a submission.
    pub async fn wait(self) -> Result<Post> {
        match self.join.await {
            Ok(post) => Ok(post),
            Err(err) => {
                // Aborted or panicked: the task's guard may not have run yet
                self.store.write().await.abandon_post(&self.id);
                Err(TreeholeError::internal(format!(
                    "echo task for post {} did not complete: {err}",
                    self.id
                )))
            }
        }
    }
}
