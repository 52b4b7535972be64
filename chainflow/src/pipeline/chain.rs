//! The users → posts → comments dependent chain.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::debug;

use crate::cancellation::SwitchLatestExt;
use crate::config::ChainConfig;
use crate::core::{
    project_comments, project_posts, project_users, PipelineResult, Post, StageName, User,
};
use crate::errors::StageError;
use crate::events::Checkpoint;
use crate::fetch::JsonFetcher;

use super::tap::SideEffectTap;

/// Sequences the three stages, each request derived from the previous
/// stage's selected item.
///
/// The first item of each collection is selected. Stage 2 and 3 run through
/// [`SwitchLatest`](crate::cancellation::SwitchLatest), so a re-emitting
/// upstream cancels the request derived from its earlier value.
#[derive(Clone)]
pub struct DependentChain {
    fetcher: Arc<dyn JsonFetcher>,
    config: Arc<ChainConfig>,
    tap: SideEffectTap,
}

impl DependentChain {
    /// Creates a chain.
    #[must_use]
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: Arc<ChainConfig>, tap: SideEffectTap) -> Self {
        Self {
            fetcher,
            config,
            tap,
        }
    }

    /// Runs all stages.
    ///
    /// Yields the latest result of the final stage, `None` if it never
    /// produced one, or the first error.
    pub async fn execute(&self) -> Result<Option<PipelineResult>, StageError> {
        let users = Box::pin(stream::once(self.fetch_users()))
            .map(|users| users.and_then(|users| self.select_user(users)));

        let posts = users
            .switch_latest(StageName::Posts, |user: User| self.fetch_posts(user))
            .map(|posts| posts.and_then(|(user, posts)| self.select_post(user, posts)));

        let mut results = posts.switch_latest(StageName::Comments, |(user, post): (User, Post)| {
            self.fetch_comments(user, post)
        });

        let mut latest = None;
        while let Some(result) = results.next().await {
            latest = Some(result?);
        }
        Ok(latest)
    }

    async fn fetch_users(&self) -> Result<Vec<User>, StageError> {
        let url = self.config.users_url();
        let users = project_users(self.fetcher.fetch_json(&url).await?)?;
        debug!(count = users.len(), "Fetched users");

        self.tap.tap(&Checkpoint::UsersFetched { count: users.len() })?;
        Ok(users)
    }

    fn select_user(&self, users: Vec<User>) -> Result<User, StageError> {
        let user = users
            .into_iter()
            .next()
            .ok_or(StageError::empty_collection(StageName::Users))?;

        self.tap.tap(&Checkpoint::UserSelected { user: &user })?;
        Ok(user)
    }

    async fn fetch_posts(&self, user: User) -> Result<(User, Vec<Post>), StageError> {
        let url = self.config.posts_url(user.id);
        let posts = project_posts(self.fetcher.fetch_json(&url).await?)?;
        debug!(user_id = user.id, count = posts.len(), "Fetched posts");

        self.tap.tap(&Checkpoint::PostsFetched {
            user: &user,
            count: posts.len(),
        })?;
        Ok((user, posts))
    }

    fn select_post(&self, user: User, posts: Vec<Post>) -> Result<(User, Post), StageError> {
        let post = posts
            .into_iter()
            .next()
            .ok_or(StageError::empty_collection(StageName::Posts))?;

        self.tap.tap(&Checkpoint::PostSelected { post: &post })?;
        Ok((user, post))
    }

    async fn fetch_comments(&self, user: User, post: Post) -> Result<PipelineResult, StageError> {
        let url = self.config.comments_url(post.id);
        let comments = project_comments(self.fetcher.fetch_json(&url).await?)?;
        debug!(post_id = post.id, count = comments.len(), "Fetched comments");

        Ok(PipelineResult::new(user, post, comments))
    }
}

impl std::fmt::Debug for DependentChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependentChain")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
