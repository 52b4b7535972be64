//! Fixtures for the three endpoints.

use serde_json::json;

use super::mocks::StaticJsonFetcher;
use crate::config::ChainConfig;

/// Base URL used by test configurations.
pub const TEST_BASE_URL: &str = "http://chainflow.test";

/// A configuration pointing at [`TEST_BASE_URL`].
#[must_use]
pub fn test_config() -> ChainConfig {
    ChainConfig::new().with_base_url(TEST_BASE_URL)
}

/// A raw user object, with an extra field the projection drops.
#[must_use]
pub fn user_json(id: i64, name: &str, email: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "username": name.to_lowercase(), "email": email })
}

/// A raw post object.
#[must_use]
pub fn post_json(id: i64, title: &str) -> serde_json::Value {
    json!({ "id": id, "title": title, "body": "lorem ipsum" })
}

/// A raw comment object.
#[must_use]
pub fn comment_json(id: i64, name: &str, email: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "email": email, "body": "dolor sit amet" })
}

/// A fetcher answering the single-user, single-post, single-comment scenario.
#[must_use]
pub fn happy_path_fetcher() -> StaticJsonFetcher {
    let config = test_config();
    StaticJsonFetcher::new()
        .with_json(config.users_url(), json!([user_json(1, "Leanne", "a@b.com")]))
        .with_json(config.posts_url(1), json!([post_json(1, "T1")]))
        .with_json(config.comments_url(1), json!([comment_json(1, "C", "c@d.com")]))
}
