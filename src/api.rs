//! Defines [`Api`], the data accessor. Every resource goes through
//! [`Api::fetch_with_cache`]; the typed lookups (categories, the post index,
//! posts by slug or category, recent posts) are built on top of it.
//!
//! The accessor only raises for broken retrievals. A slug that isn't in the
//! index is an ordinary outcome and comes back as `Ok(None)`.

use crate::cache::{Cache, Clock, SystemClock, DEFAULT_TTL};
use crate::post::{Category, CategoryIndex, Post, PostIndex};
use crate::source::DataSource;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::io;
use std::time::Duration;
use tracing::debug;

/// The key for the post index.
pub const INDEX_KEY: &str = "/data/index.json";

/// The key for the category list.
pub const CATEGORIES_KEY: &str = "/data/categories.json";

/// The key for a single post resource.
pub fn post_key(category: &str, slug: &str) -> String {
    format!("/data/posts/{}/{}.json", category, slug)
}

pub struct Api<S, C = SystemClock> {
    source: S,
    cache: RefCell<Cache<Value, C>>,
    ttl: Duration,
}

impl<S: DataSource> Api<S, SystemClock> {
    pub fn new(source: S) -> Self {
        Api::with_cache(source, Cache::new())
    }
}

impl<S: DataSource, C: Clock> Api<S, C> {
    /// Builds an accessor around an existing cache. The typed lookups use
    /// [`DEFAULT_TTL`] unless [`Api::with_ttl`] says otherwise.
    pub fn with_cache(source: S, cache: Cache<Value, C>) -> Self {
        Api {
            source,
            cache: RefCell::new(cache),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload for `key`. A cached payload younger than `ttl` is
    /// returned without touching the source. Otherwise the source is asked,
    /// a non-success status fails with [`Error::FetchFailed`], and a good
    /// payload replaces whatever was cached under `key`.
    pub async fn fetch_with_cache(&self, key: &str, ttl: Duration) -> Result<Value> {
        let cached = self.cache.borrow().get(key, ttl);
        if let Some(payload) = cached {
            debug!(key, "cache hit");
            return Ok(payload);
        }

        debug!(key, "fetching");
        let response = self.source.get(key).await.map_err(|err| Error::Io {
            key: key.to_owned(),
            err,
        })?;
        if !response.is_success() {
            debug!(key, status = response.status, "fetch failed");
            return Err(Error::FetchFailed {
                key: key.to_owned(),
                status: response.status,
            });
        }

        let payload: Value =
            serde_json::from_slice(&response.body).map_err(|err| Error::Decode {
                key: key.to_owned(),
                err,
            })?;
        self.cache.borrow_mut().put(key, payload.clone());
        Ok(payload)
    }

    /// Drops the cached payload for `key` so the next lookup refetches it.
    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.borrow_mut().invalidate(key)
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let payload = self.fetch_with_cache(key, self.ttl).await?;
        serde_json::from_value(payload).map_err(|err| Error::Decode {
            key: key.to_owned(),
            err,
        })
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let index: CategoryIndex = self.fetch(CATEGORIES_KEY).await?;
        Ok(index.categories)
    }

    /// Returns every post summary in index order (most recent first).
    pub async fn posts_index(&self) -> Result<Vec<Post>> {
        let index: PostIndex = self.fetch(INDEX_KEY).await?;
        Ok(index.posts)
    }

    /// Fetches the full post resource. A missing resource is a
    /// [`Error::FetchFailed`]; use [`Api::post_by_slug`] when the slug came
    /// from a URL.
    pub async fn post(&self, category: &str, slug: &str) -> Result<Post> {
        self.fetch(&post_key(category, slug)).await
    }

    /// Finds the post's category in the index, then fetches the full post.
    /// Returns `Ok(None)` if no indexed post has this slug.
    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let posts = self.posts_index().await?;
        let category = match posts.into_iter().find(|p| p.slug == slug) {
            Some(meta) => meta.category,
            None => return Ok(None),
        };
        Ok(Some(self.post(&category, slug).await?))
    }

    /// Returns the indexed posts in `category`, in index order. No
    /// pagination happens here.
    pub async fn posts_by_category(&self, category: &str) -> Result<Vec<Post>> {
        let posts = self.posts_index().await?;
        Ok(posts.into_iter().filter(|p| p.category == category).collect())
    }

    /// Returns the first `limit` posts of the index.
    pub async fn recent_posts(&self, limit: usize) -> Result<Vec<Post>> {
        let mut posts = self.posts_index().await?;
        posts.truncate(limit);
        Ok(posts)
    }
}

/// The result of a data-layer operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed retrieval. Absent entities are never reported here.
#[derive(Debug)]
pub enum Error {
    /// Returned when the source answers with a non-success status.
    FetchFailed { key: String, status: u16 },

    /// Returned when the source could not be reached at all.
    Io { key: String, err: io::Error },

    /// Returned when a payload isn't valid JSON or doesn't have the expected
    /// shape.
    Decode { key: String, err: serde_json::Error },
}

impl Error {
    /// The resource key the failure is about.
    pub fn key(&self) -> &str {
        match self {
            Error::FetchFailed { key, .. } => key,
            Error::Io { key, .. } => key,
            Error::Decode { key, .. } => key,
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FetchFailed { key, status } => {
                write!(f, "Failed to fetch {}: {}", key, status)
            }
            Error::Io { key, err } => write!(f, "Failed to fetch {}: {}", key, err),
            Error::Decode { key, err } => {
                write!(f, "Malformed response from {}: {}", key, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FetchFailed { .. } => None,
            Error::Io { err, .. } => Some(err),
            Error::Decode { err, .. } => Some(err),
        }
    }
}
