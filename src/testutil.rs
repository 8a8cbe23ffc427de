//! Fixtures shared by the unit tests: a clock that only moves when told to,
//! and an in-memory [`DataSource`] that counts requests and can hold a
//! response back until the test releases it.

use crate::cache::Clock;
use crate::source::{DataSource, Response};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone)]
pub struct ManualClock(Rc<Cell<DateTime<Utc>>>);

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock(Rc::new(Cell::new(Utc.ymd(2024, 1, 1).and_hms(0, 0, 0))))
    }

    pub fn advance(&self, by: Duration) {
        let by = chrono::Duration::from_std(by).unwrap();
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

#[derive(Default)]
struct Inner {
    resources: RefCell<HashMap<String, Response>>,
    requests: RefCell<HashMap<String, usize>>,
    held: RefCell<HashMap<String, oneshot::Receiver<()>>>,
}

/// Cloning shares the underlying resources, so a test can keep a handle
/// after moving a clone into an [`crate::api::Api`].
#[derive(Clone, Default)]
pub struct MemorySource(Rc<Inner>);

impl MemorySource {
    pub fn new() -> MemorySource {
        MemorySource::default()
    }

    pub fn insert(&self, key: &str, body: &str) {
        self.0
            .resources
            .borrow_mut()
            .insert(key.to_owned(), Response::ok(body));
    }

    pub fn insert_status(&self, key: &str, status: u16) {
        self.0.resources.borrow_mut().insert(
            key.to_owned(),
            Response {
                status,
                body: Vec::new(),
            },
        );
    }

    /// The next request for `key` waits until the returned sender fires (or
    /// is dropped).
    pub fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.0.held.borrow_mut().insert(key.to_owned(), rx);
        tx
    }

    pub fn requests(&self, key: &str) -> usize {
        self.0.requests.borrow().get(key).copied().unwrap_or(0)
    }
}

#[async_trait(?Send)]
impl DataSource for MemorySource {
    async fn get(&self, key: &str) -> io::Result<Response> {
        *self
            .0
            .requests
            .borrow_mut()
            .entry(key.to_owned())
            .or_insert(0) += 1;
        let held = self.0.held.borrow_mut().remove(key);
        if let Some(rx) = held {
            let _ = rx.await;
        }
        let response = self.0.resources.borrow().get(key).cloned();
        Ok(response.unwrap_or_else(Response::not_found))
    }
}

/// Builds an `index.json` body holding `n` posts named `post-0` through
/// `post-{n-1}`, all in `category`.
pub fn index_json(n: usize, category: &str) -> String {
    let posts: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"slug": "post-{i}", "title": "Post {i}", "category": "{c}", "excerpt": "Excerpt {i}", "date": "2024-01-{d:02}", "readTime": 5}}"#,
                i = i,
                c = category,
                d = (i % 28) + 1,
            )
        })
        .collect();
    format!(r#"{{"posts": [{}]}}"#, posts.join(","))
}

pub const CATEGORIES_JSON: &str = r##"{"categories": [
    {"slug": "javascript", "name": "JavaScript", "description": "The language of the web", "color": "#f7df1e"},
    {"slug": "devops", "name": "DevOps", "description": "Shipping & running things", "color": "#0db7ed"}
]}"##;
