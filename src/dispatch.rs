//! The render dispatcher. [`Dispatcher::render`] takes a location through
//! the whole pipeline: commit a loading placeholder, resolve the route, run
//! that route's fetch plan against the [`Api`], build the view, then update
//! the document's metadata and content.
//!
//! A navigation moves the dispatcher to [`State::Loading`] and ends in
//! [`State::Rendered`], [`State::NotFound`], or [`State::Error`]. Missing
//! entities and unmatched paths end in `NotFound`; any data-layer failure
//! ends in `Error` with the failure's message on screen. Nothing escapes
//! `render`.
//!
//! Navigations aren't queued. When a newer navigation has started by the
//! time an older one's data arrives, the older result is dropped rather than
//! committed.

use crate::api::{self, Api};
use crate::cache::{Clock, SystemClock};
use crate::post::Post;
use crate::route::{Route, Router};
use crate::source::DataSource;
use crate::view::{
    BlogListPage, CategoryPage, ErrorPage, HomePage, Page, PostPage, Site, DEFAULT_PAGE_SIZE,
    DEFAULT_RECENT_POSTS,
};
use futures::executor::LocalSpawner;
use futures::future::try_join;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Related posts shown under a post.
pub const DEFAULT_RELATED_POSTS: usize = 3;

/// The part of the page the dispatcher writes to: one content region plus
/// the title and meta description.
pub trait Document {
    fn set_content(&mut self, markup: String);
    fn set_title(&mut self, title: String);
    fn set_description(&mut self, description: String);
}

/// A [`Document`] held in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    pub title: String,
    pub description: String,
    pub content: String,

    /// How many times the content region has been replaced.
    pub commits: usize,
}

impl Document for MemoryDocument {
    fn set_content(&mut self, markup: String) {
        self.content = markup;
        self.commits += 1;
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Loading,
    Rendered,
    NotFound,
    Error,
}

/// Knobs for what the views show.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub site: Site,
    pub page_size: usize,
    pub recent_posts: usize,
    pub related_posts: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            site: Site::default(),
            page_size: DEFAULT_PAGE_SIZE,
            recent_posts: DEFAULT_RECENT_POSTS,
            related_posts: DEFAULT_RELATED_POSTS,
        }
    }
}

pub struct Dispatcher<S, D, C = SystemClock> {
    api: Api<S, C>,
    router: Router,
    document: RefCell<D>,
    settings: Settings,
    state: Cell<State>,
    generation: Cell<u64>,
}

impl<S: DataSource, D: Document, C: Clock> Dispatcher<S, D, C> {
    pub fn new(api: Api<S, C>, router: Router, document: D, settings: Settings) -> Self {
        Dispatcher {
            api,
            router,
            document: RefCell::new(document),
            settings,
            state: Cell::new(State::Idle),
            generation: Cell::new(0),
        }
    }

    pub fn state(&self) -> State {
        self.state.get()
    }

    pub fn document(&self) -> Ref<'_, D> {
        self.document.borrow()
    }

    pub fn api(&self) -> &Api<S, C> {
        &self.api
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Renders `location` into the document. Returns the state it ended in,
    /// or `None` if a later navigation superseded it before its data
    /// arrived.
    pub async fn render(&self, location: &str) -> Option<State> {
        let generation = self.begin();
        self.finish(location, generation).await
    }

    /// Starts a navigation: moves to [`State::Loading`] and commits the
    /// loading placeholder. Returns the navigation's generation for
    /// [`Dispatcher::finish`].
    pub fn begin(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.state.set(State::Loading);
        self.document
            .borrow_mut()
            .set_content(Page::Loading.to_string());
        generation
    }

    /// Loads and commits the page for a navigation started by
    /// [`Dispatcher::begin`]. Nothing is committed if another navigation
    /// has begun since.
    pub async fn finish(&self, location: &str, generation: u64) -> Option<State> {
        let route = self.router.resolve(location);
        info!(location, view = %route.view(), "navigating");
        let loaded = self.load(route).await;

        if self.generation.get() != generation {
            debug!(location, "superseded by a later navigation");
            return None;
        }

        let (state, page) = match loaded {
            Ok(Some(page)) => (State::Rendered, page),
            Ok(None) => (State::NotFound, Page::NotFound),
            Err(err) => {
                warn!(location, error = %err, "render failed");
                (State::Error, Page::Error(ErrorPage::new(err.to_string())))
            }
        };
        self.commit(&page);
        self.state.set(state);
        Some(state)
    }

    /// Runs the fetch plan for `route`. `Ok(None)` means an entity the route
    /// names doesn't exist.
    async fn load(&self, route: Route) -> api::Result<Option<Page>> {
        let settings = &self.settings;
        Ok(Some(match route {
            Route::Home => {
                let (posts, categories) = try_join(
                    self.api.recent_posts(settings.recent_posts),
                    self.api.categories(),
                )
                .await?;
                Page::Home(HomePage::new(
                    &settings.site,
                    &posts,
                    &categories,
                    settings.recent_posts,
                ))
            }
            Route::About => Page::About(settings.site.clone()),
            Route::Contact => Page::Contact(settings.site.clone()),
            Route::BlogList { page } => {
                let posts = self.api.posts_index().await?;
                Page::BlogList(BlogListPage::new(&posts, page, settings.page_size))
            }
            Route::CategoryList { category } => {
                let (categories, posts) = try_join(
                    self.api.categories(),
                    self.api.posts_by_category(&category),
                )
                .await?;
                match categories.iter().find(|c| c.slug == category) {
                    Some(c) => Page::Category(CategoryPage::new(c, &posts)),
                    None => return Ok(None),
                }
            }
            Route::Post { slug } => {
                let post = match self.api.post_by_slug(&slug).await? {
                    Some(post) => post,
                    None => return Ok(None),
                };
                let index = self.api.posts_index().await?;
                let related = related_posts(&post, &index, settings.related_posts);
                Page::Post(PostPage::new(&post, &related))
            }
            Route::NotFound => return Ok(None),
        }))
    }

    fn commit(&self, page: &Page) {
        let mut document = self.document.borrow_mut();
        document.set_title(document_title(page.title().as_deref(), &self.settings.site.title));
        if let Some(description) = page.description() {
            document.set_description(description);
        }
        document.set_content(page.to_string());
    }
}

impl<S, D, C> Dispatcher<S, D, C>
where
    S: DataSource + 'static,
    D: Document + 'static,
    C: Clock + 'static,
{
    /// Returns a navigation callback for [`crate::history::HistoryIntegrator`].
    /// Each call commits the loading placeholder before returning and spawns
    /// the rest of the render onto `spawner`.
    pub fn callback(self: &Rc<Self>, spawner: LocalSpawner) -> impl FnMut(&str) {
        let dispatcher = Rc::clone(self);
        move |location: &str| {
            let generation = dispatcher.begin();
            let dispatcher = Rc::clone(&dispatcher);
            let location = location.to_owned();
            let spawned = spawner.spawn_local(async move {
                dispatcher.finish(&location, generation).await;
            });
            if let Err(err) = spawned {
                warn!(error = %err, "could not schedule render");
            }
        }
    }
}

/// Builds the document title: `"{title} | {site}"`, or just the site title.
pub fn document_title(title: Option<&str>, site: &str) -> String {
    match title {
        Some(title) if !title.is_empty() => format!("{} | {}", title, site),
        _ => site.to_owned(),
    }
}

/// Picks up to `limit` posts to show under `post`. Slugs the post lists in
/// `relatedPosts` are looked up in the index, in order; a post that lists
/// none gets other posts from its category instead.
pub fn related_posts(post: &Post, index: &[Post], limit: usize) -> Vec<Post> {
    let others = |p: &&Post| p.slug != post.slug;
    match post.related_posts.is_empty() {
        true => index
            .iter()
            .filter(|p| p.category == post.category)
            .filter(others)
            .take(limit)
            .cloned()
            .collect(),
        false => post
            .related_posts
            .iter()
            .filter_map(|slug| index.iter().find(|p| &p.slug == slug))
            .filter(others)
            .take(limit)
            .cloned()
            .collect(),
    }
}
