//! Maps locations to views. A [`Router`] holds an ordered table of
//! [`RouteRule`]s; the first rule whose pattern matches the path wins, and a
//! path no rule matches resolves to [`View::NotFound`]. [`Router::resolve`]
//! goes one step further and produces a [`Route`], which carries the view's
//! parameters as typed fields for the dispatcher to match on.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// The categories the router recognizes when none are configured.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "javascript",
    "typescript",
    "devops",
    "web-development",
    "tutorials",
];

/// A logical page type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Home,
    About,
    Contact,
    BlogList,
    CategoryList,
    Post,
    NotFound,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::Home => "home",
            View::About => "about",
            View::Contact => "contact",
            View::BlogList => "blogList",
            View::CategoryList => "categoryList",
            View::Post => "post",
            View::NotFound => "notFound",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry in the route table. Capture group `i` of `pattern` binds to
/// `params[i - 1]`.
#[derive(Clone, Debug)]
pub struct RouteRule {
    pattern: Regex,
    view: View,
    params: Vec<&'static str>,
}

impl RouteRule {
    pub fn new(pattern: &str, view: View, params: &[&'static str]) -> Result<RouteRule, regex::Error> {
        Ok(RouteRule {
            pattern: Regex::new(pattern)?,
            view,
            params: params.to_vec(),
        })
    }

    fn matches(&self, path: &str) -> Option<Match> {
        let captures = self.pattern.captures(path)?;
        let params = self
            .params
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                captures
                    .get(i + 1)
                    .map(|m| (name.to_string(), m.as_str().to_owned()))
            })
            .collect();
        Some(Match {
            view: self.view,
            params,
        })
    }
}

/// The view a path resolved to and the parameters pulled out of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub view: View,
    pub params: BTreeMap<String, String>,
}

impl Match {
    fn not_found() -> Match {
        Match {
            view: View::NotFound,
            params: BTreeMap::new(),
        }
    }

    fn param(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }
}

/// A resolved navigation target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Contact,

    /// The paginated list of all posts. `page` is 1-based.
    BlogList { page: usize },

    CategoryList { category: String },
    Post { slug: String },
    NotFound,
}

impl Route {
    pub fn view(&self) -> View {
        match self {
            Route::Home => View::Home,
            Route::About => View::About,
            Route::Contact => View::Contact,
            Route::BlogList { .. } => View::BlogList,
            Route::CategoryList { .. } => View::CategoryList,
            Route::Post { .. } => View::Post,
            Route::NotFound => View::NotFound,
        }
    }
}

/// A location split into its path and query, e.g. `/blog?page=2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    /// Splits `location`, normalizing the path the way a browser would.
    /// Anything that can't be read as a relative URL is taken as a bare path.
    pub fn parse(location: &str) -> Location {
        let parsed = Url::parse("http://localhost/").and_then(|base| base.join(location));
        match parsed {
            Ok(url) => Location {
                path: url.path().to_owned(),
                query: url.query().map(str::to_owned),
            },
            Err(_) => Location {
                path: location.to_owned(),
                query: None,
            },
        }
    }

    /// The `page` query parameter. Missing, non-numeric, and zero values all
    /// read as page 1.
    pub fn page(&self) -> usize {
        let query = match &self.query {
            Some(query) => query,
            None => return 1,
        };
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

/// The ordered route table.
#[derive(Clone, Debug)]
pub struct Router {
    rules: Vec<RouteRule>,
}

impl Router {
    /// Builds the blog's route table. `categories` is the closed set of
    /// category slugs the category-list route accepts; it can't change after
    /// construction.
    pub fn new<I, S>(categories: I) -> Result<Router, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories: Vec<String> = categories
            .into_iter()
            .map(|c| regex::escape(c.as_ref()))
            .collect();

        let mut rules = vec![
            RouteRule::new(r"^/$", View::Home, &[])?,
            RouteRule::new(r"^/about/?$", View::About, &[])?,
            RouteRule::new(r"^/contact/?$", View::Contact, &[])?,
            RouteRule::new(r"^/blog/?$", View::BlogList, &[])?,
        ];
        if !categories.is_empty() {
            rules.push(RouteRule::new(
                &format!("^/blog/({})/?$", categories.join("|")),
                View::CategoryList,
                &["category"],
            )?);
        }
        rules.push(RouteRule::new(r"^/blog/([a-z0-9-]+)/?$", View::Post, &["slug"])?);
        Ok(Router { rules })
    }

    /// Builds a router from explicit rules, tried in the order given.
    pub fn from_rules(rules: Vec<RouteRule>) -> Router {
        Router { rules }
    }

    /// Finds the first rule matching `path`. Never fails: an unmatched path
    /// gives [`View::NotFound`] with no parameters.
    pub fn match_path(&self, path: &str) -> Match {
        self.rules
            .iter()
            .find_map(|rule| rule.matches(path))
            .unwrap_or_else(Match::not_found)
    }

    /// Resolves a full location (path plus optional query) into a [`Route`].
    pub fn resolve(&self, location: &str) -> Route {
        let location = Location::parse(location);
        let m = self.match_path(&location.path);
        let route = match m.view {
            View::Home => Some(Route::Home),
            View::About => Some(Route::About),
            View::Contact => Some(Route::Contact),
            View::BlogList => Some(Route::BlogList {
                page: location.page(),
            }),
            View::CategoryList => m
                .param("category")
                .map(|category| Route::CategoryList { category }),
            View::Post => m.param("slug").map(|slug| Route::Post { slug }),
            View::NotFound => None,
        };
        route.unwrap_or(Route::NotFound)
    }
}
