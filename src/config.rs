//! Loads project configuration from a `skald.yaml` file. Only `data_root`
//! is required; everything else has a default.
//!
//! ```yaml
//! site_title: Tech Blog
//! site_description: Articles on the web platform
//! data_root: public          # relative to the project file
//! categories: [javascript, devops]
//! cache_ttl_secs: 300
//! page_size: 12
//! recent_posts: 6
//! layout: layout.html        # optional, relative to the project file
//! ```

use crate::dispatch::{Settings, DEFAULT_RELATED_POSTS};
use crate::route::DEFAULT_CATEGORIES;
use crate::view::{Site, DEFAULT_PAGE_SIZE, DEFAULT_RECENT_POSTS};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The name of the project file.
pub const PROJECT_FILE: &str = "skald.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Deserialize)]
struct RecentPosts(usize);
impl Default for RecentPosts {
    fn default() -> Self {
        RecentPosts(DEFAULT_RECENT_POSTS)
    }
}

#[derive(Deserialize)]
struct TtlSecs(u64);
impl Default for TtlSecs {
    fn default() -> Self {
        TtlSecs(300)
    }
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    site_title: Option<String>,

    #[serde(default)]
    site_description: Option<String>,

    data_root: PathBuf,

    #[serde(default)]
    categories: Option<Vec<String>>,

    #[serde(default)]
    cache_ttl_secs: TtlSecs,

    #[serde(default)]
    page_size: PageSize,

    #[serde(default)]
    recent_posts: RecentPosts,

    #[serde(default)]
    layout: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The directory resource keys resolve against (it holds `data/`).
    pub data_root: PathBuf,
    pub site: Site,

    /// The closed set of category slugs the router accepts.
    pub categories: Vec<String>,
    pub cache_ttl: Duration,
    pub page_size: usize,
    pub recent_posts: usize,

    /// A layout template file to use instead of the built-in one.
    pub layout: Option<PathBuf>,
}

impl Config {
    /// Looks for [`PROJECT_FILE`] in `dir` and then in each of its parents.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        match find_project_file(dir) {
            Some(path) => match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            },
            None => Err(anyhow!(
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            )),
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::from_project(project, project_root)),
        }
    }

    /// Parses a project file's contents. Relative paths in it are taken
    /// relative to `project_root`.
    pub fn from_yaml(yaml: &str, project_root: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_str(yaml)?;
        Ok(Config::from_project(project, project_root))
    }

    fn from_project(project: Project, project_root: &Path) -> Config {
        let defaults = Site::default();
        Config {
            data_root: project_root.join(project.data_root),
            site: Site {
                title: project.site_title.unwrap_or(defaults.title),
                description: project.site_description.unwrap_or(defaults.description),
            },
            categories: project.categories.unwrap_or_else(|| {
                DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
            }),
            cache_ttl: Duration::from_secs(project.cache_ttl_secs.0),
            page_size: project.page_size.0,
            recent_posts: project.recent_posts.0,
            layout: project.layout.map(|layout| project_root.join(layout)),
        }
    }

    /// The view settings this configuration describes.
    pub fn settings(&self) -> Settings {
        Settings {
            site: self.site.clone(),
            page_size: self.page_size,
            recent_posts: self.recent_posts,
            related_posts: DEFAULT_RELATED_POSTS,
        }
    }

    /// Reads the configured layout template, if there is one.
    pub fn read_layout(&self) -> Result<Option<String>> {
        use std::io::Read;
        match &self.layout {
            None => Ok(None),
            Some(path) => {
                let mut contents = String::new();
                open(path, "layout")?.read_to_string(&mut contents)?;
                Ok(Some(contents))
            }
        }
    }
}

/// Returns the path of the nearest [`PROJECT_FILE`], searching `dir` and
/// then each of its parents.
pub fn find_project_file(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(PROJECT_FILE);
    match path.exists() {
        true => Some(path),
        false => dir.parent().and_then(find_project_file),
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}
