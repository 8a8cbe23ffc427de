//! Defines the [`DataSource`] trait, the GET-style retrieval that sits
//! beneath [`crate::api::Api`], and [`DirSource`], which serves resources from
//! a directory on disk.

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

/// The status and body of a retrieval.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok<B: Into<Vec<u8>>>(body: B) -> Response {
        Response {
            status: 200,
            body: body.into(),
        }
    }

    pub fn not_found() -> Response {
        Response {
            status: 404,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves resources by key (a URL path such as `/data/index.json`).
/// Non-success statuses come back as an `Ok` [`Response`]; `Err` is reserved
/// for failures to reach the resource at all.
#[async_trait(?Send)]
pub trait DataSource {
    async fn get(&self, key: &str) -> io::Result<Response>;
}

/// Serves keys as files relative to a root directory, so the key
/// `/data/index.json` maps to `{root}/data/index.json`. Missing files and
/// keys that try to leave the root are answered with a 404.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> DirSource {
        DirSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        if relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            Some(self.root.join(relative))
        } else {
            None
        }
    }
}

#[async_trait(?Send)]
impl DataSource for DirSource {
    async fn get(&self, key: &str) -> io::Result<Response> {
        let path = match self.resolve(key) {
            Some(path) => path,
            None => return Ok(Response::not_found()),
        };
        match std::fs::read(&path) {
            Ok(body) => Ok(Response::ok(body)),
            Err(e) => match e.kind() {
                io::ErrorKind::NotFound => Ok(Response::not_found()),
                _ => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::executor::block_on;

    fn scratch_dir(name: &str) -> io::Result<PathBuf> {
        let dir = std::env::temp_dir().join(format!("skald-source-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("data"))?;
        Ok(dir)
    }

    #[test]
    fn test_dir_source_reads_file() -> io::Result<()> {
        let dir = scratch_dir("reads")?;
        std::fs::write(dir.join("data/index.json"), r#"{"posts": []}"#)?;
        let response = block_on(DirSource::new(&dir).get("/data/index.json"))?;
        assert!(response.is_success());
        assert_eq!(br#"{"posts": []}"#.to_vec(), response.body);
        std::fs::remove_dir_all(&dir)
    }

    #[test]
    fn test_dir_source_missing_file_is_404() -> io::Result<()> {
        let dir = scratch_dir("missing")?;
        let response = block_on(DirSource::new(&dir).get("/data/nope.json"))?;
        assert_eq!(404, response.status);
        assert!(!response.is_success());
        std::fs::remove_dir_all(&dir)
    }

    #[test]
    fn test_dir_source_rejects_parent_components() -> io::Result<()> {
        let dir = scratch_dir("parent")?;
        let response = block_on(DirSource::new(dir.join("data")).get("/../data/index.json"))?;
        assert_eq!(404, response.status);
        std::fs::remove_dir_all(&dir)
    }
}
