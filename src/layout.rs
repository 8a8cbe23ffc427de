//! Renders a [`MemoryDocument`] as a complete HTML page by applying a
//! layout template. The layout sees three fields: `.title` and
//! `.description` (already escaped) and `.content` (the content region's
//! markup, written as-is).

use crate::dispatch::MemoryDocument;
use crate::markup::escape;
use gtmpl::Value;
use std::collections::HashMap;
use std::fmt;

/// The layout used when the project doesn't provide one.
pub const DEFAULT_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{.title}}</title>
<meta name="description" content="{{.description}}">
</head>
<body>
<nav><a href="/" data-link>Home</a> <a href="/blog" data-link>Blog</a> <a href="/about" data-link>About</a> <a href="/contact" data-link>Contact</a></nav>
<main id="app">{{.content}}</main>
</body>
</html>
"#;

impl From<&MemoryDocument> for Value {
    /// Converts a [`MemoryDocument`] into a [`Value`] for templating.
    fn from(document: &MemoryDocument) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(escape(&document.title)));
        m.insert(
            "description".to_owned(),
            Value::String(escape(&document.description)),
        );
        m.insert("content".to_owned(), Value::String(document.content.clone()));
        Value::Object(m)
    }
}

/// Applies `layout` to `document`.
pub fn render_document(layout: &str, document: &MemoryDocument) -> Result<String> {
    gtmpl::template(layout, Value::from(document)).map_err(|e| Error::Template(e.to_string()))
}

/// The result of applying a layout.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The layout failed to parse or execute.
    Template(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "Applying layout: {}", err),
        }
    }
}

impl std::error::Error for Error {}
