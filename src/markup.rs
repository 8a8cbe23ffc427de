//! The escaping layer for the view renderer. Every piece of text a view
//! interpolates into markup is an [`Html`] value, which says explicitly
//! whether it is plain text (escaped on output) or trusted markup (written
//! as-is). Escaping itself is delegated to [`pulldown_cmark::escape`]; the
//! [`EscapeHtml`] and [`EscapeHref`] wrappers let it run straight into a
//! [`fmt::Formatter`] so views can use `write!`.

use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use std::fmt::{self, Display};
use std::io;

struct Adaptor<'a, T> {
    formatter: &'a mut T,
    result: fmt::Result,
}

impl<T> Adaptor<'_, T> {
    fn handle_result(&mut self, result: fmt::Result) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.result = result;
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

impl<T: fmt::Write> StrWrite for Adaptor<'_, T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let result = self.formatter.write_str(s);
        self.handle_result(result)
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> io::Result<()> {
        let result = self.formatter.write_fmt(args);
        self.handle_result(result)
    }
}

/// Displays its text with `&`, `<`, `>`, and `"` replaced by entities.
pub struct EscapeHtml<'a>(pub &'a str);

impl Display for EscapeHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_html(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Displays its text percent-encoded for use inside an `href` attribute.
pub struct EscapeHref<'a>(pub &'a str);

impl Display for EscapeHref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_href(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Escapes `s` for use as HTML text or a quoted attribute value.
pub fn escape(s: &str) -> String {
    EscapeHtml(s).to_string()
}

/// A field of a view model, tagged with how it must be written out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Html {
    /// Content-derived text (titles, excerpts, tag names). Escaped on output.
    Text(String),

    /// Markup produced at build time from trusted sources (post bodies).
    /// Written verbatim.
    Trusted(String),
}

impl Html {
    pub fn text<S: Into<String>>(s: S) -> Html {
        Html::Text(s.into())
    }

    pub fn trusted<S: Into<String>>(s: S) -> Html {
        Html::Trusted(s.into())
    }

    /// The unescaped contents.
    pub fn as_str(&self) -> &str {
        match self {
            Html::Text(s) => s,
            Html::Trusted(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Html::Text(s) => EscapeHtml(s).fmt(f),
            Html::Trusted(s) => f.write_str(s),
        }
    }
}
