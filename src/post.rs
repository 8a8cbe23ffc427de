//! Defines the read-only records served from the data directory: [`Post`],
//! [`Category`], and the [`PostIndex`] and [`CategoryIndex`] envelopes that
//! wrap them in `index.json` and `categories.json`. Nothing in the crate
//! mutates these; views only filter, slice, and project them.

use chrono::NaiveDate;
use serde::Deserialize;

/// A blog post. Entries in `index.json` carry everything except `content`;
/// the full resource at `posts/{category}/{slug}.json` carries the body too.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub category: String,

    #[serde(default)]
    pub excerpt: String,

    /// The publication date as `YYYY-MM-DD`.
    pub date: String,

    /// Estimated reading time in minutes.
    #[serde(default)]
    pub read_time: u32,

    #[serde(default)]
    pub tags: Vec<String>,

    /// The rendered HTML body. This is trusted build-time content and is
    /// inserted into the page without escaping.
    #[serde(default)]
    pub content: String,

    /// Slugs of posts the author picked as related, in display order.
    #[serde(default)]
    pub related_posts: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Category {
    pub slug: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// A CSS color used for the category card border.
    #[serde(default)]
    pub color: String,
}

/// The shape of `index.json`. Posts are stored most recent first.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PostIndex {
    pub posts: Vec<Post>,
}

/// The shape of `categories.json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CategoryIndex {
    pub categories: Vec<Category>,
}

/// Formats a `YYYY-MM-DD` date as e.g. `March 5, 2024`. Dates that don't
/// parse are returned unchanged.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialize_post() -> serde_json::Result<()> {
        let post: Post = serde_json::from_str(
            r#"{
                "slug": "closures",
                "title": "Closures",
                "category": "javascript",
                "excerpt": "Functions all the way down.",
                "date": "2024-03-05",
                "readTime": 7,
                "tags": ["functions", "scope"],
                "content": "<p>Hi</p>",
                "relatedPosts": ["hoisting"]
            }"#,
        )?;
        assert_eq!(7, post.read_time);
        assert_eq!(vec!["hoisting".to_owned()], post.related_posts);
        assert_eq!("<p>Hi</p>", post.content);
        Ok(())
    }

    #[test]
    fn test_deserialize_index_entry_without_content() -> serde_json::Result<()> {
        let index: PostIndex = serde_json::from_str(
            r#"{"posts": [{"slug": "a", "title": "A", "category": "devops", "date": "2024-01-01"}]}"#,
        )?;
        assert_eq!(1, index.posts.len());
        assert!(index.posts[0].content.is_empty());
        assert!(index.posts[0].tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_format_date() {
        assert_eq!("March 5, 2024", format_date("2024-03-05"));
        assert_eq!("December 31, 1999", format_date("1999-12-31"));
    }

    #[test]
    fn test_format_date_unparsable() {
        assert_eq!("sometime", format_date("sometime"));
    }

    #[test]
    fn test_deserialize_categories_with_colors() -> serde_json::Result<()> {
        let index: CategoryIndex = serde_json::from_str(crate::testutil::CATEGORIES_JSON)?;
        let colors: Vec<&str> = index.categories.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(vec!["#f7df1e", "#0db7ed"], colors);
        assert_eq!("Shipping & running things", index.categories[1].description);
        Ok(())
    }
}
