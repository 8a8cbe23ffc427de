//! The view renderer. Each view is a typed record built from already-fetched
//! data, and rendering it is just [`Display`]: `page.to_string()` is the
//! markup for the content region. Views never fetch anything.
//!
//! Text taken from posts and categories goes through [`Html::Text`] and is
//! escaped on output. The only field written verbatim is a post's body,
//! which is [`Html::Trusted`].

use crate::markup::{EscapeHref, EscapeHtml, Html};
use crate::post::{format_date, Category, Post};
use std::fmt::{self, Display};

/// Posts per page on the blog list.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Posts shown on the home page.
pub const DEFAULT_RECENT_POSTS: usize = 6;

/// Site-wide text used by the home, about, and contact pages.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub title: String,
    pub description: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            title: "Tech Blog".to_owned(),
            description:
                "In-depth articles on JavaScript, TypeScript, DevOps, and web development"
                    .to_owned(),
        }
    }
}

/// The summary card for one post. Shared by the home, blog list, category,
/// and related-posts views.
#[derive(Clone, Debug, PartialEq)]
pub struct PostCard {
    pub slug: String,
    pub category: Html,
    pub title: Html,
    pub excerpt: Html,
    pub date: String,
    pub read_time: u32,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> PostCard {
        PostCard {
            slug: post.slug.clone(),
            category: Html::text(&post.category),
            title: Html::text(&post.title),
            excerpt: Html::text(&post.excerpt),
            date: format_date(&post.date),
            read_time: post.read_time,
        }
    }
}

impl Display for PostCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            concat!(
                r#"<article class="post-card">"#,
                r#"<span class="category-tag" data-category="{category}">{category}</span>"#,
                r#"<h3><a href="/blog/{slug}" data-link>{title}</a></h3>"#,
                r#"<p class="excerpt">{excerpt}</p>"#,
                r#"<p class="meta">{date} &middot; {read_time} min read</p>"#,
                "</article>",
            ),
            category = self.category,
            slug = EscapeHref(&self.slug),
            title = self.title,
            excerpt = self.excerpt,
            date = EscapeHtml(&self.date),
            read_time = self.read_time,
        )
    }
}

fn cards(posts: &[Post]) -> Vec<PostCard> {
    posts.iter().map(PostCard::from).collect()
}

/// Wraps a list of cards in the post grid.
struct PostGrid<'a>(&'a [PostCard]);

impl Display for PostGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(r#"<div class="post-grid">"#)?;
        for card in self.0 {
            card.fmt(f)?;
        }
        f.write_str("</div>")
    }
}

/// One link in a [`Pagination`] bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub active: bool,
}

/// Page links for a paginated list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub current: usize,
    pub total_pages: usize,
    base_path: String,
}

impl Pagination {
    /// Computes the page count for `total_items` at `page_size` per page.
    pub fn new(total_items: usize, page_size: usize, current: usize, base_path: &str) -> Pagination {
        let page_size = page_size.max(1);
        let total_pages = match total_items % page_size {
            0 => total_items / page_size,
            _ => total_items / page_size + 1,
        };
        Pagination {
            current,
            total_pages,
            base_path: base_path.to_owned(),
        }
    }

    /// One link per page. Page 1 links to the bare base path; the others add
    /// a `page` query parameter.
    pub fn links(&self) -> Vec<PageLink> {
        (1..=self.total_pages)
            .map(|number| PageLink {
                number,
                href: match number {
                    1 => self.base_path.clone(),
                    _ => format!("{}?page={}", self.base_path, number),
                },
                active: number == self.current,
            })
            .collect()
    }
}

impl Display for Pagination {
    /// Writes nothing when everything fits on one page.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.total_pages <= 1 {
            return Ok(());
        }
        f.write_str(r#"<nav class="pagination">"#)?;
        for link in self.links() {
            write!(
                f,
                r#"<a href="{}" data-link class="page-link{}">{}</a>"#,
                EscapeHref(&link.href),
                if link.active { " active" } else { "" },
                link.number,
            )?;
        }
        f.write_str("</nav>")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryCard {
    pub slug: String,
    pub name: Html,
    pub description: Html,
    pub color: Html,
}

impl From<&Category> for CategoryCard {
    fn from(category: &Category) -> CategoryCard {
        CategoryCard {
            slug: category.slug.clone(),
            name: Html::text(&category.name),
            description: Html::text(&category.description),
            color: Html::text(&category.color),
        }
    }
}

impl Display for CategoryCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            r#"<a href="/blog/{}" data-link class="category-card" style="border-color: {}"><h3>{}</h3><p>{}</p></a>"#,
            EscapeHref(&self.slug),
            self.color,
            self.name,
            self.description,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HomePage {
    pub heading: Html,
    pub tagline: Html,
    pub categories: Vec<CategoryCard>,
    pub posts: Vec<PostCard>,
}

impl HomePage {
    /// Shows every category and the first `recent` posts.
    pub fn new(site: &Site, posts: &[Post], categories: &[Category], recent: usize) -> HomePage {
        HomePage {
            heading: Html::text(&site.title),
            tagline: Html::text(&site.description),
            categories: categories.iter().map(CategoryCard::from).collect(),
            posts: cards(&posts[..posts.len().min(recent)]),
        }
    }
}

impl Display for HomePage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            r#"<section class="hero"><h1>{}</h1><p>{}</p></section>"#,
            self.heading, self.tagline
        )?;
        f.write_str(r#"<section class="categories-section"><h2>Categories</h2><div class="category-grid">"#)?;
        for category in &self.categories {
            category.fmt(f)?;
        }
        f.write_str("</div></section>")?;
        write!(
            f,
            r#"<section class="featured-posts"><h2>Latest Articles</h2>{}<p class="text-center"><a href="/blog" data-link class="btn">View All Posts</a></p></section>"#,
            PostGrid(&self.posts)
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlogListPage {
    pub total_posts: usize,
    pub posts: Vec<PostCard>,
    pub pagination: Pagination,
}

impl BlogListPage {
    /// Shows page `page` (1-based) of `posts`. A page past the end is empty.
    pub fn new(posts: &[Post], page: usize, page_size: usize) -> BlogListPage {
        let page_size = page_size.max(1);
        let start = page.saturating_sub(1).saturating_mul(page_size);
        BlogListPage {
            total_posts: posts.len(),
            posts: posts
                .iter()
                .skip(start)
                .take(page_size)
                .map(PostCard::from)
                .collect(),
            pagination: Pagination::new(posts.len(), page_size, page, "/blog"),
        }
    }
}

impl Display for BlogListPage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            r#"<div class="page-header"><h1>All Articles</h1><p>{} articles</p></div>{}{}"#,
            self.total_posts,
            PostGrid(&self.posts),
            self.pagination,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPage {
    pub name: Html,
    pub description: Html,
    pub posts: Vec<PostCard>,
}

impl CategoryPage {
    pub fn new(category: &Category, posts: &[Post]) -> CategoryPage {
        CategoryPage {
            name: Html::text(&category.name),
            description: Html::text(&category.description),
            posts: cards(posts),
        }
    }
}

impl Display for CategoryPage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            concat!(
                r#"<div class="page-header">"#,
                r#"<div class="breadcrumb"><a href="/" data-link>Home</a> / <a href="/blog" data-link>Blog</a> / {name}</div>"#,
                "<h1>{name}</h1><p>{description}</p>",
                "</div>{posts}",
            ),
            name = self.name,
            description = self.description,
            posts = PostGrid(&self.posts),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostPage {
    pub category_slug: String,
    pub category: Html,
    pub title: Html,
    pub excerpt: Html,
    pub date: String,
    pub read_time: u32,
    pub tags: Vec<Html>,
    pub content: Html,
    pub related: Vec<PostCard>,
}

impl PostPage {
    pub fn new(post: &Post, related: &[Post]) -> PostPage {
        PostPage {
            category_slug: post.category.clone(),
            category: Html::text(&post.category),
            title: Html::text(&post.title),
            excerpt: Html::text(&post.excerpt),
            date: format_date(&post.date),
            read_time: post.read_time,
            tags: post.tags.iter().map(Html::text).collect(),
            content: Html::trusted(&post.content),
            related: cards(related),
        }
    }
}

impl Display for PostPage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            concat!(
                r#"<article class="post-full"><header class="post-header">"#,
                r#"<div class="breadcrumb"><a href="/" data-link>Home</a> / <a href="/blog" data-link>Blog</a> / "#,
                r#"<a href="/blog/{category_slug}" data-link>{category}</a> / {title}</div>"#,
                "<h1>{title}</h1>",
                r#"<p class="meta">{date} &middot; {read_time} min read &middot; "#,
                r#"<span class="category-tag" data-category="{category}">{category}</span></p>"#,
            ),
            category_slug = EscapeHref(&self.category_slug),
            category = self.category,
            title = self.title,
            date = EscapeHtml(&self.date),
            read_time = self.read_time,
        )?;
        if !self.tags.is_empty() {
            f.write_str(r#"<div class="tags">"#)?;
            for tag in &self.tags {
                write!(f, r#"<span class="tag">{}</span>"#, tag)?;
            }
            f.write_str("</div>")?;
        }
        write!(f, r#"</header><div class="post-content">{}</div>"#, self.content)?;
        if !self.related.is_empty() {
            write!(
                f,
                r#"<section class="related-posts"><h2>Related Articles</h2>{}</section>"#,
                PostGrid(&self.related)
            )?;
        }
        f.write_str("</article>")
    }
}

/// The failure view. The message is always escaped.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorPage {
    pub message: Html,
}

impl ErrorPage {
    pub fn new<S: Into<String>>(message: S) -> ErrorPage {
        ErrorPage {
            message: Html::Text(message.into()),
        }
    }
}

impl Display for ErrorPage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            r#"<div class="error-container"><h2>Something went wrong</h2><p>{}</p><a href="/" data-link class="btn">Go Home</a></div>"#,
            self.message
        )
    }
}

/// Everything the content region can show.
#[derive(Clone, Debug, PartialEq)]
pub enum Page {
    Loading,
    Home(HomePage),
    About(Site),
    Contact(Site),
    BlogList(BlogListPage),
    Category(CategoryPage),
    Post(PostPage),
    NotFound,
    Error(ErrorPage),
}

impl Page {
    /// The page title, if the page has its own. The document title is built
    /// from this and the site title.
    pub fn title(&self) -> Option<String> {
        match self {
            Page::Loading | Page::Home(_) => None,
            Page::About(_) => Some("About".to_owned()),
            Page::Contact(_) => Some("Contact".to_owned()),
            Page::BlogList(_) => Some("Blog".to_owned()),
            Page::Category(page) => Some(page.name.as_str().to_owned()),
            Page::Post(page) => Some(page.title.as_str().to_owned()),
            Page::NotFound => Some("Page Not Found".to_owned()),
            Page::Error(_) => Some("Error".to_owned()),
        }
    }

    /// The meta description, if the page supplies one.
    pub fn description(&self) -> Option<String> {
        match self {
            Page::Home(page) => Some(page.tagline.as_str().to_owned()),
            Page::About(site) => Some(format!("About {}", site.title)),
            Page::BlogList(page) => Some(format!("Browse all {} articles", page.total_posts)),
            Page::Category(page) => Some(page.description.as_str().to_owned()),
            Page::Post(page) => Some(page.excerpt.as_str().to_owned()),
            Page::Loading | Page::Contact(_) | Page::NotFound | Page::Error(_) => None,
        }
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Page::Loading => f.write_str(
                r#"<div class="loading-container"><div class="spinner"></div><p>Loading...</p></div>"#,
            ),
            Page::Home(page) => page.fmt(f),
            Page::About(site) => write!(
                f,
                concat!(
                    r#"<div class="page-header"><div class="breadcrumb"><a href="/" data-link>Home</a> / About</div><h1>About</h1></div>"#,
                    r#"<div class="content-page"><p>Welcome to {title}, a collection of practical articles on modern web development.</p>"#,
                    "<h2>What We Cover</h2><p>{description}.</p>",
                    "<p>Every article comes with working examples you can take into your own projects.</p></div>",
                ),
                title = EscapeHtml(&site.title),
                description = EscapeHtml(&site.description),
            ),
            Page::Contact(site) => write!(
                f,
                concat!(
                    r#"<div class="page-header"><div class="breadcrumb"><a href="/" data-link>Home</a> / Contact</div><h1>Contact</h1></div>"#,
                    r#"<div class="content-page"><p>Questions, corrections, or article ideas for {title}? We'd like to hear them.</p>"#,
                    "<h2>Contributing</h2><p>We're always looking for developers who want to share what they know. Get in touch with an outline.</p></div>",
                ),
                title = EscapeHtml(&site.title),
            ),
            Page::BlogList(page) => page.fmt(f),
            Page::Category(page) => page.fmt(f),
            Page::Post(page) => page.fmt(f),
            Page::NotFound => f.write_str(concat!(
                r#"<div class="error-page"><h1>404</h1><p>Page not found</p>"#,
                "<p>The page you're looking for doesn't exist or has been moved.</p>",
                r#"<a href="/" data-link class="btn">Go Home</a></div>"#,
            )),
            Page::Error(page) => page.fmt(f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn post(i: usize) -> Post {
        Post {
            slug: format!("post-{}", i),
            title: format!("Post {}", i),
            category: "javascript".to_owned(),
            excerpt: format!("Excerpt {}", i),
            date: "2024-03-05".to_owned(),
            read_time: 4,
            tags: Vec::new(),
            content: String::new(),
            related_posts: Vec::new(),
        }
    }

    fn posts(n: usize) -> Vec<Post> {
        (0..n).map(post).collect()
    }

    fn category() -> Category {
        Category {
            slug: "javascript".to_owned(),
            name: "Java<Script>".to_owned(),
            description: "Tips & tricks".to_owned(),
            color: "#f7df1e".to_owned(),
        }
    }

    #[test]
    fn test_blog_list_second_page() {
        let page = BlogListPage::new(&posts(14), 2, DEFAULT_PAGE_SIZE);
        assert_eq!(2, page.posts.len());
        assert_eq!("post-12", page.posts[0].slug);

        let links = page.pagination.links();
        assert_eq!(2, links.len());
        assert!(!links[0].active);
        assert!(links[1].active);
        assert_eq!("/blog", links[0].href);
        assert_eq!("/blog?page=2", links[1].href);

        let html = page.to_string();
        assert!(html.contains("<p>14 articles</p>"));
        assert!(html.contains(r#"<a href="/blog?page=2" data-link class="page-link active">2</a>"#));
        assert!(html.contains(r#"<a href="/blog" data-link class="page-link">1</a>"#));
        assert_eq!(2, html.matches(r#"class="post-card""#).count());
    }

    #[test]
    fn test_single_page_has_no_pagination() {
        let page = BlogListPage::new(&posts(12), 1, DEFAULT_PAGE_SIZE);
        assert_eq!(1, page.pagination.total_pages);
        assert_eq!("", page.pagination.to_string());
        assert!(!page.to_string().contains("pagination"));
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = BlogListPage::new(&posts(3), 9, DEFAULT_PAGE_SIZE);
        assert!(page.posts.is_empty());
        assert_eq!(3, page.total_posts);
    }

    #[test]
    fn test_pagination_page_count() {
        assert_eq!(0, Pagination::new(0, 12, 1, "/blog").total_pages);
        assert_eq!(1, Pagination::new(12, 12, 1, "/blog").total_pages);
        assert_eq!(2, Pagination::new(13, 12, 1, "/blog").total_pages);
        assert_eq!(3, Pagination::new(3, 1, 1, "/blog").total_pages);
    }

    #[test]
    fn test_post_card_escapes_text() {
        let mut p = post(1);
        p.title = "<img src=x onerror=alert(1)>".to_owned();
        p.excerpt = "\"quoted\" & more".to_owned();
        let html = PostCard::from(&p).to_string();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("&quot;quoted&quot; &amp; more"));
        assert!(html.contains(r#"href="/blog/post-1""#));
        assert!(html.contains("March 5, 2024 &middot; 4 min read"));
    }

    #[test]
    fn test_post_page_content_is_trusted() {
        let mut p = post(1);
        p.title = "<b>Title</b>".to_owned();
        p.content = "<h2>Intro</h2><p>Body</p>".to_owned();
        p.tags = vec!["<tag>".to_owned()];
        let html = PostPage::new(&p, &[]).to_string();
        assert!(html.contains(r#"<div class="post-content"><h2>Intro</h2><p>Body</p></div>"#));
        assert!(html.contains("<h1>&lt;b&gt;Title&lt;/b&gt;</h1>"));
        assert!(html.contains(r#"<span class="tag">&lt;tag&gt;</span>"#));
        assert!(!html.contains("related-posts"));
    }

    #[test]
    fn test_post_page_related_section() {
        let html = PostPage::new(&post(1), &posts(2)).to_string();
        assert!(html.contains("Related Articles"));
        assert_eq!(2, html.matches(r#"class="post-card""#).count());
        assert!(!html.contains(r#"class="tags""#));
    }

    #[test]
    fn test_category_page() {
        let html = CategoryPage::new(&category(), &posts(3)).to_string();
        assert!(html.contains("<h1>Java&lt;Script&gt;</h1>"));
        assert!(html.contains("<p>Tips &amp; tricks</p>"));
        assert_eq!(3, html.matches(r#"class="post-card""#).count());
    }

    #[test]
    fn test_home_page_limits_recent_posts() {
        let page = HomePage::new(&Site::default(), &posts(10), &[category()], DEFAULT_RECENT_POSTS);
        assert_eq!(6, page.posts.len());
        let html = page.to_string();
        assert!(html.contains(r#"<a href="/blog/javascript" data-link class="category-card""#));
        assert!(html.contains("<h1>Tech Blog</h1>"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = Page::Error(ErrorPage::new("Failed to fetch <x>: 500")).to_string();
        assert!(html.contains("<p>Failed to fetch &lt;x&gt;: 500</p>"));
    }

    #[test]
    fn test_page_metadata() {
        let p = post(3);
        let page = Page::Post(PostPage::new(&p, &[]));
        assert_eq!(Some("Post 3".to_owned()), page.title());
        assert_eq!(Some("Excerpt 3".to_owned()), page.description());
        assert_eq!(Some("Page Not Found".to_owned()), Page::NotFound.title());
        assert_eq!(None, Page::NotFound.description());
        assert_eq!(None, Page::Home(HomePage::new(&Site::default(), &[], &[], 6)).title());
    }

    #[test]
    fn test_static_pages_use_site_title() {
        let site = Site {
            title: "A & B".to_owned(),
            description: "Things".to_owned(),
        };
        assert!(Page::About(site.clone()).to_string().contains("Welcome to A &amp; B"));
        assert!(Page::Contact(site).to_string().contains("for A &amp; B?"));
    }
}
