//! Wires navigation signals to a render callback. The platform's session
//! history sits behind the [`History`] trait; [`MemoryHistory`] is the
//! in-process implementation used by the CLI and tests.
//!
//! [`HistoryIntegrator::install`] renders the current location once, then
//! [`HistoryIntegrator::handle`] turns back/forward signals and clicks on
//! in-app links into further renders.

/// The platform's session history.
pub trait History {
    /// The current location, path plus query (e.g. `/blog?page=2`).
    fn location(&self) -> String;

    /// Adds an entry for `location` and makes it current.
    fn push(&mut self, location: &str);

    fn scroll_to_top(&mut self);
}

/// A link activation. `client_side` is set when the anchor carries the
/// `data-link` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub client_side: bool,
}

impl Link {
    pub fn client_side<S: Into<String>>(href: S) -> Link {
        Link {
            href: href.into(),
            client_side: true,
        }
    }

    pub fn external<S: Into<String>>(href: S) -> Link {
        Link {
            href: href.into(),
            client_side: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEvent {
    /// The current entry changed through back/forward.
    PopState,

    Click(Link),
}

/// What happened to an event's default action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The default was prevented and the router took over.
    Handled,

    /// The platform should carry on as usual (e.g. a full page load).
    PassThrough,
}

/// Moves to `location` unless it is already current: pushes a history
/// entry, calls `on_navigate`, and scrolls to the top. Returns whether it
/// navigated.
pub fn navigate<H, F>(history: &mut H, location: &str, on_navigate: &mut F) -> bool
where
    H: History,
    F: FnMut(&str),
{
    if history.location() == location {
        return false;
    }
    history.push(location);
    on_navigate(location);
    history.scroll_to_top();
    true
}

pub struct HistoryIntegrator<H, F> {
    history: H,
    on_navigate: F,
}

impl<H: History, F: FnMut(&str)> HistoryIntegrator<H, F> {
    /// Takes over navigation for `history` and immediately calls
    /// `on_navigate` with the current location.
    pub fn install(history: H, on_navigate: F) -> Self {
        let mut integrator = HistoryIntegrator {
            history,
            on_navigate,
        };
        let location = integrator.history.location();
        (integrator.on_navigate)(&location);
        integrator
    }

    pub fn handle(&mut self, event: NavEvent) -> Outcome {
        match event {
            NavEvent::PopState => {
                let location = self.history.location();
                (self.on_navigate)(&location);
                Outcome::Handled
            }
            NavEvent::Click(link) => match link.client_side {
                true => {
                    self.navigate(&link.href);
                    Outcome::Handled
                }
                false => Outcome::PassThrough,
            },
        }
    }

    /// See [`navigate`].
    pub fn navigate(&mut self, location: &str) -> bool {
        navigate(&mut self.history, location, &mut self.on_navigate)
    }

    pub fn history(&self) -> &H {
        &self.history
    }
}

impl<F: FnMut(&str)> HistoryIntegrator<MemoryHistory, F> {
    /// Steps back one entry and, if that moved, delivers the pop signal.
    pub fn back(&mut self) -> bool {
        let moved = self.history.back();
        if moved {
            self.handle(NavEvent::PopState);
        }
        moved
    }

    /// Steps forward one entry and, if that moved, delivers the pop signal.
    pub fn forward(&mut self) -> bool {
        let moved = self.history.forward();
        if moved {
            self.handle(NavEvent::PopState);
        }
        moved
    }
}

/// A session history kept in memory. Pushing drops any forward entries,
/// the way browsers do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<String>,
    current: usize,
    scroll_resets: usize,
}

impl MemoryHistory {
    pub fn new<S: Into<String>>(initial: S) -> MemoryHistory {
        MemoryHistory {
            entries: vec![initial.into()],
            current: 0,
            scroll_resets: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    pub fn back(&mut self) -> bool {
        match self.current {
            0 => false,
            _ => {
                self.current -= 1;
                true
            }
        }
    }

    pub fn forward(&mut self) -> bool {
        match self.current + 1 < self.entries.len() {
            true => {
                self.current += 1;
                true
            }
            false => false,
        }
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.entries[self.current].clone()
    }

    fn push(&mut self, location: &str) {
        self.entries.truncate(self.current + 1);
        self.entries.push(location.to_owned());
        self.current = self.entries.len() - 1;
    }

    fn scroll_to_top(&mut self) {
        self.scroll_resets += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl FnMut(&str)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |location: &str| sink.borrow_mut().push(location.to_owned()))
    }

    #[test]
    fn test_install_renders_current_location() {
        let (seen, on_navigate) = recorder();
        let integrator = HistoryIntegrator::install(MemoryHistory::new("/about"), on_navigate);
        assert_eq!(vec!["/about"], *seen.borrow());
        assert_eq!(1, integrator.history().entries().len());
    }

    #[test]
    fn test_navigate_twice_to_same_location() {
        let (seen, on_navigate) = recorder();
        let mut integrator = HistoryIntegrator::install(MemoryHistory::new("/"), on_navigate);
        assert!(integrator.navigate("/blog"));
        assert!(!integrator.navigate("/blog"));

        assert_eq!(&["/".to_owned(), "/blog".to_owned()], integrator.history().entries());
        assert_eq!(vec!["/", "/blog"], *seen.borrow());
        assert_eq!(1, integrator.history().scroll_resets());
    }

    #[test]
    fn test_navigate_to_current_location_is_noop() {
        let (seen, on_navigate) = recorder();
        let mut integrator = HistoryIntegrator::install(MemoryHistory::new("/"), on_navigate);
        assert!(!integrator.navigate("/"));
        assert_eq!(1, seen.borrow().len());
        assert_eq!(0, integrator.history().scroll_resets());
    }

    #[test]
    fn test_query_is_part_of_the_location() {
        let (seen, on_navigate) = recorder();
        let mut integrator = HistoryIntegrator::install(MemoryHistory::new("/blog"), on_navigate);
        assert!(integrator.navigate("/blog?page=2"));
        assert!(!integrator.navigate("/blog?page=2"));
        assert_eq!(vec!["/blog", "/blog?page=2"], *seen.borrow());
    }

    #[test]
    fn test_client_side_click_is_intercepted() {
        let (seen, on_navigate) = recorder();
        let mut integrator = HistoryIntegrator::install(MemoryHistory::new("/"), on_navigate);
        let outcome = integrator.handle(NavEvent::Click(Link::client_side("/contact")));
        assert_eq!(Outcome::Handled, outcome);
        assert_eq!("/contact", integrator.history().location());
        assert_eq!(vec!["/", "/contact"], *seen.borrow());
    }

    #[test]
    fn test_plain_click_passes_through() {
        let (seen, on_navigate) = recorder();
        let mut integrator = HistoryIntegrator::install(MemoryHistory::new("/"), on_navigate);
        let outcome = integrator.handle(NavEvent::Click(Link::external("https://example.com/")));
        assert_eq!(Outcome::PassThrough, outcome);
        assert_eq!("/", integrator.history().location());
        assert_eq!(1, seen.borrow().len());
    }

    #[test]
    fn test_back_and_forward_render_without_pushing() {
        let (seen, on_navigate) = recorder();
        let mut integrator = HistoryIntegrator::install(MemoryHistory::new("/"), on_navigate);
        integrator.navigate("/blog");
        integrator.navigate("/about");

        assert!(integrator.back());
        assert_eq!("/blog", integrator.history().location());
        assert!(integrator.forward());
        assert!(!integrator.forward());
        assert_eq!(3, integrator.history().entries().len());
        assert_eq!(vec!["/", "/blog", "/about", "/blog", "/about"], *seen.borrow());
    }

    #[test]
    fn test_push_after_back_drops_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push("/a");
        history.push("/b");
        assert!(history.back());
        history.push("/c");
        assert_eq!(&["/".to_owned(), "/a".to_owned(), "/c".to_owned()], history.entries());
        assert!(!history.forward());
    }
}
