//! The library code for `skald`, a client-side blog engine over static JSON.
//! A navigation flows through four pieces:
//!
//! 1. The history integrator ([`crate::history`]) turns back/forward signals
//!    and clicks on in-app links into locations to render.
//! 2. The router ([`crate::route`]) resolves a location to a [`route::Route`]
//!    by trying an ordered table of patterns.
//! 3. The data accessor ([`crate::api`]) fetches the resources the route
//!    needs through a TTL cache ([`crate::cache`]) sitting in front of a
//!    [`source::DataSource`].
//! 4. The dispatcher ([`crate::dispatch`]) builds the view
//!    ([`crate::view`]) from that data and commits it to the document.
//!
//! The dispatcher is also where failures stop. An entity that doesn't exist
//! renders the not-found view; a retrieval that fails renders the error view.
//!
//! Everything runs on one thread. Renders are futures driven by a local
//! executor, and the cache is shared through `RefCell`s rather than locks.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod history;
pub mod layout;
pub mod markup;
pub mod post;
pub mod route;
pub mod source;
pub mod view;

#[cfg(test)]
mod testutil;
