//! # Composition Articles
//!
//! Article features for the Composition client:
//!
//! - [`listing`]: the paginated preview listing controller. The page
//!   number is derived from the route's query string; every fetch is
//!   tagged with the page it was issued for, and a response for a page
//!   the user has since left is discarded.
//! - [`article`]: the single-article view, one GET per open.
//! - [`compose`]: authenticated new-article submission.
//!
//! Each feature is a pure reducer plus an action enum; HTTP requests run
//! as effects and settle back into completion actions.

pub mod article;
pub mod compose;
pub mod environment;
pub mod listing;

pub use article::{ArticleAction, ArticleReducer, ArticleViewState};
pub use compose::{ComposeAction, ComposeReducer, ComposeState};
pub use environment::ArticlesEnvironment;
pub use listing::{ListingAction, ListingReducer, ListingState, PAGE_SIZE};
