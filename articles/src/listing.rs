//! Paginated preview listing controller.
//!
//! The listing is a state machine over `{previews, page, error}`. The
//! page number comes from the route's query string; navigating re-derives
//! it and triggers a fetch when it changed. Every fetch effect carries
//! the page it was issued for, and its completion action is applied only
//! if that page is still the current one. This is the one place the
//! client needs real race protection: rapid Previous/Next navigation can
//! leave an older page's response arriving after a newer page's.

use std::sync::LazyLock;

use composition_api::{ApiError, ArticlePreview, BlogApi};
use composition_core::effect::Effect;
use composition_core::reducer::Reducer;
use composition_core::{Effects, smallvec};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::environment::ArticlesEnvironment;

/// Number of previews the server returns per full page.
pub const PAGE_SIZE: usize = 10;

static PAGE_PARAM: LazyLock<Regex> = LazyLock::new(compile_page_param);

#[allow(clippy::unwrap_used)] // Literal pattern, cannot fail
fn compile_page_param() -> Regex {
    Regex::new(r"(?i)page=(\d+)").unwrap()
}

/// Derive the 1-based page number from a URL query string.
///
/// Absent, non-numeric, out-of-range, and zero values all fall back to
/// page 1.
#[must_use]
pub fn parse_page_number(query: &str) -> u32 {
    PAGE_PARAM
        .captures(query)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Listing state.
///
/// Invariant: `page >= 1`, and `previews` reflects only the most recently
/// completed fetch for the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingState {
    /// Previews from the last completed load, in server order.
    pub previews: Vec<ArticlePreview>,

    /// Current 1-based page.
    pub page: u32,

    /// Message from the last failed load, cleared on success.
    pub error: Option<String>,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            previews: Vec::new(),
            page: 1,
            error: None,
        }
    }
}

impl ListingState {
    /// `true` when the "Previous" affordance should be shown.
    #[must_use]
    pub const fn show_previous(&self) -> bool {
        self.page > 1
    }

    /// `true` when the "Next" affordance should be shown.
    ///
    /// A full page of results is taken to mean more pages may exist.
    /// When the total count is an exact multiple of the page size this
    /// over-shows by one page; that inexactness is deliberate and
    /// matched to the server contract, which returns no total count.
    #[must_use]
    pub fn show_next(&self) -> bool {
        self.previews.len() == PAGE_SIZE
    }
}

/// Listing action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingAction {
    /// The listing view appeared with the given route query string.
    /// Always fetches.
    Mounted {
        /// Raw query string, e.g. `?page=2`.
        query: String,
    },

    /// The route's query string changed while the listing is shown.
    /// Fetches only when the derived page differs from the current one.
    LocationChanged {
        /// Raw query string after the navigation.
        query: String,
    },

    /// A page fetch settled successfully.
    PreviewsLoaded {
        /// Page the fetch was issued for.
        page: u32,
        /// Previews returned by the server.
        previews: Vec<ArticlePreview>,
    },

    /// A page fetch settled with a failure.
    LoadFailed {
        /// Page the fetch was issued for.
        page: u32,
        /// Message to surface next to the listing.
        message: String,
    },
}

/// Reducer for the paginated listing.
#[derive(Debug, Clone, Copy)]
pub struct ListingReducer<A> {
    _phantom: std::marker::PhantomData<A>,
}

impl<A> ListingReducer<A> {
    /// Create a new listing reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A> Default for ListingReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Issue the fetch for one page, tagged with that page.
fn fetch_page<A>(api: A, page: u32) -> Effect<ListingAction>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    Effect::future(async move {
        Some(match api.article_previews(page).await {
            Ok(previews) => ListingAction::PreviewsLoaded { page, previews },
            Err(error) => ListingAction::LoadFailed {
                page,
                message: listing_message(&error),
            },
        })
    })
}

/// Both application errors and transport failures render inline next to
/// the listing, so they collapse to one message string here.
fn listing_message(error: &ApiError) -> String {
    error.message().to_string()
}

impl<A> Reducer for ListingReducer<A>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    type State = ListingState;
    type Action = ListingAction;
    type Environment = ArticlesEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            ListingAction::Mounted { query } => {
                state.page = parse_page_number(&query);
                smallvec![fetch_page(env.api.clone(), state.page)]
            },

            ListingAction::LocationChanged { query } => {
                let page = parse_page_number(&query);
                if page == state.page {
                    return smallvec![];
                }
                state.page = page;
                smallvec![fetch_page(env.api.clone(), page)]
            },

            ListingAction::PreviewsLoaded { page, previews } => {
                if page != state.page {
                    tracing::debug!(page, current = state.page, "Discarding stale page load");
                    return smallvec![];
                }
                state.previews = previews;
                state.error = None;
                smallvec![]
            },

            ListingAction::LoadFailed { page, message } => {
                if page != state.page {
                    tracing::debug!(page, current = state.page, "Discarding stale page failure");
                    return smallvec![];
                }
                // Stale list stays visible under the error banner.
                state.error = Some(message);
                smallvec![]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use composition_api::mocks::{MockApi, sample_previews};
    use composition_testing::{ReducerTest, assertions};
    use proptest::prelude::*;

    fn test_env() -> ArticlesEnvironment<MockApi> {
        ArticlesEnvironment::new(MockApi::new())
    }

    #[test]
    fn page_number_derivation() {
        assert_eq!(parse_page_number("?page=3"), 3);
        assert_eq!(parse_page_number("?foo=bar&PAGE=12"), 12);
        assert_eq!(parse_page_number(""), 1);
        assert_eq!(parse_page_number("?page=abc"), 1);
        assert_eq!(parse_page_number("?page=0"), 1);
        assert_eq!(parse_page_number("?page=99999999999999999999"), 1);
    }

    #[test]
    fn mount_derives_page_and_fetches() {
        ReducerTest::new(ListingReducer::new())
            .with_env(test_env())
            .given_state(ListingState::default())
            .when_action(ListingAction::Mounted {
                query: "?page=2".into(),
            })
            .then_state(|state| assert_eq!(state.page, 2))
            .then_effects(assertions::assert_single_request)
            .run();
    }

    #[test]
    fn navigation_to_same_page_does_not_refetch() {
        ReducerTest::new(ListingReducer::new())
            .with_env(test_env())
            .given_state(ListingState {
                page: 2,
                ..ListingState::default()
            })
            .when_action(ListingAction::LocationChanged {
                query: "?page=2".into(),
            })
            .then_state(|state| assert_eq!(state.page, 2))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn navigation_to_new_page_fetches() {
        ReducerTest::new(ListingReducer::new())
            .with_env(test_env())
            .given_state(ListingState {
                page: 2,
                ..ListingState::default()
            })
            .when_action(ListingAction::LocationChanged {
                query: "?page=1".into(),
            })
            .then_state(|state| assert_eq!(state.page, 1))
            .then_effects(assertions::assert_single_request)
            .run();
    }

    #[test]
    fn load_replaces_previews_and_clears_error() {
        ReducerTest::new(ListingReducer::new())
            .with_env(test_env())
            .given_state(ListingState {
                page: 1,
                error: Some("boom".into()),
                ..ListingState::default()
            })
            .when_action(ListingAction::PreviewsLoaded {
                page: 1,
                previews: sample_previews(3),
            })
            .then_state(|state| {
                assert_eq!(state.previews.len(), 3);
                assert_eq!(state.error, None);
            })
            .run();
    }

    #[test]
    fn stale_load_is_discarded() {
        let current = sample_previews(2);
        let expected = current.clone();

        ReducerTest::new(ListingReducer::new())
            .with_env(test_env())
            .given_state(ListingState {
                previews: current,
                page: 1,
                error: None,
            })
            .when_action(ListingAction::PreviewsLoaded {
                page: 2,
                previews: sample_previews(10),
            })
            .then_state(move |state| {
                assert_eq!(state.previews, expected);
                assert_eq!(state.page, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failure_keeps_stale_list_and_sets_error() {
        let current = sample_previews(10);
        let expected = current.clone();

        ReducerTest::new(ListingReducer::new())
            .with_env(test_env())
            .given_state(ListingState {
                previews: current,
                page: 3,
                error: None,
            })
            .when_action(ListingAction::LoadFailed {
                page: 3,
                message: "database unavailable".into(),
            })
            .then_state(move |state| {
                assert_eq!(state.previews, expected);
                assert_eq!(state.error.as_deref(), Some("database unavailable"));
            })
            .run();
    }

    #[test]
    fn stale_failure_is_discarded() {
        ReducerTest::new(ListingReducer::new())
            .with_env(test_env())
            .given_state(ListingState {
                page: 1,
                ..ListingState::default()
            })
            .when_action(ListingAction::LoadFailed {
                page: 2,
                message: "boom".into(),
            })
            .then_state(|state| assert_eq!(state.error, None))
            .run();
    }

    #[test]
    fn affordances_follow_page_and_count() {
        let mut state = ListingState::default();
        assert!(!state.show_previous());
        assert!(!state.show_next());

        state.previews = sample_previews(PAGE_SIZE);
        assert!(state.show_next());

        state.page = 2;
        state.previews = sample_previews(3);
        assert!(state.show_previous());
        assert!(!state.show_next());
    }

    proptest! {
        /// Any query string derives a page of at least 1.
        #[test]
        fn derived_page_is_always_positive(query in ".{0,40}") {
            prop_assert!(parse_page_number(&query) >= 1);
        }

        /// Numeric page parameters come through verbatim.
        #[test]
        fn numeric_pages_round_trip(page in 1u32..100_000) {
            prop_assert_eq!(parse_page_number(&format!("?page={page}")), page);
        }
    }
}
