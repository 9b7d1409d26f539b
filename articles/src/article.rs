//! Single-article view.
//!
//! One GET per open. Unlike the listing there is no stale guard: the
//! view fetches once when opened and is torn down before it can be
//! opened for a different article.

use composition_api::{Article, BlogApi};
use composition_core::effect::Effect;
use composition_core::reducer::Reducer;
use composition_core::{Effects, smallvec};
use serde::{Deserialize, Serialize};

use crate::environment::ArticlesEnvironment;

/// Single-article view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleViewState {
    /// The loaded article, absent until the fetch settles.
    pub article: Option<Article>,

    /// Message from a failed fetch.
    pub error: Option<String>,
}

/// Single-article view action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleAction {
    /// The view opened for the given article id.
    Opened {
        /// Article identifier from the route.
        id: i64,
    },

    /// The fetch settled successfully.
    Loaded {
        /// The fetched article.
        article: Article,
    },

    /// The fetch settled with a failure.
    LoadFailed {
        /// Message to surface in place of the article.
        message: String,
    },
}

/// Reducer for the single-article view.
#[derive(Debug, Clone, Copy)]
pub struct ArticleReducer<A> {
    _phantom: std::marker::PhantomData<A>,
}

impl<A> ArticleReducer<A> {
    /// Create a new article reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A> Default for ArticleReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Reducer for ArticleReducer<A>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    type State = ArticleViewState;
    type Action = ArticleAction;
    type Environment = ArticlesEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            ArticleAction::Opened { id } => {
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    Some(match api.article(id).await {
                        Ok(article) => ArticleAction::Loaded { article },
                        Err(error) => ArticleAction::LoadFailed {
                            message: error.message().to_string(),
                        },
                    })
                })]
            },

            ArticleAction::Loaded { article } => {
                state.article = Some(article);
                state.error = None;
                smallvec![]
            },

            ArticleAction::LoadFailed { message } => {
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
    use chrono::{TimeZone, Utc};
    use composition_api::mocks::MockApi;
    use composition_testing::{ReducerTest, assertions};

    fn test_env() -> ArticlesEnvironment<MockApi> {
        ArticlesEnvironment::new(MockApi::new())
    }

    fn sample_article() -> Article {
        Article {
            id: 7,
            title: "Hello".into(),
            body: "Body text".into(),
            username: "alice".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn open_issues_one_fetch() {
        ReducerTest::new(ArticleReducer::new())
            .with_env(test_env())
            .given_state(ArticleViewState::default())
            .when_action(ArticleAction::Opened { id: 7 })
            .then_state(|state| assert_eq!(state.article, None))
            .then_effects(assertions::assert_single_request)
            .run();
    }

    #[test]
    fn loaded_article_replaces_error() {
        ReducerTest::new(ArticleReducer::new())
            .with_env(test_env())
            .given_state(ArticleViewState {
                article: None,
                error: Some("earlier failure".into()),
            })
            .when_action(ArticleAction::Loaded {
                article: sample_article(),
            })
            .then_state(|state| {
                assert_eq!(state.article.as_ref().map(|a| a.id), Some(7));
                assert_eq!(state.error, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failure_sets_error() {
        ReducerTest::new(ArticleReducer::new())
            .with_env(test_env())
            .given_state(ArticleViewState::default())
            .when_action(ArticleAction::LoadFailed {
                message: "article not found".into(),
            })
            .then_state(|state| {
                assert_eq!(state.error.as_deref(), Some("article not found"));
            })
            .run();
    }
}
