//! New-article composition.
//!
//! Authenticated POST of `{title, body}` with the session's bearer
//! token. The view renders either a success banner or the server's
//! rejection message; the two are mutually exclusive.

use composition_api::{BlogApi, CreatedArticle, NewArticleRequest};
use composition_core::effect::Effect;
use composition_core::reducer::Reducer;
use composition_core::{Effects, smallvec};
use serde::{Deserialize, Serialize};

use crate::environment::ArticlesEnvironment;

/// Banner text shown after a successful submission.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Successfully added article!";

/// Composition form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeState {
    /// Success banner text, set after the server accepts the article.
    pub success: Option<String>,

    /// Rejection message from the server.
    pub error: Option<String>,
}

/// Composition action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComposeAction {
    /// The form was submitted.
    Submitted {
        /// Article title.
        title: String,
        /// Article body.
        body: String,
        /// Bearer token of the signed-in session.
        token: String,
    },

    /// The server accepted the article.
    Accepted {
        /// The created article as echoed by the server.
        article: CreatedArticle,
    },

    /// The server rejected the submission.
    Rejected {
        /// Message to surface next to the form.
        message: String,
    },
}

/// Reducer for the composition form.
#[derive(Debug, Clone, Copy)]
pub struct ComposeReducer<A> {
    _phantom: std::marker::PhantomData<A>,
}

impl<A> ComposeReducer<A> {
    /// Create a new compose reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A> Default for ComposeReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Reducer for ComposeReducer<A>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    type State = ComposeState;
    type Action = ComposeAction;
    type Environment = ArticlesEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            ComposeAction::Submitted { title, body, token } => {
                state.success = None;
                state.error = None;
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let request = NewArticleRequest { title, body };
                    Some(match api.create_article(&token, &request).await {
                        Ok(article) => ComposeAction::Accepted { article },
                        Err(error) => ComposeAction::Rejected {
                            message: error.message().to_string(),
                        },
                    })
                })]
            },

            ComposeAction::Accepted { article } => {
                tracing::debug!(id = article.id, "Article created");
                state.success = Some(SUBMIT_SUCCESS_MESSAGE.to_string());
                state.error = None;
                smallvec![]
            },

            ComposeAction::Rejected { message } => {
                state.error = Some(message);
                state.success = None;
                smallvec![]
            },
        }
    }
}
