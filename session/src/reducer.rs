//! Session reducer.
//!
//! Pure transition table over [`SessionAction`]:
//!
//! | Action | Effect on state |
//! |---|---|
//! | `SigninSubmitted` / `SignupSubmitted` | `is_fetching := true`, one request effect |
//! | `*Succeeded(token)` | `is_fetching := false; is_logged_in := true; token := t` |
//! | `*Failed` (server rejection) | `is_fetching := false; is_logged_in := false` |
//! | `*Failed` (transport) | state unchanged beyond the requested marker |
//! | `SignedOut` | `is_logged_in := false; token := ""` |
//!
//! Token persistence is a side effect of the calling flow, not of this
//! reducer.

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::state::SessionState;
use crate::token::decode_claims;
use composition_api::{BlogApi, SigninRequest, SignupRequest};
use composition_core::effect::Effect;
use composition_core::reducer::Reducer;
use composition_core::{Effects, smallvec};

/// Reducer for the session state machine.
///
/// Generic over the API client type carried by the environment.
#[derive(Debug, Clone, Copy)]
pub struct SessionReducer<A> {
    _phantom: std::marker::PhantomData<A>,
}

impl<A> SessionReducer<A> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A> Default for SessionReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold a settled authentication response into state.
///
/// Shared by the sign-in and sign-up arms; their transitions are
/// identical.
fn apply_settled(state: &mut SessionState, result: Result<&str, &composition_api::ApiError>) {
    match result {
        Ok(token) => {
            state.is_fetching = false;
            state.is_logged_in = true;
            state.token = token.to_string();
            state.username = match decode_claims(token) {
                Ok(claims) => claims.username,
                Err(e) => {
                    tracing::warn!(error = %e, "Token from server failed to decode");
                    String::new()
                },
            };
        },
        Err(error) if error.is_transport() => {
            // No response was obtained; the requested marker stands and
            // the caller surfaces the failure locally.
            tracing::debug!(error = %error, "Transport failure, session state unchanged");
        },
        Err(error) => {
            tracing::debug!(error = %error, "Authentication rejected");
            state.is_fetching = false;
            state.is_logged_in = false;
        },
    }
}

impl<A> Reducer for SessionReducer<A>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            SessionAction::SigninSubmitted { username, password } => {
                state.is_fetching = true;
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let request = SigninRequest { username, password };
                    Some(match api.signin(&request).await {
                        Ok(response) => SessionAction::SigninSucceeded {
                            token: response.token,
                        },
                        Err(error) => SessionAction::SigninFailed { error },
                    })
                })]
            },

            SessionAction::SignupSubmitted {
                username,
                email,
                password,
                password_confirm,
            } => {
                state.is_fetching = true;
                let api = env.api.clone();
                smallvec![Effect::future(async move {
                    let request = SignupRequest {
                        username,
                        email,
                        password,
                        password_confirm,
                    };
                    Some(match api.signup(&request).await {
                        Ok(response) => SessionAction::SignupSucceeded {
                            token: response.token,
                        },
                        Err(error) => SessionAction::SignupFailed { error },
                    })
                })]
            },

            SessionAction::SigninSucceeded { token }
            | SessionAction::SignupSucceeded { token } => {
                apply_settled(state, Ok(&token));
                smallvec![]
            },

            SessionAction::SigninFailed { error } | SessionAction::SignupFailed { error } => {
                apply_settled(state, Err(&error));
                smallvec![]
            },

            SessionAction::SignedOut => {
                state.is_logged_in = false;
                state.token.clear();
                smallvec![]
            },
        }
    }
}
