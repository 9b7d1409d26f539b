//! Session flows.
//!
//! The request-response choreography around the session store: a flow
//! dispatches a command, waits for the matching completion action, and
//! handles token persistence. Reducers stay pure; everything with an
//! `await` on the outcome lives here.

use std::time::Duration;

use composition_api::{ApiError, BlogApi};
use composition_runtime::Store;

use crate::actions::SessionAction;
use crate::environment::SessionEnvironment;
use crate::error::SessionError;
use crate::reducer::SessionReducer;
use crate::state::SessionState;
use crate::token_store::TokenStore;

/// Store specialized to the session feature.
pub type SessionStore<A> =
    Store<SessionState, SessionAction, SessionEnvironment<A>, SessionReducer<A>>;

/// How long a sign-in or sign-up request may take before the flow gives
/// up waiting for its completion action.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the initial session state from the persisted token.
///
/// A stored token that no longer decodes is evicted so the next start
/// does not warn about it again.
///
/// # Errors
///
/// Returns an error if the token store cannot be read or the stale token
/// cannot be removed.
pub fn bootstrap(tokens: &impl TokenStore) -> Result<SessionState, SessionError> {
    let stored = tokens.load()?;
    let state = SessionState::from_persisted_token(stored.as_deref());

    if stored.is_some() && !state.is_logged_in {
        tokens.clear()?;
    }

    Ok(state)
}

/// Sign in and persist the issued token.
///
/// # Errors
///
/// - [`SessionError::Rejected`] if the server refused the credentials
/// - [`SessionError::Unreachable`] if no response was obtained
/// - [`SessionError::Store`] on store timeout or shutdown
/// - [`SessionError::TokenStore`] if the token cannot be persisted
pub async fn sign_in<A>(
    store: &SessionStore<A>,
    tokens: &impl TokenStore,
    username: &str,
    password: &str,
) -> Result<SessionState, SessionError>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    let command = SessionAction::SigninSubmitted {
        username: username.to_string(),
        password: password.to_string(),
    };

    let settled = store
        .send_and_wait_for(
            command,
            |a| {
                matches!(
                    a,
                    SessionAction::SigninSucceeded { .. } | SessionAction::SigninFailed { .. }
                )
            },
            AUTH_TIMEOUT,
        )
        .await?;

    match settled {
        SessionAction::SigninSucceeded { token } => {
            tokens.save(&token)?;
            tracing::info!("Signed in");
            Ok(store.state(Clone::clone).await)
        },
        SessionAction::SigninFailed { error } => Err(settle_failure(error)),
        // The predicate admits only the two matching terminals.
        _ => Err(composition_runtime::StoreError::ChannelClosed.into()),
    }
}

/// Sign up and persist the issued token.
///
/// The server signs the new user in as part of registration, so a
/// successful sign-up leaves the session logged in.
///
/// # Errors
///
/// Same failure modes as [`sign_in`].
pub async fn sign_up<A>(
    store: &SessionStore<A>,
    tokens: &impl TokenStore,
    username: &str,
    email: &str,
    password: &str,
    password_confirm: &str,
) -> Result<SessionState, SessionError>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    let command = SessionAction::SignupSubmitted {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        password_confirm: password_confirm.to_string(),
    };

    let settled = store
        .send_and_wait_for(
            command,
            |a| {
                matches!(
                    a,
                    SessionAction::SignupSucceeded { .. } | SessionAction::SignupFailed { .. }
                )
            },
            AUTH_TIMEOUT,
        )
        .await?;

    match settled {
        SessionAction::SignupSucceeded { token } => {
            tokens.save(&token)?;
            tracing::info!("Signed up");
            Ok(store.state(Clone::clone).await)
        },
        SessionAction::SignupFailed { error } => Err(settle_failure(error)),
        // The predicate admits only the two matching terminals.
        _ => Err(composition_runtime::StoreError::ChannelClosed.into()),
    }
}

/// Sign out: clear the session and evict the persisted token.
///
/// Signing out twice is harmless.
///
/// # Errors
///
/// Returns an error if the store is shutting down or the persisted token
/// cannot be removed.
pub async fn sign_out<A>(
    store: &SessionStore<A>,
    tokens: &impl TokenStore,
) -> Result<(), SessionError>
where
    A: BlogApi + Clone + Send + Sync + 'static,
{
    store.send(SessionAction::SignedOut).await?;
    tokens.clear()?;
    tracing::info!("Signed out");
    Ok(())
}

fn settle_failure(error: ApiError) -> SessionError {
    match error {
        ApiError::Api { message, .. } => SessionError::Rejected(message),
        ApiError::Transport(message) => SessionError::Unreachable(message),
    }
}
