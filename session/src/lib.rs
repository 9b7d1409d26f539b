//! # Composition Session
//!
//! Client-side session state machine: sign-in, sign-up, sign-out.
//!
//! The session is a small record (`is_fetching`, `is_logged_in`, `token`,
//! `username`) mutated exclusively by dispatched actions:
//!
//! ```text
//! Action → Reducer → (State, Effects) → HTTP request → Completion action
//! ```
//!
//! Submitting credentials sets the fetching flag and issues exactly one
//! HTTP request; the request settles into exactly one `Succeeded` or
//! `Failed` action. The reducer is pure: persisting the bearer token (the
//! browser-local-storage analogue, [`token_store::TokenStore`]) is done by
//! the calling flow, never inside the reducer.
//!
//! ## Example: sign-in flow
//!
//! ```ignore
//! use composition_session::{flows, SessionReducer, SessionEnvironment, SessionState};
//!
//! let store = Store::new(
//!     flows::bootstrap(&tokens)?,
//!     SessionReducer::new(),
//!     SessionEnvironment::new(api),
//! );
//!
//! match flows::sign_in(&store, &tokens, "alice", "hunter2").await {
//!     Ok(session) => { /* navigate to the root route */ },
//!     Err(e) => { /* render e.to_string() next to the form */ },
//! }
//! ```

pub mod actions;
pub mod environment;
pub mod error;
pub mod flows;
pub mod reducer;
pub mod state;
pub mod token;
pub mod token_store;

pub use actions::SessionAction;
pub use environment::SessionEnvironment;
pub use error::SessionError;
pub use reducer::SessionReducer;
pub use state::SessionState;
pub use token::{Claims, TokenError, decode_claims};
pub use token_store::{FileTokenStore, InMemoryTokenStore, TokenStore, TokenStoreError};
