//! # Composition Testing
//!
//! Testing utilities for the Composition client architecture.
//!
//! This crate provides:
//! - A fluent Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effect lists
//!
//! ## Example
//!
//! ```ignore
//! use composition_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(SessionReducer::new())
//!     .with_env(test_environment())
//!     .given_state(SessionState::default())
//!     .when_action(SessionAction::SignedOut)
//!     .then_state(|state| {
//!         assert!(!state.is_logged_in);
//!         assert!(state.token.is_empty());
//!     })
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};
