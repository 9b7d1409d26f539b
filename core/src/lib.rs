//! # Composition Core
//!
//! Core traits and types for the Composition blog client.
//!
//! The client is built as a set of small state machines driven by the
//! Reducer pattern: every feature (session, article listing, composing)
//! owns a state value, a closed action enum, and a pure reducer. Side
//! effects (HTTP calls against the blog server) are returned from the
//! reducer as *values* and executed by the store runtime, which feeds
//! resulting actions back into the reducer.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (e.g. the session record)
//! - **Action**: All possible inputs to a reducer (commands and completions)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies (API client), defined per
//!   feature crate and passed by reference into `reduce`
//!
//! ## Example
//!
//! ```ignore
//! use composition_core::{effect::Effect, reducer::Reducer, Effects, SmallVec};
//!
//! impl Reducer for SessionReducer {
//!     type State = SessionState;
//!     type Action = SessionAction;
//!     type Environment = SessionEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SessionState,
//!         action: SessionAction,
//!         env: &SessionEnvironment,
//!     ) -> Effects<SessionAction> {
//!         // Transition table goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types so feature crates only need this crate
// for the reducer plumbing.
pub use smallvec::{SmallVec, smallvec};

/// Effect list returned by reducers.
///
/// Most reducer branches return zero or one effect; four slots keeps the
/// common case off the heap.
pub type Effects<A> = SmallVec<[effect::Effect<A>; 4]>;

/// Reducer module - the core trait for feature logic
pub mod reducer {
    use super::Effects;

    /// The Reducer trait - core abstraction for feature logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The feature state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Contract
    ///
    /// `reduce` must be pure apart from the effect values it returns:
    /// replaying the same action sequence from the same initial state
    /// always yields the same final state.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Fold an action into state changes and effect descriptions.
        ///
        /// The returned effects are executed by the store runtime; actions
        /// they produce are dispatched back through this reducer.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the store runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Boxed future that optionally produces a follow-up action.
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects in order, each waiting for the previous to finish
        Sequential(Vec<Effect<Action>>),

        /// Delayed action
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation, typically one HTTP request.
        ///
        /// If the future resolves to `Some(action)`, the action is fed back
        /// into the reducer.
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap a future producing an optional follow-up action
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// `true` for `Effect::None` and for empty compositions
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn effect_none_is_none() {
        assert!(Effect::<()>::None.is_none());
        assert!(Effect::<()>::Parallel(vec![Effect::None, Effect::None]).is_none());
    }

    #[test]
    fn effect_future_is_not_none() {
        let effect = Effect::<u32>::future(async { Some(1) });
        assert!(!effect.is_none());
    }

    #[test]
    fn effect_debug_hides_future_internals() {
        let effect = Effect::<u32>::future(async { None });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn merge_and_chain_wrap_effects() {
        let merged = Effect::<u32>::merge(vec![Effect::None]);
        assert!(matches!(merged, Effect::Parallel(_)));

        let chained = Effect::<u32>::chain(vec![Effect::None]);
        assert!(matches!(chained, Effect::Sequential(_)));
    }
}
