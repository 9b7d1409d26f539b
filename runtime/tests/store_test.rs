//! Store runtime tests: reducer serialization, effect feedback, and the
//! request-response wait used by the views.

#![allow(clippy::unwrap_used)]

use composition_core::Effects;
use composition_core::effect::Effect;
use composition_core::reducer::Reducer;
use composition_core::smallvec;
use composition_runtime::{Store, StoreError};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct PingState {
    pings: u32,
    pongs: u32,
}

#[derive(Debug, Clone)]
enum PingAction {
    Ping,
    Pong,
}

#[derive(Clone)]
struct PingEnv;

struct PingReducer;

impl Reducer for PingReducer {
    type State = PingState;
    type Action = PingAction;
    type Environment = PingEnv;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            PingAction::Ping => {
                state.pings += 1;
                smallvec![Effect::future(async { Some(PingAction::Pong) })]
            },
            PingAction::Pong => {
                state.pongs += 1;
                smallvec![]
            },
        }
    }
}

#[tokio::test]
async fn send_updates_state_synchronously() {
    let store = Store::new(PingState::default(), PingReducer, PingEnv);

    let _handle = store.send(PingAction::Ping).await.unwrap();
    assert_eq!(store.state(|s| s.pings).await, 1);
}

#[tokio::test]
async fn effect_feedback_reaches_reducer() {
    let store = Store::new(PingState::default(), PingReducer, PingEnv);

    let mut handle = store.send(PingAction::Ping).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(store.state(|s| s.pongs).await, 1);
}

#[tokio::test]
async fn send_and_wait_for_returns_terminal_action() {
    let store = Store::new(PingState::default(), PingReducer, PingEnv);

    let action = store
        .send_and_wait_for(
            PingAction::Ping,
            |a| matches!(a, PingAction::Pong),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(matches!(action, PingAction::Pong));
    // State already reflects the terminal action when the wait returns.
    assert_eq!(store.state(|s| s.pongs).await, 1);
}

#[tokio::test]
async fn send_and_wait_for_times_out_without_match() {
    let store = Store::new(PingState::default(), PingReducer, PingEnv);

    let result = store
        .send_and_wait_for(PingAction::Pong, |_| false, Duration::from_millis(50))
        .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
}

#[tokio::test]
async fn shutdown_rejects_new_actions() {
    let store = Store::new(PingState::default(), PingReducer, PingEnv);

    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store.send(PingAction::Ping).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
}

#[tokio::test]
async fn cloned_store_shares_state() {
    let store = Store::new(PingState::default(), PingReducer, PingEnv);
    let clone = store.clone();

    let _ = store.send(PingAction::Ping).await.unwrap();
    assert_eq!(clone.state(|s| s.pings).await, 1);
}
