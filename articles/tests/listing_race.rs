//! Listing tests driven through the store, including the stale-response
//! discard under overlapping page fetches.

#![allow(clippy::unwrap_used)]

use composition_api::mocks::{MockApi, sample_previews};
use composition_articles::{ArticlesEnvironment, ListingAction, ListingReducer, ListingState};
use composition_runtime::Store;

type ListingStore =
    Store<ListingState, ListingAction, ArticlesEnvironment<MockApi>, ListingReducer<MockApi>>;

fn listing_store(api: MockApi) -> ListingStore {
    Store::new(
        ListingState::default(),
        ListingReducer::new(),
        ArticlesEnvironment::new(api),
    )
}

#[tokio::test]
async fn late_response_for_abandoned_page_is_discarded() {
    let api = MockApi::new();
    api.stub_previews(1, Ok(sample_previews(10)));
    api.stub_previews(2, Ok(sample_previews(3)));
    // Hold page 2's response until the test releases it.
    let gate = api.gate_previews(2);

    let store = listing_store(api);

    // Open the listing on page 2; its fetch is now in flight and stuck.
    let mut page2_fetch = store
        .send(ListingAction::Mounted {
            query: "?page=2".into(),
        })
        .await
        .unwrap();

    // Navigate to page 1 before page 2's response arrives.
    let mut page1_fetch = store
        .send(ListingAction::LocationChanged {
            query: "?page=1".into(),
        })
        .await
        .unwrap();
    page1_fetch.wait().await;

    assert_eq!(store.state(|s| s.page).await, 1);
    assert_eq!(store.state(|s| s.previews.len()).await, 10);

    // Now let page 2's response land. It must be discarded.
    gate.release();
    page2_fetch.wait().await;

    assert_eq!(store.state(|s| s.page).await, 1);
    assert_eq!(store.state(|s| s.previews.len()).await, 10);
    assert_eq!(store.state(|s| s.error.clone()).await, None);
}

#[tokio::test]
async fn affordances_across_a_full_and_a_short_page() {
    let api = MockApi::new();
    api.stub_previews(1, Ok(sample_previews(10)));
    api.stub_previews(2, Ok(sample_previews(3)));

    let store = listing_store(api);

    let mut fetch = store
        .send(ListingAction::Mounted { query: "".into() })
        .await
        .unwrap();
    fetch.wait().await;

    // Full first page: more pages may exist, nothing before page 1.
    let state = store.state(Clone::clone).await;
    assert!(state.show_next());
    assert!(!state.show_previous());

    let mut fetch = store
        .send(ListingAction::LocationChanged {
            query: "?page=2".into(),
        })
        .await
        .unwrap();
    fetch.wait().await;

    // Short second page: no next, but a previous page exists.
    let state = store.state(Clone::clone).await;
    assert_eq!(state.previews.len(), 3);
    assert!(!state.show_next());
    assert!(state.show_previous());
}

#[tokio::test]
async fn failed_page_keeps_stale_previews_visible() {
    let api = MockApi::new();
    api.stub_previews(1, Ok(sample_previews(10)));
    api.stub_previews(
        2,
        Err(composition_api::ApiError::Api {
            status: 500,
            message: "database unavailable".into(),
        }),
    );

    let store = listing_store(api);

    let mut fetch = store
        .send(ListingAction::Mounted { query: "".into() })
        .await
        .unwrap();
    fetch.wait().await;

    let mut fetch = store
        .send(ListingAction::LocationChanged {
            query: "?page=2".into(),
        })
        .await
        .unwrap();
    fetch.wait().await;

    let state = store.state(Clone::clone).await;
    assert_eq!(state.page, 2);
    assert_eq!(state.previews.len(), 10);
    assert_eq!(state.error.as_deref(), Some("database unavailable"));
}
