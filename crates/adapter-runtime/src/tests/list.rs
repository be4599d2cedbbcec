use super::{ScriptedAdapter, Step, TestRow, initial_items};
use crate::{
    config::AdapterConfig,
    error::{AdapterError, ConfigError},
    fetch::FetchState,
    list::{EndlessList, Settlement},
};
use model::{
    change::{ChangeLog, RowChange},
    error::PagingError,
    row::{RowKind, RowView},
};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_bind_item_row_passes_stored_item() {
    let adapter = ScriptedAdapter::new(Vec::new());
    let mut list = EndlessList::new(adapter, vec![10, 11, 12]).unwrap();

    let mut view = list.create_row(RowKind::Item);
    list.bind_row(&mut view, 1).unwrap();

    assert_eq!(
        view,
        RowView::Item(TestRow {
            kind: RowKind::Item,
            bound: Some((1, 11)),
        })
    );
    assert!(!list.is_fetching());
}

#[tokio::test]
async fn test_bind_placeholder_starts_fetch() {
    let adapter = ScriptedAdapter::new(vec![Step::Page(20)]);
    let mut list = EndlessList::new(adapter, initial_items(3)).unwrap();

    let mut placeholder = list.create_row(RowKind::Placeholder);
    assert_eq!(placeholder.kind(), RowKind::Placeholder);
    assert_eq!(
        list.adapter().placeholders_created.load(Ordering::SeqCst),
        1
    );

    list.bind_row(&mut placeholder, 3).unwrap();
    assert!(matches!(list.fetch_state(), FetchState::Fetching(_)));

    // Placeholder binds carry no item, so the view stays untouched.
    assert_eq!(placeholder.handle().bound, None);
    assert_eq!(
        list.adapter().placeholders_created.load(Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn test_bind_rejects_wrong_view_kind_and_bad_index() {
    let adapter = ScriptedAdapter::new(Vec::new());
    let mut list = EndlessList::new(adapter, initial_items(3)).unwrap();

    let mut placeholder = list.create_row(RowKind::Placeholder);
    assert_eq!(
        list.bind_row(&mut placeholder, 0),
        Err(PagingError::ViewKindMismatch {
            index: 0,
            expected: RowKind::Item,
            actual: RowKind::Placeholder,
        })
    );

    let mut item_view = list.create_row(RowKind::Item);
    assert_eq!(
        list.bind_row(&mut item_view, 3),
        Err(PagingError::ViewKindMismatch {
            index: 3,
            expected: RowKind::Placeholder,
            actual: RowKind::Item,
        })
    );
    assert_eq!(
        list.bind_row(&mut item_view, 4),
        Err(PagingError::IndexOutOfRange {
            index: 4,
            row_count: 4
        })
    );

    // None of the failed binds started a fetch.
    assert!(!list.is_fetching());
}

#[tokio::test]
async fn test_notifications_across_fetch_cycle() {
    let log = ChangeLog::new();
    let adapter = ScriptedAdapter::new(vec![Step::Page(20), Step::Page(5)]).starting_at(20);
    let mut list = EndlessList::new(adapter, initial_items(20))
        .unwrap()
        .with_listener(log.clone());

    // Placeholder already shown: starting the fetch is silent.
    list.request_next_page();
    assert!(log.is_empty());

    list.settle().await.unwrap();
    assert_eq!(
        log.take(),
        vec![RowChange::Inserted {
            position: 20,
            count: 20
        }]
    );

    list.request_next_page();
    list.settle().await.unwrap();
    assert_eq!(
        log.take(),
        vec![
            RowChange::Inserted {
                position: 40,
                count: 5
            },
            RowChange::Removed {
                position: 45,
                count: 1
            },
        ]
    );
    assert_eq!(list.row_count(), 45);
    assert_eq!(list.items()[44], 44);

    list.restart_appending();
    assert_eq!(
        log.take(),
        vec![RowChange::Inserted {
            position: 45,
            count: 1
        }]
    );
}

#[tokio::test]
async fn test_fetch_after_stop_shows_placeholder_again() {
    let log = ChangeLog::new();
    let adapter = ScriptedAdapter::new(vec![Step::Page(2)]);
    let mut list = EndlessList::new(adapter, initial_items(4))
        .unwrap()
        .with_listener(log.clone());

    list.stop_appending();
    assert_eq!(list.row_count(), 4);
    log.take();

    list.request_next_page();
    assert_eq!(
        log.take(),
        vec![RowChange::Inserted {
            position: 4,
            count: 1
        }]
    );
    assert_eq!(list.row_kind(4), Ok(RowKind::Placeholder));

    let settlement = list.settle().await.unwrap();
    assert!(matches!(
        settlement,
        Settlement::Appended {
            count: 2,
            keep_appending: false,
            ..
        }
    ));
}

#[tokio::test]
async fn test_config_controls_page_size_and_initial_flag() {
    let adapter = ScriptedAdapter::new(vec![Step::Page(5)]);
    let config = AdapterConfig {
        items_per_page: 5,
        keep_appending: false,
    };
    let mut list = EndlessList::with_config(adapter, config, initial_items(5)).unwrap();

    assert_eq!(list.items_per_page(), 5);
    assert_eq!(list.row_count(), 5);

    list.request_next_page();
    let settlement = list.settle().await.unwrap();
    assert!(matches!(
        settlement,
        Settlement::Appended {
            count: 5,
            keep_appending: true,
            ..
        }
    ));
    assert_eq!(list.row_count(), 11);
}

#[test]
fn test_invalid_config_rejected() {
    let adapter = ScriptedAdapter::new(Vec::new());
    let result = EndlessList::with_config(adapter, AdapterConfig::new(0), Vec::new());
    assert!(matches!(
        result,
        Err(AdapterError::Config(ConfigError::ZeroPageSize))
    ));
}

#[tokio::test]
async fn test_item_queries_through_list() {
    let adapter = ScriptedAdapter::new(Vec::new());
    let list = EndlessList::new(adapter, vec![7, 8]).unwrap();

    assert_eq!(list.item(0), Ok(Some(&7)));
    assert_eq!(list.item(2), Ok(None));
    assert!(list.item(3).is_err());
    assert_eq!(list.items_per_page(), 20);
}

#[test]
fn test_list_driven_from_outside_the_runtime() {
    let adapter = ScriptedAdapter::new(Vec::new());
    assert!(matches!(
        EndlessList::new(adapter, initial_items(3)),
        Err(AdapterError::NoRuntime)
    ));

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let adapter = ScriptedAdapter::new(vec![Step::Page(20)]).starting_at(20);
    let mut list = EndlessList::with_runtime(
        adapter,
        AdapterConfig::default(),
        initial_items(20),
        runtime.handle().clone(),
    )
    .unwrap();

    // This thread is not part of the runtime; binding still starts the fetch.
    let mut placeholder = list.create_row(RowKind::Placeholder);
    list.bind_row(&mut placeholder, 20).unwrap();
    let id = match list.fetch_state() {
        FetchState::Fetching(id) => id,
        FetchState::Idle => panic!("expected a fetch in flight"),
    };

    let settlement = runtime.block_on(list.settle());
    assert_eq!(
        settlement,
        Some(Settlement::Appended {
            id,
            count: 20,
            keep_appending: true
        })
    );
    assert_eq!(list.row_count(), 41);
}
