mod test_utils;

use futures::{StreamExt, TryStreamExt};
use processing::{error::RemoteServiceError, lister::OrderLister};
use std::sync::{Arc, Mutex};
use test_utils::*;

fn order_ids(orders: &[TestOrder]) -> Vec<String> {
    orders.iter().map(|o| o.id.clone().unwrap_or_default()).collect()
}

#[tokio::test]
async fn visits_every_order_across_pages_once() {
    let service = paged_service(vec![
        (None, page(vec![TestOrder::new("A", &["A-1"]), TestOrder::new("B", &[])], Some("T2"))),
        (Some("T2"), page(vec![TestOrder::new("C", &["C-1"])], Some("T3"))),
        (Some("T3"), page(vec![TestOrder::new("D", &[])], None)),
    ]);
    let lister = OrderLister::new(Arc::new(service), None);

    let orders: Vec<TestOrder> = lister.list_unacknowledged(MERCHANT_ID).try_collect().await.unwrap();

    assert_eq!(order_ids(&orders), vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn empty_page_with_token_keeps_going() {
    let service = paged_service(vec![
        (None, page(vec![], Some("T2"))),
        (Some("T2"), page(vec![], Some("T3"))),
        (Some("T3"), page(vec![TestOrder::new("C", &["C-1"])], None)),
    ]);
    let lister = OrderLister::new(Arc::new(service), None);

    let orders: Vec<TestOrder> = lister.list_unacknowledged(MERCHANT_ID).try_collect().await.unwrap();

    assert_eq!(order_ids(&orders), vec!["C"]);
}

#[tokio::test]
async fn empty_token_ends_listing() {
    // `times(1)` on the mock fails the test if a second page is requested
    let service = paged_service(vec![(None, page(vec![TestOrder::new("A", &[])], Some("")))]);
    let lister = OrderLister::new(Arc::new(service), None);

    let pages: Vec<_> = lister.pages(MERCHANT_ID).try_collect().await.unwrap();

    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn every_request_filters_unacknowledged_active_orders() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut service = MockOrdersService::new();
    let recorder = Arc::clone(&seen);
    service.expect_list_orders().times(2).returning(move |query| {
        recorder.lock().unwrap().push(query.clone());
        match query.page_token.as_deref() {
            None => Ok(page(vec![TestOrder::new("A", &[])], Some("T2"))),
            _ => Ok(page(vec![], None)),
        }
    });
    let lister = OrderLister::new(Arc::new(service), Some(50));

    let _: Vec<TestOrder> = lister.list_unacknowledged(MERCHANT_ID).try_collect().await.unwrap();

    let queries = seen.lock().unwrap();
    assert_eq!(queries[0].page_token, None);
    assert_eq!(queries[1].page_token.as_deref(), Some("T2"));
    for query in queries.iter() {
        assert_eq!(query.merchant_id, MERCHANT_ID);
        assert_eq!(query.acknowledged, Some(false));
        assert_eq!(query.statuses, vec!["active".to_string()]);
        assert_eq!(query.max_results, Some(50));
    }
}

#[tokio::test]
async fn failed_page_is_yielded_once_and_ends_the_stream() {
    let mut service = MockOrdersService::new();
    service.expect_list_orders().times(2).returning(|query| match query.page_token.as_deref() {
        None => Ok(page(vec![TestOrder::new("A", &[])], Some("T2"))),
        _ => Err(RemoteServiceError::Api {
            status: 500,
            message: "backend error".to_string(),
        }),
    });
    let lister = OrderLister::new(Arc::new(service), None);

    let results: Vec<_> = lister.list_unacknowledged(MERCHANT_ID).collect().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().id.as_deref(), Some("A"));
    assert!(matches!(
        results[1],
        Err(RemoteServiceError::Api { status: 500, .. })
    ));
}

#[tokio::test]
async fn pages_are_fetched_lazily() {
    let service = paged_service(vec![(None, page(vec![TestOrder::new("A", &[])], Some("T2")))]);
    let lister = OrderLister::new(Arc::new(service), None);

    // Only the first page is pulled, so the mock's single expectation holds
    let mut orders = lister.list_unacknowledged(MERCHANT_ID);
    let first = orders.next().await.unwrap().unwrap();

    assert_eq!(first.id.as_deref(), Some("A"));
}
