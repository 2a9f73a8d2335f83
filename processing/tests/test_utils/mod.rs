#![allow(dead_code)]

use async_trait::async_trait;
use common::config::{AcknowledgeMode, SyncConfig};
use mockall::mock;
use std::sync::{Arc, Mutex};

use processing::{
    error::{PersistenceError, RemoteServiceError},
    model::{ExecutionStatus, ListOrdersQuery, MerchantOrder, OperationId, OrderLine, OrdersPage},
    persister::OrderPersister,
    printer::OrderPrinter,
    service::OrdersService,
};

pub const MERCHANT_ID: u64 = 1_234_567;

// Minimal order shape for driving the generic engine
#[derive(Debug, Clone, PartialEq)]
pub struct TestOrder {
    pub id: Option<String>,
    pub lines: Vec<TestLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestLine {
    pub id: Option<String>,
}

impl TestOrder {
    pub fn new(id: &str, line_ids: &[&str]) -> Self {
        Self {
            id: Some(id.to_string()),
            lines: line_ids
                .iter()
                .map(|line| TestLine {
                    id: Some(line.to_string()),
                })
                .collect(),
        }
    }

    pub fn without_id(line_ids: &[&str]) -> Self {
        Self {
            id: None,
            ..Self::new("", line_ids)
        }
    }
}

impl MerchantOrder for TestOrder {
    type Line = TestLine;

    fn order_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn line_items(&self) -> &[TestLine] {
        &self.lines
    }
}

impl OrderLine for TestLine {
    fn line_item_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

pub fn page(orders: Vec<TestOrder>, next_page_token: Option<&str>) -> OrdersPage<TestOrder> {
    OrdersPage {
        orders,
        next_page_token: next_page_token.map(str::to_string),
    }
}

pub fn sync_config(acknowledge_mode: AcknowledgeMode) -> SyncConfig {
    SyncConfig {
        merchant_id: MERCHANT_ID,
        acknowledge_mode,
        ..SyncConfig::default()
    }
}

mock! {
    pub OrdersService {}

    #[async_trait]
    impl OrdersService<TestOrder> for OrdersService {
        async fn list_orders(
            &self,
            query: &ListOrdersQuery,
        ) -> Result<OrdersPage<TestOrder>, RemoteServiceError>;

        async fn acknowledge(
            &self,
            merchant_id: u64,
            order_id: &str,
            operation_id: &OperationId,
        ) -> Result<ExecutionStatus, RemoteServiceError>;
    }
}

mock! {
    pub OrderPersister {}

    #[async_trait]
    impl OrderPersister<TestOrder> for OrderPersister {
        async fn persist(&self, order: &TestOrder, line_item: &TestLine) -> Result<(), PersistenceError>;
    }
}

/// Shared, ordered log of what the mocks saw, e.g. `persist:A/A-1`, `ack:A`.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> usize {
        self.events()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("event {event} not recorded"))
    }
}

/// Serves the given pages keyed by the token that requests them (`None` for the first).
pub fn paged_service(pages: Vec<(Option<&'static str>, OrdersPage<TestOrder>)>) -> MockOrdersService {
    let mut service = MockOrdersService::new();
    service
        .expect_list_orders()
        .times(pages.len())
        .returning(move |query| {
            pages
                .iter()
                .find(|(token, _)| query.page_token.as_deref() == *token)
                .map(|(_, page)| Ok(page.clone()))
                .unwrap_or_else(|| panic!("unexpected page token {:?}", query.page_token))
        });
    service
}

/// Records every acknowledgment in `log` and answers `executed`.
pub fn record_acknowledgments(service: &mut MockOrdersService, log: EventLog) {
    service
        .expect_acknowledge()
        .returning(move |merchant_id, order_id, _operation_id| {
            assert_eq!(merchant_id, MERCHANT_ID);
            log.push(format!("ack:{order_id}"));
            Ok(ExecutionStatus::Executed)
        });
}

/// Records every persist call in `log` and succeeds.
pub fn recording_persister(log: EventLog) -> MockOrderPersister {
    let mut persister = MockOrderPersister::new();
    persister.expect_persist().returning(move |order, line| {
        log.push(format!(
            "persist:{}/{}",
            order.id.as_deref().unwrap_or("-"),
            line.id.as_deref().unwrap_or("-")
        ));
        Ok(())
    });
    persister
}

#[derive(Default)]
pub struct RecordingPrinter {
    pub printed: Mutex<Vec<String>>,
    pub messages: Mutex<Vec<String>>,
}

impl OrderPrinter<TestOrder> for RecordingPrinter {
    fn print_order(&self, order: &TestOrder) {
        self.printed
            .lock()
            .unwrap()
            .push(order.id.clone().unwrap_or_default());
    }

    fn print_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
