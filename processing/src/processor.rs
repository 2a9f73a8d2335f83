use crate::{
    acknowledger::Acknowledger,
    error::{MissingFieldError, SyncError},
    lister::OrderLister,
    model::{MerchantOrder, OrderLine},
    operation_id::OperationIdGenerator,
    persister::OrderPersister,
    printer::OrderPrinter,
    report::{Acknowledgment, SyncReport},
    service::OrdersService,
    telemetry::{
        ACKNOWLEDGE_FAILURES, LINE_ITEMS_PERSISTED, ORDERS_ACKNOWLEDGED, PERSISTENCE_FAILURES,
    },
};
use common::config::{AcknowledgeMode, SyncConfig};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Drives one pass: list, then print, persist and acknowledge each order.
///
/// Steps run strictly one after another. Failures are logged, recorded in the
/// returned [`SyncReport`] and never stop the pass; only a listing failure ends
/// it early, because no continuation token is left.
pub struct OrderSync<O: MerchantOrder> {
    merchant_id: u64,
    acknowledge_mode: AcknowledgeMode,
    lister: OrderLister<O>,
    acknowledger: Acknowledger<O>,
    persister: Arc<dyn OrderPersister<O>>,
    printer: Arc<dyn OrderPrinter<O>>,
}

impl<O: MerchantOrder> OrderSync<O> {
    pub fn new(
        config: &SyncConfig,
        max_results: Option<u32>,
        service: Arc<dyn OrdersService<O>>,
        persister: Arc<dyn OrderPersister<O>>,
        printer: Arc<dyn OrderPrinter<O>>,
        operation_ids: Arc<dyn OperationIdGenerator>,
    ) -> Self {
        info!(
            merchant_id = config.merchant_id,
            acknowledge_mode = ?config.acknowledge_mode,
            "Initializing order sync"
        );
        if config.acknowledge_mode == AcknowledgeMode::PerLineItem {
            warn!("Acknowledging after every line item; orders with several items are acknowledged repeatedly");
        }

        Self {
            merchant_id: config.merchant_id,
            acknowledge_mode: config.acknowledge_mode,
            lister: OrderLister::new(Arc::clone(&service), max_results),
            acknowledger: Acknowledger::new(service, operation_ids),
            persister,
            printer,
        }
    }

    pub async fn run(&self) -> SyncReport {
        let mut report = SyncReport::start(self.merchant_id);
        self.printer.print_message(&format!(
            "Listing Unacknowledged Orders for Merchant {}",
            self.merchant_id
        ));

        let mut pages = self.lister.pages(self.merchant_id);
        while let Some(next) = pages.next().await {
            match next {
                Ok(page) => {
                    report.pages += 1;
                    if page.orders.is_empty() {
                        self.printer.print_message("No orders found.");
                    }
                    for order in &page.orders {
                        self.process_order(order, &mut report).await;
                    }
                }
                Err(e) => {
                    let e = SyncError::from(e);
                    error!(
                        merchant_id = self.merchant_id,
                        kind = %e.kind(),
                        error = %e,
                        "Failed to list orders"
                    );
                    report.record_listing_failure(&e);
                }
            }
        }

        report.finish();
        info!(
            merchant_id = self.merchant_id,
            pages = report.pages,
            orders = report.orders.len(),
            persisted = report.line_items_persisted,
            persistence_failures = report.persistence_failures.len(),
            acknowledged = report.acknowledged.len(),
            acknowledge_failures = report.acknowledge_failures.len(),
            elapsed_ms = report.elapsed_ms().unwrap_or_default(),
            "Order sync finished"
        );
        report
    }

    async fn process_order(&self, order: &O, report: &mut SyncReport) {
        let order_id = order.order_id();
        info!(order_id = ?order_id, line_items = order.line_items().len(), "Processing order");
        report.orders.push(order_id.map(str::to_string));

        self.printer.print_order(order);

        for line_item in order.line_items() {
            self.persist_line_item(order, line_item, report).await;

            if self.acknowledge_mode == AcknowledgeMode::PerLineItem {
                self.acknowledge(order, report).await;
            }
        }

        if self.acknowledge_mode == AcknowledgeMode::PerOrder {
            self.acknowledge(order, report).await;
        }
    }

    async fn persist_line_item(&self, order: &O, line_item: &O::Line, report: &mut SyncReport) {
        let order_id = order.order_id();
        let line_item_id = line_item.line_item_id();

        match self.persister.persist(order, line_item).await {
            Ok(()) => {
                debug!(order_id = ?order_id, line_item_id = ?line_item_id, "Persisted line item");
                metrics::counter!(LINE_ITEMS_PERSISTED).increment(1);
                report.line_items_persisted += 1;
            }
            Err(e) => {
                let e = SyncError::from(e);
                error!(
                    order_id = ?order_id,
                    line_item_id = ?line_item_id,
                    kind = %e.kind(),
                    error = %e,
                    "Failed to persist line item, continuing"
                );
                metrics::counter!(PERSISTENCE_FAILURES).increment(1);
                report.record_persistence_failure(order_id, line_item_id, &e);
            }
        }
    }

    async fn acknowledge(&self, order: &O, report: &mut SyncReport) {
        let Some(order_id) = order.order_id() else {
            let e = SyncError::from(MissingFieldError::new("id"));
            warn!(kind = %e.kind(), error = %e, "Cannot acknowledge order without an id");
            metrics::counter!(ACKNOWLEDGE_FAILURES).increment(1);
            report.record_acknowledge_failure(None, &e);
            return;
        };

        match self.acknowledger.acknowledge(self.merchant_id, order_id).await {
            Ok(status) => {
                self.printer
                    .print_message(&format!("Order {order_id} acknowledged with status {status}."));
                metrics::counter!(ORDERS_ACKNOWLEDGED).increment(1);
                report.acknowledged.push(Acknowledgment {
                    order_id: order_id.to_string(),
                    status,
                });
            }
            Err(e) => {
                let e = SyncError::from(e);
                error!(
                    order_id,
                    kind = %e.kind(),
                    error = %e,
                    "Failed to acknowledge order"
                );
                metrics::counter!(ACKNOWLEDGE_FAILURES).increment(1);
                report.record_acknowledge_failure(Some(order_id), &e);
            }
        }
    }
}
