use crate::{
    error::RemoteServiceError,
    model::{ListOrdersQuery, MerchantOrder, OrdersPage},
    service::OrdersService,
    telemetry::ORDERS_LISTED,
};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Pages through the unacknowledged orders of a merchant.
pub struct OrderLister<O: MerchantOrder> {
    service: Arc<dyn OrdersService<O>>,
    max_results: Option<u32>,
}

impl<O: MerchantOrder> OrderLister<O> {
    pub fn new(service: Arc<dyn OrdersService<O>>, max_results: Option<u32>) -> Self {
        Self {
            service,
            max_results,
        }
    }

    /// Lazily fetches pages, one request per poll, following continuation tokens.
    ///
    /// Ends after the first page without a token. A failed request is yielded
    /// once and ends the stream, since there is no token left to resume from.
    pub fn pages(&self, merchant_id: u64) -> BoxStream<'static, Result<OrdersPage<O>, RemoteServiceError>> {
        let service = Arc::clone(&self.service);
        let max_results = self.max_results;

        stream::try_unfold((Cursor::Start, 0usize), move |(cursor, fetched)| {
            fetch_page(Arc::clone(&service), merchant_id, max_results, cursor, fetched)
        })
        .boxed()
    }

    /// Every unacknowledged order, page by page, in the order the service returns them.
    pub fn list_unacknowledged(&self, merchant_id: u64) -> BoxStream<'static, Result<O, RemoteServiceError>> {
        self.pages(merchant_id)
            .map_ok(|page| stream::iter(page.orders.into_iter().map(Ok::<O, RemoteServiceError>)))
            .try_flatten()
            .boxed()
    }
}

async fn fetch_page<O: MerchantOrder>(
    service: Arc<dyn OrdersService<O>>,
    merchant_id: u64,
    max_results: Option<u32>,
    cursor: Cursor,
    fetched: usize,
) -> Result<Option<(OrdersPage<O>, (Cursor, usize))>, RemoteServiceError> {
    let page_token = match cursor {
        Cursor::Done => return Ok(None),
        Cursor::Start => None,
        Cursor::Next(token) => Some(token),
    };

    debug!(merchant_id, page_token = ?page_token, "Requesting orders page");
    let query = ListOrdersQuery::unacknowledged(merchant_id, page_token, max_results);
    let page = service.list_orders(&query).await?;

    let page_number = fetched + 1;
    info!(
        merchant_id,
        page = page_number,
        orders = page.orders.len(),
        has_more = page.continuation().is_some(),
        "Fetched orders page"
    );
    metrics::counter!(ORDERS_LISTED).increment(page.orders.len() as u64);

    let next = match page.continuation() {
        Some(token) => Cursor::Next(token.to_string()),
        None => Cursor::Done,
    };
    Ok(Some((page, (next, page_number))))
}
