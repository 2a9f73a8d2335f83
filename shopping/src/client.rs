//! HTTP client for the orders resource of the Content API

use crate::{
    model::{Order, OrdersListResponse},
    requests::{
        AcknowledgeRequest, CancelLineItemRequest, ExecutionResponse, GetByMerchantOrderIdResponse,
        ReturnRefundLineItemRequest, ShipLineItemsRequest, UpdateMerchantOrderIdRequest,
        UpdateShipmentRequest,
    },
};
use async_trait::async_trait;
use common::config::ContentApiConfig;
use processing::{
    error::RemoteServiceError,
    model::{ExecutionStatus, ListOrdersQuery, OperationId, OrdersPage},
    service::OrdersService,
};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// List envelope with orders left undecoded, so one malformed order costs
/// only itself rather than the page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawOrdersListResponse {
    kind: Option<String>,
    next_page_token: Option<String>,
    resources: Vec<Value>,
}

fn decode_orders(resources: Vec<Value>) -> Vec<Order> {
    resources
        .into_iter()
        .enumerate()
        .filter_map(|(index, resource)| {
            let order_id = resource.get("id").and_then(Value::as_str).map(str::to_string);
            match serde_json::from_value::<Order>(resource) {
                Ok(order) => Some(order),
                Err(e) => {
                    warn!(index, order_id = ?order_id, error = %e, "Skipping order that failed to decode");
                    None
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ContentApiClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl ContentApiClient {
    pub fn new(config: &ContentApiConfig) -> Result<Self, RemoteServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RemoteServiceError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    /// `{base}/{merchant_id}/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, merchant_id: u64, segments: &[&str]) -> Result<Url, RemoteServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&merchant_id.to_string())
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteServiceError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, RemoteServiceError> {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, RemoteServiceError> {
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => serde_json::from_str(&body)
                .map_err(|e| RemoteServiceError::Decode(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RemoteServiceError::Unauthorized(body))
            }
            status => Err(RemoteServiceError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    async fn mutate<B: Serialize>(
        &self,
        merchant_id: u64,
        order_id: &str,
        action: &str,
        body: &B,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        let url = self.endpoint(merchant_id, &["orders", order_id, action])?;
        let response: ExecutionResponse = self.post_json(url, body).await?;
        response
            .execution_status
            .ok_or_else(|| RemoteServiceError::Decode(format!("{action} response has no executionStatus")))
    }

    pub async fn list(&self, query: &ListOrdersQuery) -> Result<OrdersListResponse, RemoteServiceError> {
        let mut url = self.endpoint(query.merchant_id, &["orders"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(acknowledged) = query.acknowledged {
                pairs.append_pair("acknowledged", if acknowledged { "true" } else { "false" });
            }
            for status in &query.statuses {
                pairs.append_pair("statuses", status);
            }
            if let Some(token) = &query.page_token {
                pairs.append_pair("pageToken", token);
            }
            if let Some(max_results) = query.max_results {
                pairs.append_pair("maxResults", &max_results.to_string());
            }
        }
        let raw: RawOrdersListResponse = self.get_json(url).await?;
        Ok(OrdersListResponse {
            kind: raw.kind,
            next_page_token: raw.next_page_token,
            resources: decode_orders(raw.resources),
        })
    }

    pub async fn get_order(&self, merchant_id: u64, order_id: &str) -> Result<Order, RemoteServiceError> {
        let url = self.endpoint(merchant_id, &["orders", order_id])?;
        self.get_json(url).await
    }

    pub async fn get_order_by_merchant_order_id(
        &self,
        merchant_id: u64,
        merchant_order_id: &str,
    ) -> Result<Order, RemoteServiceError> {
        let url = self.endpoint(merchant_id, &["ordersbymerchantid", merchant_order_id])?;
        let response: GetByMerchantOrderIdResponse = self.get_json(url).await?;
        response
            .order
            .ok_or_else(|| RemoteServiceError::Decode(format!("no order in response for {merchant_order_id}")))
    }

    pub async fn acknowledge_order(
        &self,
        merchant_id: u64,
        order_id: &str,
        operation_id: &OperationId,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        let request = AcknowledgeRequest {
            operation_id: operation_id.clone(),
        };
        self.mutate(merchant_id, order_id, "acknowledge", &request).await
    }

    pub async fn update_merchant_order_id(
        &self,
        merchant_id: u64,
        order_id: &str,
        request: &UpdateMerchantOrderIdRequest,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        self.mutate(merchant_id, order_id, "updateMerchantOrderId", request).await
    }

    pub async fn cancel_line_item(
        &self,
        merchant_id: u64,
        order_id: &str,
        request: &CancelLineItemRequest,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        self.mutate(merchant_id, order_id, "cancelLineItem", request).await
    }

    pub async fn ship_line_items(
        &self,
        merchant_id: u64,
        order_id: &str,
        request: &ShipLineItemsRequest,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        self.mutate(merchant_id, order_id, "shipLineItems", request).await
    }

    pub async fn update_shipment(
        &self,
        merchant_id: u64,
        order_id: &str,
        request: &UpdateShipmentRequest,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        self.mutate(merchant_id, order_id, "updateShipment", request).await
    }

    pub async fn return_refund_line_item(
        &self,
        merchant_id: u64,
        order_id: &str,
        request: &ReturnRefundLineItemRequest,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        self.mutate(merchant_id, order_id, "returnRefundLineItem", request).await
    }
}

#[async_trait]
impl OrdersService<Order> for ContentApiClient {
    async fn list_orders(
        &self,
        query: &ListOrdersQuery,
    ) -> Result<OrdersPage<Order>, RemoteServiceError> {
        let response = self.list(query).await?;
        Ok(OrdersPage {
            orders: response.resources,
            next_page_token: response.next_page_token,
        })
    }

    async fn acknowledge(
        &self,
        merchant_id: u64,
        order_id: &str,
        operation_id: &OperationId,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        self.acknowledge_order(merchant_id, order_id, operation_id).await
    }
}
