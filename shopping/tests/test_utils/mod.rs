#![allow(dead_code)]

use async_trait::async_trait;
use common::config::{ContentApiConfig, SyncConfig};
use processing::{error::PersistenceError, persister::OrderPersister, printer::OrderPrinter};
use serde_json::{Value, json};
use shopping::{
    client::ContentApiClient,
    model::{LineItem, Order},
    procedure::StoredProcedureCall,
};
use std::sync::Mutex;
use wiremock::MockServer;

pub const MERCHANT_ID: u64 = 1_234_567;
pub const API_PATH: &str = "/content/v2.1";

/// A fully populated order as the API returns it.
pub fn order_json(order_id: &str, line_item_ids: &[&str]) -> Value {
    let line_items: Vec<Value> = line_item_ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "product": { "id": format!("online:en:US:{id}"), "title": "Boxed coffee beans", "offerId": id },
                "price": { "value": "11.99", "currency": "USD" },
                "tax": { "value": "0.96", "currency": "USD" },
                "quantityOrdered": 2,
                "quantityPending": 2,
                "shippingDetails": {
                    "shipByDate": "2024-05-02T00:00:00Z",
                    "deliverByDate": "2024-05-06T00:00:00Z",
                    "method": {
                        "carrier": "UPS",
                        "methodName": "Ground",
                        "minDaysInTransit": 2,
                        "maxDaysInTransit": 4
                    },
                    "type": "delivery"
                },
                "returnInfo": { "isReturnable": true, "daysToReturn": 30, "policyUrl": "https://example.com/returns" }
            })
        })
        .collect();

    json!({
        "kind": "content#order",
        "id": order_id,
        "merchantId": MERCHANT_ID.to_string(),
        "merchantOrderId": format!("M-{order_id}"),
        "status": "pendingShipment",
        "acknowledged": false,
        "placedDate": "2024-05-01T10:00:00Z",
        "paymentStatus": "paymentSecured",
        "customer": {
            "fullName": "Pat Doe",
            "marketingRightsInfo": { "marketingEmailAddress": "pat@example.com", "explicitMarketingPreference": "granted" }
        },
        "netPriceAmount": { "value": "23.98", "currency": "USD" },
        "shippingCost": { "value": "4.99", "currency": "USD" },
        "shippingCostTax": { "value": "0.40", "currency": "USD" },
        "billingAddress": {
            "recipientName": "Pat Doe",
            "streetAddress": ["1600 Amphitheatre Pkwy"],
            "locality": "Mountain View",
            "region": "CA",
            "postalCode": "94043",
            "country": "US"
        },
        "deliveryDetails": {
            "address": {
                "streetAddress": ["1600 Amphitheatre Pkwy", "Building 40"],
                "locality": "Mountain View",
                "region": "CA",
                "postalCode": "94043",
                "country": "US"
            },
            "phoneNumber": "+1 650-253-0000"
        },
        "lineItems": line_items
    })
}

pub fn order(order_id: &str, line_item_ids: &[&str]) -> Order {
    serde_json::from_value(order_json(order_id, line_item_ids)).unwrap()
}

pub fn list_response(orders: Vec<Value>, next_page_token: Option<&str>) -> Value {
    let mut body = json!({ "kind": "content#ordersListResponse", "resources": orders });
    if let Some(token) = next_page_token {
        body["nextPageToken"] = json!(token);
    }
    body
}

pub fn ack_response(status: &str) -> Value {
    json!({ "kind": "content#ordersAcknowledgeResponse", "executionStatus": status })
}

pub fn api_config(server: &MockServer) -> ContentApiConfig {
    ContentApiConfig {
        base_url: format!("{}{}", server.uri(), API_PATH),
        access_token: "test-token".to_string(),
        timeout_secs: 5,
        max_results: None,
    }
}

pub fn client(server: &MockServer) -> ContentApiClient {
    ContentApiClient::new(&api_config(server)).unwrap()
}

pub fn orders_path() -> String {
    format!("{API_PATH}/{MERCHANT_ID}/orders")
}

pub fn order_path(order_id: &str, action: &str) -> String {
    format!("{API_PATH}/{MERCHANT_ID}/orders/{order_id}/{action}")
}

pub fn sync_config() -> SyncConfig {
    SyncConfig {
        merchant_id: MERCHANT_ID,
        ..SyncConfig::default()
    }
}

/// Builds the real procedure call for every line item but never touches a database.
#[derive(Default)]
pub struct CapturingPersister {
    pub calls: Mutex<Vec<StoredProcedureCall>>,
}

impl CapturingPersister {
    pub fn captured(&self) -> Vec<StoredProcedureCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderPersister<Order> for CapturingPersister {
    async fn persist(&self, order: &Order, line_item: &LineItem) -> Result<(), PersistenceError> {
        let call = StoredProcedureCall::for_line_item(order, line_item)?;
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[derive(Default)]
pub struct SilentPrinter {
    pub printed_orders: Mutex<Vec<Option<String>>>,
    pub messages: Mutex<Vec<String>>,
}

impl OrderPrinter<Order> for SilentPrinter {
    fn print_order(&self, order: &Order) {
        self.printed_orders.lock().unwrap().push(order.id.clone());
    }

    fn print_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
