//! Orders resource of the Content API for Shopping (v2.1), as far as this tool reads it.
//!
//! Every field is optional on the wire, so everything is an `Option` or a
//! defaulted `Vec`. Consumers that need a nested object report its absence
//! instead of assuming it.

use processing::model::{MerchantOrder, OrderLine};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Price {
    pub value: Option<String>,
    pub currency: Option<String>,
}

impl Price {
    pub fn new(value: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            currency: Some(currency.into()),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.value.as_deref().unwrap_or_default(),
            self.currency.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub recipient_name: Option<String>,
    pub street_address: Vec<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Street line by position, `None` past the end.
    pub fn street_line(&self, index: usize) -> Option<&str> {
        self.street_address.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingRightsInfo {
    pub marketing_email_address: Option<String>,
    pub explicit_marketing_preference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub full_name: Option<String>,
    pub marketing_rights_info: Option<MarketingRightsInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryDetails {
    pub address: Option<Address>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: Option<String>,
    pub offer_id: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub gtin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingMethod {
    pub carrier: Option<String>,
    pub method_name: Option<String>,
    pub min_days_in_transit: Option<u32>,
    pub max_days_in_transit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingDetails {
    pub ship_by_date: Option<String>,
    pub deliver_by_date: Option<String>,
    pub method: Option<ShippingMethod>,
    #[serde(rename = "type")]
    pub shipping_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReturnInfo {
    pub is_returnable: Option<bool>,
    /// Signed on the wire, unlike the quantities.
    pub days_to_return: Option<i32>,
    pub policy_url: Option<String>,
}

/// A cancellation or a return recorded against a line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemEvent {
    pub actor: Option<String>,
    pub creation_date: Option<String>,
    pub quantity: Option<u32>,
    pub reason: Option<String>,
    pub reason_text: Option<String>,
}

pub type CancellationRecord = LineItemEvent;
pub type ReturnRecord = LineItemEvent;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub id: Option<String>,
    pub product: Option<Product>,
    pub price: Option<Price>,
    pub tax: Option<Price>,
    pub quantity_ordered: Option<u32>,
    pub quantity_pending: Option<u32>,
    pub quantity_canceled: Option<u32>,
    pub quantity_shipped: Option<u32>,
    pub quantity_delivered: Option<u32>,
    pub quantity_returned: Option<u32>,
    pub shipping_details: Option<ShippingDetails>,
    pub return_info: Option<ReturnInfo>,
    pub cancellations: Vec<CancellationRecord>,
    pub returns: Vec<ReturnRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipmentLineItem {
    pub line_item_id: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shipment {
    pub id: Option<String>,
    pub carrier: Option<String>,
    pub tracking_id: Option<String>,
    pub creation_date: Option<String>,
    pub delivery_date: Option<String>,
    pub status: Option<String>,
    pub line_items: Vec<ShipmentLineItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    pub id: Option<String>,
    pub merchant_id: Option<String>,
    pub merchant_order_id: Option<String>,
    pub status: Option<String>,
    pub acknowledged: Option<bool>,
    pub placed_date: Option<String>,
    pub payment_status: Option<String>,
    pub customer: Option<Customer>,
    pub net_price_amount: Option<Price>,
    pub shipping_cost: Option<Price>,
    pub shipping_cost_tax: Option<Price>,
    pub billing_address: Option<Address>,
    pub delivery_details: Option<DeliveryDetails>,
    pub line_items: Vec<LineItem>,
    pub shipments: Vec<Shipment>,
}

impl Order {
    pub fn line_item(&self, line_item_id: &str) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.id.as_deref() == Some(line_item_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrdersListResponse {
    pub kind: Option<String>,
    pub next_page_token: Option<String>,
    pub resources: Vec<Order>,
}

impl MerchantOrder for Order {
    type Line = LineItem;

    fn order_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }
}

impl OrderLine for LineItem {
    fn line_item_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_payload_deserializes() {
        let order: Order = serde_json::from_value(json!({
            "id": "TEST-7467-39-2793",
            "merchantId": "1234567",
            "merchantOrderId": "M-1",
            "status": "pendingShipment",
            "acknowledged": false,
            "netPriceAmount": { "value": "23.99", "currency": "USD" },
            "billingAddress": { "streetAddress": ["1 Main St", "Apt 2"], "locality": "Springfield" },
            "lineItems": [{
                "id": "3HAOTRA7HNCZEXP",
                "quantityOrdered": 2,
                "shippingDetails": {
                    "shipByDate": "2024-05-01T00:00:00Z",
                    "method": { "carrier": "UPS", "minDaysInTransit": 1, "maxDaysInTransit": 3 },
                    "type": "delivery"
                },
                "cancellations": [{ "actor": "merchant", "quantity": 1, "reason": "noInventory" }]
            }]
        }))
        .unwrap();

        assert_eq!(order.order_id(), Some("TEST-7467-39-2793"));
        assert_eq!(order.net_price_amount.as_ref().unwrap().to_string(), "23.99 USD");
        let billing = order.billing_address.as_ref().unwrap();
        assert_eq!(billing.street_line(1), Some("Apt 2"));
        assert_eq!(billing.street_line(2), None);

        let item = order.line_item("3HAOTRA7HNCZEXP").unwrap();
        assert_eq!(item.quantity_ordered, Some(2));
        let shipping = item.shipping_details.as_ref().unwrap();
        assert_eq!(shipping.shipping_type.as_deref(), Some("delivery"));
        assert_eq!(shipping.method.as_ref().unwrap().max_days_in_transit, Some(3));
        assert_eq!(item.cancellations[0].reason.as_deref(), Some("noInventory"));
        assert!(item.returns.is_empty());
        assert!(order.shipments.is_empty());
    }

    #[test]
    fn negative_days_to_return_still_decodes() {
        let item: LineItem = serde_json::from_value(json!({
            "id": "I-1",
            "returnInfo": { "isReturnable": false, "daysToReturn": -1 }
        }))
        .unwrap();

        assert_eq!(item.return_info.unwrap().days_to_return, Some(-1));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let result = serde_json::from_value::<LineItem>(json!({ "quantityOrdered": -1 }));
        assert!(result.is_err());
    }
}
