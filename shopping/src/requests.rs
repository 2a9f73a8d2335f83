//! Bodies of the mutating order calls. Each carries the operation id the
//! service uses to recognise a replayed request.

use crate::model::{LineItem, Order, Price, ShipmentLineItem};
use processing::{
    error::MissingFieldError,
    model::{ExecutionStatus, OperationId},
};
use serde::{Deserialize, Serialize};

pub const SHIPMENT_DELIVERED: &str = "delivered";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest {
    pub operation_id: OperationId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMerchantOrderIdRequest {
    pub merchant_order_id: String,
    pub operation_id: OperationId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelLineItemRequest {
    pub line_item_id: String,
    pub quantity: u32,
    pub reason: String,
    pub reason_text: String,
    pub operation_id: OperationId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentInfo {
    pub carrier: String,
    pub shipment_id: String,
    pub tracking_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipLineItemsRequest {
    pub line_items: Vec<ShipmentLineItem>,
    pub shipment_infos: Vec<ShipmentInfo>,
    pub operation_id: OperationId,
}

impl ShipLineItemsRequest {
    /// Ships the whole pending quantity of one line item with the carrier the
    /// customer picked at checkout.
    pub fn ship_all_pending(
        item: &LineItem,
        shipment_id: impl Into<String>,
        tracking_id: impl Into<String>,
        operation_id: OperationId,
    ) -> Result<Self, MissingFieldError> {
        let line_item_id = item
            .id
            .clone()
            .ok_or(MissingFieldError::new("line_items.id"))?;
        let carrier = item
            .shipping_details
            .as_ref()
            .ok_or(MissingFieldError::new("line_items.shipping_details"))?
            .method
            .as_ref()
            .and_then(|method| method.carrier.clone())
            .ok_or(MissingFieldError::new("line_items.shipping_details.method.carrier"))?;

        Ok(Self {
            line_items: vec![ShipmentLineItem {
                line_item_id: Some(line_item_id),
                quantity: Some(item.quantity_pending.unwrap_or_default()),
            }],
            shipment_infos: vec![ShipmentInfo {
                carrier,
                shipment_id: shipment_id.into(),
                tracking_id: tracking_id.into(),
            }],
            operation_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentRequest {
    pub shipment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    pub operation_id: OperationId,
}

impl UpdateShipmentRequest {
    pub fn delivered(shipment_id: impl Into<String>, operation_id: OperationId) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            status: Some(SHIPMENT_DELIVERED.to_string()),
            carrier: None,
            tracking_id: None,
            operation_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRefundLineItemRequest {
    pub line_item_id: String,
    pub quantity: u32,
    pub reason: String,
    pub reason_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_amount: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Price>,
    pub operation_id: OperationId,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionResponse {
    pub kind: Option<String>,
    pub execution_status: Option<ExecutionStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetByMerchantOrderIdResponse {
    pub kind: Option<String>,
    pub order: Option<Order>,
}
