//! Flattening of an order line into the stored procedure's named parameters.

use crate::model::{LineItem, Order, Price};
use processing::error::MissingFieldError;
use std::fmt::Write;

/// Every parameter is declared `varchar(100)` on the database side.
pub const PARAMETER_MAX_LEN: usize = 100;

pub const PARAMETER_COUNT: usize = 33;

/// One `CALL` of the order dump procedure, parameters in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProcedureCall {
    params: Vec<(&'static str, Option<String>)>,
}

fn require<'a, T>(value: &'a Option<T>, field: &'static str) -> Result<&'a T, MissingFieldError> {
    value.as_ref().ok_or(MissingFieldError::new(field))
}

fn truncate(value: &str) -> String {
    value.chars().take(PARAMETER_MAX_LEN).collect()
}

impl StoredProcedureCall {
    /// Fails on the first required nested object that is absent; absent
    /// scalar fields bind as `NULL`.
    pub fn for_line_item(order: &Order, item: &LineItem) -> Result<Self, MissingFieldError> {
        let customer = require(&order.customer, "customer")?;
        let net_price = require(&order.net_price_amount, "net_price_amount")?;
        let shipping_cost = require(&order.shipping_cost, "shipping_cost")?;
        let shipping_cost_tax = require(&order.shipping_cost_tax, "shipping_cost_tax")?;
        let product = require(&item.product, "line_items.product")?;
        let price = require(&item.price, "line_items.price")?;
        let tax = require(&item.tax, "line_items.tax")?;
        let shipping = require(&item.shipping_details, "line_items.shipping_details")?;
        let method = require(&shipping.method, "line_items.shipping_details.method")?;
        let billing = require(&order.billing_address, "billing_address")?;

        let mut call = Self {
            params: Vec::with_capacity(PARAMETER_COUNT),
        };

        call.text("order_id", order.id.as_deref());
        call.text("order_status", order.status.as_deref());
        call.text("order_merchant_id", order.merchant_id.as_deref());
        call.text("order_merchant_order_id", order.merchant_order_id.as_deref());
        call.text("order_customer_full_name", customer.full_name.as_deref());
        call.text("order_placed_date", order.placed_date.as_deref());
        call.price("order_net_price_amount_value", "order_net_price_amount_currency", net_price);
        call.text("order_payment_status", order.payment_status.as_deref());
        call.price("order_shipping_cost_value", "order_shipping_cost_currency", shipping_cost);
        call.price(
            "order_shipping_cost_tax_value",
            "order_shipping_cost_tax_currency",
            shipping_cost_tax,
        );

        call.text("item_id", item.id.as_deref());
        call.text("item_product_id", product.id.as_deref());
        call.text("item_product_title", product.title.as_deref());
        call.price("item_price_value", "item_price_currency", price);
        call.price("item_tax_value", "item_tax_currency", tax);
        call.text("item_shipping_details_ship_by_date", shipping.ship_by_date.as_deref());
        call.text("item_shipping_details_deliver_by_date", shipping.deliver_by_date.as_deref());
        call.text("item_shipping_details_method_carrier", method.carrier.as_deref());
        call.text("item_shipping_details_method_method_name", method.method_name.as_deref());
        call.number("item_shipping_details_method_min_days_in_transit", method.min_days_in_transit);
        call.number("item_shipping_details_method_max_days_in_transit", method.max_days_in_transit);
        call.number("item_quantity_ordered", item.quantity_ordered);

        call.text("shipping_address", billing.street_line(0));
        call.text("shipping_address2", billing.street_line(1));
        call.text("shipping_city", billing.locality.as_deref());
        call.text("shipping_state", billing.region.as_deref());
        call.text("shipping_zip", billing.postal_code.as_deref());
        call.text("shipping_country", billing.country.as_deref());

        Ok(call)
    }

    fn text(&mut self, name: &'static str, value: Option<&str>) {
        self.params.push((name, value.map(truncate)));
    }

    fn number(&mut self, name: &'static str, value: Option<u32>) {
        self.params.push((name, value.map(|n| n.to_string())));
    }

    fn price(&mut self, value_name: &'static str, currency_name: &'static str, price: &Price) {
        self.text(value_name, price.value.as_deref());
        self.text(currency_name, price.currency.as_deref());
    }

    pub fn params(&self) -> &[(&'static str, Option<String>)] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(param, _)| *param == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// `CALL <procedure>(name => $1, ...)` in named notation.
    ///
    /// `procedure` must already be validated as a plain identifier.
    pub fn sql(&self, procedure: &str) -> String {
        let mut sql = format!("CALL {}(", procedure);
        for (index, (name, _)) in self.params.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "{} => ${}", name, index + 1);
        }
        sql.push(')');
        sql
    }
}
