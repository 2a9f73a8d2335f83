use crate::model::{LineItem, LineItemEvent, Order};
use processing::printer::OrderPrinter;
use std::fmt::{self, Display, Formatter};

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn optional<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Multi-line, human-readable rendering of an order with its line items and shipments.
pub struct OrderReport<'a>(pub &'a Order);

/// One line item, indented to sit under its order.
pub struct LineItemReport<'a>(pub &'a LineItem);

impl Display for OrderReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let order = self.0;

        writeln!(f, "Order {}:", text(&order.id))?;
        writeln!(f, "- Status: {}", text(&order.status))?;
        writeln!(f, "- Merchant: {}", text(&order.merchant_id))?;
        writeln!(f, "- Merchant order ID: {}", text(&order.merchant_order_id))?;

        if let Some(address) = order.delivery_details.as_ref().and_then(|d| d.address.as_ref()) {
            for line in &address.street_address {
                writeln!(f, "- Ship address: {}", line)?;
            }
            writeln!(f, "- Ship city: {}", text(&address.locality))?;
            writeln!(f, "- Ship state: {}", text(&address.region))?;
            writeln!(f, "- Ship zip: {}", text(&address.postal_code))?;
            writeln!(f, "- Ship country: {}", text(&address.country))?;
        }

        if let Some(customer) = &order.customer {
            writeln!(f, "- Customer information:")?;
            writeln!(f, "  - Full name: {}", text(&customer.full_name))?;
            if let Some(email) = customer
                .marketing_rights_info
                .as_ref()
                .and_then(|info| info.marketing_email_address.as_deref())
            {
                writeln!(f, "  - Email: {}", email)?;
            }
        }

        writeln!(f, "- Placed on date: {}", text(&order.placed_date))?;
        if let Some(net) = &order.net_price_amount {
            writeln!(f, "- Net amount: {}", net)?;
        }
        writeln!(f, "- Payment status: {}", text(&order.payment_status))?;
        writeln!(
            f,
            "- Acknowledged: {}",
            if order.acknowledged == Some(true) { "yes" } else { "no" }
        )?;

        if !order.line_items.is_empty() {
            writeln!(f, "- {} line item(s):", order.line_items.len())?;
            for item in &order.line_items {
                write!(f, "{}", LineItemReport(item))?;
            }
        }

        if let Some(cost) = &order.shipping_cost {
            writeln!(f, "- Shipping cost: {}", cost)?;
        }
        if let Some(tax) = &order.shipping_cost_tax {
            writeln!(f, "- Shipping cost tax: {}", tax)?;
        }

        if !order.shipments.is_empty() {
            writeln!(f, "- {} shipment(s):", order.shipments.len())?;
            for shipment in &order.shipments {
                writeln!(f, "  Shipment {}", text(&shipment.id))?;
                writeln!(f, "  - Creation date: {}", text(&shipment.creation_date))?;
                writeln!(f, "  - Carrier: {}", text(&shipment.carrier))?;
                writeln!(f, "  - Tracking ID: {}", text(&shipment.tracking_id))?;
                if !shipment.line_items.is_empty() {
                    writeln!(f, "  - {} line item(s):", shipment.line_items.len())?;
                    for item in &shipment.line_items {
                        writeln!(
                            f,
                            "    {} of item {}",
                            optional(&item.quantity),
                            text(&item.line_item_id)
                        )?;
                    }
                }
                if let Some(delivered) = &shipment.delivery_date {
                    writeln!(f, "  - Delivery date: {}", delivered)?;
                }
            }
        }

        Ok(())
    }
}

impl Display for LineItemReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let item = self.0;

        writeln!(f, "  Line item: {}", text(&item.id))?;
        if let Some(product) = &item.product {
            writeln!(f, "  - Product: {} ({})", text(&product.id), text(&product.title))?;
        }
        if let Some(price) = &item.price {
            writeln!(f, "  - Price: {}", price)?;
        }
        if let Some(tax) = &item.tax {
            writeln!(f, "  - Tax: {}", tax)?;
        }

        if let Some(shipping) = &item.shipping_details {
            writeln!(f, "  - Ship by date: {}", text(&shipping.ship_by_date))?;
            writeln!(f, "  - Deliver by date: {}", text(&shipping.deliver_by_date))?;
            if let Some(method) = &shipping.method {
                writeln!(
                    f,
                    "  - Deliver via {} {} ({} - {} days)",
                    text(&method.carrier),
                    text(&method.method_name),
                    optional(&method.min_days_in_transit),
                    optional(&method.max_days_in_transit)
                )?;
            }
        }

        match &item.return_info {
            Some(info) if info.is_returnable == Some(true) => {
                writeln!(f, "  - Item is returnable.")?;
                writeln!(f, "    - Days to return: {}", optional(&info.days_to_return))?;
                writeln!(f, "    - Return policy is at {}.", text(&info.policy_url))?;
            }
            _ => writeln!(f, "  - Item is not returnable.")?,
        }

        write_if_nonzero(f, "Quantity Ordered", item.quantity_ordered)?;
        write_if_nonzero(f, "Quantity Pending", item.quantity_pending)?;
        write_if_nonzero(f, "Quantity Canceled", item.quantity_canceled)?;
        write_if_nonzero(f, "Quantity Shipped", item.quantity_shipped)?;
        write_if_nonzero(f, "Quantity Delivered", item.quantity_delivered)?;
        write_if_nonzero(f, "Quantity Returned", item.quantity_returned)?;

        write_events(f, "cancellation(s)", "Cancellation", &item.cancellations)?;
        write_events(f, "return(s)", "Return", &item.returns)?;
        Ok(())
    }
}

fn write_if_nonzero(f: &mut Formatter<'_>, label: &str, quantity: Option<u32>) -> fmt::Result {
    match quantity {
        Some(n) if n > 0 => writeln!(f, "  - {}: {}", label, n),
        _ => Ok(()),
    }
}

fn write_events(
    f: &mut Formatter<'_>,
    plural: &str,
    heading: &str,
    events: &[LineItemEvent],
) -> fmt::Result {
    if events.is_empty() {
        return Ok(());
    }
    writeln!(f, "  - {} {}:", events.len(), plural)?;
    for event in events {
        writeln!(f, "    {}:", heading)?;
        if let Some(actor) = &event.actor {
            writeln!(f, "    - Actor: {}", actor)?;
        }
        writeln!(f, "    - Creation date: {}", text(&event.creation_date))?;
        writeln!(f, "    - Quantity: {}", optional(&event.quantity))?;
        writeln!(f, "    - Reason: {}", text(&event.reason))?;
        writeln!(f, "    - Reason text: {}", text(&event.reason_text))?;
    }
    Ok(())
}

/// Writes reports to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrinter;

const RULE: &str = "=================================================================";

impl ConsolePrinter {
    pub fn banner(&self, title: &str) {
        println!("{RULE}");
        println!("{title}");
        println!("{RULE}");
    }
}

impl OrderPrinter<Order> for ConsolePrinter {
    fn print_order(&self, order: &Order) {
        println!();
        print!("{}", OrderReport(order));
    }

    fn print_message(&self, message: &str) {
        println!("{message}");
    }
}
