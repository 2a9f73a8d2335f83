use crate::model::MerchantOrder;

/// Human-readable console output. Nothing downstream parses it.
pub trait OrderPrinter<O: MerchantOrder>: Send + Sync {
    fn print_order(&self, order: &O);

    fn print_message(&self, message: &str);
}
