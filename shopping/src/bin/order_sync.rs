use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use processing::{
    executable_utils::{DEFAULT_CONFIG_PATH, initialize_executable, wait_for_keypress},
    model::ExecutionStatus,
    operation_id::generator_for,
    processor::OrderSync,
    telemetry,
};

use shopping::{
    client::ContentApiClient,
    model::Order,
    persister::StoredProcedurePersister,
    printer::{ConsolePrinter, OrderReport},
    requests::{
        CancelLineItemRequest, ReturnRefundLineItemRequest, ShipLineItemsRequest,
        UpdateMerchantOrderIdRequest, UpdateShipmentRequest,
    },
};

#[derive(Parser)]
#[command(name = "order-sync", about = "Dump and acknowledge unacknowledged Content API orders")]
struct Cli {
    /// Merged YAML config written by the build script
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List unacknowledged orders, persist their line items and acknowledge them (default)
    Sync,
    /// Print one order
    Get { order_id: String },
    /// Print the order carrying a merchant-assigned id
    GetByMerchantId { merchant_order_id: String },
    UpdateMerchantOrderId {
        order_id: String,
        merchant_order_id: String,
    },
    CancelLineItem {
        order_id: String,
        line_item_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, default_value = "noInventory")]
        reason: String,
        #[arg(long, default_value = "Ran out of inventory while fulfilling request.")]
        reason_text: String,
    },
    /// Ship the whole pending quantity of a line item with its checkout carrier
    ShipLineItem {
        order_id: String,
        line_item_id: String,
        shipment_id: String,
        tracking_id: String,
    },
    MarkDelivered {
        order_id: String,
        shipment_id: String,
    },
    ReturnLineItem {
        order_id: String,
        line_item_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, default_value = "productArrivedDamaged")]
        reason: String,
        #[arg(long, default_value = "Item broken at receipt.")]
        reason_text: String,
    },
}

fn finished(status: ExecutionStatus) {
    println!("Finished with status {}.", status);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    println!("Starting order sync...");
    let config = initialize_executable(&cli.config).context("failed to initialize")?;

    let merchant_id = config.sync.merchant_id;
    let client = Arc::new(
        ContentApiClient::new(&config.content_api).context("failed to build Content API client")?,
    );
    let operation_ids = generator_for(config.sync.operation_ids);
    let printer = ConsolePrinter;

    match cli.command.unwrap_or(Command::Sync) {
        Command::Sync => {
            let persister = StoredProcedurePersister::from_config(
                &config.common.database_url,
                &config.persister,
            )
            .context("invalid persister configuration")?;

            printer.banner("Order sync");
            let sync = OrderSync::<Order>::new(
                &config.sync,
                config.content_api.max_results,
                client,
                Arc::new(persister),
                Arc::new(printer),
                operation_ids,
            );
            let metrics = telemetry::install_recorder();
            let report = sync.run().await;
            if let Some(failure) = &report.listing_error {
                eprintln!("Listing stopped early: {}", failure.message);
            }
            if let Some(handle) = metrics {
                tracing::info!("Run metrics:\n{}", handle.render());
            }
        }
        Command::Get { order_id } => {
            let order = client.get_order(merchant_id, &order_id).await?;
            print!("{}", OrderReport(&order));
        }
        Command::GetByMerchantId { merchant_order_id } => {
            let order = client
                .get_order_by_merchant_order_id(merchant_id, &merchant_order_id)
                .await?;
            print!("{}", OrderReport(&order));
        }
        Command::UpdateMerchantOrderId {
            order_id,
            merchant_order_id,
        } => {
            let request = UpdateMerchantOrderIdRequest {
                merchant_order_id,
                operation_id: operation_ids.next_id(),
            };
            finished(client.update_merchant_order_id(merchant_id, &order_id, &request).await?);
        }
        Command::CancelLineItem {
            order_id,
            line_item_id,
            quantity,
            reason,
            reason_text,
        } => {
            let request = CancelLineItemRequest {
                line_item_id,
                quantity,
                reason,
                reason_text,
                operation_id: operation_ids.next_id(),
            };
            finished(client.cancel_line_item(merchant_id, &order_id, &request).await?);
        }
        Command::ShipLineItem {
            order_id,
            line_item_id,
            shipment_id,
            tracking_id,
        } => {
            let order = client.get_order(merchant_id, &order_id).await?;
            let item = order
                .line_item(&line_item_id)
                .ok_or_else(|| anyhow!("order {order_id} has no line item {line_item_id}"))?;
            let request = ShipLineItemsRequest::ship_all_pending(
                item,
                shipment_id,
                tracking_id,
                operation_ids.next_id(),
            )?;
            finished(client.ship_line_items(merchant_id, &order_id, &request).await?);
        }
        Command::MarkDelivered {
            order_id,
            shipment_id,
        } => {
            let request = UpdateShipmentRequest::delivered(shipment_id, operation_ids.next_id());
            finished(client.update_shipment(merchant_id, &order_id, &request).await?);
        }
        Command::ReturnLineItem {
            order_id,
            line_item_id,
            quantity,
            reason,
            reason_text,
        } => {
            let request = ReturnRefundLineItemRequest {
                line_item_id,
                quantity,
                reason,
                reason_text,
                price_amount: None,
                tax_amount: None,
                operation_id: operation_ids.next_id(),
            };
            finished(client.return_refund_line_item(merchant_id, &order_id, &request).await?);
        }
    }

    if config.sync.wait_for_keypress {
        wait_for_keypress().await?;
    }

    Ok(())
}
