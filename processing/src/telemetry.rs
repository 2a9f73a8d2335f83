use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

pub const ORDERS_LISTED: &str = "orders_listed_total";
pub const LINE_ITEMS_PERSISTED: &str = "line_items_persisted_total";
pub const PERSISTENCE_FAILURES: &str = "persistence_failures_total";
pub const ORDERS_ACKNOWLEDGED: &str = "orders_acknowledged_total";
pub const ACKNOWLEDGE_FAILURES: &str = "acknowledge_failures_total";

pub fn describe_counters() {
    metrics::describe_counter!(ORDERS_LISTED, "Orders returned by the unacknowledged listing");
    metrics::describe_counter!(LINE_ITEMS_PERSISTED, "Line items written by the stored procedure");
    metrics::describe_counter!(PERSISTENCE_FAILURES, "Line items the stored procedure did not take");
    metrics::describe_counter!(ORDERS_ACKNOWLEDGED, "Orders acknowledged with the remote service");
    metrics::describe_counter!(ACKNOWLEDGE_FAILURES, "Acknowledge calls that failed or could not be made");
}

/// Installs a process-wide Prometheus recorder so the sync counters are kept.
///
/// Returns `None` when another recorder is already installed; the counters
/// then go to that recorder instead.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_counters();
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Metrics recorder not installed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn described_counters_render_with_help_text() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_counters();
            metrics::counter!(ORDERS_ACKNOWLEDGED).increment(2);
        });

        let rendered = handle.render();
        assert!(rendered.contains("# HELP orders_acknowledged_total"));
        assert!(rendered.contains("orders_acknowledged_total 2"));
    }
}
