//! Prometheus metrics setup and metric definitions

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const ACCESS_DECISIONS_TOTAL: &str = "pms_access_decisions_total";
pub const SERVICE_OPERATIONS_TOTAL: &str = "pms_service_operations_total";

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Register metric descriptions and emit initial zero values so Prometheus
/// output includes HELP/TYPE lines from startup.
pub fn describe_metrics() {
    describe_counter!(
        ACCESS_DECISIONS_TOTAL,
        "Access-control decisions by policy action and outcome"
    );
    describe_counter!(
        SERVICE_OPERATIONS_TOTAL,
        "Project/task/team service operations by resource, operation and result"
    );

    counter!(ACCESS_DECISIONS_TOTAL, "action" => "project_use", "outcome" => "allow").absolute(0);
    counter!(ACCESS_DECISIONS_TOTAL, "action" => "project_use", "outcome" => "deny").absolute(0);
    counter!(
        SERVICE_OPERATIONS_TOTAL,
        "resource" => "task",
        "operation" => "create",
        "result" => "success"
    )
    .absolute(0);
}

/// Count one access decision
pub fn record_decision(action: &'static str, allowed: bool) {
    let outcome = if allowed { "allow" } else { "deny" };
    counter!(ACCESS_DECISIONS_TOTAL, "action" => action, "outcome" => outcome).increment(1);
}

/// Count one service operation
pub fn record_operation(resource: &'static str, operation: &'static str, success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!(
        SERVICE_OPERATIONS_TOTAL,
        "resource" => resource,
        "operation" => operation,
        "result" => result
    )
    .increment(1);
}
