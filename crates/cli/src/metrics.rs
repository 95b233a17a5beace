//! Prometheus metrics for the command line shell.
//!
//! Core collectors (batch runner, backend requests) are registered next to
//! the shell's own command counter so `--print-metrics` shows one exposition.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

/// Metrics registry for this process.
static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Commands run, by command and result.
static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("triage_cli_commands_total", "Total CLI commands run"),
        &["command", "result"], // result: "success", "failure"
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    let collectors = triage_core::metrics::all_metrics()
        .into_iter()
        .chain(std::iter::once(
            Box::new(COMMANDS_TOTAL.clone()) as Box<dyn prometheus::core::Collector>
        ));

    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            warn!(error = %e, "Failed to register metric");
        }
    }
}

pub fn record_command(command: &str, success: bool) {
    let result = if success { "success" } else { "failure" };
    COMMANDS_TOTAL.with_label_values(&[command, result]).inc();
}

/// Encode every registered metric in the Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output was not UTF-8")
}
