use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

use crate::models::{Action, Decision};

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static DECISIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static IMPERSONATION_EVENTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the metrics registry. Optional: when an embedding never calls
/// this, recording is a no-op.
pub fn init_metrics() {
    let registry = Registry::new();

    let decisions_total = match IntCounterVec::new(
        Opts::new("authz_decisions_total", "Total authorization decisions"),
        &["action", "outcome", "reason"],
    ) {
        Ok(metric) => metric,
        Err(e) => {
            tracing::error!("Failed to create authz_decisions_total metric: {}", e);
            panic!("Failed to initialize metrics: {}", e);
        }
    };

    let impersonation_events = match IntCounterVec::new(
        Opts::new(
            "authz_impersonation_events_total",
            "Test mode session lifecycle events",
        ),
        &["event"],
    ) {
        Ok(metric) => metric,
        Err(e) => {
            tracing::error!(
                "Failed to create authz_impersonation_events_total metric: {}",
                e
            );
            panic!("Failed to initialize metrics: {}", e);
        }
    };

    if let Err(e) = registry.register(Box::new(decisions_total.clone())) {
        tracing::error!("Failed to register authz_decisions_total collector: {}", e);
        panic!("Failed to initialize metrics: {}", e);
    }

    if let Err(e) = registry.register(Box::new(impersonation_events.clone())) {
        tracing::error!(
            "Failed to register authz_impersonation_events_total collector: {}",
            e
        );
        panic!("Failed to initialize metrics: {}", e);
    }

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = DECISIONS_TOTAL.set(decisions_total);
    let _ = IMPERSONATION_EVENTS_TOTAL.set(impersonation_events);
}

/// Render the registry in the Prometheus text format.
pub fn gather_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to convert metrics to UTF-8: {}", e);
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

pub(crate) fn observe_decision(action: Action, decision: &Decision) {
    if let Some(counter) = DECISIONS_TOTAL.get() {
        counter
            .with_label_values(&[action.as_str(), decision.outcome(), decision.reason_code()])
            .inc();
    }
}

pub(crate) fn observe_impersonation(event: &str) {
    if let Some(counter) = IMPERSONATION_EVENTS_TOTAL.get() {
        counter.with_label_values(&[event]).inc();
    }
}
