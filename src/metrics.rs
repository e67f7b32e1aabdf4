//! Prometheus metrics collection for autopurge.
//!
//! Exposed on the optional HTTP endpoint. Recording functions are no-ops
//! until [`init`] has run, so library users and tests never need a registry.
//!
//! - `autopurge_bootstrap_total{outcome}` - Bootstrap attempts by outcome
//! - `autopurge_purges_total{trigger,result}` - Purges by trigger and result
//! - `autopurge_items_removed_total{data_type}` - Removed items per data type
//! - `autopurge_purge_duration_seconds{trigger}` - Purge latency histogram
//! - `autopurge_listeners_registered` - Active event listeners (gauge)

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

pub static BOOTSTRAP_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub static PURGES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

pub static ITEMS_REMOVED: OnceLock<IntCounterVec> = OnceLock::new();

pub static PURGE_DURATION: OnceLock<HistogramVec> = OnceLock::new();

pub static LISTENERS_REGISTERED: OnceLock<IntGauge> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup, before bootstrapping.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(BOOTSTRAP_TOTAL, IntCounterVec::new(Opts::new("autopurge_bootstrap_total", "Bootstrap attempts by outcome"), &["outcome"]));
    register!(PURGES_TOTAL, IntCounterVec::new(Opts::new("autopurge_purges_total", "Purges by trigger and result"), &["trigger", "result"]));
    register!(ITEMS_REMOVED, IntCounterVec::new(Opts::new("autopurge_items_removed_total", "Removed browsing data items per data type"), &["data_type"]));
    register!(PURGE_DURATION, HistogramVec::new(
        HistogramOpts::new("autopurge_purge_duration_seconds", "Purge latency by trigger")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        &["trigger"]));
    register!(LISTENERS_REGISTERED, IntGauge::new("autopurge_listeners_registered", "Active event listeners"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

#[inline]
pub fn record_bootstrap(outcome: &str) {
    if let Some(c) = BOOTSTRAP_TOTAL.get() {
        c.with_label_values(&[outcome]).inc();
    }
}

#[inline]
pub fn record_purge(trigger: &str, result: &str, duration_secs: f64) {
    if let Some(c) = PURGES_TOTAL.get() {
        c.with_label_values(&[trigger, result]).inc();
    }
    if let Some(h) = PURGE_DURATION.get() {
        h.with_label_values(&[trigger]).observe(duration_secs);
    }
}

#[inline]
pub fn record_removed(data_type: &str, count: usize) {
    if let Some(c) = ITEMS_REMOVED.get() {
        c.with_label_values(&[data_type]).inc_by(count as u64);
    }
}

#[inline]
pub fn set_listeners(count: usize) {
    if let Some(g) = LISTENERS_REGISTERED.get() {
        g.set(count as i64);
    }
}
