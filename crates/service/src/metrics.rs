use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static STORE_READS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "user_store_reads_total",
        "Total user collection reads",
        &["backend"]
    )
    .expect("register user_store_reads_total")
});

pub static STORE_WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "user_store_writes_total",
        "Total user collection writes",
        &["backend"]
    )
    .expect("register user_store_writes_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "user_store_errors_total",
        "Total failed user store operations",
        &["backend", "op"]
    )
    .expect("register user_store_errors_total")
});

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    Lazy::force(&STORE_READS_TOTAL);
    Lazy::force(&STORE_WRITES_TOTAL);
    Lazy::force(&STORE_ERRORS_TOTAL);
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
