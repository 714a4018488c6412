#![doc(test(attr(deny(warnings))))]

//! Bilancio Core offers the expense classification, billing-cycle
//! estimation, and monthly budget forecasting primitives that power
//! household finance dashboards and CLIs.

pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forecast;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bilancio Core tracing initialized.");
    });
}
