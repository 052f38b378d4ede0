#![doc(test(attr(deny(warnings))))]

//! Trainer Ledger tracks a freelance trainer's courses, their dated sessions
//! and standalone adjustments, and derives income, tax and workload figures
//! for any period of months.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Trainer Ledger tracing initialized.");
    });
}
