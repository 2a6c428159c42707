#![doc(test(attr(deny(warnings))))]

//! Onboard Core implements the multi-step onboarding flow engine used by
//! banking back-office tooling: step registries with per-step validation,
//! a persisted draft store, resumable navigation, and final submission to a
//! remote gateway with structured error surfacing.

pub mod confirm;
pub mod config;
pub mod errors;
pub mod flow;
pub mod flows;
pub mod gateway;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Onboard Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
