#![allow(dead_code)]

use jose_rs::jwk::{Jwk, JwkFactory, Parameters};
use once_cell::sync::Lazy;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

/// 2048-bit RSA key, generated once per test binary.
pub static RSA_KEY: Lazy<Jwk> = Lazy::new(|| JwkFactory::create_rsa_key(2048, Parameters::default()).unwrap());

/// Sends the library's debug events to the test output.
pub fn init_tracing() {
    let tracing_layer = tracing_subscriber::fmt::layer().with_test_writer();
    let filter = filter::Targets::new()
        .with_target("jose_core", tracing::Level::DEBUG)
        .with_default(tracing::Level::INFO);

    // Only the first test of a binary installs the subscriber.
    let _ = tracing_subscriber::registry().with(tracing_layer).with(filter).try_init();
}

pub fn header(value: serde_json::Value) -> jose_rs::Header {
    value.as_object().cloned().unwrap_or_default()
}
