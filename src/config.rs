// config.rs
use std::time::Duration;

use anyhow::Result;
use ::config::Environment;
use serde::Deserialize;
use webhook_verifier::{
    Configuration, DEFAULT_BODY_LIMIT, DEFAULT_SIGNATURE_HEADER, DEFAULT_TIMESTAMP_HEADER,
    DEFAULT_TOLERANCE,
};

/// Receiver settings, read from an optional `webhook-verifier.{toml,yaml,json}`
/// file and `VERIFIER_*` environment variables (environment wins).
///
/// Environment values are kept as strings until deserialized, so a secret
/// such as `007` is not read as a number.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub secret: Option<String>,
    pub signature_header: String,
    pub timestamp_header: String,
    pub tolerance_secs: u64,
    pub bind_address: String,
    pub body_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Environment::with_prefix("VERIFIER"))
    }

    fn load_from(environment: Environment) -> Result<Self> {
        let settings = ::config::Config::builder()
            .set_default("signature_header", DEFAULT_SIGNATURE_HEADER)?
            .set_default("timestamp_header", DEFAULT_TIMESTAMP_HEADER)?
            .set_default("tolerance_secs", DEFAULT_TOLERANCE.as_secs())?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("body_limit", DEFAULT_BODY_LIMIT as u64)?
            .add_source(::config::File::with_name("webhook-verifier").required(false))
            .add_source(environment)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn verification(&self) -> Configuration {
        let mut config = Configuration::new()
            .with_signature_header_name(&self.signature_header)
            .with_timestamp_header_name(&self.timestamp_header)
            .with_tolerance(Duration::from_secs(self.tolerance_secs));
        if let Some(secret) = &self.secret {
            config.set_secret(secret.as_bytes());
        }
        config
    }
}
