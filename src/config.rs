use std::env;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::reports::valid_days;

#[derive(Clone, Debug)]
pub struct Config {
    pub upstream_base_url: String,
    pub bind_addr: String,
    pub session_ttl: Duration,
    pub upstream_timeout: Duration,
    pub reports_default_days: u32,
    /// `None` keeps the built-in service list.
    pub booking_services: Option<Vec<String>>,
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let upstream_base_url = env::var("UPSTREAM_BASE_URL").context("UPSTREAM_BASE_URL must be set")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let session_ttl_minutes: u64 = parsed("SESSION_TTL_MINUTES", 60);
        let upstream_timeout_secs: u64 = parsed("UPSTREAM_TIMEOUT_SECS", 10);

        let reports_default_days: u32 = parsed("REPORTS_DEFAULT_DAYS", 30);
        if !valid_days(reports_default_days) {
            bail!("REPORTS_DEFAULT_DAYS must be between 1 and 365, got {reports_default_days}");
        }

        let booking_services = env::var("BOOKING_SERVICES")
            .ok()
            .map(|raw| parse_service_list(&raw))
            .filter(|list| !list.is_empty());

        Ok(Self {
            upstream_base_url,
            bind_addr,
            session_ttl: Duration::from_secs(session_ttl_minutes * 60),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            reports_default_days,
            booking_services,
        })
    }
}

/// `;`-separated names, blanks dropped.
fn parse_service_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
