//! Best-effort ISP label lookup.
//!
//! The label is decorative: every failure collapses to the configured
//! fallback and nothing else waits on the result.

use crate::core::app_state::SharedIspLabel;
use crate::core::config::IspLookupConfig;
use crate::core::error::{Result, ResultExt, SpeedGaugeError};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// What the lookup service told us about the connection
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IspInfo {
    #[serde(rename = "org", default)]
    pub organization: Option<String>,
}

/// Injected capability returning the organization behind the public IP
pub trait IspLookup {
    fn lookup(&self) -> impl Future<Output = Result<IspInfo>> + Send;
}

/// Queries an ipapi-style JSON endpoint
pub struct HttpIspLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIspLookup {
    pub fn new(config: &IspLookupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .user_agent(concat!("speedgauge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint: config.endpoint.clone() })
    }
}

impl IspLookup for HttpIspLookup {
    async fn lookup(&self) -> Result<IspInfo> {
        debug!("Querying ISP info from {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(SpeedGaugeError::LookupFailed(format!(
                "{} returned status {}",
                self.endpoint,
                response.status()
            )));
        }

        Ok(response.json::<IspInfo>().await?)
    }
}

/// Fixed answer, used when the lookup is disabled and in tests
pub struct StaticIspLookup {
    organization: Option<String>,
}

impl StaticIspLookup {
    pub fn new(organization: Option<String>) -> Self {
        Self { organization }
    }
}

impl IspLookup for StaticIspLookup {
    async fn lookup(&self) -> Result<IspInfo> {
        Ok(IspInfo { organization: self.organization.clone() })
    }
}

/// Resolves a display label; never fails
pub async fn resolve_isp_label<L: IspLookup>(lookup: &L, fallback: &str) -> String {
    let info = lookup.lookup().await.log_and_continue(IspInfo::default());
    match info.organization.map(|org| org.trim().to_string()) {
        Some(org) if !org.is_empty() => org,
        _ => fallback.to_string(),
    }
}

/// Fire-and-forget startup task writing the resolved label into `label`
pub fn spawn_isp_refresh<L>(lookup: L, label: SharedIspLabel, fallback: String) -> JoinHandle<()>
where
    L: IspLookup + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let resolved = resolve_isp_label(&lookup, &fallback).await;
        info!("ISP label: {}", resolved);
        *label.write().await = resolved;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLookup;

    impl IspLookup for FailingLookup {
        async fn lookup(&self) -> Result<IspInfo> {
            Err(SpeedGaugeError::LookupFailed("offline".to_string()))
        }
    }

    #[test]
    fn decodes_org_field() {
        let info: IspInfo = serde_json::from_str(r#"{"ip":"1.2.3.4","org":"AS55836 Reliance Jio"}"#).unwrap();
        assert_eq!(info.organization.as_deref(), Some("AS55836 Reliance Jio"));

        let info: IspInfo = serde_json::from_str(r#"{"ip":"1.2.3.4"}"#).unwrap();
        assert_eq!(info.organization, None);
    }

    #[tokio::test]
    async fn failure_falls_back() {
        assert_eq!(resolve_isp_label(&FailingLookup, "Local ISP").await, "Local ISP");
    }

    #[tokio::test]
    async fn blank_org_falls_back() {
        let lookup = StaticIspLookup::new(Some("   ".to_string()));
        assert_eq!(resolve_isp_label(&lookup, "Local ISP").await, "Local ISP");
    }
}
