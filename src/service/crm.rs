use crate::types::Donation;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

/// Donations above this amount are accepted by the mock CRM.
pub const MIN_SYNC_AMOUNT: Decimal = Decimal::ONE_HUNDRED;

/// Result of one sync attempt. Gateways report failures here instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmOutcome {
    pub success: bool,
    pub message: String,
}

impl CrmOutcome {
    pub fn synced(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Pushes a stored donation to an external CRM.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    async fn send_to_crm(&self, donation: &Donation) -> CrmOutcome;
}

fn synced_message(donation: &Donation, external_id: &str) -> String {
    format!(
        "Successfully synced donation ID {} for ${} to Dynamics 365. External ID: {}",
        donation.id, donation.amount, external_id
    )
}

/// Deterministic stand-in for a CRM: accepts amounts strictly above 100.00.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCrmGateway;

#[async_trait]
impl CrmGateway for MockCrmGateway {
    async fn send_to_crm(&self, donation: &Donation) -> CrmOutcome {
        if donation.amount > MIN_SYNC_AMOUNT {
            let message = synced_message(donation, &Uuid::new_v4().to_string());
            info!(id = donation.id, "CRM sync succeeded: {message}");
            CrmOutcome::synced(message)
        } else {
            let message = format!(
                "CRM Validation Error: Donation amount ${} is below minimum threshold for sync.",
                donation.amount
            );
            warn!(id = donation.id, "CRM sync rejected: {message}");
            CrmOutcome::failed(message)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrmAck {
    external_id: Option<String>,
}

/// Gateway for a real CRM reachable over HTTP. The donation is POSTed as JSON;
/// any 2xx counts as synced.
#[derive(Clone)]
pub struct HttpCrmGateway {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpCrmGateway {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent("donation-tracker/0.1")
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl CrmGateway for HttpCrmGateway {
    async fn send_to_crm(&self, donation: &Donation) -> CrmOutcome {
        let resp = match self
            .client
            .post(self.endpoint.clone())
            .json(donation)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(id = donation.id, error = %e, "CRM request failed");
                return CrmOutcome::failed(format!("CRM request failed: {e}"));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!(id = donation.id, %status, "CRM rejected donation");
            return CrmOutcome::failed(format!("CRM rejected donation with status {status}"));
        }

        let external_id = resp
            .json::<CrmAck>()
            .await
            .ok()
            .and_then(|ack| ack.external_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let message = synced_message(donation, &external_id);
        info!(id = donation.id, "CRM sync succeeded: {message}");
        CrmOutcome::synced(message)
    }
}
