use crate::db::DonationStorage;
use crate::error::DonationError;
use crate::service::crm::CrmGateway;
use crate::types::{Donation, NewDonation};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

/// Creates donations and records the outcome of their CRM sync.
#[derive(Clone)]
pub struct DonationService {
    storage: DonationStorage,
    crm: Arc<dyn CrmGateway>,
}

impl DonationService {
    pub fn new(storage: DonationStorage, crm: Arc<dyn CrmGateway>) -> Self {
        Self { storage, crm }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &DonationStorage {
        &self.storage
    }

    /// Validate, insert as Pending, sync with the CRM, then persist the outcome.
    ///
    /// The two writes are not wrapped in a transaction: if the second one fails
    /// the donation stays stored as Pending and the error is returned.
    pub async fn create_donation(&self, new: NewDonation) -> Result<Donation, DonationError> {
        let pending = new.validate(Utc::now())?;

        let mut donation = self.storage.insert(pending).await?;
        info!(id = donation.id, amount = %donation.amount, "donation recorded as pending");

        let outcome = self.crm.send_to_crm(&donation).await;
        donation.crm_synced = outcome.success;
        donation.crm_response = outcome.message;

        if let Err(e) = self.storage.update(&donation).await {
            error!(
                id = donation.id,
                error = %e,
                "failed to persist CRM outcome; donation left pending"
            );
            return Err(e);
        }

        info!(id = donation.id, synced = donation.crm_synced, "donation sync recorded");
        Ok(donation)
    }

    pub async fn list_donations(&self) -> Result<Vec<Donation>, DonationError> {
        self.storage.list_all().await
    }
}
