use crate::types::donation::{Donation, from_cents};
use chrono::{DateTime, Utc};

/// One row of the `donations` table.
#[derive(Debug, Clone, PartialEq)]
pub struct DbDonation {
    pub id: i64,
    pub donor_name: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub crm_synced: bool,
    pub crm_response: String,
}

impl From<DbDonation> for Donation {
    fn from(d: DbDonation) -> Self {
        Donation {
            id: d.id,
            donor_name: d.donor_name,
            amount: from_cents(d.amount_cents),
            date: d.date,
            crm_synced: d.crm_synced,
            crm_response: d.crm_response,
        }
    }
}
