use crate::error::DonationError;
use chrono::{DateTime, Datelike, SubsecRound, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// `crm_response` of a donation whose sync attempt has not completed yet.
pub const PENDING: &str = "Pending";

pub const MAX_DONOR_NAME_LEN: usize = 100;

/// Dates are stored as four-digit-year RFC 3339 text.
const DATE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// A persisted donation, as exposed over the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    pub donor_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub crm_synced: bool,
    pub crm_response: String,
}

impl Donation {
    /// Amount in whole cents.
    pub fn amount_cents(&self) -> Option<i64> {
        to_cents(self.amount)
    }
}

/// Body of `POST /donations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl NewDonation {
    pub fn new(donor_name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            donor_name: Some(donor_name.into()),
            amount: Some(amount),
            date: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Check field constraints and normalise into a pending donation.
    /// A missing `date` becomes `now`.
    pub fn validate(self, now: DateTime<Utc>) -> Result<PendingDonation, DonationError> {
        let donor_name = self
            .donor_name
            .ok_or_else(|| DonationError::validation("donorName", "donorName is required"))?;
        if donor_name.trim().is_empty() {
            return Err(DonationError::validation(
                "donorName",
                "donorName must not be empty",
            ));
        }
        if donor_name.chars().count() > MAX_DONOR_NAME_LEN {
            return Err(DonationError::validation(
                "donorName",
                format!("donorName must be at most {MAX_DONOR_NAME_LEN} characters"),
            ));
        }

        let amount = self
            .amount
            .ok_or_else(|| DonationError::validation("amount", "amount is required"))?;
        let amount_cents = to_cents(amount)
            .ok_or_else(|| DonationError::validation("amount", "amount is too large"))?;
        if amount_cents <= 0 {
            return Err(DonationError::validation(
                "amount",
                "amount must be greater than 0",
            ));
        }

        let date = self.date.unwrap_or(now);
        if !DATE_YEARS.contains(&date.year()) {
            return Err(DonationError::validation(
                "date",
                "date year must be between 0000 and 9999",
            ));
        }

        Ok(PendingDonation {
            donor_name,
            amount_cents,
            date: date.trunc_subsecs(6),
        })
    }
}

/// A validated donation that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDonation {
    pub donor_name: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
}

impl PendingDonation {
    /// The stored form once the store has assigned `id`.
    pub fn into_donation(self, id: i64) -> Donation {
        Donation {
            id,
            donor_name: self.donor_name,
            amount: from_cents(self.amount_cents),
            date: self.date,
            crm_synced: false,
            crm_response: PENDING.to_string(),
        }
    }
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Round half away from zero to two places and express in cents.
pub fn to_cents(amount: Decimal) -> Option<i64> {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn field_of(err: DonationError) -> &'static str {
        match err {
            DonationError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = NewDonation::new("", dec!(50.00)).validate(now()).unwrap_err();
        assert_eq!(field_of(err), "donorName");

        let err = NewDonation::new("   ", dec!(50.00)).validate(now()).unwrap_err();
        assert_eq!(field_of(err), "donorName");
    }

    #[test]
    fn name_length_is_capped() {
        let ok = NewDonation::new("é".repeat(100), dec!(1)).validate(now());
        assert!(ok.is_ok());

        let err = NewDonation::new("a".repeat(101), dec!(1))
            .validate(now())
            .unwrap_err();
        assert_eq!(field_of(err), "donorName");
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in [dec!(0), dec!(-5), dec!(0.004)] {
            let err = NewDonation::new("Jane", amount).validate(now()).unwrap_err();
            assert_eq!(field_of(err), "amount");
        }
    }

    #[test]
    fn missing_fields_are_reported() {
        let err = NewDonation::default().validate(now()).unwrap_err();
        assert_eq!(field_of(err), "donorName");

        let body = NewDonation {
            donor_name: Some("Jane".into()),
            ..Default::default()
        };
        assert_eq!(field_of(body.validate(now()).unwrap_err()), "amount");
    }

    #[test]
    fn huge_amount_is_rejected() {
        let err = NewDonation::new("Jane", Decimal::MAX)
            .validate(now())
            .unwrap_err();
        assert_eq!(field_of(err), "amount");
    }

    #[test]
    fn amount_is_rounded_to_cents() {
        let pending = NewDonation::new("Jane", dec!(25.505)).validate(now()).unwrap();
        assert_eq!(pending.amount_cents, 2551);

        let donation = pending.into_donation(7);
        assert_eq!(donation.amount, dec!(25.51));
        assert_eq!(donation.amount.to_string(), "25.51");
        assert_eq!(donation.crm_response, PENDING);
        assert!(!donation.crm_synced);
    }

    #[test]
    fn date_defaults_to_now() {
        let pending = NewDonation::new("Jane", dec!(10)).validate(now()).unwrap();
        assert_eq!(pending.date, now());

        let given = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let pending = NewDonation::new("Jane", dec!(10))
            .with_date(given)
            .validate(now())
            .unwrap();
        assert_eq!(pending.date, given);
    }

    #[test]
    fn dates_outside_four_digit_years_are_rejected() {
        for raw in ["+10000-01-01T00:00:00Z", "-0001-01-01T00:00:00Z"] {
            let body: NewDonation = serde_json::from_str(&format!(
                r#"{{"donorName":"Jane","amount":10,"date":"{raw}"}}"#
            ))
            .unwrap();
            assert_eq!(field_of(body.validate(now()).unwrap_err()), "date");
        }

        for (y, m, d) in [(0, 1, 1), (9999, 12, 31)] {
            let edge = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();
            let ok = NewDonation::new("Jane", dec!(10)).with_date(edge).validate(now());
            assert!(ok.is_ok());
        }
    }

    #[test]
    fn deserializes_camel_case_body() {
        let body: NewDonation = serde_json::from_str(
            r#"{"donorName":"Jane Doe","amount":150.0,"date":"2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(body.donor_name.as_deref(), Some("Jane Doe"));
        assert_eq!(body.amount, Some(dec!(150)));
        assert!(body.date.is_some());
    }

    #[test]
    fn serializes_amount_as_number() {
        let donation = PendingDonation {
            donor_name: "Jane".into(),
            amount_cents: 15000,
            date: now(),
        }
        .into_donation(1);
        let json = serde_json::to_value(&donation).unwrap();
        assert_eq!(json["amount"], serde_json::json!(150.0));
        assert_eq!(json["donorName"], "Jane");
        assert_eq!(json["crmSynced"], false);
        assert_eq!(json["crmResponse"], "Pending");
    }
}
