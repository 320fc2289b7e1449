use crate::db::models::DbDonation;
use crate::db::schema::SQLITE_INIT;
use crate::error::DonationError;
use crate::types::donation::{Donation, PENDING, PendingDonation};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// Open the pool for `database_url` and apply the schema.
pub async fn connect(database_url: &str) -> Result<DonationStorage, DonationError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let mut pool_options = SqlitePoolOptions::new();
    if database_url.contains(":memory:") {
        // every connection to :memory: is a separate database
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_options.connect_with(options).await?;

    let storage = DonationStorage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}

#[derive(Clone)]
pub struct DonationStorage {
    pool: SqlitePool,
}

impl DonationStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), DonationError> {
        // sqlx::query runs a single statement, so split the script
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a pending donation. The returned donation carries the assigned id.
    pub async fn insert(&self, donation: PendingDonation) -> Result<Donation, DonationError> {
        let id = sqlx::query(
            r#"INSERT INTO donations (donor_name, amount_cents, date, crm_synced, crm_response)
               VALUES (?, ?, ?, 0, ?)"#,
        )
        .bind(&donation.donor_name)
        .bind(donation.amount_cents)
        .bind(encode_date(&donation.date))
        .bind(PENDING)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, "donation row inserted");
        Ok(donation.into_donation(id))
    }

    /// Every stored donation, most recent `date` first.
    pub async fn list_all(&self) -> Result<Vec<Donation>, DonationError> {
        let rows = sqlx::query(
            r#"SELECT id, donor_name, amount_cents, date, crm_synced, crm_response
               FROM donations ORDER BY date DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| Self::row_to_model(row).map(Donation::from))
            .collect()
    }

    #[cfg(test)]
    pub async fn get_by_id(&self, id: i64) -> Result<Donation, DonationError> {
        let row = sqlx::query(
            r#"SELECT id, donor_name, amount_cents, date, crm_synced, crm_response
               FROM donations WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DonationError::NotFound(id))?;
        Self::row_to_model(row).map(Donation::from)
    }

    /// Overwrite all mutable fields of an existing donation (everything except id).
    pub async fn update(&self, donation: &Donation) -> Result<(), DonationError> {
        let amount_cents = donation
            .amount_cents()
            .ok_or_else(|| sqlx::Error::Encode("amount does not fit in i64 cents".into()))?;
        let result = sqlx::query(
            r#"UPDATE donations SET
                donor_name = ?,
                amount_cents = ?,
                date = ?,
                crm_synced = ?,
                crm_response = ?
              WHERE id = ?"#,
        )
        .bind(&donation.donor_name)
        .bind(amount_cents)
        .bind(encode_date(&donation.date))
        .bind(if donation.crm_synced { 1 } else { 0 })
        .bind(&donation.crm_response)
        .bind(donation.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DonationError::NotFound(donation.id));
        }
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<DbDonation, DonationError> {
        let id: i64 = row.try_get("id")?;
        let donor_name: String = row.try_get("donor_name")?;
        let amount_cents: i64 = row.try_get("amount_cents")?;
        let date_str: String = row.try_get("date")?;
        let synced_i: i64 = row.try_get("crm_synced")?;
        let crm_response: String = row.try_get("crm_response")?;

        let date: DateTime<Utc> = DateTime::parse_from_rfc3339(&date_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbDonation {
            id,
            donor_name,
            amount_cents,
            date,
            crm_synced: synced_i != 0,
            crm_response,
        })
    }
}

/// Fixed-width UTC text so that `ORDER BY date` is chronological.
fn encode_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}
