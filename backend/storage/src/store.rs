/// SQLite-backed assessment store.
///
/// Uses `rusqlite` to persist customers, devices, and assessments. Customers
/// are upserted by phone number (the only stable key the intake form
/// collects), so a returning customer updates their row instead of
/// duplicating it.
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{AssessmentReceipt, CustomerInput, CustomerRow, DeviceInput};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS customers (
     id         TEXT PRIMARY KEY,
     name       TEXT NOT NULL,
     name_kana  TEXT,
     address    TEXT,
     phone      TEXT,
     birthday   TEXT,
     job        TEXT,
     created_at TEXT NOT NULL
 );
 CREATE INDEX IF NOT EXISTS idx_customers_phone ON customers(phone);
 CREATE TABLE IF NOT EXISTS devices (
     id              TEXT PRIMARY KEY,
     customer_id     TEXT,
     model_name      TEXT,
     model_number    TEXT,
     imei            TEXT,
     color           TEXT,
     capacity        TEXT,
     carrier         TEXT,
     sim_lock        TEXT,
     battery         TEXT,
     condition       TEXT,
     max_price       INTEGER,
     estimated_price INTEGER,
     notes           TEXT,
     FOREIGN KEY (customer_id) REFERENCES customers(id)
 );
 CREATE TABLE IF NOT EXISTS assessments (
     id              TEXT PRIMARY KEY,
     customer_id     TEXT,
     device_id       TEXT,
     chatwork_text   TEXT,
     max_price       INTEGER,
     estimated_price INTEGER,
     notes           TEXT,
     assessed_at     TEXT NOT NULL,
     FOREIGN KEY (customer_id) REFERENCES customers(id),
     FOREIGN KEY (device_id) REFERENCES devices(id)
 );";

/// Fallback display name for walk-ins who leave the name field blank.
const ANONYMOUS_CUSTOMER: &str = "customer";

pub struct AssessmentStore {
    conn: Mutex<Connection>,
}

impl AssessmentStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite assessment database")?;
        conn.execute_batch(&format!("PRAGMA journal_mode=WAL;\n{SCHEMA}"))
            .context("Failed to initialize assessment schema")?;
        info!("AssessmentStore opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Insert or update a customer, returning their id.
    ///
    /// With a phone number: overwrite the existing row's details if one
    /// matches, insert otherwise. Without one there is nothing to key on, so
    /// always insert.
    pub async fn upsert_customer(&self, customer: &CustomerInput) -> Result<String> {
        let conn = self.conn.lock().await;
        upsert_customer_inner(&conn, customer)
    }

    /// Persist one assessment: customer upsert, linked device row, then the
    /// assessment row itself.
    pub async fn save_assessment(
        &self,
        customer: &CustomerInput,
        device: &DeviceInput,
        chatwork_text: Option<&str>,
    ) -> Result<AssessmentReceipt> {
        let conn = self.conn.lock().await;

        let customer_id = upsert_customer_inner(&conn, customer)?;

        let device_id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO devices (id, customer_id, model_name, model_number, imei, color,
                 capacity, carrier, sim_lock, battery, condition, max_price, estimated_price, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                device_id,
                customer_id,
                device.model_name,
                device.model_number,
                device.imei,
                device.color,
                device.capacity,
                device.carrier,
                device.sim_lock,
                device.battery,
                device.condition,
                device.max_price,
                device.estimated_price,
                device.notes,
            ],
        )?;

        let assessment_id = Uuid::new_v4().to_string();
        let assessed_at = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO assessments (id, customer_id, device_id, chatwork_text,
                 max_price, estimated_price, notes, assessed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                assessment_id,
                customer_id,
                device_id,
                chatwork_text,
                device.max_price,
                device.estimated_price,
                device.notes,
                assessed_at,
            ],
        )?;

        debug!("Saved assessment {} for customer {}", assessment_id, customer_id);
        Ok(AssessmentReceipt { customer_id, device_id, assessment_id, assessed_at })
    }

    /// Newest-first customers for the intake-form dropdown.
    pub async fn recent_customers(&self, limit: u32) -> Result<Vec<CustomerRow>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, name, name_kana, address, phone, birthday, created_at
             FROM customers ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(CustomerRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    name_kana: row.get(2)?,
                    address: row.get(3)?,
                    phone: row.get(4)?,
                    birthday: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn upsert_customer_inner(conn: &Connection, customer: &CustomerInput) -> Result<String> {
    let phone = customer.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    if let Some(phone) = phone {
        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM customers WHERE phone = ?1 LIMIT 1",
                params![phone],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            conn.execute(
                "UPDATE customers SET
                     name      = COALESCE(?1, name),
                     name_kana = COALESCE(?2, name_kana),
                     address   = COALESCE(?3, address),
                     job       = COALESCE(?4, job)
                 WHERE id = ?5",
                params![customer.name, customer.name_kana, customer.address, customer.job, id],
            )?;
            return Ok(id);
        }
    }

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO customers (id, name, name_kana, address, phone, birthday, job, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            customer.name.as_deref().unwrap_or(ANONYMOUS_CUSTOMER),
            customer.name_kana,
            customer.address,
            phone,
            customer.birthday,
            customer.job,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(name: &str, phone: Option<&str>) -> CustomerInput {
        CustomerInput {
            name: Some(name.to_string()),
            phone: phone.map(str::to_string),
            ..CustomerInput::default()
        }
    }

    #[tokio::test]
    async fn upsert_reuses_the_row_for_a_known_phone() {
        let store = AssessmentStore::in_memory().unwrap();
        let first = store.upsert_customer(&customer("Tanaka", Some("090-1111-2222"))).await.unwrap();
        let second = store.upsert_customer(&customer("Tanaka Taro", Some("090-1111-2222"))).await.unwrap();
        assert_eq!(first, second);

        let rows = store.recent_customers(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Tanaka Taro");
    }

    #[tokio::test]
    async fn customers_without_phones_are_always_inserted() {
        let store = AssessmentStore::in_memory().unwrap();
        let a = store.upsert_customer(&customer("Walk-in", None)).await.unwrap();
        let b = store.upsert_customer(&customer("Walk-in", None)).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn blank_name_falls_back_to_placeholder() {
        let store = AssessmentStore::in_memory().unwrap();
        store.upsert_customer(&CustomerInput::default()).await.unwrap();
        let rows = store.recent_customers(1).await.unwrap();
        assert_eq!(rows[0].name, ANONYMOUS_CUSTOMER);
    }

    #[tokio::test]
    async fn save_assessment_links_all_three_rows() {
        let store = AssessmentStore::in_memory().unwrap();
        let device = DeviceInput {
            model_name: Some("iPhone 13 Pro".into()),
            imei: Some("359605068234106".into()),
            max_price: Some(51000),
            ..DeviceInput::default()
        };
        let receipt = store
            .save_assessment(&customer("Tanaka", Some("090-1111-2222")), &device, Some("summary"))
            .await
            .unwrap();

        assert!(!receipt.assessed_at.is_empty());

        let conn = store.conn.lock().await;
        let (device_customer, imei): (String, String) = conn
            .query_row(
                "SELECT customer_id, imei FROM devices WHERE id = ?1",
                params![receipt.device_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(device_customer, receipt.customer_id);
        assert_eq!(imei, "359605068234106");

        let max_price: i64 = conn
            .query_row(
                "SELECT max_price FROM assessments WHERE id = ?1",
                params![receipt.assessment_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(max_price, 51000);
    }

    #[tokio::test]
    async fn recent_customers_are_newest_first() {
        let store = AssessmentStore::in_memory().unwrap();
        store.upsert_customer(&customer("First", Some("1"))).await.unwrap();
        store.upsert_customer(&customer("Second", Some("2"))).await.unwrap();
        let rows = store.recent_customers(10).await.unwrap();
        assert_eq!(rows[0].name, "Second");
        assert_eq!(rows[1].name, "First");
    }
}
