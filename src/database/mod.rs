use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::models::{
    dto::{MonthlyReportRow, NewBill, VehicleTypeRow},
    slots, Error, ParkingBill, Role, User,
};

/// Fixed monthly parking charge, in rupees.
pub const MONTHLY_CHARGE: f64 = 1000.0;

/// Schema migrations embedded from the `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Connects to the SQLite database at `db_url`, creating the file if
/// it does not exist, and returns a connection pool for accessing it.
pub async fn connect_sqlite(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .max_connections(16);

    // An in-memory database exists per connection, so the pool must be
    // pinned to a single long-lived connection to act as one database.
    if db_url.contains(":memory:") {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    pool_options.connect_with(options).await
}

pub struct ParkingDatabase {
    pool: SqlitePool,
}

impl ParkingDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        ParkingDatabase { pool }
    }

    /// Create a new user. A username collision is reported as
    /// [`Error::DuplicateUsername`] via the unique constraint, so the
    /// check-then-insert cannot race.
    pub async fn create_user(
        &self,
        username: &str,
        hashed_password: &str,
        role: Role,
        is_protected: bool,
    ) -> Result<User, Error> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, hashed_password, role, is_protected, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, username, hashed_password, role, is_protected, created_at
            "#,
        )
        .bind(username)
        .bind(hashed_password)
        .bind(role)
        .bind(is_protected)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(Error::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, hashed_password, role, is_protected, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, hashed_password, role, is_protected, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// The protected bootstrap admin, if one has been provisioned yet.
    pub async fn get_protected_admin(&self) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, hashed_password, role, is_protected, created_at
            FROM users
            WHERE is_protected = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, hashed_password, role, is_protected, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert a new bill for a rental request. The unique index on
    /// (slot_number, month, year) makes the occupancy check atomic:
    /// of two concurrent requests for the same triple exactly one row
    /// is written and the other caller gets [`Error::SlotOccupied`].
    pub async fn create_bill(&self, new: &NewBill, generated_by: &str) -> Result<ParkingBill, Error> {
        let result = sqlx::query_as::<_, ParkingBill>(
            r#"
            INSERT INTO parking_bills
                (customer_name, vehicle_number, vehicle_type, slot_number,
                 month, year, payment_mode, amount, bill_date, generated_by, is_paid)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
            RETURNING id, customer_name, vehicle_number, vehicle_type, slot_number,
                      month, year, payment_mode, amount, bill_date, generated_by, is_paid
            "#,
        )
        .bind(&new.customer_name)
        .bind(&new.vehicle_number)
        .bind(&new.vehicle_type)
        .bind(&new.slot_number)
        .bind(&new.month)
        .bind(&new.year)
        .bind(&new.payment_mode)
        .bind(MONTHLY_CHARGE)
        .bind(Utc::now())
        .bind(generated_by)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(bill) => Ok(bill),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::SlotOccupied {
                slot: new.slot_number.clone(),
                month: new.month.clone(),
                year: new.year.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn count_bills(&self) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM parking_bills")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of bills, newest first.
    pub async fn list_bills(&self, limit: u32, offset: u32) -> Result<Vec<ParkingBill>, Error> {
        let rows = sqlx::query_as::<_, ParkingBill>(
            r#"
            SELECT id, customer_name, vehicle_number, vehicle_type, slot_number,
                   month, year, payment_mode, amount, bill_date, generated_by, is_paid
            FROM parking_bills
            ORDER BY bill_date DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Substring search over customer name, vehicle number and slot
    /// number, newest first, capped at 50 rows.
    pub async fn search_bills(&self, query: &str) -> Result<Vec<ParkingBill>, Error> {
        let rows = sqlx::query_as::<_, ParkingBill>(
            r#"
            SELECT id, customer_name, vehicle_number, vehicle_type, slot_number,
                   month, year, payment_mode, amount, bill_date, generated_by, is_paid
            FROM parking_bills
            WHERE customer_name LIKE '%' || ? || '%'
               OR vehicle_number LIKE '%' || ? || '%'
               OR slot_number LIKE '%' || ? || '%'
            ORDER BY bill_date DESC, id DESC
            LIMIT 50
            "#,
        )
        .bind(query)
        .bind(query)
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Bills grouped by rental period, sorted by (year, month) so the
    /// report is deterministic.
    pub async fn monthly_report(&self) -> Result<Vec<MonthlyReportRow>, Error> {
        let mut rows = sqlx::query_as::<_, MonthlyReportRow>(
            r#"
            SELECT month, year, COUNT(id) AS count, SUM(amount) AS total
            FROM parking_bills
            GROUP BY month, year
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.sort_by_key(|row| {
            (
                row.year.clone(),
                slots::month_index(&row.month).unwrap_or(slots::MONTHS.len()),
            )
        });
        Ok(rows)
    }

    pub async fn vehicle_type_stats(&self) -> Result<Vec<VehicleTypeRow>, Error> {
        let rows = sqlx::query_as::<_, VehicleTypeRow>(
            r#"
            SELECT vehicle_type, COUNT(id) AS count
            FROM parking_bills
            GROUP BY vehicle_type
            ORDER BY vehicle_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Distinct slots with a bill for the given rental period. Counts
    /// slots, not bills, so it answers "how many slots are booked this
    /// period", not "is this exact slot booked".
    pub async fn occupied_slot_count(&self, month: &str, year: &str) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT slot_number)
            FROM parking_bills
            WHERE month = ? AND year = ?
            "#,
        )
        .bind(month)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Bills *created* inside the half-open [start, end) window. This
    /// is keyed on bill_date, not the rental period.
    pub async fn bills_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(id)
            FROM parking_bills
            WHERE bill_date >= ? AND bill_date < ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn recent_bills(&self, limit: u32) -> Result<Vec<ParkingBill>, Error> {
        self.list_bills(limit, 0).await
    }
}

/// Half-open UTC range covering the calendar month `now` falls in.
pub fn calendar_month_range(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .unwrap();
    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).unwrap();
    (start, end)
}

/// Full English name of the month `now` falls in.
pub fn calendar_month_name(now: DateTime<Utc>) -> &'static str {
    slots::MONTHS[now.month0() as usize]
}
