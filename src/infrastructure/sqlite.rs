use crate::domain::account::{Account, AccountNumber, Balance, CibilScore, MONEY_SCALE};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const CREATE_ACCOUNTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        accountNumber INTEGER PRIMARY KEY,
        accountHolderName TEXT NOT NULL,
        balance REAL NOT NULL,
        cibilScore INTEGER NOT NULL
    )
"#;

/// Account store backed by a single SQLite table.
///
/// Holds exactly one connection for its whole lifetime: the pool is capped at
/// one connection that is never reaped, so an in-memory database keeps its
/// contents until [`SqliteAccountStore::close`] or drop.
#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    /// Opens (or creates) the database file at `path` and ensures the `accounts` table exists.
    ///
    /// Any failure here is a startup failure; the store is never half-open.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        Self::connect(options).await
    }

    /// Opens a private in-memory database, mostly for tests.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(LedgerError::startup)?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(LedgerError::startup)?;

        sqlx::query(CREATE_ACCOUNTS_TABLE)
            .execute(&pool)
            .await
            .map_err(LedgerError::startup)?;

        tracing::debug!("sqlite account store ready");
        Ok(Self { pool })
    }

    /// Releases the connection. Further calls on any clone fail with a query error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Converts a balance for the REAL column, refusing any value that would not
/// read back as the same amount. Runs before the statement, so nothing is written.
fn to_real(balance: Balance) -> Result<f64> {
    let value = balance.value();
    value
        .to_f64()
        .filter(|real| from_real(*real) == Some(value))
        .ok_or_else(|| LedgerError::invalid(format!("balance {balance} cannot be stored exactly")))
}

fn from_real(real: f64) -> Option<Decimal> {
    Decimal::from_f64(real).map(|d| d.round_dp(MONEY_SCALE))
}

fn account_from_row(row: &SqliteRow) -> Result<Account> {
    let number: i64 = row.try_get("accountNumber").map_err(LedgerError::query)?;
    let holder_name: String = row.try_get("accountHolderName").map_err(LedgerError::query)?;
    let balance: f64 = row.try_get("balance").map_err(LedgerError::query)?;
    let cibil_score: i64 = row.try_get("cibilScore").map_err(LedgerError::query)?;

    let number = u32::try_from(number)
        .map_err(|_| LedgerError::query(format!("stored account number {number} out of range")))?;
    let balance = from_real(balance)
        .ok_or_else(|| LedgerError::query(format!("stored balance {balance} is not a finite number")))?;

    Ok(Account {
        number: AccountNumber(number),
        holder_name,
        balance: Balance::new(balance),
        cibil_score: CibilScore(cibil_score),
    })
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn insert(&self, account: Account) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO accounts (accountNumber, accountHolderName, balance, cibilScore) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(i64::from(account.number.value()))
        .bind(account.holder_name.as_str())
        .bind(to_real(account.balance)?)
        .bind(account.cibil_score.value())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(LedgerError::DuplicateAccount(account.number))
            }
            Err(e) => Err(LedgerError::query(e)),
        }
    }

    async fn get(&self, number: AccountNumber) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT accountNumber, accountHolderName, balance, cibilScore \
             FROM accounts WHERE accountNumber = ?1",
        )
        .bind(i64::from(number.value()))
        .fetch_optional(&self.pool)
        .await
        .map_err(LedgerError::query)?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn update(&self, account: &Account) -> Result<()> {
        let result = sqlx::query(
            "UPDATE accounts SET balance = ?1, cibilScore = ?2 WHERE accountNumber = ?3",
        )
        .bind(to_real(account.balance)?)
        .bind(account.cibil_score.value())
        .bind(i64::from(account.number.value()))
        .execute(&self.pool)
        .await
        .map_err(LedgerError::query)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::AccountNotFound(account.number));
        }
        Ok(())
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            "SELECT accountNumber, accountHolderName, balance, cibilScore \
             FROM accounts ORDER BY accountNumber",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(LedgerError::query)?;

        rows.iter().map(account_from_row).collect()
    }
}
