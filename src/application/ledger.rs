use crate::domain::account::{Account, AccountNumber, Amount, Balance, CibilScore};
use crate::domain::ports::AccountStoreBox;
use crate::error::{LedgerError, Result};
use std::fmt;

/// Result of listing the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountListing {
    Empty,
    Accounts(Vec<Account>),
}

impl AccountListing {
    pub fn accounts(&self) -> &[Account] {
        match self {
            AccountListing::Empty => &[],
            AccountListing::Accounts(accounts) => accounts,
        }
    }
}

impl fmt::Display for AccountListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountListing::Empty => f.write_str("No accounts to display."),
            AccountListing::Accounts(accounts) => {
                for (i, account) in accounts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n\n")?;
                    }
                    write!(f, "{account}")?;
                }
                Ok(())
            }
        }
    }
}

/// The account ledger.
///
/// Every operation is a single read-check-write against the store and either
/// fully applies or leaves the stored record exactly as it was.
pub struct LedgerService {
    store: AccountStoreBox,
}

impl LedgerService {
    pub fn new(store: AccountStoreBox) -> Self {
        Self { store }
    }

    /// Opens a new account with the default score.
    ///
    /// Fails with `DuplicateAccount` if `number` is already in use; the existing
    /// record is not touched.
    pub async fn create_account(
        &self,
        number: AccountNumber,
        holder_name: &str,
        initial_deposit: Balance,
    ) -> Result<Account> {
        if self.store.get(number).await?.is_some() {
            tracing::warn!(account = %number, "account already exists");
            return Err(LedgerError::DuplicateAccount(number));
        }

        let account = Account::open(number, holder_name, initial_deposit).inspect_err(|e| {
            tracing::warn!(account = %number, error = %e, "account creation rejected");
        })?;
        self.store.insert(account.clone()).await?;

        tracing::info!(account = %number, holder = %account.holder_name, "account created");
        Ok(account)
    }

    pub async fn find_account(&self, number: AccountNumber) -> Result<Account> {
        let found = self.store.get(number).await?;
        tracing::debug!(account = %number, found = found.is_some(), "account lookup");
        found.ok_or(LedgerError::AccountNotFound(number))
    }

    pub async fn display_all_accounts(&self) -> Result<AccountListing> {
        let accounts = self.store.all_accounts().await?;
        tracing::debug!(count = accounts.len(), "listing accounts");
        if accounts.is_empty() {
            Ok(AccountListing::Empty)
        } else {
            Ok(AccountListing::Accounts(accounts))
        }
    }

    /// Credits `amount` and bumps the score (+10 above 100000, +5 otherwise).
    pub async fn deposit(&self, number: AccountNumber, amount: Amount) -> Result<Account> {
        let mut account = self.find_account(number).await.inspect_err(|e| {
            tracing::warn!(account = %number, error = %e, "deposit rejected");
        })?;

        account.deposit(amount).inspect_err(|e| {
            tracing::warn!(account = %number, error = %e, "deposit rejected");
        })?;
        self.store.update(&account).await?;

        tracing::info!(
            account = %number,
            %amount,
            balance = %account.balance,
            score = %account.cibil_score,
            "deposit applied"
        );
        Ok(account)
    }

    /// Debits `amount` and lowers the score by 5, unless the balance can't cover it.
    pub async fn withdraw(&self, number: AccountNumber, amount: Amount) -> Result<Account> {
        let mut account = self.find_account(number).await.inspect_err(|e| {
            tracing::warn!(account = %number, error = %e, "withdrawal rejected");
        })?;

        account.withdraw(amount).inspect_err(|e| {
            tracing::warn!(account = %number, error = %e, "withdrawal rejected");
        })?;
        self.store.update(&account).await?;

        tracing::info!(
            account = %number,
            %amount,
            balance = %account.balance,
            score = %account.cibil_score,
            "withdrawal applied"
        );
        Ok(account)
    }

    pub async fn display_cibil_score(&self, number: AccountNumber) -> Result<CibilScore> {
        let account = self.find_account(number).await.inspect_err(|e| {
            tracing::warn!(account = %number, error = %e, "score check rejected");
        })?;
        tracing::debug!(account = %number, score = %account.cibil_score, "score checked");
        Ok(account.cibil_score)
    }
}
