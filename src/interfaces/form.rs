use crate::application::ledger::LedgerService;
use crate::domain::account::{AccountNumber, Amount, Balance};
use crate::error::{LedgerError, Result};
use std::fmt;
use std::str::FromStr;

/// The five actions the form can fire.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Trigger {
    CreateAccount,
    DisplayAllAccounts,
    Deposit,
    Withdraw,
    CheckScore,
}

impl FromStr for Trigger {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" | "create-account" => Ok(Trigger::CreateAccount),
            "list" | "display-all" => Ok(Trigger::DisplayAllAccounts),
            "deposit" => Ok(Trigger::Deposit),
            "withdraw" => Ok(Trigger::Withdraw),
            "score" | "check-score" => Ok(Trigger::CheckScore),
            other => Err(LedgerError::invalid(format!("unknown action `{other}`"))),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DialogKind {
    Info,
    Error,
}

/// The message shown back to the user after a trigger.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Dialog {
    pub kind: DialogKind,
    pub message: String,
}

impl Dialog {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == DialogKind::Error
    }
}

impl From<&LedgerError> for Dialog {
    fn from(err: &LedgerError) -> Self {
        match err {
            LedgerError::DuplicateAccount(number) => {
                Dialog::error(format!("Account with account number {number} already exists."))
            }
            LedgerError::AccountNotFound(_) => Dialog::error("Account not found."),
            LedgerError::InsufficientBalance { .. } => Dialog::error("Insufficient balance."),
            LedgerError::InvalidInput(detail) => Dialog::error(format!("Error: {detail}")),
            LedgerError::StorageUnavailable { .. } => Dialog::error(format!("Error: {err}")),
        }
    }
}

impl fmt::Display for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Raw contents of the three text inputs.
///
/// Fields stay as typed text until a trigger needs them, so a malformed amount
/// doesn't stop "list" or "score" from working.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct FormInput {
    pub account_number: String,
    pub holder_name: String,
    pub amount: String,
}

impl FormInput {
    pub fn new(
        account_number: impl Into<String>,
        holder_name: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            holder_name: holder_name.into(),
            amount: amount.into(),
        }
    }

    fn account_number(&self) -> Result<AccountNumber> {
        self.account_number.parse()
    }

    fn amount(&self) -> Result<Amount> {
        self.amount.parse()
    }

    /// Runs one trigger against the ledger. Never fails: errors become error dialogs.
    pub async fn submit(&self, ledger: &LedgerService, trigger: Trigger) -> Dialog {
        match self.dispatch(ledger, trigger).await {
            Ok(message) => Dialog::info(message),
            Err(err) => {
                tracing::debug!(?trigger, error = %err, "trigger failed");
                Dialog::from(&err)
            }
        }
    }

    async fn dispatch(&self, ledger: &LedgerService, trigger: Trigger) -> Result<String> {
        match trigger {
            Trigger::CreateAccount => {
                let number = self.account_number()?;
                let opening: Balance = self.amount.parse()?;
                let account = ledger
                    .create_account(number, &self.holder_name, opening)
                    .await?;
                Ok(format!(
                    "Account created successfully for {}",
                    account.holder_name
                ))
            }
            Trigger::DisplayAllAccounts => Ok(ledger.display_all_accounts().await?.to_string()),
            Trigger::Deposit => {
                ledger.deposit(self.account_number()?, self.amount()?).await?;
                Ok("Amount deposited successfully!".to_string())
            }
            Trigger::Withdraw => {
                ledger.withdraw(self.account_number()?, self.amount()?).await?;
                Ok("Amount withdrawn successfully!".to_string())
            }
            Trigger::CheckScore => {
                let score = ledger.display_cibil_score(self.account_number()?).await?;
                Ok(format!("CIBIL Score: {score}"))
            }
        }
    }
}
