use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Score every new account starts with.
pub const DEFAULT_CIBIL_SCORE: CibilScore = CibilScore(700);

/// Deposits strictly above this amount earn the larger score bump.
pub const LARGE_DEPOSIT_THRESHOLD: Decimal = dec!(100000);

/// Money is kept to the paisa.
pub const MONEY_SCALE: u32 = 2;

/// Largest balance an account may hold.
///
/// Keeps every balance within the digits a SQLite REAL column stores exactly
/// once rounded back to [`MONEY_SCALE`].
pub const MAX_BALANCE: Decimal = dec!(1000000000000);

const LARGE_DEPOSIT_BONUS: i64 = 10;
const DEPOSIT_BONUS: i64 = 5;
const WITHDRAWAL_PENALTY: i64 = 5;

/// Primary key of an account. Immutable once the account exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountNumber(pub u32);

impl AccountNumber {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl FromStr for AccountNumber {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| LedgerError::invalid(format!("account number `{trimmed}` is not a whole number")))
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a non-negative monetary amount for deposits and withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(LedgerError::invalid("amount cannot be negative"));
        }
        Ok(Self(check_money(value)?))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(parse_decimal(s)?)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Represents an account balance. Never negative for a stored account.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Opening balance for a new account; zero is allowed, negative is not.
    pub fn opening(amount: Decimal) -> Result<Self> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid("initial deposit cannot be negative"));
        }
        Ok(Self(check_money(amount)?))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `self + amount`, or `InvalidInput` if the result would pass [`MAX_BALANCE`].
    pub fn checked_add(self, amount: Amount) -> Result<Self> {
        match self.0.checked_add(amount.value()) {
            Some(total) if total <= MAX_BALANCE => Ok(Self(total)),
            _ => Err(LedgerError::invalid(format!(
                "balance cannot exceed {}",
                MAX_BALANCE.normalize()
            ))),
        }
    }

    /// `self - amount`; `InsufficientBalance` if the result would go below zero.
    pub fn checked_sub(self, amount: Amount) -> Result<Self> {
        match self.0.checked_sub(amount.value()) {
            Some(rest) if rest >= Decimal::ZERO => Ok(Self(rest)),
            _ => Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: self,
            }),
        }
    }
}

impl FromStr for Balance {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::opening(parse_decimal(s)?)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Synthetic credit-worthiness indicator. Unbounded in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CibilScore(pub i64);

impl CibilScore {
    pub fn value(&self) -> i64 {
        self.0
    }

    fn adjust(&mut self, delta: i64) {
        self.0 += delta;
    }
}

impl Default for CibilScore {
    fn default() -> Self {
        DEFAULT_CIBIL_SCORE
    }
}

impl fmt::Display for CibilScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejects values with sub-paisa digits or above [`MAX_BALANCE`].
fn check_money(value: Decimal) -> Result<Decimal> {
    let value = value.normalize();
    if value.scale() > MONEY_SCALE {
        return Err(LedgerError::invalid(format!(
            "amount {value} has more than {MONEY_SCALE} decimal places"
        )));
    }
    if value.abs() > MAX_BALANCE {
        return Err(LedgerError::invalid(format!(
            "amount {value} exceeds the limit of {}",
            MAX_BALANCE.normalize()
        )));
    }
    Ok(value)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let trimmed = s.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::invalid(format!("amount `{trimmed}` is not a number")))
}

/// A single ledger record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub number: AccountNumber,
    pub holder_name: String,
    pub balance: Balance,
    pub cibil_score: CibilScore,
}

impl Account {
    /// Builds a fresh account with the default score.
    pub fn open(number: AccountNumber, holder_name: &str, opening: Balance) -> Result<Self> {
        let holder_name = holder_name.trim();
        if holder_name.is_empty() {
            return Err(LedgerError::invalid("account holder name is required"));
        }
        let opening = Balance::opening(opening.value())?;
        Ok(Self {
            number,
            holder_name: holder_name.to_string(),
            balance: opening,
            cibil_score: DEFAULT_CIBIL_SCORE,
        })
    }

    /// Credits the balance and rewards the score; large deposits earn more.
    ///
    /// Leaves the account untouched if the new balance would pass [`MAX_BALANCE`].
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        self.balance = self.balance.checked_add(amount)?;
        let bonus = if amount.value() > LARGE_DEPOSIT_THRESHOLD {
            LARGE_DEPOSIT_BONUS
        } else {
            DEPOSIT_BONUS
        };
        self.cibil_score.adjust(bonus);
        Ok(())
    }

    /// Debits the balance if it covers `amount`; leaves the account untouched otherwise.
    pub fn withdraw(&mut self, amount: Amount) -> Result<()> {
        self.balance = self.balance.checked_sub(amount)?;
        self.cibil_score.adjust(-WITHDRAWAL_PENALTY);
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account Number: {}", self.number)?;
        writeln!(f, "Account Holder: {}", self.holder_name)?;
        writeln!(f, "Balance: {}", self.balance)?;
        write!(f, "CIBIL Score: {}", self.cibil_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(balance: Decimal) -> Account {
        Account::open(AccountNumber(1001), "Asha", Balance::new(balance)).unwrap()
    }

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn test_open_defaults() {
        let account = Account::open(AccountNumber(7), "  Ravi ", Balance::ZERO).unwrap();
        assert_eq!(account.holder_name, "Ravi");
        assert_eq!(account.balance, Balance::ZERO);
        assert_eq!(account.cibil_score, CibilScore(700));
    }

    #[test]
    fn test_open_rejects_blank_holder_and_negative_balance() {
        assert!(matches!(
            Account::open(AccountNumber(7), "   ", Balance::ZERO),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            Account::open(AccountNumber(7), "Ravi", Balance::new(dec!(-1))),
            Err(LedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(Amount::new(dec!(0)).is_ok());
        assert!(Amount::new(dec!(2.50)).is_ok());
        assert!(matches!(
            Amount::new(dec!(-5)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            Amount::new(dec!(0.001)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            Amount::new(MAX_BALANCE + dec!(0.01)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(Amount::new(MAX_BALANCE).is_ok());
    }

    #[test]
    fn test_sub_paisa_text_is_rejected() {
        assert!("12345678901234.56789".parse::<Amount>().is_err());
        assert!("10.005".parse::<Balance>().is_err());
        assert_eq!("10.50".parse::<Amount>().unwrap().value(), dec!(10.5));
    }

    #[test]
    fn test_huge_deposit_is_rejected_without_panicking() {
        assert!("50000000000000000000000000000".parse::<Amount>().is_err());
        assert!("50000000000000000000000000000".parse::<Balance>().is_err());
        assert!(matches!(
            Account::open(AccountNumber(1), "Asha", Balance::new(Decimal::MAX)),
            Err(LedgerError::InvalidInput(_))
        ));

        let mut account = account(MAX_BALANCE);
        let before = account.clone();
        assert!(matches!(
            account.deposit(amount(MAX_BALANCE)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            account.deposit(amount(dec!(0.01))),
            Err(LedgerError::InvalidInput(_))
        ));
        assert_eq!(account, before);
    }

    #[test]
    fn test_zero_amounts_still_move_the_score() {
        let mut account = account(dec!(100));
        account.deposit(amount(dec!(0))).unwrap();
        assert_eq!(account.balance, Balance::new(dec!(100)));
        assert_eq!(account.cibil_score, CibilScore(705));

        account.withdraw(amount(dec!(0))).unwrap();
        assert_eq!(account.balance, Balance::new(dec!(100)));
        assert_eq!(account.cibil_score, CibilScore(700));
    }

    #[test]
    fn test_parsing_text_fields() {
        assert_eq!(" 1001 ".parse::<AccountNumber>().unwrap(), AccountNumber(1001));
        assert!("10a1".parse::<AccountNumber>().is_err());
        assert!("-3".parse::<AccountNumber>().is_err());

        assert_eq!("250.50".parse::<Amount>().unwrap().value(), dec!(250.50));
        assert_eq!("1e5".parse::<Amount>().unwrap().value(), dec!(100000));
        assert!("fifty".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());

        assert_eq!("0".parse::<Balance>().unwrap(), Balance::ZERO);
        assert!("-10".parse::<Balance>().is_err());
    }

    #[test]
    fn test_small_deposit_bumps_score_by_five() {
        let mut account = account(dec!(0));
        account.deposit(amount(dec!(100000))).unwrap();
        assert_eq!(account.balance, Balance::new(dec!(100000)));
        assert_eq!(account.cibil_score, CibilScore(705));
    }

    #[test]
    fn test_large_deposit_bumps_score_by_ten() {
        let mut account = account(dec!(0));
        account.deposit(amount(dec!(100000.01))).unwrap();
        assert_eq!(account.cibil_score, CibilScore(710));
    }

    #[test]
    fn test_withdraw_success() {
        let mut account = account(dec!(200));
        account.withdraw(amount(dec!(200))).unwrap();
        assert_eq!(account.balance, Balance::ZERO);
        assert_eq!(account.cibil_score, CibilScore(695));
    }

    #[test]
    fn test_withdraw_insufficient_leaves_account_untouched() {
        let mut account = account(dec!(200));
        let before = account.clone();

        let result = account.withdraw(amount(dec!(200.01)));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(account, before);
    }

    #[test]
    fn test_score_is_unbounded() {
        let mut account = account(dec!(1000000));
        for _ in 0..200 {
            account.withdraw(amount(dec!(1))).unwrap();
        }
        assert_eq!(account.cibil_score, CibilScore(-300));
    }

    #[test]
    fn test_display_block() {
        let account = account(dec!(50000.00));
        assert_eq!(
            account.to_string(),
            "Account Number: 1001\nAccount Holder: Asha\nBalance: 50000\nCIBIL Score: 700"
        );
    }
}
