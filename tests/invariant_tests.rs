use cibil_ledger::application::ledger::LedgerService;
use cibil_ledger::domain::account::{AccountNumber, Amount, Balance, CibilScore};
use cibil_ledger::domain::ports::AccountStoreBox;
use cibil_ledger::error::LedgerError;
use cibil_ledger::infrastructure::in_memory::InMemoryAccountStore;
use cibil_ledger::infrastructure::sqlite::SqliteAccountStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const ACCOUNT: AccountNumber = AccountNumber(1001);

/// Replays random deposits and withdrawals, checking every outcome against a
/// hand-computed model of balance and score.
async fn replay(store: AccountStoreBox, seed: u64, steps: usize) {
    let ledger = LedgerService::new(store);
    ledger
        .create_account(ACCOUNT, "Asha", Balance::ZERO)
        .await
        .unwrap();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut balance = Decimal::ZERO;
    let mut score: i64 = 700;

    for _ in 0..steps {
        // Up to 2,00,000 rupees, in paise
        let raw = Decimal::new(rng.gen_range(0..=20_000_000i64), 2);
        let amount = Amount::new(raw).unwrap();

        if rng.gen_bool(0.5) {
            let account = ledger.deposit(ACCOUNT, amount).await.unwrap();
            balance += raw;
            score += if raw > Decimal::from(100_000) { 10 } else { 5 };
            assert_eq!(account.balance, Balance::new(balance));
            assert_eq!(account.cibil_score, CibilScore(score));
        } else {
            match ledger.withdraw(ACCOUNT, amount).await {
                Ok(account) => {
                    assert!(raw <= balance);
                    balance -= raw;
                    score -= 5;
                    assert_eq!(account.balance, Balance::new(balance));
                    assert_eq!(account.cibil_score, CibilScore(score));
                }
                Err(LedgerError::InsufficientBalance { .. }) => {
                    assert!(raw > balance);
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        let stored = ledger.find_account(ACCOUNT).await.unwrap();
        assert!(stored.balance >= Balance::ZERO);
        assert_eq!(stored.balance, Balance::new(balance));
        assert_eq!(stored.cibil_score, CibilScore(score));
    }
}

#[tokio::test]
async fn test_random_activity_in_memory() {
    for seed in 0..5 {
        replay(Box::new(InMemoryAccountStore::new()), seed, 200).await;
    }
}

#[tokio::test]
async fn test_random_activity_sqlite() {
    let store = SqliteAccountStore::open_in_memory().await.unwrap();
    replay(Box::new(store), 42, 200).await;
}
