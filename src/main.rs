use cibil_ledger::application::ledger::LedgerService;
use cibil_ledger::config::LedgerConfig;
use cibil_ledger::interfaces::csv::form_reader::FormReader;
use cibil_ledger::interfaces::form::{Dialog, FormInput, Trigger};
use cibil_ledger::telemetry;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: LedgerConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a new account with an initial deposit
    Create {
        account_number: String,
        holder_name: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Show every account
    List,
    /// Add funds to an account
    Deposit {
        account_number: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Take funds out of an account
    Withdraw {
        account_number: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Show an account's CIBIL score
    Score { account_number: String },
    /// Submit `action,account_number,holder_name,amount` rows from a CSV file, or stdin
    Run { input: Option<PathBuf> },
}

enum Action {
    Submit(Trigger, FormInput),
    Run(Option<PathBuf>),
}

impl Command {
    fn into_action(self) -> Action {
        match self {
            Command::Create {
                account_number,
                holder_name,
                amount,
            } => Action::Submit(
                Trigger::CreateAccount,
                FormInput::new(account_number, holder_name, amount),
            ),
            Command::List => Action::Submit(Trigger::DisplayAllAccounts, FormInput::default()),
            Command::Deposit {
                account_number,
                amount,
            } => Action::Submit(Trigger::Deposit, FormInput::new(account_number, "", amount)),
            Command::Withdraw {
                account_number,
                amount,
            } => Action::Submit(Trigger::Withdraw, FormInput::new(account_number, "", amount)),
            Command::Score { account_number } => {
                Action::Submit(Trigger::CheckScore, FormInput::new(account_number, "", ""))
            }
            Command::Run { input } => Action::Run(input),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    telemetry::init();
    let cli = Cli::parse();

    let store = cli.config.open_store().await?;
    let ledger = LedgerService::new(store);

    let succeeded = match cli.command.into_action() {
        Action::Submit(trigger, input) => {
            let dialog = input.submit(&ledger, trigger).await;
            println!("{dialog}");
            !dialog.is_error()
        }
        Action::Run(input) => {
            let source: Box<dyn Read> = match input {
                Some(path) => Box::new(File::open(path).into_diagnostic()?),
                None => Box::new(io::stdin().lock()),
            };
            run_script(&ledger, source).await;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Replays scripted submissions in order; each row gets its own dialog.
async fn run_script<R: Read>(ledger: &LedgerService, source: R) {
    for submission in FormReader::new(source).submissions() {
        let dialog = match submission {
            Ok(submission) => submission.input.submit(ledger, submission.trigger).await,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable row");
                Dialog::from(&e)
            }
        };
        println!("{dialog}");
    }
}
