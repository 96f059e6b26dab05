use crate::error::{LedgerError, Result};
use crate::interfaces::form::{FormInput, Trigger};
use serde::Deserialize;
use std::io::Read;

/// One scripted form submission: `action,account_number,holder_name,amount`.
#[derive(Debug, Deserialize)]
struct FormRow {
    action: String,
    #[serde(default)]
    account_number: String,
    #[serde(default)]
    holder_name: String,
    #[serde(default)]
    amount: String,
}

/// A parsed row, ready to be submitted.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Submission {
    pub line: u64,
    pub trigger: Trigger,
    pub input: FormInput,
}

/// Reads scripted form submissions from a CSV source.
///
/// Rows are headerless, trimmed and may omit trailing fields, so `list` and
/// `score,1001` are both valid. Lines starting with `#` are skipped.
pub struct FormReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> FormReader<R> {
    /// Creates a new `FormReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one result per row; a bad row doesn't end the stream.
    pub fn submissions(self) -> impl Iterator<Item = Result<Submission>> {
        self.reader.into_records().map(|record| -> Result<Submission> {
            let record = record.map_err(|e| LedgerError::invalid(e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let row: FormRow = record
                .deserialize(None)
                .map_err(|e| LedgerError::invalid(format!("line {line}: {e}")))?;
            let trigger = row
                .action
                .parse::<Trigger>()
                .map_err(|e| match e {
                    LedgerError::InvalidInput(detail) => {
                        LedgerError::invalid(format!("line {line}: {detail}"))
                    }
                    other => other,
                })?;

            Ok(Submission {
                line,
                trigger,
                input: FormInput::new(row.account_number, row.holder_name, row.amount),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "# scripted session\n\
                    create, 1001, Asha, 50000\n\
                    deposit, 1001, , 150000\n\
                    score, 1001\n\
                    list\n";
        let reader = FormReader::new(data.as_bytes());
        let results: Vec<Submission> = reader.submissions().map(|r| r.unwrap()).collect();

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].trigger, Trigger::CreateAccount);
        assert_eq!(results[0].input, FormInput::new("1001", "Asha", "50000"));
        assert_eq!(results[1].input.holder_name, "");
        assert_eq!(results[2].trigger, Trigger::CheckScore);
        assert_eq!(results[2].input.amount, "");
        assert_eq!(results[3].trigger, Trigger::DisplayAllAccounts);
    }

    #[test]
    fn test_reader_malformed_line_does_not_stop_stream() {
        let data = "transfer, 1, 2, 3\nlist";
        let reader = FormReader::new(data.as_bytes());
        let results: Vec<Result<Submission>> = reader.submissions().collect();

        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(LedgerError::InvalidInput(_))));
        assert!(results[1].is_ok());
    }
}
