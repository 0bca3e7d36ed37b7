//! Transaction outputs and their pipe-delimited record form.
//!
//! Record format: `recipient|amount|script`, one line, `amount` in plain
//! decimal. The script is everything after the second `|`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Field separator in serialized records.
pub const RECORD_SEPARATOR: char = '|';

/// Why a serialized record could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutputParseError {
    #[error("record is missing the {0} field")]
    MissingField(&'static str),
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
    #[error("record spans more than one line")]
    Multiline,
    #[error("recipient {0:?} contains the record separator")]
    SeparatorInRecipient(String),
}

/// A spendable output: who receives it, how much, and its locking script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub recipient: String,
    pub amount: f64,
    pub script: String,
}

impl TransactionOutput {
    pub fn new(recipient: impl Into<String>, amount: f64, script: impl Into<String>) -> Self {
        TransactionOutput {
            recipient: recipient.into(),
            amount,
            script: script.into(),
        }
    }

    /// Like [`TransactionOutput::new`], but refuses outputs whose record
    /// would not parse back.
    pub fn try_new(
        recipient: impl Into<String>,
        amount: f64,
        script: impl Into<String>,
    ) -> Result<Self, OutputParseError> {
        let output = TransactionOutput::new(recipient, amount, script);
        output.validate()?;
        Ok(output)
    }

    /// Check that [`to_record`](Self::to_record) yields a record that
    /// [`from_record`](Self::from_record) accepts.
    pub fn validate(&self) -> Result<(), OutputParseError> {
        if self.recipient.contains(RECORD_SEPARATOR) {
            return Err(OutputParseError::SeparatorInRecipient(self.recipient.clone()));
        }
        if self.recipient.contains('\n') || self.script.contains('\n') {
            return Err(OutputParseError::Multiline);
        }
        if !self.amount.is_finite() {
            return Err(OutputParseError::InvalidAmount(self.amount.to_string()));
        }
        Ok(())
    }

    /// Serialize to `recipient|amount|script`.
    pub fn to_record(&self) -> String {
        self.to_string()
    }

    /// Parse a `recipient|amount|script` record.
    pub fn from_record(record: &str) -> Result<Self, OutputParseError> {
        if record.contains('\n') {
            return Err(OutputParseError::Multiline);
        }

        let mut fields = record.splitn(3, RECORD_SEPARATOR);
        let recipient = fields.next().ok_or(OutputParseError::MissingField("recipient"))?;
        let amount = fields.next().ok_or(OutputParseError::MissingField("amount"))?;
        let script = fields.next().ok_or(OutputParseError::MissingField("script"))?;

        let amount = match amount.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => return Err(OutputParseError::InvalidAmount(amount.to_string())),
        };

        Ok(TransactionOutput::new(recipient, amount, script))
    }
}

impl fmt::Display for TransactionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.recipient,
            self.amount,
            self.script,
            sep = RECORD_SEPARATOR
        )
    }
}

impl FromStr for TransactionOutput {
    type Err = OutputParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionOutput::from_record(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format() {
        let output = TransactionOutput::new("1Alice", 5.0, "OP_DUP OP_HASH160");
        assert_eq!(output.to_record(), "1Alice|5|OP_DUP OP_HASH160");

        let fractional = TransactionOutput::new("bob", 0.25, "");
        assert_eq!(fractional.to_record(), "bob|0.25|");
    }

    #[test]
    fn test_parse_record() {
        let output = TransactionOutput::from_record("1Alice|12.5|pay to alice").unwrap();
        assert_eq!(output, TransactionOutput::new("1Alice", 12.5, "pay to alice"));
    }

    #[test]
    fn test_script_may_contain_separator() {
        let output: TransactionOutput = "carol|1|a|b|c".parse().unwrap();
        assert_eq!(output.recipient, "carol");
        assert_eq!(output.script, "a|b|c");
        assert_eq!(output.to_record(), "carol|1|a|b|c");
    }

    #[test]
    fn test_empty_script_roundtrips() {
        let output = TransactionOutput::new("dave", 3.0, "");
        assert_eq!(TransactionOutput::from_record(&output.to_record()).unwrap(), output);
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            TransactionOutput::from_record("alice"),
            Err(OutputParseError::MissingField("amount"))
        );
        assert_eq!(
            TransactionOutput::from_record("alice|5"),
            Err(OutputParseError::MissingField("script"))
        );
    }

    #[test]
    fn test_invalid_amounts() {
        for record in ["alice|five|x", "alice||x", "alice|NaN|x", "alice|inf|x", "alice|5abc|x"] {
            assert!(
                matches!(TransactionOutput::from_record(record), Err(OutputParseError::InvalidAmount(_))),
                "{} should be rejected",
                record
            );
        }
    }

    #[test]
    fn test_multiline_rejected() {
        assert_eq!(
            TransactionOutput::from_record("alice|1|line one\nline two"),
            Err(OutputParseError::Multiline)
        );
    }

    #[test]
    fn test_large_amount_renders_in_full() {
        // No exponent and no rounding to six significant digits
        let output = TransactionOutput::new("whale", 1234567.0, "s");
        assert_eq!(output.to_record(), "whale|1234567|s");
        assert_eq!(TransactionOutput::from_record("whale|1234567|s").unwrap(), output);

        let precise = TransactionOutput::new("whale", 21000000.12345678, "s");
        assert_eq!(precise.to_record(), "whale|21000000.12345678|s");
        assert_eq!(TransactionOutput::from_record(&precise.to_record()).unwrap(), precise);
    }

    #[test]
    fn test_try_new_rejects_unserializable_outputs() {
        assert_eq!(
            TransactionOutput::try_new("a|b", 1.0, "s"),
            Err(OutputParseError::SeparatorInRecipient("a|b".to_string()))
        );
        assert_eq!(
            TransactionOutput::try_new("alice", 1.0, "line one\nline two"),
            Err(OutputParseError::Multiline)
        );
        assert_eq!(TransactionOutput::try_new("al\nice", 1.0, "s"), Err(OutputParseError::Multiline));
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                TransactionOutput::try_new("alice", amount, "s"),
                Err(OutputParseError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_valid_outputs_survive_record_roundtrip() {
        let output = TransactionOutput::try_new("alice", 0.1, "a|b|c").unwrap();
        assert_eq!(output.validate(), Ok(()));
        assert_eq!(TransactionOutput::from_record(&output.to_record()).unwrap(), output);
    }
}
