//! CSV upload parsing.
//!
//! Expected header (any column order, `email` optional):
//!
//! ```text
//! name,phone,email,source,service_interest,location,timestamp
//! ```
//!
//! Every row is validated before anything is scored or stored, so a bad
//! upload is rejected as a whole.

use crate::models::{Lead, RawLeadInput};
use crate::scoring::ScoringRules;
use serde::Deserialize;

/// Why an upload could not be turned into leads.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("upload is not valid UTF-8")]
    InvalidEncoding,

    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
}

/// A CSV row as written, before validation.
#[derive(Debug, Deserialize)]
struct CsvLeadRow {
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    source: Option<String>,
    service_interest: Option<String>,
    location: Option<String>,
    timestamp: Option<String>,
}

impl CsvLeadRow {
    /// `row` is the 1-based data row number, used in error messages.
    fn validate(self, row: usize) -> Result<RawLeadInput, IngestError> {
        let required = |value: Option<String>, field: &'static str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(IngestError::MissingField { row, field })
        };

        Ok(RawLeadInput {
            name: required(self.name, "name")?,
            phone: required(self.phone, "phone")?,
            email: self.email.filter(|e| !e.trim().is_empty()),
            source: required(self.source, "source")?,
            service_interest: required(self.service_interest, "service_interest")?,
            location: required(self.location, "location")?,
            timestamp: required(self.timestamp, "timestamp")?,
        })
    }
}

/// Parse uploaded CSV bytes into validated lead inputs.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawLeadInput>, IngestError> {
    let text = std::str::from_utf8(bytes).map_err(|_| IngestError::InvalidEncoding)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut inputs = Vec::new();
    for (idx, record) in reader.deserialize::<CsvLeadRow>().enumerate() {
        inputs.push(record?.validate(idx + 1)?);
    }

    Ok(inputs)
}

/// Parse, validate and score an upload, producing leads ready to store.
pub fn ingest_csv(bytes: &[u8], rules: &ScoringRules) -> Result<Vec<Lead>, IngestError> {
    let leads: Vec<Lead> = parse_csv(bytes)?
        .into_iter()
        .map(|input| {
            let scored = rules.score(&input);
            Lead::new(input, scored)
        })
        .collect();

    tracing::debug!("Scored {} uploaded lead(s)", leads.len());
    Ok(leads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    const HEADER: &str = "name,phone,email,source,service_interest,location,timestamp";

    #[test]
    fn test_example_row_scores_hundred() {
        let csv = format!(
            "{}\nTest,+1,t@e.com,Website,SEO,Hyderabad,2024-12-15T10:30:00\n",
            HEADER
        );
        let leads = ingest_csv(csv.as_bytes(), &ScoringRules::default()).unwrap();

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Test");
        assert_eq!(leads[0].email.as_deref(), Some("t@e.com"));
        assert_eq!(leads[0].score, 100);
        assert_eq!(leads[0].category, Category::Hot);
    }

    #[test]
    fn test_quoted_fields_and_any_column_order() {
        let csv = "timestamp,location,service_interest,source,phone,name\n\
                   2024-12-15T20:00:00,Delhi,\"Logo Design, Branding\",Referral,\"+91 98\",\"Doe, Jane\"\n";
        let inputs = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(inputs[0].name, "Doe, Jane");
        assert_eq!(inputs[0].service_interest, "Logo Design, Branding");
        assert_eq!(inputs[0].email, None);
    }

    #[test]
    fn test_blank_email_is_none_and_values_trimmed() {
        let csv = format!("{}\n Ana , 1 ,  , Website , SEO , Vizag , 2024-12-15T10:30:00\n", HEADER);
        let inputs = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(inputs[0].name, "Ana");
        assert_eq!(inputs[0].email, None);
        assert_eq!(inputs[0].location, "Vizag");
    }

    #[test]
    fn test_missing_value_names_row_and_field() {
        let csv = format!(
            "{}\nA,1,,Website,SEO,Vizag,2024-12-15T10:30:00\nB,2,,Website,,Vizag,2024-12-15T10:30:00\n",
            HEADER
        );
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingField { row: 2, field: "service_interest" }
        ));
        assert_eq!(err.to_string(), "row 2: missing required field 'service_interest'");
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let csv = "name,phone,source,service_interest,location\nA,1,Website,SEO,Vizag\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::MissingField { row: 1, field: "timestamp" }));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let csv = format!("{}\nA,1\n", HEADER);
        assert!(matches!(parse_csv(csv.as_bytes()), Err(IngestError::Malformed(_))));
    }

    #[test]
    fn test_non_utf8_rejected() {
        assert!(matches!(parse_csv(&[0xff, 0xfe, 0x00]), Err(IngestError::InvalidEncoding)));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(parse_csv(HEADER.as_bytes()).unwrap().is_empty());
        assert!(parse_csv(b"").unwrap().is_empty());
    }
}
