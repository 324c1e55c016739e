use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ============ Lead Models ============

/// A lead as it arrives from an upload, before scoring.
///
/// Required fields are already validated by ingestion; `email` is the only
/// optional attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLeadInput {
    /// Contact name.
    pub name: String,
    /// Phone number, kept as written.
    pub phone: String,
    /// Email address, if one was given.
    pub email: Option<String>,
    /// Acquisition channel (e.g., "Google Ads", "Website").
    pub source: String,
    /// Service the lead asked about (e.g., "SEO").
    pub service_interest: String,
    /// City of the lead.
    pub location: String,
    /// Submission time, ISO-8601 with or without offset.
    pub timestamp: String,
}

/// Lead temperature derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Hot,
    Warm,
    Cold,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hot => "Hot",
            Category::Warm => "Warm",
            Category::Cold => "Cold",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored category label is not Hot, Warm or Cold.
#[derive(Debug, thiserror::Error)]
#[error("unknown lead category '{0}'")]
pub struct UnknownCategory(pub String);

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Hot" => Ok(Category::Hot),
            "Warm" => Ok(Category::Warm),
            "Cold" => Ok(Category::Cold),
            _ => Err(UnknownCategory(value)),
        }
    }
}

/// Outcome of scoring one lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadScore {
    /// Score in [0, 100].
    pub score: u8,
    pub category: Category,
}

/// A scored lead as stored and listed.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier assigned at ingestion.
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub source: String,
    pub service_interest: String,
    pub location: String,
    pub timestamp: String,
    /// Quality score in [0, 100].
    #[sqlx(try_from = "i32")]
    pub score: u8,
    #[sqlx(try_from = "String")]
    pub category: Category,
    /// Time the lead was ingested.
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Builds a stored lead from a raw row and its score, assigning a fresh
    /// id and creation time.
    pub fn new(input: RawLeadInput, scored: LeadScore) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            source: input.source,
            service_interest: input.service_interest,
            location: input.location,
            timestamp: input.timestamp,
            score: scored.score,
            category: scored.category,
            created_at: Utc::now(),
        }
    }
}

// ============ Message Models ============

/// Drafted follow-up messages for a lead. None of the fields is ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AIMessages {
    /// Short chat message (WhatsApp).
    pub whatsapp: String,
    /// Email with subject line and body.
    pub email: String,
    /// Opening lines for a phone call.
    pub call_script: String,
}

/// Lead detail response: the lead plus freshly composed messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadWithMessages {
    #[serde(flatten)]
    pub lead: Lead,
    pub ai_messages: AIMessages,
}

// ============ Dashboard Models ============

/// Aggregated lead statistics for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_leads: usize,
    pub hot_count: usize,
    pub warm_count: usize,
    pub cold_count: usize,
    /// Lead count per observed source, ordered by source name.
    pub source_distribution: BTreeMap<String, usize>,
    /// Label of the busiest submission window, or "No data".
    pub best_time_of_day: String,
}

// ============ API Models ============

/// Response for a CSV upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

/// Response for deleting every lead.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_count: u64,
}
