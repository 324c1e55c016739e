//! Rule-based lead scoring.
//!
//! Every rule is additive and evaluated independently:
//!
//! | Rule                                   | Points |
//! |----------------------------------------|--------|
//! | service interest is high-intent        | 25     |
//! | location is a target city              | 20     |
//! | source is high-value                   | 20     |
//! | submitted within business hours        | 15     |
//! | email present                          | 10     |
//! | base                                   | 10     |
//!
//! The total is capped at 100 and mapped to a [`Category`] through two
//! thresholds. All sets and thresholds live in [`ScoringRules`].

use crate::models::{Category, LeadScore, RawLeadInput};
use crate::timestamp::parse_lead_timestamp;
use chrono::NaiveTime;
use std::collections::HashSet;

pub const HIGH_INTENT_POINTS: u32 = 25;
pub const TARGET_CITY_POINTS: u32 = 20;
pub const HIGH_VALUE_SOURCE_POINTS: u32 = 20;
pub const BUSINESS_HOURS_POINTS: u32 = 15;
pub const EMAIL_POINTS: u32 = 10;
pub const BASE_POINTS: u32 = 10;
pub const MAX_SCORE: u8 = 100;

pub const DEFAULT_HIGH_INTENT_SERVICES: &[&str] = &[
    "Real Estate Marketing",
    "Lead Generation",
    "SEO",
    "PPC",
    "Website Development",
];
pub const DEFAULT_TARGET_CITIES: &[&str] = &["Hyderabad", "Vizag", "Bengaluru"];
pub const DEFAULT_HIGH_VALUE_SOURCES: &[&str] = &["Google Ads", "Website"];
pub const DEFAULT_HOT_THRESHOLD: u8 = 70;
pub const DEFAULT_WARM_THRESHOLD: u8 = 40;

/// Adjustable inputs of the scorer.
#[derive(Debug, Clone)]
pub struct ScoringRules {
    pub high_intent_services: HashSet<String>,
    pub target_cities: HashSet<String>,
    pub high_value_sources: HashSet<String>,
    /// Minimum score for Hot.
    pub hot_threshold: u8,
    /// Minimum score for Warm.
    pub warm_threshold: u8,
    /// Inclusive start of the business-hours window.
    pub business_start: NaiveTime,
    /// Inclusive end of the business-hours window.
    pub business_end: NaiveTime,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            high_intent_services: to_set(DEFAULT_HIGH_INTENT_SERVICES),
            target_cities: to_set(DEFAULT_TARGET_CITIES),
            high_value_sources: to_set(DEFAULT_HIGH_VALUE_SOURCES),
            hot_threshold: DEFAULT_HOT_THRESHOLD,
            warm_threshold: DEFAULT_WARM_THRESHOLD,
            business_start: on_the_hour(9),
            business_end: on_the_hour(18),
        }
    }
}

fn on_the_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

fn to_set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl ScoringRules {
    /// Score a lead. Never fails: an unparseable timestamp only forfeits the
    /// business-hours bonus.
    pub fn score(&self, lead: &RawLeadInput) -> LeadScore {
        let mut total = BASE_POINTS;

        if self.high_intent_services.contains(&lead.service_interest) {
            total += HIGH_INTENT_POINTS;
        }

        if self.target_cities.contains(&lead.location) {
            total += TARGET_CITY_POINTS;
        }

        if self.high_value_sources.contains(&lead.source) {
            total += HIGH_VALUE_SOURCE_POINTS;
        }

        if self.within_business_hours(&lead.timestamp) {
            total += BUSINESS_HOURS_POINTS;
        }

        if lead.email.as_deref().is_some_and(|e| !e.is_empty()) {
            total += EMAIL_POINTS;
        }

        let score = total.min(u32::from(MAX_SCORE)) as u8;

        LeadScore {
            score,
            category: self.categorize(score),
        }
    }

    /// Map a score to its category under the configured thresholds.
    pub fn categorize(&self, score: u8) -> Category {
        if score >= self.hot_threshold {
            Category::Hot
        } else if score >= self.warm_threshold {
            Category::Warm
        } else {
            Category::Cold
        }
    }

    fn within_business_hours(&self, timestamp: &str) -> bool {
        match parse_lead_timestamp(timestamp) {
            Some(dt) => {
                let time = dt.time();
                self.business_start <= time && time <= self.business_end
            }
            None => {
                tracing::debug!(
                    "Unparseable lead timestamp '{}', skipping business-hours bonus",
                    timestamp
                );
                false
            }
        }
    }
}
