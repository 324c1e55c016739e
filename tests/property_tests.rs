/// Property-based tests using proptest
/// Tests invariants of scoring, parsing and aggregation for arbitrary inputs
use chrono::{TimeZone, Utc};
use lead_quality_engine::aggregator::aggregate;
use lead_quality_engine::ingestion::parse_csv;
use lead_quality_engine::models::{Category, Lead, RawLeadInput};
use lead_quality_engine::reply_parser::{parse_blocks, parse_lines, parse_reply};
use lead_quality_engine::scoring::ScoringRules;
use lead_quality_engine::timestamp::parse_lead_timestamp;
use proptest::prelude::*;

fn raw_lead_strategy() -> impl Strategy<Value = RawLeadInput> {
    (
        prop_oneof![
            Just("SEO".to_string()),
            Just("PPC".to_string()),
            Just("Lead Generation".to_string()),
            "[A-Za-z ]{0,20}",
        ],
        prop_oneof![
            Just("Hyderabad".to_string()),
            Just("Vizag".to_string()),
            "[A-Za-z]{0,12}",
        ],
        prop_oneof![
            Just("Google Ads".to_string()),
            Just("Website".to_string()),
            "[A-Za-z ]{0,12}",
        ],
        prop::option::of("[a-z]{0,8}(@[a-z]{1,8}\\.com)?"),
        prop_oneof![
            (0u32..24, 0u32..60).prop_map(|(h, m)| format!("2024-01-15T{:02}:{:02}:00", h, m)),
            "\\PC{0,25}",
        ],
    )
        .prop_map(|(service, city, source, email, timestamp)| RawLeadInput {
            name: "Prop Lead".to_string(),
            phone: "+91-9000000000".to_string(),
            email,
            source,
            service_interest: service,
            location: city,
            timestamp,
        })
}

fn lead_strategy() -> impl Strategy<Value = Lead> {
    (raw_lead_strategy(), "[A-Z][a-z]{0,6}").prop_map(|(input, source)| {
        let scored = ScoringRules::default().score(&input);
        let mut lead = Lead::new(
            RawLeadInput { source, ..input },
            scored,
        );
        lead.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        lead
    })
}

// Property: Scores are bounded and categories follow thresholds
proptest! {
    #[test]
    fn score_is_bounded(lead in raw_lead_strategy()) {
        let scored = ScoringRules::default().score(&lead);
        prop_assert!(scored.score >= 10);
        prop_assert!(scored.score <= 100);
    }

    #[test]
    fn category_matches_thresholds(lead in raw_lead_strategy()) {
        let rules = ScoringRules::default();
        let scored = rules.score(&lead);
        let expected = if scored.score >= rules.hot_threshold {
            Category::Hot
        } else if scored.score >= rules.warm_threshold {
            Category::Warm
        } else {
            Category::Cold
        };
        prop_assert_eq!(scored.category, expected);
    }

    #[test]
    fn scoring_is_deterministic(lead in raw_lead_strategy()) {
        let rules = ScoringRules::default();
        prop_assert_eq!(rules.score(&lead), rules.score(&lead));
    }

    #[test]
    fn unknown_attributes_score_base_only(
        service in "zz[a-z]{0,8}",
        city in "zz[a-z]{0,8}",
        source in "zz[a-z]{0,8}",
    ) {
        let lead = RawLeadInput {
            name: "Nobody".to_string(),
            phone: "0".to_string(),
            email: None,
            source,
            service_interest: service,
            location: city,
            timestamp: "2024-01-15T23:30:00".to_string(),
        };
        let scored = ScoringRules::default().score(&lead);
        prop_assert_eq!(scored.score, 10);
        prop_assert_eq!(scored.category, Category::Cold);
    }

    #[test]
    fn all_rules_matched_scores_maximum(hour in 9u32..18, minute in 0u32..60) {
        let lead = RawLeadInput {
            name: "Best".to_string(),
            phone: "1".to_string(),
            email: Some("best@example.com".to_string()),
            source: "Google Ads".to_string(),
            service_interest: "SEO".to_string(),
            location: "Hyderabad".to_string(),
            timestamp: format!("2024-03-01T{:02}:{:02}:00", hour, minute),
        };
        let scored = ScoringRules::default().score(&lead);
        prop_assert_eq!(scored.score, 100);
        prop_assert_eq!(scored.category, Category::Hot);
    }
}

// Property: Parsers never panic on arbitrary input
proptest! {
    #[test]
    fn reply_parser_never_panics(reply in "\\PC*") {
        let _ = parse_reply(&reply);
        let _ = parse_blocks(&reply);
        let _ = parse_lines(&reply);
    }

    #[test]
    fn parsed_sections_are_trimmed(reply in "((WHATSAPP:|EMAIL:|CALL:| |\n|[a-z]){0,80})") {
        let sections = parse_reply(&reply);
        for text in [&sections.whatsapp, &sections.email, &sections.call] {
            prop_assert_eq!(text.trim(), text.as_str());
        }
    }

    #[test]
    fn timestamp_parser_never_panics(raw in "\\PC*") {
        let _ = parse_lead_timestamp(&raw);
    }

    #[test]
    fn csv_parser_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = parse_csv(&bytes);
    }
}

// Property: Dashboard counts are consistent with the lead set
proptest! {
    #[test]
    fn dashboard_counts_add_up(leads in prop::collection::vec(lead_strategy(), 0..30)) {
        let stats = aggregate(&leads);
        prop_assert_eq!(stats.total_leads, leads.len());
        prop_assert_eq!(stats.hot_count + stats.warm_count + stats.cold_count, leads.len());
        prop_assert_eq!(stats.source_distribution.values().sum::<usize>(), leads.len());
        if leads.is_empty() {
            prop_assert_eq!(stats.best_time_of_day.as_str(), "No data");
        }
    }

    #[test]
    fn dashboard_ignores_lead_order(leads in prop::collection::vec(lead_strategy(), 0..20)) {
        let mut reversed = leads.clone();
        reversed.reverse();
        prop_assert_eq!(aggregate(&leads), aggregate(&reversed));
    }
}
