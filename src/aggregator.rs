use crate::models::{Category, DashboardStats, Lead};
use crate::timestamp::parse_lead_timestamp;
use chrono::Timelike;
use std::collections::BTreeMap;

pub const NO_DATA_LABEL: &str = "No data";

/// Dashboard label for the window containing `hour` (0-23).
pub fn time_of_day_label(hour: u32) -> &'static str {
    match hour {
        9..=11 => "Morning (9 AM - 12 PM)",
        12..=14 => "Afternoon (12 PM - 3 PM)",
        15..=17 => "Late Afternoon (3 PM - 6 PM)",
        18..=20 => "Evening (6 PM - 9 PM)",
        _ => "Off Hours",
    }
}

/// Hour of day with the most submissions. Ties go to the earliest hour.
/// `None` when no timestamp parses.
pub fn busiest_hour<'a, I>(timestamps: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = [0usize; 24];
    for raw in timestamps {
        if let Some(dt) = parse_lead_timestamp(raw) {
            counts[dt.hour() as usize] += 1;
        }
    }

    let mut best: Option<(u32, usize)> = None;
    for (hour, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((hour as u32, count));
        }
    }
    best.map(|(hour, _)| hour)
}

/// Compute dashboard statistics over the given leads.
pub fn aggregate(leads: &[Lead]) -> DashboardStats {
    let mut hot_count = 0;
    let mut warm_count = 0;
    let mut cold_count = 0;
    let mut source_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for lead in leads {
        match lead.category {
            Category::Hot => hot_count += 1,
            Category::Warm => warm_count += 1,
            Category::Cold => cold_count += 1,
        }
        *source_distribution.entry(lead.source.clone()).or_insert(0) += 1;
    }

    let best_time_of_day = busiest_hour(leads.iter().map(|l| l.timestamp.as_str()))
        .map(time_of_day_label)
        .unwrap_or(NO_DATA_LABEL)
        .to_string();

    DashboardStats {
        total_leads: leads.len(),
        hot_count,
        warm_count,
        cold_count,
        source_distribution,
        best_time_of_day,
    }
}
