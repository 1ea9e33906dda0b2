use std::fmt::Display;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanDuration {
    #[serde(rename = "2 weeks")]
    TwoWeeks,
    #[serde(rename = "1 month")]
    OneMonth,
    #[serde(rename = "6 months")]
    SixMonths,
    #[serde(rename = "1 year")]
    OneYear,
}

impl PlanDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanDuration::TwoWeeks => "2 weeks",
            PlanDuration::OneMonth => "1 month",
            PlanDuration::SixMonths => "6 months",
            PlanDuration::OneYear => "1 year",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "2 weeks" => Some(PlanDuration::TwoWeeks),
            "1 month" => Some(PlanDuration::OneMonth),
            "6 months" => Some(PlanDuration::SixMonths),
            "1 year" => Some(PlanDuration::OneYear),
            _ => None,
        }
    }

    /// Month-based plans follow the calendar, so a period opened on
    /// Jan 31 closes on the last day of the shorter target month.
    pub fn end_date_from(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            PlanDuration::TwoWeeks => start + Duration::days(14),
            PlanDuration::OneMonth => start.checked_add_months(Months::new(1)).unwrap_or(start),
            PlanDuration::SixMonths => start.checked_add_months(Months::new(6)).unwrap_or(start),
            PlanDuration::OneYear => start.checked_add_months(Months::new(12)).unwrap_or(start),
        }
    }
}

impl Display for PlanDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
