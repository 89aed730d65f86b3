//! Date-part granularity and its field-name suffix.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static DATE_PART_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)(NumericDay|NumericMonth|NumericYear)$").expect("date part regex")
});

/// Which granularity of a temporal field a query column targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePart {
    FullDate,
    Year,
    Month,
    Day,
}

impl DatePart {
    /// Suffix appended to the field name in a string id. `FullDate` has none.
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            DatePart::FullDate => None,
            DatePart::Year => Some("NumericYear"),
            DatePart::Month => Some("NumericMonth"),
            DatePart::Day => Some("NumericDay"),
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "NumericYear" => Some(DatePart::Year),
            "NumericMonth" => Some(DatePart::Month),
            "NumericDay" => Some(DatePart::Day),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DatePart::FullDate => "fullDate",
            DatePart::Year => "year",
            DatePart::Month => "month",
            DatePart::Day => "day",
        })
    }
}

/// Split a trailing date-part suffix off a raw field name.
///
/// Returns the name unchanged and `None` when no suffix is present.
pub fn extract_date_part(field_name: &str) -> (&str, Option<DatePart>) {
    match DATE_PART_SUFFIX.captures(field_name) {
        Some(caps) => {
            let (Some(base), Some(suffix)) = (caps.get(1), caps.get(2)) else {
                return (field_name, None);
            };
            (base.as_str(), DatePart::from_suffix(suffix.as_str()))
        }
        None => (field_name, None),
    }
}
