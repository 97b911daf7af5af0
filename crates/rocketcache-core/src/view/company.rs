use serde::{Deserialize, Serialize};

use crate::models::Company;

const UNITS: [(i64, &str); 3] = [
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Format a currency amount with one decimal and a magnitude word,
/// rounding half up: 1_250_000_000 -> "1.3 billion". Values below a
/// thousand are printed as-is.
pub fn format_valuation(value: i64) -> String {
    for (unit, word) in UNITS {
        if value >= unit {
            // Tenths of a unit, rounded half up; i128 keeps i64::MAX in range
            let tenths = (value as i128 * 10 + unit as i128 / 2) / unit as i128;
            return format!("{}.{} {}", tenths / 10, tenths % 10, word);
        }
    }
    value.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyView {
    pub name: String,
    pub founder: String,
    pub founded: i32,
    pub employees: i64,
    pub launch_sites: i32,
    pub formatted_valuation: String,
}

impl CompanyView {
    pub fn new(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            founder: company.founder.clone(),
            founded: company.founded,
            employees: company.employees,
            launch_sites: company.launch_sites,
            formatted_valuation: format_valuation(company.valuation),
        }
    }

    /// One-paragraph blurb for the company header
    pub fn summary(&self) -> String {
        format!(
            "{} was founded by {} in {}. It has now {} employees, {} launch sites, and is valued at USD {}.",
            self.name,
            self.founder,
            self.founded,
            self.employees,
            self.launch_sites,
            self.formatted_valuation
        )
    }
}
