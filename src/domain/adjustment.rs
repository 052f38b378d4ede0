use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::calendar::flexible_date;
use crate::domain::common::{new_id, Displayable, Identifiable};

/// Standalone signed income or deduction, placed in a period by its date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialAdjustment {
    pub id: String,
    pub description: String,
    /// Positive values are income, negative values deductions.
    pub value: f64,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
}

impl FinancialAdjustment {
    pub fn new(description: impl Into<String>, value: f64, date: NaiveDate) -> Self {
        Self {
            id: new_id("adj"),
            description: description.into(),
            value,
            date,
        }
    }

    pub fn is_deduction(&self) -> bool {
        self.value < 0.0
    }
}

impl Identifiable for FinancialAdjustment {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for FinancialAdjustment {
    fn display_label(&self) -> String {
        format!("{} {:+.2} ({})", self.date, self.value, self.description)
    }
}
