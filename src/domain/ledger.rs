use serde::{Deserialize, Serialize};

use crate::domain::adjustment::FinancialAdjustment;
use crate::domain::common::{find_by_id, find_by_id_mut};
use crate::domain::seed;
use crate::domain::training::Training;

/// Root collection read by every aggregation query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrainingLedger {
    #[serde(default)]
    pub trainings: Vec<Training>,
    #[serde(default)]
    pub adjustments: Vec<FinancialAdjustment>,
}

impl TrainingLedger {
    pub fn new(trainings: Vec<Training>, adjustments: Vec<FinancialAdjustment>) -> Self {
        Self {
            trainings,
            adjustments,
        }
    }

    /// Built-in demo data used on first launch and as the load fallback.
    pub fn seeded() -> Self {
        Self::new(seed::demo_trainings(), Vec::new())
    }

    /// Replaces the trainings with the demo data, leaving adjustments untouched.
    pub fn reset_to_seed(&mut self) {
        self.trainings = seed::demo_trainings();
    }

    pub fn training(&self, id: &str) -> Option<&Training> {
        find_by_id(&self.trainings, id)
    }

    pub fn training_mut(&mut self, id: &str) -> Option<&mut Training> {
        find_by_id_mut(&mut self.trainings, id)
    }

    pub fn adjustment(&self, id: &str) -> Option<&FinancialAdjustment> {
        find_by_id(&self.adjustments, id)
    }

    pub fn session_count(&self) -> usize {
        self.trainings.iter().map(|t| t.sessions.len()).sum()
    }
}
