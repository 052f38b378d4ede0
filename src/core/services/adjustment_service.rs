use crate::core::errors::CoreError;
use crate::core::services::ServiceResult;
use crate::domain::{FinancialAdjustment, TrainingLedger};

/// Adds and removes signed period-level corrections.
pub struct AdjustmentService;

impl AdjustmentService {
    pub fn add(ledger: &mut TrainingLedger, adjustment: FinancialAdjustment) -> ServiceResult<String> {
        if !adjustment.value.is_finite() {
            return Err(CoreError::Validation("adjustment value must be a finite number".into()).into());
        }
        if adjustment.description.trim().is_empty() {
            return Err(CoreError::Validation("adjustment description cannot be empty".into()).into());
        }
        if ledger.adjustment(&adjustment.id).is_some() {
            return Err(CoreError::Duplicate(adjustment.id).into());
        }
        let id = adjustment.id.clone();
        ledger.adjustments.push(adjustment);
        Ok(id)
    }

    pub fn remove(ledger: &mut TrainingLedger, id: &str) -> ServiceResult<FinancialAdjustment> {
        let index = ledger
            .adjustments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::AdjustmentNotFound(id.to_string()))?;
        Ok(ledger.adjustments.remove(index))
    }
}
