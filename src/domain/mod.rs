pub mod adjustment;
pub mod calendar;
pub mod common;
pub mod ledger;
pub mod seed;
pub mod session;
pub mod settings;
pub mod training;

pub use adjustment::FinancialAdjustment;
pub use calendar::{DateRange, YearMonth};
pub use common::{Displayable, Identifiable};
pub use ledger::TrainingLedger;
pub use session::{DurationError, Session, SessionDuration};
pub use settings::{AnalysisMode, AnalysisSettings, TaxRate};
pub use training::Training;
