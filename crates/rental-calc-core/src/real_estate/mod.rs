pub mod analysis;
pub mod form;
pub mod inputs;
pub mod projection;

pub use analysis::{
    analyze_property, compute, loan_schedule, Dscr, MonthlyExpenses, PropertyAnalysis,
};
pub use form::{FormInputs, FormValue};
pub use inputs::{ExpensePeriod, PeriodicAmount, PropertyInputs};
pub use projection::{ProjectionYear, PROJECTION_YEARS};
