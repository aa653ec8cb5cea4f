pub mod amortization;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "real_estate")]
pub mod real_estate;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::RentalCalcError;
pub use types::*;

/// Standard result type for all rental-calc operations
pub type RentalCalcResult<T> = Result<T, RentalCalcError>;
