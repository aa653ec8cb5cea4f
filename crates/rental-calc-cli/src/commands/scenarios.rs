use clap::{Args, ValueEnum};
use serde_json::Value;

use rental_calc_core::scenarios::{self, SensitivityVariable};

use super::{load_inputs, InputArgs};

/// Input swept by the one-way table
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VariableArg {
    PurchasePrice,
    Rent,
    InterestRate,
    Vacancy,
    Expenses,
}

impl From<VariableArg> for SensitivityVariable {
    fn from(arg: VariableArg) -> Self {
        match arg {
            VariableArg::PurchasePrice => SensitivityVariable::PurchasePrice,
            VariableArg::Rent => SensitivityVariable::MonthlyRent,
            VariableArg::InterestRate => SensitivityVariable::InterestRate,
            VariableArg::Vacancy => SensitivityVariable::VacancyRate,
            VariableArg::Expenses => SensitivityVariable::OperatingExpenses,
        }
    }
}

/// Arguments for one-way sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// Input to sweep
    #[arg(long, value_enum, default_value = "purchase-price")]
    pub variable: VariableArg,

    #[command(flatten)]
    pub source: InputArgs,
}

/// Arguments for the price x rent matrix
#[derive(Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub source: InputArgs,
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = load_inputs(&args.source)?;
    let result = scenarios::one_variable_sensitivity(&inputs, args.variable.into());
    Ok(serde_json::to_value(result)?)
}

pub fn run_matrix(args: MatrixArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = load_inputs(&args.source)?;
    let result = scenarios::price_rent_sensitivity(&inputs);
    Ok(serde_json::to_value(result)?)
}
