use clap::Args;
use serde_json::Value;

use rental_calc_core::real_estate;

use super::{load_inputs, InputArgs};

/// Arguments for property analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: InputArgs,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub source: InputArgs,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = load_inputs(&args.source)?;
    let result = real_estate::analyze_property(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = load_inputs(&args.source)?;
    let schedule = real_estate::loan_schedule(&inputs)?;
    Ok(serde_json::json!({ "results": schedule }))
}
