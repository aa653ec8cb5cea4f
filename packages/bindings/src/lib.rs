use napi::Result as NapiResult;
use napi_derive::napi;

use rental_calc_core::real_estate::{self, FormInputs, PropertyInputs};
use rental_calc_core::scenarios::{self, SensitivityVariable};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_inputs(input_json: &str) -> NapiResult<PropertyInputs> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Form normalization
// ---------------------------------------------------------------------------

/// Normalize raw form values (camelCase keys, whole-number percents) into
/// the input record accepted by the other functions.
#[napi]
pub fn normalize_form(form_json: String) -> NapiResult<String> {
    let form: FormInputs = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let inputs = form.normalize().map_err(to_napi_error)?;
    serde_json::to_string(&inputs).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_property(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let output = real_estate::compute(&inputs);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_property(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let output = real_estate::analyze_property(&inputs).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

/// `variable` is one of purchase_price, monthly_rent, interest_rate,
/// vacancy_rate, operating_expenses.
#[napi]
pub fn build_one_variable_table(input_json: String, variable: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let variable: SensitivityVariable =
        serde_json::from_value(serde_json::Value::String(variable)).map_err(to_napi_error)?;
    let output = scenarios::build_one_variable_table(&inputs, variable);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_two_variable_matrix(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let output = scenarios::build_two_variable_matrix(&inputs);
    serde_json::to_string(&output).map_err(to_napi_error)
}
