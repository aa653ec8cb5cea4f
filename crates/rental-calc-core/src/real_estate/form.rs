//! Raw form values as a web page collects them, and the normalization that
//! turns them into [`PropertyInputs`].
//!
//! Form fields arrive as numbers or free text. Anything missing or
//! unparsable counts as zero, every value is rounded to cents, and
//! percentage fields are entered as whole percents (7 = 7%).

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::{ExpensePeriod, PeriodicAmount, PropertyInputs};
use crate::error::RentalCalcError;
use crate::RentalCalcResult;

/// A single form field: a JSON/YAML number or the text typed into a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(serde_json::Number),
    Text(String),
}

impl FormValue {
    /// Parse to a decimal rounded to cents; unparsable text is zero.
    pub fn to_decimal(&self) -> Decimal {
        let parsed = match self {
            FormValue::Number(n) => parse_decimal(&n.to_string()),
            FormValue::Text(s) => parse_decimal(s),
        };
        parsed
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Read the leading number of a text box the way a browser's `parseFloat`
/// does: `"12abc"` is 12, `"1,200"` is 1, `"abc"` is nothing.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let literal = numeric_prefix(raw.trim_start());
    if literal.is_empty() {
        return None;
    }
    if literal.contains(['e', 'E']) {
        Decimal::from_scientific(literal).ok()
    } else {
        Decimal::from_str(literal).ok()
    }
}

/// Longest prefix of `raw` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits_from(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }
    &raw[..end]
}

/// Field values keyed the way the calculator form names its inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormInputs {
    pub purchase_price: Option<FormValue>,
    pub closing_cost: Option<FormValue>,
    pub rehab_toggle: bool,
    pub rehab_cost: Option<FormValue>,
    pub arv: Option<FormValue>,
    pub appreciation_rate: Option<FormValue>,

    pub cash_purchase_toggle: bool,
    pub down_payment_percent: Option<FormValue>,
    pub interest_rate: Option<FormValue>,
    pub loan_term: Option<FormValue>,
    pub loan_points: Option<FormValue>,

    pub monthly_income: Option<FormValue>,
    pub other_income: Option<FormValue>,
    pub income_growth: Option<FormValue>,

    pub property_taxes: Option<FormValue>,
    pub property_taxes_period: Option<String>,
    pub insurance: Option<FormValue>,
    pub insurance_period: Option<String>,

    pub repairs_maintenance: Option<FormValue>,
    pub capex: Option<FormValue>,
    pub vacancy: Option<FormValue>,
    pub management_fees: Option<FormValue>,

    pub electricity: Option<FormValue>,
    pub gas: Option<FormValue>,
    pub water_sewer: Option<FormValue>,
    pub hoa: Option<FormValue>,
    pub garbage: Option<FormValue>,
    pub other_expense: Option<FormValue>,

    pub expense_growth: Option<FormValue>,
    pub sales_expenses: Option<FormValue>,
}

fn value(field: &Option<FormValue>) -> Decimal {
    field.as_ref().map(FormValue::to_decimal).unwrap_or(Decimal::ZERO)
}

fn percent(field: &Option<FormValue>) -> Decimal {
    value(field) / dec!(100)
}

fn period(field_name: &str, raw: &Option<String>) -> RentalCalcResult<ExpensePeriod> {
    match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(ExpensePeriod::Annual),
        Some(s) if s == "annual" => Ok(ExpensePeriod::Annual),
        Some(s) if s == "monthly" => Ok(ExpensePeriod::Monthly),
        Some(other) => Err(RentalCalcError::InvalidInput {
            field: field_name.into(),
            reason: format!("Period must be 'monthly' or 'annual', got '{other}'"),
        }),
    }
}

impl FormInputs {
    /// Normalize form values into an input record.
    ///
    /// Fails only on an unrecognised expense period.
    pub fn normalize(&self) -> RentalCalcResult<PropertyInputs> {
        let purchase_price = value(&self.purchase_price);
        let (rehab_cost, after_repair_value) = if self.rehab_toggle {
            (value(&self.rehab_cost), value(&self.arv))
        } else {
            (Decimal::ZERO, purchase_price)
        };

        Ok(PropertyInputs {
            purchase_price,
            closing_cost: value(&self.closing_cost),
            is_rehab: self.rehab_toggle,
            rehab_cost,
            after_repair_value,
            appreciation_rate: percent(&self.appreciation_rate),

            is_cash: self.cash_purchase_toggle,
            down_payment_pct: percent(&self.down_payment_percent),
            interest_rate_annual: percent(&self.interest_rate),
            loan_term_years: value(&self.loan_term),
            loan_points: value(&self.loan_points),

            monthly_income: value(&self.monthly_income),
            other_income: value(&self.other_income),
            income_growth: percent(&self.income_growth),

            property_taxes: PeriodicAmount {
                amount: value(&self.property_taxes),
                period: period("propertyTaxesPeriod", &self.property_taxes_period)?,
            },
            insurance: PeriodicAmount {
                amount: value(&self.insurance),
                period: period("insurancePeriod", &self.insurance_period)?,
            },
            repairs_maintenance_pct: percent(&self.repairs_maintenance),
            capex_pct: percent(&self.capex),
            vacancy_pct: percent(&self.vacancy),
            management_pct: percent(&self.management_fees),
            electricity: value(&self.electricity),
            gas: value(&self.gas),
            water_sewer: value(&self.water_sewer),
            hoa: value(&self.hoa),
            garbage: value(&self.garbage),
            other_expense: value(&self.other_expense),
            expense_growth: percent(&self.expense_growth),

            sale_expense_pct: percent(&self.sales_expenses),
        })
    }
}

impl TryFrom<FormInputs> for PropertyInputs {
    type Error = RentalCalcError;

    fn try_from(form: FormInputs) -> Result<Self, Self::Error> {
        form.normalize()
    }
}
