use std::time::Instant;

use log::trace;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::{format_currency, format_step};
use crate::real_estate::analysis::compute;
use crate::real_estate::inputs::PropertyInputs;
use crate::types::*;

// ---------------------------------------------------------------------------
// Step lists
// ---------------------------------------------------------------------------

const PRICE_STEPS: [Decimal; 9] = [
    dec!(-20),
    dec!(-15),
    dec!(-10),
    dec!(-5),
    dec!(0),
    dec!(5),
    dec!(10),
    dec!(15),
    dec!(20),
];

const RENT_STEPS: [Decimal; 7] = [
    dec!(-15),
    dec!(-10),
    dec!(-5),
    dec!(0),
    dec!(5),
    dec!(10),
    dec!(15),
];

/// Percentage-point changes to the annual interest rate
const INTEREST_STEPS: [Decimal; 7] = [
    dec!(-1.5),
    dec!(-1.0),
    dec!(-0.5),
    dec!(0),
    dec!(0.5),
    dec!(1.0),
    dec!(1.5),
];

/// Vacancy rates substituted for the base rate, in percent
const VACANCY_STEPS: [Decimal; 6] = [dec!(0), dec!(3), dec!(5), dec!(8), dec!(10), dec!(15)];

const EXPENSE_STEPS: [Decimal; 6] = [dec!(-20), dec!(-10), dec!(0), dec!(10), dec!(20), dec!(30)];

/// Price and rent steps shared by both axes of the two-way matrix
const MATRIX_STEPS: [Decimal; 7] = RENT_STEPS;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An input that the one-way table can sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    /// Purchase price, percent change from base
    PurchasePrice,
    /// Monthly rent, percent change from base
    MonthlyRent,
    /// Annual interest rate, percentage-point change from base
    InterestRate,
    /// Vacancy rate, replaced by each step
    VacancyRate,
    /// All fixed-amount expenses together, percent change from base
    OperatingExpenses,
}

impl SensitivityVariable {
    pub const ALL: [SensitivityVariable; 5] = [
        SensitivityVariable::PurchasePrice,
        SensitivityVariable::MonthlyRent,
        SensitivityVariable::InterestRate,
        SensitivityVariable::VacancyRate,
        SensitivityVariable::OperatingExpenses,
    ];

    /// Column heading for the swept input.
    pub fn label(&self) -> &'static str {
        match self {
            SensitivityVariable::PurchasePrice => "Purchase Price",
            SensitivityVariable::MonthlyRent => "Monthly Rent",
            SensitivityVariable::InterestRate => "Interest Rate",
            SensitivityVariable::VacancyRate => "Vacancy Rate",
            SensitivityVariable::OperatingExpenses => "Total OpEx Change",
        }
    }

    pub fn steps(&self) -> &'static [Decimal] {
        match self {
            SensitivityVariable::PurchasePrice => &PRICE_STEPS,
            SensitivityVariable::MonthlyRent => &RENT_STEPS,
            SensitivityVariable::InterestRate => &INTEREST_STEPS,
            SensitivityVariable::VacancyRate => &VACANCY_STEPS,
            SensitivityVariable::OperatingExpenses => &EXPENSE_STEPS,
        }
    }

    /// Apply one step to a copy of `base`, returning the perturbed inputs,
    /// the value the swept input took, and its display label.
    fn apply(&self, base: &PropertyInputs, step: Decimal) -> (PropertyInputs, Decimal, String) {
        match self {
            SensitivityVariable::PurchasePrice => {
                let price = scale_by_percent(base.purchase_price, step);
                let label = format!("{} ({})", format_currency(price, 0), format_step(step));
                (base.with_purchase_price(price), price, label)
            }
            SensitivityVariable::MonthlyRent => {
                let rent = scale_by_percent(base.monthly_income, step);
                let label = format!("{} ({})", format_currency(rent, 0), format_step(step));
                (base.with_monthly_income(rent), rent, label)
            }
            SensitivityVariable::InterestRate => {
                // label shows the requested rate; the computation floors it at zero
                let requested = base.interest_rate_annual + step / dec!(100);
                let perturbed = base.with_interest_rate(requested);
                let rate = perturbed.interest_rate_annual;
                let label = format!(
                    "{:.1}% ({})",
                    (requested * dec!(100)).round_dp(1),
                    format_step(step)
                );
                (perturbed, rate, label)
            }
            SensitivityVariable::VacancyRate => {
                let vacancy = step / dec!(100);
                let label = format!("{}%", step.normalize());
                (base.with_vacancy_pct(vacancy), vacancy, label)
            }
            SensitivityVariable::OperatingExpenses => {
                let multiplier = Decimal::ONE + step / dec!(100);
                let perturbed = if step.is_zero() {
                    base.clone()
                } else {
                    base.with_expense_multiplier(multiplier)
                };
                (perturbed, multiplier, format_step(step))
            }
        }
    }

    /// Whether `step` reproduces the unperturbed inputs.
    fn is_base(&self, base: &PropertyInputs, step: Decimal) -> bool {
        match self {
            SensitivityVariable::VacancyRate => step / dec!(100) == base.vacancy_pct,
            _ => step.is_zero(),
        }
    }
}

/// `value * (1 + step%)`; a zero step returns `value` untouched.
fn scale_by_percent(value: Money, step: Decimal) -> Money {
    if step.is_zero() {
        value
    } else {
        value * (Decimal::ONE + step / dec!(100))
    }
}

/// One row of a one-way sensitivity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub step: Decimal,
    /// Value the swept input took for this row
    pub value: Decimal,
    pub label: String,
    pub monthly_mortgage: Money,
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    pub cash_on_cash: Percent,
    pub cap_rate: Percent,
    pub is_base: bool,
}

/// One-way sensitivity of headline metrics to a single input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTable {
    pub variable: SensitivityVariable,
    pub label: String,
    pub rows: Vec<SensitivityRow>,
    /// Row reproducing the base case, if any step lands on it
    pub base_index: Option<usize>,
}

/// Cash-on-cash return over a price x rent grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityMatrix {
    /// Percent changes applied to purchase price (rows)
    pub price_steps: Vec<Decimal>,
    /// Percent changes applied to monthly rent (columns)
    pub rent_steps: Vec<Decimal>,
    /// cells[i][j] = CoC return with price_steps[i] and rent_steps[j] applied
    pub cells: Vec<Vec<Percent>>,
    /// Position of the unperturbed case (row, col)
    pub base_position: (usize, usize),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Re-run the engine once per step of `variable`, leaving `base` untouched.
pub fn build_one_variable_table(
    base: &PropertyInputs,
    variable: SensitivityVariable,
) -> SensitivityTable {
    let mut base_index = None;

    let rows = variable
        .steps()
        .iter()
        .enumerate()
        .map(|(i, &step)| {
            let (perturbed, value, label) = variable.apply(base, step);
            let result = compute(&perturbed);
            let is_base = variable.is_base(base, step);
            if is_base {
                base_index = Some(i);
            }
            trace!("{:?} step {step}: coc={}", variable, result.cash_on_cash);

            SensitivityRow {
                step,
                value,
                label,
                monthly_mortgage: result.monthly_mortgage,
                monthly_cash_flow: result.monthly_cash_flow,
                annual_cash_flow: result.annual_cash_flow,
                cash_on_cash: result.cash_on_cash,
                cap_rate: result.cap_rate,
                is_base,
            }
        })
        .collect();

    SensitivityTable {
        variable,
        label: variable.label().to_string(),
        rows,
        base_index,
    }
}

/// One table per [`SensitivityVariable`], in declaration order.
pub fn build_all_tables(base: &PropertyInputs) -> Vec<SensitivityTable> {
    SensitivityVariable::ALL
        .iter()
        .map(|&v| build_one_variable_table(base, v))
        .collect()
}

/// Recompute cash-on-cash return for every price x rent combination.
pub fn build_two_variable_matrix(base: &PropertyInputs) -> SensitivityMatrix {
    let cells = MATRIX_STEPS
        .iter()
        .map(|&price_step| {
            let priced = base.with_purchase_price(scale_by_percent(base.purchase_price, price_step));
            MATRIX_STEPS
                .iter()
                .map(|&rent_step| {
                    let inputs = priced
                        .with_monthly_income(scale_by_percent(base.monthly_income, rent_step));
                    compute(&inputs).cash_on_cash
                })
                .collect()
        })
        .collect();

    let base_idx = MATRIX_STEPS
        .iter()
        .position(|s| s.is_zero())
        .unwrap_or(MATRIX_STEPS.len() / 2);

    SensitivityMatrix {
        price_steps: MATRIX_STEPS.to_vec(),
        rent_steps: MATRIX_STEPS.to_vec(),
        cells,
        base_position: (base_idx, base_idx),
    }
}

/// One-way table wrapped in the standard computation envelope.
pub fn one_variable_sensitivity(
    base: &PropertyInputs,
    variable: SensitivityVariable,
) -> ComputationOutput<SensitivityTable> {
    let start = Instant::now();
    let table = build_one_variable_table(base, variable);
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "One-Way Sensitivity Analysis",
        &serde_json::json!({
            "variable": variable,
            "steps": variable.steps(),
        }),
        Vec::new(),
        elapsed,
        table,
    )
}

/// Price x rent matrix wrapped in the standard computation envelope.
pub fn price_rent_sensitivity(base: &PropertyInputs) -> ComputationOutput<SensitivityMatrix> {
    let start = Instant::now();
    let matrix = build_two_variable_matrix(base);
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "2-Way Sensitivity Analysis (Price x Rent, Cash-on-Cash)",
        &serde_json::json!({
            "variable_1": "purchase_price",
            "variable_2": "monthly_rent",
            "output_metric": "cash_on_cash",
        }),
        Vec::new(),
        elapsed,
        matrix,
    )
}
