use std::fmt;
use std::time::Instant;

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::PropertyInputs;
use super::projection::{project, ProjectionBase, ProjectionYear};
use crate::amortization::{amortization_schedule, monthly_payment, AmortizationYear};
use crate::error::RentalCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RentalCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Debt service coverage ratio.
///
/// A property with no debt service has no meaningful ratio; that case is a
/// distinct variant rather than zero or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dscr {
    Ratio(Decimal),
    NoDebt,
}

impl Dscr {
    pub fn ratio(&self) -> Option<Decimal> {
        match self {
            Dscr::Ratio(r) => Some(*r),
            Dscr::NoDebt => None,
        }
    }

    pub fn is_no_debt(&self) -> bool {
        matches!(self, Dscr::NoDebt)
    }
}

impl fmt::Display for Dscr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dscr::Ratio(r) => write!(f, "{:.2}", r.round_dp(2)),
            Dscr::NoDebt => write!(f, "N/A (No Debt)"),
        }
    }
}

/// Monthly operating expenses by category. Mortgage is not an operating expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpenses {
    pub property_taxes: Money,
    pub insurance: Money,
    pub repairs: Money,
    pub capex: Money,
    pub management: Money,
    /// Electricity + gas + water/sewer
    pub utilities: Money,
    /// HOA + garbage + other
    pub other_fixed: Money,
}

impl MonthlyExpenses {
    pub fn total(&self) -> Money {
        self.property_taxes
            + self.insurance
            + self.repairs
            + self.capex
            + self.management
            + self.utilities
            + self.other_fixed
    }
}

/// Every metric derived from one set of [`PropertyInputs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    // --- Acquisition ---
    pub down_payment: Money,
    pub loan_amount: Money,
    pub points_cost: Money,
    pub total_cash_invested: Money,

    // --- Monthly ---
    pub monthly_mortgage: Money,
    pub gross_monthly_income: Money,
    pub vacancy_loss: Money,
    pub effective_monthly_income: Money,
    pub expenses: MonthlyExpenses,
    pub total_monthly_opex: Money,
    pub monthly_cash_flow: Money,

    // --- Annual ---
    pub annual_effective_income: Money,
    pub annual_opex: Money,
    pub annual_cash_flow: Money,
    pub noi: Money,
    pub annual_debt_service: Money,

    // --- Ratios (percent unless noted) ---
    pub cap_rate: Percent,
    pub cash_on_cash: Percent,
    pub dscr: Dscr,
    pub operating_expense_ratio: Percent,
    /// Price / annual gross rent (a multiple, not a percent)
    pub gross_rent_multiplier: Decimal,

    // --- Quick screens ---
    pub one_percent_ratio: Percent,
    pub passes_one_percent_rule: bool,
    pub fifty_percent_cash_flow: Money,
    pub pro_forma_cap_rate: Percent,

    pub projection: Vec<ProjectionYear>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Derive every cash flow, ratio and projection figure from `inputs`.
///
/// Total: a zero denominator yields a zero metric (or [`Dscr::NoDebt`])
/// instead of an error.
pub fn compute(inputs: &PropertyInputs) -> PropertyAnalysis {
    let price = inputs.purchase_price;
    let rehab_cost = inputs.effective_rehab_cost();

    // --- Down payment & loan ---
    let down_payment = price * inputs.down_payment_pct;
    let loan_amount = if inputs.is_cash {
        Decimal::ZERO
    } else {
        price - down_payment
    };
    let points_cost = loan_amount * inputs.loan_points / dec!(100);

    let monthly_mortgage = if inputs.is_cash {
        Decimal::ZERO
    } else {
        monthly_payment(
            loan_amount,
            inputs.interest_rate_annual,
            inputs.loan_term_years,
        )
    };

    let equity_in = if inputs.is_cash { price } else { down_payment };
    let total_cash_invested = equity_in + inputs.closing_cost + rehab_cost + points_cost;

    // --- Income ---
    let gross_monthly_income = inputs.monthly_income + inputs.other_income;
    let vacancy_loss = gross_monthly_income * inputs.vacancy_pct;
    let effective_monthly_income = gross_monthly_income - vacancy_loss;

    // --- Operating expenses ---
    // Percentage-based categories are charged against gross, not effective, income.
    let expenses = MonthlyExpenses {
        property_taxes: inputs.property_taxes.per_month(),
        insurance: inputs.insurance.per_month(),
        repairs: gross_monthly_income * inputs.repairs_maintenance_pct,
        capex: gross_monthly_income * inputs.capex_pct,
        management: gross_monthly_income * inputs.management_pct,
        utilities: inputs.electricity + inputs.gas + inputs.water_sewer,
        other_fixed: inputs.hoa + inputs.garbage + inputs.other_expense,
    };
    let total_monthly_opex = expenses.total();

    // --- NOI & cash flow ---
    let annual_effective_income = effective_monthly_income * dec!(12);
    let annual_opex = total_monthly_opex * dec!(12);
    let noi = annual_effective_income - annual_opex;

    let monthly_cash_flow = effective_monthly_income - total_monthly_opex - monthly_mortgage;
    let annual_cash_flow = monthly_cash_flow * dec!(12);
    let annual_debt_service = monthly_mortgage * dec!(12);

    // --- Ratios ---
    let cap_rate = percent_of(noi, price);
    let cash_on_cash = percent_of(annual_cash_flow, total_cash_invested);
    let dscr = if annual_debt_service > Decimal::ZERO {
        Dscr::Ratio(noi / annual_debt_service)
    } else {
        Dscr::NoDebt
    };
    let operating_expense_ratio = percent_of(annual_opex, annual_effective_income);
    let annual_gross_rent = inputs.monthly_income * dec!(12);
    let gross_rent_multiplier = if annual_gross_rent > Decimal::ZERO {
        price / annual_gross_rent
    } else {
        Decimal::ZERO
    };

    // --- Quick screens ---
    let one_percent_ratio = percent_of(inputs.monthly_income, price);
    let passes_one_percent_rule = one_percent_ratio >= Decimal::ONE;
    let fifty_percent_cash_flow = gross_monthly_income * dec!(0.5) - monthly_mortgage;
    let pro_forma_cap_rate = percent_of(noi, price + rehab_cost);

    let projection = project(
        inputs,
        &ProjectionBase {
            loan_amount,
            annual_effective_income,
            annual_operating_expenses: annual_opex,
            annual_debt_service,
            total_cash_invested,
        },
    );

    debug!(
        "compute: price={price} cash_invested={total_cash_invested} monthly_cf={monthly_cash_flow} coc={cash_on_cash}"
    );

    PropertyAnalysis {
        down_payment,
        loan_amount,
        points_cost,
        total_cash_invested,
        monthly_mortgage,
        gross_monthly_income,
        vacancy_loss,
        effective_monthly_income,
        expenses,
        total_monthly_opex,
        monthly_cash_flow,
        annual_effective_income,
        annual_opex,
        annual_cash_flow,
        noi,
        annual_debt_service,
        cap_rate,
        cash_on_cash,
        dscr,
        operating_expense_ratio,
        gross_rent_multiplier,
        one_percent_ratio,
        passes_one_percent_rule,
        fifty_percent_cash_flow,
        pro_forma_cap_rate,
        projection,
    }
}

/// `numerator / denominator * 100`, or zero unless the denominator is positive.
fn percent_of(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator > Decimal::ZERO {
        numerator / denominator * dec!(100)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Loan schedule
// ---------------------------------------------------------------------------

/// Year-by-year amortization of the financed part of the purchase.
///
/// Fails when there is no loan: a cash purchase, a 100% down payment, or a
/// non-positive term.
pub fn loan_schedule(inputs: &PropertyInputs) -> RentalCalcResult<Vec<AmortizationYear>> {
    if inputs.is_cash {
        return Err(RentalCalcError::InsufficientData(
            "Cash purchase has no loan to amortize".into(),
        ));
    }
    let loan_amount = inputs.purchase_price - inputs.purchase_price * inputs.down_payment_pct;
    if loan_amount <= Decimal::ZERO || inputs.loan_term_years <= Decimal::ZERO {
        return Err(RentalCalcError::InsufficientData(
            "Loan amount and loan term must both be positive".into(),
        ));
    }
    Ok(amortization_schedule(
        loan_amount,
        inputs.interest_rate_annual,
        inputs.loan_term_years,
    ))
}

// ---------------------------------------------------------------------------
// Enveloped analysis
// ---------------------------------------------------------------------------

/// Validate `inputs`, run [`compute`], and attach screening warnings.
pub fn analyze_property(
    inputs: &PropertyInputs,
) -> RentalCalcResult<ComputationOutput<PropertyAnalysis>> {
    let start = Instant::now();

    validate_input(inputs)?;
    let analysis = compute(inputs);
    let warnings = screening_warnings(inputs, &analysis);
    for w in &warnings {
        warn!("{w}");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental Property Cash Flow Analysis",
        inputs,
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(inputs: &PropertyInputs) -> RentalCalcResult<()> {
    let money = [
        ("purchase_price", inputs.purchase_price),
        ("closing_cost", inputs.closing_cost),
        ("rehab_cost", inputs.rehab_cost),
        ("after_repair_value", inputs.after_repair_value),
        ("loan_points", inputs.loan_points),
        ("monthly_income", inputs.monthly_income),
        ("other_income", inputs.other_income),
        ("property_taxes", inputs.property_taxes.amount),
        ("insurance", inputs.insurance.amount),
        ("electricity", inputs.electricity),
        ("gas", inputs.gas),
        ("water_sewer", inputs.water_sewer),
        ("hoa", inputs.hoa),
        ("garbage", inputs.garbage),
        ("other_expense", inputs.other_expense),
    ];
    for (field, amount) in money {
        if amount < Decimal::ZERO {
            return Err(RentalCalcError::InvalidInput {
                field: field.into(),
                reason: "Must not be negative".into(),
            });
        }
    }

    let fractions = [
        ("down_payment_pct", inputs.down_payment_pct),
        ("vacancy_pct", inputs.vacancy_pct),
        ("repairs_maintenance_pct", inputs.repairs_maintenance_pct),
        ("capex_pct", inputs.capex_pct),
        ("management_pct", inputs.management_pct),
        ("sale_expense_pct", inputs.sale_expense_pct),
    ];
    for (field, rate) in fractions {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(RentalCalcError::InvalidInput {
                field: field.into(),
                reason: "Must be a fraction between 0 and 1".into(),
            });
        }
    }

    if inputs.loan_term_years < Decimal::ZERO {
        return Err(RentalCalcError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Loan term must not be negative".into(),
        });
    }

    if inputs.interest_rate_annual < Decimal::ZERO {
        return Err(RentalCalcError::InvalidInput {
            field: "interest_rate_annual".into(),
            reason: "Interest rate must not be negative".into(),
        });
    }

    let growth = [
        ("appreciation_rate", inputs.appreciation_rate),
        ("income_growth", inputs.income_growth),
        ("expense_growth", inputs.expense_growth),
    ];
    for (field, rate) in growth {
        if rate <= dec!(-1) {
            return Err(RentalCalcError::InvalidInput {
                field: field.into(),
                reason: "Growth rate must be greater than -100%".into(),
            });
        }
    }

    Ok(())
}

fn screening_warnings(inputs: &PropertyInputs, analysis: &PropertyAnalysis) -> Vec<String> {
    let mut warnings = Vec::new();

    if analysis.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly cash flow of {:.2}",
            analysis.monthly_cash_flow.round_dp(2)
        ));
    }

    if let Dscr::Ratio(dscr) = analysis.dscr {
        if dscr < dec!(1.2) {
            warnings.push(format!(
                "DSCR of {:.2} is below 1.20x — lender covenant risk",
                dscr.round_dp(2)
            ));
        }
    }

    if inputs.purchase_price > Decimal::ZERO && !analysis.passes_one_percent_rule {
        warnings.push(format!(
            "Rent is {:.2}% of price — fails the 1% rule",
            analysis.one_percent_ratio.round_dp(2)
        ));
    }

    if analysis.fifty_percent_cash_flow < Decimal::ZERO {
        warnings.push("50% rule estimates negative cash flow".into());
    }

    if inputs.vacancy_pct > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            inputs.vacancy_pct * dec!(100)
        ));
    }

    if analysis.operating_expense_ratio > dec!(50) {
        warnings.push(format!(
            "Operating expense ratio {:.1}% exceeds 50%",
            analysis.operating_expense_ratio.round_dp(1)
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
