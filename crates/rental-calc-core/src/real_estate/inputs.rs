use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Billing period of a fixed expense entered as a single amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpensePeriod {
    Monthly,
    #[default]
    Annual,
}

/// A fixed expense quoted per month or per year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicAmount {
    pub amount: Money,
    #[serde(default)]
    pub period: ExpensePeriod,
}

impl PeriodicAmount {
    pub fn monthly(amount: Money) -> Self {
        Self {
            amount,
            period: ExpensePeriod::Monthly,
        }
    }

    pub fn annual(amount: Money) -> Self {
        Self {
            amount,
            period: ExpensePeriod::Annual,
        }
    }

    /// Amount per month: annual figures are spread evenly over 12 months.
    pub fn per_month(&self) -> Money {
        match self.period {
            ExpensePeriod::Annual => self.amount / dec!(12),
            ExpensePeriod::Monthly => self.amount,
        }
    }

    fn scaled(&self, multiplier: Decimal) -> Self {
        Self {
            amount: self.amount * multiplier,
            period: self.period,
        }
    }
}

/// Everything needed to analyse one rental property.
///
/// Rates and percentages are fractions (0.05 = 5%), except `loan_points`
/// which is quoted in points (1 point = 1% of the loan). Monetary amounts
/// are expected non-negative and already rounded to cents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyInputs {
    // --- Purchase ---
    pub purchase_price: Money,
    pub closing_cost: Money,
    pub is_rehab: bool,
    pub rehab_cost: Money,
    pub after_repair_value: Money,
    pub appreciation_rate: Rate,

    // --- Financing ---
    pub is_cash: bool,
    pub down_payment_pct: Rate,
    pub interest_rate_annual: Rate,
    /// Loan term in years; may be fractional (15.5 = 186 payments)
    pub loan_term_years: Decimal,
    pub loan_points: Decimal,

    // --- Income ---
    pub monthly_income: Money,
    pub other_income: Money,
    pub income_growth: Rate,

    // --- Expenses ---
    pub property_taxes: PeriodicAmount,
    pub insurance: PeriodicAmount,
    /// Share of gross monthly income set aside for repairs & maintenance
    pub repairs_maintenance_pct: Rate,
    /// Share of gross monthly income reserved for capital expenditures
    pub capex_pct: Rate,
    pub vacancy_pct: Rate,
    /// Share of gross monthly income paid to a property manager
    pub management_pct: Rate,
    pub electricity: Money,
    pub gas: Money,
    pub water_sewer: Money,
    pub hoa: Money,
    pub garbage: Money,
    pub other_expense: Money,
    pub expense_growth: Rate,

    // --- Exit ---
    /// Selling costs as a share of sale price
    pub sale_expense_pct: Rate,
}

// ---------------------------------------------------------------------------
// Derived inputs
// ---------------------------------------------------------------------------

impl PropertyInputs {
    /// Rehab budget counted toward cash invested; zero unless the rehab flag is set.
    pub fn effective_rehab_cost(&self) -> Money {
        if self.is_rehab {
            self.rehab_cost
        } else {
            Decimal::ZERO
        }
    }

    /// After-repair value, or the purchase price when no rehab is planned.
    pub fn effective_after_repair_value(&self) -> Money {
        if self.is_rehab {
            self.after_repair_value
        } else {
            self.purchase_price
        }
    }
}

// ---------------------------------------------------------------------------
// Functional updates
// ---------------------------------------------------------------------------

impl PropertyInputs {
    /// Copy with a new purchase price. The down payment percentage is kept,
    /// so the dollar down payment scales with the price.
    pub fn with_purchase_price(&self, purchase_price: Money) -> Self {
        Self {
            purchase_price,
            ..self.clone()
        }
    }

    pub fn with_monthly_income(&self, monthly_income: Money) -> Self {
        Self {
            monthly_income,
            ..self.clone()
        }
    }

    /// Copy with a new annual interest rate, floored at zero.
    pub fn with_interest_rate(&self, interest_rate_annual: Rate) -> Self {
        Self {
            interest_rate_annual: interest_rate_annual.max(Decimal::ZERO),
            ..self.clone()
        }
    }

    pub fn with_vacancy_pct(&self, vacancy_pct: Rate) -> Self {
        Self {
            vacancy_pct,
            ..self.clone()
        }
    }

    /// Copy with every fixed-amount expense scaled by `multiplier`.
    ///
    /// Income-based expenses (repairs, capex, management) are left alone.
    pub fn with_expense_multiplier(&self, multiplier: Decimal) -> Self {
        Self {
            property_taxes: self.property_taxes.scaled(multiplier),
            insurance: self.insurance.scaled(multiplier),
            electricity: self.electricity * multiplier,
            gas: self.gas * multiplier,
            water_sewer: self.water_sewer * multiplier,
            hoa: self.hoa * multiplier,
            garbage: self.garbage * multiplier,
            other_expense: self.other_expense * multiplier,
            ..self.clone()
        }
    }
}
