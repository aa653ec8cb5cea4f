//! Fixed-rate loan amortization: level monthly payment, outstanding balance
//! after a number of years, and the year-by-year schedule.
//!
//! Balances are produced by stepping through every monthly period rather
//! than by the closed-form remaining-balance formula, so the engine and any
//! caller that re-derives a balance see the same decimal result.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{compound, Money, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// One year of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub opening_balance: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub closing_balance: Money,
}

/// Level monthly payment: P * r(1+r)^n / ((1+r)^n - 1), r = annual / 12, n = years * 12.
///
/// The term may be fractional (15.5 years = 186 payments). Zero principal or
/// a non-positive term gives a zero payment; a zero rate gives straight-line
/// repayment `principal / n`.
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_years: Decimal) -> Money {
    let total_months = months_in(term_years);
    if total_months <= Decimal::ZERO || principal.is_zero() {
        return Decimal::ZERO;
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    if monthly_rate.is_zero() {
        return principal / total_months;
    }

    let growth = match growth_factor(monthly_rate, total_months) {
        Some(growth) => growth,
        // (1+r)^n beyond decimal range: the annuity has converged to interest-only
        None if monthly_rate > Decimal::ZERO => return principal * monthly_rate,
        None => return principal / total_months,
    };
    if growth <= Decimal::ONE {
        return principal / total_months;
    }

    match monthly_rate
        .checked_mul(growth)
        .and_then(|factor| principal.checked_mul(factor))
    {
        Some(numerator) => numerator / (growth - Decimal::ONE),
        None => principal * monthly_rate,
    }
}

/// Outstanding balance after `years_elapsed` years of scheduled payments.
///
/// With interest the balance is stepped month by month and never drops below
/// zero. At a zero rate it falls linearly by `principal / n` a month and goes
/// negative once elapsed time passes the term.
pub fn balance_after(
    principal: Money,
    annual_rate: Rate,
    term_years: Decimal,
    years_elapsed: u32,
) -> Money {
    let total_months = months_in(term_years);
    if total_months <= Decimal::ZERO {
        return principal;
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    let months_elapsed = Decimal::from(years_elapsed) * MONTHS_PER_YEAR;

    if monthly_rate.is_zero() {
        let monthly_principal = principal / total_months;
        return principal - monthly_principal * months_elapsed;
    }

    let payment = monthly_payment(principal, annual_rate, term_years);
    let periods = period_count(months_elapsed.min(total_months));
    let (balance, _) = step_balance(principal, monthly_rate, payment, periods);
    balance
}

/// Year-by-year schedule over the full term.
///
/// A fractional term ends with a partial year. Rows stop once the balance
/// reaches zero.
pub fn amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    term_years: Decimal,
) -> Vec<AmortizationYear> {
    let total_months = months_in(term_years);
    if total_months <= Decimal::ZERO {
        return Vec::new();
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    let payment = monthly_payment(principal, annual_rate, term_years);
    let total_periods = period_count(total_months);

    let mut schedule = Vec::new();
    let mut opening = principal;
    let mut periods_done: u32 = 0;
    let mut year: u32 = 0;

    while periods_done < total_periods && opening > Decimal::ZERO {
        year += 1;
        let periods = (total_periods - periods_done).min(12);
        let (closing, interest_paid) = if monthly_rate.is_zero() {
            ((opening - payment * Decimal::from(periods)).max(Decimal::ZERO), Decimal::ZERO)
        } else {
            step_balance(opening, monthly_rate, payment, periods)
        };

        schedule.push(AmortizationYear {
            year,
            opening_balance: opening,
            interest_paid,
            principal_paid: opening - closing,
            closing_balance: closing,
        });
        opening = closing;
        periods_done += periods;
    }

    schedule
}

fn months_in(term_years: Decimal) -> Decimal {
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .unwrap_or(Decimal::MAX)
}

/// Whole payments needed to cover `months`; a partial month counts as a payment.
fn period_count(months: Decimal) -> u32 {
    months.ceil().to_u32().unwrap_or(u32::MAX)
}

/// (1+r)^n, or `None` when it leaves the decimal range.
fn growth_factor(monthly_rate: Rate, total_months: Decimal) -> Option<Decimal> {
    let base = Decimal::ONE + monthly_rate;
    if total_months.fract().is_zero() {
        let periods = total_months.to_u32()?;
        let growth = compound(base, periods);
        (growth != Decimal::MAX).then_some(growth)
    } else {
        base.checked_powd(total_months)
    }
}

/// Apply `periods` monthly payments to `balance`, returning the closing
/// balance (floored at zero) and the interest charged along the way.
fn step_balance(
    mut balance: Money,
    monthly_rate: Rate,
    payment: Money,
    periods: u32,
) -> (Money, Money) {
    let mut interest_paid = Decimal::ZERO;
    for _ in 0..periods {
        if balance <= Decimal::ZERO {
            balance = Decimal::ZERO;
            break;
        }
        let interest = balance * monthly_rate;
        interest_paid += interest;
        balance -= payment - interest;
    }
    (balance.max(Decimal::ZERO), interest_paid)
}
