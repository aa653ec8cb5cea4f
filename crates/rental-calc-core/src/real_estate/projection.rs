use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::PropertyInputs;
use crate::amortization::balance_after;
use crate::types::{compound, Money, Percent};

/// Number of years covered by the hold-period projection.
pub const PROJECTION_YEARS: u32 = 5;

/// One year of the hold-period projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub property_value: Money,
    pub yearly_income: Money,
    pub yearly_expenses: Money,
    pub yearly_mortgage: Money,
    pub yearly_cash_flow: Money,
    /// Loan balance at the end of the year
    pub loan_balance: Money,
    /// Principal repaid during the year
    pub equity_buildup: Money,
    /// Value gained during the year
    pub appreciation: Money,
    pub total_equity: Money,
    /// (cash flow + equity buildup + appreciation) / cash invested, in percent
    pub total_roi: Percent,
    /// Proceeds of a sale at year end after selling costs and loan payoff
    pub net_sale_proceeds: Money,
}

/// Year-one figures the projection grows forward.
pub(crate) struct ProjectionBase {
    pub loan_amount: Money,
    pub annual_effective_income: Money,
    pub annual_operating_expenses: Money,
    pub annual_debt_service: Money,
    pub total_cash_invested: Money,
}

pub(crate) fn project(inputs: &PropertyInputs, base: &ProjectionBase) -> Vec<ProjectionYear> {
    let price = inputs.purchase_price;
    let appreciation_factor = Decimal::ONE + inputs.appreciation_rate;
    let income_factor = Decimal::ONE + inputs.income_growth;
    let expense_factor = Decimal::ONE + inputs.expense_growth;

    let loan_balance_at = |years: u32| -> Money {
        if inputs.is_cash {
            Decimal::ZERO
        } else {
            balance_after(
                base.loan_amount,
                inputs.interest_rate_annual,
                inputs.loan_term_years,
                years,
            )
        }
    };

    (1..=PROJECTION_YEARS)
        .map(|year| {
            let property_value = price * compound(appreciation_factor, year);
            let prior_value = price * compound(appreciation_factor, year - 1);
            let yearly_income = base.annual_effective_income * compound(income_factor, year - 1);
            let yearly_expenses =
                base.annual_operating_expenses * compound(expense_factor, year - 1);
            let yearly_mortgage = base.annual_debt_service;
            let yearly_cash_flow = yearly_income - yearly_expenses - yearly_mortgage;

            let balance_start = loan_balance_at(year - 1);
            let balance_end = loan_balance_at(year);
            let equity_buildup = balance_start - balance_end;
            let total_equity = property_value - balance_end;
            let appreciation = property_value - prior_value;

            let total_roi = if base.total_cash_invested > Decimal::ZERO {
                (yearly_cash_flow + equity_buildup + appreciation) / base.total_cash_invested
                    * dec!(100)
            } else {
                Decimal::ZERO
            };

            let net_sale_proceeds =
                property_value * (Decimal::ONE - inputs.sale_expense_pct) - balance_end;

            ProjectionYear {
                year,
                property_value,
                yearly_income,
                yearly_expenses,
                yearly_mortgage,
                yearly_cash_flow,
                loan_balance: balance_end,
                equity_buildup,
                appreciation,
                total_equity,
                total_roi,
                net_sale_proceeds,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cash_base() -> (PropertyInputs, ProjectionBase) {
        let inputs = PropertyInputs {
            purchase_price: dec!(100000),
            appreciation_rate: dec!(0.03),
            income_growth: dec!(0.02),
            expense_growth: dec!(0.04),
            is_cash: true,
            sale_expense_pct: dec!(0.06),
            ..Default::default()
        };
        let base = ProjectionBase {
            loan_amount: Decimal::ZERO,
            annual_effective_income: dec!(12000),
            annual_operating_expenses: dec!(4000),
            annual_debt_service: Decimal::ZERO,
            total_cash_invested: dec!(100000),
        };
        (inputs, base)
    }

    #[test]
    fn test_five_years_in_order() {
        let (inputs, base) = cash_base();
        let years = project(&inputs, &base);
        assert_eq!(years.len(), 5);
        assert_eq!(
            years.iter().map(|y| y.year).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_growth_applied_from_year_two() {
        let (inputs, base) = cash_base();
        let years = project(&inputs, &base);
        assert_eq!(years[0].yearly_income, dec!(12000));
        assert_eq!(years[0].yearly_expenses, dec!(4000));
        assert_eq!(years[1].yearly_income, dec!(12240));
        assert_eq!(years[1].yearly_expenses, dec!(4160));
        // value appreciates from year one
        assert_eq!(years[0].property_value, dec!(103000));
        assert_eq!(years[1].property_value, dec!(106090));
    }

    #[test]
    fn test_cash_purchase_roi_and_equity() {
        let (inputs, base) = cash_base();
        let y1 = &project(&inputs, &base)[0];
        assert_eq!(y1.loan_balance, Decimal::ZERO);
        assert_eq!(y1.equity_buildup, Decimal::ZERO);
        assert_eq!(y1.total_equity, dec!(103000));
        assert_eq!(y1.appreciation, dec!(3000));
        // (8000 + 0 + 3000) / 100000 = 11%
        assert_eq!(y1.total_roi, dec!(11));
        // 103000 * 0.94
        assert_eq!(y1.net_sale_proceeds, dec!(96820));
    }

    #[test]
    fn test_zero_cash_invested_roi_is_zero() {
        let (inputs, mut base) = cash_base();
        base.total_cash_invested = Decimal::ZERO;
        assert!(project(&inputs, &base)
            .iter()
            .all(|y| y.total_roi.is_zero()));
    }
}
