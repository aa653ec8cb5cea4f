use rental_calc_core::real_estate::{compute, PropertyInputs};
use rental_calc_core::scenarios::{
    build_one_variable_table, build_two_variable_matrix, SensitivityVariable,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// $300k purchase, $2,500 rent, 20% down at 7% over 30 years, no expenses
fn base_inputs() -> PropertyInputs {
    PropertyInputs {
        purchase_price: dec!(300000),
        down_payment_pct: dec!(0.20),
        interest_rate_annual: dec!(0.07),
        loan_term_years: dec!(30),
        monthly_income: dec!(2500),
        ..Default::default()
    }
}

#[test]
fn test_zero_step_reproduces_compute() {
    let base = base_inputs();
    let direct = compute(&base);
    for variable in [
        SensitivityVariable::PurchasePrice,
        SensitivityVariable::MonthlyRent,
        SensitivityVariable::InterestRate,
        SensitivityVariable::OperatingExpenses,
    ] {
        let table = build_one_variable_table(&base, variable);
        let row = &table.rows[table.base_index.unwrap()];
        assert_eq!(row.step, Decimal::ZERO);
        assert_eq!(row.monthly_mortgage, direct.monthly_mortgage);
        assert_eq!(row.monthly_cash_flow, direct.monthly_cash_flow);
        assert_eq!(row.annual_cash_flow, direct.annual_cash_flow);
        assert_eq!(row.cash_on_cash, direct.cash_on_cash);
        assert_eq!(row.cap_rate, direct.cap_rate);
    }
}

#[test]
fn test_vacancy_base_row_at_zero() {
    let table = build_one_variable_table(&base_inputs(), SensitivityVariable::VacancyRate);
    assert_eq!(table.base_index, Some(0));
    assert_eq!(table.rows[0].cash_on_cash, compute(&base_inputs()).cash_on_cash);
}

#[test]
fn test_price_step_keeps_down_payment_percent() {
    let base = base_inputs();
    let table = build_one_variable_table(&base, SensitivityVariable::PurchasePrice);
    // +10% price => loan of 330000 * 0.8
    let expected = compute(&base.with_purchase_price(dec!(330000)));
    let row = &table.rows[6];
    assert_eq!(row.step, dec!(10));
    assert_eq!(row.monthly_mortgage, expected.monthly_mortgage);
    assert_eq!(expected.loan_amount, dec!(264000));
}

#[test]
fn test_matrix_cell_is_recomputed() {
    let base = base_inputs();
    let matrix = build_two_variable_matrix(&base);
    let direct = compute(
        &base
            .with_purchase_price(base.purchase_price * dec!(1.1))
            .with_monthly_income(base.monthly_income * dec!(1.1)),
    );
    // price +10% is row 5, rent +10% is column 5
    assert_eq!(matrix.price_steps[5], dec!(10));
    assert_eq!(matrix.rent_steps[5], dec!(10));
    assert_eq!(matrix.cells[5][5], direct.cash_on_cash);
}

#[test]
fn test_matrix_is_deterministic() {
    let base = base_inputs();
    assert_eq!(build_two_variable_matrix(&base), build_two_variable_matrix(&base));
}

#[test]
fn test_higher_price_lowers_coc() {
    let matrix = build_two_variable_matrix(&base_inputs());
    for col in 0..7 {
        for row in 0..6 {
            assert!(matrix.cells[row][col] > matrix.cells[row + 1][col]);
        }
    }
}
