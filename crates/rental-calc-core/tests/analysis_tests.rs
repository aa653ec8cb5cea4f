use rental_calc_core::amortization::{balance_after, monthly_payment};
use rental_calc_core::real_estate::{
    analyze_property, compute, Dscr, FormInputs, PeriodicAmount, PropertyInputs,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// $200k single-family rental financed at 6% over 30 years
fn duplex_example() -> PropertyInputs {
    PropertyInputs {
        purchase_price: dec!(200000),
        closing_cost: dec!(3000),
        is_cash: false,
        down_payment_pct: dec!(0.20),
        interest_rate_annual: dec!(0.06),
        loan_term_years: dec!(30),
        monthly_income: dec!(1800),
        vacancy_pct: dec!(0.05),
        property_taxes: PeriodicAmount::annual(dec!(2400)),
        insurance: PeriodicAmount::annual(dec!(1200)),
        repairs_maintenance_pct: dec!(0.05),
        capex_pct: dec!(0.05),
        management_pct: dec!(0.08),
        ..Default::default()
    }
}

// ===========================================================================
// End-to-end known answer
// ===========================================================================

#[test]
fn test_end_to_end_example() {
    let out = compute(&duplex_example());

    assert_eq!(out.down_payment, dec!(40000));
    assert_eq!(out.loan_amount, dec!(160000));
    assert_eq!(out.monthly_mortgage.round_dp(2), dec!(959.28));

    // Income: 1800 gross, 90 vacancy, 1710 effective
    assert_eq!(out.effective_monthly_income, dec!(1710));
    // OpEx: 200 taxes + 100 insurance + 90 + 90 + 144
    assert_eq!(out.total_monthly_opex, dec!(624));

    let monthly_cf = dec!(1710) - dec!(624) - out.monthly_mortgage;
    assert_eq!(out.monthly_cash_flow, monthly_cf);
    assert_eq!(out.monthly_cash_flow.round_dp(2), dec!(126.72));
    assert_eq!(out.noi, dec!(13032));
    assert_eq!(out.cap_rate, dec!(6.516));
    assert_eq!(
        out.cash_on_cash,
        monthly_cf * dec!(12) / dec!(43000) * dec!(100)
    );
    assert!(
        (out.cash_on_cash - dec!(3.5364)).abs() < dec!(0.001),
        "CoC was {}",
        out.cash_on_cash
    );
}

#[test]
fn test_form_path_matches_typed_path() {
    let form: FormInputs = serde_json::from_value(serde_json::json!({
        "purchasePrice": "200000",
        "closingCost": "3000",
        "downPaymentPercent": "20",
        "interestRate": "6",
        "loanTerm": "30",
        "monthlyIncome": "1800",
        "vacancy": "5",
        "propertyTaxes": "2400",
        "propertyTaxesPeriod": "annual",
        "insurance": "1200",
        "insurancePeriod": "annual",
        "repairsMaintenance": "5",
        "capex": "5",
        "managementFees": "8"
    }))
    .unwrap();
    let from_form = compute(&form.normalize().unwrap());
    assert_eq!(from_form, compute(&duplex_example()));
}

// ===========================================================================
// Cash purchase
// ===========================================================================

#[test]
fn test_cash_purchase_zeroes_debt_fields() {
    for price in [dec!(50000), dec!(200000), dec!(1250000)] {
        let mut input = duplex_example();
        input.purchase_price = price;
        input.is_cash = true;
        let out = compute(&input);
        assert_eq!(out.loan_amount, Decimal::ZERO);
        assert_eq!(out.monthly_mortgage, Decimal::ZERO);
        assert_eq!(out.annual_debt_service, Decimal::ZERO);
        assert_eq!(out.dscr, Dscr::NoDebt);
        assert_eq!(out.dscr.ratio(), None);
    }
}

#[test]
fn test_no_debt_sentinel_distinct_from_negative_dscr() {
    let mut input = duplex_example();
    input.monthly_income = dec!(100);
    let out = compute(&input);
    match out.dscr {
        Dscr::Ratio(r) => assert!(r < Decimal::ZERO),
        Dscr::NoDebt => panic!("financed purchase reported no debt"),
    }
}

#[test]
fn test_zero_cash_invested_gives_zero_coc() {
    let input = PropertyInputs {
        is_cash: true,
        monthly_income: dec!(1000),
        ..Default::default()
    };
    let out = compute(&input);
    assert_eq!(out.total_cash_invested, Decimal::ZERO);
    assert_eq!(out.cash_on_cash, Decimal::ZERO);
}

// ===========================================================================
// Amortization properties
// ===========================================================================

#[test]
fn test_zero_rate_payment_exact() {
    for term in [dec!(10), dec!(15), dec!(30), dec!(15.5)] {
        let mut input = duplex_example();
        input.interest_rate_annual = Decimal::ZERO;
        input.loan_term_years = term;
        let out = compute(&input);
        assert_eq!(out.monthly_mortgage, out.loan_amount / (term * dec!(12)));
    }
}

#[test]
fn test_balance_endpoints() {
    for (rate, term) in [(dec!(0.03), 15u32), (dec!(0.07), 30), (dec!(0.12), 20)] {
        let years = Decimal::from(term);
        assert_eq!(balance_after(dec!(250000), rate, years, 0), dec!(250000));
        assert!(balance_after(dec!(250000), rate, years, term) <= dec!(0.01));
    }
}

#[test]
fn test_payment_scales_with_principal() {
    let one = monthly_payment(dec!(100000), dec!(0.05), dec!(30));
    let two = monthly_payment(dec!(200000), dec!(0.05), dec!(30));
    assert!((two - one * dec!(2)).abs() < dec!(0.0000001));
}

#[test]
fn test_huge_loan_term_stays_total() {
    let mut input = duplex_example();
    input.loan_term_years = dec!(400000000);
    let out = compute(&input);
    // interest-only on $160k at 0.5% a month
    assert_eq!(out.monthly_mortgage, dec!(800));
    assert_eq!(out.projection.len(), 5);
    assert!(out.projection.iter().all(|y| y.loan_balance == dec!(160000)));
}

// ===========================================================================
// Five-year projection, financed
// ===========================================================================

#[test]
fn test_financed_projection_known_answer() {
    let mut input = duplex_example();
    input.appreciation_rate = dec!(0.03);
    input.sale_expense_pct = dec!(0.06);
    let out = compute(&input);

    // (value, equity buildup, total ROI %, net sale proceeds, total equity)
    let expected = [
        (dec!(206000.00), dec!(1964.82), dec!(22.06), dec!(35604.82), dec!(47964.82)),
        (dec!(212180.00), dec!(2086.00), dec!(22.76), dec!(43500.02), dec!(56230.82)),
        (dec!(218545.40), dec!(2214.66), dec!(23.49), dec!(51698.16), dec!(64810.89)),
        (dec!(225101.76), dec!(2351.26), dec!(24.25), dec!(60212.40), dec!(73718.51)),
        (dec!(231854.81), dec!(2496.28), dec!(25.05), dec!(69056.56), dec!(82967.84)),
    ];

    for (row, (value, buildup, roi, proceeds, equity)) in out.projection.iter().zip(expected) {
        let opening = balance_after(dec!(160000), dec!(0.06), dec!(30), row.year - 1);
        let closing = balance_after(dec!(160000), dec!(0.06), dec!(30), row.year);
        assert_eq!(row.loan_balance, closing);
        assert_eq!(row.equity_buildup, opening - closing);
        assert_eq!(
            row.total_roi,
            (row.yearly_cash_flow + row.equity_buildup + row.appreciation) / dec!(43000)
                * dec!(100)
        );

        assert_eq!(row.property_value.round_dp(2), value);
        assert_eq!(row.equity_buildup.round_dp(2), buildup);
        assert_eq!(row.total_roi.round_dp(2), roi);
        assert_eq!(row.net_sale_proceeds.round_dp(2), proceeds);
        assert_eq!(row.total_equity.round_dp(2), equity);
    }
}

#[test]
fn test_zero_rate_short_term_projection_runs_past_payoff() {
    let mut input = duplex_example();
    input.interest_rate_annual = Decimal::ZERO;
    input.loan_term_years = dec!(3);
    let out = compute(&input);
    // $160k repaid over 36 months; the straight-line balance keeps falling after payoff
    let years = &out.projection;
    assert!(years[2].loan_balance.abs() < dec!(0.01));
    assert_eq!(years[3].loan_balance.round_dp(2), dec!(-53333.33));
    assert_eq!(years[4].loan_balance.round_dp(2), dec!(-106666.67));
    assert_eq!(years[4].equity_buildup.round_dp(2), dec!(53333.33));
    assert_eq!(years[4].total_equity, years[4].property_value - years[4].loan_balance);
}

// ===========================================================================
// Monotonicity
// ===========================================================================

#[test]
fn test_rent_increase_raises_coc_and_cap_rate() {
    let mut prev = compute(&duplex_example());
    for rent in [dec!(1900), dec!(2000), dec!(2500), dec!(3000)] {
        let out = compute(&duplex_example().with_monthly_income(rent));
        assert!(out.cash_on_cash > prev.cash_on_cash);
        assert!(out.cap_rate > prev.cap_rate);
        prev = out;
    }
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_analyze_property_wraps_compute() {
    let input = duplex_example();
    let result = analyze_property(&input).unwrap();
    assert_eq!(result.result, compute(&input));
    assert_eq!(result.assumptions["loan_term_years"], "30");
}
