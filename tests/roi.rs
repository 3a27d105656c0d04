//! 회수기간 시계열/손익분기 테스트.
use solar_payback_toolbox::roi::{
    level_payment, per_period_rate, project, summarize, CostBasis, FinancingSchedule, RoiInput,
};
use solar_payback_toolbox::CalcError;

fn flat_input(base_savings: f64, cost: f64, horizon: u32) -> RoiInput {
    RoiInput {
        periodic_consumption_kwh: base_savings,
        applied_rate: 1.0,
        cost: CostBasis::SystemCost(cost),
        horizon_periods: horizon,
        periods_per_year: 12,
        inflation_rate: 0.0,
    }
}

#[test]
fn constant_savings_cross_at_period_40() {
    let series = project(flat_input(3000.0, 120_000.0, 300)).expect("series");
    assert_eq!(series.crossover_period, Some(40));
    assert_eq!(series.cumulative_at(39), Some(117_000.0));
    assert_eq!(series.cumulative_at(40), Some(120_000.0));
    assert_eq!(series.len(), 300);
    assert_eq!(series.cumulative_at(300), Some(900_000.0));
    let years = series.crossover_years().unwrap();
    assert!((years - 40.0 / 12.0).abs() < 1e-12);
}

#[test]
fn series_fills_horizon_without_crossover() {
    let series = project(flat_input(10.0, 1_000_000.0, 300)).unwrap();
    assert_eq!(series.crossover_period, None);
    assert_eq!(series.len(), 300);
    assert_eq!(series.crossover_years(), None);
}

#[test]
fn consumption_and_rate_multiply_into_base_savings() {
    let series = project(RoiInput {
        periodic_consumption_kwh: 500.0,
        applied_rate: 2.0,
        cost: CostBasis::SystemCost(5000.0),
        horizon_periods: 10,
        periods_per_year: 1,
        inflation_rate: 0.0,
    })
    .unwrap();
    assert_eq!(series.savings, vec![1000.0; 10]);
    assert_eq!(series.crossover_period, Some(5));
}

#[test]
fn inflation_compounds_per_period() {
    let series = project(RoiInput {
        periodic_consumption_kwh: 100.0,
        applied_rate: 1.0,
        cost: CostBasis::SystemCost(1_000.0),
        horizon_periods: 3,
        periods_per_year: 1,
        inflation_rate: 0.10,
    })
    .unwrap();
    assert!((series.savings[0] - 100.0).abs() < 1e-9);
    assert!((series.savings[1] - 110.0).abs() < 1e-9);
    assert!((series.savings[2] - 121.0).abs() < 1e-9);
    assert!((series.cumulative_savings[2] - 331.0).abs() < 1e-9);
}

#[test]
fn financing_compares_against_cumulative_payments() {
    // 절감 1000/기, 납입 1500/기 x 4기 = 6000 -> 6기에 누적 절감 6000
    let series = project(RoiInput {
        periodic_consumption_kwh: 1000.0,
        applied_rate: 1.0,
        cost: CostBasis::Financing(FinancingSchedule::new(1500.0, 4)),
        horizon_periods: 12,
        periods_per_year: 12,
        inflation_rate: 0.0,
    })
    .unwrap();
    let payments = series.cumulative_payments.as_ref().expect("payments");
    assert_eq!(payments.len(), 12);
    assert_eq!(payments[3], 6000.0);
    assert_eq!(payments[11], 6000.0);
    assert_eq!(series.crossover_period, Some(6));
    assert_eq!(series.cost_at(6), Some(6000.0));
    assert_eq!(series.system_cost, None);
}

#[test]
fn savings_above_payment_cross_immediately() {
    let series = project(RoiInput {
        periodic_consumption_kwh: 2000.0,
        applied_rate: 1.0,
        cost: CostBasis::Financing(FinancingSchedule::new(1500.0, 24)),
        horizon_periods: 24,
        periods_per_year: 12,
        inflation_rate: 0.0,
    })
    .unwrap();
    assert_eq!(series.crossover_period, Some(1));
}

#[test]
fn down_payment_delays_crossover() {
    let series = project(RoiInput {
        periodic_consumption_kwh: 2000.0,
        applied_rate: 1.0,
        cost: CostBasis::Financing(FinancingSchedule::new(1500.0, 24).with_down_payment(5000.0)),
        horizon_periods: 24,
        periods_per_year: 12,
        inflation_rate: 0.0,
    })
    .unwrap();
    // 누적 절감 2000k >= 5000 + 1500k -> k >= 10
    assert_eq!(series.crossover_period, Some(10));
}

#[test]
fn invalid_inputs_are_rejected() {
    let zero_cost = project(flat_input(3000.0, 0.0, 300)).unwrap_err();
    assert!(matches!(zero_cost, CalcError::DegenerateConfiguration(_)));

    let zero_horizon = project(flat_input(3000.0, 100.0, 0)).unwrap_err();
    assert!(matches!(zero_horizon, CalcError::DegenerateConfiguration(_)));

    let mut negative_rate = flat_input(3000.0, 100.0, 12);
    negative_rate.applied_rate = -1.0;
    assert!(matches!(
        project(negative_rate).unwrap_err(),
        CalcError::InvalidInput(_)
    ));

    let mut negative_consumption = flat_input(3000.0, 100.0, 12);
    negative_consumption.periodic_consumption_kwh = -3000.0;
    assert!(matches!(
        project(negative_consumption).unwrap_err(),
        CalcError::InvalidInput(_)
    ));

    let mut bad_inflation = flat_input(3000.0, 100.0, 12);
    bad_inflation.inflation_rate = 1.5;
    assert!(matches!(
        project(bad_inflation).unwrap_err(),
        CalcError::InvalidInput(_)
    ));

    let mut no_year = flat_input(3000.0, 100.0, 12);
    no_year.periods_per_year = 0;
    assert!(matches!(
        project(no_year).unwrap_err(),
        CalcError::DegenerateConfiguration(_)
    ));
}

#[test]
fn annual_inflation_converts_to_monthly_rate() {
    let monthly = per_period_rate(0.12, 12).unwrap();
    assert!(((1.0 + monthly).powi(12) - 1.12).abs() < 1e-12);
    assert!((per_period_rate(0.05, 1).unwrap() - 0.05).abs() < 1e-12);
    assert!(per_period_rate(-0.1, 12).is_err());
}

#[test]
fn summary_reports_payback_and_npv() {
    let series = project(RoiInput {
        periodic_consumption_kwh: 1000.0,
        applied_rate: 1.0,
        cost: CostBasis::SystemCost(3000.0),
        horizon_periods: 5,
        periods_per_year: 1,
        inflation_rate: 0.0,
    })
    .unwrap();
    let summary = summarize(&series, 0.0).unwrap();
    assert_eq!(summary.simple_payback_years, Some(3.0));
    assert!((summary.npv - 2000.0).abs() < 1e-9);
    assert!((summary.net_position - 2000.0).abs() < 1e-9);

    let discounted = summarize(&series, 0.10).unwrap();
    // 1000 * 연금현가계수(10%, 5년) = 3790.79
    assert!((discounted.npv - 790.787).abs() < 1e-3, "npv={}", discounted.npv);
}

#[test]
fn summary_for_financing_nets_payments() {
    let series = project(RoiInput {
        periodic_consumption_kwh: 1000.0,
        applied_rate: 1.0,
        cost: CostBasis::Financing(FinancingSchedule::new(1500.0, 2)),
        horizon_periods: 4,
        periods_per_year: 1,
        inflation_rate: 0.0,
    })
    .unwrap();
    let summary = summarize(&series, 0.0).unwrap();
    assert!((summary.npv - 1000.0).abs() < 1e-9);
    assert!((summary.net_position - 1000.0).abs() < 1e-9);
    assert_eq!(summary.simple_payback_years, Some(3.0));
}

#[test]
fn loan_payment_feeds_financing_schedule() {
    let payment = level_payment(100_000.0, 0.12, 12, 12).unwrap();
    let schedule = FinancingSchedule::new(payment, 12);
    assert!((schedule.total() - 106_618.55).abs() < 0.05, "total={}", schedule.total());
    assert!(level_payment(1000.0, 0.1, 0, 12).is_err());
}

#[test]
fn horizon_beyond_a_century_of_months_is_rejected() {
    let err = project(flat_input(3000.0, 100.0, 1201)).unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput(_)), "{err:?}");
    assert_eq!(project(flat_input(3000.0, 100.0, 1200)).unwrap().len(), 1200);
}

#[test]
fn short_horizon_annualizes_first_year_savings() {
    // 6개월만 계산해도 월 100 절감이면 연 1200으로 본다
    let series = project(flat_input(100.0, 2400.0, 6)).unwrap();
    let summary = summarize(&series, 0.0).unwrap();
    let years = summary.simple_payback_years.expect("payback");
    assert!((years - 2.0).abs() < 1e-12, "years={years}");
}
