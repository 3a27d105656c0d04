use serde::{Deserialize, Serialize};

use super::projector::RoiSeries;
use crate::error::{ensure_non_negative, CalcError};

/// 시계열에서 도출한 경제성 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// 단순 회수기간 [년] = 총비용 / 첫해 절감액. 절감이 없으면 `None`.
    /// 계산 기간이 1년 미만이면 첫해 절감액을 연 단위로 환산해 쓴다.
    pub simple_payback_years: Option<f64>,
    /// 기간 할인율로 계산한 순현재가치(NPV)
    pub npv: f64,
    /// 계산 기간 말 누적 절감액 - 누적 비용
    pub net_position: f64,
}

/// 회수기간 시계열로부터 단순 회수기간과 NPV를 계산한다.
///
/// `discount_rate`는 기간당 할인율(소수)이다. 일시불 설비비는 0기에 지출한 것으로 본다.
pub fn summarize(series: &RoiSeries, discount_rate: f64) -> Result<FinancialSummary, CalcError> {
    ensure_non_negative("discount rate", discount_rate)?;
    if series.is_empty() {
        return Err(CalcError::degenerate("series has no periods"));
    }

    let outlays = period_outlays(series);
    let total_cost: f64 = series.system_cost.unwrap_or(0.0) + outlays.iter().sum::<f64>();

    // 계산 기간이 1년보다 짧으면 있는 기간의 평균으로 1년치를 채운다
    let per_year = series.periods_per_year as usize;
    let observed = per_year.min(series.len());
    let observed_savings: f64 = series.savings.iter().take(observed).sum();
    let first_year_savings = observed_savings * per_year as f64 / observed as f64;
    let simple_payback_years =
        (first_year_savings > 0.0).then(|| total_cost / first_year_savings);

    let mut npv = -series.system_cost.unwrap_or(0.0);
    for (period, (saving, outlay)) in (1..).zip(series.savings.iter().zip(&outlays)) {
        let df = (1.0 + discount_rate).powi(period);
        npv += (saving - outlay) / df;
    }

    let last_saved = series.cumulative_savings.last().copied().unwrap_or(0.0);
    let last_cost = match &series.cumulative_payments {
        Some(payments) => payments.last().copied().unwrap_or(0.0),
        None => series.system_cost.unwrap_or(0.0),
    };

    Ok(FinancialSummary {
        simple_payback_years,
        npv,
        net_position: last_saved - last_cost,
    })
}

/// 할부 납입 시 기간별 지출액. 일시불이면 모두 0이다.
fn period_outlays(series: &RoiSeries) -> Vec<f64> {
    match &series.cumulative_payments {
        Some(payments) => {
            let mut prev = 0.0;
            payments
                .iter()
                .map(|&cum| {
                    let outlay = cum - prev;
                    prev = cum;
                    outlay
                })
                .collect()
        }
        None => vec![0.0; series.len()],
    }
}
