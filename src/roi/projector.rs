use serde::{Deserialize, Serialize};

use super::financing::FinancingSchedule;
use crate::error::{ensure_fraction, ensure_non_negative, CalcError};

/// 계산 기간 상한. 월 단위 100년.
pub const MAX_HORIZON_PERIODS: u32 = 1200;

/// 절감액과 비교할 비용 기준.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CostBasis {
    /// 일시불 설비비. 누적 절감액이 이 값 이상이 되는 시점을 찾는다.
    SystemCost(f64),
    /// 할부 납입. 누적 절감액이 누적 납입액 이상이 되는 시점을 찾는다.
    Financing(FinancingSchedule),
}

/// 회수기간 계산 입력.
///
/// 사용량과 단가는 같은 기간 단위여야 한다. 이 함수는 단위를 추정하지 않는다.
#[derive(Debug, Clone)]
pub struct RoiInput {
    /// 기간당 사용량 [kWh]
    pub periodic_consumption_kwh: f64,
    /// 적용 단가 [통화/kWh]
    pub applied_rate: f64,
    pub cost: CostBasis,
    /// 계산 기간 수 (예: 25년 x 12개월 = 300)
    pub horizon_periods: u32,
    /// 1년에 해당하는 기간 수 (월 단위 12, 연 단위 1)
    pub periods_per_year: u32,
    /// 기간당 요금 상승률(소수). 0이면 절감액이 일정하다.
    pub inflation_rate: f64,
}

/// 기간별 누적 절감 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiSeries {
    pub periods_per_year: u32,
    /// 기간별 절감액
    pub savings: Vec<f64>,
    /// 누적 절감액. 인덱스 0이 1기이다.
    pub cumulative_savings: Vec<f64>,
    /// 할부 비교 시 누적 납입액
    pub cumulative_payments: Option<Vec<f64>>,
    /// 일시불 비교 시 설비비
    pub system_cost: Option<f64>,
    /// 누적 절감액이 비용을 처음 넘는 기간(1부터). 기간 내 없으면 `None`.
    pub crossover_period: Option<u32>,
}

impl RoiSeries {
    pub fn len(&self) -> usize {
        self.cumulative_savings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative_savings.is_empty()
    }

    /// `period`(1부터)까지의 누적 절감액.
    pub fn cumulative_at(&self, period: u32) -> Option<f64> {
        let idx = usize::try_from(period).ok()?.checked_sub(1)?;
        self.cumulative_savings.get(idx).copied()
    }

    /// `period`(1부터)에 비교 대상이 되는 비용.
    pub fn cost_at(&self, period: u32) -> Option<f64> {
        let idx = usize::try_from(period).ok()?.checked_sub(1)?;
        match &self.cumulative_payments {
            Some(payments) => payments.get(idx).copied(),
            None => self
                .system_cost
                .filter(|_| idx < self.cumulative_savings.len()),
        }
    }

    /// 손익분기 시점을 연 단위로 환산한다.
    pub fn crossover_years(&self) -> Option<f64> {
        self.crossover_period
            .map(|p| f64::from(p) / f64::from(self.periods_per_year))
    }

    /// (기간, 누적 절감액) 쌍을 순회한다. 차트 표시용.
    pub fn points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        (1u32..).zip(self.cumulative_savings.iter().copied())
    }
}

/// 연 상승률을 기간 상승률로 환산한다: `(1 + annual)^(1/n) - 1`.
pub fn per_period_rate(annual_rate: f64, periods_per_year: u32) -> Result<f64, CalcError> {
    ensure_fraction("annual rate", annual_rate)?;
    if periods_per_year == 0 {
        return Err(CalcError::degenerate("periods per year must be at least 1"));
    }
    Ok((1.0 + annual_rate).powf(1.0 / f64::from(periods_per_year)) - 1.0)
}

fn validate(input: &RoiInput) -> Result<(), CalcError> {
    ensure_non_negative("periodic consumption", input.periodic_consumption_kwh)?;
    ensure_non_negative("applied rate", input.applied_rate)?;
    ensure_fraction("inflation rate", input.inflation_rate)?;
    if input.horizon_periods == 0 {
        return Err(CalcError::degenerate("horizon must be at least one period"));
    }
    if input.horizon_periods > MAX_HORIZON_PERIODS {
        return Err(CalcError::invalid(format!(
            "horizon must not exceed {MAX_HORIZON_PERIODS} periods (got {})",
            input.horizon_periods
        )));
    }
    if input.periods_per_year == 0 {
        return Err(CalcError::degenerate("periods per year must be at least 1"));
    }
    match input.cost {
        CostBasis::SystemCost(cost) => {
            if !cost.is_finite() {
                return Err(CalcError::invalid(format!(
                    "system cost must be finite (got {cost})"
                )));
            }
            if cost <= 0.0 {
                return Err(CalcError::degenerate(format!(
                    "system cost must be positive (got {cost}); ROI is undefined"
                )));
            }
        }
        CostBasis::Financing(schedule) => schedule.validate()?,
    }
    Ok(())
}

/// 누적 절감 시계열과 손익분기 기간을 계산한다.
///
/// 손익분기를 찾은 뒤에도 전체 기간을 끝까지 채운다. 반올림은 하지 않는다.
pub fn project(input: RoiInput) -> Result<RoiSeries, CalcError> {
    validate(&input)?;

    let base = input.periodic_consumption_kwh * input.applied_rate;
    let growth = 1.0 + input.inflation_rate;
    let capacity = input.horizon_periods as usize;

    let mut savings = Vec::with_capacity(capacity);
    let mut cumulative_savings = Vec::with_capacity(capacity);
    let mut cumulative_payments = match input.cost {
        CostBasis::Financing(_) => Some(Vec::with_capacity(capacity)),
        CostBasis::SystemCost(_) => None,
    };
    let mut crossover_period = None;
    let mut saved = 0.0;
    let mut paid = 0.0;

    for period in 1..=input.horizon_periods {
        let saving = base * growth.powf(f64::from(period - 1));
        saved += saving;
        savings.push(saving);
        cumulative_savings.push(saved);

        let target = match input.cost {
            CostBasis::SystemCost(cost) => cost,
            CostBasis::Financing(schedule) => {
                paid += schedule.payment_at(period);
                paid
            }
        };
        if let Some(payments) = cumulative_payments.as_mut() {
            payments.push(paid);
        }
        if crossover_period.is_none() && saved >= target {
            crossover_period = Some(period);
        }
    }

    tracing::debug!(
        horizon = input.horizon_periods,
        base_savings = base,
        crossover = ?crossover_period,
        "roi projection computed"
    );

    Ok(RoiSeries {
        periods_per_year: input.periods_per_year,
        savings,
        cumulative_savings,
        cumulative_payments,
        system_cost: match input.cost {
            CostBasis::SystemCost(cost) => Some(cost),
            CostBasis::Financing(_) => None,
        },
        crossover_period,
    })
}
