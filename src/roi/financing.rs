use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, CalcError};

/// 설비 금융(할부) 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingSchedule {
    /// 1기에 지불하는 계약금
    pub down_payment: f64,
    /// 기간당 납입액
    pub payment: f64,
    /// 납입 기간 수. 이후에는 납입액이 0이다.
    pub term_periods: u32,
}

impl FinancingSchedule {
    pub fn new(payment: f64, term_periods: u32) -> Self {
        Self {
            down_payment: 0.0,
            payment,
            term_periods,
        }
    }

    pub fn with_down_payment(mut self, down_payment: f64) -> Self {
        self.down_payment = down_payment;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), CalcError> {
        ensure_non_negative("down payment", self.down_payment)?;
        ensure_non_negative("financing payment", self.payment)?;
        if self.payment > 0.0 && self.term_periods == 0 {
            return Err(CalcError::degenerate(
                "financing term must cover at least one period",
            ));
        }
        if self.total() <= 0.0 {
            return Err(CalcError::degenerate(
                "financing schedule pays nothing; ROI is undefined",
            ));
        }
        Ok(())
    }

    /// `period`(1부터)에 지불하는 금액.
    pub fn payment_at(&self, period: u32) -> f64 {
        let down = if period == 1 { self.down_payment } else { 0.0 };
        let installment = if period >= 1 && period <= self.term_periods {
            self.payment
        } else {
            0.0
        };
        down + installment
    }

    /// 전체 납입 총액.
    pub fn total(&self) -> f64 {
        self.down_payment + self.payment * f64::from(self.term_periods)
    }
}

/// 원리금 균등 상환액을 계산한다.
///
/// `annual_rate`는 연 이자율(소수), 이자는 기간 단위로 복리 적용한다. 이자율 0이면
/// 원금을 기간 수로 나눈다.
pub fn level_payment(
    principal: f64,
    annual_rate: f64,
    term_periods: u32,
    periods_per_year: u32,
) -> Result<f64, CalcError> {
    ensure_non_negative("principal", principal)?;
    ensure_non_negative("interest rate", annual_rate)?;
    if term_periods == 0 || periods_per_year == 0 {
        return Err(CalcError::degenerate(
            "loan term and periods per year must be positive",
        ));
    }
    let n = f64::from(term_periods);
    let r = annual_rate / f64::from(periods_per_year);
    if r == 0.0 {
        return Ok(principal / n);
    }
    Ok(principal * r / (1.0 - (1.0 + r).powf(-n)))
}
