use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 사용량/고지서가 가리키는 청구 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum BillingPeriod {
    /// 격월 (CFE 주택용 기본)
    Bimonthly,
    Monthly,
    Annual,
}

impl BillingPeriod {
    pub fn months(&self) -> u32 {
        match self {
            BillingPeriod::Bimonthly => 2,
            BillingPeriod::Monthly => 1,
            BillingPeriod::Annual => 12,
        }
    }
}

/// 회수기간 시계열의 기간 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Granularity {
    Monthly,
    Annual,
}

impl Granularity {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Granularity::Monthly => 12,
            Granularity::Annual => 1,
        }
    }

    pub fn months(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

/// 한 청구 기간의 사용량을 다른 청구 기간 기준으로 환산한다. 요금표 경계값이 격월 기준이므로
/// 고지서 계산 전에 쓴다.
pub fn rebill_consumption(kwh: f64, from: BillingPeriod, to: BillingPeriod) -> f64 {
    kwh * f64::from(to.months()) / f64::from(from.months())
}

/// 청구 기간 사용량을 계산 기간 사용량으로 환산한다.
pub fn rescale_consumption(kwh: f64, from: BillingPeriod, to: Granularity) -> f64 {
    kwh * f64::from(to.months()) / f64::from(from.months())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bimonthly_to_monthly_halves() {
        assert_eq!(
            rescale_consumption(400.0, BillingPeriod::Bimonthly, Granularity::Monthly),
            200.0
        );
        assert_eq!(
            rescale_consumption(400.0, BillingPeriod::Bimonthly, Granularity::Annual),
            2400.0
        );
        assert_eq!(
            rescale_consumption(1200.0, BillingPeriod::Annual, Granularity::Monthly),
            100.0
        );
    }

    #[test]
    fn annual_usage_rebills_to_bimonthly() {
        assert_eq!(
            rebill_consumption(1200.0, BillingPeriod::Annual, BillingPeriod::Bimonthly),
            200.0
        );
        assert_eq!(
            rebill_consumption(100.0, BillingPeriod::Monthly, BillingPeriod::Bimonthly),
            200.0
        );
    }
}
