use serde::{Deserialize, Serialize};

use super::{CommercialTariff, TaxPolicy};
use crate::error::{ensure_non_negative, CalcError};

/// 상업용 요금 계산 입력.
#[derive(Debug, Clone)]
pub struct CommercialBillInput {
    /// 월간 사용량 [kWh]
    pub consumption_kwh: f64,
    /// 최대 수요 [kW]
    pub demand_peak_kw: f64,
    pub tax: TaxPolicy,
}

/// 상업용 요금 내역.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialBill {
    pub tariff_id: String,
    pub consumption_kwh: f64,
    pub demand_peak_kw: f64,
    pub energy_cost: f64,
    pub demand_cost: f64,
    pub subtotal: f64,
    pub total: f64,
}

impl CommercialBill {
    /// 세금 포함 실효 단가 [통화/kWh]. 수요 요금도 단가에 녹아든다.
    pub fn applied_rate(&self) -> Option<f64> {
        (self.consumption_kwh > 0.0).then(|| self.total / self.consumption_kwh)
    }
}

/// 에너지 요금과 최대수요 요금을 합산한다.
pub fn compute_commercial_bill(
    input: CommercialBillInput,
    tariff: &CommercialTariff,
) -> Result<CommercialBill, CalcError> {
    ensure_non_negative("consumption", input.consumption_kwh)?;
    ensure_non_negative("demand peak", input.demand_peak_kw)?;
    input.tax.validate()?;
    tariff
        .validate()
        .map_err(|e| CalcError::degenerate(e.to_string()))?;

    let energy_cost = input.consumption_kwh * tariff.energy_rate;
    let demand_cost = input.demand_peak_kw * tariff.demand_rate;
    let subtotal = energy_cost + demand_cost;
    let total = input.tax.apply(subtotal);

    tracing::debug!(
        tariff = %tariff.id,
        consumption = input.consumption_kwh,
        demand = input.demand_peak_kw,
        total,
        "commercial bill computed"
    );

    Ok(CommercialBill {
        tariff_id: tariff.id.clone(),
        consumption_kwh: input.consumption_kwh,
        demand_peak_kw: input.demand_peak_kw,
        energy_cost,
        demand_cost,
        subtotal,
        total,
    })
}
