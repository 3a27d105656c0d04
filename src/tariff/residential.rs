use serde::{Deserialize, Serialize};

use super::{TariffClass, TaxPolicy};
use crate::error::{ensure_non_negative, CalcError};

/// 누진 요금의 세 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Basic,
    Intermediate,
    Excess,
}

impl Block {
    pub const ALL: [Block; 3] = [Block::Basic, Block::Intermediate, Block::Excess];

    /// 고지서 표기 이름.
    pub fn label(&self) -> &'static str {
        match self {
            Block::Basic => "Básico",
            Block::Intermediate => "Intermedio",
            Block::Excess => "Excedente",
        }
    }
}

/// 주택용 요금 계산 입력.
#[derive(Debug, Clone)]
pub struct ResidentialBillInput {
    /// 청구 기간(격월) 사용량 [kWh]
    pub consumption_kwh: f64,
    pub tax: TaxPolicy,
}

/// 주택용 요금 내역.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillBreakdown {
    pub tariff_id: String,
    pub consumption_kwh: f64,
    /// 구간별 사용량 [kWh] (기본, 중간, 초과)
    pub block_consumption_kwh: [f64; 3],
    /// 구간별 요금 [통화]
    pub block_cost: [f64; 3],
    /// 세전 소계
    pub subtotal: f64,
    /// 세금 포함 합계
    pub total: f64,
}

impl BillBreakdown {
    /// 세금 포함 실효 단가 [통화/kWh]. 사용량이 0이면 정의되지 않는다.
    pub fn applied_rate(&self) -> Option<f64> {
        (self.consumption_kwh > 0.0).then(|| self.total / self.consumption_kwh)
    }

    /// (구간, 사용량, 요금) 행 단위로 순회한다.
    pub fn rows(&self) -> impl Iterator<Item = (Block, f64, f64)> + '_ {
        Block::ALL
            .into_iter()
            .zip(self.block_consumption_kwh)
            .zip(self.block_cost)
            .map(|((block, kwh), cost)| (block, kwh, cost))
    }
}

/// 사용량을 세 구간으로 나눈다. 두 번째 경계값은 절대 상한으로 해석한다.
fn split_blocks(consumption: f64, basic_limit: f64, intermediate_limit: f64) -> [f64; 3] {
    if consumption <= basic_limit {
        [consumption, 0.0, 0.0]
    } else if consumption <= intermediate_limit {
        [basic_limit, consumption - basic_limit, 0.0]
    } else {
        [
            basic_limit,
            intermediate_limit - basic_limit,
            consumption - intermediate_limit,
        ]
    }
}

/// 누진 구간별 사용량과 요금을 계산한다.
pub fn compute_residential_bill(
    input: ResidentialBillInput,
    tariff: &TariffClass,
) -> Result<BillBreakdown, CalcError> {
    ensure_non_negative("consumption", input.consumption_kwh)?;
    input.tax.validate()?;
    tariff
        .validate()
        .map_err(|e| CalcError::degenerate(e.to_string()))?;

    let (basic_limit, intermediate_limit) = tariff.limits();
    let blocks = split_blocks(input.consumption_kwh, basic_limit, intermediate_limit);
    let rates = tariff.rates();
    let costs: [f64; 3] = std::array::from_fn(|i| blocks[i] * rates[i]);
    let subtotal: f64 = costs.iter().sum();
    let total = input.tax.apply(subtotal);

    tracing::debug!(
        tariff = %tariff.id,
        consumption = input.consumption_kwh,
        subtotal,
        total,
        "residential bill computed"
    );

    Ok(BillBreakdown {
        tariff_id: tariff.id.clone(),
        consumption_kwh: input.consumption_kwh,
        block_consumption_kwh: blocks,
        block_cost: costs,
        subtotal,
        total,
    })
}
