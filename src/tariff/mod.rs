//! CFE 요금 계산 모듈 모음.

pub mod catalog;
pub mod commercial;
pub mod residential;

pub use catalog::{CatalogError, CommercialTariff, TariffCatalog, TariffClass, DEFAULT_TAX_RATE};
pub use commercial::{compute_commercial_bill, CommercialBill, CommercialBillInput};
pub use residential::{compute_residential_bill, BillBreakdown, Block, ResidentialBillInput};

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, CalcError};

/// 세금 적용 방식.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxPolicy {
    /// 세율 (0.16 = 16%)
    pub rate: f64,
    /// 입력 단가에 이미 세금이 포함되어 있는지 여부
    pub already_included: bool,
}

impl TaxPolicy {
    pub fn new(rate: f64, already_included: bool) -> Self {
        Self {
            rate,
            already_included,
        }
    }

    /// 카탈로그 세율을 그대로 사용하는 정책.
    pub fn from_catalog(catalog: &TariffCatalog, already_included: bool) -> Self {
        Self::new(catalog.tax_rate(), already_included)
    }

    pub(crate) fn validate(&self) -> Result<(), CalcError> {
        ensure_non_negative("tax rate", self.rate)
    }

    /// 소계에 세금을 적용한 합계를 반환한다.
    pub fn apply(&self, subtotal: f64) -> f64 {
        if self.already_included {
            subtotal
        } else {
            subtotal * (1.0 + self.rate)
        }
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_RATE, false)
    }
}
