use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::error::CalcError;

/// 부가가치세(IVA) 기본 세율.
pub const DEFAULT_TAX_RATE: f64 = 0.16;

/// 주택용 누진 요금제 한 종류.
///
/// 두 경계값은 모두 절대 사용량 상한(kWh)이다. `intermediate_limit_kwh`는 구간 폭이 아니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffClass {
    /// 요금제 식별자 (1, 1A, ... 1F)
    pub id: String,
    /// 기본 구간 상한 [kWh]
    pub basic_limit_kwh: f64,
    /// 중간 구간 상한 [kWh]
    pub intermediate_limit_kwh: f64,
    /// 기본 구간 단가 [통화/kWh]
    pub basic_rate: f64,
    /// 중간 구간 단가 [통화/kWh]
    pub intermediate_rate: f64,
    /// 초과 구간 단가 [통화/kWh]
    pub excess_rate: f64,
}

impl TariffClass {
    pub fn new(
        id: &str,
        limits_kwh: (f64, f64),
        rates: (f64, f64, f64),
    ) -> Result<Self, CatalogError> {
        let class = Self {
            id: id.to_string(),
            basic_limit_kwh: limits_kwh.0,
            intermediate_limit_kwh: limits_kwh.1,
            basic_rate: rates.0,
            intermediate_rate: rates.1,
            excess_rate: rates.2,
        };
        class.validate()?;
        Ok(class)
    }

    /// 경계값 순서와 단가의 누진성(비감소)을 검사한다.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |msg: &str| CatalogError::Invalid {
            id: self.id.clone(),
            reason: msg.to_string(),
        };
        let all_finite = [
            self.basic_limit_kwh,
            self.intermediate_limit_kwh,
            self.basic_rate,
            self.intermediate_rate,
            self.excess_rate,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(invalid("limits and rates must be finite"));
        }
        if self.basic_limit_kwh <= 0.0 {
            return Err(invalid("basic limit must be > 0"));
        }
        if self.basic_limit_kwh >= self.intermediate_limit_kwh {
            return Err(invalid("basic limit must be below the intermediate limit"));
        }
        if self.basic_rate < 0.0 {
            return Err(invalid("rates must be >= 0"));
        }
        if self.intermediate_rate < self.basic_rate || self.excess_rate < self.intermediate_rate {
            return Err(invalid("rates must be non-decreasing across blocks"));
        }
        Ok(())
    }

    pub fn limits(&self) -> (f64, f64) {
        (self.basic_limit_kwh, self.intermediate_limit_kwh)
    }

    pub fn rates(&self) -> [f64; 3] {
        [self.basic_rate, self.intermediate_rate, self.excess_rate]
    }
}

/// 상업용 요금제: 에너지 단가 + 최대수요 단가.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialTariff {
    pub id: String,
    /// 에너지 단가 [통화/kWh]
    pub energy_rate: f64,
    /// 최대수요 단가 [통화/kW]
    pub demand_rate: f64,
}

impl CommercialTariff {
    pub fn new(id: &str, energy_rate: f64, demand_rate: f64) -> Result<Self, CatalogError> {
        let tariff = Self {
            id: id.to_string(),
            energy_rate,
            demand_rate,
        };
        tariff.validate()?;
        Ok(tariff)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.energy_rate.is_finite()
            || !self.demand_rate.is_finite()
            || self.energy_rate < 0.0
            || self.demand_rate < 0.0
        {
            return Err(CatalogError::Invalid {
                id: self.id.clone(),
                reason: "energy and demand rates must be finite and >= 0".to_string(),
            });
        }
        Ok(())
    }
}

/// 카탈로그 로드/검증 오류.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read tariff catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tariff catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("tariff {id}: {reason}")]
    Invalid { id: String, reason: String },
    #[error("tariff {0} is defined more than once")]
    Duplicate(String),
    #[error("tax rate must be a finite value >= 0 (got {0})")]
    TaxRate(f64),
}

/// 프로그램 시작 시 한 번 로드되는 불변 요금 카탈로그.
///
/// 생성 경로(`cfe`, `from_toml_str`, `load`)는 모두 검증을 거치므로 보관된 요금제는 항상
/// 불변식을 만족한다. 필드는 읽기 전용으로만 노출한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffCatalog {
    #[serde(default = "default_tax_rate")]
    tax_rate: f64,
    #[serde(default)]
    residential: Vec<TariffClass>,
    #[serde(default)]
    commercial: Vec<CommercialTariff>,
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

impl Default for TariffCatalog {
    fn default() -> Self {
        Self::cfe()
    }
}

impl TariffCatalog {
    /// 내장 CFE 요금표 (주택용 7종, 상업용 3종, IVA 16%).
    pub fn cfe() -> Self {
        const RATES: (f64, f64, f64) = (0.793, 0.956, 3.367);
        let residential = [
            ("1", 150.0, 280.0),
            ("1A", 300.0, 600.0),
            ("1B", 400.0, 800.0),
            ("1C", 850.0, 1000.0),
            ("1D", 1000.0, 1200.0),
            ("1E", 2000.0, 2500.0),
            ("1F", 2500.0, 3000.0),
        ]
        .into_iter()
        .map(|(id, basic, intermediate)| TariffClass {
            id: id.to_string(),
            basic_limit_kwh: basic,
            intermediate_limit_kwh: intermediate,
            basic_rate: RATES.0,
            intermediate_rate: RATES.1,
            excess_rate: RATES.2,
        })
        .collect();
        let commercial = [("PDBT", 4.0, 150.0), ("GDBT", 2.5, 300.0), ("GDMTO", 1.8, 500.0)]
            .into_iter()
            .map(|(id, energy_rate, demand_rate)| CommercialTariff {
                id: id.to_string(),
                energy_rate,
                demand_rate,
            })
            .collect();
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            residential,
            commercial,
        }
    }

    /// 직접 구성한 요금제 목록으로 카탈로그를 만든다.
    pub fn new(
        tax_rate: f64,
        residential: Vec<TariffClass>,
        commercial: Vec<CommercialTariff>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            tax_rate,
            residential,
            commercial,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// TOML 문자열에서 카탈로그를 읽고 검증한다.
    pub fn from_toml_str(src: &str) -> Result<Self, CatalogError> {
        let catalog: TariffCatalog = toml::from_str(src)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// TOML 파일에서 카탈로그를 로드한다.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            residential = catalog.residential.len(),
            commercial = catalog.commercial.len(),
            "loaded tariff catalog"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if !self.tax_rate.is_finite() || self.tax_rate < 0.0 {
            return Err(CatalogError::TaxRate(self.tax_rate));
        }
        let mut seen: Vec<String> = Vec::new();
        let ids = self
            .residential
            .iter()
            .map(|t| t.id.as_str())
            .chain(self.commercial.iter().map(|t| t.id.as_str()));
        for id in ids {
            let key = id.to_uppercase();
            if seen.contains(&key) {
                return Err(CatalogError::Duplicate(id.to_string()));
            }
            seen.push(key);
        }
        for class in &self.residential {
            class.validate()?;
        }
        for tariff in &self.commercial {
            tariff.validate()?;
        }
        Ok(())
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn residential_classes(&self) -> &[TariffClass] {
        &self.residential
    }

    pub fn commercial_tariffs(&self) -> &[CommercialTariff] {
        &self.commercial
    }

    /// 식별자로 주택용 요금제를 찾는다. 대소문자는 구분하지 않는다.
    pub fn residential(&self, id: &str) -> Result<&TariffClass, CalcError> {
        let id = id.trim();
        self.residential
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| CalcError::UnknownTariff(id.to_string()))
    }

    /// 식별자로 상업용 요금제를 찾는다. 대소문자는 구분하지 않는다.
    pub fn commercial(&self, id: &str) -> Result<&CommercialTariff, CalcError> {
        let id = id.trim();
        self.commercial
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| CalcError::UnknownTariff(id.to_string()))
    }
}
