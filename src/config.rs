use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::payback::DEFAULT_HORIZON_YEARS;
use crate::period::{BillingPeriod, Granularity};
use crate::tariff::{CatalogError, TariffCatalog};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 회수기간 계산 기본값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionDefaults {
    /// 계산 기간 [년]
    pub horizon_years: u32,
    /// 시계열 단위
    pub granularity: Granularity,
    /// 사용량 입력의 청구 기간
    pub billing_period: BillingPeriod,
    /// 연 요금 상승률(소수)
    pub annual_inflation: f64,
    /// 연 할인율(소수)
    pub discount_rate: f64,
}

impl Default for ProjectionDefaults {
    fn default() -> Self {
        Self {
            horizon_years: DEFAULT_HORIZON_YEARS,
            granularity: Granularity::Monthly,
            billing_period: BillingPeriod::Bimonthly,
            annual_inflation: 0.0,
            discount_rate: 0.0,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드 (auto/es/en)
    pub language: String,
    /// 언어팩 디렉터리. 없으면 locales/ 와 내장 문자열을 사용한다.
    pub language_pack_dir: Option<String>,
    /// 요금 카탈로그 TOML 경로. 없으면 내장 CFE 요금표를 사용한다.
    pub tariff_catalog: Option<PathBuf>,
    pub projection: ProjectionDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            tariff_catalog: None,
            projection: ProjectionDefaults::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("failed to parse config: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 요금 카탈로그 오류
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        tracing::info!(path = %path.display(), "created default config");
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }

    /// 요금 카탈로그를 결정한다. CLI 인자 → 설정 파일 → 내장 요금표 순.
    pub fn load_catalog(&self, override_path: Option<&Path>) -> Result<TariffCatalog, ConfigError> {
        match override_path.or(self.tariff_catalog.as_deref()) {
            Some(path) => Ok(TariffCatalog::load(path)?),
            None => Ok(TariffCatalog::cfe()),
        }
    }
}
