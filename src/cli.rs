//! 명령행 인자 정의와 비대화형 하위 명령 실행.

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::app::{AppError, Session};
use crate::config::{ProjectionDefaults, DEFAULT_CONFIG_PATH};
use crate::error::CalcError;
use crate::payback::{self, PaybackRequest, RateSource};
use crate::period::{BillingPeriod, Granularity};
use crate::roi::{self, CostBasis, FinancingSchedule};
use crate::tariff::{self, CommercialBillInput, ResidentialBillInput, TaxPolicy};
use crate::ui_cli;

#[derive(Debug, Parser)]
#[command(
    name = "solar_payback_cli",
    version,
    about = "CFE tiered bill and solar payback estimator"
)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// 요금 카탈로그 TOML 경로 (설정 파일 값보다 우선)
    #[arg(long, global = true)]
    pub tariffs: Option<PathBuf>,
    /// 언어 (auto, es, en)
    #[arg(long, global = true, default_value = "auto")]
    pub lang: String,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 주택용 누진 요금 고지서를 계산한다
    Residential(ResidentialArgs),
    /// 상업용(에너지 + 최대수요) 고지서를 계산한다
    Commercial(CommercialArgs),
    /// 태양광 설비 회수기간을 계산한다
    Payback(PaybackArgs),
    /// 로드된 요금표를 출력한다
    Catalog,
}

#[derive(Debug, Args)]
pub struct ResidentialArgs {
    #[arg(long)]
    pub tariff: String,
    /// 격월 사용량 [kWh]
    #[arg(long)]
    pub consumption: f64,
    #[arg(long)]
    pub tax_included: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CommercialArgs {
    #[arg(long)]
    pub tariff: String,
    /// 월 사용량 [kWh]
    #[arg(long)]
    pub consumption: f64,
    /// 최대 수요 [kW]
    #[arg(long, default_value_t = 0.0)]
    pub demand: f64,
    #[arg(long)]
    pub tax_included: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["tariff", "commercial", "rate"])))]
#[command(group(ArgGroup::new("cost").required(true).args(["system_cost", "payment"])))]
pub struct PaybackArgs {
    /// 청구 기간당 사용량 [kWh]
    #[arg(long)]
    pub consumption: f64,
    /// 주택용 요금제 식별자
    #[arg(long)]
    pub tariff: Option<String>,
    /// 상업용 요금제 식별자
    #[arg(long)]
    pub commercial: Option<String>,
    /// 상업용 최대 수요 [kW]
    #[arg(long, default_value_t = 0.0)]
    pub demand: f64,
    /// 직접 입력 단가 [통화/kWh]
    #[arg(long)]
    pub rate: Option<f64>,
    #[arg(long)]
    pub tax_included: bool,
    /// 사용량의 청구 기간 (기본: 설정값, 상업용은 월)
    #[arg(long, value_enum)]
    pub billing: Option<BillingPeriod>,
    /// 시계열 기간 단위 (기본: 설정값)
    #[arg(long, value_enum)]
    pub granularity: Option<Granularity>,
    #[arg(long)]
    pub horizon_years: Option<u32>,
    /// 설비 총비용
    #[arg(long)]
    pub system_cost: Option<f64>,
    /// 기간당 할부 납입액
    #[arg(long, requires = "term")]
    pub payment: Option<f64>,
    /// 납입 기간 수
    #[arg(long)]
    pub term: Option<u32>,
    /// 계약금
    #[arg(long, default_value_t = 0.0)]
    pub down_payment: f64,
    /// 연 이자율. --system-cost, --term 과 함께 쓰면 원리금 균등 할부로 계산한다
    #[arg(long, requires = "term", conflicts_with = "payment")]
    pub interest: Option<f64>,
    /// 연 요금 상승률 (0~1)
    #[arg(long)]
    pub inflation: Option<f64>,
    /// 연 할인율 (0~1)
    #[arg(long)]
    pub discount_rate: Option<f64>,
    /// 모든 기간을 출력한다
    #[arg(long)]
    pub full: bool,
    #[arg(long)]
    pub json: bool,
}

impl PaybackArgs {
    /// 인자와 설정 기본값으로 회수기간 요청을 만든다.
    pub fn to_request(&self, defaults: &ProjectionDefaults) -> Result<PaybackRequest, CalcError> {
        let rate_source = match (&self.tariff, &self.commercial, self.rate) {
            (Some(id), _, _) => RateSource::Residential {
                tariff_id: id.clone(),
            },
            (None, Some(id), _) => RateSource::Commercial {
                tariff_id: id.clone(),
                demand_peak_kw: self.demand,
            },
            (None, None, Some(rate)) => RateSource::Flat { rate },
            (None, None, None) => {
                return Err(CalcError::invalid(
                    "one of --tariff, --commercial or --rate is required",
                ))
            }
        };
        let granularity = self.granularity.unwrap_or(defaults.granularity);
        let cost = self.cost_basis(granularity)?;

        let billing_period = self
            .billing
            .unwrap_or_else(|| rate_source.default_billing(defaults.billing_period));

        Ok(PaybackRequest {
            consumption_kwh: self.consumption,
            billing_period,
            rate_source,
            tax_included: self.tax_included,
            cost,
            granularity,
            horizon_years: self.horizon_years.unwrap_or(defaults.horizon_years),
            annual_inflation: self.inflation.unwrap_or(defaults.annual_inflation),
            annual_discount_rate: self.discount_rate.unwrap_or(defaults.discount_rate),
        })
    }

    fn cost_basis(&self, granularity: Granularity) -> Result<CostBasis, CalcError> {
        match (self.payment, self.system_cost, self.interest, self.term) {
            (Some(payment), _, _, Some(term)) => Ok(CostBasis::Financing(
                FinancingSchedule::new(payment, term).with_down_payment(self.down_payment),
            )),
            (None, Some(cost), Some(interest), Some(term)) => {
                let principal = cost - self.down_payment;
                let payment =
                    roi::level_payment(principal, interest, term, granularity.periods_per_year())?;
                Ok(CostBasis::Financing(
                    FinancingSchedule::new(payment, term).with_down_payment(self.down_payment),
                ))
            }
            (None, Some(cost), _, _) => Ok(CostBasis::SystemCost(cost)),
            _ => Err(CalcError::invalid(
                "either --system-cost or --payment with --term is required",
            )),
        }
    }
}

/// 하위 명령을 실행하고 결과를 `out`에 쓴다.
pub fn run_command(session: &Session, command: &Command, out: &mut dyn Write) -> Result<(), AppError> {
    let tr = &session.tr;
    let catalog = &session.catalog;
    match command {
        Command::Residential(args) => {
            let tax = TaxPolicy::from_catalog(catalog, args.tax_included);
            let bill = tariff::compute_residential_bill(
                ResidentialBillInput {
                    consumption_kwh: args.consumption,
                    tax,
                },
                catalog.residential(&args.tariff)?,
            )?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&bill)?)?;
            } else {
                ui_cli::print_residential_bill(out, tr, &bill, &tax)?;
            }
        }
        Command::Commercial(args) => {
            let tax = TaxPolicy::from_catalog(catalog, args.tax_included);
            let bill = tariff::compute_commercial_bill(
                CommercialBillInput {
                    consumption_kwh: args.consumption,
                    demand_peak_kw: args.demand,
                    tax,
                },
                catalog.commercial(&args.tariff)?,
            )?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&bill)?)?;
            } else {
                ui_cli::print_commercial_bill(out, tr, &bill, &tax)?;
            }
        }
        Command::Payback(args) => {
            let request = args.to_request(&session.config.projection)?;
            let report = payback::plan_payback(catalog, request)?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                ui_cli::print_payback(out, tr, &report, args.full)?;
            }
        }
        Command::Catalog => ui_cli::print_catalog(out, tr, catalog)?,
    }
    Ok(())
}
