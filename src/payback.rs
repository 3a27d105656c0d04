//! 요금 계산과 회수기간 계산을 하나의 요청/응답으로 묶는다.
//!
//! 청구 기간(격월/월/연) 사용량을 요금표 기준 기간과 계산 기간(월/연) 단위로 환산하는 일은
//! 여기서만 한다. 주택용 요금표 경계값은 격월, 상업용 요금표는 월 기준이다.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_fraction, ensure_non_negative, CalcError};
use crate::period::{rebill_consumption, rescale_consumption, BillingPeriod, Granularity};
use crate::roi::{self, CostBasis, FinancialSummary, RoiInput, RoiSeries};
use crate::tariff::{
    self, BillBreakdown, CommercialBill, CommercialBillInput, ResidentialBillInput,
    TariffCatalog, TaxPolicy,
};

/// 기본 계산 기간 [년].
pub const DEFAULT_HORIZON_YEARS: u32 = 25;
/// 최대 계산 기간 [년].
pub const MAX_HORIZON_YEARS: u32 = 100;

/// 절감 단가를 어디서 가져올지 정한다.
#[derive(Debug, Clone, PartialEq)]
pub enum RateSource {
    /// 주택용 누진 요금제. 고지서 합계 / 사용량을 적용 단가로 쓴다.
    Residential { tariff_id: String },
    /// 상업용 요금제. 세금을 적용한 에너지 단가를 쓴다 (최대수요 요금은 절감 대상이 아님).
    Commercial {
        tariff_id: String,
        demand_peak_kw: f64,
    },
    /// 사용자가 직접 입력한 단가 [통화/kWh]
    Flat { rate: f64 },
}

impl RateSource {
    /// 요금표가 기준으로 삼는 청구 기간. 직접 입력 단가는 기준이 없다.
    pub fn tariff_billing(&self) -> Option<BillingPeriod> {
        match self {
            RateSource::Residential { .. } => Some(BillingPeriod::Bimonthly),
            RateSource::Commercial { .. } => Some(BillingPeriod::Monthly),
            RateSource::Flat { .. } => None,
        }
    }

    /// 사용자가 청구 기간을 지정하지 않았을 때 쓸 기간.
    ///
    /// 상업용 고지서는 월 단위로만 나오므로 설정값 대신 월을 쓴다.
    pub fn default_billing(&self, configured: BillingPeriod) -> BillingPeriod {
        match self {
            RateSource::Commercial { .. } => BillingPeriod::Monthly,
            _ => configured,
        }
    }
}

/// 회수기간 계획 요청.
#[derive(Debug, Clone)]
pub struct PaybackRequest {
    /// 청구 기간당 사용량 [kWh]
    pub consumption_kwh: f64,
    pub billing_period: BillingPeriod,
    pub rate_source: RateSource,
    pub tax_included: bool,
    pub cost: CostBasis,
    pub granularity: Granularity,
    pub horizon_years: u32,
    /// 연 요금 상승률(소수, 0~1)
    pub annual_inflation: f64,
    /// 연 할인율(소수, 0~1). NPV 계산용.
    pub annual_discount_rate: f64,
}

/// 요청에 사용된 고지서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bill {
    Residential(BillBreakdown),
    Commercial(CommercialBill),
}

/// 회수기간 계획 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackReport {
    pub bill: Option<Bill>,
    /// 고지서에 적용한 세금 정책
    pub tax: TaxPolicy,
    /// 절감 계산에 쓴 단가 [통화/kWh]
    pub applied_rate: f64,
    /// 계산 기간당 사용량 [kWh]
    pub periodic_consumption_kwh: f64,
    pub granularity: Granularity,
    pub series: RoiSeries,
    pub summary: FinancialSummary,
}

/// 고지서를 계산하고 적용 단가를 구한 뒤 회수기간 시계열을 만든다.
pub fn plan_payback(
    catalog: &TariffCatalog,
    request: PaybackRequest,
) -> Result<PaybackReport, CalcError> {
    ensure_non_negative("consumption", request.consumption_kwh)?;
    ensure_fraction("inflation rate", request.annual_inflation)?;
    ensure_fraction("discount rate", request.annual_discount_rate)?;
    if request.horizon_years == 0 {
        return Err(CalcError::degenerate("horizon must be at least one year"));
    }
    if request.horizon_years > MAX_HORIZON_YEARS {
        return Err(CalcError::invalid(format!(
            "horizon must not exceed {MAX_HORIZON_YEARS} years (got {})",
            request.horizon_years
        )));
    }
    // 고지서는 요금표 기준 기간으로 환산한 사용량으로 계산한다
    let bill_consumption_kwh = request
        .rate_source
        .tariff_billing()
        .map(|to| rebill_consumption(request.consumption_kwh, request.billing_period, to))
        .unwrap_or(request.consumption_kwh);
    let tax = TaxPolicy::from_catalog(catalog, request.tax_included);

    let (bill, applied_rate) = match &request.rate_source {
        RateSource::Residential { tariff_id } => {
            let class = catalog.residential(tariff_id)?;
            let bill = tariff::compute_residential_bill(
                ResidentialBillInput {
                    consumption_kwh: bill_consumption_kwh,
                    tax,
                },
                class,
            )?;
            let rate = bill.applied_rate().unwrap_or(0.0);
            (Some(Bill::Residential(bill)), rate)
        }
        RateSource::Commercial {
            tariff_id,
            demand_peak_kw,
        } => {
            let commercial = catalog.commercial(tariff_id)?;
            let bill = tariff::compute_commercial_bill(
                CommercialBillInput {
                    consumption_kwh: bill_consumption_kwh,
                    demand_peak_kw: *demand_peak_kw,
                    tax,
                },
                commercial,
            )?;
            (
                Some(Bill::Commercial(bill)),
                tax.apply(commercial.energy_rate),
            )
        }
        RateSource::Flat { rate } => {
            ensure_non_negative("rate", *rate)?;
            (None, *rate)
        }
    };

    let periods_per_year = request.granularity.periods_per_year();
    let horizon_periods = request.horizon_years * periods_per_year;
    let periodic_consumption_kwh = rescale_consumption(
        request.consumption_kwh,
        request.billing_period,
        request.granularity,
    );
    let inflation_rate = roi::per_period_rate(request.annual_inflation, periods_per_year)?;
    let discount_rate = roi::per_period_rate(request.annual_discount_rate, periods_per_year)?;

    let series = roi::project(RoiInput {
        periodic_consumption_kwh,
        applied_rate,
        cost: request.cost,
        horizon_periods,
        periods_per_year,
        inflation_rate,
    })?;
    let summary = roi::summarize(&series, discount_rate)?;

    tracing::debug!(
        applied_rate,
        periodic_consumption_kwh,
        crossover = ?series.crossover_period,
        "payback plan computed"
    );

    Ok(PaybackReport {
        bill,
        tax,
        applied_rate,
        periodic_consumption_kwh,
        granularity: request.granularity,
        series,
        summary,
    })
}
