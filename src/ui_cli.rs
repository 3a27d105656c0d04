use std::io::{self, Write};

use crate::app::{AppError, Session};
use crate::i18n::{keys, Language, Translator};
use crate::money::format_money;
use crate::payback::{self, Bill, PaybackReport, PaybackRequest, RateSource};
use crate::period::{BillingPeriod, Granularity};
use crate::roi::{CostBasis, FinancingSchedule};
use crate::tariff::{
    self, BillBreakdown, CommercialBill, CommercialBillInput, ResidentialBillInput,
    TariffCatalog, TaxPolicy,
};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Residential,
    Commercial,
    Payback,
    Catalog,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    for key in [
        keys::MAIN_MENU_RESIDENTIAL,
        keys::MAIN_MENU_COMMERCIAL,
        keys::MAIN_MENU_PAYBACK,
        keys::MAIN_MENU_CATALOG,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Residential),
            "2" => return Ok(MenuChoice::Commercial),
            "3" => return Ok(MenuChoice::Payback),
            "4" => return Ok(MenuChoice::Catalog),
            "5" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 주택용 고지서 메뉴를 처리한다.
pub fn handle_residential(session: &Session) -> Result<(), AppError> {
    let tr = &session.tr;
    println!("{}", tr.t(keys::RESIDENTIAL_HEADING));
    let ids: Vec<&str> = session
        .catalog
        .residential_classes()
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    let class = session.catalog.residential(&read_choice(tr, &ids)?)?;
    let consumption_kwh = read_f64(tr, tr.t(keys::PROMPT_CONSUMPTION_BIMONTHLY))?;
    let tax = TaxPolicy::from_catalog(&session.catalog, read_yes_no(tr.t(keys::PROMPT_TAX_INCLUDED))?);
    let bill = tariff::compute_residential_bill(
        ResidentialBillInput {
            consumption_kwh,
            tax,
        },
        class,
    )?;
    print_residential_bill(&mut io::stdout(), tr, &bill, &tax)?;
    Ok(())
}

/// 상업용 고지서 메뉴를 처리한다.
pub fn handle_commercial(session: &Session) -> Result<(), AppError> {
    let tr = &session.tr;
    println!("{}", tr.t(keys::COMMERCIAL_HEADING));
    let ids: Vec<&str> = session
        .catalog
        .commercial_tariffs()
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    let commercial = session.catalog.commercial(&read_choice(tr, &ids)?)?;
    let consumption_kwh = read_f64(tr, tr.t(keys::PROMPT_CONSUMPTION_MONTHLY))?;
    let demand_peak_kw = read_f64(tr, tr.t(keys::PROMPT_DEMAND))?;
    let tax = TaxPolicy::from_catalog(&session.catalog, read_yes_no(tr.t(keys::PROMPT_TAX_INCLUDED))?);
    let bill = tariff::compute_commercial_bill(
        CommercialBillInput {
            consumption_kwh,
            demand_peak_kw,
            tax,
        },
        commercial,
    )?;
    print_commercial_bill(&mut io::stdout(), tr, &bill, &tax)?;
    Ok(())
}

/// 회수기간 메뉴를 처리한다.
pub fn handle_payback(session: &Session) -> Result<(), AppError> {
    let tr = &session.tr;
    let defaults = &session.config.projection;
    println!("{}", tr.t(keys::PAYBACK_HEADING));
    println!("{}", tr.t(keys::PAYBACK_RATE_OPTIONS));
    let rate_source = loop {
        match read_line(tr.t(keys::PROMPT_SELECT))?.trim() {
            "1" => {
                let ids: Vec<&str> = session
                    .catalog
                    .residential_classes()
                    .iter()
                    .map(|t| t.id.as_str())
                    .collect();
                break RateSource::Residential {
                    tariff_id: read_choice(tr, &ids)?,
                };
            }
            "2" => {
                let ids: Vec<&str> = session
                    .catalog
                    .commercial_tariffs()
                    .iter()
                    .map(|t| t.id.as_str())
                    .collect();
                let tariff_id = read_choice(tr, &ids)?;
                let demand_peak_kw = read_f64(tr, tr.t(keys::PROMPT_DEMAND))?;
                break RateSource::Commercial {
                    tariff_id,
                    demand_peak_kw,
                };
            }
            "3" => {
                break RateSource::Flat {
                    rate: read_f64(tr, tr.t(keys::PROMPT_RATE))?,
                }
            }
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    };
    let billing_period = rate_source.default_billing(defaults.billing_period);
    let consumption_prompt = match billing_period {
        BillingPeriod::Bimonthly => keys::PROMPT_CONSUMPTION_BIMONTHLY,
        BillingPeriod::Monthly => keys::PROMPT_CONSUMPTION_MONTHLY,
        BillingPeriod::Annual => keys::PROMPT_CONSUMPTION_PERIOD,
    };
    let consumption_kwh = read_f64(tr, tr.t(consumption_prompt))?;
    let tax_included = match tax_prompt(&rate_source) {
        Some(key) => read_yes_no(tr.t(key))?,
        None => false,
    };
    let cost = if read_yes_no(tr.t(keys::PROMPT_FINANCED))? {
        let payment = read_f64(tr, tr.t(keys::PROMPT_PAYMENT))?;
        let term = read_u32(tr, tr.t(keys::PROMPT_TERM))?;
        let down = read_f64(tr, tr.t(keys::PROMPT_DOWN_PAYMENT))?;
        CostBasis::Financing(FinancingSchedule::new(payment, term).with_down_payment(down))
    } else {
        CostBasis::SystemCost(read_f64(tr, tr.t(keys::PROMPT_SYSTEM_COST))?)
    };
    let annual_inflation = read_f64(tr, tr.t(keys::PROMPT_INFLATION))?;

    let report = payback::plan_payback(
        &session.catalog,
        PaybackRequest {
            consumption_kwh,
            billing_period,
            rate_source,
            tax_included,
            cost,
            granularity: defaults.granularity,
            horizon_years: defaults.horizon_years,
            annual_inflation,
            annual_discount_rate: defaults.discount_rate,
        },
    )?;
    print_payback(&mut io::stdout(), tr, &report, false)?;
    Ok(())
}

/// 고지서를 계산하는 단가 원천이면 IVA 포함 여부를 묻는다. 직접 입력 단가는 그대로 쓴다.
fn tax_prompt(rate_source: &RateSource) -> Option<&'static str> {
    match rate_source {
        RateSource::Flat { .. } => None,
        _ => Some(keys::PROMPT_TAX_INCLUDED),
    }
}

/// 설정 메뉴를 처리한다. 변경 여부를 반환한다.
pub fn handle_settings(session: &mut Session) -> Result<bool, AppError> {
    let tr = &session.tr;
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{} {} / {:?}",
        tr.t(keys::SETTINGS_CURRENT),
        tr.language_code(),
        session.config.projection.granularity
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    let cfg = &mut session.config;
    match sel.trim() {
        "" => return Ok(false),
        "1" => cfg.language = Language::Es.as_code().to_string(),
        "2" => cfg.language = Language::En.as_code().to_string(),
        "3" => cfg.projection.granularity = Granularity::Monthly,
        "4" => cfg.projection.granularity = Granularity::Annual,
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(false);
        }
    }
    println!("{}", tr.t(keys::SETTINGS_SAVED));
    Ok(true)
}

/// 주택용 고지서를 CFE 고지서 형식으로 출력한다.
pub fn print_residential_bill(
    out: &mut dyn Write,
    tr: &Translator,
    bill: &BillBreakdown,
    tax: &TaxPolicy,
) -> io::Result<()> {
    writeln!(out, "{} [{}]", tr.t(keys::BILL_HEADING), bill.tariff_id)?;
    writeln!(out, "{}", tr.t(keys::BILL_COLUMNS))?;
    for (block, kwh, cost) in bill.rows() {
        writeln!(out, "{:<13} {:>13} {:>15}", block.label(), kwh, format_money(cost))?;
    }
    print_totals(out, tr, bill.subtotal, bill.total, tax)?;
    if let Some(rate) = bill.applied_rate() {
        writeln!(out, "{} {:.3}", tr.t(keys::BILL_APPLIED_RATE), rate)?;
    }
    writeln!(out, "{}", tr.t(keys::DISCLAIMER))
}

/// 상업용 고지서를 출력한다.
pub fn print_commercial_bill(
    out: &mut dyn Write,
    tr: &Translator,
    bill: &CommercialBill,
    tax: &TaxPolicy,
) -> io::Result<()> {
    writeln!(out, "{} [{}]", tr.t(keys::BILL_HEADING), bill.tariff_id)?;
    writeln!(
        out,
        "{} {} kWh = {}",
        tr.t(keys::BILL_ENERGY),
        bill.consumption_kwh,
        format_money(bill.energy_cost)
    )?;
    writeln!(
        out,
        "{} {} kW = {}",
        tr.t(keys::BILL_DEMAND),
        bill.demand_peak_kw,
        format_money(bill.demand_cost)
    )?;
    print_totals(out, tr, bill.subtotal, bill.total, tax)?;
    writeln!(out, "{}", tr.t(keys::DISCLAIMER))
}

fn print_totals(
    out: &mut dyn Write,
    tr: &Translator,
    subtotal: f64,
    total: f64,
    tax: &TaxPolicy,
) -> io::Result<()> {
    writeln!(out, "{} {}", tr.t(keys::BILL_SUBTOTAL), format_money(subtotal))?;
    if tax.already_included {
        writeln!(out, "{} {}", tr.t(keys::BILL_TOTAL), format_money(total))
    } else {
        writeln!(
            out,
            "{} ({:.0}%) {}",
            tr.t(keys::BILL_TOTAL),
            tax.rate * 100.0,
            format_money(total)
        )
    }
}

/// 회수기간 결과를 출력한다. `full_series`가 false면 연 단위로 추려서 보여준다.
pub fn print_payback(
    out: &mut dyn Write,
    tr: &Translator,
    report: &PaybackReport,
    full_series: bool,
) -> io::Result<()> {
    match &report.bill {
        Some(Bill::Residential(bill)) => print_residential_bill(out, tr, bill, &report.tax)?,
        Some(Bill::Commercial(bill)) => print_commercial_bill(out, tr, bill, &report.tax)?,
        None => {}
    }
    writeln!(out, "{} {:.3}", tr.t(keys::BILL_APPLIED_RATE), report.applied_rate)?;

    let series = &report.series;
    match (series.crossover_period, series.crossover_years()) {
        (Some(period), Some(years)) => writeln!(
            out,
            "{} {period} ({years:.1} {})",
            tr.t(keys::RESULT_CROSSOVER),
            tr.t(keys::RESULT_YEARS)
        )?,
        _ => writeln!(out, "{}", tr.t(keys::RESULT_NO_CROSSOVER))?,
    }
    if let Some(years) = report.summary.simple_payback_years {
        writeln!(out, "{} {:.2}", tr.t(keys::RESULT_SIMPLE_PAYBACK), years)?;
    }
    writeln!(out, "{} {}", tr.t(keys::RESULT_NPV), format_money(report.summary.npv))?;
    writeln!(
        out,
        "{} {}",
        tr.t(keys::RESULT_NET_POSITION),
        format_money(report.summary.net_position)
    )?;

    writeln!(out, "{}", tr.t(keys::RESULT_SERIES_HEADER))?;
    let step = if full_series {
        1
    } else {
        series.periods_per_year.max(1)
    };
    for (period, saved) in series.points() {
        if period % step != 0 && Some(period) != series.crossover_period {
            continue;
        }
        let cost = series.cost_at(period).unwrap_or(0.0);
        writeln!(
            out,
            "{:>6}   {:>18}   {:>15}",
            period,
            format_money(saved),
            format_money(cost)
        )?;
    }
    Ok(())
}

/// 로드된 요금 카탈로그를 출력한다.
pub fn print_catalog(out: &mut dyn Write, tr: &Translator, catalog: &TariffCatalog) -> io::Result<()> {
    writeln!(out, "{}", tr.t(keys::CATALOG_HEADING))?;
    writeln!(out, "{}", tr.t(keys::CATALOG_RESIDENTIAL))?;
    for class in catalog.residential_classes() {
        let (basic, intermediate) = class.limits();
        let [r1, r2, r3] = class.rates();
        writeln!(
            out,
            "  {:<4} {:>6} / {:<6} | {:.3} / {:.3} / {:.3}",
            class.id, basic, intermediate, r1, r2, r3
        )?;
    }
    writeln!(out, "{}", tr.t(keys::CATALOG_COMMERCIAL))?;
    for tariff in catalog.commercial_tariffs() {
        writeln!(
            out,
            "  {:<6} {:.2} | {:.2}",
            tariff.id, tariff.energy_rate, tariff.demand_rate
        )?;
    }
    writeln!(out, "IVA: {:.0}%", catalog.tax_rate() * 100.0)
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::InputClosed);
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_u32(tr: &Translator, prompt: &str) -> Result<u32, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_yes_no(prompt: &str) -> Result<bool, AppError> {
    let s = read_line(prompt)?;
    Ok(matches!(
        s.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    ))
}

fn read_choice(tr: &Translator, options: &[&str]) -> Result<String, AppError> {
    println!("[{}]", options.join(", "));
    let s = read_line(tr.t(keys::PROMPT_TARIFF))?;
    Ok(s.trim().to_string())
}
