//! 주택용/상업용 요금 계산 회귀 테스트. CFE 고지서 예시 값을 활용한다.
use pretty_assertions::assert_eq;
use solar_payback_toolbox::tariff::{
    compute_commercial_bill, compute_residential_bill, BillBreakdown, CatalogError, CommercialBillInput,
    CommercialTariff, ResidentialBillInput, TariffCatalog, TariffClass, TaxPolicy,
};
use solar_payback_toolbox::CalcError;

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

fn residential(consumption_kwh: f64, tariff: &str) -> Result<BillBreakdown, CalcError> {
    let catalog = TariffCatalog::cfe();
    compute_residential_bill(
        ResidentialBillInput {
            consumption_kwh,
            tax: TaxPolicy::from_catalog(&catalog, false),
        },
        catalog.residential(tariff)?,
    )
}

#[test]
fn tariff_1_at_200_kwh_matches_cfe_breakdown() {
    let bill = residential(200.0, "1").expect("bill");
    assert_eq!(bill.block_consumption_kwh, [150.0, 50.0, 0.0]);
    assert_close("basic cost", bill.block_cost[0], 118.95, 1e-9);
    assert_close("intermediate cost", bill.block_cost[1], 47.80, 1e-9);
    assert_eq!(bill.block_cost[2], 0.0);
    assert_close("subtotal", bill.subtotal, 166.75, 1e-9);
    assert_close("total", bill.total, 193.43, 1e-9);
}

#[test]
fn excess_block_uses_absolute_intermediate_ceiling() {
    let bill = residential(300.0, "1").expect("bill");
    assert_eq!(bill.block_consumption_kwh, [150.0, 130.0, 20.0]);
    let expected = 150.0 * 0.793 + 130.0 * 0.956 + 20.0 * 3.367;
    assert_close("subtotal", bill.subtotal, expected, 1e-12);
}

#[test]
fn zero_consumption_is_an_empty_bill() {
    let bill = residential(0.0, "1C").expect("bill");
    assert_eq!(bill.block_consumption_kwh, [0.0; 3]);
    assert_eq!(bill.block_cost, [0.0; 3]);
    assert_eq!(bill.subtotal, 0.0);
    assert_eq!(bill.total, 0.0);
    assert_eq!(bill.applied_rate(), None);
}

#[test]
fn negative_consumption_is_rejected() {
    let err = residential(-1.0, "1").unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput(_)), "{err:?}");
    let err = residential(f64::NAN, "1").unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput(_)), "{err:?}");
}

#[test]
fn unknown_tariff_is_rejected() {
    let err = residential(100.0, "9Z").unwrap_err();
    assert_eq!(err, CalcError::UnknownTariff("9Z".to_string()));
}

#[test]
fn tariff_lookup_ignores_case() {
    let catalog = TariffCatalog::cfe();
    assert_eq!(catalog.residential("1a").expect("1A").id, "1A");
    assert_eq!(catalog.commercial("gdmto").expect("GDMTO").id, "GDMTO");
}

#[test]
fn tax_already_included_leaves_total_at_subtotal() {
    let catalog = TariffCatalog::cfe();
    let bill = compute_residential_bill(
        ResidentialBillInput {
            consumption_kwh: 200.0,
            tax: TaxPolicy::from_catalog(&catalog, true),
        },
        catalog.residential("1").unwrap(),
    )
    .unwrap();
    assert_eq!(bill.total, bill.subtotal);
}

#[test]
fn commercial_bill_adds_energy_and_demand() {
    let tariff = CommercialTariff::new("TEST", 4.0, 150.0).unwrap();
    let bill = compute_commercial_bill(
        CommercialBillInput {
            consumption_kwh: 1000.0,
            demand_peak_kw: 20.0,
            tax: TaxPolicy::default(),
        },
        &tariff,
    )
    .unwrap();
    assert_close("energy", bill.energy_cost, 4000.0, 1e-12);
    assert_close("demand", bill.demand_cost, 3000.0, 1e-12);
    assert_close("subtotal", bill.subtotal, 7000.0, 1e-12);
    assert_close("total", bill.total, 8120.0, 1e-12);
}

#[test]
fn commercial_negative_demand_is_rejected() {
    let catalog = TariffCatalog::cfe();
    let err = compute_commercial_bill(
        CommercialBillInput {
            consumption_kwh: 1000.0,
            demand_peak_kw: -5.0,
            tax: TaxPolicy::default(),
        },
        catalog.commercial("PDBT").unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput(_)));
}

#[test]
fn negative_tax_rate_is_rejected() {
    let catalog = TariffCatalog::cfe();
    let err = compute_residential_bill(
        ResidentialBillInput {
            consumption_kwh: 10.0,
            tax: TaxPolicy::new(-0.1, false),
        },
        catalog.residential("1").unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput(_)));
}

#[test]
fn shipped_catalog_file_matches_built_in() {
    let from_file = TariffCatalog::from_toml_str(include_str!("../tariffs/cfe.toml"))
        .expect("tariffs/cfe.toml parses");
    assert_eq!(from_file, TariffCatalog::cfe());
    assert_eq!(from_file.residential_classes().len(), 7);
    assert_eq!(from_file.commercial_tariffs().len(), 3);
}

#[test]
fn catalog_rejects_regressive_rates() {
    let err = TariffClass::new("X", (100.0, 200.0), (1.0, 0.5, 2.0)).unwrap_err();
    assert!(matches!(err, CatalogError::Invalid { .. }), "{err}");
}

#[test]
fn catalog_rejects_inverted_limits() {
    let src = r#"
        [[residential]]
        id = "X"
        basic_limit_kwh = 300.0
        intermediate_limit_kwh = 200.0
        basic_rate = 1.0
        intermediate_rate = 1.0
        excess_rate = 1.0
    "#;
    let err = TariffCatalog::from_toml_str(src).unwrap_err();
    assert!(matches!(err, CatalogError::Invalid { .. }), "{err}");
}

#[test]
fn catalog_rejects_duplicate_ids() {
    let class = TariffClass::new("1", (150.0, 280.0), (0.793, 0.956, 3.367)).unwrap();
    let err = TariffCatalog::new(0.16, vec![class.clone(), class], vec![]).unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(_)), "{err}");
}

#[test]
fn catalog_defaults_tax_rate_when_omitted() {
    let src = r#"
        [[commercial]]
        id = "PDBT"
        energy_rate = 4.0
        demand_rate = 150.0
    "#;
    let catalog = TariffCatalog::from_toml_str(src).unwrap();
    assert_eq!(catalog.tax_rate(), 0.16);
    assert!(catalog.residential_classes().is_empty());
}
