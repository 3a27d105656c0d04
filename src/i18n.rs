use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const DISCLAIMER: &str = "general.disclaimer";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_RESIDENTIAL: &str = "main_menu.residential";
    pub const MAIN_MENU_COMMERCIAL: &str = "main_menu.commercial";
    pub const MAIN_MENU_PAYBACK: &str = "main_menu.payback";
    pub const MAIN_MENU_CATALOG: &str = "main_menu.catalog";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_SELECT: &str = "prompt.select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const RESIDENTIAL_HEADING: &str = "residential.heading";
    pub const COMMERCIAL_HEADING: &str = "commercial.heading";
    pub const PROMPT_TARIFF: &str = "prompt.tariff";
    pub const PROMPT_CONSUMPTION_BIMONTHLY: &str = "prompt.consumption_bimonthly";
    pub const PROMPT_CONSUMPTION_MONTHLY: &str = "prompt.consumption_monthly";
    pub const PROMPT_DEMAND: &str = "prompt.demand";
    pub const PROMPT_TAX_INCLUDED: &str = "prompt.tax_included";

    pub const BILL_HEADING: &str = "bill.heading";
    pub const BILL_COLUMNS: &str = "bill.columns";
    pub const BILL_SUBTOTAL: &str = "bill.subtotal";
    pub const BILL_TOTAL: &str = "bill.total";
    pub const BILL_ENERGY: &str = "bill.energy";
    pub const BILL_DEMAND: &str = "bill.demand";
    pub const BILL_APPLIED_RATE: &str = "bill.applied_rate";

    pub const PAYBACK_HEADING: &str = "payback.heading";
    pub const PAYBACK_RATE_OPTIONS: &str = "payback.rate_options";
    pub const PROMPT_RATE: &str = "prompt.rate";
    pub const PROMPT_CONSUMPTION_PERIOD: &str = "prompt.consumption_period";
    pub const PROMPT_FINANCED: &str = "prompt.financed";
    pub const PROMPT_SYSTEM_COST: &str = "prompt.system_cost";
    pub const PROMPT_PAYMENT: &str = "prompt.payment";
    pub const PROMPT_TERM: &str = "prompt.term";
    pub const PROMPT_DOWN_PAYMENT: &str = "prompt.down_payment";
    pub const PROMPT_INFLATION: &str = "prompt.inflation";
    pub const RESULT_CROSSOVER: &str = "result.crossover";
    pub const RESULT_NO_CROSSOVER: &str = "result.no_crossover";
    pub const RESULT_YEARS: &str = "result.years";
    pub const RESULT_SIMPLE_PAYBACK: &str = "result.simple_payback";
    pub const RESULT_NPV: &str = "result.npv";
    pub const RESULT_NET_POSITION: &str = "result.net_position";
    pub const RESULT_SERIES_HEADER: &str = "result.series_header";

    pub const CATALOG_HEADING: &str = "catalog.heading";
    pub const CATALOG_RESIDENTIAL: &str = "catalog.residential";
    pub const CATALOG_COMMERCIAL: &str = "catalog.commercial";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Es,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Es
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(es/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 es로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 locales/ 를 찾고, 그래도 없으면 내장 문자열만 쓴다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 → 선택 언어 → 스페인어 순으로 찾는다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.as_str();
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| es(key)),
            Language::Es => es(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "es-mx".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        "es" | "es-mx" => Some("es-mx".into()),
        "en" | "en-us" => Some("en-us".into()),
        other if other.starts_with("es") => Some("es-mx".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "es" => Some("es-mx".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        let map = parse_toml_to_map(&content);
        if map.is_none() {
            tracing::warn!(path = %path.display(), "ignoring unreadable language pack");
        }
        map
    };

    // 전체 코드 (es-mx) 우선, 없으면 기본 코드 (es)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    let (base, _) = lang.split_once(['-', '_'])?;
    try_load(base)
}

pub(crate) fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn es(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Saliendo del simulador.",
        DISCLAIMER => "Estimados con base en las tarifas públicas de CFE. El precio real será el que indique tu recibo.",
        MAIN_MENU_TITLE => "\n=== Simulador de Ahorro Solar (CFE) ===",
        MAIN_MENU_RESIDENTIAL => "1) Recibo residencial",
        MAIN_MENU_COMMERCIAL => "2) Recibo comercial",
        MAIN_MENU_PAYBACK => "3) Retorno de inversión solar",
        MAIN_MENU_CATALOG => "4) Tarifas disponibles",
        MAIN_MENU_SETTINGS => "5) Configuración",
        MAIN_MENU_EXIT => "0) Salir",
        PROMPT_MENU_SELECT => "Selecciona una opción: ",
        PROMPT_SELECT => "Selección: ",
        INVALID_SELECTION_RETRY => "Opción no válida. Intenta de nuevo.",
        ERROR_INVALID_NUMBER => "Ingresa un número.",
        RESIDENTIAL_HEADING => "\n-- Recibo residencial --",
        COMMERCIAL_HEADING => "\n-- Recibo comercial --",
        PROMPT_TARIFF => "Tarifa: ",
        PROMPT_CONSUMPTION_BIMONTHLY => "Consumo bimestral [kWh]: ",
        PROMPT_CONSUMPTION_MONTHLY => "Consumo mensual [kWh]: ",
        PROMPT_DEMAND => "Demanda máxima registrada [kW]: ",
        PROMPT_TAX_INCLUDED => "¿Los precios ya incluyen IVA? (s/n): ",
        BILL_HEADING => "Desglose estilo CFE:",
        BILL_COLUMNS => "Bloque        Consumo (kWh)     Costo (MXN)",
        BILL_SUBTOTAL => "Subtotal (sin IVA):",
        BILL_TOTAL => "Total con IVA:",
        BILL_ENERGY => "Energía:",
        BILL_DEMAND => "Demanda:",
        BILL_APPLIED_RATE => "Precio aplicado [MXN/kWh]:",
        PAYBACK_HEADING => "\n-- Retorno de inversión --",
        PAYBACK_RATE_OPTIONS => "Origen del precio: 1) Tarifa residencial  2) Tarifa comercial  3) Precio fijo",
        PROMPT_RATE => "Precio por kWh [MXN]: ",
        PROMPT_CONSUMPTION_PERIOD => "Consumo por periodo de facturación [kWh]: ",
        PROMPT_FINANCED => "¿Sistema financiado? (s/n): ",
        PROMPT_SYSTEM_COST => "Costo del sistema [MXN]: ",
        PROMPT_PAYMENT => "Pago por periodo [MXN]: ",
        PROMPT_TERM => "Número de pagos: ",
        PROMPT_DOWN_PAYMENT => "Enganche [MXN] (0 si no hay): ",
        PROMPT_INFLATION => "Incremento anual de tarifa (0-1, ej. 0.05): ",
        RESULT_CROSSOVER => "Recuperación de la inversión en el periodo",
        RESULT_NO_CROSSOVER => "La inversión no se recupera dentro del horizonte.",
        RESULT_YEARS => "años",
        RESULT_SIMPLE_PAYBACK => "Retorno simple [años]:",
        RESULT_NPV => "Valor presente neto:",
        RESULT_NET_POSITION => "Balance al final del horizonte:",
        RESULT_SERIES_HEADER => "Periodo   Ahorro acumulado   Costo acumulado",
        CATALOG_HEADING => "\n-- Tarifas --",
        CATALOG_RESIDENTIAL => "Residenciales (límites kWh | precios MXN/kWh):",
        CATALOG_COMMERCIAL => "Comerciales (MXN/kWh | MXN/kW):",
        SETTINGS_HEADING => "\n-- Configuración --",
        SETTINGS_CURRENT => "Idioma / periodo de proyección actual:",
        SETTINGS_OPTIONS => "1) Español  2) English  3) Proyección mensual  4) Proyección anual",
        SETTINGS_PROMPT_CHANGE => "Número a cambiar (Enter para cancelar): ",
        SETTINGS_INVALID => "Entrada no válida; sin cambios.",
        SETTINGS_SAVED => "Configuración actualizada.",
        _ => "[traducción faltante]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting simulator.",
        DISCLAIMER => "Estimates based on published CFE tariffs. Your actual bill is authoritative.",
        MAIN_MENU_TITLE => "\n=== Solar Savings Simulator (CFE) ===",
        MAIN_MENU_RESIDENTIAL => "1) Residential bill",
        MAIN_MENU_COMMERCIAL => "2) Commercial bill",
        MAIN_MENU_PAYBACK => "3) Solar payback",
        MAIN_MENU_CATALOG => "4) Available tariffs",
        MAIN_MENU_SETTINGS => "5) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        PROMPT_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        RESIDENTIAL_HEADING => "\n-- Residential bill --",
        COMMERCIAL_HEADING => "\n-- Commercial bill --",
        PROMPT_TARIFF => "Tariff: ",
        PROMPT_CONSUMPTION_BIMONTHLY => "Bimonthly consumption [kWh]: ",
        PROMPT_CONSUMPTION_MONTHLY => "Monthly consumption [kWh]: ",
        PROMPT_DEMAND => "Peak demand [kW]: ",
        PROMPT_TAX_INCLUDED => "Are prices already tax-inclusive? (y/n): ",
        BILL_HEADING => "CFE-style breakdown:",
        BILL_COLUMNS => "Block         Usage (kWh)       Cost (MXN)",
        BILL_SUBTOTAL => "Subtotal (before tax):",
        BILL_TOTAL => "Total incl. tax:",
        BILL_ENERGY => "Energy:",
        BILL_DEMAND => "Demand:",
        BILL_APPLIED_RATE => "Applied rate [MXN/kWh]:",
        PAYBACK_HEADING => "\n-- Solar payback --",
        PAYBACK_RATE_OPTIONS => "Rate source: 1) Residential tariff  2) Commercial tariff  3) Flat rate",
        PROMPT_RATE => "Price per kWh [MXN]: ",
        PROMPT_CONSUMPTION_PERIOD => "Consumption per billing period [kWh]: ",
        PROMPT_FINANCED => "Is the system financed? (y/n): ",
        PROMPT_SYSTEM_COST => "System cost [MXN]: ",
        PROMPT_PAYMENT => "Payment per period [MXN]: ",
        PROMPT_TERM => "Number of payments: ",
        PROMPT_DOWN_PAYMENT => "Down payment [MXN] (0 if none): ",
        PROMPT_INFLATION => "Annual tariff increase (0-1, e.g. 0.05): ",
        RESULT_CROSSOVER => "Investment recovered in period",
        RESULT_NO_CROSSOVER => "Investment is not recovered within the horizon.",
        RESULT_YEARS => "years",
        RESULT_SIMPLE_PAYBACK => "Simple payback [years]:",
        RESULT_NPV => "Net present value:",
        RESULT_NET_POSITION => "Net position at end of horizon:",
        RESULT_SERIES_HEADER => "Period    Cumulative savings  Cumulative cost",
        CATALOG_HEADING => "\n-- Tariffs --",
        CATALOG_RESIDENTIAL => "Residential (kWh limits | MXN/kWh rates):",
        CATALOG_COMMERCIAL => "Commercial (MXN/kWh | MXN/kW):",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT => "Current language / projection period:",
        SETTINGS_OPTIONS => "1) Español  2) English  3) Monthly projection  4) Annual projection",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; nothing changed.",
        SETTINGS_SAVED => "Settings updated.",
        _ => return None,
    })
}
