//! 표시용 금액 처리. 계산 중에는 반올림하지 않는다.

/// 소수점 둘째 자리로 반올림한다.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `$1,234.56` 형식으로 표시한다.
pub fn format_money(value: f64) -> String {
    let rounded = round_currency(value);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let cents = (rounded.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}
