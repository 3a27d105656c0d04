use thiserror::Error;

/// 요금/회수기간 계산에서 발생 가능한 오류.
///
/// 계산 함수는 잘못된 입력에 대해 부분 계산을 하지 않고 즉시 오류를 반환한다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// 음수, 비유한값 등 허용 범위를 벗어난 수치 입력
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// 카탈로그에 없는 요금제 식별자
    #[error("unknown tariff: {0}")]
    UnknownTariff(String),
    /// 계산 자체가 정의되지 않는 설정 (예: 설비비 0)
    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(String),
}

impl CalcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CalcError::InvalidInput(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        CalcError::DegenerateConfiguration(msg.into())
    }
}

/// 값이 유한하고 0 이상인지 확인한다.
pub(crate) fn ensure_non_negative(label: &str, value: f64) -> Result<(), CalcError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid(format!(
            "{label} must be a finite value >= 0 (got {value})"
        )));
    }
    Ok(())
}

/// 값이 0~1 사이의 소수(비율)인지 확인한다.
pub(crate) fn ensure_fraction(label: &str, value: f64) -> Result<(), CalcError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(CalcError::invalid(format!(
            "{label} must be a fraction between 0 and 1 (got {value})"
        )));
    }
    Ok(())
}
