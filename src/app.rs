use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::error::CalcError;
use crate::i18n::{self, Translator};
use crate::tariff::{CatalogError, TariffCatalog};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일/콘솔 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// 요금 카탈로그 오류
    #[error("tariff catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// 요금/회수기간 계산 오류
    #[error(transparent)]
    Calc(#[from] CalcError),
    /// JSON 출력 오류
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
    /// 표준 입력이 닫힘
    #[error("input stream closed")]
    InputClosed,
}

/// 한 번 로드되어 모든 요청에 공유되는 실행 컨텍스트.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub config_path: PathBuf,
    pub catalog: TariffCatalog,
    pub tr: Translator,
}

impl Session {
    pub fn new(config: Config, config_path: &Path, catalog: TariffCatalog, tr: Translator) -> Self {
        Self {
            config,
            config_path: config_path.to_path_buf(),
            catalog,
            tr,
        }
    }

    /// 현재 설정의 언어로 번역기를 다시 만든다.
    pub fn reload_translator(&mut self) {
        let code = i18n::resolve_language(&self.config.language, None);
        self.tr = Translator::new_with_pack(&code, self.config.language_pack_dir.as_deref());
    }
}

/// 대화형 메뉴의 메인 루프를 실행한다.
///
/// 계산 오류는 메시지를 출력하고 메뉴로 돌아간다. 입력이 닫히면 정상 종료한다.
/// 그 밖의 입출력/설정 오류는 루프를 끝낸다.
pub fn run(session: &mut Session) -> Result<(), AppError> {
    loop {
        let choice = match ui_cli::main_menu(&session.tr) {
            Err(AppError::InputClosed) => return Ok(()),
            other => other?,
        };
        let outcome = match choice {
            MenuChoice::Residential => ui_cli::handle_residential(session),
            MenuChoice::Commercial => ui_cli::handle_commercial(session),
            MenuChoice::Payback => ui_cli::handle_payback(session),
            MenuChoice::Catalog => {
                ui_cli::print_catalog(&mut std::io::stdout(), &session.tr, &session.catalog)
                    .map_err(AppError::from)
            }
            MenuChoice::Settings => ui_cli::handle_settings(session).and_then(|changed| {
                if changed {
                    session.config.save(&session.config_path)?;
                    session.reload_translator();
                }
                Ok(())
            }),
            MenuChoice::Exit => {
                println!("{}", session.tr.t(i18n::keys::APP_EXIT));
                return Ok(());
            }
        };
        if settle(outcome, &session.tr, &mut std::io::stdout())?.is_break() {
            return Ok(());
        }
    }
}

/// 메뉴 항목 하나의 결과를 정리한다. 계산 오류는 출력 후 계속, 입력 종료는 루프 종료.
fn settle(
    outcome: Result<(), AppError>,
    tr: &Translator,
    out: &mut dyn Write,
) -> Result<ControlFlow<()>, AppError> {
    match outcome {
        Ok(()) => Ok(ControlFlow::Continue(())),
        Err(AppError::Calc(err)) => {
            writeln!(out, "{}: {err}", tr.t(i18n::keys::ERROR_PREFIX))?;
            Ok(ControlFlow::Continue(()))
        }
        Err(AppError::InputClosed) => Ok(ControlFlow::Break(())),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_input_ends_the_loop() {
        let tr = Translator::new("en");
        let mut out = Vec::new();
        let flow = settle(Err(AppError::InputClosed), &tr, &mut out).unwrap();
        assert!(flow.is_break());
        assert!(out.is_empty());
    }

    #[test]
    fn calc_error_is_reported_and_loop_continues() {
        let tr = Translator::new("en");
        let mut out = Vec::new();
        let flow = settle(
            Err(AppError::Calc(CalcError::UnknownTariff("9".into()))),
            &tr,
            &mut out,
        )
        .unwrap();
        assert!(flow.is_continue());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unknown tariff: 9"), "{text}");
    }

    #[test]
    fn io_error_stops_the_loop() {
        let tr = Translator::new("en");
        let err = settle(
            Err(AppError::Io(std::io::Error::other("broken pipe"))),
            &tr,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
