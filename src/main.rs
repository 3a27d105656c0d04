use std::process::ExitCode;

use clap::Parser;
use solar_payback_toolbox::{
    app::{self, AppError, Session},
    cli::Cli,
    config, i18n,
};
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 설정과 요금표를 로드한 뒤 하위 명령이나 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    let catalog = cfg.load_catalog(cli.tariffs.as_deref())?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    tracing::debug!(lang = %lang, "session ready");

    let mut session = Session::new(cfg, &cli.config, catalog, tr);
    match &cli.command {
        Some(command) => {
            solar_payback_toolbox::cli::run_command(&session, command, &mut std::io::stdout())
        }
        None => app::run(&mut session),
    }
}
