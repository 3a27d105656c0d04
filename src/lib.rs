//! 핵심 계산 로직(누진 요금, 회수기간)을 라이브러리로 분리하여 CLI 외의 화면 계층에서도 쓸 수 있게 한다.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod money;
pub mod payback;
pub mod period;
pub mod roi;
pub mod tariff;
pub mod ui_cli;

pub use error::CalcError;
