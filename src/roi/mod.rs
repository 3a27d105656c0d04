//! 태양광 설비 회수기간(손익분기) 계산 모듈 모음.

pub mod economics;
pub mod financing;
pub mod projector;

pub use economics::{summarize, FinancialSummary};
pub use financing::{level_payment, FinancingSchedule};
pub use projector::{
    per_period_rate, project, CostBasis, RoiInput, RoiSeries, MAX_HORIZON_PERIODS,
};
