//! 표 기반 물/증기 상태 해석 엔진과 증기표 학습 퀴즈.
//!
//! 핵심 계산 로직을 라이브러리로 분리하여 CLI 외의 프런트엔드에서도 같은 엔진을 쓴다.

pub mod app;
pub mod cli;
pub mod config;
pub mod conversion;
pub mod quiz;
pub mod steam;
pub mod ui_cli;
pub mod units;
