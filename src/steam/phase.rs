//! 압력·온도로부터 상(phase) 영역을 판정한다.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::interpolate::interpolate;
use super::tables::SaturationTable;

/// 임계 온도(°C)
pub const CRITICAL_TEMPERATURE_C: f64 = 373.946;
/// 임계 압력(kPa)
pub const CRITICAL_PRESSURE_KPA: f64 = 22_064.0;
/// 포화온도와의 차이가 이 값(°C) 미만이면 2상으로 본다. 기존 표 해상도와의 호환을 위해 고정.
pub const SATURATION_BAND_C: f64 = 0.1;

/// 상태점의 상 영역.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    SubcooledLiquid,
    SaturatedTwoPhase,
    SuperheatedVapor,
    Supercritical,
    Unknown,
    /// P·T만으로는 건도가 정해지지 않는 포화 상태. 건도 입력이 추가로 필요하다.
    NeedsQuality,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::SubcooledLiquid => "Subcooled Liquid",
            Phase::SaturatedTwoPhase => "Saturated (Two-Phase)",
            Phase::SuperheatedVapor => "Superheated Vapor",
            Phase::Supercritical => "Supercritical",
            Phase::Unknown => "Unknown",
            Phase::NeedsQuality => "Saturated - specify quality",
        }
    }

    /// 출력 강조용 짧은 태그.
    pub fn tag(self) -> &'static str {
        match self {
            Phase::SubcooledLiquid => "liquid",
            Phase::SaturatedTwoPhase | Phase::NeedsQuality => "twophase",
            Phase::SuperheatedVapor => "vapor",
            Phase::Supercritical => "supercritical",
            Phase::Unknown => "unknown",
        }
    }

    /// 퀴즈 답안 등 사용자 입력 문자열을 해석한다.
    pub fn parse(input: &str) -> Option<Phase> {
        match input.trim().to_lowercase().as_str() {
            "subcooled" | "subcooled liquid" | "liquid" | "compressed" | "l" => {
                Some(Phase::SubcooledLiquid)
            }
            "saturated" | "two-phase" | "twophase" | "mixture" | "sat" => {
                Some(Phase::SaturatedTwoPhase)
            }
            "superheated" | "superheated vapor" | "vapor" | "sh" => Some(Phase::SuperheatedVapor),
            "supercritical" => Some(Phase::Supercritical),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 압력에서의 포화온도(°C). 포화표 압력 범위 밖이면 `None`.
pub fn saturation_temperature(table: &SaturationTable, pressure_kpa: f64) -> Option<f64> {
    interpolate(table.by_pressure(), pressure_kpa, |e| e.pressure_kpa).map(|e| e.temperature_c)
}

/// 압력(kPa)과 온도(°C)로 상을 판정한다. 먼저 일치하는 규칙이 이긴다.
pub fn classify(table: &SaturationTable, pressure_kpa: f64, temperature_c: f64) -> Phase {
    if pressure_kpa >= CRITICAL_PRESSURE_KPA && temperature_c >= CRITICAL_TEMPERATURE_C {
        return Phase::Supercritical;
    }
    let Some(t_sat) = saturation_temperature(table, pressure_kpa) else {
        return Phase::Unknown;
    };
    if (temperature_c - t_sat).abs() < SATURATION_BAND_C {
        Phase::SaturatedTwoPhase
    } else if temperature_c < t_sat {
        Phase::SubcooledLiquid
    } else {
        Phase::SuperheatedVapor
    }
}
