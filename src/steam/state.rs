//! 해석 결과 상태점과 입력 쌍 정의.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::interpolate::lerp;
use super::phase::Phase;
use super::tables::SaturationEntry;

/// 상태를 고정하는 두 독립 물성의 조합.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputPair {
    /// 압력(kPa), 온도(°C)
    PT,
    /// 압력(kPa), 비엔탈피(kJ/kg)
    Ph,
    /// 압력(kPa), 비엔트로피(kJ/kg·K)
    Ps,
    /// 온도(°C), 건도
    Tx,
    /// 압력(kPa), 건도
    Px,
}

impl InputPair {
    /// 첫 번째 입력이 온도인지 여부. 단위 변환 시 사용한다.
    pub fn first_is_temperature(self) -> bool {
        matches!(self, InputPair::Tx)
    }

    /// 두 번째 입력이 온도인지 여부.
    pub fn second_is_temperature(self) -> bool {
        matches!(self, InputPair::PT)
    }
}

impl FromStr for InputPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt" | "tp" => Ok(InputPair::PT),
            "ph" | "hp" => Ok(InputPair::Ph),
            "ps" | "sp" => Ok(InputPair::Ps),
            "tx" | "xt" => Ok(InputPair::Tx),
            "px" | "xp" => Ok(InputPair::Px),
            other => Err(format!("알 수 없는 입력 쌍: {other} (PT, Ph, Ps, Tx, Px)")),
        }
    }
}

impl fmt::Display for InputPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputPair::PT => "PT",
            InputPair::Ph => "Ph",
            InputPair::Ps => "Ps",
            InputPair::Tx => "Tx",
            InputPair::Px => "Px",
        };
        f.write_str(s)
    }
}

/// 상태점의 개별 물성. 퀴즈 채점 키로도 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    Pressure,
    Temperature,
    SpecificVolume,
    Enthalpy,
    Entropy,
    InternalEnergy,
    Quality,
}

impl Property {
    /// 답안 입력에 쓰는 단일 물성(건도 제외) 순서.
    pub const TABULATED: [Property; 6] = [
        Property::Pressure,
        Property::Temperature,
        Property::SpecificVolume,
        Property::Enthalpy,
        Property::Entropy,
        Property::InternalEnergy,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Property::Pressure => "P",
            Property::Temperature => "T",
            Property::SpecificVolume => "v",
            Property::Enthalpy => "h",
            Property::Entropy => "s",
            Property::InternalEnergy => "u",
            Property::Quality => "x",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Property::Pressure => "kPa",
            Property::Temperature => "°C",
            Property::SpecificVolume => "m³/kg",
            Property::Enthalpy | Property::InternalEnergy => "kJ/kg",
            Property::Entropy => "kJ/(kg·K)",
            Property::Quality => "-",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 해석된 상태점. 건도는 2상일 때만 존재한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub temperature_c: f64,
    pub pressure_kpa: f64,
    /// 비체적(m³/kg)
    pub specific_volume: Option<f64>,
    /// 비엔탈피(kJ/kg)
    pub enthalpy: Option<f64>,
    /// 비엔트로피(kJ/kg·K)
    pub entropy: Option<f64>,
    /// 비내부에너지(kJ/kg)
    pub internal_energy: Option<f64>,
    pub quality: Option<f64>,
    pub phase: Phase,
}

impl State {
    /// 단상 상태점. 건도는 비어 있다.
    pub fn single_phase(
        phase: Phase,
        temperature_c: f64,
        pressure_kpa: f64,
        v: f64,
        h: f64,
        s: f64,
        u: f64,
    ) -> Self {
        Self {
            temperature_c,
            pressure_kpa,
            specific_volume: Some(v),
            enthalpy: Some(h),
            entropy: Some(s),
            internal_energy: Some(u),
            quality: None,
            phase,
        }
    }

    /// 포화 물성을 건도로 혼합한 2상 상태점. `prop = prop_f + x·(prop_g − prop_f)`.
    pub fn two_phase(sat: &SaturationEntry, x: f64) -> Self {
        Self {
            temperature_c: sat.temperature_c,
            pressure_kpa: sat.pressure_kpa,
            specific_volume: Some(lerp(sat.v_f, sat.v_g, x)),
            enthalpy: Some(lerp(sat.h_f, sat.h_g, x)),
            entropy: Some(lerp(sat.s_f, sat.s_g, x)),
            internal_energy: Some(lerp(sat.u_f, sat.u_g, x)),
            quality: Some(x),
            phase: Phase::SaturatedTwoPhase,
        }
    }

    /// 파생 물성이 모두 비어 있는 상태점 (초임계, 건도 미지정 등).
    pub fn undetermined(phase: Phase, temperature_c: f64, pressure_kpa: f64) -> Self {
        Self {
            temperature_c,
            pressure_kpa,
            specific_volume: None,
            enthalpy: None,
            entropy: None,
            internal_energy: None,
            quality: None,
            phase,
        }
    }

    pub fn property(&self, property: Property) -> Option<f64> {
        match property {
            Property::Pressure => Some(self.pressure_kpa),
            Property::Temperature => Some(self.temperature_c),
            Property::SpecificVolume => self.specific_volume,
            Property::Enthalpy => self.enthalpy,
            Property::Entropy => self.entropy,
            Property::InternalEnergy => self.internal_energy,
            Property::Quality => self.quality,
        }
    }

    /// 파생 물성이 모두 채워졌는지.
    pub fn is_resolved(&self) -> bool {
        self.specific_volume.is_some()
            && self.enthalpy.is_some()
            && self.entropy.is_some()
            && self.internal_energy.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn input_pair_parses_case_insensitively() {
        assert_eq!("pt".parse::<InputPair>(), Ok(InputPair::PT));
        assert_eq!("Ph".parse::<InputPair>(), Ok(InputPair::Ph));
        assert_eq!("XP".parse::<InputPair>(), Ok(InputPair::Px));
        assert!("pv".parse::<InputPair>().is_err());
    }

    #[test]
    fn two_phase_blend_carries_quality() {
        let sat = SaturationEntry {
            temperature_c: 100.0,
            pressure_kpa: 101.42,
            v_f: 0.001,
            v_g: 1.001,
            h_f: 400.0,
            h_g: 2600.0,
            s_f: 1.0,
            s_g: 7.0,
            u_f: 400.0,
            u_g: 2500.0,
        };
        let state = State::two_phase(&sat, 0.25);
        assert_eq!(state.phase, Phase::SaturatedTwoPhase);
        assert_eq!(state.quality, Some(0.25));
        assert_relative_eq!(state.specific_volume.unwrap(), 0.251, epsilon = 1e-12);
        assert_relative_eq!(state.enthalpy.unwrap(), 950.0, epsilon = 1e-9);
        assert!(state.is_resolved());
    }

    #[test]
    fn undetermined_state_has_no_derived_fields() {
        let state = State::undetermined(Phase::Supercritical, 400.0, 25_000.0);
        assert!(!state.is_resolved());
        assert_eq!(state.property(Property::Pressure), Some(25_000.0));
        assert_eq!(state.property(Property::Quality), None);
    }
}
