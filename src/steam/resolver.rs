//! 두 독립 물성으로부터 상태점을 해석하는 다섯 가지 전략.
//!
//! 단상 영역은 포화값에서 닫힌 근사식으로 외삽한다. 비열 상수(2.0, 1.5, 4.2)는 포화선
//! 근처의 좁은 범위에서만 타당한 근사이며, 기존 표와의 출력 호환을 위해 그대로 유지한다.

use thiserror::Error;
use tracing::debug;

use super::interpolate::{fraction, interpolate};
use super::phase::{classify, Phase};
use super::state::{InputPair, State};
use super::tables::{SaturationEntry, SaturationTable};
use super::KELVIN_OFFSET;

/// 과열 증기 정압비열 근사(kJ/kg·K)
pub const CP_VAPOR: f64 = 2.0;
/// 과열 증기 내부에너지 증가율 근사(kJ/kg·K)
pub const CV_VAPOR: f64 = 1.5;
/// 압축수 비열 근사(kJ/kg·K)
pub const CP_LIQUID: f64 = 4.2;

/// 상태 해석 시 발생 가능한 오류.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ResolveError {
    /// 포화표 범위 밖의 조회
    #[error("{what} {value} 은(는) 포화표 범위 밖입니다")]
    OutOfRange { what: &'static str, value: f64 },
    /// 건도는 0~1 사이여야 한다
    #[error("건도 {0} 은(는) 0~1 범위가 아닙니다")]
    InvalidQuality(f64),
    /// NaN/무한대 입력
    #[error("유한하지 않은 입력값입니다")]
    NonFinite,
}

/// 압력 기준 포화 물성. 반환값의 압력은 조회 압력과 정확히 같다.
pub fn saturation_by_pressure(table: &SaturationTable, pressure_kpa: f64) -> Option<SaturationEntry> {
    let mut entry = interpolate(table.by_pressure(), pressure_kpa, |e| e.pressure_kpa)?;
    entry.pressure_kpa = pressure_kpa;
    Some(entry)
}

/// 온도 기준 포화 물성. 반환값의 온도는 조회 온도와 정확히 같다.
pub fn saturation_by_temperature(
    table: &SaturationTable,
    temperature_c: f64,
) -> Option<SaturationEntry> {
    let mut entry = interpolate(table.by_temperature(), temperature_c, |e| e.temperature_c)?;
    entry.temperature_c = temperature_c;
    Some(entry)
}

fn sat_at_pressure(table: &SaturationTable, pressure_kpa: f64) -> Result<SaturationEntry, ResolveError> {
    saturation_by_pressure(table, pressure_kpa).ok_or_else(|| {
        debug!(pressure_kpa, "saturation lookup by pressure out of range");
        ResolveError::OutOfRange {
            what: "pressure (kPa)",
            value: pressure_kpa,
        }
    })
}

fn sat_at_temperature(
    table: &SaturationTable,
    temperature_c: f64,
) -> Result<SaturationEntry, ResolveError> {
    saturation_by_temperature(table, temperature_c).ok_or_else(|| {
        debug!(temperature_c, "saturation lookup by temperature out of range");
        ResolveError::OutOfRange {
            what: "temperature (°C)",
            value: temperature_c,
        }
    })
}

/// 입력 쌍에 맞는 전략으로 상태점을 해석한다.
pub fn resolve(
    table: &SaturationTable,
    pair: InputPair,
    value1: f64,
    value2: f64,
) -> Result<State, ResolveError> {
    if !value1.is_finite() || !value2.is_finite() {
        return Err(ResolveError::NonFinite);
    }
    match pair {
        InputPair::PT => resolve_pt(table, value1, value2),
        InputPair::Ph => resolve_ph(table, value1, value2),
        InputPair::Ps => resolve_ps(table, value1, value2),
        InputPair::Tx => resolve_tx(table, value1, value2),
        InputPair::Px => resolve_px(table, value1, value2),
    }
}

/// 압력·온도. 2상이면 건도를 알 수 없으므로 [`Phase::NeedsQuality`]로 돌려준다.
pub fn resolve_pt(
    table: &SaturationTable,
    pressure_kpa: f64,
    temperature_c: f64,
) -> Result<State, ResolveError> {
    // 포화표가 압력을 덮지 못하면 초임계 여부와 무관하게 실패한다
    let sat = sat_at_pressure(table, pressure_kpa)?;
    let phase = classify(table, pressure_kpa, temperature_c);

    let state = match phase {
        Phase::SubcooledLiquid => State::single_phase(
            phase,
            temperature_c,
            pressure_kpa,
            sat.v_f,
            sat.h_f,
            sat.s_f,
            sat.u_f,
        ),
        Phase::SuperheatedVapor => {
            let t_abs = temperature_c + KELVIN_OFFSET;
            let t_sat_abs = sat.temperature_k();
            let superheat = temperature_c - sat.temperature_c;
            State::single_phase(
                phase,
                temperature_c,
                pressure_kpa,
                sat.v_g * t_abs / t_sat_abs,
                sat.h_g + CP_VAPOR * superheat,
                sat.s_g + CP_VAPOR * (t_abs / t_sat_abs).ln(),
                sat.u_g + CV_VAPOR * superheat,
            )
        }
        Phase::SaturatedTwoPhase | Phase::NeedsQuality => {
            State::undetermined(Phase::NeedsQuality, temperature_c, pressure_kpa)
        }
        Phase::Supercritical | Phase::Unknown => {
            State::undetermined(phase, temperature_c, pressure_kpa)
        }
    };
    Ok(state)
}

fn check_quality(x: f64) -> Result<f64, ResolveError> {
    if (0.0..=1.0).contains(&x) {
        Ok(x)
    } else {
        Err(ResolveError::InvalidQuality(x))
    }
}

/// 온도·건도.
pub fn resolve_tx(table: &SaturationTable, temperature_c: f64, x: f64) -> Result<State, ResolveError> {
    let x = check_quality(x)?;
    let sat = sat_at_temperature(table, temperature_c)?;
    Ok(State::two_phase(&sat, x))
}

/// 압력·건도.
pub fn resolve_px(table: &SaturationTable, pressure_kpa: f64, x: f64) -> Result<State, ResolveError> {
    let x = check_quality(x)?;
    let sat = sat_at_pressure(table, pressure_kpa)?;
    Ok(State::two_phase(&sat, x))
}

/// 압력·비엔탈피.
pub fn resolve_ph(table: &SaturationTable, pressure_kpa: f64, h: f64) -> Result<State, ResolveError> {
    let sat = sat_at_pressure(table, pressure_kpa)?;

    if h < sat.h_f {
        Ok(State::single_phase(
            Phase::SubcooledLiquid,
            sat.temperature_c - (sat.h_f - h) / CP_LIQUID,
            pressure_kpa,
            sat.v_f,
            h,
            sat.s_f,
            h - pressure_kpa * sat.v_f,
        ))
    } else if h > sat.h_g {
        let superheat = (h - sat.h_g) / CP_VAPOR;
        let ratio = 1.0 + superheat / sat.temperature_k();
        Ok(State::single_phase(
            Phase::SuperheatedVapor,
            sat.temperature_c + superheat,
            pressure_kpa,
            sat.v_g * ratio,
            h,
            sat.s_g + CP_VAPOR * ratio.ln(),
            h - pressure_kpa * sat.v_g,
        ))
    } else {
        let x = fraction(sat.h_f, sat.h_g, h);
        Ok(State::two_phase(&sat, x))
    }
}

/// 압력·비엔트로피. 압축수 쪽은 엔트로피만으로 온도가 움직이지 않는다고 보고 포화온도를 유지한다.
pub fn resolve_ps(table: &SaturationTable, pressure_kpa: f64, s: f64) -> Result<State, ResolveError> {
    let sat = sat_at_pressure(table, pressure_kpa)?;

    if s < sat.s_f {
        Ok(State::single_phase(
            Phase::SubcooledLiquid,
            sat.temperature_c,
            pressure_kpa,
            sat.v_f,
            sat.h_f,
            s,
            sat.u_f,
        ))
    } else if s > sat.s_g {
        let ds = s - sat.s_g;
        let superheat = ds * sat.temperature_k() / CP_VAPOR;
        Ok(State::single_phase(
            Phase::SuperheatedVapor,
            sat.temperature_c + superheat,
            pressure_kpa,
            sat.v_g * (ds / CP_VAPOR).exp(),
            sat.h_g + CP_VAPOR * superheat,
            s,
            sat.u_g + CV_VAPOR * superheat,
        ))
    } else {
        let x = fraction(sat.s_f, sat.s_g, s);
        Ok(State::two_phase(&sat, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::steam::phase::{CRITICAL_PRESSURE_KPA, CRITICAL_TEMPERATURE_C};

    /// 100 °C / 101.42 kPa 근처의 소형 포화표.
    fn table() -> SaturationTable {
        SaturationTable::from_entries(vec![
            SaturationEntry {
                temperature_c: 90.0,
                pressure_kpa: 70.18,
                v_f: 0.001036,
                v_g: 2.3589,
                h_f: 377.04,
                h_g: 2659.6,
                s_f: 1.1929,
                s_g: 7.4781,
                u_f: 376.97,
                u_g: 2493.9,
            },
            SaturationEntry {
                temperature_c: 100.0,
                pressure_kpa: 101.42,
                v_f: 0.001043,
                v_g: 1.6720,
                h_f: 419.17,
                h_g: 2675.6,
                s_f: 1.3072,
                s_g: 7.3541,
                u_f: 419.06,
                u_g: 2506.0,
            },
            SaturationEntry {
                temperature_c: 110.0,
                pressure_kpa: 143.38,
                v_f: 0.001052,
                v_g: 1.2094,
                h_f: 461.42,
                h_g: 2691.1,
                s_f: 1.4188,
                s_g: 7.2382,
                u_f: 461.27,
                u_g: 2517.7,
            },
        ])
        .unwrap()
    }

    #[test]
    fn pt_at_saturation_needs_quality() {
        let state = resolve(&table(), InputPair::PT, 101.42, 100.0).unwrap();
        assert_eq!(state.phase, Phase::NeedsQuality);
        assert!(!state.is_resolved());
        assert_eq!(state.quality, None);
    }

    #[test]
    fn pt_subcooled_uses_liquid_values() {
        let state = resolve(&table(), InputPair::PT, 101.42, 60.0).unwrap();
        assert_eq!(state.phase, Phase::SubcooledLiquid);
        assert_eq!(state.specific_volume, Some(0.001043));
        assert_eq!(state.enthalpy, Some(419.17));
        assert_eq!(state.temperature_c, 60.0);
    }

    #[test]
    fn pt_superheated_extrapolates_from_vapor_values() {
        let state = resolve(&table(), InputPair::PT, 101.42, 150.0).unwrap();
        assert_eq!(state.phase, Phase::SuperheatedVapor);
        let ratio = (150.0 + 273.15) / (100.0 + 273.15);
        assert_relative_eq!(state.specific_volume.unwrap(), 1.6720 * ratio, epsilon = 1e-9);
        assert_relative_eq!(state.enthalpy.unwrap(), 2675.6 + 2.0 * 50.0, epsilon = 1e-9);
        assert_relative_eq!(state.entropy.unwrap(), 7.3541 + 2.0 * ratio.ln(), epsilon = 1e-9);
        assert_relative_eq!(state.internal_energy.unwrap(), 2506.0 + 1.5 * 50.0, epsilon = 1e-9);
    }

    #[test]
    fn pt_supercritical_has_no_derived_fields() {
        let mut rows = table().by_temperature().to_vec();
        rows.push(SaturationEntry {
            temperature_c: CRITICAL_TEMPERATURE_C,
            pressure_kpa: CRITICAL_PRESSURE_KPA,
            v_f: 0.003106,
            v_g: 0.003106,
            h_f: 2084.3,
            h_g: 2084.3,
            s_f: 4.407,
            s_g: 4.407,
            u_f: 2015.7,
            u_g: 2015.7,
        });
        let table = SaturationTable::from_entries(rows).unwrap();
        let state = resolve(&table, InputPair::PT, CRITICAL_PRESSURE_KPA, 450.0).unwrap();
        assert_eq!(state.phase, Phase::Supercritical);
        assert!(!state.is_resolved());
    }

    #[test]
    fn pt_supercritical_beyond_table_fails() {
        let err = resolve(&table(), InputPair::PT, 25_000.0, 450.0).unwrap_err();
        assert!(matches!(err, ResolveError::OutOfRange { .. }));
    }

    #[test]
    fn pt_outside_table_fails() {
        let err = resolve(&table(), InputPair::PT, 500.0, 200.0).unwrap_err();
        assert!(matches!(err, ResolveError::OutOfRange { .. }));
    }

    #[test]
    fn px_midpoint_blends_liquid_and_vapor() {
        let state = resolve(&table(), InputPair::Px, 101.42, 0.5).unwrap();
        assert_eq!(state.phase, Phase::SaturatedTwoPhase);
        assert_eq!(state.quality, Some(0.5));
        assert_relative_eq!(
            state.specific_volume.unwrap(),
            (0.001043 + 1.6720) / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn tx_interpolates_saturation_by_temperature() {
        let state = resolve(&table(), InputPair::Tx, 95.0, 0.0).unwrap();
        assert_eq!(state.temperature_c, 95.0);
        assert_relative_eq!(state.pressure_kpa, (70.18 + 101.42) / 2.0, epsilon = 1e-9);
        assert_relative_eq!(state.enthalpy.unwrap(), (377.04 + 419.17) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn quality_outside_unit_interval_is_rejected() {
        assert_eq!(
            resolve(&table(), InputPair::Px, 101.42, 1.2),
            Err(ResolveError::InvalidQuality(1.2))
        );
        assert_eq!(
            resolve(&table(), InputPair::Tx, 100.0, -0.1),
            Err(ResolveError::InvalidQuality(-0.1))
        );
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        assert_eq!(
            resolve(&table(), InputPair::Ph, f64::NAN, 1000.0),
            Err(ResolveError::NonFinite)
        );
    }

    #[test]
    fn ph_covers_three_branches() {
        let t = table();
        let sub = resolve(&t, InputPair::Ph, 101.42, 419.17 - 42.0).unwrap();
        assert_eq!(sub.phase, Phase::SubcooledLiquid);
        assert_relative_eq!(sub.temperature_c, 90.0, epsilon = 1e-9);
        assert_relative_eq!(
            sub.internal_energy.unwrap(),
            377.17 - 101.42 * 0.001043,
            epsilon = 1e-9
        );

        let sh = resolve(&t, InputPair::Ph, 101.42, 2675.6 + 100.0).unwrap();
        assert_eq!(sh.phase, Phase::SuperheatedVapor);
        assert_relative_eq!(sh.temperature_c, 150.0, epsilon = 1e-9);
        let ratio: f64 = 1.0 + 50.0 / 373.15;
        assert_relative_eq!(sh.specific_volume.unwrap(), 1.6720 * ratio, epsilon = 1e-9);
        assert_relative_eq!(sh.entropy.unwrap(), 7.3541 + 2.0 * ratio.ln(), epsilon = 1e-9);

        let mix = resolve(&t, InputPair::Ph, 101.42, 1500.0).unwrap();
        assert_eq!(mix.phase, Phase::SaturatedTwoPhase);
        let x = (1500.0 - 419.17) / (2675.6 - 419.17);
        assert_relative_eq!(mix.quality.unwrap(), x, epsilon = 1e-12);
    }

    #[test]
    fn ps_covers_three_branches() {
        let t = table();
        let sub = resolve(&t, InputPair::Ps, 101.42, 1.0).unwrap();
        assert_eq!(sub.phase, Phase::SubcooledLiquid);
        assert_eq!(sub.temperature_c, 100.0);
        assert_eq!(sub.enthalpy, Some(419.17));

        let sh = resolve(&t, InputPair::Ps, 101.42, 7.3541 + 0.2).unwrap();
        assert_eq!(sh.phase, Phase::SuperheatedVapor);
        let superheat = 0.2 * 373.15 / 2.0;
        assert_relative_eq!(sh.temperature_c, 100.0 + superheat, epsilon = 1e-6);
        assert_relative_eq!(sh.specific_volume.unwrap(), 1.6720 * 0.1_f64.exp(), epsilon = 1e-6);
        assert_relative_eq!(sh.enthalpy.unwrap(), 2675.6 + 2.0 * superheat, epsilon = 1e-6);
        assert_relative_eq!(sh.internal_energy.unwrap(), 2506.0 + 1.5 * superheat, epsilon = 1e-6);

        let mix = resolve(&t, InputPair::Ps, 101.42, 4.0).unwrap();
        assert_eq!(mix.phase, Phase::SaturatedTwoPhase);
        let x = mix.quality.unwrap();
        assert!((0.0..=1.0).contains(&x));
    }
}
