//! 선도(T-v, P-v, T-s)용 등압선·등온선·포화 돔 데이터 생성.
//!
//! 수치 조회용이 아니라 그리기용이므로 간격은 의도적으로 성기다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::phase::{CRITICAL_PRESSURE_KPA, CRITICAL_TEMPERATURE_C};
use super::resolver::{
    saturation_by_pressure, saturation_by_temperature, ResolveError, CP_LIQUID, CP_VAPOR,
};
use super::tables::{SaturationEntry, SaturationTable};
use super::KELVIN_OFFSET;

/// 임계점 비체적(m³/kg)
pub const CRITICAL_SPECIFIC_VOLUME: f64 = 1.0 / 322.0;
/// 임계점 비엔트로피(kJ/kg·K)
pub const CRITICAL_ENTROPY: f64 = 4.407;

const ISOBAR_STEP_C: usize = 20;
const ISOBAR_MAX_SUPERHEAT_C: usize = 400;
const ISOBAR_CEILING_C: f64 = 800.0;
const ISOTHERM_FLOOR_KPA: f64 = 10.0;
const ISOTHERM_MAX_HALVINGS: usize = 64;

/// 선도 위의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub temperature_c: f64,
    pub pressure_kpa: f64,
    pub specific_volume: f64,
    pub entropy: f64,
}

/// 등압선 또는 등온선.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub kind: CurveKind,
    /// 등압선이면 압력(kPa), 등온선이면 온도(°C)
    pub value: f64,
    pub points: Vec<CurvePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    Isobar,
    Isotherm,
}

/// 건도 0.1…0.9 의 내부 2상 점 9개. 부동소수 누적 오차를 피하려고 정수 단계로 만든다.
fn interior_qualities() -> impl Iterator<Item = f64> {
    (1..=9).map(|i| i as f64 / 10.0)
}

fn mix(sat: &SaturationEntry, x: f64, temperature_c: f64, pressure_kpa: f64) -> CurvePoint {
    CurvePoint {
        temperature_c,
        pressure_kpa,
        specific_volume: sat.v_f + x * (sat.v_g - sat.v_f),
        entropy: sat.s_f + x * (sat.s_g - sat.s_f),
    }
}

/// 등압선. 압축수 → 포화액 → 2상 → 포화증기 → 과열 순서로 진행한다.
pub fn isobar(table: &SaturationTable, pressure_kpa: f64) -> Result<Curve, ResolveError> {
    let sat = saturation_by_pressure(table, pressure_kpa).ok_or(ResolveError::OutOfRange {
        what: "pressure (kPa)",
        value: pressure_kpa,
    })?;
    let t_sat = sat.temperature_c;
    let t_sat_abs = sat.temperature_k();
    let mut points = Vec::new();

    for t in (0..).step_by(ISOBAR_STEP_C).map(|t| t as f64) {
        if t >= t_sat {
            break;
        }
        points.push(CurvePoint {
            temperature_c: t,
            pressure_kpa,
            specific_volume: sat.v_f,
            entropy: sat.s_f - CP_LIQUID * (t_sat_abs / (t + KELVIN_OFFSET)).ln(),
        });
    }

    points.push(mix(&sat, 0.0, t_sat, pressure_kpa));
    points.extend(interior_qualities().map(|x| mix(&sat, x, t_sat, pressure_kpa)));
    points.push(mix(&sat, 1.0, t_sat, pressure_kpa));

    for dt in (ISOBAR_STEP_C..=ISOBAR_MAX_SUPERHEAT_C).step_by(ISOBAR_STEP_C) {
        let t = t_sat + dt as f64;
        if t > ISOBAR_CEILING_C {
            break;
        }
        let ratio = (t + KELVIN_OFFSET) / t_sat_abs;
        points.push(CurvePoint {
            temperature_c: t,
            pressure_kpa,
            specific_volume: sat.v_g * ratio,
            entropy: sat.s_g + CP_VAPOR * ratio.ln(),
        });
    }

    Ok(Curve {
        kind: CurveKind::Isobar,
        value: pressure_kpa,
        points,
    })
}

/// 등온선. 포화표 온도 범위 밖이면 빈 곡선을 돌려준다(초임계 등온선은 지원하지 않는다).
pub fn isotherm(table: &SaturationTable, temperature_c: f64) -> Curve {
    let mut points = Vec::new();

    if let Some(sat) = saturation_by_temperature(table, temperature_c) {
        let p_sat = sat.pressure_kpa;
        points.push(CurvePoint {
            temperature_c,
            pressure_kpa: p_sat * 2.0,
            specific_volume: sat.v_f * 0.99,
            entropy: sat.s_f - 0.1,
        });
        points.push(mix(&sat, 0.0, temperature_c, p_sat));
        points.extend(interior_qualities().map(|x| mix(&sat, x, temperature_c, p_sat)));
        points.push(mix(&sat, 1.0, temperature_c, p_sat));

        let mut p = p_sat * 0.5;
        for _ in 0..ISOTHERM_MAX_HALVINGS {
            if p <= ISOTHERM_FLOOR_KPA {
                break;
            }
            points.push(CurvePoint {
                temperature_c,
                pressure_kpa: p,
                specific_volume: sat.v_g * p_sat / p,
                entropy: sat.s_g + 0.5 * (p_sat / p).ln(),
            });
            p *= 0.5;
        }
    }

    Curve {
        kind: CurveKind::Isotherm,
        value: temperature_c,
        points,
    }
}

/// 포화액선, 포화증기선, 임계점.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationDome {
    pub liquid: Vec<CurvePoint>,
    pub vapor: Vec<CurvePoint>,
    pub critical: CurvePoint,
}

/// 포화표(온도 순)로부터 포화 돔을 만든다.
pub fn saturation_dome(table: &SaturationTable) -> SaturationDome {
    let rows = table.by_temperature();
    let liquid = rows
        .iter()
        .map(|e| CurvePoint {
            temperature_c: e.temperature_c,
            pressure_kpa: e.pressure_kpa,
            specific_volume: e.v_f,
            entropy: e.s_f,
        })
        .collect();
    let vapor = rows
        .iter()
        .map(|e| CurvePoint {
            temperature_c: e.temperature_c,
            pressure_kpa: e.pressure_kpa,
            specific_volume: e.v_g,
            entropy: e.s_g,
        })
        .collect();
    SaturationDome {
        liquid,
        vapor,
        critical: CurvePoint {
            temperature_c: CRITICAL_TEMPERATURE_C,
            pressure_kpa: CRITICAL_PRESSURE_KPA,
            specific_volume: CRITICAL_SPECIFIC_VOLUME,
            entropy: CRITICAL_ENTROPY,
        },
    }
}

/// 선도 종류. 각 점을 (x, y) 좌표로 투영한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagram {
    /// x = 비체적, y = 온도
    Tv,
    /// x = 비체적, y = 압력
    Pv,
    /// x = 엔트로피, y = 온도
    Ts,
}

impl Diagram {
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Diagram::Tv => ("Specific Volume (m³/kg)", "Temperature (°C)"),
            Diagram::Pv => ("Specific Volume (m³/kg)", "Pressure (kPa)"),
            Diagram::Ts => ("Specific Entropy (kJ/(kg·K))", "Temperature (°C)"),
        }
    }

    /// 비체적 축은 로그 눈금이 적합하다.
    pub fn log_x(self) -> bool {
        matches!(self, Diagram::Tv | Diagram::Pv)
    }

    pub fn project(self, p: &CurvePoint) -> (f64, f64) {
        match self {
            Diagram::Tv => (p.specific_volume, p.temperature_c),
            Diagram::Pv => (p.specific_volume, p.pressure_kpa),
            Diagram::Ts => (p.entropy, p.temperature_c),
        }
    }
}

impl FromStr for Diagram {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tv" | "t-v" => Ok(Diagram::Tv),
            "pv" | "p-v" => Ok(Diagram::Pv),
            "ts" | "t-s" => Ok(Diagram::Ts),
            other => Err(format!("알 수 없는 선도: {other} (Tv, Pv, Ts)")),
        }
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Diagram::Tv => "T-v",
            Diagram::Pv => "P-v",
            Diagram::Ts => "T-s",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SaturationTable {
        let row = |t: f64, p: f64, v_g: f64, s_f: f64, s_g: f64| SaturationEntry {
            temperature_c: t,
            pressure_kpa: p,
            v_f: 0.00104,
            v_g,
            h_f: 4.2 * t,
            h_g: 2500.0 + 1.8 * t,
            s_f,
            s_g,
            u_f: 4.2 * t,
            u_g: 2400.0 + 1.0 * t,
        };
        SaturationTable::from_entries(vec![
            row(20.0, 2.34, 57.76, 0.2965, 8.6661),
            row(60.0, 19.95, 7.667, 0.8313, 7.9081),
            row(100.0, 101.42, 1.672, 1.3072, 7.3541),
            row(150.0, 476.16, 0.3925, 1.8418, 6.8371),
        ])
        .unwrap()
    }

    #[test]
    fn isobar_has_expected_segments() {
        let curve = isobar(&table(), 101.42).unwrap();
        // 0, 20, 40, 60, 80 (압축수) + 포화액 + 9 + 포화증기 + 20개 과열
        assert_eq!(curve.points.len(), 5 + 1 + 9 + 1 + 20);
        assert_eq!(curve.points[0].temperature_c, 0.0);
        let last = curve.points.last().unwrap();
        assert_eq!(last.temperature_c, 500.0);
    }

    #[test]
    fn isobar_superheat_spans_four_hundred_degrees() {
        let curve = isobar(&table(), 476.16).unwrap();
        assert!(curve.points.iter().all(|p| p.temperature_c <= 800.0));
        let last = curve.points.last().unwrap();
        assert_eq!(last.temperature_c, 550.0);
    }

    #[test]
    fn isobar_volume_is_monotonic() {
        let curve = isobar(&table(), 50.0).unwrap();
        for w in curve.points.windows(2) {
            assert!(w[1].specific_volume >= w[0].specific_volume);
        }
    }

    #[test]
    fn isobar_outside_table_fails() {
        assert!(isobar(&table(), 1.0).is_err());
        assert!(isobar(&table(), 5_000.0).is_err());
    }

    #[test]
    fn isotherm_tail_halves_pressure_down_to_floor() {
        let curve = isotherm(&table(), 150.0);
        assert_eq!(curve.kind, CurveKind::Isotherm);
        // 앵커 + 포화액 + 9 + 포화증기
        let tail: Vec<f64> = curve.points[12..].iter().map(|p| p.pressure_kpa).collect();
        assert!(!tail.is_empty());
        assert!(tail.iter().all(|p| *p > 10.0));
        for w in tail.windows(2) {
            assert!(w[1] < w[0]);
        }
    }

    #[test]
    fn isotherm_below_floor_pressure_has_no_tail() {
        let curve = isotherm(&table(), 20.0);
        assert_eq!(curve.points.len(), 12);
    }

    #[test]
    fn isotherm_outside_table_is_empty_and_repeatable() {
        assert!(isotherm(&table(), 300.0).points.is_empty());
        assert_eq!(isotherm(&table(), 60.0), isotherm(&table(), 60.0));
    }

    #[test]
    fn dome_follows_table_rows() {
        let dome = saturation_dome(&table());
        assert_eq!(dome.liquid.len(), 4);
        assert_eq!(dome.vapor[2].specific_volume, 1.672);
        assert_eq!(dome.critical.pressure_kpa, CRITICAL_PRESSURE_KPA);
    }

    #[test]
    fn diagram_projection_picks_axes() {
        let p = CurvePoint {
            temperature_c: 1.0,
            pressure_kpa: 2.0,
            specific_volume: 3.0,
            entropy: 4.0,
        };
        assert_eq!(Diagram::Pv.project(&p), (3.0, 2.0));
        assert_eq!(Diagram::Ts.project(&p), (4.0, 1.0));
        assert!(Diagram::Tv.log_x() && !Diagram::Ts.log_x());
        assert_eq!("t-s".parse::<Diagram>(), Ok(Diagram::Ts));
    }
}
