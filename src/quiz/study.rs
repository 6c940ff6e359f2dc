//! 교재식 학습용 요약표. 보기 좋은 간격의 목표값마다 가장 가까운 표 행을 뽑는다.

use serde::Serialize;

use crate::steam::phase::saturation_temperature;
use crate::steam::tables::{GridEntry, GridPhase, SaturationEntry, SaturationTable, TableStore};

/// 포화표(온도 기준) 목표 온도(°C).
pub const SATURATION_TEMPERATURES_C: [f64; 40] = [
    0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0,
    80.0, 85.0, 90.0, 95.0, 100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0,
    200.0, 220.0, 240.0, 260.0, 280.0, 300.0, 320.0, 340.0, 360.0, 370.0,
];

/// 포화표(압력 기준) 목표 압력(kPa).
pub const SATURATION_PRESSURES_KPA: [f64; 22] = [
    1.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0, 150.0, 200.0, 300.0, 400.0, 500.0, 750.0, 1000.0,
    1500.0, 2000.0, 3000.0, 5000.0, 7500.0, 10000.0, 15000.0, 20000.0,
];

/// 과열표 목표 압력(kPa).
pub const SUPERHEATED_PRESSURES_KPA: [f64; 15] = [
    10.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0, 750.0, 1000.0, 1500.0, 2000.0, 3000.0,
    5000.0, 7500.0, 10000.0,
];

pub const SUPERHEATED_STEP_C: f64 = 50.0;
pub const SUPERHEATED_MAX_C: f64 = 800.0;
/// 목표 온도와 이 값(°C) 이상 떨어진 행은 표에 넣지 않는다.
pub const SUPERHEATED_MATCH_C: f64 = 30.0;

/// 목표값과 그 목표에 가장 가까운 표 행.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StudyRow<T> {
    pub target: f64,
    pub entry: T,
}

/// 과열표의 한 압력 블록.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperheatedBlock {
    pub target_kpa: f64,
    /// 실제로 사용한 격자 압력.
    pub pressure_kpa: f64,
    pub saturation_temperature_c: Option<f64>,
    pub rows: Vec<StudyRow<GridEntry>>,
}

fn nearest<'a, T>(rows: &'a [T], target: f64, key: impl Fn(&T) -> f64) -> Option<&'a T> {
    rows.iter()
        .min_by(|a, b| (key(a) - target).abs().total_cmp(&(key(b) - target).abs()))
}

fn saturation_rows(
    table: &SaturationTable,
    targets: &[f64],
    key: impl Fn(&SaturationEntry) -> f64,
) -> Vec<StudyRow<SaturationEntry>> {
    targets
        .iter()
        .filter_map(|&target| {
            nearest(table.by_temperature(), target, &key).map(|e| StudyRow { target, entry: *e })
        })
        .collect()
}

/// 목표 온도별 최근접 포화 행.
pub fn saturation_by_temperature(table: &SaturationTable) -> Vec<StudyRow<SaturationEntry>> {
    saturation_rows(table, &SATURATION_TEMPERATURES_C, |e| e.temperature_c)
}

/// 목표 압력별 최근접 포화 행.
pub fn saturation_by_pressure(table: &SaturationTable) -> Vec<StudyRow<SaturationEntry>> {
    saturation_rows(table, &SATURATION_PRESSURES_KPA, |e| e.pressure_kpa)
}

/// 목표 압력마다 가장 가까운 격자 압력을 골라 약 50 °C 간격의 과열 행을 뽑는다.
pub fn superheated(tables: &TableStore) -> Vec<SuperheatedBlock> {
    let isobars = tables.grid.isobars();
    SUPERHEATED_PRESSURES_KPA
        .iter()
        .filter_map(|&target_kpa| {
            let isobar = nearest(isobars, target_kpa, |i| i.pressure_kpa)?;
            let t_sat = saturation_temperature(&tables.saturation, isobar.pressure_kpa);
            let floor = t_sat.unwrap_or(f64::NEG_INFINITY);
            let vapor: Vec<GridEntry> = isobar
                .entries
                .iter()
                .filter(|e| e.phase == GridPhase::Superheated && e.temperature_c > floor)
                .copied()
                .collect();

            let start = match t_sat {
                Some(t) => ((t + 10.0) / SUPERHEATED_STEP_C).ceil() * SUPERHEATED_STEP_C,
                None => SUPERHEATED_STEP_C,
            };
            let mut rows = Vec::new();
            let mut target_t = start;
            while target_t <= SUPERHEATED_MAX_C {
                if let Some(e) = nearest(vapor.as_slice(), target_t, |e| e.temperature_c) {
                    if (e.temperature_c - target_t).abs() < SUPERHEATED_MATCH_C {
                        rows.push(StudyRow {
                            target: target_t,
                            entry: *e,
                        });
                    }
                }
                target_t += SUPERHEATED_STEP_C;
            }
            Some(SuperheatedBlock {
                target_kpa,
                pressure_kpa: isobar.pressure_kpa,
                saturation_temperature_c: t_sat,
                rows,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steam::tables::PropertyGrid;

    fn sat(t: f64, p: f64) -> SaturationEntry {
        SaturationEntry {
            temperature_c: t,
            pressure_kpa: p,
            v_f: 0.001,
            v_g: 1.0,
            h_f: 4.2 * t,
            h_g: 2600.0,
            s_f: 0.01 * t,
            s_g: 7.0,
            u_f: 4.2 * t,
            u_g: 2500.0,
        }
    }

    #[test]
    fn picks_nearest_saturation_rows() {
        let table =
            SaturationTable::from_entries(vec![sat(4.0, 0.8), sat(12.0, 1.4), sat(100.0, 101.4)])
                .unwrap();
        let rows = saturation_by_temperature(&table);
        assert_eq!(rows.len(), SATURATION_TEMPERATURES_C.len());
        assert_eq!(rows[0].entry.temperature_c, 4.0);
        assert_eq!(rows[2].target, 10.0);
        assert_eq!(rows[2].entry.temperature_c, 12.0);

        let by_p = saturation_by_pressure(&table);
        assert_eq!(by_p[6].target, 100.0);
        assert_eq!(by_p[6].entry.pressure_kpa, 101.4);
    }

    #[test]
    fn superheated_rows_start_above_saturation() {
        let saturation =
            SaturationTable::from_entries(vec![sat(50.0, 12.0), sat(150.0, 476.0)]).unwrap();
        let grid = PropertyGrid::new(
            (1..=32)
                .map(|i| {
                    let t = 25.0 * f64::from(i);
                    GridEntry {
                        pressure_kpa: 100.0,
                        temperature_c: t,
                        specific_volume: 1.0,
                        enthalpy: 2600.0 + 2.0 * t,
                        entropy: 7.0,
                        internal_energy: 2500.0,
                        phase: if t < 100.0 {
                            GridPhase::Liquid
                        } else {
                            GridPhase::Superheated
                        },
                    }
                })
                .collect(),
        )
        .unwrap();
        let blocks = superheated(&TableStore::new(saturation, grid));
        assert_eq!(blocks.len(), SUPERHEATED_PRESSURES_KPA.len());
        let atm = blocks.iter().find(|b| b.target_kpa == 100.0).unwrap();
        assert_eq!(atm.pressure_kpa, 100.0);
        let first = atm.rows.first().unwrap();
        assert!(first.target > atm.saturation_temperature_c.unwrap());
        assert_eq!(first.entry.temperature_c, first.target);
        assert_eq!(atm.rows.last().unwrap().target, SUPERHEATED_MAX_C);
    }
}
