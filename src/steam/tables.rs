//! 포화표와 단상(압축수/과열증기) 격자를 메모리에 보관하는 테이블 저장소.
//!
//! 로드 이후에는 읽기 전용이며 모든 해석 호출이 같은 테이블을 공유한다.
//! JSON 필드명은 기존 데이터 파일(`saturation_tables.json`, `property_grid.json`)을 따른다.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// 포화표 한 행. 온도(°C), 압력(kPa)과 포화액(`_f`)/포화증기(`_g`) 물성값을 담는다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaturationEntry {
    #[serde(rename = "T_C")]
    pub temperature_c: f64,
    #[serde(rename = "P_kPa")]
    pub pressure_kpa: f64,
    /// 비체적(m³/kg)
    pub v_f: f64,
    pub v_g: f64,
    /// 비엔탈피(kJ/kg)
    pub h_f: f64,
    pub h_g: f64,
    /// 비엔트로피(kJ/kg·K)
    pub s_f: f64,
    pub s_g: f64,
    /// 비내부에너지(kJ/kg)
    pub u_f: f64,
    pub u_g: f64,
}

impl SaturationEntry {
    /// 포화온도의 절대온도(K).
    pub fn temperature_k(&self) -> f64 {
        self.temperature_c + super::KELVIN_OFFSET
    }

    fn is_finite(&self) -> bool {
        [
            self.temperature_c,
            self.pressure_kpa,
            self.v_f,
            self.v_g,
            self.h_f,
            self.h_g,
            self.s_f,
            self.s_g,
            self.u_f,
            self.u_g,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// 격자 샘플이 포화선의 어느 쪽에서 채취되었는지 나타낸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridPhase {
    Liquid,
    #[serde(alias = "vapor")]
    Superheated,
}

impl std::str::FromStr for GridPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "liquid" | "l" => Ok(GridPhase::Liquid),
            "superheated" | "vapor" | "v" => Ok(GridPhase::Superheated),
            other => Err(format!("알 수 없는 격자 상: {other} (liquid, superheated)")),
        }
    }
}

/// 단상 격자의 한 샘플.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridEntry {
    #[serde(rename = "P_kPa")]
    pub pressure_kpa: f64,
    #[serde(rename = "T_C")]
    pub temperature_c: f64,
    #[serde(rename = "v_m3kg")]
    pub specific_volume: f64,
    #[serde(rename = "h_kJkg")]
    pub enthalpy: f64,
    #[serde(rename = "s_kJkgK")]
    pub entropy: f64,
    #[serde(rename = "u_kJkg")]
    pub internal_energy: f64,
    pub phase: GridPhase,
}

/// 테이블 로드/검증 시 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("테이블 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("테이블 JSON 파싱 오류: {0}")]
    Json(#[from] serde_json::Error),
    #[error("비어 있는 테이블: {0}")]
    Empty(&'static str),
    #[error("유한하지 않은 값이 포함된 행: {0}")]
    NonFinite(&'static str),
    #[error("온도와 압력이 함께 증가하지 않는 포화표: {0}")]
    Unsorted(&'static str),
    #[error("IF97 표 생성 실패: {0}")]
    Reference(&'static str),
}

/// 포화표. 같은 물리 데이터를 온도 순, 압력 순 두 가지로 정렬해 보관한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationTable {
    by_temperature: Vec<SaturationEntry>,
    by_pressure: Vec<SaturationEntry>,
}

impl SaturationTable {
    /// 두 정렬 뷰를 받아 검증 후 키 기준으로 정렬한다.
    pub fn new(
        mut by_temperature: Vec<SaturationEntry>,
        mut by_pressure: Vec<SaturationEntry>,
    ) -> Result<Self, TableError> {
        if by_temperature.is_empty() || by_pressure.is_empty() {
            return Err(TableError::Empty("saturation"));
        }
        if !by_temperature.iter().chain(&by_pressure).all(SaturationEntry::is_finite) {
            return Err(TableError::NonFinite("saturation"));
        }
        by_temperature.sort_by(|a, b| a.temperature_c.total_cmp(&b.temperature_c));
        by_pressure.sort_by(|a, b| a.pressure_kpa.total_cmp(&b.pressure_kpa));
        // 행 순서는 정렬로 맞추지만, 두 키가 어긋난 행은 두 뷰의 결과를 갈라놓는다
        let co_monotone = |rows: &[SaturationEntry]| {
            rows.windows(2).all(|w| {
                w[0].temperature_c <= w[1].temperature_c && w[0].pressure_kpa <= w[1].pressure_kpa
            })
        };
        if !co_monotone(&by_temperature) {
            return Err(TableError::Unsorted("by_temperature"));
        }
        if !co_monotone(&by_pressure) {
            return Err(TableError::Unsorted("by_pressure"));
        }
        Ok(Self {
            by_temperature,
            by_pressure,
        })
    }

    /// 한 벌의 행으로부터 두 뷰를 모두 만든다.
    pub fn from_entries(entries: Vec<SaturationEntry>) -> Result<Self, TableError> {
        Self::new(entries.clone(), entries)
    }

    pub fn by_temperature(&self) -> &[SaturationEntry] {
        &self.by_temperature
    }

    pub fn by_pressure(&self) -> &[SaturationEntry] {
        &self.by_pressure
    }

    /// 온도 키 범위 (최저, 최고) °C.
    pub fn temperature_range(&self) -> (f64, f64) {
        key_range(&self.by_temperature, |e| e.temperature_c)
    }

    /// 압력 키 범위 (최저, 최고) kPa.
    pub fn pressure_range(&self) -> (f64, f64) {
        key_range(&self.by_pressure, |e| e.pressure_kpa)
    }
}

fn key_range<T>(rows: &[T], key: impl Fn(&T) -> f64) -> (f64, f64) {
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (key(first), key(last)),
        _ => (f64::NAN, f64::NAN),
    }
}

/// 한 압력에서 채취된 격자 샘플 묶음. 온도 오름차순이다.
#[derive(Debug, Clone, PartialEq)]
pub struct GridIsobar {
    pub pressure_kpa: f64,
    pub entries: Vec<GridEntry>,
    liquid: Vec<GridEntry>,
    superheated: Vec<GridEntry>,
}

impl GridIsobar {
    /// 온도순으로 정렬된 샘플에서 상별 행을 미리 나눠 둔다.
    fn new(pressure_kpa: f64, entries: Vec<GridEntry>) -> Self {
        let of_phase = |phase: GridPhase| -> Vec<GridEntry> {
            entries.iter().filter(|e| e.phase == phase).copied().collect()
        };
        let liquid = of_phase(GridPhase::Liquid);
        let superheated = of_phase(GridPhase::Superheated);
        Self {
            pressure_kpa,
            entries,
            liquid,
            superheated,
        }
    }

    /// 보간에 쓸 행. `phase`가 없으면 전체 샘플이다.
    pub fn rows(&self, phase: Option<GridPhase>) -> &[GridEntry] {
        match phase {
            None => &self.entries,
            Some(GridPhase::Liquid) => &self.liquid,
            Some(GridPhase::Superheated) => &self.superheated,
        }
    }
}

/// 희소 단상 격자. 압력별로 묶어 압력 오름차순으로 보관한다.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyGrid {
    isobars: Vec<GridIsobar>,
}

impl PropertyGrid {
    /// 정렬되지 않은 평면 목록을 압력별로 묶는다. 압력 값이 정확히 같은 샘플끼리 묶인다.
    pub fn new(mut entries: Vec<GridEntry>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty("grid"));
        }
        let finite = entries.iter().all(|e| {
            [
                e.pressure_kpa,
                e.temperature_c,
                e.specific_volume,
                e.enthalpy,
                e.entropy,
                e.internal_energy,
            ]
            .iter()
            .all(|v| v.is_finite())
        });
        if !finite {
            return Err(TableError::NonFinite("grid"));
        }
        entries.sort_by(|a, b| {
            a.pressure_kpa
                .total_cmp(&b.pressure_kpa)
                .then(a.temperature_c.total_cmp(&b.temperature_c))
        });

        let mut groups: Vec<(f64, Vec<GridEntry>)> = Vec::new();
        for entry in entries {
            match groups.last_mut() {
                Some((p, rows)) if *p == entry.pressure_kpa => rows.push(entry),
                _ => groups.push((entry.pressure_kpa, vec![entry])),
            }
        }
        let isobars = groups
            .into_iter()
            .map(|(p, rows)| GridIsobar::new(p, rows))
            .collect();
        Ok(Self { isobars })
    }

    pub fn isobars(&self) -> &[GridIsobar] {
        &self.isobars
    }

    /// 격자에 존재하는 서로 다른 압력들(오름차순).
    pub fn pressures(&self) -> Vec<f64> {
        self.isobars.iter().map(|i| i.pressure_kpa).collect()
    }

    /// 정확히 일치하는 압력의 샘플 묶음.
    pub fn at_pressure(&self, pressure_kpa: f64) -> Option<&GridIsobar> {
        self.isobars
            .iter()
            .find(|i| i.pressure_kpa == pressure_kpa)
    }

    /// 주어진 압력에서 해당 상(phase) 샘플의 최고 온도.
    pub fn max_temperature(&self, pressure_kpa: f64, phase: GridPhase) -> Option<f64> {
        self.at_pressure(pressure_kpa)?
            .rows(Some(phase))
            .last()
            .map(|e| e.temperature_c)
    }

    /// 평면 목록으로 되돌린다 (JSON 내보내기용).
    pub fn entries(&self) -> Vec<GridEntry> {
        self.isobars
            .iter()
            .flat_map(|i| i.entries.iter().copied())
            .collect()
    }
}

/// 해석 엔진이 사용하는 테이블 묶음.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStore {
    pub saturation: SaturationTable,
    pub grid: PropertyGrid,
}

impl TableStore {
    pub fn new(saturation: SaturationTable, grid: PropertyGrid) -> Self {
        Self { saturation, grid }
    }

    /// JSON 문자열 두 개(포화표, 격자)로부터 테이블을 만든다.
    pub fn from_json_str(saturation_json: &str, grid_json: &str) -> Result<Self, TableError> {
        let raw: SaturationTable = serde_json::from_str(saturation_json)?;
        let saturation = SaturationTable::new(raw.by_temperature, raw.by_pressure)?;
        let entries: Vec<GridEntry> = serde_json::from_str(grid_json)?;
        let grid = PropertyGrid::new(entries)?;
        Ok(Self { saturation, grid })
    }

    /// 파일 경로 두 개로부터 테이블을 로드한다.
    pub fn load_json(saturation_path: &Path, grid_path: &Path) -> Result<Self, TableError> {
        let saturation_json = fs::read_to_string(saturation_path)?;
        let grid_json = fs::read_to_string(grid_path)?;
        let store = Self::from_json_str(&saturation_json, &grid_json)?;
        info!(
            saturation = %saturation_path.display(),
            grid = %grid_path.display(),
            rows = store.saturation.by_temperature().len(),
            isobars = store.grid.isobars().len(),
            "steam tables loaded"
        );
        Ok(store)
    }

    /// 현재 테이블을 같은 형식의 JSON 파일 두 개로 저장한다.
    pub fn save_json(&self, saturation_path: &Path, grid_path: &Path) -> Result<(), TableError> {
        fs::write(
            saturation_path,
            serde_json::to_string_pretty(&self.saturation)?,
        )?;
        fs::write(grid_path, serde_json::to_string_pretty(&self.grid.entries())?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sat(t: f64, p: f64) -> SaturationEntry {
        SaturationEntry {
            temperature_c: t,
            pressure_kpa: p,
            v_f: 0.001,
            v_g: 1.0,
            h_f: 400.0,
            h_g: 2600.0,
            s_f: 1.3,
            s_g: 7.4,
            u_f: 400.0,
            u_g: 2500.0,
        }
    }

    fn grid(p: f64, t: f64, phase: GridPhase) -> GridEntry {
        GridEntry {
            pressure_kpa: p,
            temperature_c: t,
            specific_volume: 1.0,
            enthalpy: 2700.0,
            entropy: 7.5,
            internal_energy: 2500.0,
            phase,
        }
    }

    #[test]
    fn saturation_views_are_sorted_by_their_keys() {
        let table =
            SaturationTable::from_entries(vec![sat(120.0, 198.0), sat(100.0, 101.4)]).unwrap();
        assert_eq!(table.by_temperature()[0].temperature_c, 100.0);
        assert_eq!(table.by_pressure()[0].pressure_kpa, 101.4);
        assert_eq!(table.temperature_range(), (100.0, 120.0));
    }

    #[test]
    fn empty_and_non_finite_tables_are_rejected() {
        assert!(matches!(
            SaturationTable::from_entries(vec![]),
            Err(TableError::Empty(_))
        ));
        assert!(matches!(
            SaturationTable::from_entries(vec![sat(f64::NAN, 1.0)]),
            Err(TableError::NonFinite(_))
        ));
        assert!(matches!(PropertyGrid::new(vec![]), Err(TableError::Empty(_))));
    }

    #[test]
    fn saturation_rows_with_falling_pressure_are_rejected() {
        // 온도는 오르는데 압력이 내려가는 행
        let result = SaturationTable::from_entries(vec![sat(100.0, 101.4), sat(120.0, 90.0)]);
        assert!(matches!(result, Err(TableError::Unsorted(_))));
    }

    #[test]
    fn grid_groups_entries_by_pressure() {
        let grid = PropertyGrid::new(vec![
            grid(200.0, 300.0, GridPhase::Superheated),
            grid(100.0, 150.0, GridPhase::Superheated),
            grid(100.0, 50.0, GridPhase::Liquid),
            grid(100.0, 400.0, GridPhase::Superheated),
        ])
        .unwrap();
        assert_eq!(grid.pressures(), vec![100.0, 200.0]);
        let at_100 = grid.at_pressure(100.0).unwrap();
        let temps: Vec<f64> = at_100.entries.iter().map(|e| e.temperature_c).collect();
        assert_eq!(temps, vec![50.0, 150.0, 400.0]);
        assert_eq!(grid.max_temperature(100.0, GridPhase::Superheated), Some(400.0));
        assert_eq!(grid.max_temperature(200.0, GridPhase::Liquid), None);
    }

    #[test]
    fn isobar_rows_are_split_by_phase() {
        let grid = PropertyGrid::new(vec![
            grid(100.0, 150.0, GridPhase::Superheated),
            grid(100.0, 50.0, GridPhase::Liquid),
            grid(100.0, 75.0, GridPhase::Liquid),
            grid(100.0, 400.0, GridPhase::Superheated),
        ])
        .unwrap();
        let isobar = grid.at_pressure(100.0).unwrap();
        let temps = |rows: &[GridEntry]| rows.iter().map(|e| e.temperature_c).collect::<Vec<_>>();
        assert_eq!(temps(isobar.rows(Some(GridPhase::Liquid))), vec![50.0, 75.0]);
        assert_eq!(temps(isobar.rows(Some(GridPhase::Superheated))), vec![150.0, 400.0]);
        assert_eq!(isobar.rows(None).len(), 4);
    }

    #[test]
    fn json_field_names_follow_data_files() {
        let sat_json = r#"{
            "by_temperature": [
                {"T_C": 100.0, "P_kPa": 101.42, "v_f": 0.001043, "v_g": 1.6720,
                 "h_f": 419.17, "h_g": 2675.6, "s_f": 1.3072, "s_g": 7.3541,
                 "u_f": 419.06, "u_g": 2506.0}
            ],
            "by_pressure": [
                {"T_C": 100.0, "P_kPa": 101.42, "v_f": 0.001043, "v_g": 1.6720,
                 "h_f": 419.17, "h_g": 2675.6, "s_f": 1.3072, "s_g": 7.3541,
                 "u_f": 419.06, "u_g": 2506.0}
            ]
        }"#;
        let grid_json = r#"[
            {"P_kPa": 100.0, "T_C": 150.0, "v_m3kg": 1.9367, "h_kJkg": 2776.6,
             "s_kJkgK": 7.6148, "u_kJkg": 2582.9, "phase": "superheated"},
            {"P_kPa": 100.0, "T_C": 50.0, "v_m3kg": 0.001012, "h_kJkg": 209.4,
             "s_kJkgK": 0.7038, "u_kJkg": 209.3, "phase": "liquid"}
        ]"#;
        let store = TableStore::from_json_str(sat_json, grid_json).unwrap();
        assert_eq!(store.saturation.by_pressure()[0].h_g, 2675.6);
        let isobar = store.grid.at_pressure(100.0).unwrap();
        assert_eq!(isobar.entries[0].phase, GridPhase::Liquid);
        assert_eq!(isobar.entries[1].phase, GridPhase::Superheated);
    }
}
