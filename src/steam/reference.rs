//! IAPWS-IF97 상관식으로 기준 물성표를 한 번 생성한다.
//!
//! 데이터 파일 없이도 엔진을 띄울 수 있도록 포화표와 단상 격자를 시작 시점에 채운다.
//! 만들어진 표는 JSON 파일과 같은 검증을 거치며, 이후 해석은 표 보간만 사용한다.

use tracing::info;

use super::if97;
use super::tables::{
    GridEntry, GridPhase, PropertyGrid, SaturationEntry, SaturationTable, TableError, TableStore,
};

/// 삼중점 온도(°C). 포화표의 첫 행.
pub const TRIPLE_POINT_C: f64 = 0.01;
/// 포화표의 마지막 정수 온도(°C). 임계 온도 바로 아래.
pub const LAST_SATURATION_C: u32 = 373;

/// 격자에 포함하는 압력(kPa).
pub const GRID_PRESSURES_KPA: [f64; 15] = [
    10.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0, 750.0, 1000.0, 1500.0, 2000.0, 3000.0,
    5000.0, 7500.0, 10000.0,
];
pub const GRID_STEP_C: f64 = 25.0;
pub const GRID_MAX_C: f64 = 800.0;

fn saturation_row(t_c: f64) -> Result<SaturationEntry, TableError> {
    let p = if97::saturation_pressure_kpa(t_c).map_err(TableError::Reference)?;
    let f = if97::saturated_props(t_c, 0.0).map_err(TableError::Reference)?;
    let g = if97::saturated_props(t_c, 1.0).map_err(TableError::Reference)?;
    Ok(SaturationEntry {
        temperature_c: t_c,
        pressure_kpa: p,
        v_f: f.specific_volume,
        v_g: g.specific_volume,
        h_f: f.enthalpy,
        h_g: g.enthalpy,
        s_f: f.entropy,
        s_g: g.entropy,
        u_f: f.internal_energy,
        u_g: g.internal_energy,
    })
}

/// 삼중점부터 1 °C 간격으로 373 °C까지의 포화표.
pub fn saturation_table() -> Result<SaturationTable, TableError> {
    let temperatures =
        std::iter::once(TRIPLE_POINT_C).chain((1..=LAST_SATURATION_C).map(f64::from));
    let rows = temperatures
        .map(saturation_row)
        .collect::<Result<Vec<_>, _>>()?;
    SaturationTable::from_entries(rows)
}

/// 고정 압력 × 25 °C 간격 온도의 단상 격자. 포화온도 아래 샘플은 `liquid` 태그를 단다.
pub fn property_grid() -> Result<PropertyGrid, TableError> {
    let steps = (GRID_MAX_C / GRID_STEP_C) as u32;
    let mut entries = Vec::with_capacity(GRID_PRESSURES_KPA.len() * steps as usize);
    for &p in &GRID_PRESSURES_KPA {
        let t_sat = if97::saturation_temperature_c(p).map_err(TableError::Reference)?;
        for i in 1..=steps {
            let t = f64::from(i) * GRID_STEP_C;
            let props = if97::region_props(p, t).map_err(TableError::Reference)?;
            let phase = if t < t_sat {
                GridPhase::Liquid
            } else {
                GridPhase::Superheated
            };
            entries.push(GridEntry {
                pressure_kpa: p,
                temperature_c: t,
                specific_volume: props.specific_volume,
                enthalpy: props.enthalpy,
                entropy: props.entropy,
                internal_energy: props.internal_energy,
                phase,
            });
        }
    }
    PropertyGrid::new(entries)
}

/// 포화표와 격자를 모두 생성한다.
pub fn reference_tables() -> Result<TableStore, TableError> {
    let saturation = saturation_table()?;
    let grid = property_grid()?;
    info!(
        rows = saturation.by_temperature().len(),
        isobars = grid.isobars().len(),
        "reference steam tables generated"
    );
    Ok(TableStore::new(saturation, grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn saturation_rows_span_triple_to_near_critical() {
        let table = saturation_table().unwrap();
        let (t_min, t_max) = table.temperature_range();
        assert_eq!(t_min, TRIPLE_POINT_C);
        assert_eq!(t_max, 373.0);
        assert_eq!(table.by_temperature().len(), 374);
    }

    #[test]
    fn boiling_point_row_matches_handbook() {
        let table = saturation_table().unwrap();
        let row = table
            .by_temperature()
            .iter()
            .find(|e| e.temperature_c == 100.0)
            .copied()
            .unwrap();
        assert_relative_eq!(row.pressure_kpa, 101.42, max_relative = 1e-3);
        assert_relative_eq!(row.h_f, 419.17, max_relative = 1e-3);
        assert_relative_eq!(row.h_g, 2675.6, max_relative = 1e-3);
        assert_relative_eq!(row.v_g, 1.6718, max_relative = 2e-3);
        assert_relative_eq!(row.s_g, 7.3541, max_relative = 1e-3);
    }

    #[test]
    fn grid_tags_liquid_below_saturation() {
        let grid = property_grid().unwrap();
        let atm = grid.at_pressure(100.0).unwrap();
        let liquid = atm.entries.iter().find(|e| e.temperature_c == 75.0).unwrap();
        let vapor = atm.entries.iter().find(|e| e.temperature_c == 150.0).unwrap();
        assert_eq!(liquid.phase, GridPhase::Liquid);
        assert_eq!(vapor.phase, GridPhase::Superheated);
        assert_eq!(grid.max_temperature(100.0, GridPhase::Superheated), Some(GRID_MAX_C));
    }
}
