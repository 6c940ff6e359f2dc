//! 구간 탐색(bracketing)과 선형 보간.
//!
//! 모든 테이블 조회는 이 모듈의 [`bracket`]을 거친다. 키는 단조 증가로 정렬되어
//! 있어야 하며, 범위를 벗어난 조회는 `None`으로 돌려준다(클램프하지 않는다).

use super::tables::{GridEntry, GridIsobar, GridPhase, PropertyGrid, SaturationEntry};

/// 두 행 사이를 비율 `frac`로 선형 보간할 수 있는 타입.
pub trait Lerp {
    fn lerp(lo: &Self, hi: &Self, frac: f64) -> Self;
}

#[inline]
pub fn lerp(a: f64, b: f64, frac: f64) -> f64 {
    a + frac * (b - a)
}

/// `lo_key..hi_key` 구간에서 `query`의 위치 비율. 두 키가 같으면 0을 반환해 아래 행 값을 쓴다.
#[inline]
pub fn fraction(lo_key: f64, hi_key: f64, query: f64) -> f64 {
    if hi_key == lo_key {
        0.0
    } else {
        (query - lo_key) / (hi_key - lo_key)
    }
}

/// `row[lo].key <= query <= row[hi].key` 를 만족하는 인접 인덱스 쌍을 이진 탐색으로 찾는다.
///
/// 행이 하나뿐이면 키가 정확히 일치할 때만 `(0, 0)`을 돌려준다.
pub fn bracket<T, F>(rows: &[T], query: f64, key: F) -> Option<(usize, usize)>
where
    F: Fn(&T) -> f64,
{
    let first = key(rows.first()?);
    let last = key(rows.last()?);
    if !(query >= first && query <= last) {
        return None;
    }
    if rows.len() == 1 {
        return Some((0, 0));
    }
    let idx = rows.partition_point(|row| key(row) <= query);
    if idx >= rows.len() {
        Some((rows.len() - 2, rows.len() - 1))
    } else {
        Some((idx - 1, idx))
    }
}

/// 구간을 찾아 모든 필드를 선형 보간한다.
pub fn interpolate<T, F>(rows: &[T], query: f64, key: F) -> Option<T>
where
    T: Lerp,
    F: Fn(&T) -> f64,
{
    let (lo, hi) = bracket(rows, query, &key)?;
    let frac = fraction(key(&rows[lo]), key(&rows[hi]), query);
    Some(T::lerp(&rows[lo], &rows[hi], frac))
}

impl Lerp for SaturationEntry {
    fn lerp(lo: &Self, hi: &Self, frac: f64) -> Self {
        Self {
            temperature_c: lerp(lo.temperature_c, hi.temperature_c, frac),
            pressure_kpa: lerp(lo.pressure_kpa, hi.pressure_kpa, frac),
            v_f: lerp(lo.v_f, hi.v_f, frac),
            v_g: lerp(lo.v_g, hi.v_g, frac),
            h_f: lerp(lo.h_f, hi.h_f, frac),
            h_g: lerp(lo.h_g, hi.h_g, frac),
            s_f: lerp(lo.s_f, hi.s_f, frac),
            s_g: lerp(lo.s_g, hi.s_g, frac),
            u_f: lerp(lo.u_f, hi.u_f, frac),
            u_g: lerp(lo.u_g, hi.u_g, frac),
        }
    }
}

impl Lerp for GridEntry {
    fn lerp(lo: &Self, hi: &Self, frac: f64) -> Self {
        Self {
            pressure_kpa: lerp(lo.pressure_kpa, hi.pressure_kpa, frac),
            temperature_c: lerp(lo.temperature_c, hi.temperature_c, frac),
            specific_volume: lerp(lo.specific_volume, hi.specific_volume, frac),
            enthalpy: lerp(lo.enthalpy, hi.enthalpy, frac),
            entropy: lerp(lo.entropy, hi.entropy, frac),
            internal_energy: lerp(lo.internal_energy, hi.internal_energy, frac),
            // 상 태그는 보간 대상이 아니다. 아래 행을 따른다.
            phase: lo.phase,
        }
    }
}

/// 한 압력의 격자 샘플에서 온도로 1차원 보간한다. `phase`가 주어지면 그 상의 샘플만 사용한다.
fn interpolate_isobar(
    isobar: &GridIsobar,
    temperature_c: f64,
    phase: Option<GridPhase>,
) -> Option<GridEntry> {
    let mut out = interpolate(isobar.rows(phase), temperature_c, |e| e.temperature_c)?;
    out.temperature_c = temperature_c;
    Some(out)
}

/// 2차원 격자 보간. 압력으로 구간을 찾고, 각 압력에서 온도로 보간한 뒤 압력 비율로 섞는다.
///
/// 압력이 샘플 압력과 정확히 같으면 1차원 결과를 그대로 돌려준다.
pub fn interpolate_grid(
    grid: &PropertyGrid,
    pressure_kpa: f64,
    temperature_c: f64,
    phase: Option<GridPhase>,
) -> Option<GridEntry> {
    let isobars = grid.isobars();
    let (lo, hi) = bracket(isobars, pressure_kpa, |i| i.pressure_kpa)?;
    if lo != hi && isobars[hi].pressure_kpa == pressure_kpa {
        return interpolate_isobar(&isobars[hi], temperature_c, phase);
    }
    let lower = interpolate_isobar(&isobars[lo], temperature_c, phase)?;
    if lo == hi || isobars[lo].pressure_kpa == pressure_kpa {
        return Some(lower);
    }
    let upper = interpolate_isobar(&isobars[hi], temperature_c, phase)?;
    let frac = fraction(isobars[lo].pressure_kpa, isobars[hi].pressure_kpa, pressure_kpa);
    let mut blended = GridEntry::lerp(&lower, &upper, frac);
    blended.pressure_kpa = pressure_kpa;
    blended.temperature_c = temperature_c;
    Some(blended)
}
