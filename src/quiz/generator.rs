//! 무작위 상태점과 제시 물성 쌍을 고른다.
//!
//! 압력은 격자에 실제로 존재하는 값 중에서 고르므로 2차원 보간이 압력 방향으로는
//! 항상 정확히 일치한다. 난수원은 호출자가 넘기므로 시드를 고정하면 결과도 고정된다.

use rand::distributions::Open01;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::steam::interpolate::interpolate_grid;
use crate::steam::phase::{saturation_temperature, Phase};
use crate::steam::resolver::{resolve_px, ResolveError};
use crate::steam::state::{Property, State};
use crate::steam::tables::{GridPhase, TableStore};

/// 과열 온도 창의 여유(°C). 포화온도 위, 격자 최고 온도 아래로 이만큼 띄운다.
pub const SUPERHEAT_MARGIN_C: f64 = 20.0;
/// 2상 문제의 건도 범위 `[0.1, 0.9)`.
pub const QUALITY_MIN: f64 = 0.1;
pub const QUALITY_SPAN: f64 = 0.8;
/// 제시 물성 후보. 내부에너지와 건도는 제시하지 않는다.
pub const GIVEN_CANDIDATES: [Property; 5] = [
    Property::Pressure,
    Property::Temperature,
    Property::SpecificVolume,
    Property::Enthalpy,
    Property::Entropy,
];
const MAX_PAIR_DRAWS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuizError {
    #[error("{min}~{max} kPa 범위에 격자 압력이 없습니다")]
    NoPressures { min: f64, max: f64 },
    /// 포화 상태에서 P와 T는 독립이 아니다
    #[error("{first}/{second} 조합으로는 {phase} 상태를 정할 수 없습니다")]
    InvalidPair {
        first: Property,
        second: Property,
        phase: Phase,
    },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// 출제 압력 범위(kPa, 양끝 포함).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureWindow {
    pub min_kpa: f64,
    pub max_kpa: f64,
}

impl Default for PressureWindow {
    fn default() -> Self {
        Self {
            min_kpa: 10.0,
            max_kpa: 10_000.0,
        }
    }
}

impl PressureWindow {
    pub fn contains(&self, pressure_kpa: f64) -> bool {
        pressure_kpa >= self.min_kpa && pressure_kpa <= self.max_kpa
    }
}

/// 한 문제: 정답 상태와 제시된 두 물성.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub truth: State,
    pub given: [Property; 2],
}

impl QuizQuestion {
    pub fn is_given(&self, property: Property) -> bool {
        self.given.contains(&property)
    }

    /// 학습자가 채워야 하는 물성들 (P, T, v, h, s, u 중 제시되지 않은 것).
    pub fn asked(&self) -> impl Iterator<Item = Property> + '_ {
        Property::TABULATED
            .into_iter()
            .filter(move |p| !self.is_given(*p))
    }
}

fn random_quality<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    QUALITY_MIN + rng.gen::<f64>() * QUALITY_SPAN
}

fn saturated_state<R: Rng + ?Sized>(
    tables: &TableStore,
    pressure_kpa: f64,
    rng: &mut R,
) -> Result<State, QuizError> {
    Ok(resolve_px(&tables.saturation, pressure_kpa, random_quality(rng))?)
}

/// 과열 상태를 시도한다. 온도 창이 비었거나 격자 보간이 실패하면 `None`.
fn superheated_state<R: Rng + ?Sized>(
    tables: &TableStore,
    pressure_kpa: f64,
    rng: &mut R,
) -> Option<State> {
    let t_sat = saturation_temperature(&tables.saturation, pressure_kpa)?;
    let max_t = tables
        .grid
        .max_temperature(pressure_kpa, GridPhase::Superheated)?;
    let lo = t_sat + SUPERHEAT_MARGIN_C;
    let hi = max_t - SUPERHEAT_MARGIN_C;
    if lo >= hi {
        debug!(pressure_kpa, t_sat, max_t, "superheat window is empty");
        return None;
    }
    let frac: f64 = rng.sample(Open01);
    let t = lo + frac * (hi - lo);
    let e = interpolate_grid(&tables.grid, pressure_kpa, t, Some(GridPhase::Superheated))?;
    Some(State::single_phase(
        Phase::SuperheatedVapor,
        t,
        pressure_kpa,
        e.specific_volume,
        e.enthalpy,
        e.entropy,
        e.internal_energy,
    ))
}

/// 무작위 상태점. 절반은 2상, 절반은 과열이며 과열을 만들 수 없으면 2상으로 대신한다.
pub fn random_state<R: Rng + ?Sized>(
    tables: &TableStore,
    window: &PressureWindow,
    rng: &mut R,
) -> Result<State, QuizError> {
    let pressures: Vec<f64> = tables
        .grid
        .pressures()
        .into_iter()
        .filter(|p| window.contains(*p))
        .collect();
    let &pressure_kpa = pressures.choose(rng).ok_or(QuizError::NoPressures {
        min: window.min_kpa,
        max: window.max_kpa,
    })?;

    if rng.gen_bool(0.5) {
        return saturated_state(tables, pressure_kpa, rng);
    }
    match superheated_state(tables, pressure_kpa, rng) {
        Some(state) => Ok(state),
        None => saturated_state(tables, pressure_kpa, rng),
    }
}

/// 두 물성이 서로 다르고, 포화 상태라면 P·T 조합이 아닌지 검사한다.
pub fn validate_given_pair(first: Property, second: Property, phase: Phase) -> Result<(), QuizError> {
    let pt = matches!(
        (first, second),
        (Property::Pressure, Property::Temperature) | (Property::Temperature, Property::Pressure)
    );
    if first == second || (pt && phase == Phase::SaturatedTwoPhase) {
        return Err(QuizError::InvalidPair {
            first,
            second,
            phase,
        });
    }
    Ok(())
}

/// 유효한 제시 물성 쌍을 무작위로 고른다. 거절되면 다시 뽑는다.
pub fn select_given_properties<R: Rng + ?Sized>(state: &State, rng: &mut R) -> [Property; 2] {
    for _ in 0..MAX_PAIR_DRAWS {
        let mut picked = GIVEN_CANDIDATES.choose_multiple(rng, 2).copied();
        if let (Some(a), Some(b)) = (picked.next(), picked.next()) {
            if validate_given_pair(a, b, state.phase).is_ok() {
                return [a, b];
            }
        }
    }
    // P·v는 어느 상에서나 유효하다
    [Property::Pressure, Property::SpecificVolume]
}

/// 상태점과 제시 물성 쌍을 함께 만든다.
pub fn new_question<R: Rng + ?Sized>(
    tables: &TableStore,
    window: &PressureWindow,
    rng: &mut R,
) -> Result<QuizQuestion, QuizError> {
    let truth = random_state(tables, window, rng)?;
    let given = select_given_properties(&truth, rng);
    debug!(phase = %truth.phase, ?given, "quiz question generated");
    Ok(QuizQuestion { truth, given })
}
