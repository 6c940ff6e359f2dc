//! 테이블을 소유하고 모든 조회·해석 연산을 노출하는 세션 객체.

use std::path::Path;

use rand::Rng;

use super::curves::{self, Curve, SaturationDome};
use super::interpolate::interpolate_grid;
use super::phase::{self, Phase};
use super::reference;
use super::resolver::{self, ResolveError};
use super::state::{InputPair, Property, State};
use super::tables::{GridEntry, GridPhase, SaturationEntry, TableError, TableStore};
use crate::quiz::{self, AnswerSheet, CheckReport, PressureWindow, QuizError, QuizQuestion};

/// 읽기 전용 테이블 위에서 동작하는 해석 엔진. 모든 연산은 테이블에 대한 순수 함수다.
#[derive(Debug, Clone)]
pub struct Engine {
    tables: TableStore,
    quiz_window: PressureWindow,
}

impl Engine {
    pub fn new(tables: TableStore) -> Self {
        Self {
            tables,
            quiz_window: PressureWindow::default(),
        }
    }

    /// IF97로 생성한 기준 표를 사용한다.
    pub fn reference() -> Result<Self, TableError> {
        Ok(Self::new(reference::reference_tables()?))
    }

    /// JSON 표 파일 두 개를 로드한다.
    pub fn from_json_files(saturation_path: &Path, grid_path: &Path) -> Result<Self, TableError> {
        Ok(Self::new(TableStore::load_json(saturation_path, grid_path)?))
    }

    pub fn with_quiz_window(mut self, window: PressureWindow) -> Self {
        self.quiz_window = window;
        self
    }

    pub fn tables(&self) -> &TableStore {
        &self.tables
    }

    pub fn quiz_window(&self) -> &PressureWindow {
        &self.quiz_window
    }

    pub fn saturation_by_temperature(&self, temperature_c: f64) -> Option<SaturationEntry> {
        resolver::saturation_by_temperature(&self.tables.saturation, temperature_c)
    }

    pub fn saturation_by_pressure(&self, pressure_kpa: f64) -> Option<SaturationEntry> {
        resolver::saturation_by_pressure(&self.tables.saturation, pressure_kpa)
    }

    pub fn saturation_temperature(&self, pressure_kpa: f64) -> Option<f64> {
        phase::saturation_temperature(&self.tables.saturation, pressure_kpa)
    }

    pub fn classify(&self, pressure_kpa: f64, temperature_c: f64) -> Phase {
        phase::classify(&self.tables.saturation, pressure_kpa, temperature_c)
    }

    pub fn resolve(&self, pair: InputPair, value1: f64, value2: f64) -> Result<State, ResolveError> {
        resolver::resolve(&self.tables.saturation, pair, value1, value2)
    }

    pub fn isobar(&self, pressure_kpa: f64) -> Result<Curve, ResolveError> {
        curves::isobar(&self.tables.saturation, pressure_kpa)
    }

    pub fn isotherm(&self, temperature_c: f64) -> Curve {
        curves::isotherm(&self.tables.saturation, temperature_c)
    }

    /// 단상 격자 2차원 보간.
    pub fn grid_lookup(
        &self,
        pressure_kpa: f64,
        temperature_c: f64,
        phase: Option<GridPhase>,
    ) -> Option<GridEntry> {
        interpolate_grid(&self.tables.grid, pressure_kpa, temperature_c, phase)
    }

    pub fn dome(&self) -> SaturationDome {
        curves::saturation_dome(&self.tables.saturation)
    }

    pub fn random_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<State, QuizError> {
        quiz::random_state(&self.tables, &self.quiz_window, rng)
    }

    pub fn new_question<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<QuizQuestion, QuizError> {
        quiz::new_question(&self.tables, &self.quiz_window, rng)
    }

    pub fn check_answer(
        &self,
        truth: &State,
        given: &[Property],
        sheet: &AnswerSheet,
        tolerance: f64,
    ) -> CheckReport {
        quiz::check_answer(truth, given, sheet, tolerance)
    }
}
