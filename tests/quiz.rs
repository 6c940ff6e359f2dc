//! 기준 표로 출제한 퀴즈 문제의 일관성 테스트.
use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::SeedableRng;
use steam_state_tables::quiz::{
    study, validate_given_pair, AnswerSheet, PressureWindow, DEFAULT_TOLERANCE,
};
use steam_state_tables::steam::{Engine, Phase, Property};
use steam_state_tables::ui_cli::format_value;

fn engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(|| Engine::reference().expect("reference tables"))
}

#[test]
fn generated_states_are_consistent_with_classifier() {
    let mut rng = StdRng::seed_from_u64(2024);
    let window = PressureWindow::default();
    let mut saturated = 0;
    let mut superheated = 0;
    for _ in 0..300 {
        let state = engine().random_state(&mut rng).unwrap();
        assert!(window.contains(state.pressure_kpa));
        assert!(state.is_resolved());
        match state.phase {
            Phase::SaturatedTwoPhase => {
                saturated += 1;
                let x = state.quality.unwrap();
                assert!((0.1..0.9).contains(&x));
            }
            Phase::SuperheatedVapor => {
                superheated += 1;
                let t_sat = engine().saturation_temperature(state.pressure_kpa).unwrap();
                assert!(state.temperature_c > t_sat + 20.0);
                assert_eq!(
                    engine().classify(state.pressure_kpa, state.temperature_c),
                    Phase::SuperheatedVapor
                );
            }
            other => panic!("unexpected phase {other:?}"),
        }
    }
    assert!(saturated > 0 && superheated > 0);
}

#[test]
fn questions_never_give_saturated_pt() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let q = engine().new_question(&mut rng).unwrap();
        assert!(validate_given_pair(q.given[0], q.given[1], q.truth.phase).is_ok());
    }
}

#[test]
fn displayed_truth_is_graded_correct() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        let q = engine().new_question(&mut rng).unwrap();
        let mut sheet = AnswerSheet::default().with_phase(q.truth.phase);
        for p in q.asked() {
            let v = q.truth.property(p).unwrap();
            sheet = sheet.with_value(p, format_value(p, v));
        }
        if let Some(x) = q.truth.quality {
            sheet = sheet.with_value(Property::Quality, format_value(Property::Quality, x));
        }
        let report = engine().check_answer(&q.truth, &q.given, &sheet, DEFAULT_TOLERANCE);
        assert!(report.all_correct, "{report:?}");
    }
}

#[test]
fn study_tables_cover_targets() {
    let tables = engine().tables();
    let by_t = study::saturation_by_temperature(&tables.saturation);
    assert_eq!(by_t.len(), study::SATURATION_TEMPERATURES_C.len());
    for row in &by_t {
        assert!((row.entry.temperature_c - row.target).abs() <= 1.0);
    }
    let blocks = study::superheated(tables);
    let atm = blocks.iter().find(|b| b.target_kpa == 100.0).unwrap();
    assert_eq!(atm.pressure_kpa, 100.0);
    assert_eq!(atm.rows.first().unwrap().target, 150.0);
}
