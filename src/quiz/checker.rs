//! 학습자 답안 채점. 상대 오차가 허용치 이하이면 정답으로 본다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::steam::phase::Phase;
use crate::steam::state::{Property, State};

/// 기본 허용 상대 오차 (±0.5 %).
pub const DEFAULT_TOLERANCE: f64 = 0.005;

/// 학습자가 제출한 답안. 값은 입력 그대로의 문자열이다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub values: BTreeMap<Property, String>,
    pub phase: Option<Phase>,
}

impl AnswerSheet {
    pub fn with_value(mut self, property: Property, raw: impl Into<String>) -> Self {
        self.values.insert(property, raw.into());
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }
}

/// 한 칸의 채점 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect { expected: f64 },
    Missing,
    Unparseable,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// 제시되지 않은 물성별 결과 (P, T, v, h, s, u 순).
    pub properties: Vec<(Property, Verdict)>,
    pub phase_correct: bool,
    /// 정답이 2상일 때만 채점한다.
    pub quality: Option<Verdict>,
    pub all_correct: bool,
}

/// 상대 오차 `|answer − truth| / |truth|`. 정답이 0이면 절대 오차를 쓴다.
pub fn relative_error(answer: f64, truth: f64) -> f64 {
    let diff = (answer - truth).abs();
    if truth == 0.0 {
        diff
    } else {
        diff / truth.abs()
    }
}

/// 문자열 앞부분에서 읽을 수 있는 가장 긴 숫자. "7.5 kJ", "7.5x"는 7.5로 읽힌다.
fn leading_number(raw: &str) -> Option<f64> {
    let numeric = raw
        .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .map_or(raw, |end| &raw[..end]);
    (1..=numeric.len())
        .rev()
        .find_map(|n| numeric[..n].parse::<f64>().ok())
}

fn grade(raw: Option<&String>, truth: f64, tolerance: f64) -> Verdict {
    let Some(raw) = raw.map(|s| s.trim()).filter(|s| !s.is_empty()) else {
        return Verdict::Missing;
    };
    match leading_number(raw) {
        Some(v) if v.is_finite() => {
            if relative_error(v, truth) <= tolerance {
                Verdict::Correct
            } else {
                Verdict::Incorrect { expected: truth }
            }
        }
        _ => Verdict::Unparseable,
    }
}

/// 답안을 채점한다. `given`에 든 물성은 건너뛴다.
pub fn check_answer(
    truth: &State,
    given: &[Property],
    sheet: &AnswerSheet,
    tolerance: f64,
) -> CheckReport {
    let properties: Vec<(Property, Verdict)> = Property::TABULATED
        .into_iter()
        .filter(|p| !given.contains(p))
        .filter_map(|p| {
            let expected = truth.property(p)?;
            Some((p, grade(sheet.values.get(&p), expected, tolerance)))
        })
        .collect();

    let phase_correct = sheet.phase == Some(truth.phase);

    let quality = match (truth.phase, truth.quality) {
        (Phase::SaturatedTwoPhase, Some(x)) => {
            Some(grade(sheet.values.get(&Property::Quality), x, tolerance))
        }
        _ => None,
    };

    let all_correct = phase_correct
        && properties.iter().all(|(_, v)| v.is_correct())
        && quality.map_or(true, |v| v.is_correct());

    CheckReport {
        properties,
        phase_correct,
        quality,
        all_correct,
    }
}
