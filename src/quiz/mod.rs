//! 증기표 학습용 퀴즈: 무작위 상태점 출제, 답안 채점, 학습용 요약표.

pub mod checker;
pub mod generator;
pub mod study;

pub use checker::{check_answer, AnswerSheet, CheckReport, Verdict, DEFAULT_TOLERANCE};
pub use generator::{
    new_question, random_state, select_given_properties, validate_given_pair, PressureWindow,
    QuizError, QuizQuestion,
};
