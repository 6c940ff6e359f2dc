use std::io::{self, Write};

use rand::Rng;

use crate::app::AppError;
use crate::config::DisplayConfig;
use crate::quiz::study::{StudyRow, SuperheatedBlock};
use crate::quiz::{AnswerSheet, CheckReport, QuizQuestion, Verdict};
use crate::steam::{
    Curve, CurveKind, Diagram, Engine, GridEntry, Phase, Property, SaturationDome,
    SaturationEntry, State,
};
use crate::units::{from_celsius, from_kpa};

/// 물성 종류별 표시 형식. 비체적은 지수 표기, 건도는 소수 넷째 자리.
pub fn format_value(property: Property, value: f64) -> String {
    match property {
        Property::SpecificVolume => format!("{value:.4e}"),
        Property::Quality => format!("{value:.4}"),
        _ => format!("{value:.2}"),
    }
}

/// kPa 값을 표시 단위로 바꿔 단위 기호와 함께 쓴다.
pub fn show_pressure(pressure_kpa: f64, units: &DisplayConfig) -> String {
    format!(
        "{:.3} {}",
        from_kpa(pressure_kpa, units.pressure),
        units.pressure.symbol()
    )
}

pub fn show_temperature(temperature_c: f64, units: &DisplayConfig) -> String {
    format!(
        "{:.2} {}",
        from_celsius(temperature_c, units.temperature),
        units.temperature.symbol()
    )
}

pub fn print_state(state: &State, units: &DisplayConfig) {
    println!("상(phase): {} [{}]", state.phase, state.phase.tag());
    println!("  P = {}", show_pressure(state.pressure_kpa, units));
    println!("  T = {}", show_temperature(state.temperature_c, units));
    for property in [
        Property::SpecificVolume,
        Property::Enthalpy,
        Property::Entropy,
        Property::InternalEnergy,
        Property::Quality,
    ] {
        match state.property(property) {
            Some(v) => println!(
                "  {} = {} {}",
                property,
                format_value(property, v),
                property.unit()
            ),
            None => println!("  {} = -", property),
        }
    }
    if state.phase == Phase::NeedsQuality {
        println!("P·T가 포화선 위에 있습니다. 건도를 함께 지정하세요 (Tx 또는 Px).");
    }
}

pub fn print_saturation(entry: &SaturationEntry, units: &DisplayConfig) {
    println!("포화 온도: {}", show_temperature(entry.temperature_c, units));
    println!("포화 압력: {}", show_pressure(entry.pressure_kpa, units));
    println!("{:>4} {:>14} {:>14}", "", "f (liquid)", "g (vapor)");
    println!("{:>4} {:>14.4e} {:>14.4e}", "v", entry.v_f, entry.v_g);
    println!("{:>4} {:>14.2} {:>14.2}", "h", entry.h_f, entry.h_g);
    println!("{:>4} {:>14.4} {:>14.4}", "s", entry.s_f, entry.s_g);
    println!("{:>4} {:>14.2} {:>14.2}", "u", entry.u_f, entry.u_g);
}

pub fn print_grid_entry(entry: &GridEntry, units: &DisplayConfig) {
    println!(
        "P = {}, T = {} ({:?})",
        show_pressure(entry.pressure_kpa, units),
        show_temperature(entry.temperature_c, units),
        entry.phase
    );
    println!("  v = {:.4e} m³/kg", entry.specific_volume);
    println!("  h = {:.2} kJ/kg", entry.enthalpy);
    println!("  s = {:.4} kJ/(kg·K)", entry.entropy);
    println!("  u = {:.2} kJ/kg", entry.internal_energy);
}

pub fn print_curve(curve: &Curve, diagram: Option<Diagram>, units: &DisplayConfig) {
    let title = match curve.kind {
        CurveKind::Isobar => format!("등압선 P = {}", show_pressure(curve.value, units)),
        CurveKind::Isotherm => format!("등온선 T = {}", show_temperature(curve.value, units)),
    };
    println!("{title} ({}점)", curve.points.len());
    if curve.points.is_empty() {
        println!("포화표 범위 밖이라 그릴 수 없습니다.");
        return;
    }
    match diagram {
        Some(d) => {
            let (x, y) = d.axis_labels();
            println!("{d}: x = {x}, y = {y}");
            if d.log_x() {
                println!("(x축은 로그 눈금)");
            }
            for p in &curve.points {
                let (px, py) = d.project(p);
                println!("{px:>14.6e} {py:>12.3}");
            }
        }
        None => {
            println!(
                "{:>10} {:>12} {:>14} {:>10}",
                format!("T ({})", units.temperature.symbol()),
                format!("P ({})", units.pressure.symbol()),
                "v (m³/kg)",
                "s"
            );
            for p in &curve.points {
                println!(
                    "{:>10.2} {:>12.3} {:>14.4e} {:>10.4}",
                    from_celsius(p.temperature_c, units.temperature),
                    from_kpa(p.pressure_kpa, units.pressure),
                    p.specific_volume,
                    p.entropy
                );
            }
        }
    }
}

pub fn print_dome(dome: &SaturationDome, diagram: Option<Diagram>) {
    let d = diagram.unwrap_or(Diagram::Tv);
    let (x, y) = d.axis_labels();
    println!("포화 돔 ({d}): x = {x}, y = {y}");
    println!("{:>14} {:>12} {:>14} {:>12}", "x_f", "y_f", "x_g", "y_g");
    for (f, g) in dome.liquid.iter().zip(&dome.vapor) {
        let (xf, yf) = d.project(f);
        let (xg, yg) = d.project(g);
        println!("{xf:>14.6e} {yf:>12.3} {xg:>14.6e} {yg:>12.3}");
    }
    let (xc, yc) = d.project(&dome.critical);
    println!("임계점: ({xc:.6e}, {yc:.3})");
}

pub fn print_saturation_study(key_label: &str, rows: &[StudyRow<SaturationEntry>]) {
    println!(
        "{:>10} {:>10} {:>11} {:>11} {:>9} {:>9} {:>8} {:>8}",
        key_label, "other", "v_f", "v_g", "h_f", "h_g", "s_f", "s_g"
    );
    let by_temperature = key_label.starts_with('T');
    for row in rows {
        let e = &row.entry;
        let other = if by_temperature {
            e.pressure_kpa
        } else {
            e.temperature_c
        };
        println!(
            "{:>10.0} {:>10.2} {:>11.3e} {:>11.3e} {:>9.1} {:>9.1} {:>8.4} {:>8.4}",
            row.target, other, e.v_f, e.v_g, e.h_f, e.h_g, e.s_f, e.s_g
        );
    }
}

pub fn print_superheated_study(blocks: &[SuperheatedBlock]) {
    for block in blocks {
        match block.saturation_temperature_c {
            Some(t_sat) => println!("P = {:.0} kPa (T_sat = {t_sat:.1}°C)", block.target_kpa),
            None => println!("P = {:.0} kPa", block.target_kpa),
        }
        for row in &block.rows {
            let e = &row.entry;
            println!(
                "{:>8.0} {:>11.3e} {:>9.1} {:>8.4} {:>9.1}",
                row.target, e.specific_volume, e.enthalpy, e.entropy, e.internal_energy
            );
        }
    }
}

fn print_question(question: &QuizQuestion) {
    println!("\n주어진 물성:");
    for property in question.given {
        if let Some(v) = question.truth.property(property) {
            println!("  {} = {} {}", property, format_value(property, v), property.unit());
        }
    }
}

fn print_report(report: &CheckReport) {
    for (property, verdict) in &report.properties {
        println!("  {}: {}", property, describe(*property, verdict));
    }
    if let Some(verdict) = &report.quality {
        println!("  x: {}", describe(Property::Quality, verdict));
    }
    println!("  상(phase): {}", if report.phase_correct { "정답" } else { "오답" });
}

fn describe(property: Property, verdict: &Verdict) -> String {
    match verdict {
        Verdict::Correct => "정답".to_string(),
        Verdict::Incorrect { expected } => {
            format!("오답 (정답 {})", format_value(property, *expected))
        }
        Verdict::Missing => "미입력".to_string(),
        Verdict::Unparseable => "숫자가 아님".to_string(),
    }
}

/// 대화형 퀴즈. 문제마다 빈 칸과 상을 입력받아 채점한다.
pub fn run_quiz<R: Rng + ?Sized>(
    engine: &Engine,
    rng: &mut R,
    count: usize,
    tolerance: f64,
) -> Result<(), AppError> {
    println!("\n=== Steam Property Quiz === (허용 오차 ±{:.1}%)", tolerance * 100.0);
    let mut score = 0;
    for n in 1..=count {
        let question = engine.new_question(rng)?;
        println!("\n[{n}/{count}]");
        print_question(&question);

        let mut sheet = AnswerSheet::default();
        for property in question.asked() {
            let raw = read_line(&format!("{} [{}]: ", property, property.unit()))?;
            sheet.values.insert(property, raw.trim().to_string());
        }
        sheet.phase = read_phase()?;
        if sheet.phase == Some(Phase::SaturatedTwoPhase) {
            let raw = read_line("x [-]: ")?;
            sheet.values.insert(Property::Quality, raw.trim().to_string());
        }

        let report = engine.check_answer(&question.truth, &question.given, &sheet, tolerance);
        print_report(&report);
        if report.all_correct {
            score += 1;
            println!("모두 정답입니다!");
        } else {
            println!("정답 상태:");
            // 퀴즈는 표 단위(kPa, °C)로 진행한다
            print_state(&question.truth, &DisplayConfig::default());
        }
    }
    println!("\n점수: {score}/{count}");
    Ok(())
}

fn read_phase() -> Result<Option<Phase>, AppError> {
    loop {
        let s = read_line("상 (subcooled / saturated / superheated): ")?;
        if s.trim().is_empty() {
            return Ok(None);
        }
        match Phase::parse(&s) {
            Some(phase) => return Ok(Some(phase)),
            None => println!("알 수 없는 상입니다. 다시 입력하세요."),
        }
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf)
}
