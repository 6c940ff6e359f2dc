use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::cli::{Commands, OutputArgs, StudyTable};
use crate::config::{Config, ConfigError, DisplayConfig, TableSource};
use crate::conversion::{self, ConversionError};
use crate::quiz::{study, QuizError};
use crate::steam::{Engine, ResolveError, TableError};
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 단위 변환 오류
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] ConversionError),
    /// 표 로드/생성 오류
    #[error("증기표 오류: {0}")]
    Table(#[from] TableError),
    /// 상태 해석 오류
    #[error("상태 해석 오류: {0}")]
    Resolve(#[from] ResolveError),
    /// 퀴즈 출제 오류
    #[error("퀴즈 오류: {0}")]
    Quiz(#[from] QuizError),
    /// JSON 출력 오류
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 표 범위 밖 조회
    #[error("{0}")]
    NotFound(String),
}

/// 설정에 따라 표를 준비하고 엔진을 만든다.
pub fn build_engine(config: &Config) -> Result<Engine, AppError> {
    let engine = match config.tables.source {
        TableSource::Reference => Engine::reference()?,
        TableSource::Json => {
            Engine::from_json_files(&config.tables.saturation_path, &config.tables.grid_path)?
        }
    };
    Ok(engine.with_quiz_window(config.quiz.window()))
}

/// 명령 하나를 실행한다.
pub fn run(config: &Config, command: Commands) -> Result<(), AppError> {
    let engine = build_engine(config)?;
    let units = &config.display;
    let p_unit = units.pressure;
    let t_unit = units.temperature;
    debug!(?command, "dispatching command");

    match command {
        Commands::Resolve {
            pair,
            first,
            second,
            json,
        } => {
            let (v1, v2) = conversion::parse_pair_values(pair, &first, &second, p_unit, t_unit)?;
            let state = engine.resolve(pair, v1, v2)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                ui_cli::print_state(&state, units);
            }
        }
        Commands::Saturation {
            temperature,
            pressure,
            json,
        } => {
            let entry = match (temperature, pressure) {
                (Some(t), _) => {
                    let t = conversion::parse_temperature(&t, t_unit)?;
                    engine
                        .saturation_by_temperature(t)
                        .ok_or_else(|| outside_saturation(format!("{t} °C")))?
                }
                (None, Some(p)) => {
                    let p = conversion::parse_pressure(&p, p_unit)?;
                    engine
                        .saturation_by_pressure(p)
                        .ok_or_else(|| outside_saturation(format!("{p} kPa")))?
                }
                (None, None) => {
                    return Err(AppError::NotFound("온도나 압력을 지정하세요".into()));
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                ui_cli::print_saturation(&entry, units);
            }
        }
        Commands::Isobar { pressure, output } => {
            let p = conversion::parse_pressure(&pressure, p_unit)?;
            let curve = engine.isobar(p)?;
            emit_curve(&curve, &output, units)?;
        }
        Commands::Isotherm {
            temperature,
            output,
        } => {
            let t = conversion::parse_temperature(&temperature, t_unit)?;
            let curve = engine.isotherm(t);
            if curve.points.is_empty() {
                info!(temperature_c = t, "isotherm outside saturation table");
            }
            emit_curve(&curve, &output, units)?;
        }
        Commands::Dome { output } => {
            let dome = engine.dome();
            match (output.json, output.diagram) {
                (true, None) => println!("{}", serde_json::to_string_pretty(&dome)?),
                (true, Some(d)) => {
                    let liquid: Vec<_> = dome.liquid.iter().map(|p| d.project(p)).collect();
                    let vapor: Vec<_> = dome.vapor.iter().map(|p| d.project(p)).collect();
                    let value = serde_json::json!({
                        "diagram": d.to_string(),
                        "log_x": d.log_x(),
                        "liquid": liquid,
                        "vapor": vapor,
                        "critical": d.project(&dome.critical),
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                (false, diagram) => ui_cli::print_dome(&dome, diagram),
            }
        }
        Commands::Grid {
            pressure,
            temperature,
            phase,
            json,
        } => {
            let p = conversion::parse_pressure(&pressure, p_unit)?;
            let t = conversion::parse_temperature(&temperature, t_unit)?;
            let entry = engine.grid_lookup(p, t, phase).ok_or_else(|| {
                AppError::NotFound(format!("격자에서 {p} kPa, {t} °C 구간을 찾지 못했습니다"))
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                ui_cli::print_grid_entry(&entry, units);
            }
        }
        Commands::Tables { kind } => match kind {
            StudyTable::SatT => {
                ui_cli::print_saturation_study(
                    "T (°C)",
                    &study::saturation_by_temperature(&engine.tables().saturation),
                );
            }
            StudyTable::SatP => {
                ui_cli::print_saturation_study(
                    "P (kPa)",
                    &study::saturation_by_pressure(&engine.tables().saturation),
                );
            }
            StudyTable::Superheated => {
                ui_cli::print_superheated_study(&study::superheated(engine.tables()));
            }
        },
        Commands::Quiz { count, seed } => {
            let mut rng = match seed.or(config.quiz.seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            ui_cli::run_quiz(&engine, &mut rng, count, config.quiz.tolerance)?;
        }
        Commands::Export {
            saturation_path,
            grid_path,
        } => {
            engine.tables().save_json(&saturation_path, &grid_path)?;
            info!(
                saturation = %saturation_path.display(),
                grid = %grid_path.display(),
                "tables exported"
            );
        }
    }
    Ok(())
}

fn outside_saturation(what: String) -> AppError {
    AppError::NotFound(format!("{what} 은(는) 포화표 범위 밖입니다"))
}

fn emit_curve(
    curve: &crate::steam::Curve,
    output: &OutputArgs,
    units: &DisplayConfig,
) -> Result<(), AppError> {
    match (output.json, output.diagram) {
        (true, None) => println!("{}", serde_json::to_string_pretty(curve)?),
        (true, Some(d)) => {
            let points: Vec<_> = curve.points.iter().map(|p| d.project(p)).collect();
            let value = serde_json::json!({
                "diagram": d.to_string(),
                "log_x": d.log_x(),
                "kind": curve.kind,
                "value": curve.value,
                "points": points,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        (false, diagram) => ui_cli::print_curve(curve, diagram, units),
    }
    Ok(())
}
