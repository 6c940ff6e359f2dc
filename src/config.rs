use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::quiz::{PressureWindow, DEFAULT_TOLERANCE};
use crate::units::{PressureUnit, TemperatureUnit};

/// 기본 설정 파일 경로.
pub const CONFIG_FILE: &str = "config.toml";

/// 표 데이터를 어디서 가져올지 정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSource {
    /// IF97로 생성한 기준 표
    Reference,
    /// JSON 파일 (`saturation_path`, `grid_path`)
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub source: TableSource,
    pub saturation_path: PathBuf,
    pub grid_path: PathBuf,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            source: TableSource::Reference,
            saturation_path: PathBuf::from("data/saturation_tables.json"),
            grid_path: PathBuf::from("data/property_grid.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// 허용 상대 오차
    pub tolerance: f64,
    pub min_pressure_kpa: f64,
    pub max_pressure_kpa: f64,
    /// 고정하면 같은 문제 순서가 반복된다
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        let window = PressureWindow::default();
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_pressure_kpa: window.min_kpa,
            max_pressure_kpa: window.max_kpa,
            seed: None,
        }
    }
}

impl QuizConfig {
    pub fn window(&self) -> PressureWindow {
        PressureWindow {
            min_kpa: self.min_pressure_kpa,
            max_kpa: self.max_pressure_kpa,
        }
    }
}

/// 출력 표시 단위. CLI 입력에 단위가 없을 때의 기본 단위로도 쓴다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub pressure: PressureUnit,
    pub temperature: TemperatureUnit,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pressure: PressureUnit::KiloPascal,
            temperature: TemperatureUnit::Celsius,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// trace, debug, info, warn, error
    pub level: String,
}

impl LogConfig {
    /// 설정된 로그 수준. 알 수 없는 값이면 `None`.
    pub fn max_level(&self) -> Option<tracing::Level> {
        self.level.trim().parse().ok()
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tables: TableConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성해 저장한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        info!(path = %path.display(), "default config written");
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 지정한 경로에 TOML로 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
