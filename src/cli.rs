//! 명령행 인자 정의.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::CONFIG_FILE;
use crate::steam::{Diagram, GridPhase, InputPair};

#[derive(Debug, Parser)]
#[command(name = "steam_state_tables")]
#[command(about = "Table-driven water/steam state resolution and steam-table quiz", long_about = None)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

/// 곡선/상태 출력 공통 옵션.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// JSON으로 출력
    #[arg(long)]
    pub json: bool,
    /// 선도 좌표(Tv, Pv, Ts)로 투영해 출력
    #[arg(long)]
    pub diagram: Option<Diagram>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a state from two known properties (PT, Ph, Ps, Tx, Px)
    Resolve {
        pair: InputPair,
        /// First value (pressure, or temperature for Tx). Units may be appended: "1 bar"
        first: String,
        /// Second value (temperature for PT; h, s or x otherwise)
        second: String,
        #[arg(long)]
        json: bool,
    },
    /// Saturation properties at a temperature or a pressure
    Saturation {
        #[arg(long, conflicts_with = "pressure", required_unless_present = "pressure")]
        temperature: Option<String>,
        #[arg(long)]
        pressure: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Constant-pressure trace through the phase regions
    Isobar {
        pressure: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Constant-temperature trace through the phase regions
    Isotherm {
        temperature: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Saturated liquid and vapor lines with the critical point
    Dome {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Two-dimensional lookup in the single-phase grid
    Grid {
        pressure: String,
        temperature: String,
        /// Restrict to samples tagged liquid or superheated
        #[arg(long)]
        phase: Option<GridPhase>,
        #[arg(long)]
        json: bool,
    },
    /// Study tables at textbook increments
    Tables {
        #[arg(value_enum)]
        kind: StudyTable,
    },
    /// Interactive steam-table quiz
    Quiz {
        /// Number of questions
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
        /// Fixed RNG seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write the loaded tables as JSON
    Export {
        saturation_path: PathBuf,
        grid_path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StudyTable {
    /// Saturation table by temperature
    SatT,
    /// Saturation table by pressure
    SatP,
    /// Superheated vapor table
    Superheated,
}
