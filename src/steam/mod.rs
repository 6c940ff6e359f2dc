//! 물/증기 상태 해석 모듈 모음.

pub mod curves;
pub mod engine;
pub mod if97;
pub mod interpolate;
pub mod phase;
pub mod reference;
pub mod resolver;
pub mod state;
pub mod tables;

/// 섭씨 → 켈빈 오프셋.
pub const KELVIN_OFFSET: f64 = 273.15;

pub use curves::{Curve, CurveKind, CurvePoint, Diagram, SaturationDome};
pub use engine::Engine;
pub use phase::Phase;
pub use resolver::ResolveError;
pub use state::{InputPair, Property, State};
pub use tables::{
    GridEntry, GridPhase, PropertyGrid, SaturationEntry, SaturationTable, TableError, TableStore,
};
