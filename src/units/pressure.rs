use serde::{Deserialize, Serialize};

/// 압력 단위. 증기표는 모두 절대압이므로 게이지 단위는 두지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    KiloPascal,
    Pascal,
    MegaPascal,
    /// bar(abs)
    Bar,
    /// psia
    Psi,
    Atm,
}

const KPA_PER_BAR: f64 = 100.0;
const KPA_PER_PSI: f64 = 6.894_757;
const KPA_PER_ATM: f64 = 101.325;

impl PressureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            PressureUnit::KiloPascal => "kPa",
            PressureUnit::Pascal => "Pa",
            PressureUnit::MegaPascal => "MPa",
            PressureUnit::Bar => "bar",
            PressureUnit::Psi => "psia",
            PressureUnit::Atm => "atm",
        }
    }
}

/// 주어진 압력을 kPa(abs)로 변환한다.
pub fn to_kpa(value: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::KiloPascal => value,
        PressureUnit::Pascal => value / 1000.0,
        PressureUnit::MegaPascal => value * 1000.0,
        PressureUnit::Bar => value * KPA_PER_BAR,
        PressureUnit::Psi => value * KPA_PER_PSI,
        PressureUnit::Atm => value * KPA_PER_ATM,
    }
}

/// kPa(abs) 값을 원하는 단위로 변환한다.
pub fn from_kpa(value_kpa: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::KiloPascal => value_kpa,
        PressureUnit::Pascal => value_kpa * 1000.0,
        PressureUnit::MegaPascal => value_kpa / 1000.0,
        PressureUnit::Bar => value_kpa / KPA_PER_BAR,
        PressureUnit::Psi => value_kpa / KPA_PER_PSI,
        PressureUnit::Atm => value_kpa / KPA_PER_ATM,
    }
}
