//! 입력·출력 단위 정의 및 변환. 내부 기준은 kPa(절대)와 °C이다.

pub mod pressure;
pub mod temperature;

pub use pressure::{from_kpa, to_kpa, PressureUnit};
pub use temperature::{from_celsius, to_celsius, TemperatureUnit};
