//! CLI 입력값의 단위 해석. `"1.5 bar"`, `"212F"`처럼 값 뒤에 단위를 붙일 수 있다.

use thiserror::Error;

use crate::steam::state::InputPair;
use crate::units::*;

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
    /// 숫자로 읽을 수 없는 값
    #[error("숫자가 아닙니다: {0}")]
    InvalidNumber(String),
}

pub fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "k" | "kelvin" => Ok(TemperatureUnit::Kelvin),
        "c" | "celsius" | "°c" | "degc" => Ok(TemperatureUnit::Celsius),
        "f" | "fahrenheit" | "°f" | "degf" => Ok(TemperatureUnit::Fahrenheit),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

pub fn parse_pressure_unit(s: &str) -> Result<PressureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "kpa" | "kilopascal" => Ok(PressureUnit::KiloPascal),
        "pa" | "pascal" => Ok(PressureUnit::Pascal),
        "mpa" | "megapascal" => Ok(PressureUnit::MegaPascal),
        "bar" | "bara" => Ok(PressureUnit::Bar),
        "psi" | "psia" => Ok(PressureUnit::Psi),
        "atm" => Ok(PressureUnit::Atm),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

/// 숫자 부분과 단위 부분을 나눈다. 단위가 없으면 빈 문자열.
fn split_value(input: &str) -> Result<(f64, &str), ConversionError> {
    let input = input.trim();
    let split = input
        .char_indices()
        .find(|(i, c)| c.is_alphabetic() || *c == '°' || (c.is_whitespace() && *i > 0))
        .map_or(input.len(), |(i, _)| i);
    let (number, unit) = input.split_at(split);
    // 지수 표기(1e3)의 'e'는 숫자에 포함한다
    let (number, unit) = match unit.strip_prefix(['e', 'E']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') => {
            let exp_end = rest
                .char_indices()
                .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
                .map_or(rest.len(), |(i, _)| i);
            input.split_at(number.len() + 1 + exp_end)
        }
        _ => (number, unit),
    };
    let value = number
        .trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::InvalidNumber(input.to_string()))?;
    Ok((value, unit.trim()))
}

/// 압력 문자열을 kPa(abs)로 해석한다. 단위가 없으면 `default_unit`으로 본다.
pub fn parse_pressure(input: &str, default_unit: PressureUnit) -> Result<f64, ConversionError> {
    let (value, unit) = split_value(input)?;
    let unit = if unit.is_empty() {
        default_unit
    } else {
        parse_pressure_unit(unit)?
    };
    Ok(to_kpa(value, unit))
}

/// 온도 문자열을 °C로 해석한다. 단위가 없으면 `default_unit`으로 본다.
pub fn parse_temperature(input: &str, default_unit: TemperatureUnit) -> Result<f64, ConversionError> {
    let (value, unit) = split_value(input)?;
    let unit = if unit.is_empty() {
        default_unit
    } else {
        parse_temperature_unit(unit)?
    };
    Ok(to_celsius(value, unit))
}

/// 단위 없는 물성값(h, s, x)을 읽는다.
pub fn parse_plain(input: &str) -> Result<f64, ConversionError> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::InvalidNumber(input.to_string()))
}

/// 입력 쌍의 두 값을 내부 단위(kPa, °C)로 해석한다.
pub fn parse_pair_values(
    pair: InputPair,
    first: &str,
    second: &str,
    pressure_unit: PressureUnit,
    temperature_unit: TemperatureUnit,
) -> Result<(f64, f64), ConversionError> {
    let v1 = if pair.first_is_temperature() {
        parse_temperature(first, temperature_unit)?
    } else {
        parse_pressure(first, pressure_unit)?
    };
    let v2 = if pair.second_is_temperature() {
        parse_temperature(second, temperature_unit)?
    } else {
        parse_plain(second)?
    };
    Ok((v1, v2))
}
