//! IAPWS-IF97 계산을 seuif97 크레이트로 위임한 래퍼.
//! 입력: 압력(kPa, 절대), 온도(°C)
//! 출력: [`If97Props`] (v[m³/kg], h[kJ/kg], s[kJ/kg·K], u[kJ/kg])
//!
//! 참조 물성표를 만들 때만 쓰인다. 상태 해석은 항상 표 보간으로 한다.

use seuif97::{pt, tx, OH, OS, OV};

use super::KELVIN_OFFSET;

// ---------------- Region 4 (포화) ----------------
const P4_STAR_KPA: f64 = 22_064.0;
const T4_STAR_K: f64 = 647.096;
const R4_N: [f64; 6] = [
    -7.859_517_83,
    1.844_082_59,
    -11.786_649_7,
    22.680_741_1,
    -15.961_871_9,
    1.801_225_02,
];

const RANGE_ERR: &str = "IF97 계산 실패(유효 범위 밖이거나 수렴 실패)";

/// 한 상태점의 IF97 물성.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct If97Props {
    pub specific_volume: f64,
    pub enthalpy: f64,
    pub entropy: f64,
    pub internal_energy: f64,
}

impl If97Props {
    /// u = h − P·v (kPa·m³/kg = kJ/kg)
    fn from_hvs(pressure_kpa: f64, h: f64, v: f64, s: f64) -> Result<Self, &'static str> {
        if !(h.is_finite() && v.is_finite() && s.is_finite()) || v <= 0.0 {
            return Err(RANGE_ERR);
        }
        Ok(Self {
            specific_volume: v,
            enthalpy: h,
            entropy: s,
            internal_energy: h - pressure_kpa * v,
        })
    }
}

/// 온도(°C)·압력(kPa abs)에 따라 자동 영역을 판정해 물성을 반환한다.
pub fn region_props(p_kpa: f64, t_c: f64) -> Result<If97Props, &'static str> {
    let p_mpa = p_kpa / 1000.0;
    let h = pt(p_mpa, t_c, OH);
    let v = pt(p_mpa, t_c, OV);
    let s = pt(p_mpa, t_c, OS);
    If97Props::from_hvs(p_kpa, h, v, s)
}

/// 포화 온도(°C)에서 건도 `x`인 상태의 물성. x = 0이면 포화액, 1이면 포화증기.
pub fn saturated_props(t_c: f64, x: f64) -> Result<If97Props, &'static str> {
    let p_kpa = saturation_pressure_kpa(t_c)?;
    let h = tx(t_c, x, OH);
    let v = tx(t_c, x, OV);
    let s = tx(t_c, x, OS);
    If97Props::from_hvs(p_kpa, h, v, s)
}

fn region4_exponent(t_k: f64) -> f64 {
    let theta = 1.0 - t_k / T4_STAR_K;
    (T4_STAR_K / t_k)
        * (R4_N[0] * theta
            + R4_N[1] * theta.powf(1.5)
            + R4_N[2] * theta.powi(3)
            + R4_N[3] * theta.powf(3.5)
            + R4_N[4] * theta.powi(4)
            + R4_N[5] * theta.powf(7.5))
}

/// 포화압력(kPa abs) - 입력 온도는 °C.
pub fn saturation_pressure_kpa(t_c: f64) -> Result<f64, &'static str> {
    let t_k = t_c + KELVIN_OFFSET;
    if t_k <= 0.0 || t_k > T4_STAR_K {
        return Err("IF97 Region4 유효 범위를 벗어났습니다 (0~374°C)");
    }
    Ok(P4_STAR_KPA * region4_exponent(t_k).exp())
}

/// 포화온도(°C) - 입력 압력은 kPa abs. Newton 반복.
pub fn saturation_temperature_c(p_kpa: f64) -> Result<f64, &'static str> {
    if p_kpa <= 0.0 {
        return Err("압력은 양수여야 합니다.");
    }
    if p_kpa > P4_STAR_KPA {
        return Err("임계 압력보다 높은 압력에는 포화온도가 없습니다.");
    }
    let target = (p_kpa / P4_STAR_KPA).ln();
    let mut t_k = 373.15_f64;
    for _ in 0..30 {
        let theta = 1.0 - t_k / T4_STAR_K;
        let f = region4_exponent(t_k) - target;
        let dtheta_dt = -1.0 / T4_STAR_K;
        let dfdtheta = R4_N[0]
            + 1.5 * R4_N[1] * theta.powf(0.5)
            + 3.0 * R4_N[2] * theta.powi(2)
            + 3.5 * R4_N[3] * theta.powf(2.5)
            + 4.0 * R4_N[4] * theta.powi(3)
            + 7.5 * R4_N[5] * theta.powf(6.5);
        let dfd_t = -(region4_exponent(t_k) / t_k) + (T4_STAR_K / t_k) * dfdtheta * dtheta_dt;
        let delta = f / dfd_t;
        t_k -= delta;
        if !t_k.is_finite() {
            return Err(RANGE_ERR);
        }
        if delta.abs() < 1e-8 {
            break;
        }
    }
    Ok(t_k - KELVIN_OFFSET)
}
