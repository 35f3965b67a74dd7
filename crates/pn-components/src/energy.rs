//! Electrical power and running cost of the pump drive.
//!
//! ```text
//! P_hyd = Q·ρ·g·H                      [W]
//! P_el  = P_hyd / (η_pump·η_motor)     [W], 0 if η_pump·η_motor = 0
//! cost  = P_el[kW] · h/day · 360 · tariff
//! ```
//!
//! The year is taken as 12 months of 30 operating days. This is a policy of
//! the cost model and changes user-visible numbers if altered.

use pn_core::units::constants::{G_MPS2, S_PER_H};
use pn_core::units::{Power, kw, to_kw};
use pn_fluids::FluidProperties;

/// Operating days per year used by the cost model (12 × 30).
pub const OPERATING_DAYS_PER_YEAR: f64 = 30.0 * 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostParameters {
    /// Pump hydraulic efficiency [%]
    pub pump_efficiency_pct: f64,
    /// Motor efficiency [%]
    pub motor_efficiency_pct: f64,
    pub hours_per_day: f64,
    /// Energy tariff [currency/kWh]
    pub tariff_per_kwh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyMetrics {
    /// Electrical power drawn by the motor
    pub power: Power,
    /// Energy cost per year [currency]
    pub annual_cost: f64,
}

impl EnergyMetrics {
    pub fn power_kw(&self) -> f64 {
        to_kw(self.power)
    }
}

/// Power and annual cost at a duty point (flow in m³/h, head in m).
///
/// A zero efficiency product yields zero power instead of a division fault.
pub fn energy_metrics(
    flow_m3h: f64,
    head_m: f64,
    params: &CostParameters,
    fluid: &FluidProperties,
) -> EnergyMetrics {
    let eta = (params.pump_efficiency_pct / 100.0) * (params.motor_efficiency_pct / 100.0);

    let power_kw = if eta > 0.0 {
        let hydraulic_w = flow_m3h / S_PER_H * fluid.rho() * G_MPS2 * head_m;
        hydraulic_w / eta / 1000.0
    } else {
        0.0
    };

    let annual_cost =
        power_kw * params.hours_per_day * OPERATING_DAYS_PER_YEAR * params.tariff_per_kwh;

    EnergyMetrics {
        power: kw(power_kw),
        annual_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> FluidProperties {
        FluidProperties::new(998.2, 1.004e-6)
    }

    fn params(pump: f64, motor: f64) -> CostParameters {
        CostParameters {
            pump_efficiency_pct: pump,
            motor_efficiency_pct: motor,
            hours_per_day: 8.0,
            tariff_per_kwh: 0.75,
        }
    }

    #[test]
    fn power_matches_hand_calculation() {
        // 36 m³/h, 20 m, 998.2 kg/m³, 70% × 90%
        let m = energy_metrics(36.0, 20.0, &params(70.0, 90.0), &water());
        let expected_kw = (0.01 * 998.2 * 9.81 * 20.0) / 0.63 / 1000.0;
        assert!((m.power_kw() - expected_kw).abs() < 1e-9);
    }

    #[test]
    fn annual_cost_uses_360_day_year() {
        let m = energy_metrics(36.0, 20.0, &params(70.0, 90.0), &water());
        let expected = m.power_kw() * 8.0 * 360.0 * 0.75;
        assert!((m.annual_cost - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_pump_efficiency_gives_zero_power() {
        let m = energy_metrics(36.0, 20.0, &params(0.0, 90.0), &water());
        assert_eq!(m.power_kw(), 0.0);
        assert_eq!(m.annual_cost, 0.0);
    }

    #[test]
    fn zero_motor_efficiency_gives_zero_power() {
        let m = energy_metrics(36.0, 20.0, &params(70.0, 0.0), &water());
        assert_eq!(m.power_kw(), 0.0);
    }
}
