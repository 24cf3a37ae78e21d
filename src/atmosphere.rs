//! Atmospheric conditions for ballistics.
//!
//! Air density is reported as a factor relative to the standard density the
//! drag tables are scaled for. Conditions at altitudes away from the station
//! follow the ICAO lapse rate and barometric formula.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ATMOSPHERE_REUSE_BAND_FT, DEFAULT_HUMIDITY, DEFAULT_PRESSURE_INHG, DEFAULT_TEMPERATURE_F,
    ICAO_FREEZING_POINT_R, ICAO_STANDARD_HUMIDITY, ICAO_STANDARD_TEMPERATURE_R, PRESSURE_EXPONENT,
    SPEED_OF_SOUND_FACTOR, STANDARD_DENSITY_LB_FT3, STANDARD_PRESSURE_INHG,
    TEMPERATURE_GRADIENT_F_PER_FT, VAPOR_PRESSURE_COEFFICIENTS, VAPOR_PRESSURE_SCALE,
};
use crate::error::{BallisticsError, Result};
use crate::units::{
    Distance, DistanceUnit, Pressure, PressureUnit, Temperature, TemperatureUnit, Velocity,
    VelocityUnit,
};

/// Density factor and speed of sound for a temperature / pressure / humidity.
///
/// # Arguments
/// * `temperature_f` - Temperature in °F
/// * `pressure_inhg` - Pressure in inHg
/// * `humidity` - Relative humidity as a fraction (0-1)
///
/// # Returns
/// Tuple of (density_factor, speed_of_sound_fps)
pub fn calculate_atmosphere(temperature_f: f64, pressure_inhg: f64, humidity: f64) -> (f64, f64) {
    let hc = if temperature_f > 0.0 {
        let [a0, a1, a2, a3, a4] = VAPOR_PRESSURE_COEFFICIENTS;
        let t = temperature_f;
        let et0 = a0 + t * (a1 + t * (a2 + t * (a3 + t * a4)));
        let et = VAPOR_PRESSURE_SCALE * humidity * et0;
        (pressure_inhg - 0.3783 * et) / STANDARD_PRESSURE_INHG
    } else {
        1.0
    };

    let temperature_r = temperature_f + ICAO_FREEZING_POINT_R;
    let density = STANDARD_DENSITY_LB_FT3 * (ICAO_STANDARD_TEMPERATURE_R / temperature_r) * hc;
    let speed_of_sound = temperature_r.sqrt() * SPEED_OF_SOUND_FACTOR;

    (density / STANDARD_DENSITY_LB_FT3, speed_of_sound)
}

/// Atmosphere at the shooting station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AtmosphereFields")]
pub struct Atmosphere {
    altitude: Distance,
    pressure: Pressure,
    temperature: Temperature,
    /// Fraction 0-1
    humidity: f64,
}

#[derive(Deserialize)]
struct AtmosphereFields {
    altitude: Distance,
    pressure: Pressure,
    temperature: Temperature,
    humidity: f64,
}

impl TryFrom<AtmosphereFields> for Atmosphere {
    type Error = BallisticsError;

    fn try_from(f: AtmosphereFields) -> Result<Self> {
        Atmosphere::new(f.altitude, f.pressure, f.temperature, f.humidity)
    }
}

impl Default for Atmosphere {
    /// Sea level, 29.95 inHg, 59 °F, 78 % humidity
    fn default() -> Self {
        Self {
            altitude: Distance::feet(0.0),
            pressure: Pressure::new(DEFAULT_PRESSURE_INHG, PressureUnit::InHg),
            temperature: Temperature::fahrenheit(DEFAULT_TEMPERATURE_F),
            humidity: DEFAULT_HUMIDITY,
        }
    }
}

impl Atmosphere {
    /// Create station conditions.
    ///
    /// Humidity is accepted either as a fraction (0-1) or as a percentage
    /// (above 1 and up to 100).
    pub fn new(
        altitude: Distance,
        pressure: Pressure,
        temperature: Temperature,
        humidity: f64,
    ) -> Result<Self> {
        if !(0.0..=100.0).contains(&humidity) {
            return Err(BallisticsError::invalid(format!(
                "humidity must be between 0 and 100%, got {humidity}"
            )));
        }
        let humidity = if humidity > 1.0 { humidity / 100.0 } else { humidity };

        if !(pressure.value().is_finite() && pressure.value() > 0.0) {
            return Err(BallisticsError::invalid(format!("pressure must be positive, got {pressure}")));
        }
        if temperature.get_in(TemperatureUnit::Rankine) <= 0.0 {
            return Err(BallisticsError::invalid(format!(
                "temperature must be above absolute zero, got {temperature}"
            )));
        }
        if !altitude.value().is_finite() {
            return Err(BallisticsError::invalid("altitude must be finite"));
        }

        Ok(Self { altitude, pressure, temperature, humidity })
    }

    /// ICAO standard atmosphere at `altitude`
    pub fn icao(altitude: Distance) -> Self {
        let temperature_f = ICAO_STANDARD_TEMPERATURE_R
            + altitude.get_in(DistanceUnit::Foot) * TEMPERATURE_GRADIENT_F_PER_FT
            - ICAO_FREEZING_POINT_R;
        let pressure_inhg = STANDARD_PRESSURE_INHG
            * (ICAO_STANDARD_TEMPERATURE_R / (temperature_f + ICAO_FREEZING_POINT_R))
                .powf(PRESSURE_EXPONENT);

        Self {
            altitude,
            pressure: Pressure::new(pressure_inhg, PressureUnit::InHg),
            temperature: Temperature::fahrenheit(temperature_f),
            humidity: ICAO_STANDARD_HUMIDITY,
        }
    }

    pub fn altitude(&self) -> Distance {
        self.altitude
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Relative humidity as a fraction
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Station air density relative to the standard density
    pub fn density_factor(&self) -> f64 {
        self.station().density_factor
    }

    /// Station speed of sound
    pub fn speed_of_sound(&self) -> Velocity {
        Velocity::new(self.station().speed_of_sound_fps, VelocityUnit::Fps)
    }

    /// Conditions at the station altitude
    pub fn station(&self) -> AirConditions {
        let (density_factor, speed_of_sound_fps) = calculate_atmosphere(
            self.temperature.get_in(TemperatureUnit::Fahrenheit),
            self.pressure.get_in(PressureUnit::InHg),
            self.humidity,
        );
        AirConditions { density_factor, speed_of_sound_fps }
    }

    /// Profile with the station conditions precomputed, for repeated lookups
    pub fn profile(&self) -> AtmosphereProfile {
        AtmosphereProfile {
            altitude_ft: self.altitude.get_in(DistanceUnit::Foot),
            temperature_r: self.temperature.get_in(TemperatureUnit::Rankine),
            pressure_inhg: self.pressure.get_in(PressureUnit::InHg),
            humidity: self.humidity,
            station: self.station(),
        }
    }
}

/// Air properties the integrator needs at one point of the flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirConditions {
    pub density_factor: f64,
    pub speed_of_sound_fps: f64,
}

/// Station atmosphere prepared for per-step lookups
#[derive(Debug, Clone, Copy)]
pub struct AtmosphereProfile {
    altitude_ft: f64,
    temperature_r: f64,
    pressure_inhg: f64,
    humidity: f64,
    station: AirConditions,
}

impl AtmosphereProfile {
    /// Conditions at an absolute altitude (ft).
    ///
    /// Within 30 ft of the station the station values are returned unchanged.
    pub fn at_altitude(&self, altitude_ft: f64) -> AirConditions {
        let delta = altitude_ft - self.altitude_ft;
        if delta.abs() < ATMOSPHERE_REUSE_BAND_FT {
            return self.station;
        }

        let t = self.temperature_r + delta * TEMPERATURE_GRADIENT_F_PER_FT;
        let p = self.pressure_inhg * (self.temperature_r / t).powf(PRESSURE_EXPONENT);
        let (density_factor, speed_of_sound_fps) =
            calculate_atmosphere(t - ICAO_FREEZING_POINT_R, p, self.humidity);
        AirConditions { density_factor, speed_of_sound_fps }
    }

    /// Conditions at a height above the station (ft)
    #[inline]
    pub fn at_height(&self, height_ft: f64) -> AirConditions {
        self.at_altitude(self.altitude_ft + height_ft)
    }

    pub fn station(&self) -> AirConditions {
        self.station
    }
}
