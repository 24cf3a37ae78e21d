//! Physical units used by the configuration records and trajectory output.
//!
//! Every quantity keeps the value and unit it was created with and converts
//! on demand, so a distance entered in yards reads back exactly in yards.
//! Serialized form is `{ value = 100.0, unit = "yard" }`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Defines a quantity whose units differ by a constant factor.
macro_rules! linear_quantity {
    (
        $(#[$qmeta:meta])*
        $quantity:ident, $unit:ident {
            $($(#[$vmeta:meta])* $variant:ident => ($factor:expr, $symbol:expr)),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $unit {
            $($(#[$vmeta])* $variant),+
        }

        impl $unit {
            /// Size of one unit expressed in the base unit
            pub fn factor(self) -> f64 {
                match self {
                    $($unit::$variant => $factor),+
                }
            }

            pub fn symbol(self) -> &'static str {
                match self {
                    $($unit::$variant => $symbol),+
                }
            }
        }

        $(#[$qmeta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $quantity {
            value: f64,
            unit: $unit,
        }

        impl $quantity {
            pub fn new(value: f64, unit: $unit) -> Self {
                Self { value, unit }
            }

            /// Value in the units the quantity was created with
            pub fn value(&self) -> f64 {
                self.value
            }

            pub fn unit(&self) -> $unit {
                self.unit
            }

            /// Value expressed in `unit`
            pub fn get_in(&self, unit: $unit) -> f64 {
                if unit == self.unit {
                    self.value
                } else {
                    self.value * self.unit.factor() / unit.factor()
                }
            }

            /// Same quantity re-expressed in `unit`
            pub fn convert(&self, unit: $unit) -> Self {
                Self::new(self.get_in(unit), unit)
            }
        }

        impl fmt::Display for $quantity {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", self.value, self.unit.symbol())
            }
        }
    };
}

linear_quantity! {
    /// Length or distance. Base unit: inch.
    Distance, DistanceUnit {
        Inch => (1.0, "in"),
        Foot => (12.0, "ft"),
        Yard => (36.0, "yd"),
        Mile => (63_360.0, "mi"),
        NauticalMile => (72_913.385_826_8, "nm"),
        Millimeter => (1.0 / 25.4, "mm"),
        Centimeter => (10.0 / 25.4, "cm"),
        Meter => (1_000.0 / 25.4, "m"),
        Kilometer => (1_000_000.0 / 25.4, "km"),
    }
}

linear_quantity! {
    /// Speed. Base unit: meter per second.
    Velocity, VelocityUnit {
        Mps => (1.0, "m/s"),
        Kmh => (1.0 / 3.6, "km/h"),
        Fps => (0.3048, "ft/s"),
        Mph => (0.44704, "mph"),
        Knot => (1_852.0 / 3_600.0, "kt"),
    }
}

linear_quantity! {
    /// Mass of a projectile. Base unit: grain.
    Weight, WeightUnit {
        Grain => (1.0, "gr"),
        Ounce => (437.5, "oz"),
        Gram => (15.432_358_4, "g"),
        Pound => (7_000.0, "lb"),
        Kilogram => (15_432.358_4, "kg"),
    }
}

linear_quantity! {
    /// Barometric pressure. Base unit: millimeter of mercury.
    Pressure, PressureUnit {
        #[serde(rename = "mmhg")]
        MmHg => (1.0, "mmHg"),
        #[serde(rename = "inhg")]
        InHg => (25.4, "inHg"),
        Bar => (750.061_683, "bar"),
        #[serde(rename = "hpa")]
        HPa => (0.750_061_683, "hPa"),
        Psi => (51.714_924, "psi"),
    }
}

linear_quantity! {
    /// Kinetic energy. Base unit: foot-pound.
    Energy, EnergyUnit {
        FootPound => (1.0, "ft·lb"),
        Joule => (0.737_562_149, "J"),
    }
}

impl Distance {
    pub fn inches(value: f64) -> Self {
        Self::new(value, DistanceUnit::Inch)
    }

    pub fn feet(value: f64) -> Self {
        Self::new(value, DistanceUnit::Foot)
    }

    pub fn yards(value: f64) -> Self {
        Self::new(value, DistanceUnit::Yard)
    }

    pub fn meters(value: f64) -> Self {
        Self::new(value, DistanceUnit::Meter)
    }
}

impl Velocity {
    pub fn fps(value: f64) -> Self {
        Self::new(value, VelocityUnit::Fps)
    }

    pub fn mps(value: f64) -> Self {
        Self::new(value, VelocityUnit::Mps)
    }
}

impl Weight {
    pub fn grains(value: f64) -> Self {
        Self::new(value, WeightUnit::Grain)
    }
}

// Temperature scales are offset from each other, so conversions go through
// degrees Fahrenheit explicitly.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
    Kelvin,
    Rankine,
}

impl TemperatureUnit {
    fn to_fahrenheit(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => value,
            TemperatureUnit::Celsius => value * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => (value - 273.15) * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Rankine => value - 459.67,
        }
    }

    fn from_fahrenheit(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => value,
            TemperatureUnit::Celsius => (value - 32.0) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => (value - 32.0) * 5.0 / 9.0 + 273.15,
            TemperatureUnit::Rankine => value + 459.67,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Rankine => "°R",
        }
    }
}

/// Air temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    value: f64,
    unit: TemperatureUnit,
}

impl Temperature {
    pub fn new(value: f64, unit: TemperatureUnit) -> Self {
        Self { value, unit }
    }

    pub fn fahrenheit(value: f64) -> Self {
        Self::new(value, TemperatureUnit::Fahrenheit)
    }

    pub fn celsius(value: f64) -> Self {
        Self::new(value, TemperatureUnit::Celsius)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn get_in(&self, unit: TemperatureUnit) -> f64 {
        if unit == self.unit {
            self.value
        } else {
            unit.from_fahrenheit(self.unit.to_fahrenheit(self.value))
        }
    }

    pub fn convert(&self, unit: TemperatureUnit) -> Self {
        Self::new(self.get_in(unit), unit)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.symbol())
    }
}

/// Angular units, including the linear-at-range units used on scope turrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngularUnit {
    Radian,
    Degree,
    /// Minute of angle
    Moa,
    /// NATO mil, 1/6400 of a turn
    Mil,
    /// Milliradian
    Mrad,
    /// 1/6000 of a turn
    Thousand,
    /// Inches subtended at 100 yards
    InchesPer100Yd,
    /// Centimeters subtended at 100 meters
    CmPer100M,
}

impl AngularUnit {
    fn to_radians(self, value: f64) -> f64 {
        match self {
            AngularUnit::Radian => value,
            AngularUnit::Degree => value * PI / 180.0,
            AngularUnit::Moa => value * PI / (180.0 * 60.0),
            AngularUnit::Mil => value * 2.0 * PI / 6400.0,
            AngularUnit::Mrad => value / 1000.0,
            AngularUnit::Thousand => value * 2.0 * PI / 6000.0,
            AngularUnit::InchesPer100Yd => (value / 3600.0).atan(),
            AngularUnit::CmPer100M => (value / 10_000.0).atan(),
        }
    }

    fn from_radians(self, value: f64) -> f64 {
        match self {
            AngularUnit::Radian => value,
            AngularUnit::Degree => value * 180.0 / PI,
            AngularUnit::Moa => value * 180.0 * 60.0 / PI,
            AngularUnit::Mil => value * 6400.0 / (2.0 * PI),
            AngularUnit::Mrad => value * 1000.0,
            AngularUnit::Thousand => value * 6000.0 / (2.0 * PI),
            AngularUnit::InchesPer100Yd => value.tan() * 3600.0,
            AngularUnit::CmPer100M => value.tan() * 10_000.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AngularUnit::Radian => "rad",
            AngularUnit::Degree => "°",
            AngularUnit::Moa => "moa",
            AngularUnit::Mil => "mil",
            AngularUnit::Mrad => "mrad",
            AngularUnit::Thousand => "ths",
            AngularUnit::InchesPer100Yd => "in/100yd",
            AngularUnit::CmPer100M => "cm/100m",
        }
    }
}

/// An angle: sight angle, look angle, cant, wind direction or adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angular {
    value: f64,
    unit: AngularUnit,
}

impl Angular {
    pub fn new(value: f64, unit: AngularUnit) -> Self {
        Self { value, unit }
    }

    pub fn radians(value: f64) -> Self {
        Self::new(value, AngularUnit::Radian)
    }

    pub fn degrees(value: f64) -> Self {
        Self::new(value, AngularUnit::Degree)
    }

    pub fn moa(value: f64) -> Self {
        Self::new(value, AngularUnit::Moa)
    }

    pub fn zero() -> Self {
        Self::radians(0.0)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> AngularUnit {
        self.unit
    }

    pub fn get_in(&self, unit: AngularUnit) -> f64 {
        if unit == self.unit {
            self.value
        } else {
            unit.from_radians(self.unit.to_radians(self.value))
        }
    }

    pub fn convert(&self, unit: AngularUnit) -> Self {
        Self::new(self.get_in(unit), unit)
    }
}

impl Default for Angular {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Angular {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_conversions() {
        let d = Distance::yards(100.0);
        assert_relative_eq!(d.get_in(DistanceUnit::Foot), 300.0, epsilon = 1e-9);
        assert_relative_eq!(d.get_in(DistanceUnit::Inch), 3600.0, epsilon = 1e-9);
        assert_relative_eq!(d.get_in(DistanceUnit::Meter), 91.44, epsilon = 1e-9);

        let mm = Distance::new(119.56, DistanceUnit::Millimeter);
        assert_relative_eq!(mm.get_in(DistanceUnit::Inch), 4.707_086_6, epsilon = 1e-6);
    }

    #[test]
    fn test_same_unit_is_exact() {
        // No factor round trip when reading back in the creation unit
        let d = Distance::new(0.1, DistanceUnit::Centimeter);
        assert_eq!(d.get_in(DistanceUnit::Centimeter), 0.1);
    }

    #[test]
    fn test_velocity_conversions() {
        assert_relative_eq!(Velocity::fps(1000.0).get_in(VelocityUnit::Mps), 304.8, epsilon = 1e-9);
        let wind = Velocity::new(5.0, VelocityUnit::Mph);
        assert_relative_eq!(wind.get_in(VelocityUnit::Fps), 7.333_333, epsilon = 1e-5);
        assert_relative_eq!(Velocity::mps(10.0).get_in(VelocityUnit::Kmh), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn test_weight_and_energy() {
        assert_relative_eq!(Weight::grains(7000.0).get_in(WeightUnit::Pound), 1.0, epsilon = 1e-12);
        let shell = Weight::new(13_585.0, WeightUnit::Gram);
        assert_relative_eq!(shell.get_in(WeightUnit::Pound), 29.950, epsilon = 1e-3);

        let e = Energy::new(1000.0, EnergyUnit::Joule);
        assert_relative_eq!(e.get_in(EnergyUnit::FootPound), 737.562_149, epsilon = 1e-6);
    }

    #[test]
    fn test_temperature_conversions() {
        let t = Temperature::fahrenheit(59.0);
        assert_relative_eq!(t.get_in(TemperatureUnit::Celsius), 15.0, epsilon = 1e-12);
        assert_relative_eq!(t.get_in(TemperatureUnit::Rankine), 518.67, epsilon = 1e-9);
        assert_relative_eq!(t.get_in(TemperatureUnit::Kelvin), 288.15, epsilon = 1e-9);
        assert_relative_eq!(
            Temperature::celsius(-40.0).get_in(TemperatureUnit::Fahrenheit),
            -40.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_pressure_conversions() {
        let p = Pressure::new(29.92, PressureUnit::InHg);
        assert_relative_eq!(p.get_in(PressureUnit::HPa), 1013.2, epsilon = 0.1);
        assert_relative_eq!(p.get_in(PressureUnit::MmHg), 759.968, epsilon = 1e-9);
    }

    #[test]
    fn test_angular_conversions() {
        let a = Angular::moa(60.0);
        assert_relative_eq!(a.get_in(AngularUnit::Degree), 1.0, epsilon = 1e-12);

        let mil = Angular::new(6400.0, AngularUnit::Mil);
        assert_relative_eq!(mil.get_in(AngularUnit::Radian), 2.0 * PI, epsilon = 1e-12);

        // 1 MOA subtends about 1.047 inches at 100 yards
        assert_relative_eq!(Angular::moa(1.0).get_in(AngularUnit::InchesPer100Yd), 1.0472, epsilon = 1e-4);
        assert_relative_eq!(Angular::moa(0.3).get_in(AngularUnit::CmPer100M), 0.8727, epsilon = 1e-4);

        let back = Angular::new(2.5, AngularUnit::CmPer100M).get_in(AngularUnit::CmPer100M);
        assert_eq!(back, 2.5);
    }

    #[test]
    fn test_convert_keeps_quantity() {
        let d = Distance::meters(100.0).convert(DistanceUnit::Yard);
        assert_eq!(d.unit(), DistanceUnit::Yard);
        assert_relative_eq!(d.value(), 109.361, epsilon = 1e-3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Distance::yards(100.0).to_string(), "100yd");
        assert_eq!(Angular::moa(1.5).to_string(), "1.5moa");
        assert_eq!(Temperature::fahrenheit(59.0).to_string(), "59°F");
    }

    #[test]
    fn test_serde_shape() {
        let d: Distance = serde_json::from_str(r#"{"value": 2.0, "unit": "inch"}"#).unwrap();
        assert_eq!(d, Distance::inches(2.0));
        let json = serde_json::to_string(&Angular::moa(1.0)).unwrap();
        assert_eq!(json, r#"{"value":1.0,"unit":"moa"}"#);
    }
}
