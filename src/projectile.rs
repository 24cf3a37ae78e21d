//! Projectile, ammunition and weapon records.
//!
//! All records are validated on construction and immutable afterwards.

use crate::atmosphere::Atmosphere;
use crate::ballistic_coefficient::{BallisticCoefficient, CustomDragMode};
use crate::constants::GRAINS_PER_POUND;
use crate::error::{BallisticsError, Result};
use crate::units::{Distance, DistanceUnit, Velocity, VelocityUnit, Weight, WeightUnit};

fn positive(value: f64, what: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BallisticsError::invalid(format!("{what} must be greater than zero, got {value}")))
    }
}

/// Bullet or shell: drag description and physical dimensions
#[derive(Debug, Clone)]
pub struct Projectile {
    bc: BallisticCoefficient,
    weight: Weight,
    diameter: Option<Distance>,
    length: Option<Distance>,
}

impl Projectile {
    pub fn new(bc: BallisticCoefficient, weight: Weight) -> Result<Self> {
        positive(weight.value(), "projectile weight")?;
        Ok(Self { bc, weight, diameter: None, length: None })
    }

    pub fn with_dimensions(
        bc: BallisticCoefficient,
        weight: Weight,
        diameter: Distance,
        length: Distance,
    ) -> Result<Self> {
        positive(diameter.value(), "projectile diameter")?;
        positive(length.value(), "projectile length")?;
        let mut projectile = Self::new(bc, weight)?;
        projectile.diameter = Some(diameter);
        projectile.length = Some(length);
        Ok(projectile)
    }

    pub fn ballistic_coefficient(&self) -> &BallisticCoefficient {
        &self.bc
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn diameter(&self) -> Option<Distance> {
        self.diameter
    }

    pub fn length(&self) -> Option<Distance> {
        self.length
    }

    /// Sectional density in lb/in², when the diameter is known
    pub fn sectional_density(&self) -> Option<f64> {
        self.diameter.map(|d| {
            let d = d.get_in(DistanceUnit::Inch);
            self.weight.get_in(WeightUnit::Grain) / GRAINS_PER_POUND / (d * d)
        })
    }

    /// Ballistic coefficient in lb/in² as a range card reports it.
    ///
    /// A form factor is turned into a coefficient through the sectional
    /// density when the diameter is known; otherwise the coefficient value
    /// is returned as given. Drag computation does not use this value.
    pub fn ballistic_coefficient_value(&self) -> f64 {
        match (self.bc.custom_mode(), self.sectional_density()) {
            (Some(CustomDragMode::FormFactor), Some(sd)) => sd / self.bc.value(),
            _ => self.bc.value(),
        }
    }
}

/// A projectile fired at a given muzzle velocity
#[derive(Debug, Clone)]
pub struct Ammunition {
    projectile: Projectile,
    muzzle_velocity: Velocity,
}

impl Ammunition {
    pub fn new(projectile: Projectile, muzzle_velocity: Velocity) -> Result<Self> {
        positive(muzzle_velocity.value(), "muzzle velocity")?;
        Ok(Self { projectile, muzzle_velocity })
    }

    pub fn projectile(&self) -> &Projectile {
        &self.projectile
    }

    pub fn muzzle_velocity(&self) -> Velocity {
        self.muzzle_velocity
    }

    pub(crate) fn muzzle_velocity_fps(&self) -> f64 {
        self.muzzle_velocity.get_in(VelocityUnit::Fps)
    }
}

/// Sight-zero conditions.
///
/// The optional ammunition and atmosphere override the shot's when the
/// weapon was zeroed with a different load or in different air.
#[derive(Debug, Clone)]
pub struct ZeroInfo {
    distance: Distance,
    ammunition: Option<Ammunition>,
    atmosphere: Option<Atmosphere>,
}

impl ZeroInfo {
    pub fn new(distance: Distance) -> Self {
        Self { distance, ammunition: None, atmosphere: None }
    }

    pub fn with_ammunition(mut self, ammunition: Ammunition) -> Self {
        self.ammunition = Some(ammunition);
        self
    }

    pub fn with_atmosphere(mut self, atmosphere: Atmosphere) -> Self {
        self.atmosphere = Some(atmosphere);
        self
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn ammunition(&self) -> Option<&Ammunition> {
        self.ammunition.as_ref()
    }

    pub fn atmosphere(&self) -> Option<&Atmosphere> {
        self.atmosphere.as_ref()
    }
}

/// Sight geometry and zero of a weapon
#[derive(Debug, Clone)]
pub struct Weapon {
    sight_height: Distance,
    zero: ZeroInfo,
}

impl Weapon {
    pub fn new(sight_height: Distance, zero: ZeroInfo) -> Result<Self> {
        positive(zero.distance.value(), "zero distance")?;
        if !sight_height.value().is_finite() {
            return Err(BallisticsError::invalid("sight height must be finite"));
        }
        Ok(Self { sight_height, zero })
    }

    /// Weapon zeroed at `zero_distance` with the shot's own ammunition and air
    pub fn with_zero_distance(sight_height: Distance, zero_distance: Distance) -> Result<Self> {
        Self::new(sight_height, ZeroInfo::new(zero_distance))
    }

    /// Height of the sight line above the bore axis
    pub fn sight_height(&self) -> Distance {
        self.sight_height
    }

    pub fn zero(&self) -> &ZeroInfo {
        &self.zero
    }
}
