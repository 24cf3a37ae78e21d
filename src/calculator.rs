//! Trajectory calculator: the two public entry points.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atmosphere::Atmosphere;
use crate::error::{BallisticsError, Result};
use crate::integrator::{IntegratorSettings, LaunchGeometry, PreparedShot};
use crate::projectile::{Ammunition, Weapon};
use crate::trajectory_data::TrajectoryPoint;
use crate::units::{Angular, AngularUnit, Distance, DistanceUnit};
use crate::wind::{WindInfo, WindSock};
use crate::zero::solve_zero_angle;

/// Parameters of one shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShotParametersFields")]
pub struct ShotParameters {
    sight_angle: Angular,
    maximum_distance: Distance,
    step: Distance,
    shot_angle: Angular,
    cant_angle: Angular,
}

#[derive(Deserialize)]
struct ShotParametersFields {
    sight_angle: Angular,
    maximum_distance: Distance,
    step: Distance,
    #[serde(default)]
    shot_angle: Angular,
    #[serde(default)]
    cant_angle: Angular,
}

impl TryFrom<ShotParametersFields> for ShotParameters {
    type Error = BallisticsError;

    fn try_from(f: ShotParametersFields) -> Result<Self> {
        ShotParameters::new(f.sight_angle, f.maximum_distance, f.step)?
            .with_shot_angle(f.shot_angle)?
            .with_cant_angle(f.cant_angle)
    }
}

fn check_angle(what: &str, angle: Angular) -> Result<()> {
    if angle.value().is_finite() {
        Ok(())
    } else {
        Err(BallisticsError::invalid(format!("{what} must be finite, got {angle}")))
    }
}

impl ShotParameters {
    /// Level, uncanted shot sampled every `step` up to `maximum_distance`
    pub fn new(sight_angle: Angular, maximum_distance: Distance, step: Distance) -> Result<Self> {
        check_angle("sight angle", sight_angle)?;
        if !(step.value().is_finite() && step.value() > 0.0) {
            return Err(BallisticsError::invalid(format!("step must be greater than zero, got {step}")));
        }
        if !(maximum_distance.value().is_finite() && maximum_distance.value() > 0.0) {
            return Err(BallisticsError::invalid(format!(
                "maximum distance must be greater than zero, got {maximum_distance}"
            )));
        }
        Ok(Self {
            sight_angle,
            maximum_distance,
            step,
            shot_angle: Angular::zero(),
            cant_angle: Angular::zero(),
        })
    }

    /// Inclination of the line of sight, uphill positive
    pub fn with_shot_angle(mut self, shot_angle: Angular) -> Result<Self> {
        check_angle("shot angle", shot_angle)?;
        self.shot_angle = shot_angle;
        Ok(self)
    }

    /// Rotation of the weapon about the line of sight
    pub fn with_cant_angle(mut self, cant_angle: Angular) -> Result<Self> {
        check_angle("cant angle", cant_angle)?;
        self.cant_angle = cant_angle;
        Ok(self)
    }

    pub fn sight_angle(&self) -> Angular {
        self.sight_angle
    }

    pub fn maximum_distance(&self) -> Distance {
        self.maximum_distance
    }

    pub fn step(&self) -> Distance {
        self.step
    }

    pub fn shot_angle(&self) -> Angular {
        self.shot_angle
    }

    pub fn cant_angle(&self) -> Angular {
        self.cant_angle
    }

    fn geometry(&self) -> LaunchGeometry {
        LaunchGeometry {
            sight_angle: self.sight_angle.get_in(AngularUnit::Radian),
            shot_angle: self.shot_angle.get_in(AngularUnit::Radian),
            cant_angle: self.cant_angle.get_in(AngularUnit::Radian),
        }
    }
}

/// Computes sight angles and trajectories.
///
/// Holds only numerical settings; every call owns its own state, so one
/// calculator can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryCalculator {
    settings: IntegratorSettings,
}

impl TrajectoryCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path length advanced per integration step (default 0.1 ft)
    pub fn with_calculation_step(mut self, step: Distance) -> Self {
        self.settings.calculation_step_ft = step.get_in(DistanceUnit::Foot);
        self
    }

    /// Step-count safety bound for a single integration run
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.settings.max_steps = max_steps;
        self
    }

    pub fn calculation_step(&self) -> Distance {
        Distance::new(self.settings.calculation_step_ft, DistanceUnit::Foot)
    }

    pub fn max_steps(&self) -> usize {
        self.settings.max_steps
    }

    /// Sight angle that zeroes `weapon` with `ammunition` in `atmosphere`
    pub fn sight_angle(
        &self,
        ammunition: &Ammunition,
        weapon: &Weapon,
        atmosphere: &Atmosphere,
    ) -> Result<Angular> {
        let angle = solve_zero_angle(ammunition, weapon, atmosphere, self.settings)?;
        debug!(sight_angle_rad = angle.get_in(AngularUnit::Radian), "sight angle solved");
        Ok(angle)
    }

    /// Trajectory sampled on the grid of `shot`, with an optional wind profile
    pub fn trajectory(
        &self,
        ammunition: &Ammunition,
        weapon: &Weapon,
        atmosphere: &Atmosphere,
        shot: &ShotParameters,
        winds: &[WindInfo],
    ) -> Result<Vec<TrajectoryPoint>> {
        let prepared = PreparedShot::new(ammunition, weapon.sight_height(), atmosphere, self.settings)?;
        let wind = WindSock::new(winds)?;
        prepared.integrate(
            &shot.geometry(),
            &wind,
            shot.maximum_distance.get_in(DistanceUnit::Foot),
            shot.step.get_in(DistanceUnit::Foot),
        )
    }
}
