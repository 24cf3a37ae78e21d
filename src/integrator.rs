//! Point-mass trajectory integration.
//!
//! Coordinates are in feet: x downrange, y up, z to the right. The origin is
//! the sight; the bore starts one sight height below it. Each step advances a
//! fixed path length, so the time increment is `calculation_step / |v|`.

use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::atmosphere::{Atmosphere, AtmosphereProfile};
use crate::ballistic_coefficient::BallisticCoefficient;
use crate::constants::{
    DEFAULT_CALCULATION_STEP_FT, DEFAULT_MAX_STEPS, GRAVITY_FPS2, MAXIMUM_DROP_FT,
    MINIMUM_VELOCITY_FPS,
};
use crate::error::{BallisticsError, Result};
use crate::projectile::Ammunition;
use crate::trajectory_data::TrajectoryPoint;
use crate::units::{Distance, DistanceUnit, WeightUnit};
use crate::wind::WindSock;

/// Numerical settings shared by every integration run of a calculator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    /// Path length advanced per step (ft)
    pub calculation_step_ft: f64,
    /// Step-count safety bound for one run
    pub max_steps: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            calculation_step_ft: DEFAULT_CALCULATION_STEP_FT,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl IntegratorSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.calculation_step_ft.is_finite() && self.calculation_step_ft > 0.0) {
            return Err(BallisticsError::invalid(format!(
                "calculation step must be greater than zero, got {} ft",
                self.calculation_step_ft
            )));
        }
        if self.max_steps == 0 {
            return Err(BallisticsError::invalid("max steps must be at least 1"));
        }
        Ok(())
    }
}

/// Barrel orientation for one run, all angles in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaunchGeometry {
    /// Angle between the sight line and the bore
    pub sight_angle: f64,
    /// Inclination of the line of sight (uphill positive)
    pub shot_angle: f64,
    /// Rotation of the weapon about the line of sight
    pub cant_angle: f64,
}

impl LaunchGeometry {
    pub fn validate(&self) -> Result<()> {
        let angles = [
            ("sight angle", self.sight_angle),
            ("shot angle", self.shot_angle),
            ("cant angle", self.cant_angle),
        ];
        for (name, value) in angles {
            if !value.is_finite() {
                return Err(BallisticsError::invalid(format!("{name} must be finite, got {value} rad")));
            }
        }
        Ok(())
    }
}

/// Projectile state during integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    /// (distance travelled, height, windage) in ft
    pub position: Vector3<f64>,
    /// ft/s
    pub velocity: Vector3<f64>,
    /// s
    pub time: f64,
    pub mach: f64,
}

impl FlightState {
    /// State at the muzzle for the given geometry
    pub fn at_muzzle(
        muzzle_velocity_fps: f64,
        sight_height_ft: f64,
        speed_of_sound_fps: f64,
        geometry: &LaunchGeometry,
    ) -> Self {
        let elevation = geometry.shot_angle + geometry.sight_angle * geometry.cant_angle.cos();
        let azimuth = geometry.sight_angle * geometry.cant_angle.sin();
        Self {
            position: Vector3::new(
                0.0,
                -sight_height_ft * geometry.cant_angle.cos(),
                -sight_height_ft * geometry.cant_angle.sin(),
            ),
            velocity: Vector3::new(
                muzzle_velocity_fps * elevation.cos() * azimuth.cos(),
                muzzle_velocity_fps * elevation.sin(),
                muzzle_velocity_fps * elevation.cos() * azimuth.sin(),
            ),
            time: 0.0,
            mach: muzzle_velocity_fps / speed_of_sound_fps,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Linear interpolation towards `next` by fraction `f`
    fn lerp(&self, next: &FlightState, f: f64) -> FlightState {
        FlightState {
            position: self.position + (next.position - self.position) * f,
            velocity: self.velocity + (next.velocity - self.velocity) * f,
            time: self.time + (next.time - self.time) * f,
            mach: self.mach + (next.mach - self.mach) * f,
        }
    }
}

/// Per-shot quantities resolved once and reused across runs
#[derive(Debug, Clone)]
pub struct PreparedShot<'a> {
    bc: &'a BallisticCoefficient,
    weight_grains: f64,
    muzzle_velocity_fps: f64,
    sight_height_ft: f64,
    atmosphere: AtmosphereProfile,
    settings: IntegratorSettings,
}

impl<'a> PreparedShot<'a> {
    pub fn new(
        ammunition: &'a Ammunition,
        sight_height: Distance,
        atmosphere: &Atmosphere,
        settings: IntegratorSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let projectile = ammunition.projectile();
        Ok(Self {
            bc: projectile.ballistic_coefficient(),
            weight_grains: projectile.weight().get_in(WeightUnit::Grain),
            muzzle_velocity_fps: ammunition.muzzle_velocity_fps(),
            sight_height_ft: sight_height.get_in(DistanceUnit::Foot),
            atmosphere: atmosphere.profile(),
            settings,
        })
    }

    /// Integrate the flight and sample it every `step_ft` up to `max_distance_ft`.
    ///
    /// Stops early, without error, when the projectile slows below stable
    /// flight speed or falls below the maximum drop.
    pub fn integrate(
        &self,
        geometry: &LaunchGeometry,
        wind: &WindSock,
        max_distance_ft: f64,
        step_ft: f64,
    ) -> Result<Vec<TrajectoryPoint>> {
        if !(step_ft.is_finite() && step_ft > 0.0) {
            return Err(BallisticsError::invalid(format!(
                "record step must be greater than zero, got {step_ft} ft"
            )));
        }
        if !(max_distance_ft.is_finite() && max_distance_ft >= 0.0) {
            return Err(BallisticsError::invalid(format!(
                "maximum distance must be non-negative, got {max_distance_ft} ft"
            )));
        }
        geometry.validate()?;

        let count = (max_distance_ft / step_ft + 1e-9).floor() as usize + 1;
        // The grid may be far longer than the flight; grow on demand past this
        let mut points = Vec::with_capacity(count.min(1024));
        let mut wind = wind.clone();

        let gravity = Vector3::new(0.0, GRAVITY_FPS2, 0.0);
        let look = geometry.shot_angle;
        let (look_sin, look_cos) = look.sin_cos();
        let calculation_step = self.settings.calculation_step_ft;

        let mut state = FlightState::at_muzzle(
            self.muzzle_velocity_fps,
            self.sight_height_ft,
            self.atmosphere.station().speed_of_sound_fps,
            geometry,
        );
        points.push(self.point(0.0, &state, look_sin, look_cos));

        let mut next_index = 1usize;
        let mut steps = 0usize;

        while points.len() < count {
            if steps >= self.settings.max_steps {
                warn!(steps, distance_ft = state.position.x, "integration step cap reached");
                return Err(BallisticsError::IntegrationDivergence { steps });
            }

            let speed = state.speed();
            if speed < MINIMUM_VELOCITY_FPS || state.position.y < MAXIMUM_DROP_FT {
                debug!(
                    speed_fps = speed,
                    height_ft = state.position.y,
                    distance_ft = state.position.x,
                    "projectile left stable flight"
                );
                break;
            }

            let air = self.atmosphere.at_height(state.position.y);
            let wind_vector = wind.vector_for_range(state.position.x);
            let dt = calculation_step / speed;

            // Drag acts on the velocity relative to the air mass
            let relative = state.velocity - wind_vector;
            let airspeed = relative.norm();
            let mach = airspeed / air.speed_of_sound_fps;
            let drag = air.density_factor * airspeed * self.bc.drag(mach);

            let velocity = state.velocity - (relative * drag - gravity) * dt;
            let next = FlightState {
                position: state.position + velocity * dt,
                velocity,
                time: state.time + dt,
                mach: velocity.norm() / air.speed_of_sound_fps,
            };
            if !(next.position.iter().chain(next.velocity.iter()).all(|c| c.is_finite())) {
                warn!(steps, distance_ft = state.position.x, "integration produced a non-finite state");
                return Err(BallisticsError::IntegrationDivergence { steps: steps + 1 });
            }

            while points.len() < count {
                let grid = next_index as f64 * step_ft;
                if grid > next.position.x {
                    break;
                }
                let f = (grid - state.position.x) / (next.position.x - state.position.x);
                let mut sample = state.lerp(&next, f);
                sample.mach = sample.speed() / air.speed_of_sound_fps;
                points.push(self.point(grid, &sample, look_sin, look_cos));
                next_index += 1;
            }

            state = next;
            steps += 1;
        }

        debug!(steps, points = points.len(), time_s = state.time, "trajectory integrated");
        Ok(points)
    }

    fn point(&self, distance_ft: f64, state: &FlightState, look_sin: f64, look_cos: f64) -> TrajectoryPoint {
        let drop = state.position.y * look_cos - distance_ft * look_sin;
        TrajectoryPoint::from_flight(
            state.time,
            distance_ft,
            state.speed(),
            state.mach,
            drop,
            state.position.z,
            self.weight_grains,
        )
    }
}

/// Integrate one shot with default numerical settings.
///
/// `max_distance` and `record_step` set the sampling grid; the wind profile
/// may be empty.
pub fn integrate(
    ammunition: &Ammunition,
    sight_height: Distance,
    atmosphere: &Atmosphere,
    geometry: &LaunchGeometry,
    wind: &WindSock,
    max_distance: Distance,
    record_step: Distance,
) -> Result<Vec<TrajectoryPoint>> {
    PreparedShot::new(ammunition, sight_height, atmosphere, IntegratorSettings::default())?.integrate(
        geometry,
        wind,
        max_distance.get_in(DistanceUnit::Foot),
        record_step.get_in(DistanceUnit::Foot),
    )
}
