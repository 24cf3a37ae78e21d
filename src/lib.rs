//! # Exterior Ballistics
//!
//! Point-mass trajectory and sight-zero calculations for small-arms
//! projectiles, driven by the standard G-family drag tables or a custom drag
//! function.
//!
//! ```no_run
//! use exterior_ballistics::{
//!     Ammunition, Atmosphere, BallisticCoefficient, DragModel, Projectile, ShotParameters,
//!     TrajectoryCalculator, Weapon,
//! };
//! use exterior_ballistics::units::{Distance, Velocity, Weight};
//!
//! # fn main() -> exterior_ballistics::Result<()> {
//! let bc = BallisticCoefficient::new(0.223, DragModel::G7)?;
//! let ammo = Ammunition::new(Projectile::new(bc, Weight::grains(168.0))?, Velocity::fps(2750.0))?;
//! let weapon = Weapon::with_zero_distance(Distance::inches(2.0), Distance::yards(100.0))?;
//! let atmosphere = Atmosphere::default();
//!
//! let calc = TrajectoryCalculator::new();
//! let sight_angle = calc.sight_angle(&ammo, &weapon, &atmosphere)?;
//! let shot = ShotParameters::new(sight_angle, Distance::yards(1000.0), Distance::yards(100.0))?;
//! let points = calc.trajectory(&ammo, &weapon, &atmosphere, &shot, &[])?;
//! # Ok(())
//! # }
//! ```

// Re-export the main types and functions
pub use atmosphere::{AirConditions, Atmosphere};
pub use ballistic_coefficient::{BallisticCoefficient, CustomDragMode, DragFunction};
pub use calculator::{ShotParameters, TrajectoryCalculator};
pub use drag::{get_drag_coefficient, standard_curve, CurveSegment, DragCurve, DragTable};
pub use drag_model::DragModel;
pub use error::{BallisticsError, Result};
pub use integrator::{FlightState, IntegratorSettings, LaunchGeometry};
pub use projectile::{Ammunition, Projectile, Weapon, ZeroInfo};
pub use scenario::{load_scenario, ConfigError, Scenario, ScenarioOutcome};
pub use trajectory_data::TrajectoryPoint;
pub use wind::{WindInfo, WindSock};
pub use zero::solve_zero_angle;

// Module declarations
pub mod atmosphere;
pub mod ballistic_coefficient;
pub mod calculator;
pub mod constants;
pub mod drag;
mod drag_model;
pub mod drag_tables;
mod error;
pub mod integrator;
pub mod projectile;
pub mod scenario;
pub mod trajectory_data;
pub mod units;
pub mod wind;
pub mod zero;
