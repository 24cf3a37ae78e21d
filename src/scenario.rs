//! TOML scenario files.
//!
//! A scenario bundles everything needed for one range card:
//!
//! ```toml
//! [projectile]
//! drag_model = "G1"
//! ballistic_coefficient = 0.223
//! weight = { value = 168.0, unit = "grain" }
//!
//! [ammunition]
//! muzzle_velocity = { value = 2750.0, unit = "fps" }
//!
//! [weapon]
//! sight_height = { value = 2.0, unit = "inch" }
//! zero_distance = { value = 100.0, unit = "yard" }
//!
//! [shot]
//! maximum_distance = { value = 1000.0, unit = "yard" }
//! step = { value = 100.0, unit = "yard" }
//!
//! [[wind]]
//! velocity = { value = 5.0, unit = "mph" }
//! direction = { value = -45.0, unit = "degree" }
//! ```
//!
//! `[atmosphere]` is optional and defaults to the standard station
//! conditions. When `[shot]` has no `sight_angle`, it is solved from the
//! weapon zero.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::atmosphere::Atmosphere;
use crate::ballistic_coefficient::{BallisticCoefficient, CustomDragMode};
use crate::calculator::{ShotParameters, TrajectoryCalculator};
use crate::drag::{DragCurve, DragTable};
use crate::error::{BallisticsError, Result};
use crate::projectile::{Ammunition, Projectile, Weapon, ZeroInfo};
use crate::trajectory_data::TrajectoryPoint;
use crate::units::{Angular, Distance, Velocity, Weight};
use crate::wind::WindInfo;
use crate::DragModel;

/// Errors reading configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read drag table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectileConfig {
    pub ballistic_coefficient: f64,
    #[serde(default)]
    pub drag_model: Option<DragModel>,
    #[serde(default)]
    pub custom_drag: Option<CustomDragConfig>,
    pub weight: Weight,
    #[serde(default)]
    pub diameter: Option<Distance>,
    #[serde(default)]
    pub length: Option<Distance>,
}

/// Custom drag given as `(mach, cd)` samples, inline or in a CSV file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomDragConfig {
    pub mode: CustomDragMode,
    #[serde(default)]
    pub table: Option<Vec<(f64, f64)>>,
    /// Relative paths resolve against the scenario file's directory
    #[serde(default)]
    pub table_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AmmunitionConfig {
    pub muzzle_velocity: Velocity,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponConfig {
    pub sight_height: Distance,
    pub zero_distance: Distance,
    /// Conditions the weapon was zeroed in, when different from the shot's
    #[serde(default)]
    pub zero_atmosphere: Option<Atmosphere>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShotConfig {
    pub maximum_distance: Distance,
    pub step: Distance,
    #[serde(default)]
    pub sight_angle: Option<Angular>,
    #[serde(default)]
    pub shot_angle: Angular,
    #[serde(default)]
    pub cant_angle: Angular,
}

/// A complete shot description loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub projectile: ProjectileConfig,
    pub ammunition: AmmunitionConfig,
    pub weapon: WeaponConfig,
    #[serde(default)]
    pub atmosphere: Atmosphere,
    #[serde(default)]
    pub wind: Vec<WindInfo>,
    pub shot: ShotConfig,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Result of running a scenario
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub sight_angle: Angular,
    pub points: Vec<TrajectoryPoint>,
}

/// Load a scenario from a TOML file
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut scenario: Scenario = toml::from_str(&text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    scenario.base_dir = path.parent().map(Path::to_path_buf);
    debug!(path = %path.display(), "scenario loaded");
    Ok(scenario)
}

impl Scenario {
    /// Parse a scenario from TOML text. Relative table files resolve against
    /// the working directory.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| {
            ConfigError::Toml {
                path: PathBuf::from("<string>"),
                source,
            }
            .into()
        })
    }

    pub fn ballistic_coefficient(&self) -> Result<BallisticCoefficient> {
        let p = &self.projectile;
        match (&p.drag_model, &p.custom_drag) {
            (Some(model), None) => BallisticCoefficient::new(p.ballistic_coefficient, *model),
            (None, Some(custom)) => {
                let table = match (&custom.table, &custom.table_file) {
                    (Some(points), None) => DragTable::new(points.clone())?,
                    (None, Some(file)) => DragTable::from_csv_path(&self.resolve(file))?,
                    _ => {
                        return Err(BallisticsError::invalid(
                            "custom drag needs exactly one of `table` or `table_file`",
                        ))
                    }
                };
                BallisticCoefficient::for_drag_curve(
                    p.ballistic_coefficient,
                    custom.mode,
                    DragCurve::fit(&table),
                )
            }
            _ => Err(BallisticsError::invalid(
                "projectile needs exactly one of `drag_model` or `custom_drag`",
            )),
        }
    }

    pub fn ammunition(&self) -> Result<Ammunition> {
        let bc = self.ballistic_coefficient()?;
        let p = &self.projectile;
        let projectile = match (p.diameter, p.length) {
            (Some(diameter), Some(length)) => Projectile::with_dimensions(bc, p.weight, diameter, length)?,
            _ => Projectile::new(bc, p.weight)?,
        };
        Ammunition::new(projectile, self.ammunition.muzzle_velocity)
    }

    pub fn weapon(&self) -> Result<Weapon> {
        let mut zero = ZeroInfo::new(self.weapon.zero_distance);
        if let Some(atmosphere) = self.weapon.zero_atmosphere {
            zero = zero.with_atmosphere(atmosphere);
        }
        Weapon::new(self.weapon.sight_height, zero)
    }

    /// Solve the sight angle unless the scenario fixes one, then compute the
    /// trajectory.
    pub fn run(&self, calculator: &TrajectoryCalculator) -> Result<ScenarioOutcome> {
        let ammunition = self.ammunition()?;
        let weapon = self.weapon()?;

        let sight_angle = match self.shot.sight_angle {
            Some(angle) => angle,
            None => calculator.sight_angle(&ammunition, &weapon, &self.atmosphere)?,
        };
        let shot = ShotParameters::new(sight_angle, self.shot.maximum_distance, self.shot.step)?
            .with_shot_angle(self.shot.shot_angle)?
            .with_cant_angle(self.shot.cant_angle)?;

        let points = calculator.trajectory(&ammunition, &weapon, &self.atmosphere, &shot, &self.wind)?;
        Ok(ScenarioOutcome { sight_angle, points })
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }
    }
}
