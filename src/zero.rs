//! Sight-zero solver.
//!
//! Finds the angle between sight line and bore at which a level shot crosses
//! the sight line exactly at the zero distance.

use tracing::{debug, warn};

use crate::atmosphere::Atmosphere;
use crate::constants::{ZERO_FINDING_ACCURACY_FT, ZERO_MAX_ITERATIONS};
use crate::error::{BallisticsError, Result};
use crate::integrator::{IntegratorSettings, LaunchGeometry, PreparedShot};
use crate::projectile::{Ammunition, Weapon};
use crate::units::{Angular, DistanceUnit};
use crate::wind::WindSock;

/// Solve the zero angle for `weapon`.
///
/// The zero's ammunition and atmosphere overrides take precedence over the
/// ones passed in. Zeroing is done in still air on a level line of sight.
pub fn solve_zero_angle(
    ammunition: &Ammunition,
    weapon: &Weapon,
    atmosphere: &Atmosphere,
    settings: IntegratorSettings,
) -> Result<Angular> {
    let zero = weapon.zero();
    let ammunition = zero.ammunition().unwrap_or(ammunition);
    let atmosphere = zero.atmosphere().unwrap_or(atmosphere);
    let zero_distance = zero.distance().get_in(DistanceUnit::Foot);

    let shot = PreparedShot::new(ammunition, weapon.sight_height(), atmosphere, settings)?;
    let calm = WindSock::calm();

    let mut geometry = LaunchGeometry::default();
    let mut miss = f64::NAN;

    for iteration in 0..ZERO_MAX_ITERATIONS {
        let points = shot.integrate(&geometry, &calm, zero_distance, zero_distance)?;

        // The grid is (0, zero_distance); a single point means it never got there
        let Some(last) = points.get(1) else {
            warn!(iteration, zero_distance_ft = zero_distance, "trajectory does not reach zero distance");
            return Err(BallisticsError::ZeroNotFound { iterations: iteration + 1, miss_ft: miss });
        };

        miss = last.drop().get_in(DistanceUnit::Foot);
        debug!(iteration, angle_rad = geometry.sight_angle, miss_ft = miss, "zero iteration");

        if miss.abs() < ZERO_FINDING_ACCURACY_FT {
            return Ok(Angular::radians(geometry.sight_angle));
        }
        geometry.sight_angle -= miss / zero_distance;
    }

    warn!(iterations = ZERO_MAX_ITERATIONS, miss_ft = miss, "zero solver did not converge");
    Err(BallisticsError::ZeroNotFound { iterations: ZERO_MAX_ITERATIONS, miss_ft: miss })
}
