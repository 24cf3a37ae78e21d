use serde::Serialize;

use crate::constants::{ENERGY_DIVISOR, OGW_FACTOR};
use crate::units::{
    Angular, AngularUnit, Distance, DistanceUnit, Energy, EnergyUnit, Velocity, VelocityUnit,
    Weight, WeightUnit,
};

/// Kinetic energy in ft·lb for a projectile weight (gr) and speed (ft/s)
#[inline]
pub fn calculate_energy(weight_grains: f64, velocity_fps: f64) -> f64 {
    weight_grains * velocity_fps * velocity_fps / ENERGY_DIVISOR
}

/// Optimal game weight in lb for a projectile weight (gr) and speed (ft/s)
#[inline]
pub fn calculate_optimal_game_weight(weight_grains: f64, velocity_fps: f64) -> f64 {
    weight_grains * weight_grains * velocity_fps.powi(3) * OGW_FACTOR
}

/// Adjustment angle that cancels `offset` at `distance` (both in the same unit)
#[inline]
fn adjustment(offset: f64, distance: f64) -> f64 {
    if distance == 0.0 {
        0.0
    } else {
        (offset / distance).atan()
    }
}

/// One sampled point of a trajectory.
///
/// Drop is measured perpendicular to the line of sight, positive above it;
/// windage is positive to the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    time: f64,
    distance: Distance,
    velocity: Velocity,
    mach: f64,
    drop: Distance,
    drop_adjustment: Angular,
    windage: Distance,
    windage_adjustment: Angular,
    energy: Energy,
    optimal_game_weight: Weight,
}

impl TrajectoryPoint {
    /// Build a point from integrator values (ft, ft/s, gr)
    pub(crate) fn from_flight(
        time: f64,
        distance_ft: f64,
        velocity_fps: f64,
        mach: f64,
        drop_ft: f64,
        windage_ft: f64,
        weight_grains: f64,
    ) -> Self {
        Self {
            time,
            distance: Distance::new(distance_ft, DistanceUnit::Foot),
            velocity: Velocity::new(velocity_fps, VelocityUnit::Fps),
            mach,
            drop: Distance::new(drop_ft, DistanceUnit::Foot),
            drop_adjustment: Angular::radians(adjustment(drop_ft, distance_ft)),
            windage: Distance::new(windage_ft, DistanceUnit::Foot),
            windage_adjustment: Angular::radians(adjustment(windage_ft, distance_ft)),
            energy: Energy::new(calculate_energy(weight_grains, velocity_fps), EnergyUnit::FootPound),
            optimal_game_weight: Weight::new(
                calculate_optimal_game_weight(weight_grains, velocity_fps),
                WeightUnit::Pound,
            ),
        }
    }

    /// Time of flight in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn mach(&self) -> f64 {
        self.mach
    }

    pub fn drop(&self) -> Distance {
        self.drop
    }

    pub fn drop_adjustment(&self) -> Angular {
        self.drop_adjustment
    }

    pub fn windage(&self) -> Distance {
        self.windage
    }

    pub fn windage_adjustment(&self) -> Angular {
        self.windage_adjustment
    }

    pub fn energy(&self) -> Energy {
        self.energy
    }

    pub fn optimal_game_weight(&self) -> Weight {
        self.optimal_game_weight
    }

    /// Drop adjustment in `unit`, convenience for range cards
    pub fn drop_adjustment_in(&self, unit: AngularUnit) -> f64 {
        self.drop_adjustment.get_in(unit)
    }

    pub fn windage_adjustment_in(&self, unit: AngularUnit) -> f64 {
        self.windage_adjustment.get_in(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_and_ogw() {
        assert!((calculate_energy(168.0, 2750.0) - 2820.600).abs() < 0.001);
        assert!((calculate_optimal_game_weight(168.0, 2750.0) - 880.457).abs() < 0.001);
    }

    #[test]
    fn test_point_at_muzzle_has_no_adjustment() {
        let p = TrajectoryPoint::from_flight(0.0, 0.0, 2750.0, 2.463, -2.0 / 12.0, 0.0, 168.0);
        assert_eq!(p.drop_adjustment().get_in(AngularUnit::Radian), 0.0);
        assert_eq!(p.windage_adjustment().get_in(AngularUnit::Radian), 0.0);
        assert!((p.drop().get_in(DistanceUnit::Inch) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_adjustment_angles() {
        // 1.047 in at 100 yd is one MOA
        let p = TrajectoryPoint::from_flight(0.1, 300.0, 2500.0, 2.2, -1.047 / 12.0, 0.5 / 12.0, 168.0);
        assert!((p.drop_adjustment_in(AngularUnit::Moa) + 1.0).abs() < 1e-3);
        assert!(p.windage_adjustment_in(AngularUnit::Moa) > 0.0);
        assert!((p.distance().get_in(DistanceUnit::Yard) - 100.0).abs() < 1e-12);
    }
}
