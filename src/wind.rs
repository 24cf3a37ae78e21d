use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{BallisticsError, Result};
use crate::units::{Angular, AngularUnit, Distance, DistanceUnit, Velocity, VelocityUnit};

/// Wind acting over part of the flight.
///
/// Direction 0° is a tailwind; 90° blows from the shooter's left toward the
/// right. The wind applies until `until_distance`, or to the end of the
/// flight when that is absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    until_distance: Option<Distance>,
    velocity: Velocity,
    direction: Angular,
}

impl WindInfo {
    /// Wind over the whole flight
    pub fn new(velocity: Velocity, direction: Angular) -> Self {
        Self { until_distance: None, velocity, direction }
    }

    /// Wind applying up to `until_distance`
    pub fn until(until_distance: Distance, velocity: Velocity, direction: Angular) -> Self {
        Self { until_distance: Some(until_distance), velocity, direction }
    }

    pub fn until_distance(&self) -> Option<Distance> {
        self.until_distance
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn direction(&self) -> Angular {
        self.direction
    }

    /// Wind velocity in ft/s: x downrange, y up, z to the right
    pub fn vector_fps(&self) -> Vector3<f64> {
        let speed = self.velocity.get_in(VelocityUnit::Fps);
        let angle = self.direction.get_in(AngularUnit::Radian);
        Vector3::new(speed * angle.cos(), 0.0, speed * angle.sin())
    }
}

/// Wind segment: (until_distance_ft, wind vector in ft/s)
pub type WindSegment = (f64, Vector3<f64>);

/// Wind profile lookup for trajectory calculations
#[derive(Debug, Clone)]
pub struct WindSock {
    /// Sorted wind segments by distance
    winds: Vec<WindSegment>,
    /// Current segment index
    current: usize,
}

impl WindSock {
    /// Create a new WindSock from a wind profile.
    ///
    /// Entries are ordered by `until_distance`; an entry without one sorts last.
    pub fn new(winds: &[WindInfo]) -> Result<Self> {
        let mut segments = Vec::with_capacity(winds.len());
        for wind in winds {
            let until = wind
                .until_distance
                .map_or(f64::INFINITY, |d| d.get_in(DistanceUnit::Foot));
            if until.is_nan() || until < 0.0 {
                return Err(BallisticsError::invalid(format!(
                    "wind until-distance must be non-negative, got {until} ft"
                )));
            }
            let vector = wind.vector_fps();
            if !vector.iter().all(|c| c.is_finite()) {
                return Err(BallisticsError::invalid("wind velocity and direction must be finite"));
            }
            segments.push((until, vector));
        }
        segments.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(WindSock { winds: segments, current: 0 })
    }

    /// Still air
    pub fn calm() -> Self {
        WindSock { winds: Vec::new(), current: 0 }
    }

    pub fn is_calm(&self) -> bool {
        self.winds.iter().all(|(_, v)| *v == Vector3::zeros())
    }

    /// Get wind vector for a given range (ft)
    ///
    /// Advances an internal cursor and expects monotonically increasing ranges,
    /// as the integrator supplies.
    pub fn vector_for_range(&mut self, range_ft: f64) -> Vector3<f64> {
        if self.winds.is_empty() {
            return Vector3::zeros();
        }
        while self.current + 1 < self.winds.len() && range_ft >= self.winds[self.current].0 {
            self.current += 1;
        }
        self.winds[self.current].1
    }

    /// Get wind vector for a given range (stateless version)
    pub fn vector_for_range_stateless(&self, range_ft: f64) -> Vector3<f64> {
        // The last segment extends to the end of the flight
        self.winds
            .iter()
            .find(|(until, _)| range_ft < *until)
            .or_else(|| self.winds.last())
            .map_or_else(Vector3::zeros, |(_, vector)| *vector)
    }
}
