//! Ballistic coefficient bound to a drag function.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{DRAG_DECELERATION_FACTOR, FORM_FACTOR_REFERENCE};
use crate::drag::{standard_curve, DragCurve};
use crate::error::{BallisticsError, Result};
use crate::DragModel;

/// Caller-supplied drag function: Mach number to drag coefficient
pub type DragFunction = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// How the value of a custom-drag coefficient is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomDragMode {
    /// The value is used directly as a ballistic coefficient
    Bc,
    /// The value is a form factor relative to the custom drag function
    FormFactor,
}

#[derive(Clone)]
enum DragSource {
    Standard(DragModel),
    Custom { mode: CustomDragMode, function: DragFunction },
}

/// Ballistic coefficient together with the drag function it refers to.
///
/// The drag source is resolved at construction, so evaluation never
/// dispatches on strings.
#[derive(Clone)]
pub struct BallisticCoefficient {
    value: f64,
    effective: f64,
    source: DragSource,
}

fn check_value(value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BallisticsError::invalid(format!(
            "ballistic coefficient must be greater than zero, got {value}"
        )))
    }
}

impl BallisticCoefficient {
    pub fn new(value: f64, drag_model: DragModel) -> Result<Self> {
        check_value(value)?;
        Ok(Self {
            value,
            effective: value,
            source: DragSource::Standard(drag_model),
        })
    }

    /// Coefficient for a family given by name ("G1", "g7", ...)
    pub fn from_family_name(value: f64, family: &str) -> Result<Self> {
        Self::new(value, family.parse()?)
    }

    /// Coefficient for a caller-supplied drag function.
    ///
    /// With [`CustomDragMode::FormFactor`] the effective coefficient is
    /// `value / FORM_FACTOR_REFERENCE`.
    pub fn for_custom_drag<F>(value: f64, mode: CustomDragMode, drag_function: F) -> Result<Self>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        check_value(value)?;
        let effective = match mode {
            CustomDragMode::Bc => value,
            CustomDragMode::FormFactor => value / FORM_FACTOR_REFERENCE,
        };
        Ok(Self {
            value,
            effective,
            source: DragSource::Custom {
                mode,
                function: Arc::new(drag_function),
            },
        })
    }

    /// Custom drag backed by a fitted drag curve
    pub fn for_drag_curve(value: f64, mode: CustomDragMode, curve: DragCurve) -> Result<Self> {
        Self::for_custom_drag(value, mode, move |mach| curve.coefficient(mach))
    }

    /// Value as given at construction
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Standard family, `None` for a custom drag function
    pub fn drag_model(&self) -> Option<DragModel> {
        match self.source {
            DragSource::Standard(model) => Some(model),
            DragSource::Custom { .. } => None,
        }
    }

    pub fn custom_mode(&self) -> Option<CustomDragMode> {
        match self.source {
            DragSource::Standard(_) => None,
            DragSource::Custom { mode, .. } => Some(mode),
        }
    }

    /// Divisor applied to the drag coefficient when computing deceleration
    pub fn effective_value(&self) -> f64 {
        self.effective
    }

    /// Raw drag coefficient at `mach`
    #[inline]
    pub fn coefficient(&self, mach: f64) -> f64 {
        match &self.source {
            DragSource::Standard(model) => standard_curve(*model).coefficient(mach),
            DragSource::Custom { function, .. } => function(mach),
        }
    }

    /// Deceleration factor at `mach`; multiply by airspeed² (ft/s) for ft/s²
    #[inline]
    pub fn drag(&self, mach: f64) -> f64 {
        self.coefficient(mach) * DRAG_DECELERATION_FACTOR / self.effective
    }
}

impl fmt::Debug for BallisticCoefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("BallisticCoefficient");
        s.field("value", &self.value);
        match &self.source {
            DragSource::Standard(model) => s.field("drag_model", model),
            DragSource::Custom { mode, .. } => s.field("custom", mode),
        };
        s.finish()
    }
}

impl fmt::Display for BallisticCoefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            DragSource::Standard(model) => write!(f, "{:.3} {model}", self.value),
            DragSource::Custom { mode: CustomDragMode::Bc, .. } => write!(f, "{:.3} custom", self.value),
            DragSource::Custom { mode: CustomDragMode::FormFactor, .. } => {
                write!(f, "ff {:.3} custom", self.value)
            }
        }
    }
}
