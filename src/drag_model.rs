use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BallisticsError;

/// Standard reference projectile families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragModel {
    G1,
    G2,
    G5,
    G6,
    G7,
    G8,
    GI,
    GS,
}

impl DragModel {
    pub const ALL: [DragModel; 8] = [
        DragModel::G1,
        DragModel::G2,
        DragModel::G5,
        DragModel::G6,
        DragModel::G7,
        DragModel::G8,
        DragModel::GI,
        DragModel::GS,
    ];
}

impl FromStr for DragModel {
    type Err = BallisticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "G1" => Ok(DragModel::G1),
            "G2" => Ok(DragModel::G2),
            "G5" => Ok(DragModel::G5),
            "G6" => Ok(DragModel::G6),
            "G7" => Ok(DragModel::G7),
            "G8" => Ok(DragModel::G8),
            "GI" => Ok(DragModel::GI),
            "GS" => Ok(DragModel::GS),
            _ => Err(BallisticsError::invalid(format!("unknown drag model '{s}'"))),
        }
    }
}

impl std::fmt::Display for DragModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
