//! Edge evaluation against a market total.

use serde::{Deserialize, Serialize};
use std::fmt;

use totals_core::{round_to, EdgeConfig};

/// Movement tolerance in points for [`line_movement`].
pub const LINE_MOVEMENT_TOLERANCE: f64 = 1.0;

/// Side of the market the model favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lean {
    Over,
    Under,
    None,
}

impl Lean {
    /// Lean implied by a signed edge.
    #[must_use]
    pub fn from_edge(edge: f64) -> Self {
        if edge > 0.0 {
            Self::Over
        } else if edge < 0.0 {
            Self::Under
        } else {
            Self::None
        }
    }
}

impl fmt::Display for Lean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Over => write!(f, "OVER"),
            Self::Under => write!(f, "UNDER"),
            Self::None => write!(f, "NONE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeDecision {
    /// `predicted - market`, rounded to 2dp.
    pub edge: f64,
    /// Model and market disagree by more than the outlier threshold.
    pub filtered: bool,
    pub lean: Lean,
    /// Not filtered, has a lean, and clears the minimum edge.
    pub actionable: bool,
}

/// Compares predictions with market totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEvaluator {
    outlier_threshold: f64,
    min_edge: f64,
}

impl Default for EdgeEvaluator {
    fn default() -> Self {
        Self::from_config(&EdgeConfig::default())
    }
}

impl EdgeEvaluator {
    #[must_use]
    pub fn new(outlier_threshold: f64) -> Self {
        Self {
            outlier_threshold,
            min_edge: 0.0,
        }
    }

    #[must_use]
    pub fn from_config(config: &EdgeConfig) -> Self {
        Self {
            outlier_threshold: config.outlier_threshold,
            min_edge: config.min_edge,
        }
    }

    #[must_use]
    pub fn with_min_edge(mut self, min_edge: f64) -> Self {
        self.min_edge = min_edge;
        self
    }

    #[must_use]
    pub fn outlier_threshold(&self) -> f64 {
        self.outlier_threshold
    }

    #[must_use]
    pub fn min_edge(&self) -> f64 {
        self.min_edge
    }

    /// Pure; the same inputs always give the same decision.
    #[must_use]
    pub fn evaluate(&self, predicted: f64, market: f64) -> EdgeDecision {
        let diff = predicted - market;
        let edge = round_to(diff, 2);
        let filtered = diff.abs() > self.outlier_threshold;
        let lean = Lean::from_edge(edge);
        let actionable = !filtered && lean != Lean::None && edge.abs() >= self.min_edge;

        EdgeDecision {
            edge,
            filtered,
            lean,
            actionable,
        }
    }
}

/// Direction the market moved relative to a reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineMovement {
    Up,
    Down,
    None,
}

impl fmt::Display for LineMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// Movement of `current` against `reference`; moves within one point are noise.
#[must_use]
pub fn line_movement(reference: f64, current: f64) -> (f64, LineMovement) {
    let movement = current - reference;
    let direction = if movement > LINE_MOVEMENT_TOLERANCE {
        LineMovement::Up
    } else if movement < -LINE_MOVEMENT_TOLERANCE {
        LineMovement::Down
    } else {
        LineMovement::None
    };
    (movement, direction)
}
