//! Adjustment pipeline.
//!
//! Applies an ordered list of adjustment signals to a base estimate by
//! summing their deltas. The numeric result does not depend on the order,
//! but the per-stage running values reported in [`PipelineResult::stages`]
//! do; the standard order is pace, injury, streak.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use totals_core::{AdjustmentContext, AdjustmentSignal, ModelError, PipelineConfig};

use crate::generator::{InjurySignal, PaceSignal, StreakSignal};

/// One stage's contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDelta {
    /// Signal name.
    pub name: String,
    /// Points added by this stage (0.0 when its data was unavailable).
    pub delta: f64,
    /// Running estimate after this stage.
    pub running: f64,
    /// False if the stage degraded to zero for lack of data.
    pub available: bool,
}

/// Result of running the pipeline once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Estimate entering the pipeline.
    pub base: f64,
    /// Estimate after all stages (unrounded).
    pub adjusted: f64,
    /// Per-stage breakdown in application order.
    pub stages: Vec<StageDelta>,
}

impl PipelineResult {
    /// Sum of all stage deltas.
    #[must_use]
    pub fn total_delta(&self) -> f64 {
        self.stages.iter().map(|s| s.delta).sum()
    }

    /// Delta contributed by the named stage, if it ran.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<f64> {
        self.stages.iter().find(|s| s.name == name).map(|s| s.delta)
    }
}

/// Ordered set of pluggable adjustment signals.
pub struct AdjustmentPipeline {
    signals: Vec<Box<dyn AdjustmentSignal>>,
}

impl Default for AdjustmentPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl AdjustmentPipeline {
    /// Creates an empty pipeline (identity).
    #[must_use]
    pub fn new() -> Self {
        Self {
            signals: Vec::new(),
        }
    }

    /// Pace, injury and streak with default parameters.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_config(&PipelineConfig::default())
    }

    /// Builds the pipeline from configuration, keeping the standard order.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::new();
        if config.pace {
            pipeline.add_signal(Box::new(PaceSignal::new(config.pace_points_per_unit)));
        }
        if config.injury {
            pipeline.add_signal(Box::new(InjurySignal::default()));
        }
        if config.streak {
            pipeline.add_signal(Box::new(StreakSignal));
        }
        pipeline
    }

    /// Appends a signal to the end of the pipeline.
    pub fn add_signal(&mut self, signal: Box<dyn AdjustmentSignal>) {
        self.signals.push(signal);
    }

    /// Builder method to append a signal.
    #[must_use]
    pub fn with_signal(mut self, signal: Box<dyn AdjustmentSignal>) -> Self {
        self.signals.push(signal);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Signal names in application order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.signals.iter().map(|s| s.name()).collect()
    }

    /// Runs every signal once and sums the deltas into `base`.
    ///
    /// A signal whose context is missing contributes zero. Any other error
    /// from a signal is logged and also treated as zero; the pipeline never
    /// fails.
    #[must_use]
    pub fn apply(
        &self,
        home_team: &str,
        away_team: &str,
        base: f64,
        ctx: &AdjustmentContext,
    ) -> PipelineResult {
        let mut running = base;
        let mut stages = Vec::with_capacity(self.signals.len());

        for signal in &self.signals {
            let (delta, available) = match signal.delta(home_team, away_team, running, ctx) {
                Ok(delta) if delta.is_finite() => (delta, true),
                Ok(delta) => {
                    warn!(signal = signal.name(), delta, "non-finite adjustment ignored");
                    (0.0, false)
                }
                Err(ModelError::ExternalDataUnavailable(what)) => {
                    debug!(signal = signal.name(), %what, "context unavailable, zero delta");
                    (0.0, false)
                }
                Err(e) => {
                    warn!(signal = signal.name(), error = %e, "adjustment failed, zero delta");
                    (0.0, false)
                }
            };

            running += delta;
            debug!(
                signal = signal.name(),
                delta,
                running,
                "{away_team} @ {home_team}"
            );
            stages.push(StageDelta {
                name: signal.name().to_string(),
                delta,
                running,
                available,
            });
        }

        PipelineResult {
            base,
            adjusted: running,
            stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use totals_core::TeamRecord;

    struct FixedSignal(&'static str, f64);

    impl AdjustmentSignal for FixedSignal {
        fn delta(
            &self,
            _: &str,
            _: &str,
            _: f64,
            _: &AdjustmentContext,
        ) -> Result<f64, ModelError> {
            Ok(self.1)
        }
        fn name(&self) -> &str {
            self.0
        }
    }

    struct BrokenSignal;

    impl AdjustmentSignal for BrokenSignal {
        fn delta(
            &self,
            _: &str,
            _: &str,
            _: f64,
            _: &AdjustmentContext,
        ) -> Result<f64, ModelError> {
            Err(ModelError::TeamNotFound("X".into()))
        }
        fn name(&self) -> &str {
            "broken"
        }
    }

    fn full_context() -> AdjustmentContext {
        AdjustmentContext::empty()
            .with_pace(HashMap::from([
                ("Home".to_string(), 104.0),
                ("Away".to_string(), 100.0),
            ]))
            .with_injuries(HashMap::from([(
                "Home".to_string(),
                vec!["Role Player (out)".to_string()],
            )]))
            .with_records(HashMap::from([
                ("Home".to_string(), TeamRecord::new(30, 10)),
                ("Away".to_string(), TeamRecord::new(20, 20)),
            ]))
    }

    #[test]
    fn standard_order_is_pace_injury_streak() {
        assert_eq!(AdjustmentPipeline::standard().names(), vec!["pace", "injury", "streak"]);
    }

    #[test]
    fn from_config_respects_toggles() {
        let config = PipelineConfig {
            injury: false,
            ..PipelineConfig::default()
        };
        assert_eq!(AdjustmentPipeline::from_config(&config).names(), vec!["pace", "streak"]);
    }

    #[test]
    fn empty_context_leaves_estimate_unchanged() {
        let result = AdjustmentPipeline::standard().apply(
            "Home",
            "Away",
            221.3,
            &AdjustmentContext::empty(),
        );
        assert_eq!(result.adjusted, 221.3);
        assert!(result.stages.iter().all(|s| !s.available && s.delta == 0.0));
    }

    #[test]
    fn deltas_sum_into_estimate() {
        let result = AdjustmentPipeline::standard().apply("Home", "Away", 220.0, &full_context());
        // pace +0.8, injury -0.75, streak +0.75
        assert!((result.stage("pace").unwrap() - 0.8).abs() < 1e-9);
        assert!((result.stage("injury").unwrap() + 0.75).abs() < 1e-9);
        assert!((result.stage("streak").unwrap() - 0.75).abs() < 1e-9);
        assert!((result.adjusted - 220.8).abs() < 1e-9);
        assert!((result.total_delta() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn order_changes_running_values_not_result() {
        let forward = AdjustmentPipeline::new()
            .with_signal(Box::new(FixedSignal("a", 2.0)))
            .with_signal(Box::new(FixedSignal("b", -3.0)));
        let reverse = AdjustmentPipeline::new()
            .with_signal(Box::new(FixedSignal("b", -3.0)))
            .with_signal(Box::new(FixedSignal("a", 2.0)));

        let ctx = AdjustmentContext::empty();
        let f = forward.apply("H", "A", 200.0, &ctx);
        let r = reverse.apply("H", "A", 200.0, &ctx);
        assert_eq!(f.adjusted, r.adjusted);
        assert_ne!(f.stages[0].running, r.stages[0].running);
    }

    #[test]
    fn failing_signal_degrades_to_zero() {
        let pipeline = AdjustmentPipeline::new()
            .with_signal(Box::new(BrokenSignal))
            .with_signal(Box::new(FixedSignal("ok", 1.0)));
        let result = pipeline.apply("H", "A", 200.0, &AdjustmentContext::empty());
        assert_eq!(result.adjusted, 201.0);
        assert!(!result.stages[0].available);
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let pipeline =
            AdjustmentPipeline::new().with_signal(Box::new(FixedSignal("nan", f64::NAN)));
        let result = pipeline.apply("H", "A", 200.0, &AdjustmentContext::empty());
        assert_eq!(result.adjusted, 200.0);
    }
}
