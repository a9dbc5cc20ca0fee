//! Custom test assertions

use llm_fanout::{CorrelatedResults, Model};
use std::collections::HashSet;

/// Assertions for CorrelatedResults
pub trait CorrelatedResultsAssertions {
    /// Every model appears exactly once across successes and failures
    fn assert_covers(&self, models: &[Model]);

    /// Each answer and each stats record sits under the model that produced it
    fn assert_correlated(&self);
}

impl CorrelatedResultsAssertions for CorrelatedResults {
    fn assert_covers(&self, models: &[Model]) {
        let succeeded: HashSet<&str> = self.responses.keys().map(|m| m.id.as_str()).collect();
        let failed: HashSet<&str> = self
            .completion_failures
            .keys()
            .map(|m| m.id.as_str())
            .collect();

        assert!(
            succeeded.is_disjoint(&failed),
            "Models both succeeded and failed: {:?}",
            succeeded.intersection(&failed).collect::<Vec<_>>()
        );

        let settled: HashSet<&str> = succeeded.union(&failed).copied().collect();
        let expected: HashSet<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(settled, expected, "Settled model set differs from the dispatched one");
    }

    fn assert_correlated(&self) {
        for (model, response) in &self.responses {
            assert_eq!(
                response.model, model.id,
                "Answer of '{}' filed under '{}'",
                response.model, model.id
            );
            assert!(
                response.response.contains(&model.id),
                "Answer text for '{}' came from another model: {}",
                model.id,
                response.response
            );
            if let Some(stats) = self.cost_and_stats.get(model) {
                assert_eq!(stats.id, response.id, "Stats of '{}' not linked to its answer", model.id);
            }
        }

        for model in self.cost_and_stats.keys() {
            assert!(
                self.responses.contains_key(model),
                "Stats for '{}' without a completion",
                model.id
            );
        }
    }
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_approx_eq!($left, $right, 1e-9_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            "assertion failed: `(left ~ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`",
            left_val,
            right_val,
            diff
        );
    };
}
