//! Ordered transformation steps run over a [`Dataset`] in place.
//!
//! Each step takes the dataset mutably and either completes or fails the
//! whole run. Steps never add or remove rows.
//!
//! # Example
//!
//! ```
//! use datacleaner::transform::{run_steps, DEFAULT_STEPS};
//! use datacleaner::Dataset;
//! use serde_json::json;
//!
//! let mut ds = Dataset::from_columns([
//!     ("preco_unitario", vec![json!(10.0)]),
//!     ("quantidade_vendida", vec![json!(2)]),
//! ]);
//! run_steps(&mut ds, DEFAULT_STEPS).unwrap();
//! assert_eq!(ds.rows()[0]["faturamento"], 20.0);
//! ```

use crate::error::TransformResult;
use crate::models::Dataset;

use super::revenue::calcular_faturamento;

/// A transformation applied in place.
pub type Step = fn(&mut Dataset) -> TransformResult<()>;

/// A named step, logged when it completes.
#[derive(Debug, Clone, Copy)]
pub struct PipelineStep {
    pub name: &'static str,
    pub run: Step,
}

/// Steps run by [`crate::DataCleaner::pipeline`], in order.
pub const DEFAULT_STEPS: &[PipelineStep] = &[PipelineStep {
    name: "faturamento",
    run: calcular_faturamento,
}];

/// Run `steps` in order, stopping at the first failure.
pub fn run_steps(dataset: &mut Dataset, steps: &[PipelineStep]) -> TransformResult<()> {
    for step in steps {
        (step.run)(dataset)?;
        tracing::info!(step = step.name, rows = dataset.len(), "Pipeline step completed");
    }
    Ok(())
}
