//! Transformation module.
//!
//! - Revenue: derived `faturamento` column
//! - Pipeline: ordered steps run over a dataset in place

pub mod pipeline;
pub mod revenue;

pub use pipeline::{run_steps, PipelineStep, Step, DEFAULT_STEPS};
pub use revenue::calcular_faturamento;
