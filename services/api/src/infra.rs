use loan_risk::assessment::{LoanEvaluator, LogisticPipeline};
use loan_risk::config::{AppConfig, ModelConfig};
use loan_risk::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads configuration and applies a command-line model path override.
pub(crate) fn load_config(model_override: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = model_override {
        config.model.artifact_path = path;
    }
    Ok(config)
}

/// One-time model load. Failure here is fatal for every command.
pub(crate) fn load_evaluator(
    config: &ModelConfig,
) -> Result<Arc<LoanEvaluator<LogisticPipeline>>, AppError> {
    let model = LogisticPipeline::load(&config.artifact_path)?;
    Ok(Arc::new(LoanEvaluator::new(Arc::new(model))))
}
