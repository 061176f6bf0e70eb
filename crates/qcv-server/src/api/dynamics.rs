//! Driven-qubit dynamics endpoint.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use qcv_render::{Plot, Series};
use qcv_sim::SigmaZComparison;
use qcv_sim::model::{DrivenQubit, default_times};
use serde_json::Value;
use tracing::info;

use crate::dto::ImageResponse;
use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::ArtifactKind;
use crate::translate::{DynamicsParams, parse_dynamics};

/// POST /dynamics - Solve the driven, dephasing qubit and plot ⟨σz⟩ against
/// the analytic reference.
pub async fn create_dynamics_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(body) = payload?;
    if !body.is_object() {
        return Err(ApiError::InvalidBody(
            "Expected a JSON object with 'delta' and 'beta'".to_string(),
        ));
    }
    let params = parse_dynamics(&body)?;

    let artifact = state.store.allocate(ArtifactKind::Dynamics);
    let path = artifact.path.clone();
    tokio::task::spawn_blocking(move || write_dynamics_plot(params, &path)).await??;

    info!(
        file = %artifact.file_name,
        delta = params.delta,
        beta = params.beta,
        "Dynamics plot written"
    );

    Ok(Json(ImageResponse {
        image_url: artifact.url,
    }))
}

/// Solve on the default grid and write the comparison plot to `path`.
pub fn write_dynamics_plot(params: DynamicsParams, path: &Path) -> Result<(), ApiError> {
    let model = DrivenQubit::new(params.delta, params.beta)?;
    let comparison = model.compare(&default_times())?;
    dynamics_plot(&comparison).save_png(path)?;
    Ok(())
}

/// Solved values as red `x` markers, the analytic curve as a line.
pub fn dynamics_plot(comparison: &SigmaZComparison) -> Plot {
    Plot::new()
        .x_label("Time")
        .y_label("<sigma_z>")
        .series(Series::crosses(
            "mesolve",
            comparison.times.clone(),
            comparison.solved.clone(),
        ))
        .series(Series::line(
            "Analytic",
            comparison.times.clone(),
            comparison.analytic.clone(),
        ))
}
