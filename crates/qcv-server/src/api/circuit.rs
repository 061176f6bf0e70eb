//! Circuit diagram endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use qcv_render::save_circuit_png;
use tracing::info;

use crate::dto::{CircuitRequest, ImageResponse};
use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::ArtifactKind;
use crate::translate::translate_circuit;

/// POST /circuit - Translate the gate list, draw it, and return the image URL.
pub async fn create_circuit_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CircuitRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(request) = payload?;

    let artifact = state.store.allocate(ArtifactKind::Circuit);
    let circuit = translate_circuit(&request)?;

    // CPU-bound for large circuits; runs on the blocking pool.
    let path = artifact.path.clone();
    let depth = circuit.depth();
    tokio::task::spawn_blocking(move || save_circuit_png(&circuit, &path)).await??;

    info!(
        file = %artifact.file_name,
        qubits = request.qubit_no,
        gates = request.gates.len(),
        depth,
        "Circuit image written"
    );

    Ok(Json(ImageResponse {
        image_url: artifact.url,
    }))
}
