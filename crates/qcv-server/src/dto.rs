//! Data transfer objects for the HTTP API.

use serde::{Deserialize, Serialize};

/// One gate of an inbound circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// Gate name: `H`, `X`, `Y`, `Z`, `CNOT`, `Toffoli`, `SWAP`, `ISWAP` or `M0`.
    pub name: String,
    /// Qubit indices, in the order the gate's roles are assigned from.
    pub qubits: Vec<u32>,
}

/// Body of `POST /circuit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitRequest {
    /// Number of qubit wires.
    pub qubit_no: u32,
    /// Gates in application order.
    pub gates: Vec<Gate>,
}

/// Successful image response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Public URL of the generated PNG.
    pub image_url: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingResponse {
    pub message: String,
}

impl Default for GreetingResponse {
    fn default() -> Self {
        Self {
            message: "Hello, World!".to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status (always "ok" if responding).
    pub status: String,
    /// Server version.
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error envelope shared by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
