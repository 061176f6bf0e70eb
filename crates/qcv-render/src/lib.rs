//! `qcv-render`: raster output for the circuit visualiser.
//!
//! Two image kinds are produced, both as PNG:
//!
//! - **Circuit diagrams** ([`render_circuit`]): one horizontal wire per qubit,
//!   a double wire per classical bit, and one column per layer of
//!   [`qcv_ir::Circuit::layers`].
//! - **XY plots** ([`Plot`]): line and marker series on linear axes with a
//!   legend, used for expectation-value curves.
//!
//! # Example
//!
//! ```rust,no_run
//! use qcv_ir::{Circuit, QubitId};
//! use qcv_render::{Plot, Series, save_circuit_png};
//!
//! let mut circuit = Circuit::with_size("demo", 2, 1);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! save_circuit_png(&circuit, "circuit.png").unwrap();
//!
//! let t = vec![0.0, 1.0, 2.0];
//! Plot::new()
//!     .x_label("Time")
//!     .series(Series::line("ramp", t.clone(), t))
//!     .save_png("plot.png")
//!     .unwrap();
//! ```

pub mod canvas;
pub mod circuit;
pub mod error;
pub mod plot;

pub use canvas::Canvas;
pub use circuit::{CircuitStyle, render_circuit, render_circuit_with_style, save_circuit_png};
pub use error::{RenderError, RenderResult};
pub use plot::{Bounds, Plot, Series, SeriesStyle};
