//! Circuit diagrams.
//!
//! Qubit wires are drawn top to bottom followed by the classical wires (as
//! double lines). Instructions are placed column by column using
//! [`qcv_ir::layout::layers`].

use std::path::Path;

use image::Rgb;
use qcv_ir::{Circuit, Instruction, InstructionKind, StandardGate};
use tracing::debug;

use crate::canvas::{Canvas, GLYPH_SIZE, color};
use crate::error::RenderResult;

/// Visual parameters of a circuit diagram, in pixels.
#[derive(Debug, Clone)]
pub struct CircuitStyle {
    /// Outer margin on every side.
    pub margin: u32,
    /// Vertical distance between adjacent wires.
    pub wire_spacing: u32,
    /// Horizontal distance between adjacent columns.
    pub column_width: u32,
    /// Side of a single-qubit gate box.
    pub gate_size: u32,
    /// Scale of the wire labels.
    pub label_scale: u32,
    /// Scale of one- and two-character gate labels.
    pub gate_scale: u32,
    /// Scale of longer gate labels.
    pub long_gate_scale: u32,
    /// Radius of a control dot.
    pub control_radius: i32,
    /// Radius of the ⊕ target.
    pub target_radius: i32,
    /// Half-width of a SWAP cross.
    pub swap_half: f32,
    /// Draw `q0`, `c0`, ... at the left of each wire.
    pub show_labels: bool,
    /// Background colour.
    pub background: Rgb<u8>,
    /// Wire and outline colour.
    pub ink: Rgb<u8>,
    /// Gate box fill.
    pub gate_fill: Rgb<u8>,
}

impl Default for CircuitStyle {
    fn default() -> Self {
        Self {
            margin: 20,
            wire_spacing: 60,
            column_width: 72,
            gate_size: 44,
            label_scale: 2,
            gate_scale: 2,
            long_gate_scale: 1,
            control_radius: 6,
            target_radius: 14,
            swap_half: 9.0,
            show_labels: true,
            background: color::WHITE,
            ink: color::BLACK,
            gate_fill: color::WHITE,
        }
    }
}

/// Pixel geometry derived from a circuit and a style.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    num_qubits: usize,
    wire_start: f32,
    wire_end: f32,
    first_row: f32,
    spacing: f32,
    column_width: f32,
}

impl Geometry {
    fn row_y(&self, row: usize) -> f32 {
        self.first_row + row as f32 * self.spacing
    }

    fn qubit_y(&self, qubit: qcv_ir::QubitId) -> f32 {
        self.row_y(qubit.index())
    }

    fn clbit_y(&self, clbit: qcv_ir::ClbitId) -> f32 {
        self.row_y(self.num_qubits + clbit.index())
    }

    fn column_x(&self, column: usize) -> f32 {
        self.wire_start + (column as f32 + 0.5) * self.column_width
    }
}

/// Draw `circuit` with the default style.
pub fn render_circuit(circuit: &Circuit) -> RenderResult<Canvas> {
    render_circuit_with_style(circuit, &CircuitStyle::default())
}

/// Draw `circuit` with the default style and write it as PNG to `path`.
pub fn save_circuit_png(circuit: &Circuit, path: impl AsRef<Path>) -> RenderResult<()> {
    render_circuit(circuit)?.save_png(path)
}

/// Draw `circuit` with `style`.
pub fn render_circuit_with_style(circuit: &Circuit, style: &CircuitStyle) -> RenderResult<Canvas> {
    let num_qubits = circuit.num_qubits();
    let num_clbits = circuit.num_clbits();
    let rows = (num_qubits + num_clbits).max(1) as u64;
    let layers = circuit.layers();
    let columns = layers.len().max(1) as u64;

    let label_width = if style.show_labels {
        label_width(circuit, style)
    } else {
        0
    };

    let margin = u64::from(style.margin);
    let wire_start = margin + u64::from(label_width);
    let width = wire_start + columns * u64::from(style.column_width) + margin;
    let height = 2 * margin + rows * u64::from(style.wire_spacing);

    let mut canvas = Canvas::new(width, height, style.background)?;
    let geo = Geometry {
        num_qubits,
        wire_start: wire_start as f32,
        wire_end: (width - margin) as f32,
        first_row: style.margin as f32 + style.wire_spacing as f32 / 2.0,
        spacing: style.wire_spacing as f32,
        column_width: style.column_width as f32,
    };

    if style.show_labels {
        let labels = circuit
            .qubits()
            .map(|q| q.to_string())
            .chain(circuit.clbits().map(|c| c.to_string()));
        for (row, label) in labels.enumerate() {
            canvas.text_centered(
                (style.margin + label_width / 2) as i32,
                geo.row_y(row) as i32,
                &label,
                style.label_scale,
                style.ink,
            );
        }
    }

    for row in 0..num_qubits {
        let y = geo.row_y(row);
        canvas.line((geo.wire_start, y), (geo.wire_end, y), style.ink);
    }
    for row in num_qubits..num_qubits + num_clbits {
        let y = geo.row_y(row);
        canvas.line((geo.wire_start, y - 2.0), (geo.wire_end, y - 2.0), style.ink);
        canvas.line((geo.wire_start, y + 2.0), (geo.wire_end, y + 2.0), style.ink);
    }

    for layer in &layers {
        let x = geo.column_x(layer.depth);
        for instruction in &layer.instructions {
            draw_instruction(&mut canvas, instruction, x, &geo, style);
        }
    }

    debug!(
        circuit = circuit.name(),
        qubits = num_qubits,
        clbits = num_clbits,
        columns = layers.len(),
        width = canvas.width(),
        height = canvas.height(),
        "circuit diagram rendered"
    );

    Ok(canvas)
}

/// Width reserved for wire labels; the last qubit and clbit carry the
/// longest names.
fn label_width(circuit: &Circuit, style: &CircuitStyle) -> u32 {
    let last_qubit = circuit.num_qubits().checked_sub(1).map(|i| format!("q{i}"));
    let last_clbit = circuit.num_clbits().checked_sub(1).map(|i| format!("c{i}"));
    [last_qubit, last_clbit]
        .iter()
        .flatten()
        .map(|l| Canvas::text_width(l, style.label_scale) + style.margin / 2)
        .max()
        .unwrap_or(0)
}

fn draw_instruction(
    canvas: &mut Canvas,
    instruction: &Instruction,
    x: f32,
    geo: &Geometry,
    style: &CircuitStyle,
) {
    match instruction.kind {
        InstructionKind::Gate(gate) if gate.is_controlled() => {
            draw_controlled_not(canvas, instruction, x, geo, style);
        }
        InstructionKind::Gate(StandardGate::Swap) => draw_swap(canvas, instruction, x, geo, style),
        InstructionKind::Gate(gate) => {
            let ys: Vec<f32> = instruction.targets.iter().map(|&q| geo.qubit_y(q)).collect();
            draw_box(canvas, gate.label(), x, &ys, style);
        }
        InstructionKind::Measure => draw_measure(canvas, instruction, x, geo, style),
    }
}

/// Vertical connector through every operand of `instruction`.
fn draw_connector(
    canvas: &mut Canvas,
    instruction: &Instruction,
    x: f32,
    geo: &Geometry,
    style: &CircuitStyle,
) {
    if let Some((top, bottom)) = instruction.qubit_range() {
        canvas.line((x, geo.qubit_y(top)), (x, geo.qubit_y(bottom)), style.ink);
    }
}

fn draw_controlled_not(
    canvas: &mut Canvas,
    instruction: &Instruction,
    x: f32,
    geo: &Geometry,
    style: &CircuitStyle,
) {
    draw_connector(canvas, instruction, x, geo, style);

    for &control in &instruction.controls {
        let center = (x as i32, geo.qubit_y(control) as i32);
        canvas.circle(center, style.control_radius, Some(style.ink), None);
    }
    for &target in &instruction.targets {
        let y = geo.qubit_y(target);
        let r = style.target_radius;
        canvas.circle((x as i32, y as i32), r, Some(style.gate_fill), Some(style.ink));
        let r = r as f32;
        canvas.line((x - r, y), (x + r, y), style.ink);
        canvas.line((x, y - r), (x, y + r), style.ink);
    }
}

fn draw_swap(
    canvas: &mut Canvas,
    instruction: &Instruction,
    x: f32,
    geo: &Geometry,
    style: &CircuitStyle,
) {
    draw_connector(canvas, instruction, x, geo, style);

    let s = style.swap_half;
    for &target in &instruction.targets {
        let y = geo.qubit_y(target);
        canvas.thick_line((x - s, y - s), (x + s, y + s), 2, style.ink);
        canvas.thick_line((x - s, y + s), (x + s, y - s), 2, style.ink);
    }
}

/// Labelled box covering every wire in `ys`.
fn draw_box(canvas: &mut Canvas, label: &str, x: f32, ys: &[f32], style: &CircuitStyle) {
    let Some(top) = ys.iter().copied().reduce(f32::min) else {
        return;
    };
    let bottom = ys.iter().copied().fold(top, f32::max);

    let scale = if label.chars().count() <= 2 {
        style.gate_scale
    } else {
        style.long_gate_scale
    };
    let half = style.gate_size as f32 / 2.0;
    let box_width = style
        .gate_size
        .max(Canvas::text_width(label, scale) + GLYPH_SIZE);
    let box_height = (bottom - top) as u32 + style.gate_size;

    canvas.rect(
        (x - box_width as f32 / 2.0) as i32,
        (top - half) as i32,
        box_width,
        box_height,
        Some(style.gate_fill),
        Some(style.ink),
    );
    canvas.text_centered(x as i32, ((top + bottom) / 2.0) as i32, label, scale, style.ink);
}

fn draw_measure(
    canvas: &mut Canvas,
    instruction: &Instruction,
    x: f32,
    geo: &Geometry,
    style: &CircuitStyle,
) {
    let (Some(&qubit), Some(&clbit)) = (instruction.targets.first(), instruction.clbits.first())
    else {
        return;
    };
    let qy = geo.qubit_y(qubit);
    let cy = geo.clbit_y(clbit);

    canvas.line((x - 2.0, qy), (x - 2.0, cy), style.ink);
    canvas.line((x + 2.0, qy), (x + 2.0, cy), style.ink);
    canvas.circle((x as i32, cy as i32), 4, Some(style.ink), None);

    draw_box(canvas, "M", x, &[qy], style);
}
