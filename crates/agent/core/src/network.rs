//! Dense-ReLU-dense network shared by the policy and the intent classifier.
//!
//! ```text
//! h = relu(W1 · x + b1)
//! y = W2 · h + b2
//! ```
//!
//! Two single-sample training steps are provided: a semi-gradient TD step that
//! touches one output row, and a softmax cross-entropy step that touches all of
//! them. There is no batching and no optimizer state.

use rand::Rng;

use crate::error::ShapeError;

/// Layer sizes of a [`DenseNetwork`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NetworkShape {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl NetworkShape {
    pub const fn new(inputs: usize, hidden: usize, outputs: usize) -> Self {
        Self {
            inputs,
            hidden,
            outputs,
        }
    }

    fn as_tuple(self) -> (usize, usize, usize) {
        (self.inputs, self.hidden, self.outputs)
    }
}

/// Intermediate values of one forward pass, kept for the backward step.
#[derive(Clone, Debug, PartialEq)]
pub struct Activations {
    pub pre_hidden: Vec<f64>,
    pub hidden: Vec<f64>,
    pub outputs: Vec<f64>,
}

/// Two-layer perceptron with row-major weight matrices.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DenseNetwork {
    shape: NetworkShape,
    /// `hidden × inputs`
    w1: Vec<f64>,
    b1: Vec<f64>,
    /// `outputs × hidden`
    w2: Vec<f64>,
    b2: Vec<f64>,
}

impl DenseNetwork {
    /// Half-width of the uniform weight initialization interval.
    pub const INIT_SCALE: f64 = 0.4;

    /// Uniform weights in `[-INIT_SCALE, INIT_SCALE)`, zero biases.
    pub fn random<R: Rng + ?Sized>(shape: NetworkShape, rng: &mut R) -> Self {
        let mut weights = |len: usize| -> Vec<f64> {
            (0..len)
                .map(|_| rng.random_range(-Self::INIT_SCALE..Self::INIT_SCALE))
                .collect()
        };
        let w1 = weights(shape.hidden * shape.inputs);
        let w2 = weights(shape.outputs * shape.hidden);

        Self {
            shape,
            w1,
            b1: vec![0.0; shape.hidden],
            w2,
            b2: vec![0.0; shape.outputs],
        }
    }

    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    /// Checks that the declared shape is `expected` and that every parameter
    /// buffer has the length that shape implies.
    pub fn validate(&self, expected: NetworkShape) -> Result<(), ShapeError> {
        if self.shape != expected {
            return Err(ShapeError::Declared {
                expected: expected.as_tuple(),
                actual: self.shape.as_tuple(),
            });
        }

        let layers = [
            ("w1", &self.w1, expected.hidden * expected.inputs),
            ("b1", &self.b1, expected.hidden),
            ("w2", &self.w2, expected.outputs * expected.hidden),
            ("b2", &self.b2, expected.outputs),
        ];
        for (layer, values, len) in layers {
            if values.len() != len {
                return Err(ShapeError::Layer {
                    layer,
                    expected: len,
                    actual: values.len(),
                });
            }
            if values.iter().any(|value| !value.is_finite()) {
                return Err(ShapeError::NonFinite);
            }
        }

        Ok(())
    }

    pub fn forward(&self, inputs: &[f64]) -> Activations {
        let pre_hidden: Vec<f64> = self
            .w1
            .chunks_exact(self.shape.inputs.max(1))
            .zip(&self.b1)
            .map(|(row, bias)| bias + dot(row, inputs))
            .collect();
        let hidden: Vec<f64> = pre_hidden.iter().map(|&z| z.max(0.0)).collect();
        let outputs = self
            .w2
            .chunks_exact(self.shape.hidden.max(1))
            .zip(&self.b2)
            .map(|(row, bias)| bias + dot(row, &hidden))
            .collect();

        Activations {
            pre_hidden,
            hidden,
            outputs,
        }
    }

    /// Output layer only.
    pub fn predict(&self, inputs: &[f64]) -> Vec<f64> {
        self.forward(inputs).outputs
    }

    /// Moves output `output` towards `target` by one semi-gradient step and
    /// returns the TD error.
    ///
    /// Only row `output` of `W2` changes; hidden units contribute through the
    /// ReLU mask, so units with non-positive pre-activation are left untouched.
    /// Hidden gradients read the output row after it has been updated.
    pub fn td_step(&mut self, inputs: &[f64], output: usize, target: f64, rate: f64) -> f64 {
        let Activations {
            pre_hidden, hidden, ..
        } = self.forward(inputs);
        let Some(estimate) = self.predict_one(&hidden, output) else {
            return 0.0;
        };
        let error = target - estimate;

        let hidden_width = self.shape.hidden;
        let row = &mut self.w2[output * hidden_width..(output + 1) * hidden_width];
        for (weight, h) in row.iter_mut().zip(&hidden) {
            *weight += rate * error * h;
        }
        self.b2[output] += rate * error;

        for (unit, &z) in pre_hidden.iter().enumerate() {
            if z <= 0.0 {
                continue;
            }
            let delta = error * self.w2[output * hidden_width + unit];
            self.adjust_hidden_unit(unit, inputs, rate * delta);
        }

        error
    }

    /// One softmax cross-entropy step towards class `label`; returns the loss
    /// before the update.
    pub fn cross_entropy_step(&mut self, inputs: &[f64], label: usize, rate: f64) -> f64 {
        let Activations {
            pre_hidden,
            hidden,
            outputs,
        } = self.forward(inputs);
        let probs = softmax(&outputs);
        let loss = probs
            .get(label)
            .map_or(0.0, |p| -p.max(f64::MIN_POSITIVE).ln());
        let deltas: Vec<f64> = probs
            .iter()
            .enumerate()
            .map(|(idx, p)| p - if idx == label { 1.0 } else { 0.0 })
            .collect();

        let hidden_width = self.shape.hidden;
        for (output, delta) in deltas.iter().enumerate() {
            let row = &mut self.w2[output * hidden_width..(output + 1) * hidden_width];
            for (weight, h) in row.iter_mut().zip(&hidden) {
                *weight -= rate * delta * h;
            }
            self.b2[output] -= rate * delta;
        }

        for (unit, &z) in pre_hidden.iter().enumerate() {
            if z <= 0.0 {
                continue;
            }
            let back: f64 = deltas
                .iter()
                .enumerate()
                .map(|(output, delta)| delta * self.w2[output * hidden_width + unit])
                .sum();
            self.adjust_hidden_unit(unit, inputs, -rate * back);
        }

        loss
    }

    fn predict_one(&self, hidden: &[f64], output: usize) -> Option<f64> {
        let width = self.shape.hidden;
        let row = self.w2.get(output * width..(output + 1) * width)?;
        Some(self.b2.get(output)? + dot(row, hidden))
    }

    fn adjust_hidden_unit(&mut self, unit: usize, inputs: &[f64], step: f64) {
        let width = self.shape.inputs;
        let row = &mut self.w1[unit * width..(unit + 1) * width];
        for (weight, x) in row.iter_mut().zip(inputs) {
            *weight += step * x;
        }
        self.b1[unit] += step;
    }
}

/// Numerically stable softmax; an empty input yields an empty output.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|value| (value - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    let sum = if sum > 0.0 { sum } else { 1.0 };
    exps.into_iter().map(|value| value / sum).collect()
}

fn dot(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}
