//! L2-regularized logistic regression fitted by Newton's method (IRLS).
//! Objective: 0.5·‖w‖² + C·Σ logloss, bias unpenalized. Zero initialization, so
//! fitting the same corpus always yields the same parameters.

use super::Label;
use crate::config::TrainingConfig;
use crate::error::{DimensionMismatch, TrainingError};
use crate::features::FeatureVector;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

const MIN_PROB: f64 = f64::EPSILON;
const PIVOT_EPS: f64 = 1e-12;
const MIN_STEP: f64 = 1e-10;

/// Logistic function, clamped into the open interval (0, 1).
pub fn sigmoid(z: f64) -> f64 {
    let p = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    p.clamp(MIN_PROB, 1.0 - MIN_PROB)
}

/// log(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParameters {
    pub weights: Vec<f64>,
    pub bias: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub iterations: usize,
    pub converged: bool,
    /// Stopped because no step along the Newton direction lowered the objective
    pub stalled: bool,
}

#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    params: ClassifierParameters,
}

impl LogisticClassifier {
    pub fn new(params: ClassifierParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParameters {
        &self.params
    }

    pub fn dim(&self) -> usize {
        self.params.weights.len()
    }

    /// Probability of the phishing class for a normalized vector.
    pub fn predict(&self, vector: &FeatureVector) -> Result<f64, DimensionMismatch> {
        vector.check_dim(self.dim())?;
        let z: f64 = self
            .params
            .weights
            .iter()
            .zip(vector.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.params.bias;
        Ok(sigmoid(z))
    }

    pub fn fit(
        vectors: &[FeatureVector],
        labels: &[Label],
        config: &TrainingConfig,
    ) -> Result<(Self, FitReport), TrainingError> {
        let first = vectors.first().ok_or(TrainingError::EmptyCorpus)?;
        if labels.len() != vectors.len() {
            return Err(TrainingError::LabelCount {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }
        let dim = first.dim();
        for v in vectors {
            v.check_dim(dim)?;
        }
        if let Some(only) = single_class(labels) {
            return Err(TrainingError::SingleClass {
                class: only.to_string(),
            });
        }

        // Design matrix with a trailing column of ones for the bias.
        let n = vectors.len();
        let mut x = Array2::<f64>::ones((n, dim + 1));
        for (i, v) in vectors.iter().enumerate() {
            for (j, &val) in v.as_slice().iter().enumerate() {
                x[[i, j]] = val;
            }
        }
        let y: Array1<f64> = labels
            .iter()
            .map(|l| if l.is_phishing() { 1.0 } else { 0.0 })
            .collect();

        let c = config.inverse_regularization;
        let mut theta = Array1::<f64>::zeros(dim + 1);
        let mut current = objective(&x, &y, &theta, c);
        let mut report = FitReport {
            iterations: 0,
            converged: false,
            stalled: false,
        };

        for iteration in 1..=config.max_iterations {
            report.iterations = iteration;
            let p = x.dot(&theta).mapv(sigmoid);

            let mut grad = x.t().dot(&(&p - &y)) * c;
            let w = p.mapv(|pi| c * pi * (1.0 - pi));
            let xw = &x * &w.insert_axis(Axis(1));
            let mut hessian = x.t().dot(&xw);
            for j in 0..dim {
                grad[j] += theta[j];
                hessian[[j, j]] += 1.0;
            }

            let step = solve(hessian, grad).ok_or(TrainingError::Singular { iteration })?;

            let Some((candidate, value, t)) = line_search(&x, &y, &theta, &step, current, c) else {
                // No descent along the Newton direction: theta is optimal to working precision.
                tracing::debug!(iteration, "line search stalled");
                report.converged = true;
                report.stalled = true;
                break;
            };

            let max_step = step.iter().fold(0.0f64, |m, s| m.max((s * t).abs()));
            theta = candidate;
            current = value;
            if max_step < config.tolerance {
                report.converged = true;
                break;
            }
        }

        if !report.converged {
            tracing::warn!(iterations = report.iterations, "logistic fit did not converge");
        }

        let params = ClassifierParameters {
            weights: theta.iter().take(dim).copied().collect(),
            bias: theta[dim],
        };
        Ok((Self::new(params), report))
    }
}

/// Halve the step until the objective does not increase. `None` if even the
/// smallest step increases it; the caller then keeps `theta`.
fn line_search(
    x: &Array2<f64>,
    y: &Array1<f64>,
    theta: &Array1<f64>,
    step: &Array1<f64>,
    current: f64,
    c: f64,
) -> Option<(Array1<f64>, f64, f64)> {
    let mut t = 1.0;
    while t > MIN_STEP {
        let candidate = theta - &(step * t);
        let value = objective(x, y, &candidate, c);
        if value <= current {
            return Some((candidate, value, t));
        }
        t *= 0.5;
    }
    None
}

fn single_class(labels: &[Label]) -> Option<Label> {
    let first = *labels.first()?;
    labels.iter().all(|&l| l == first).then_some(first)
}

fn objective(x: &Array2<f64>, y: &Array1<f64>, theta: &Array1<f64>, c: f64) -> f64 {
    let dim = theta.len() - 1;
    let penalty: f64 = theta.iter().take(dim).map(|w| w * w).sum::<f64>() * 0.5;
    let z = x.dot(theta);
    let loss: f64 = z
        .iter()
        .zip(y.iter())
        .map(|(&zi, &yi)| softplus(zi) - yi * zi)
        .sum();
    penalty + c * loss
}

/// Gaussian elimination with partial pivoting; `None` on a (near-)singular system.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < PIVOT_EPS {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([pivot, k], [col, k]);
            }
            b.swap(pivot, col);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut out = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * out[k]).sum();
        out[row] = (b[row] - tail) / a[[row, row]];
    }
    Some(out)
}
