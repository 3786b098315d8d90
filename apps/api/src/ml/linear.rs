//! Small dense linear models: feature scaling, L2 logistic regression,
//! sigmoid (Platt) calibration and ridge regression.
//!
//! Feature counts here are in the tens and sample counts in the low
//! thousands, so everything is solved with Newton steps on dense matrices.

use serde::{Deserialize, Serialize};

use crate::ml::ModelError;

const NEWTON_MAX_ITER: usize = 100;
const NEWTON_TOL: f64 = 1e-8;

pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Solves `a · x = b` by Gaussian elimination with partial pivoting.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(ModelError::Numerical(format!("singular system at column {col}")));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

// ────────────────────────────────────────────────────────────────────────────
// Scaling
// ────────────────────────────────────────────────────────────────────────────

/// Zero-mean, unit-variance scaling per column. Constant columns keep a
/// scale of 1 so they map to 0 instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, ModelError> {
        let first = rows
            .first()
            .ok_or_else(|| ModelError::InsufficientData("cannot fit scaler on zero rows".into()))?;
        let dims = first.len();
        let n = rows.len() as f64;

        let mut mean = vec![0.0; dims];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }

        let mut scale = vec![0.0; dims];
        for row in rows {
            for ((s, v), m) in scale.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2) / n;
            }
        }
        for s in scale.iter_mut() {
            *s = if *s > 1e-12 { s.sqrt() } else { 1.0 };
        }

        Ok(StandardScaler { mean, scale })
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Logistic regression
// ────────────────────────────────────────────────────────────────────────────

/// Binary logistic regression with an L2 penalty on the weights (the
/// intercept is not penalized), minimizing
/// `½‖w‖² + C · Σ sᵢ · logloss(yᵢ, w·xᵢ + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// `n / (2 · count(class))` per sample, so both classes carry equal total
/// weight.
pub fn balanced_sample_weights(labels: &[u8]) -> Vec<f64> {
    let n = labels.len() as f64;
    let positives = labels.iter().filter(|&&y| y == 1).count() as f64;
    let negatives = n - positives;
    labels
        .iter()
        .map(|&y| {
            let count = if y == 1 { positives } else { negatives };
            if count > 0.0 {
                n / (2.0 * count)
            } else {
                0.0
            }
        })
        .collect()
}

impl LogisticRegression {
    fn objective(x: &[Vec<f64>], y: &[u8], s: &[f64], c: f64, params: &[f64]) -> f64 {
        let dims = params.len() - 1;
        let (w, b) = (&params[..dims], params[dims]);
        let penalty = 0.5 * dot(w, w);
        let loss: f64 = x
            .iter()
            .zip(y)
            .zip(s)
            .map(|((row, &label), &weight)| {
                let z = dot(w, row) + b;
                // -log σ(z) for y=1, -log(1-σ(z)) for y=0
                let l = if label == 1 { softplus(-z) } else { softplus(z) };
                weight * l
            })
            .sum();
        penalty + c * loss
    }

    pub fn fit(x: &[Vec<f64>], y: &[u8], sample_weights: &[f64], c: f64) -> Result<Self, ModelError> {
        let dims = x
            .first()
            .map(Vec::len)
            .ok_or_else(|| ModelError::InsufficientData("cannot fit on zero rows".into()))?;
        if !y.contains(&0) || !y.contains(&1) {
            return Err(ModelError::InsufficientData(
                "logistic regression needs both classes".into(),
            ));
        }

        let p = dims + 1;
        let mut params = vec![0.0; p];
        let mut current = Self::objective(x, y, sample_weights, c, &params);

        for _ in 0..NEWTON_MAX_ITER {
            let (w, b) = (&params[..dims], params[dims]);
            let mut grad = vec![0.0; p];
            let mut hess = vec![vec![0.0; p]; p];
            for (i, w_i) in w.iter().enumerate() {
                grad[i] = *w_i;
                hess[i][i] = 1.0;
            }

            for ((row, &label), &weight) in x.iter().zip(y).zip(sample_weights) {
                let prob = sigmoid(dot(w, row) + b);
                let residual = c * weight * (prob - f64::from(label));
                let curvature = c * weight * prob * (1.0 - prob);
                for j in 0..p {
                    let xj = if j < dims { row[j] } else { 1.0 };
                    grad[j] += residual * xj;
                    if curvature == 0.0 {
                        continue;
                    }
                    for k in j..p {
                        let xk = if k < dims { row[k] } else { 1.0 };
                        hess[j][k] += curvature * xj * xk;
                    }
                }
            }
            for j in 0..p {
                for k in 0..j {
                    hess[j][k] = hess[k][j];
                }
            }

            if grad.iter().all(|g| g.abs() < NEWTON_TOL) {
                break;
            }

            let step = solve(hess, grad)?;
            let mut t = 1.0;
            let mut improved = false;
            while t > 1e-10 {
                let candidate: Vec<f64> = params.iter().zip(&step).map(|(v, d)| v - t * d).collect();
                let value = Self::objective(x, y, sample_weights, c, &candidate);
                if value <= current {
                    improved = current - value > NEWTON_TOL * current.abs().max(1.0);
                    params = candidate;
                    current = value;
                    break;
                }
                t *= 0.5;
            }
            if !improved {
                break;
            }
        }

        if params.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Numerical("logistic regression diverged".into()));
        }

        Ok(LogisticRegression {
            intercept: params[dims],
            weights: params[..dims].to_vec(),
        })
    }

    pub fn decision_function(&self, row: &[f64]) -> f64 {
        dot(&self.weights, row) + self.intercept
    }

    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.decision_function(row))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Platt scaling
// ────────────────────────────────────────────────────────────────────────────

/// Maps a decision value `f` to `1 / (1 + exp(a·f + b))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattScaling {
    pub a: f64,
    pub b: f64,
}

impl PlattScaling {
    /// Fits `a` and `b` by Newton's method with backtracking (Lin, Lin and
    /// Weng's formulation), against the prior-smoothed targets
    /// `(N₊ + 1)/(N₊ + 2)` and `1/(N₋ + 2)`.
    pub fn fit(decisions: &[f64], labels: &[u8]) -> Result<Self, ModelError> {
        let positives = labels.iter().filter(|&&y| y == 1).count() as f64;
        let negatives = labels.len() as f64 - positives;
        if positives == 0.0 || negatives == 0.0 {
            return Err(ModelError::InsufficientData(
                "calibration fold needs both classes".into(),
            ));
        }

        let hi = (positives + 1.0) / (positives + 2.0);
        let lo = 1.0 / (negatives + 2.0);
        let targets: Vec<f64> = labels.iter().map(|&y| if y == 1 { hi } else { lo }).collect();

        let objective = |a: f64, b: f64| -> f64 {
            decisions
                .iter()
                .zip(&targets)
                .map(|(f, t)| {
                    let z = a * f + b;
                    // t·log(1+e^z) + (1-t)·log(1+e^-z)
                    t * softplus(z) + (1.0 - t) * softplus(-z)
                })
                .sum()
        };

        let sigma = 1e-12;
        let mut a = 0.0;
        let mut b = ((negatives + 1.0) / (positives + 1.0)).ln();
        let mut value = objective(a, b);

        for _ in 0..NEWTON_MAX_ITER {
            let (mut h11, mut h22, mut h21, mut g1, mut g2) = (sigma, sigma, 0.0, 0.0, 0.0);
            for (f, t) in decisions.iter().zip(&targets) {
                let z = a * f + b;
                // p = 1/(1+e^z)
                let p = sigmoid(-z);
                let q = 1.0 - p;
                let d2 = p * q;
                h11 += f * f * d2;
                h22 += d2;
                h21 += f * d2;
                let d1 = t - p;
                g1 += f * d1;
                g2 += d1;
            }

            if g1.abs() < 1e-5 && g2.abs() < 1e-5 {
                break;
            }

            let det = h11 * h22 - h21 * h21;
            if det.abs() < 1e-300 {
                return Err(ModelError::Numerical("singular Platt Hessian".into()));
            }
            let da = -(h22 * g1 - h21 * g2) / det;
            let db = -(-h21 * g1 + h11 * g2) / det;
            let gd = g1 * da + g2 * db;

            let mut step = 1.0;
            let mut accepted = false;
            while step >= 1e-10 {
                let (na, nb) = (a + step * da, b + step * db);
                let candidate = objective(na, nb);
                if candidate < value + 1e-4 * step * gd {
                    a = na;
                    b = nb;
                    value = candidate;
                    accepted = true;
                    break;
                }
                step /= 2.0;
            }
            if !accepted {
                break;
            }
        }

        Ok(PlattScaling { a, b })
    }

    pub fn calibrate(&self, decision: f64) -> f64 {
        sigmoid(-(self.a * decision + self.b))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ridge regression
// ────────────────────────────────────────────────────────────────────────────

/// Least squares with an L2 penalty `alpha·‖w‖²`; the intercept is fitted on
/// centered data and not penalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl RidgeRegression {
    pub fn fit(x: &[Vec<f64>], y: &[f64], alpha: f64) -> Result<Self, ModelError> {
        let dims = x
            .first()
            .map(Vec::len)
            .ok_or_else(|| ModelError::InsufficientData("cannot fit on zero rows".into()))?;
        let n = x.len() as f64;

        let mut x_mean = vec![0.0; dims];
        for row in x {
            for (m, v) in x_mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }
        let y_mean = y.iter().sum::<f64>() / n;

        let mut gram = vec![vec![0.0; dims]; dims];
        let mut rhs = vec![0.0; dims];
        for (row, target) in x.iter().zip(y) {
            let centered: Vec<f64> = row.iter().zip(&x_mean).map(|(v, m)| v - m).collect();
            let yc = target - y_mean;
            for j in 0..dims {
                rhs[j] += centered[j] * yc;
                for k in j..dims {
                    gram[j][k] += centered[j] * centered[k];
                }
            }
        }
        for j in 0..dims {
            gram[j][j] += alpha;
            for k in 0..j {
                gram[j][k] = gram[k][j];
            }
        }

        let weights = solve(gram, rhs)?;
        let intercept = y_mean - dot(&weights, &x_mean);
        Ok(RidgeRegression { weights, intercept })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        dot(&self.weights, row) + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_small_system() {
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve(a, vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12, "x = {x:?}");
    }

    #[test]
    fn test_solve_singular_is_error() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(matches!(solve(a, vec![1.0, 2.0]), Err(ModelError::Numerical(_))));
    }

    #[test]
    fn test_scaler_centers_and_handles_constant_columns() {
        let rows = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        assert_eq!(scaler.mean, vec![2.0, 5.0]);
        assert_eq!(scaler.scale, vec![1.0, 1.0]);
        assert_eq!(scaler.transform(&[3.0, 5.0]), vec![1.0, 0.0]);
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0 && sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }

    fn separable() -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            let v = i as f64 / 10.0;
            x.push(vec![v + 1.0]);
            y.push(1);
            x.push(vec![-v - 1.0]);
            y.push(0);
        }
        (x, y)
    }

    #[test]
    fn test_logistic_regression_learns_sign() {
        let (x, y) = separable();
        let w = balanced_sample_weights(&y);
        let model = LogisticRegression::fit(&x, &y, &w, 1.0).unwrap();
        assert!(model.weights[0] > 0.0);
        assert!(model.predict_proba(&[2.0]) > 0.9);
        assert!(model.predict_proba(&[-2.0]) < 0.1);
    }

    #[test]
    fn test_logistic_regression_needs_both_classes() {
        let x = vec![vec![1.0], vec![2.0]];
        let y = vec![1, 1];
        assert!(matches!(
            LogisticRegression::fit(&x, &y, &[1.0, 1.0], 1.0),
            Err(ModelError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_balanced_weights_equalize_classes() {
        let w = balanced_sample_weights(&[1, 0, 0, 0]);
        assert_eq!(w, vec![2.0, 2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0]);
    }

    #[test]
    fn test_platt_scaling_is_monotone_increasing() {
        let decisions: Vec<f64> = (-10..10).map(|i| i as f64 / 2.0).collect();
        let labels: Vec<u8> = decisions
            .iter()
            .enumerate()
            .map(|(i, d)| if *d > 0.0 || i % 7 == 0 { 1 } else { 0 })
            .collect();
        let platt = PlattScaling::fit(&decisions, &labels).unwrap();
        assert!(platt.a < 0.0, "positive decisions should raise probability");
        assert!(platt.calibrate(3.0) > platt.calibrate(0.0));
        assert!(platt.calibrate(-3.0) < 0.5);
    }

    #[test]
    fn test_ridge_recovers_linear_relation() {
        let x: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, (i % 5) as f64]).collect();
        let y: Vec<f64> = x.iter().map(|r| 3.0 * r[0] - 2.0 * r[1] + 7.0).collect();
        let model = RidgeRegression::fit(&x, &y, 1e-6).unwrap();
        assert!((model.weights[0] - 3.0).abs() < 1e-4);
        assert!((model.weights[1] + 2.0).abs() < 1e-4);
        assert!((model.predict(&[10.0, 1.0]) - 35.0).abs() < 1e-3);
    }
}
