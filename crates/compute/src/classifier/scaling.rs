//! Per-feature standardization used while fitting.
//!
//! Gradient descent converges far faster on z-scored inputs; the fitted
//! weights are folded back into raw-feature coefficients afterwards.

/// Per-dimension mean and population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureScaling {
    pub means: [f64; 3],
    pub stddevs: [f64; 3],
}

impl FeatureScaling {
    /// Compute population statistics over `rows`.
    ///
    /// Dimensions without variance get a unit std so they standardize to 0.
    pub fn fit(rows: &[[f64; 3]]) -> Self {
        if rows.is_empty() {
            return Self {
                means: [0.0; 3],
                stddevs: [1.0; 3],
            };
        }

        let n = rows.len() as f64;
        let mut means = [0.0; 3];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut variance = [0.0; 3];
        for row in rows {
            for i in 0..3 {
                let diff = row[i] - means[i];
                variance[i] += diff * diff;
            }
        }

        let stddevs = variance.map(|v| {
            let std = (v / n).sqrt();
            if std <= f64::EPSILON { 1.0 } else { std }
        });

        Self { means, stddevs }
    }

    pub fn transform(&self, row: &[f64; 3]) -> [f64; 3] {
        [
            (row[0] - self.means[0]) / self.stddevs[0],
            (row[1] - self.means[1]) / self.stddevs[1],
            (row[2] - self.means[2]) / self.stddevs[2],
        ]
    }

    /// Convert weights learned on standardized inputs to raw-input coefficients and intercept.
    pub fn unscale(&self, weights: &[f64; 3], bias: f64) -> ([f64; 3], f64) {
        let mut coefficients = [0.0; 3];
        let mut intercept = bias;
        for i in 0..3 {
            coefficients[i] = weights[i] / self.stddevs[i];
            intercept -= coefficients[i] * self.means[i];
        }
        (coefficients, intercept)
    }
}
