//! Derivative-free minimisation
//!
//! Nelder–Mead simplex search with optional box bounds. Used to estimate
//! seasonal ARIMA coefficients, where the objective has no closed-form
//! gradient.

use crate::{MathError, Result};

/// Outcome of a minimisation run
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerances were met before the iteration budget ran out
    pub converged: bool,
}

/// Nelder–Mead simplex minimiser
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    f_tolerance: f64,
    x_tolerance: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            f_tolerance: 1e-8,
            x_tolerance: 1e-6,
        }
    }
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;
/// Offset of each initial simplex vertex from the starting point
const INITIAL_STEP: f64 = 0.1;

impl NelderMead {
    /// Create a minimiser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: maximum number of iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder: tolerance on the spread of objective values in the simplex
    pub fn with_f_tolerance(mut self, tolerance: f64) -> Self {
        self.f_tolerance = tolerance;
        self
    }

    /// Builder: tolerance on the simplex diameter
    pub fn with_x_tolerance(mut self, tolerance: f64) -> Self {
        self.x_tolerance = tolerance;
        self
    }

    /// Minimise `objective` starting from `start`
    ///
    /// Non-finite objective values are treated as `+inf`. With `bounds`,
    /// every trial point is clamped into its box before evaluation.
    pub fn minimize<F>(
        &self,
        objective: F,
        start: &[f64],
        bounds: Option<&[(f64, f64)]>,
    ) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = start.len();
        if n == 0 {
            return Err(MathError::InvalidInput(
                "Starting point must have at least one dimension".to_string(),
            ));
        }
        if let Some(b) = bounds {
            if b.len() != n {
                return Err(MathError::InvalidInput(format!(
                    "Bounds length ({}) doesn't match dimension ({})",
                    b.len(),
                    n
                )));
            }
            if b.iter().any(|(lo, hi)| !(lo < hi)) {
                return Err(MathError::InvalidInput(
                    "Each bound must satisfy lower < upper".to_string(),
                ));
            }
        }

        let clamp = |x: &mut Vec<f64>| {
            if let Some(b) = bounds {
                for (v, (lo, hi)) in x.iter_mut().zip(b) {
                    *v = v.clamp(*lo, *hi);
                }
            }
        };
        let evaluate = |x: &[f64]| {
            let value = objective(x);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        // Initial simplex: start plus one perturbed vertex per dimension
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        let mut origin = start.to_vec();
        clamp(&mut origin);
        simplex.push(origin.clone());
        for i in 0..n {
            let mut vertex = origin.clone();
            vertex[i] += INITIAL_STEP;
            clamp(&mut vertex);
            if (vertex[i] - origin[i]).abs() < f64::EPSILON {
                vertex[i] -= INITIAL_STEP;
                clamp(&mut vertex);
            }
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|x| evaluate(x)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            order_simplex(&mut simplex, &mut values);

            if self.has_converged(&simplex, &values) {
                converged = true;
                break;
            }
            iterations += 1;

            let centroid = centroid(&simplex[..n]);
            let worst = &simplex[n];

            let mut reflected = along(&centroid, worst, -REFLECTION);
            clamp(&mut reflected);
            let f_reflected = evaluate(&reflected);

            if f_reflected < values[0] {
                let mut expanded = along(&centroid, worst, -EXPANSION);
                clamp(&mut expanded);
                let f_expanded = evaluate(&expanded);
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_reflected;
                continue;
            }

            // Contract towards the better of the reflected and worst points
            let (mut contracted, threshold) = if f_reflected < values[n] {
                (along(&centroid, &reflected, CONTRACTION), f_reflected)
            } else {
                (along(&centroid, worst, CONTRACTION), values[n])
            };
            clamp(&mut contracted);
            let f_contracted = evaluate(&contracted);

            if f_contracted < threshold {
                simplex[n] = contracted;
                values[n] = f_contracted;
                continue;
            }

            // Shrink every vertex towards the best one
            let best = simplex[0].clone();
            for i in 1..=n {
                let mut shrunk = along(&best, &simplex[i], SHRINK);
                clamp(&mut shrunk);
                values[i] = evaluate(&shrunk);
                simplex[i] = shrunk;
            }
        }

        order_simplex(&mut simplex, &mut values);
        if !converged {
            converged = self.has_converged(&simplex, &values);
        }

        Ok(Minimum {
            point: simplex.swap_remove(0),
            value: values[0],
            iterations,
            converged,
        })
    }

    fn has_converged(&self, simplex: &[Vec<f64>], values: &[f64]) -> bool {
        let best = values[0];
        if !best.is_finite() {
            return false;
        }

        let f_spread = values
            .iter()
            .map(|v| (v - best).abs())
            .fold(0.0_f64, f64::max);
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|vertex| vertex.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);

        f_spread <= self.f_tolerance * (1.0 + best.abs()) && x_spread <= self.x_tolerance
    }
}

fn order_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dim = vertices[0].len();
    (0..dim)
        .map(|j| vertices.iter().map(|v| v[j]).sum::<f64>() / n)
        .collect()
}

/// Point `base + coef * (target - base)`
fn along(base: &[f64], target: &[f64], coef: f64) -> Vec<f64> {
    base.iter()
        .zip(target)
        .map(|(b, t)| b + coef * (t - b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_bowl() {
        let result = NelderMead::new()
            .minimize(
                |x| (x[0] - 1.5).powi(2) + 2.0 * (x[1] + 0.5).powi(2),
                &[0.0, 0.0],
                None,
            )
            .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.point[0], 1.5, epsilon = 1e-4);
        assert_relative_eq!(result.point[1], -0.5, epsilon = 1e-4);
        assert!(result.value < 1e-8);
    }

    #[test]
    fn test_rosenbrock() {
        let rosenbrock = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let result = NelderMead::new()
            .with_max_iterations(5000)
            .minimize(rosenbrock, &[-1.2, 1.0], None)
            .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(result.point[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_bounds_are_respected() {
        // Unconstrained optimum at 3.0 lies outside the box
        let result = NelderMead::new()
            .minimize(|x| (x[0] - 3.0).powi(2), &[0.0], Some(&[(-1.0, 1.0)]))
            .unwrap();

        assert!(result.point[0] <= 1.0);
        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_non_finite_objective_is_avoided() {
        let result = NelderMead::new()
            .minimize(
                |x| if x[0] < 0.0 { f64::NAN } else { (x[0] - 0.5).powi(2) },
                &[0.2],
                None,
            )
            .unwrap();

        assert!(result.value.is_finite());
        assert_relative_eq!(result.point[0], 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_budget_exhaustion_reports_not_converged() {
        let result = NelderMead::new()
            .with_max_iterations(2)
            .minimize(|x| x[0].powi(2) + x[1].powi(2), &[5.0, -3.0], None)
            .unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn test_invalid_inputs() {
        let nm = NelderMead::new();
        assert!(nm.minimize(|_| 0.0, &[], None).is_err());
        assert!(nm.minimize(|x| x[0], &[0.0], Some(&[(1.0, -1.0)])).is_err());
        assert!(nm.minimize(|x| x[0], &[0.0, 1.0], Some(&[(0.0, 1.0)])).is_err());
    }
}
