//! Canonical graph-form problem generators.
//!
//! Each builder synthesizes one of the standard test families with a
//! seeded RNG. The matrix is owned by the generated problem so drivers can
//! borrow it for as many solves as they need.

use graphform_core::{FunctionKind, FunctionObj, MatrixRef, ProblemData};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One synthesized problem instance.
pub struct GeneratedProblem {
    pub name: &'static str,
    pub m: usize,
    pub n: usize,
    pub a: Vec<f64>,
    pub f: Vec<FunctionObj<f64>>,
    pub g: Vec<FunctionObj<f64>>,
}

impl GeneratedProblem {
    /// Borrow the stored matrix as solver input.
    pub fn problem(&self) -> ProblemData<'_, f64> {
        ProblemData {
            a: MatrixRef::new(&self.a, self.m, self.n),
            f: self.f.clone(),
            g: self.g.clone(),
        }
    }
}

/// Standard normal via Box-Muller.
fn randn(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Non-negative least squares.
///   minimize    ½‖Ax − b‖²
///   subject to  x ≥ 0
///
/// A = U(0,1)/n and b = A·s + 0.01·N(0,1), where s is +1 on the first
/// ⌊2n/3⌋ coordinates and −1 on the rest.
pub fn nnls(m: usize, n: usize, seed: u64) -> GeneratedProblem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let a: Vec<f64> = (0..m * n)
        .map(|_| rng.gen_range(0.0..1.0) / n as f64)
        .collect();

    let mut f = Vec::with_capacity(m);
    for i in 0..m {
        let mut b_i = 0.0;
        for j in 0..n {
            let aij = a[i * n + j];
            b_i += if 3 * j < 2 * n { aij } else { -aij };
        }
        b_i += 0.01 * randn(&mut rng);
        f.push(FunctionObj::new(FunctionKind::Square).with_b(b_i));
    }

    GeneratedProblem {
        name: "nnls",
        m,
        n,
        a,
        f,
        g: vec![FunctionObj::new(FunctionKind::IndGe0); n],
    }
}

/// Linear program in inequality form.
///   minimize    cᵀx
///   subject to  Ax ≤ b
///
/// A = [−U(0,1)/n ; −I], b = A·U(0,1) + 0.2·U(0,1), c = U(0,1).
pub fn lp_ineq(m: usize, n: usize, seed: u64) -> GeneratedProblem {
    assert!(m > n, "inequality LP needs m > n (the last n rows are −I)");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut a = vec![0.0f64; m * n];
    for i in 0..(m - n) {
        for j in 0..n {
            a[i * n + j] = -rng.gen_range(0.0..1.0) / n as f64;
        }
    }
    for j in 0..n {
        a[(m - n + j) * n + j] = -1.0;
    }

    let u: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let mut f = Vec::with_capacity(m);
    for i in 0..m {
        let mut b_i = 0.0;
        for j in 0..n {
            b_i += a[i * n + j] * u[j];
        }
        b_i += 0.2 * rng.gen_range(0.0..1.0);
        f.push(FunctionObj::new(FunctionKind::IndLe0).with_b(b_i));
    }

    let g = (0..n)
        .map(|_| FunctionObj::new(FunctionKind::Identity).with_c(rng.gen_range(0.0..1.0)))
        .collect();

    GeneratedProblem {
        name: "lp-ineq",
        m,
        n,
        a,
        f,
        g,
    }
}

/// Linear program in equality form.
///   minimize    cᵀx
///   subject to  Ax = b, x ≥ 0
///
/// The cost row c is appended as one extra Identity row of A, so the
/// generated matrix has m + 1 rows. b = A·U(0,1) keeps the program
/// feasible.
pub fn lp_eq(m: usize, n: usize, seed: u64) -> GeneratedProblem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows = m + 1;

    let a: Vec<f64> = (0..rows * n).map(|_| rng.gen_range(0.0..1.0)).collect();

    let v: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let mut f = Vec::with_capacity(rows);
    for i in 0..m {
        let mut b_i = 0.0;
        for j in 0..n {
            b_i += a[i * n + j] * v[j];
        }
        f.push(FunctionObj::new(FunctionKind::IndEq0).with_b(b_i));
    }
    f.push(FunctionObj::new(FunctionKind::Identity));

    GeneratedProblem {
        name: "lp-eq",
        m: rows,
        n,
        a,
        f,
        g: vec![FunctionObj::new(FunctionKind::IndGe0); n],
    }
}

/// Support vector machine.
///   minimize    ½‖w‖² + λ·Σᵢ max(0, aᵢᵀ[w; β] + 1)
///
/// Rows encode two unit-variance Gaussian clusters centered at ±1 with
/// labels folded in: aᵢ = −yᵢ·[pᵢ; 1]. The generated matrix has n + 1
/// columns (features plus bias).
pub fn svm(m: usize, n: usize, seed: u64) -> GeneratedProblem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cols = n + 1;

    let mut a = vec![0.0f64; m * cols];
    for i in 0..m {
        let label = if i < m / 2 { 1.0 } else { -1.0 };
        for j in 0..n {
            a[i * cols + j] = -label * (randn(&mut rng) + label);
        }
        a[i * cols + n] = -label;
    }

    let lambda = 1.0;
    let f = vec![
        FunctionObj::new(FunctionKind::MaxPos0)
            .with_b(-1.0)
            .with_c(lambda);
        m
    ];
    let mut g = vec![FunctionObj::new(FunctionKind::Square); n];
    g.push(FunctionObj::new(FunctionKind::Zero));

    GeneratedProblem {
        name: "svm",
        m,
        n: cols,
        a,
        f,
        g,
    }
}

/// Lasso.
///   minimize    ½‖Ax − b‖² + λ‖x‖₁
///
/// A = N(0,1)/n, ground truth 20% dense, b = A·x_true + 0.5·N(0,1),
/// λ = 2e-2 + 5e-6·m.
pub fn lasso(m: usize, n: usize, seed: u64) -> GeneratedProblem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let a: Vec<f64> = (0..m * n).map(|_| randn(&mut rng) / n as f64).collect();

    let x_true: Vec<f64> = (0..n)
        .map(|_| {
            if rng.gen_range(0.0..1.0) < 0.8 {
                0.0
            } else {
                randn(&mut rng)
            }
        })
        .collect();

    let mut f = Vec::with_capacity(m);
    for i in 0..m {
        let mut b_i = 0.0;
        for j in 0..n {
            b_i += a[i * n + j] * x_true[j];
        }
        b_i += 0.5 * randn(&mut rng);
        f.push(FunctionObj::new(FunctionKind::Square).with_b(b_i));
    }

    let lambda = 2e-2 + 5e-6 * m as f64;
    GeneratedProblem {
        name: "lasso",
        m,
        n,
        a,
        f,
        g: vec![FunctionObj::new(FunctionKind::Abs).with_c(lambda); n],
    }
}
