//! Non-negative least squares example.
//!
//! Solves:
//!   minimize    ½‖Ax − b‖²
//!   subject to  x ≥ 0
//!
//! The rows of A penalize their coordinate of y = Ax with a shifted
//! square, and each coordinate of x carries the nonnegativity indicator.

use graphform_core::{solve, FunctionKind, FunctionObj, MatrixRef, ProblemData, SolverSettings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() {
    println!("Graphform - Non-Negative Least Squares Example");
    println!("==============================================");
    println!();

    let (m, n) = (100, 20);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    // A = U(0,1)/n, b = A·s with a ±1 sign pattern, plus noise.
    let a: Vec<f64> = (0..m * n)
        .map(|_| rng.gen_range(0.0..1.0) / n as f64)
        .collect();
    let mat = MatrixRef::new(&a, m, n);

    let mut f = Vec::with_capacity(m);
    for i in 0..m {
        let mut b_i = 0.0;
        for j in 0..n {
            b_i += if 3 * j < 2 * n { mat.at(i, j) } else { -mat.at(i, j) };
        }
        b_i += 0.01 * rng.gen_range(-1.0..1.0);
        f.push(FunctionObj::new(FunctionKind::Square).with_b(b_i));
    }

    let prob = ProblemData {
        a: mat,
        f,
        g: vec![FunctionObj::new(FunctionKind::IndGe0); n],
    };

    let settings = SolverSettings::default();
    match solve(&prob, &settings) {
        Ok(result) => {
            println!();
            println!("objective: {:.6e}", result.obj_val);
            println!("first coordinates of x: {:?}", &result.x[..5.min(n)]);
        }
        Err(e) => eprintln!("solve failed: {}", e),
    }
}
