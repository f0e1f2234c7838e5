//! Pure-Rust reference backend.
//!
//! Straightforward dense kernels with no external library. Row-major
//! layout keeps the inner loops contiguous: `gemv` without transpose walks
//! rows, the transposed product accumulates row-scaled updates, and the
//! Gram accumulation is one rank-1 update per row of `A`.

use crate::linalg::backend::{FactorizationError, GramShape, LinearBackend};
use crate::linalg::dense::{DenseMatrix, MatrixRef};
use crate::scalar::Scalar;

/// Dense CPU backend implemented directly on slices.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBackend;

/// Lower-triangular Cholesky factor `L` with `L·Lᵀ = G`.
///
/// Stored as the full square matrix; only the lower triangle (diagonal
/// included) is meaningful.
#[derive(Debug, Clone)]
pub struct CholeskyFactor<T> {
    l: DenseMatrix<T>,
}

impl<T: Scalar> CholeskyFactor<T> {
    /// Order of the factored matrix.
    pub fn order(&self) -> usize {
        self.l.rows()
    }

    /// The factor matrix (lower triangle meaningful).
    pub fn matrix(&self) -> &DenseMatrix<T> {
        &self.l
    }
}

#[inline]
fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&ai, &bi)| ai * bi).sum()
}

impl<T: Scalar> LinearBackend<T> for ReferenceBackend {
    type Factor = CholeskyFactor<T>;

    fn gemv(&self, trans: bool, alpha: T, a: &MatrixRef<'_, T>, x: &[T], beta: T, y: &mut [T]) {
        let m = a.rows();
        let n = a.cols();

        if beta == T::zero() {
            for yi in y.iter_mut() {
                *yi = T::zero();
            }
        } else if beta != T::one() {
            for yi in y.iter_mut() {
                *yi *= beta;
            }
        }

        if !trans {
            debug_assert_eq!(x.len(), n);
            debug_assert_eq!(y.len(), m);
            for i in 0..m {
                y[i] += alpha * dot(a.row(i), x);
            }
        } else {
            debug_assert_eq!(x.len(), m);
            debug_assert_eq!(y.len(), n);
            for i in 0..m {
                let s = alpha * x[i];
                if s == T::zero() {
                    continue;
                }
                let row = a.row(i);
                for j in 0..n {
                    y[j] += s * row[j];
                }
            }
        }
    }

    fn axpy(&self, alpha: T, x: &[T], y: &mut [T]) {
        debug_assert_eq!(x.len(), y.len());
        for (yi, &xi) in y.iter_mut().zip(x.iter()) {
            *yi += alpha * xi;
        }
    }

    fn nrm2(&self, x: &[T]) -> T {
        x.iter().map(|&v| v * v).sum::<T>().sqrt()
    }

    fn syrk(&self, a: &MatrixRef<'_, T>, shape: GramShape) -> DenseMatrix<T> {
        let m = a.rows();
        let n = a.cols();

        match shape {
            GramShape::AtA => {
                let mut g = DenseMatrix::identity(n);
                // One rank-1 update per row of A; rows are contiguous.
                for k in 0..m {
                    let row = a.row(k);
                    for i in 0..n {
                        let aki = row[i];
                        if aki == T::zero() {
                            continue;
                        }
                        let gi = g.row_mut(i);
                        for j in 0..n {
                            gi[j] += aki * row[j];
                        }
                    }
                }
                g
            }
            GramShape::AAt => {
                let mut g = DenseMatrix::identity(m);
                // Row-row inner products; fill the upper triangle and mirror.
                for i in 0..m {
                    let ri = a.row(i);
                    *g.at_mut(i, i) += dot(ri, ri);
                    for j in (i + 1)..m {
                        let v = dot(ri, a.row(j));
                        *g.at_mut(i, j) += v;
                        *g.at_mut(j, i) += v;
                    }
                }
                g
            }
        }
    }

    fn potrf(&self, mut g: DenseMatrix<T>) -> Result<Self::Factor, FactorizationError> {
        debug_assert_eq!(g.rows(), g.cols());
        let n = g.rows();

        for j in 0..n {
            let mut diag = g.at(j, j);
            for k in 0..j {
                let ljk = g.at(j, k);
                diag -= ljk * ljk;
            }
            if !(diag > T::zero()) || !diag.is_finite() {
                return Err(FactorizationError::NotPositiveDefinite { column: j });
            }
            let ljj = diag.sqrt();
            *g.at_mut(j, j) = ljj;

            for i in (j + 1)..n {
                let mut s = g.at(i, j);
                for k in 0..j {
                    s -= g.at(i, k) * g.at(j, k);
                }
                *g.at_mut(i, j) = s / ljj;
            }
        }

        Ok(CholeskyFactor { l: g })
    }

    fn potrs(&self, factor: &Self::Factor, rhs: &mut [T]) {
        let l = &factor.l;
        let n = l.rows();
        debug_assert_eq!(rhs.len(), n);

        // Forward solve L z = rhs.
        for i in 0..n {
            let mut s = rhs[i];
            let row = l.row(i);
            for k in 0..i {
                s -= row[k] * rhs[k];
            }
            rhs[i] = s / row[i];
        }

        // Backward solve Lᵀ x = z.
        for i in (0..n).rev() {
            let mut s = rhs[i];
            for k in (i + 1)..n {
                s -= l.at(k, i) * rhs[k];
            }
            rhs[i] = s / l.at(i, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_matrix(rng: &mut ChaCha8Rng, m: usize, n: usize) -> Vec<f64> {
        (0..m * n).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }

    #[test]
    fn test_gemv_no_trans() {
        let backend = ReferenceBackend;
        // [1 2; 3 4] * [1; 1] = [3; 7]
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let a = MatrixRef::new(&data, 2, 2);
        let x = vec![1.0, 1.0];
        let mut y = vec![f64::NAN; 2];

        backend.gemv(false, 1.0, &a, &x, 0.0, &mut y);
        assert_eq!(y, vec![3.0, 7.0]);

        // y <- 2*A*x + y = [9; 21]
        backend.gemv(false, 2.0, &a, &x, 1.0, &mut y);
        assert_eq!(y, vec![9.0, 21.0]);
    }

    #[test]
    fn test_gemv_trans() {
        let backend = ReferenceBackend;
        // [1 2; 3 4]^T * [1; 1] = [4; 6]
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let a = MatrixRef::new(&data, 2, 2);
        let x = vec![1.0, 1.0];
        let mut y = vec![0.0; 2];

        backend.gemv(true, 1.0, &a, &x, 0.0, &mut y);
        assert_eq!(y, vec![4.0, 6.0]);
    }

    #[test]
    fn test_axpy_nrm2() {
        let backend = ReferenceBackend;
        let x = vec![1.0, 2.0, 3.0];
        let mut y = vec![1.0, 1.0, 1.0];
        backend.axpy(-1.0, &x, &mut y);
        assert_eq!(y, vec![0.0, -1.0, -2.0]);
        assert!((backend.nrm2(&[3.0f64, 4.0]) - 5.0).abs() < 1e-15);
    }

    #[test]
    fn test_syrk_small() {
        let backend = ReferenceBackend;
        // A = [1 2; 0 1], AtA = [1 2; 2 5], G = I + AtA
        let data = vec![1.0, 2.0, 0.0, 1.0];
        let a = MatrixRef::new(&data, 2, 2);
        let g = backend.syrk(&a, GramShape::AtA);
        assert_eq!(g.at(0, 0), 2.0);
        assert_eq!(g.at(0, 1), 2.0);
        assert_eq!(g.at(1, 0), 2.0);
        assert_eq!(g.at(1, 1), 6.0);
    }

    #[test]
    fn test_syrk_shapes_agree_on_transpose() {
        // I + A Aᵀ of A equals I + Bᵀ B of B = Aᵀ.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (m, n) = (4, 6);
        let data = random_matrix(&mut rng, m, n);
        let a = MatrixRef::new(&data, m, n);

        let mut at = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                at[j * m + i] = a.at(i, j);
            }
        }
        let b = MatrixRef::new(&at, n, m);

        let g1 = ReferenceBackend.syrk(&a, GramShape::AAt);
        let g2 = ReferenceBackend.syrk(&b, GramShape::AtA);
        for i in 0..m {
            for j in 0..m {
                assert!((g1.at(i, j) - g2.at(i, j)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_factorization_identity() {
        // L Lᵀ must reproduce I + AᵀA to near machine precision.
        let backend = ReferenceBackend;
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (m, n) = (12, 7);
        let data = random_matrix(&mut rng, m, n);
        let a = MatrixRef::new(&data, m, n);

        let g = backend.syrk(&a, GramShape::AtA);
        let factor = backend.potrf(g.clone()).expect("SPD by construction");
        let l = factor.matrix();

        let mut err = 0.0f64;
        let mut scale = 0.0f64;
        for i in 0..n {
            for j in 0..n {
                let mut rec = 0.0;
                for k in 0..=i.min(j) {
                    rec += l.at(i, k) * l.at(j, k);
                }
                err += (rec - g.at(i, j)).powi(2);
                scale += g.at(i, j).powi(2);
            }
        }
        assert!(err.sqrt() <= 1e-10 * scale.sqrt());
    }

    #[test]
    fn test_potrs_solves() {
        let backend = ReferenceBackend;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (m, n) = (9, 5);
        let data = random_matrix(&mut rng, m, n);
        let a = MatrixRef::new(&data, m, n);

        let g = backend.syrk(&a, GramShape::AtA);
        let factor = backend.potrf(g.clone()).unwrap();

        let rhs: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let mut z = rhs.clone();
        backend.potrs(&factor, &mut z);

        // Check G z = rhs.
        for i in 0..n {
            let gz: f64 = (0..n).map(|j| g.at(i, j) * z[j]).sum();
            assert!((gz - rhs[i]).abs() < 1e-10, "row {}: {} vs {}", i, gz, rhs[i]);
        }
    }

    #[test]
    fn test_potrf_rejects_indefinite() {
        let backend = ReferenceBackend;
        let mut g = DenseMatrix::<f64>::zeros(2, 2);
        *g.at_mut(0, 0) = 1.0;
        *g.at_mut(1, 1) = -1.0;
        assert!(matches!(
            backend.potrf(g),
            Err(FactorizationError::NotPositiveDefinite { column: 1 })
        ));
    }
}
