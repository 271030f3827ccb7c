//! Dense single-set graph.

use super::types::{
    check_finite_matrix, check_finite_scalar, check_finite_vector, dense_adjacency, find_asymmetry,
    IsingGraph,
};
use crate::error::{AnnealError, AnnealResult};
use crate::real::Real;
use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

/// Ising problem over one variable set with a dense symmetric coupling matrix.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use u_anneal::graph::{DenseGraph, IsingGraph};
///
/// let w = array![[-1.0, 2.0], [2.0, -1.0]];
/// let graph = DenseGraph::from_qubo(w).unwrap();
/// assert_eq!(graph.qubo_energy(array![1i8, 0].view()), -1.0);
/// assert_eq!(graph.qubo_energy(array![1i8, 1].view()), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct DenseGraph<T: Real> {
    w: Option<Array2<T>>,
    h: Array1<T>,
    j: Array2<T>,
    c: T,
    adjacency: Vec<Vec<usize>>,
}

impl<T: Real> DenseGraph<T> {
    /// Builds a graph from a symmetric QUBO matrix `W`, `E(x) = xᵀWx`.
    ///
    /// The diagonal holds the linear biases.
    ///
    /// # Errors
    /// - [`AnnealError::DimensionMismatch`] if `W` is not square
    /// - [`AnnealError::NonFiniteCoefficient`] if `W` holds a NaN or infinity
    /// - [`AnnealError::AsymmetricMatrix`] if `W[i][j] != W[j][i]`
    pub fn from_qubo(w: Array2<T>) -> AnnealResult<Self> {
        check_square(&w)?;
        check_finite_matrix("W", &w)?;
        if let Some((row, col)) = find_asymmetry(&w) {
            return Err(AnnealError::AsymmetricMatrix { row, col });
        }

        let n = w.nrows();
        let half = T::from_f64(0.5);
        let quarter = T::from_f64(0.25);

        let h: Array1<T> = w.rows().into_iter().map(|row| row.sum() * half).collect();
        let mut j = w.mapv(|v| v * quarter);
        for i in 0..n {
            j[[i, i]] = T::zero();
        }
        let c = (w.sum() + w.diag().sum()) * quarter;

        debug!(n_spins = n, "dense QUBO converted to Ising form");
        Ok(Self::assemble(Some(w), h, j, c))
    }

    /// Builds a graph from Ising coefficients, `E(q) = c + hᵀq + qᵀJq`.
    ///
    /// # Errors
    /// - [`AnnealError::DimensionMismatch`] if `J` is not square or `h` has
    ///   the wrong length
    /// - [`AnnealError::NonFiniteCoefficient`] if `h`, `J` or `c` holds a NaN
    ///   or infinity
    /// - [`AnnealError::AsymmetricMatrix`] if `J` is not symmetric
    pub fn from_ising(h: Array1<T>, j: Array2<T>, c: T) -> AnnealResult<Self> {
        check_square(&j)?;
        if h.len() != j.nrows() {
            return Err(AnnealError::dim("h", j.nrows(), h.len()));
        }
        check_finite_vector("h", &h)?;
        check_finite_matrix("J", &j)?;
        check_finite_scalar("c", c)?;
        if let Some((row, col)) = find_asymmetry(&j) {
            return Err(AnnealError::AsymmetricMatrix { row, col });
        }
        Ok(Self::assemble(None, h, j, c))
    }

    fn assemble(w: Option<Array2<T>>, h: Array1<T>, j: Array2<T>, c: T) -> Self {
        let adjacency = dense_adjacency(j.view());
        Self {
            w,
            h,
            j,
            c,
            adjacency,
        }
    }

    /// The QUBO matrix this graph was built from, if any.
    pub fn qubo(&self) -> Option<&Array2<T>> {
        self.w.as_ref()
    }

    /// Linear Ising coefficients.
    pub fn h(&self) -> &Array1<T> {
        &self.h
    }

    /// Ising coupling matrix.
    pub fn j(&self) -> &Array2<T> {
        &self.j
    }

    /// Constant energy offset.
    pub fn c(&self) -> T {
        self.c
    }
}

fn check_square<T>(m: &Array2<T>) -> AnnealResult<()> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(AnnealError::dim("coupling matrix columns", rows, cols));
    }
    Ok(())
}

impl<T: Real> IsingGraph<T> for DenseGraph<T> {
    fn n_spins(&self) -> usize {
        self.h.len()
    }

    fn energy(&self, q: ArrayView1<'_, i8>) -> T {
        let mut e = self.c;
        for (i, row) in self.j.rows().into_iter().enumerate() {
            let qi = T::from_i8(q[i]);
            let coupled: T = row
                .iter()
                .zip(q.iter())
                .map(|(&jij, &qj)| jij * T::from_i8(qj))
                .sum();
            e = e + qi * (self.h[i] + coupled);
        }
        e
    }

    fn local_field(&self, q: ArrayView1<'_, i8>, i: usize) -> T {
        let two = T::one() + T::one();
        let coupled: T = self.adjacency[i]
            .iter()
            .map(|&k| self.j[[i, k]] * T::from_i8(q[k]))
            .sum();
        self.h[i] + two * coupled
    }

    fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    fn qubo_energy(&self, x: ArrayView1<'_, i8>) -> T {
        match &self.w {
            Some(w) => w
                .rows()
                .into_iter()
                .zip(x.iter())
                .filter(|&(_, &xi)| xi != 0)
                .map(|(row, _)| {
                    row.iter()
                        .zip(x.iter())
                        .filter(|&(_, &xj)| xj != 0)
                        .map(|(&v, _)| v)
                        .sum::<T>()
                })
                .sum(),
            None => {
                let q = crate::bits::q_from_x(&x);
                self.energy(q.view())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{create_bits_sequence, q_from_x};
    use ndarray::array;

    fn sample_qubo() -> Array2<f64> {
        array![
            [-1.0, 0.5, 0.0, 2.0],
            [0.5, 3.0, -1.5, 0.0],
            [0.0, -1.5, -2.0, 1.0],
            [2.0, 0.0, 1.0, 0.25],
        ]
    }

    #[test]
    fn test_qubo_ising_energies_agree() {
        let graph = DenseGraph::from_qubo(sample_qubo()).unwrap();
        let xs = create_bits_sequence(4, 0, 16).unwrap();
        for x in xs.rows() {
            let q = q_from_x(&x);
            let qubo = graph.qubo_energy(x);
            let ising = graph.energy(q.view());
            assert!(
                (qubo - ising).abs() < 1e-12,
                "x={x}: qubo {qubo} vs ising {ising}"
            );
        }
    }

    #[test]
    fn test_ising_two_spin_ferromagnet() {
        let j = array![[0.0, -1.0], [-1.0, 0.0]];
        let graph = DenseGraph::from_ising(Array1::zeros(2), j, 0.0).unwrap();
        assert_eq!(graph.energy(array![1i8, 1].view()), -2.0);
        assert_eq!(graph.energy(array![-1i8, -1].view()), -2.0);
        assert_eq!(graph.energy(array![1i8, -1].view()), 2.0);
    }

    #[test]
    fn test_delta_energy_matches_difference() {
        let graph = DenseGraph::from_qubo(sample_qubo()).unwrap();
        let q = array![1i8, -1, -1, 1];
        for i in 0..4 {
            let mut flipped = q.clone();
            flipped[i] = -flipped[i];
            let expected = graph.energy(flipped.view()) - graph.energy(q.view());
            let delta = graph.delta_energy(q.view(), i);
            assert!((expected - delta).abs() < 1e-12, "spin {i}");
        }
    }

    #[test]
    fn test_rejects_asymmetric() {
        let mut w = sample_qubo();
        w[[0, 3]] = 1.0;
        let err = DenseGraph::from_qubo(w).unwrap_err();
        assert_eq!(err, AnnealError::AsymmetricMatrix { row: 0, col: 3 });
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_rejects_non_square() {
        let w = Array2::<f64>::zeros((2, 3));
        assert!(DenseGraph::from_qubo(w).unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_ising_bias_length_mismatch() {
        let err = DenseGraph::from_ising(Array1::zeros(3), Array2::<f64>::zeros((2, 2)), 0.0)
            .unwrap_err();
        assert_eq!(err, AnnealError::dim("h", 2, 3));
    }

    #[test]
    fn test_rejects_non_finite_qubo() {
        let w = array![[f64::NAN, -1.0], [-1.0, 0.0]];
        assert_eq!(
            DenseGraph::from_qubo(w).unwrap_err(),
            AnnealError::NonFiniteCoefficient { what: "W", row: 0, col: 0 }
        );

        let w = array![[0.0, f64::INFINITY], [f64::INFINITY, 0.0]];
        assert!(matches!(
            DenseGraph::from_qubo(w),
            Err(AnnealError::NonFiniteCoefficient { what: "W", row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_rejects_non_finite_ising() {
        let j = array![[0.0, -1.0], [-1.0, 0.0]];
        let err = DenseGraph::from_ising(array![0.0, f64::NAN], j.clone(), 0.0).unwrap_err();
        assert_eq!(err, AnnealError::NonFiniteCoefficient { what: "h", row: 1, col: 0 });
        assert!(!err.is_contract_violation());

        let err = DenseGraph::from_ising(Array1::zeros(2), j, f64::NEG_INFINITY).unwrap_err();
        assert_eq!(err, AnnealError::NonFiniteCoefficient { what: "c", row: 0, col: 0 });

        let bad_j = array![[f64::NAN, 0.0], [0.0, 0.0]];
        assert!(DenseGraph::from_ising(Array1::zeros(2), bad_j, 0.0).is_err());
    }

    #[test]
    fn test_neighbors_skip_zero_couplings() {
        let graph = DenseGraph::from_qubo(sample_qubo()).unwrap();
        assert_eq!(graph.neighbors(0), &[1, 3]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.n_edges(), 4);
    }

    #[test]
    fn test_f32_graph() {
        let w: Array2<f32> = array![[1.0, -0.5], [-0.5, 1.0]];
        let graph = DenseGraph::from_qubo(w).unwrap();
        assert_eq!(graph.qubo_energy(array![1i8, 1].view()), 1.0);
    }
}
