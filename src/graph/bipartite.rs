//! Bipartite two-set graph.

use super::types::{check_finite_matrix, check_finite_scalar, check_finite_vector, IsingGraph};
use crate::error::{AnnealError, AnnealResult};
use crate::real::Real;
use ndarray::{s, Array1, Array2, ArrayView1};
use tracing::debug;

#[derive(Debug, Clone)]
struct BipartiteQubo<T: Real> {
    b0: Array1<T>,
    b1: Array1<T>,
    w: Array2<T>,
}

/// Ising problem over two variable sets joined by a dense matrix.
///
/// In QUBO form `E(x, y) = xᵀb0 + yᵀb1 + xᵀWy` with `W` of shape `N0 × N1`;
/// there is no coupling inside a set. Spin indices run over the
/// concatenation `[q0 | q1]`, so spin `N0 + k` is the `k`-th spin of the
/// second set.
#[derive(Debug, Clone)]
pub struct BipartiteGraph<T: Real> {
    qubo: Option<BipartiteQubo<T>>,
    h0: Array1<T>,
    h1: Array1<T>,
    j: Array2<T>,
    c: T,
    adjacency: Vec<Vec<usize>>,
}

impl<T: Real> BipartiteGraph<T> {
    /// Builds a graph from QUBO biases `b0`, `b1` and interconnection `W`.
    ///
    /// # Errors
    /// - [`AnnealError::DimensionMismatch`] if `W` is not `b0.len() × b1.len()`
    /// - [`AnnealError::NonFiniteCoefficient`] on a NaN or infinite entry
    pub fn from_qubo(b0: Array1<T>, b1: Array1<T>, w: Array2<T>) -> AnnealResult<Self> {
        check_shape(&b0, &b1, &w)?;
        check_finite_vector("b0", &b0)?;
        check_finite_vector("b1", &b1)?;
        check_finite_matrix("W", &w)?;
        let half = T::from_f64(0.5);
        let quarter = T::from_f64(0.25);

        let row_sums: Array1<T> = w.rows().into_iter().map(|r| r.sum()).collect();
        let col_sums: Array1<T> = w.columns().into_iter().map(|c| c.sum()).collect();
        let blend = |b: &Array1<T>, sums: &Array1<T>| -> Array1<T> {
            b.iter()
                .zip(sums.iter())
                .map(|(&bi, &si)| bi * half + si * quarter)
                .collect()
        };
        let h0 = blend(&b0, &row_sums);
        let h1 = blend(&b1, &col_sums);
        let j = w.mapv(|v| v * quarter);
        let c = (b0.sum() + b1.sum()) * half + w.sum() * quarter;

        debug!(
            n0 = b0.len(),
            n1 = b1.len(),
            "bipartite QUBO converted to Ising form"
        );
        let qubo = BipartiteQubo { b0, b1, w };
        Ok(Self::assemble(Some(qubo), h0, h1, j, c))
    }

    /// Builds a graph from Ising coefficients,
    /// `E(q0, q1) = c + h0ᵀq0 + h1ᵀq1 + q0ᵀJq1`.
    ///
    /// # Errors
    /// - [`AnnealError::DimensionMismatch`] if `J` is not `h0.len() × h1.len()`
    /// - [`AnnealError::NonFiniteCoefficient`] on a NaN or infinite entry
    pub fn from_ising(h0: Array1<T>, h1: Array1<T>, j: Array2<T>, c: T) -> AnnealResult<Self> {
        check_shape(&h0, &h1, &j)?;
        check_finite_vector("h0", &h0)?;
        check_finite_vector("h1", &h1)?;
        check_finite_matrix("J", &j)?;
        check_finite_scalar("c", c)?;
        Ok(Self::assemble(None, h0, h1, j, c))
    }

    fn assemble(
        qubo: Option<BipartiteQubo<T>>,
        h0: Array1<T>,
        h1: Array1<T>,
        j: Array2<T>,
        c: T,
    ) -> Self {
        let (n0, n1) = j.dim();
        let mut adjacency = vec![Vec::new(); n0 + n1];
        for ((i, k), &v) in j.indexed_iter() {
            if v != T::zero() {
                adjacency[i].push(n0 + k);
                adjacency[n0 + k].push(i);
            }
        }
        Self {
            qubo,
            h0,
            h1,
            j,
            c,
            adjacency,
        }
    }

    /// Size of the first variable set.
    pub fn n0(&self) -> usize {
        self.h0.len()
    }

    /// Size of the second variable set.
    pub fn n1(&self) -> usize {
        self.h1.len()
    }

    /// Linear Ising coefficients of both sets.
    pub fn h(&self) -> (&Array1<T>, &Array1<T>) {
        (&self.h0, &self.h1)
    }

    /// Interconnection coupling matrix (`N0 × N1`).
    pub fn j(&self) -> &Array2<T> {
        &self.j
    }

    /// Constant energy offset.
    pub fn c(&self) -> T {
        self.c
    }
}

fn check_shape<T>(a: &Array1<T>, b: &Array1<T>, m: &Array2<T>) -> AnnealResult<()> {
    let (rows, cols) = m.dim();
    if rows != a.len() {
        return Err(AnnealError::dim("interconnection rows", a.len(), rows));
    }
    if cols != b.len() {
        return Err(AnnealError::dim("interconnection columns", b.len(), cols));
    }
    Ok(())
}

impl<T: Real> IsingGraph<T> for BipartiteGraph<T> {
    fn n_spins(&self) -> usize {
        self.n0() + self.n1()
    }

    fn energy(&self, q: ArrayView1<'_, i8>) -> T {
        let n0 = self.n0();
        let (q0, q1) = (q.slice(s![..n0]), q.slice(s![n0..]));
        let linear0: T = self.h0.iter().zip(q0.iter()).map(|(&h, &spin)| h * T::from_i8(spin)).sum();
        let linear1: T = self.h1.iter().zip(q1.iter()).map(|(&h, &spin)| h * T::from_i8(spin)).sum();
        let coupled: T = self
            .j
            .rows()
            .into_iter()
            .zip(q0.iter())
            .map(|(row, &s0)| {
                let inner: T = row.iter().zip(q1.iter()).map(|(&v, &s1)| v * T::from_i8(s1)).sum();
                T::from_i8(s0) * inner
            })
            .sum();
        self.c + linear0 + linear1 + coupled
    }

    fn local_field(&self, q: ArrayView1<'_, i8>, i: usize) -> T {
        let n0 = self.n0();
        if i < n0 {
            let coupled: T = self.adjacency[i]
                .iter()
                .map(|&k| self.j[[i, k - n0]] * T::from_i8(q[k]))
                .sum();
            self.h0[i] + coupled
        } else {
            let col = i - n0;
            let coupled: T = self.adjacency[i]
                .iter()
                .map(|&k| self.j[[k, col]] * T::from_i8(q[k]))
                .sum();
            self.h1[col] + coupled
        }
    }

    fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    fn natural_coloring(&self) -> Option<Vec<Vec<usize>>> {
        let n0 = self.n0();
        let classes = [(0..n0).collect::<Vec<_>>(), (n0..self.n_spins()).collect()];
        Some(classes.into_iter().filter(|c| !c.is_empty()).collect())
    }

    fn qubo_energy(&self, x: ArrayView1<'_, i8>) -> T {
        let Some(qubo) = &self.qubo else {
            let q = crate::bits::q_from_x(&x);
            return self.energy(q.view());
        };
        let n0 = self.n0();
        let (x0, x1) = (x.slice(s![..n0]), x.slice(s![n0..]));
        let coupled: T = qubo
            .w
            .rows()
            .into_iter()
            .zip(x0.iter())
            .filter(|&(_, &xi)| xi != 0)
            .map(|(row, _)| masked_sum(row, x1))
            .sum();
        masked_sum(qubo.b0.view(), x0) + masked_sum(qubo.b1.view(), x1) + coupled
    }
}

/// Sum of the entries of `values` where `bits` is set.
fn masked_sum<T: Real>(values: ArrayView1<'_, T>, bits: ArrayView1<'_, i8>) -> T {
    values
        .iter()
        .zip(bits.iter())
        .filter(|&(_, &b)| b != 0)
        .map(|(&v, _)| v)
        .sum()
}
