//! Core trait and shared helpers for Ising problem graphs.

use crate::bits::q_from_x;
use crate::error::{AnnealError, AnnealResult};
use crate::real::Real;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix2};

/// Sign convention applied to the energy function.
///
/// The Monte Carlo step always minimizes; maximization is obtained by
/// negating the energy internally. Stored matrix values are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptimizeMethod {
    /// Search for the lowest energy.
    #[default]
    Minimize,
    /// Search for the highest energy.
    Maximize,
}

impl OptimizeMethod {
    /// `+1` for minimization, `-1` for maximization.
    pub fn sign<T: Real>(self) -> T {
        match self {
            OptimizeMethod::Minimize => T::one(),
            OptimizeMethod::Maximize => -T::one(),
        }
    }

    /// Energy as seen by the minimizer.
    pub fn signed_energy<T: Real, G: IsingGraph<T> + ?Sized>(
        self,
        graph: &G,
        q: ArrayView1<'_, i8>,
    ) -> T {
        self.sign::<T>() * graph.energy(q)
    }

    /// Whether raw energy `candidate` is strictly better than `incumbent`.
    pub fn is_better<T: Real>(self, candidate: T, incumbent: T) -> bool {
        match self {
            OptimizeMethod::Minimize => candidate < incumbent,
            OptimizeMethod::Maximize => candidate > incumbent,
        }
    }

    /// The worst possible raw energy, used to seed best-so-far tracking.
    pub fn worst<T: Real>(self) -> T {
        match self {
            OptimizeMethod::Minimize => T::infinity(),
            OptimizeMethod::Maximize => T::neg_infinity(),
        }
    }
}

/// An Ising Hamiltonian over `n_spins()` spins.
///
/// Implementors provide the energy and the effective local field. For any
/// spin `i`, flipping it changes the energy by `-2 · q_i · local_field(q, i)`.
pub trait IsingGraph<T: Real>: Send + Sync {
    /// Number of spin variables.
    fn n_spins(&self) -> usize;

    /// Ising energy of spin vector `q`.
    fn energy(&self, q: ArrayView1<'_, i8>) -> T;

    /// Effective field acting on spin `i` given the other spins in `q`.
    fn local_field(&self, q: ArrayView1<'_, i8>, i: usize) -> T;

    /// Spins directly coupled to `i` (non-zero coupling, `i` excluded).
    fn neighbors(&self, i: usize) -> &[usize];

    /// A partition into independent sets known from the graph structure.
    ///
    /// Returning `None` lets the scheduler compute a greedy coloring.
    fn natural_coloring(&self) -> Option<Vec<Vec<usize>>> {
        None
    }

    /// Energy of binary vector `x` in the original QUBO form.
    fn qubo_energy(&self, x: ArrayView1<'_, i8>) -> T {
        let q = q_from_x(&x);
        self.energy(q.view())
    }

    /// Energy change from flipping spin `i`.
    fn delta_energy(&self, q: ArrayView1<'_, i8>, i: usize) -> T {
        let two = T::one() + T::one();
        -two * T::from_i8(q[i]) * self.local_field(q, i)
    }

    /// Energy of every row of `q`.
    fn energies(&self, q: ArrayView2<'_, i8>) -> Array1<T> {
        q.rows().into_iter().map(|row| self.energy(row)).collect()
    }

    /// Total number of non-zero couplings (each pair counted once).
    fn n_edges(&self) -> usize {
        (0..self.n_spins()).map(|i| self.neighbors(i).len()).sum::<usize>() / 2
    }
}

/// Returns the first `(row, col)` where `w` is not symmetric.
///
/// Entries are compared with a tolerance of `T::SYMMETRY_EPS` relative to the
/// largest absolute entry (or absolute when all entries are below one).
/// A non-square matrix reports `(0, 0)`.
pub fn find_asymmetry<T, S>(w: &ArrayBase<S, Ix2>) -> Option<(usize, usize)>
where
    T: Real,
    S: Data<Elem = T>,
{
    let (rows, cols) = w.dim();
    if rows != cols {
        return Some((0, 0));
    }
    let scale = w.iter().fold(T::one(), |m, v| m.max(v.abs()));
    let tol = T::SYMMETRY_EPS * scale;
    for i in 0..rows {
        for j in (i + 1)..cols {
            let (a, b) = (w[[i, j]], w[[j, i]]);
            // NaN never compares within tolerance
            if !((a - b).abs() <= tol) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Whether `w` is square and symmetric within tolerance.
pub fn is_symmetric<T, S>(w: &ArrayBase<S, Ix2>) -> bool
where
    T: Real,
    S: Data<Elem = T>,
{
    find_asymmetry(w).is_none()
}

/// Rejects a matrix holding a NaN or infinite entry.
pub(crate) fn check_finite_matrix<T: Real>(
    what: &'static str,
    m: &Array2<T>,
) -> AnnealResult<()> {
    match m.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), _)) => Err(AnnealError::NonFiniteCoefficient { what, row, col }),
        None => Ok(()),
    }
}

/// Rejects a vector holding a NaN or infinite entry.
pub(crate) fn check_finite_vector<T: Real>(
    what: &'static str,
    v: &Array1<T>,
) -> AnnealResult<()> {
    match v.iter().position(|x| !x.is_finite()) {
        Some(row) => Err(AnnealError::NonFiniteCoefficient { what, row, col: 0 }),
        None => Ok(()),
    }
}

/// Rejects a NaN or infinite constant offset.
pub(crate) fn check_finite_scalar<T: Real>(what: &'static str, c: T) -> AnnealResult<()> {
    if c.is_finite() {
        Ok(())
    } else {
        Err(AnnealError::NonFiniteCoefficient { what, row: 0, col: 0 })
    }
}

/// Adjacency lists from the non-zero off-diagonal entries of `j`.
pub(crate) fn dense_adjacency<T: Real>(j: ArrayView2<'_, T>) -> Vec<Vec<usize>> {
    j.rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|&(k, v)| k != i && *v != T::zero())
                .map(|(k, _)| k)
                .collect()
        })
        .collect()
}
