//! Bit / spin codec.
//!
//! Binary variables are stored as `0`/`1` and spins as `-1`/`+1`, both as
//! `i8` arrays so the two domains share a layout. The mapping is
//! `x = (q + 1) / 2` and `q = 2x - 1`, exact in integer arithmetic.
//!
//! A [`PackedBits`] value holds a length-`N` bit vector in its low `N`
//! bits, element `i` at bit position `i`.

use crate::error::{AnnealError, AnnealResult};
use ndarray::{Array, Array1, Array2, ArrayBase, ArrayViewMut1, Data, Dimension};

/// Bit vector packed into an unsigned integer.
pub type PackedBits = u64;

/// Unpacked 0/1 vector.
pub type Bits = Array1<i8>;

/// Unpacked 0/1 matrix, one row per vector.
pub type BitMatrix = Array2<i8>;

/// Spin vector with entries in {-1, +1}.
pub type Spins = Array1<i8>;

/// Spin matrix, one row per Trotter replica.
pub type SpinMatrix = Array2<i8>;

/// Largest number of bits a [`PackedBits`] can hold.
pub const MAX_PACKED_BITS: usize = PackedBits::BITS as usize;

fn check_width(n_bits: usize) -> AnnealResult<()> {
    if n_bits > MAX_PACKED_BITS {
        return Err(AnnealError::InvalidLength {
            n_bits,
            max: MAX_PACKED_BITS,
        });
    }
    Ok(())
}

/// Writes the low `dst.len()` bits of `packed` into `dst`.
pub fn unpack_bits_into(mut dst: ArrayViewMut1<'_, i8>, packed: PackedBits) -> AnnealResult<()> {
    check_width(dst.len())?;
    for (pos, v) in dst.iter_mut().enumerate() {
        *v = ((packed >> pos) & 1) as i8;
    }
    Ok(())
}

/// Unpacks the low `n` bits of `packed` into a new bit vector.
///
/// # Errors
/// [`AnnealError::InvalidLength`] if `n` exceeds [`MAX_PACKED_BITS`].
pub fn unpack_bits(packed: PackedBits, n: usize) -> AnnealResult<Bits> {
    let mut bits = Bits::zeros(n);
    unpack_bits_into(bits.view_mut(), packed)?;
    Ok(bits)
}

/// Packs a bit vector; any non-zero element counts as `1`.
pub fn pack_bits<S>(bits: &ArrayBase<S, ndarray::Ix1>) -> AnnealResult<PackedBits>
where
    S: Data<Elem = i8>,
{
    check_width(bits.len())?;
    Ok(bits
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b != 0)
        .fold(0, |acc, (pos, _)| acc | (1 << pos)))
}

/// Maps spins to bits elementwise, preserving shape.
///
/// Inputs must be exactly -1 or +1; see [`validate_spins`].
pub fn x_from_q<S, D>(q: &ArrayBase<S, D>) -> Array<i8, D>
where
    S: Data<Elem = i8>,
    D: Dimension,
{
    q.mapv(|v| (v + 1) / 2)
}

/// Maps bits to spins elementwise, preserving shape.
pub fn q_from_x<S, D>(x: &ArrayBase<S, D>) -> Array<i8, D>
where
    S: Data<Elem = i8>,
    D: Dimension,
{
    x.mapv(|v| 2 * v - 1)
}

/// Checks that every element is -1 or +1.
pub fn validate_spins<S, D>(q: &ArrayBase<S, D>) -> AnnealResult<()>
where
    S: Data<Elem = i8>,
    D: Dimension,
{
    match q.iter().find(|&&v| v != 1 && v != -1) {
        Some(&value) => Err(AnnealError::InvalidSpin { value }),
        None => Ok(()),
    }
}

/// Unpacks every integer in `[begin, end)` into consecutive rows.
///
/// Row `r` holds the bits of `begin + r`. Used for exhaustive enumeration
/// of small problems.
///
/// # Errors
/// - [`AnnealError::InvalidLength`] if `n_bits` exceeds [`MAX_PACKED_BITS`]
/// - [`AnnealError::InvalidRange`] if `begin > end`, `end` needs more
///   than `n_bits` bits, or the sequence does not fit in memory
pub fn create_bits_sequence(
    n_bits: usize,
    begin: PackedBits,
    end: PackedBits,
) -> AnnealResult<BitMatrix> {
    check_width(n_bits)?;
    let limit_ok = n_bits == MAX_PACKED_BITS || end <= (1u64 << n_bits);
    if begin > end || !limit_ok {
        return Err(AnnealError::InvalidRange { begin, end });
    }

    let rows = usize::try_from(end - begin)
        .ok()
        .filter(|&rows| {
            rows.checked_mul(n_bits.max(1))
                .is_some_and(|len| len <= isize::MAX as usize)
        })
        .ok_or(AnnealError::InvalidRange { begin, end })?;
    let mut seq = BitMatrix::zeros((rows, n_bits));
    for (packed, row) in (begin..end).zip(seq.rows_mut()) {
        unpack_bits_into(row, packed)?;
    }
    Ok(seq)
}
