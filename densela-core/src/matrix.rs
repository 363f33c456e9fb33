//! Element addressing for dense, packed and banded matrix storage.
//!
//! Kernels read operands through [`MatrixAccess`] and never materialize a
//! transposed, conjugated or symmetrized copy: [`OpView`] and [`SymView`]
//! remap indices at access time.
//!
//! Banded storage follows the CBLAS convention. For column-major storage the
//! element (i, j) lives at `ku + i - j + j * ld`; for row-major storage at
//! `kl + j - i + i * ld`. Triangular and symmetric band matrices are the
//! special cases `(kl, ku) = (0, k)` for the upper and `(k, 0)` for the lower
//! triangle.

use crate::layout::{Layout, Transpose, Uplo};
use crate::scalar::Scalar;

/// Read access to matrix element (i, j).
///
/// Callers only ask for elements that exist in the underlying storage
/// (inside the stored triangle for packed data, inside the band for banded
/// data); anything else is a precondition violation.
pub trait MatrixAccess<T> {
    fn at(&self, i: usize, j: usize) -> T;
}

/// Write access for in-place updates.
pub trait MatrixAccessMut<T>: MatrixAccess<T> {
    fn at_mut(&mut self, i: usize, j: usize) -> &mut T;
}

/// Column range `[start, end)` of row `i` that a band with `kl` sub- and
/// `ku` super-diagonals covers, clipped to `cols`.
#[inline(always)]
pub fn band_span(i: usize, kl: usize, ku: usize, cols: usize) -> (usize, usize) {
    let start = i.saturating_sub(kl);
    let end = i.saturating_add(ku).saturating_add(1).min(cols);
    (start.min(end), end)
}

/// Offset of (i, j) in packed triangular storage of order `n`.
#[inline(always)]
pub fn packed_index(layout: Layout, uplo: Uplo, n: usize, i: usize, j: usize) -> usize {
    debug_assert!(uplo.contains(i, j));
    match (layout, uplo) {
        (Layout::ColMajor, Uplo::Upper) => i + j * (j + 1) / 2,
        (Layout::ColMajor, Uplo::Lower) => i + j * (2 * n - j - 1) / 2,
        (Layout::RowMajor, Uplo::Upper) => i * (2 * n - i + 1) / 2 + (j - i),
        (Layout::RowMajor, Uplo::Lower) => i * (i + 1) / 2 + j,
    }
}

/// Offset of (i, j) in band storage.
#[inline(always)]
pub fn band_index(layout: Layout, kl: usize, ku: usize, ld: usize, i: usize, j: usize) -> usize {
    debug_assert!(j + kl >= i && i + ku >= j);
    match layout {
        Layout::ColMajor => ku + i - j + j * ld,
        Layout::RowMajor => kl + j - i + i * ld,
    }
}

/// Number of elements in packed triangular storage of order `n`.
#[inline(always)]
pub fn packed_len(n: usize) -> usize {
    n * (n + 1) / 2
}

// ============================================================================
// Full storage
// ============================================================================

/// Full storage with a leading dimension.
#[derive(Debug, Clone, Copy)]
pub struct Dense<'a, T> {
    data: &'a [T],
    layout: Layout,
    ld: usize,
}

impl<'a, T> Dense<'a, T> {
    #[inline]
    pub fn new(data: &'a [T], layout: Layout, ld: usize) -> Self {
        Self { data, layout, ld }
    }
}

impl<T: Copy> MatrixAccess<T> for Dense<'_, T> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        self.data[self.layout.index(i, j, self.ld)]
    }
}

/// Mutable full storage with a leading dimension.
#[derive(Debug)]
pub struct DenseMut<'a, T> {
    data: &'a mut [T],
    layout: Layout,
    ld: usize,
}

impl<'a, T> DenseMut<'a, T> {
    #[inline]
    pub fn new(data: &'a mut [T], layout: Layout, ld: usize) -> Self {
        Self { data, layout, ld }
    }
}

impl<T: Copy> MatrixAccess<T> for DenseMut<'_, T> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        self.data[self.layout.index(i, j, self.ld)]
    }
}

impl<T: Copy> MatrixAccessMut<T> for DenseMut<'_, T> {
    #[inline(always)]
    fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.data[self.layout.index(i, j, self.ld)]
    }
}

// ============================================================================
// Packed triangular storage
// ============================================================================

/// One triangle of an n x n matrix stored contiguously.
#[derive(Debug, Clone, Copy)]
pub struct Packed<'a, T> {
    data: &'a [T],
    layout: Layout,
    uplo: Uplo,
    n: usize,
}

impl<'a, T> Packed<'a, T> {
    #[inline]
    pub fn new(data: &'a [T], layout: Layout, uplo: Uplo, n: usize) -> Self {
        Self {
            data,
            layout,
            uplo,
            n,
        }
    }
}

impl<T: Copy> MatrixAccess<T> for Packed<'_, T> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        self.data[packed_index(self.layout, self.uplo, self.n, i, j)]
    }
}

/// Mutable packed triangular storage.
#[derive(Debug)]
pub struct PackedMut<'a, T> {
    data: &'a mut [T],
    layout: Layout,
    uplo: Uplo,
    n: usize,
}

impl<'a, T> PackedMut<'a, T> {
    #[inline]
    pub fn new(data: &'a mut [T], layout: Layout, uplo: Uplo, n: usize) -> Self {
        Self {
            data,
            layout,
            uplo,
            n,
        }
    }
}

impl<T: Copy> MatrixAccess<T> for PackedMut<'_, T> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        self.data[packed_index(self.layout, self.uplo, self.n, i, j)]
    }
}

impl<T: Copy> MatrixAccessMut<T> for PackedMut<'_, T> {
    #[inline(always)]
    fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.data[packed_index(self.layout, self.uplo, self.n, i, j)]
    }
}

// ============================================================================
// Band storage
// ============================================================================

/// Band storage with `kl` sub-diagonals and `ku` super-diagonals.
#[derive(Debug, Clone, Copy)]
pub struct Banded<'a, T> {
    data: &'a [T],
    layout: Layout,
    ld: usize,
    kl: usize,
    ku: usize,
}

impl<'a, T> Banded<'a, T> {
    #[inline]
    pub fn new(data: &'a [T], layout: Layout, ld: usize, kl: usize, ku: usize) -> Self {
        Self {
            data,
            layout,
            ld,
            kl,
            ku,
        }
    }

    /// Triangular band of bandwidth `k` holding the `uplo` triangle.
    #[inline]
    pub fn triangular(data: &'a [T], layout: Layout, ld: usize, uplo: Uplo, k: usize) -> Self {
        match uplo {
            Uplo::Upper => Self::new(data, layout, ld, 0, k),
            Uplo::Lower => Self::new(data, layout, ld, k, 0),
        }
    }
}

impl<T: Copy> MatrixAccess<T> for Banded<'_, T> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        self.data[band_index(self.layout, self.kl, self.ku, self.ld, i, j)]
    }
}

// ============================================================================
// Lazy reinterpretation
// ============================================================================

/// `op(A)` without copying: transposition swaps the indices, conjugation is
/// applied on read.
#[derive(Debug, Clone, Copy)]
pub struct OpView<A> {
    inner: A,
    swap: bool,
    conj: bool,
}

impl<A> OpView<A> {
    #[inline]
    pub fn new(inner: A, trans: Transpose) -> Self {
        Self {
            inner,
            swap: trans.swaps(),
            conj: trans.conjugates(),
        }
    }

    /// Explicit swap/conjugate flags, e.g. for `conj(A)` without transposition.
    #[inline]
    pub fn with_flags(inner: A, swap: bool, conj: bool) -> Self {
        Self { inner, swap, conj }
    }

    #[inline(always)]
    pub fn swaps(&self) -> bool {
        self.swap
    }
}

impl<T: Scalar, A: MatrixAccess<T>> MatrixAccess<T> for OpView<A> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        let v = if self.swap {
            self.inner.at(j, i)
        } else {
            self.inner.at(i, j)
        };
        v.conj_if(self.conj)
    }
}

/// Full symmetric (or Hermitian) matrix seen through its stored triangle.
#[derive(Debug, Clone, Copy)]
pub struct SymView<A> {
    inner: A,
    uplo: Uplo,
    hermitian: bool,
}

impl<A> SymView<A> {
    #[inline]
    pub fn symmetric(inner: A, uplo: Uplo) -> Self {
        Self {
            inner,
            uplo,
            hermitian: false,
        }
    }

    #[inline]
    pub fn hermitian(inner: A, uplo: Uplo) -> Self {
        Self {
            inner,
            uplo,
            hermitian: true,
        }
    }
}

impl<T: Scalar, A: MatrixAccess<T>> MatrixAccess<T> for SymView<A> {
    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> T {
        if i == j {
            let d = self.inner.at(i, i);
            if self.hermitian {
                d.real_part()
            } else {
                d
            }
        } else if self.uplo.contains(i, j) {
            self.inner.at(i, j)
        } else {
            self.inner.at(j, i).conj_if(self.hermitian)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    // 3x3 with a(i, j) = 10 * i + j
    fn full(layout: Layout) -> Vec<f64> {
        let mut v = vec![0.0; 9];
        for i in 0..3 {
            for j in 0..3 {
                v[layout.index(i, j, 3)] = (10 * i + j) as f64;
            }
        }
        v
    }

    #[test]
    fn test_dense_both_layouts() {
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            let data = full(layout);
            let a = Dense::new(&data, layout, 3);
            assert_eq!(a.at(2, 1), 21.0);
            assert_eq!(a.at(0, 2), 2.0);
        }
    }

    #[test]
    fn test_packed_offsets_cover_triangle_exactly() {
        let n = 4;
        for layout in [Layout::RowMajor, Layout::ColMajor] {
            for uplo in [Uplo::Upper, Uplo::Lower] {
                let mut seen = vec![false; packed_len(n)];
                for i in 0..n {
                    for j in 0..n {
                        if uplo.contains(i, j) {
                            let k = packed_index(layout, uplo, n, i, j);
                            assert!(!seen[k], "{layout:?} {uplo:?} ({i},{j}) collides");
                            seen[k] = true;
                        }
                    }
                }
                assert!(seen.iter().all(|&s| s));
            }
        }
    }

    #[test]
    fn test_packed_known_layout() {
        // Upper column-major of [[1,2,4],[.,3,5],[.,.,6]]
        let ap = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let a = Packed::new(&ap, Layout::ColMajor, Uplo::Upper, 3);
        assert_eq!(a.at(0, 2), 4.0);
        assert_eq!(a.at(1, 2), 5.0);
        assert_eq!(a.at(1, 1), 3.0);
        // Same numbers read as lower row-major give the transpose.
        let b = Packed::new(&ap, Layout::RowMajor, Uplo::Lower, 3);
        assert_eq!(b.at(2, 0), 4.0);
        assert_eq!(b.at(2, 1), 5.0);
    }

    #[test]
    fn test_band_col_major() {
        // 3x3 tridiagonal, kl = ku = 1, ld = 3
        // column j holds (a[j-1][j], a[j][j], a[j+1][j])
        let ab = [0.0, 1.0, 4.0, 2.0, 5.0, 7.0, 6.0, 8.0, 0.0];
        let a = Banded::new(&ab, Layout::ColMajor, 3, 1, 1);
        assert_eq!(a.at(0, 0), 1.0);
        assert_eq!(a.at(1, 0), 4.0);
        assert_eq!(a.at(0, 1), 2.0);
        assert_eq!(a.at(2, 1), 7.0);
        assert_eq!(a.at(1, 2), 6.0);
        assert_eq!(a.at(2, 2), 8.0);
    }

    #[test]
    fn test_band_row_major() {
        // Same tridiagonal matrix, row i holds (a[i][i-1], a[i][i], a[i][i+1])
        let ab = [0.0, 1.0, 2.0, 4.0, 5.0, 6.0, 7.0, 8.0, 0.0];
        let a = Banded::new(&ab, Layout::RowMajor, 3, 1, 1);
        assert_eq!(a.at(0, 1), 2.0);
        assert_eq!(a.at(1, 0), 4.0);
        assert_eq!(a.at(2, 1), 7.0);
        assert_eq!(a.at(2, 2), 8.0);
    }

    #[test]
    fn test_band_span() {
        assert_eq!(band_span(0, 1, 2, 5), (0, 3));
        assert_eq!(band_span(4, 1, 2, 5), (3, 5));
        assert_eq!(band_span(2, usize::MAX, usize::MAX, 5), (0, 5));
        // row entirely right of a short matrix
        assert_eq!(band_span(6, 1, 0, 3), (3, 3));
    }

    #[test]
    fn test_op_view_conjugates_lazily() {
        let data = [
            Complex64::new(1.0, 1.0),
            Complex64::new(2.0, 2.0),
            Complex64::new(3.0, 3.0),
            Complex64::new(4.0, 4.0),
        ];
        let a = Dense::new(&data[..], Layout::RowMajor, 2);
        let t = OpView::new(a, Transpose::Trans);
        let h = OpView::new(a, Transpose::ConjTrans);
        assert_eq!(t.at(0, 1), Complex64::new(3.0, 3.0));
        assert_eq!(h.at(0, 1), Complex64::new(3.0, -3.0));
        assert_eq!(OpView::new(a, Transpose::NoTrans).at(0, 1), data[1]);
    }

    #[test]
    fn test_sym_view_mirrors_stored_triangle() {
        // Only the upper triangle is meaningful; the lower holds garbage.
        let data = [
            Complex64::new(1.0, 9.0),
            Complex64::new(2.0, 3.0),
            Complex64::new(-99.0, -99.0),
            Complex64::new(4.0, 0.0),
        ];
        let a = Dense::new(&data[..], Layout::RowMajor, 2);
        let h = SymView::hermitian(a, Uplo::Upper);
        assert_eq!(h.at(1, 0), Complex64::new(2.0, -3.0));
        assert_eq!(h.at(0, 0), Complex64::new(1.0, 0.0));
        let s = SymView::symmetric(a, Uplo::Upper);
        assert_eq!(s.at(1, 0), Complex64::new(2.0, 3.0));
        assert_eq!(s.at(0, 0), Complex64::new(1.0, 9.0));
    }
}
