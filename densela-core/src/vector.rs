//! Strided vector views over caller-owned slices.
//!
//! Element `i` of a view with increment `inc` lives at `i * inc` when
//! `inc > 0`, and at `(n - 1 - i) * |inc|` when `inc < 0`: a negative stride
//! walks the slice from its end, but index `i` is always the i-th logical
//! element. A zero increment is rejected by the validation gateway before a
//! view is ever built.

/// Number of slice elements a vector of `n` elements with stride `inc` spans,
/// or `None` if that count does not fit in `usize`.
#[inline(always)]
pub fn footprint(n: usize, inc: isize) -> Option<usize> {
    if n == 0 {
        Some(0)
    } else {
        (n - 1).checked_mul(inc.unsigned_abs())?.checked_add(1)
    }
}

#[inline(always)]
fn offset(i: usize, n: usize, inc: isize) -> usize {
    if inc > 0 {
        i * inc as usize
    } else {
        (n - 1 - i) * inc.unsigned_abs()
    }
}

/// Read-only strided view.
#[derive(Debug, Clone, Copy)]
pub struct StridedVec<'a, T> {
    data: &'a [T],
    len: usize,
    inc: isize,
}

impl<'a, T: Copy> StridedVec<'a, T> {
    /// Build a view; `data` must cover `footprint(len, inc)` elements.
    #[inline]
    pub fn new(data: &'a [T], len: usize, inc: isize) -> Self {
        debug_assert!(inc != 0 || len <= 1);
        debug_assert!(footprint(len, inc).is_some_and(|f| data.len() >= f));
        Self { data, len, inc }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn get(&self, i: usize) -> T {
        self.data[offset(i, self.len, self.inc)]
    }

    /// Contiguous forward slice when the stride is 1.
    #[inline]
    pub fn as_contiguous(&self) -> Option<&'a [T]> {
        if self.inc == 1 {
            Some(&self.data[..self.len])
        } else {
            None
        }
    }

    /// Iterate over the logical elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

/// Mutable strided view.
#[derive(Debug)]
pub struct StridedVecMut<'a, T> {
    data: &'a mut [T],
    len: usize,
    inc: isize,
}

impl<'a, T: Copy> StridedVecMut<'a, T> {
    /// Build a view; `data` must cover `footprint(len, inc)` elements.
    #[inline]
    pub fn new(data: &'a mut [T], len: usize, inc: isize) -> Self {
        debug_assert!(inc != 0 || len <= 1);
        debug_assert!(footprint(len, inc).is_some_and(|f| data.len() >= f));
        Self { data, len, inc }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn get(&self, i: usize) -> T {
        self.data[offset(i, self.len, self.inc)]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, v: T) {
        self.data[offset(i, self.len, self.inc)] = v;
    }

    #[inline(always)]
    pub fn at_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[offset(i, self.len, self.inc)]
    }

    /// Contiguous forward slice when the stride is 1.
    #[inline]
    pub fn as_contiguous_mut(&mut self) -> Option<&mut [T]> {
        if self.inc == 1 {
            Some(&mut self.data[..self.len])
        } else {
            None
        }
    }

    /// Apply `f` to every logical element.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(usize, &mut T)) {
        for i in 0..self.len {
            f(i, self.at_mut(i));
        }
    }
}
