//! Argument checks run before a kernel body starts.
//!
//! A [`Gate`] is created per call with the routine name; each check returns
//! the error already routed through the error handler, so kernels simply
//! `?` their way through validation. Once the gate is passed the kernels
//! perform no further argument checking.

use crate::error::{report, BlasError, Result};
use crate::layout::{Flag, Layout};
use crate::matrix::{band_span, packed_len};
use crate::vector::footprint;

/// Elements a `rows x cols` matrix with leading dimension `ld` spans, or
/// `None` on overflow.
#[inline]
pub fn matrix_footprint(layout: Layout, rows: usize, cols: usize, ld: usize) -> Option<usize> {
    if rows == 0 || cols == 0 {
        return Some(0);
    }
    (layout.major_extent(rows, cols) - 1)
        .checked_mul(ld)?
        .checked_add(layout.minor_extent(rows, cols))
}

/// Elements a band matrix actually touches in its storage, or `None` on
/// overflow.
pub fn band_footprint(
    layout: Layout,
    rows: usize,
    cols: usize,
    kl: usize,
    ku: usize,
    ld: usize,
) -> Option<usize> {
    let mut end = 0;
    match layout {
        Layout::RowMajor => {
            for i in 0..rows {
                let (start, stop) = band_span(i, kl, ku, cols);
                if start < stop {
                    let last = i.checked_mul(ld)?.checked_add(kl + (stop - 1) - i + 1)?;
                    end = end.max(last);
                }
            }
        }
        Layout::ColMajor => {
            for j in 0..cols {
                // rows j - ku ..= j + kl
                let (start, stop) = band_span(j, ku, kl, rows);
                if start < stop {
                    let last = j.checked_mul(ld)?.checked_add(ku + (stop - 1) - j + 1)?;
                    end = end.max(last);
                }
            }
        }
    }
    Some(end)
}

/// Per-call validation gateway.
#[derive(Debug, Clone, Copy)]
pub struct Gate {
    routine: &'static str,
}

impl Gate {
    #[inline]
    pub const fn new(routine: &'static str) -> Self {
        Self { routine }
    }

    #[inline]
    pub fn routine(&self) -> &'static str {
        self.routine
    }

    #[cold]
    fn fail(&self, err: BlasError) -> BlasError {
        report(&err);
        err
    }

    /// Decode a raw dimension; negatives are rejected.
    pub fn dimension(&self, position: usize, name: &'static str, raw: i64) -> Result<usize> {
        usize::try_from(raw).map_err(|_| {
            self.fail(BlasError::InvalidDimension {
                routine: self.routine,
                position,
                name,
                value: raw,
            })
        })
    }

    /// Decode a raw CBLAS flag code.
    pub fn flag<F: Flag>(&self, position: usize, name: &'static str, code: i32) -> Result<F> {
        F::from_code(code).ok_or_else(|| self.reject_flag(position, name, F::NAME, code))
    }

    /// Reject a flag value that decodes but is not allowed for this routine.
    pub fn reject_flag(
        &self,
        position: usize,
        name: &'static str,
        kind: &'static str,
        code: i32,
    ) -> BlasError {
        self.fail(BlasError::InvalidEnum {
            routine: self.routine,
            position,
            name,
            kind,
            code,
        })
    }

    pub fn stride(&self, position: usize, name: &'static str, inc: isize) -> Result<()> {
        if inc == 0 {
            return Err(self.fail(BlasError::InvalidStride {
                routine: self.routine,
                position,
                name,
            }));
        }
        Ok(())
    }

    /// Check a vector operand: `buf` sits at `position` and its increment at
    /// `position + 1`.
    pub fn vector<T>(
        &self,
        position: usize,
        name: &'static str,
        buf: &[T],
        n: usize,
        inc: isize,
    ) -> Result<()> {
        self.stride(position + 1, stride_name(name), inc)?;
        self.buffer(position, name, buf, footprint(n, inc))
    }

    /// `ld >= max(1, required)`.
    pub fn leading_dim(
        &self,
        position: usize,
        name: &'static str,
        ld: usize,
        required: usize,
    ) -> Result<()> {
        let required = required.max(1);
        if ld < required {
            return Err(self.fail(BlasError::InvalidLeadingDimension {
                routine: self.routine,
                position,
                name,
                value: ld,
                required,
            }));
        }
        Ok(())
    }

    /// Check a full-storage matrix: `buf` at `position`, `ld` at `position + 1`.
    pub fn matrix<T>(
        &self,
        position: usize,
        name: &'static str,
        buf: &[T],
        layout: Layout,
        rows: usize,
        cols: usize,
        ld: usize,
    ) -> Result<()> {
        self.leading_dim(
            position + 1,
            ld_name(name),
            ld,
            layout.minor_extent(rows, cols),
        )?;
        self.buffer(
            position,
            name,
            buf,
            matrix_footprint(layout, rows, cols, ld),
        )
    }

    /// Check a band matrix: `buf` at `position`, `ld` at `position + 1`;
    /// `ld >= kl + ku + 1`.
    #[allow(clippy::too_many_arguments)]
    pub fn band<T>(
        &self,
        position: usize,
        name: &'static str,
        buf: &[T],
        layout: Layout,
        rows: usize,
        cols: usize,
        kl: usize,
        ku: usize,
        ld: usize,
    ) -> Result<()> {
        let required = kl.saturating_add(ku).saturating_add(1);
        self.leading_dim(position + 1, ld_name(name), ld, required)?;
        self.buffer(
            position,
            name,
            buf,
            band_footprint(layout, rows, cols, kl, ku, ld),
        )
    }

    /// Check packed triangular storage of order `n`.
    pub fn packed<T>(
        &self,
        position: usize,
        name: &'static str,
        buf: &[T],
        n: usize,
    ) -> Result<()> {
        let required = n.checked_mul(n.saturating_add(1)).map(|v| v / 2);
        self.buffer(position, name, buf, required)
    }

    /// `None` stands for a footprint too large to address, which no slice
    /// can cover.
    fn buffer<T>(
        &self,
        position: usize,
        name: &'static str,
        buf: &[T],
        required: Option<usize>,
    ) -> Result<()> {
        let required = required.unwrap_or(usize::MAX);
        if buf.len() < required {
            return Err(self.fail(BlasError::BufferTooSmall {
                routine: self.routine,
                position,
                name,
                len: buf.len(),
                required,
            }));
        }
        Ok(())
    }
}

fn stride_name(buf: &'static str) -> &'static str {
    match buf {
        "x" => "incx",
        "y" => "incy",
        _ => "inc",
    }
}

fn ld_name(buf: &'static str) -> &'static str {
    match buf {
        "a" => "lda",
        "b" => "ldb",
        "c" => "ldc",
        _ => "ld",
    }
}
