//! CBLAS-style layout and operation flags.
//!
//! Every flag carries its CBLAS integer code so callers holding raw codes can
//! decode them through `TryFrom<i32>`. Kernels never see raw integers; they
//! pattern-match on these enums.

/// Memory layout for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Layout {
    /// Row-major (C-style): elements in a row are contiguous.
    #[default]
    RowMajor = 101,
    /// Column-major (Fortran-style): elements in a column are contiguous.
    ColMajor = 102,
}

/// Transpose operation for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Transpose {
    /// No transpose.
    #[default]
    NoTrans = 111,
    /// Transpose.
    Trans = 112,
    /// Conjugate transpose (plain transpose for real types).
    ConjTrans = 113,
}

/// BLAS triangle specifier (upper/lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Uplo {
    #[default]
    Upper = 121,
    Lower = 122,
}

/// BLAS diagonal specifier (unit/non-unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Diag {
    #[default]
    NonUnit = 131,
    Unit = 132,
}

/// BLAS side specifier (left/right multiplication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Side {
    #[default]
    Left = 141,
    Right = 142,
}

/// A flag enumeration with a CBLAS integer encoding.
pub trait Flag: Copy + Sized + 'static {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Decode a raw CBLAS code.
    fn from_code(code: i32) -> Option<Self>;

    /// The CBLAS code of this value.
    fn code(self) -> i32;
}

macro_rules! impl_flag {
    ($ty:ident, $name:literal, { $($variant:ident),+ $(,)? }) => {
        impl Flag for $ty {
            const NAME: &'static str = $name;

            fn from_code(code: i32) -> Option<Self> {
                $(
                    if code == $ty::$variant as i32 {
                        return Some($ty::$variant);
                    }
                )+
                None
            }

            #[inline(always)]
            fn code(self) -> i32 {
                self as i32
            }
        }

        impl TryFrom<i32> for $ty {
            type Error = i32;

            /// Returns the rejected code on failure.
            fn try_from(code: i32) -> Result<Self, i32> {
                <$ty as Flag>::from_code(code).ok_or(code)
            }
        }
    };
}

impl_flag!(Layout, "layout", { RowMajor, ColMajor });
impl_flag!(Transpose, "transpose", { NoTrans, Trans, ConjTrans });
impl_flag!(Uplo, "uplo", { Upper, Lower });
impl_flag!(Diag, "diag", { NonUnit, Unit });
impl_flag!(Side, "side", { Left, Right });

impl Layout {
    /// Leading dimension of a tightly packed M x N matrix.
    #[inline(always)]
    pub fn leading_dim(self, rows: usize, cols: usize) -> usize {
        match self {
            Layout::RowMajor => cols,
            Layout::ColMajor => rows,
        }
    }

    /// Linear index into a flat array for element (i, j) of an M x N matrix.
    #[inline(always)]
    pub fn index(self, i: usize, j: usize, ld: usize) -> usize {
        match self {
            Layout::RowMajor => i * ld + j,
            Layout::ColMajor => j * ld + i,
        }
    }

    /// Extent of the dimension that `ld` strides over (columns for row-major).
    #[inline(always)]
    pub fn minor_extent(self, rows: usize, cols: usize) -> usize {
        self.leading_dim(rows, cols)
    }

    /// Number of leading-dimension strides spanned (rows for row-major).
    #[inline(always)]
    pub fn major_extent(self, rows: usize, cols: usize) -> usize {
        match self {
            Layout::RowMajor => rows,
            Layout::ColMajor => cols,
        }
    }
}

impl Transpose {
    /// Whether row and column indices are exchanged.
    #[inline(always)]
    pub fn swaps(self) -> bool {
        !matches!(self, Transpose::NoTrans)
    }

    /// Whether elements are conjugated on read.
    #[inline(always)]
    pub fn conjugates(self) -> bool {
        matches!(self, Transpose::ConjTrans)
    }

    /// Logical (rows, cols) of `op(A)` for a stored `rows x cols` matrix.
    #[inline(always)]
    pub fn apply_dims(self, rows: usize, cols: usize) -> (usize, usize) {
        if self.swaps() {
            (cols, rows)
        } else {
            (rows, cols)
        }
    }
}

impl Uplo {
    /// The opposite triangle.
    #[inline(always)]
    pub fn flip(self) -> Uplo {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
        }
    }

    /// Whether (i, j) lies in this triangle (diagonal included).
    #[inline(always)]
    pub fn contains(self, i: usize, j: usize) -> bool {
        match self {
            Uplo::Upper => i <= j,
            Uplo::Lower => i >= j,
        }
    }

    /// Column range `[start, end)` of row `i` within this triangle of an n x n matrix.
    #[inline(always)]
    pub fn row_span(self, i: usize, n: usize) -> (usize, usize) {
        match self {
            Uplo::Upper => (i, n),
            Uplo::Lower => (0, i + 1),
        }
    }
}

impl Diag {
    #[inline(always)]
    pub fn is_unit(self) -> bool {
        matches!(self, Diag::Unit)
    }
}
