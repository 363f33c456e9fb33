//! Scoped-thread helpers for splitting a kernel's output across workers.
//!
//! Uses `std::thread::scope`: every worker is joined before the call returns,
//! so no background work outlives a kernel invocation.

/// Raw pointer into an output buffer that workers write through.
///
/// Safety: workers must touch disjoint elements.
#[derive(Debug, Clone, Copy)]
pub struct SendMutPtr<T> {
    ptr: *mut T,
    len: usize,
}

unsafe impl<T: Send> Send for SendMutPtr<T> {}
unsafe impl<T: Send> Sync for SendMutPtr<T> {}

impl<T> SendMutPtr<T> {
    pub fn new(slice: &mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
        }
    }

    /// # Safety
    /// `idx` must be in bounds and no other worker may access it concurrently.
    #[inline(always)]
    pub unsafe fn update(&self, idx: usize, f: impl FnOnce(T) -> T)
    where
        T: Copy,
    {
        debug_assert!(idx < self.len);
        let p = self.ptr.add(idx);
        p.write(f(p.read()));
    }
}

/// Run `f(chunk_start, chunk_end)` over `[start, end)` split into at most
/// `num_threads` contiguous chunks.
///
/// Runs inline when one thread suffices.
#[inline]
pub fn parallel_for_chunks<F>(start: usize, end: usize, num_threads: usize, f: F)
where
    F: Fn(usize, usize) + Sync + Send + Copy,
{
    if start >= end {
        return;
    }
    let total = end - start;
    let num_threads = num_threads.clamp(1, total);
    let chunk_size = total.div_ceil(num_threads);

    if num_threads <= 1 {
        f(start, end);
        return;
    }

    std::thread::scope(|s| {
        for chunk_start in (start..end).step_by(chunk_size) {
            let chunk_end = (chunk_start + chunk_size).min(end);
            s.spawn(move || {
                f(chunk_start, chunk_end);
            });
        }
    });
}
