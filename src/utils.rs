//! Assorted utilities and helpers.

/// Relative tolerance used when comparing floating-point objectives that
/// were produced by differently associated reductions.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Pick a contiguous chunk length for a parallel loop over `len` indices.
///
/// Aims for roughly four chunks per worker so that the pool stays busy
/// without degenerating into per-index tasks.
#[inline]
pub fn default_chunk_len(len: usize, workers: usize) -> usize {
    let target = workers.max(1).saturating_mul(4);
    len.div_ceil(target).max(1)
}

/// Compare two objectives within a relative tolerance.
///
/// Infinities compare equal only to themselves; NaN never compares equal.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= eps * scale
}
