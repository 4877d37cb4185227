//! Stack growth for deep recursion.
//!
//! The parser descends once per nesting level and the evaluator once per
//! expression node and user call, so a deeply nested program or a recursive
//! MOL function can exhaust the native stack long before the interpreter's
//! own call-depth limit fires. Both wrap their recursive entry points in
//! [`ensure_sufficient_stack`].
//!
//! On wasm the closure is simply called.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first moving to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
