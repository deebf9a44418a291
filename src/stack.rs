//! Stack growth for the recursive passes.
//!
//! Parsing, resolving and evaluating all recurse once per level of syntactic
//! nesting (and evaluation once more per script call). Each of those entry
//! points runs through [`ensure_sufficient_stack`], which moves onto a freshly
//! allocated segment when the current one runs low. Script recursion is still
//! bounded separately by [`MAX_CALL_DEPTH`](crate::interpreter::MAX_CALL_DEPTH).

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_recursion_does_not_overflow() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        assert_eq!(depth(200_000), 200_000);
    }
}
