//! Call elision by comparing against the previous call's parameters.

/// Remembers the parameters of the last call it let through.
///
/// [`call_if_changed`](Memo::call_if_changed) runs its closure only when the
/// new parameters differ from the remembered ones (or nothing is remembered
/// yet). Used for native calls whose effect is fully determined by their
/// arguments, such as selecting the active texture unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo<T> {
    last: Option<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Parameters of the last call, if any.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Forget the last call so the next one always runs.
    pub fn forget(&mut self) {
        self.last = None;
    }
}

impl<T: PartialEq> Memo<T> {
    /// Run `f` with `args` unless the previous call used equal `args`.
    ///
    /// Returns `Some` with the closure's result when it ran.
    pub fn call_if_changed<R>(&mut self, args: T, f: impl FnOnce(&T) -> R) -> Option<R> {
        if self.last.as_ref() == Some(&args) {
            return None;
        }
        let out = f(&args);
        self.last = Some(args);
        Some(out)
    }

    /// Whether a call with `args` would run.
    pub fn would_call(&self, args: &T) -> bool {
        self.last.as_ref() != Some(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_args_are_elided() {
        let mut memo = Memo::new();
        let mut calls = 0;
        for unit in [0, 0, 1, 1, 0] {
            memo.call_if_changed(unit, |_| calls += 1);
        }
        assert_eq!(calls, 3);
        assert_eq!(memo.last(), Some(&0));
    }

    #[test]
    fn forget_forces_next_call() {
        let mut memo = Memo::new();
        assert_eq!(memo.call_if_changed((1, 2), |&(a, b)| a + b), Some(3));
        assert_eq!(memo.call_if_changed((1, 2), |&(a, b)| a + b), None);
        memo.forget();
        assert!(memo.would_call(&(1, 2)));
        assert_eq!(memo.call_if_changed((1, 2), |&(a, b)| a + b), Some(3));
    }
}
