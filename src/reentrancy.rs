//! Debug-only guard against re-entering a table from its own strategies.
//!
//! The hasher and comparator run while a chain is being walked or relinked.
//! If either one calls back into the same table, the structure may be
//! observed half-updated. In debug builds each public operation enters the
//! guard and a nested entry panics, naming both operations. In release
//! builds the guard is a zero-sized no-op.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table tracker. Public operations start with
/// `let _g = self.guard.enter("insert");`.
#[derive(Debug)]
pub(crate) struct OpGuard {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Tables are single-threaded: keep them !Send + !Sync.
    _nosend: PhantomData<*mut ()>,
}

impl OpGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosend: PhantomData,
        }
    }

    /// Mark `op` as running. Panics in debug builds if another operation
    /// on the same table has not finished.
    #[inline]
    #[cfg_attr(not(debug_assertions), allow(unused_variables))]
    pub(crate) fn enter(&self, op: &'static str) -> OpScope<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("table re-entered by `{op}` while `{outer}` was running");
            }
            self.active.set(Some(op));
            return OpScope { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return OpScope { _z: PhantomData };
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for OpGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII scope returned by [`OpGuard::enter`]; clears the active operation
/// on drop, including during unwinding.
pub(crate) struct OpScope<'a> {
    #[cfg(debug_assertions)]
    owner: &'a OpGuard,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for OpScope<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
