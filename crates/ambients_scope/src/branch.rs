//! Branch-local storage for ambient values.
//!
//! A *branch* is one line of execution: a tokio task running inside
//! [`Branch::scope`] (or a closure inside [`Branch::enter`]), and otherwise
//! the current OS thread. Every branch owns a table of slots, one per axis.
//!
//! Child branches start from a snapshot of their parent's table. Opening a
//! scope in a child only touches the child's table; releasing a scope flips a
//! shared liveness flag, so every snapshot holding that slot stops seeing it
//! at once.
//!
//! # Propagation
//!
//! A plain `tokio::spawn` does not carry ambient values, and a task started
//! that way has no slot table of its own: it sees no ambient value and
//! cannot open a scope. Use [`spawn`] or wrap the future with
//! [`Branch::capture`] and [`Branch::scope`]:
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use ambients_scope::AmbientLocation;
//!
//! let mut westus = AmbientLocation::new("westus").unwrap();
//!
//! let seen = ambients_scope::spawn(async {
//!     AmbientLocation::current().map(|location| location.as_str().to_string())
//! })
//! .await
//! .unwrap();
//!
//! assert_eq!(seen.as_deref(), Some("westus"));
//! westus.release().unwrap();
//! # }
//! ```

use core::any::Any;
use core::cell::RefCell;
use core::future::Future;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::context::AxisId;

/// One installed scope.
#[derive(Clone)]
pub(crate) struct Slot {
    /// Identifier of the scope that installed this slot.
    pub(crate) id: u64,
    /// Shared with the scope guard; cleared on release.
    pub(crate) alive: Arc<AtomicBool>,
    pub(crate) value: Arc<dyn Any + Send + Sync>,
}

impl Slot {
    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// The slot table of a branch.
pub(crate) type Slots = HashMap<AxisId, Slot>;

tokio::task_local! {
    static TASK_BRANCH: RefCell<Slots>;
}

std::thread_local! {
    static THREAD_BRANCH: RefCell<Slots> = RefCell::new(Slots::new());
}

/// Why the calling code has no slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoBranch {
    /// A tokio task started without [`spawn`] or [`Branch::scope`].
    UnscopedTask,
    /// The thread's storage is being torn down.
    TornDown,
}

/// Runs `f` with the calling branch's slot table.
///
/// Inside a tokio task only the task-local table is used: the thread table
/// of a worker is shared by every task it polls.
pub(crate) fn with_branch<R>(f: impl FnOnce(&RefCell<Slots>) -> R) -> Result<R, NoBranch> {
    if TASK_BRANCH.try_with(|_| ()).is_ok() {
        TASK_BRANCH.try_with(f).map_err(|_| NoBranch::TornDown)
    } else if tokio::task::try_id().is_some() {
        Err(NoBranch::UnscopedTask)
    } else {
        THREAD_BRANCH.try_with(f).map_err(|_| NoBranch::TornDown)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Branch
// ─────────────────────────────────────────────────────────────────────────────

/// A snapshot of the ambient values in effect on a branch.
#[derive(Clone, Default)]
pub struct Branch {
    slots: Slots,
}

impl core::fmt::Debug for Branch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let axes: Vec<_> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_alive())
            .map(|(axis, _)| axis.name())
            .collect();
        f.debug_struct("Branch").field("axes", &axes).finish()
    }
}

impl Branch {
    /// Creates a branch with no ambient values.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshots the ambient values in effect on the calling branch.
    ///
    /// Released scopes are left out.
    #[must_use]
    pub fn capture() -> Self {
        let slots = with_branch(|cell| {
            cell.borrow()
                .iter()
                .filter(|(_, slot)| slot.is_alive())
                .map(|(axis, slot)| (*axis, slot.clone()))
                .collect()
        })
        .unwrap_or_default();
        Self { slots }
    }

    /// Runs `future` as a child branch seeded with this snapshot.
    pub fn scope<F: Future>(self, future: F) -> impl Future<Output = F::Output> {
        TASK_BRANCH.scope(RefCell::new(self.slots), future)
    }

    /// Runs `f` as a child branch seeded with this snapshot.
    pub fn enter<R>(self, f: impl FnOnce() -> R) -> R {
        TASK_BRANCH.sync_scope(RefCell::new(self.slots), f)
    }

    /// Returns the number of live ambient values in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_alive()).count()
    }

    /// Returns true if the snapshot holds no live ambient value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spawns a tokio task that inherits the caller's ambient values.
///
/// # Panics
///
/// Panics if called outside a tokio runtime, like [`tokio::spawn`].
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(Branch::capture().scope(future))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::Location;
    use crate::context::ScopedContext;

    #[test]
    fn capture_skips_released_scopes() {
        std::thread::spawn(|| {
            let mut scope = ScopedContext::open(Location::new("eastus").unwrap()).unwrap();
            assert_eq!(Branch::capture().len(), 1);

            scope.release().unwrap();
            assert!(Branch::capture().is_empty());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn enter_isolates_child_changes() {
        std::thread::spawn(|| {
            Branch::empty().enter(|| {
                let _inner = ScopedContext::open(Location::new("eastus").unwrap()).unwrap();
                assert!(ScopedContext::<Location>::current().is_some());
            });
            assert!(ScopedContext::<Location>::current().is_none());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn snapshot_sees_later_release() {
        std::thread::spawn(|| {
            let mut scope = ScopedContext::open(Location::new("eastus").unwrap()).unwrap();
            let snapshot = Branch::capture();

            scope.release().unwrap();
            snapshot.enter(|| assert!(ScopedContext::<Location>::current().is_none()));
        })
        .join()
        .unwrap();
    }

    #[test]
    fn debug_lists_live_axes() {
        std::thread::spawn(|| {
            let _scope = ScopedContext::open(Location::new("eastus").unwrap()).unwrap();
            assert_eq!(format!("{:?}", Branch::capture()), r#"Branch { axes: ["location"] }"#);
        })
        .join()
        .unwrap();
    }
}
