//! Generic scoped ambient values.
//!
//! An [`Ambient`] type is a value that can be put "in effect" for a region of
//! code. [`ScopedContext::open`] installs a value on the calling branch and
//! returns a guard; the value stays current until the guard is released or
//! dropped.
//!
//! Each axis (one [`Ambient`] type) holds at most one live value per branch,
//! and an axis may declare other axes it cannot be opened under.

use core::any::TypeId;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::branch::{NoBranch, Slot, with_branch};
use crate::error::ScopeError;

/// Source of scope identifiers; unique for the life of the process.
static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

// ─────────────────────────────────────────────────────────────────────────────
// Ambient / AxisId
// ─────────────────────────────────────────────────────────────────────────────

/// A value type that can be scoped.
pub trait Ambient: Send + Sync + 'static {
    /// Human-readable axis name used in errors and logs.
    const AXIS: &'static str;

    /// Axes under which this axis may not be opened.
    fn blocked_by() -> Vec<AxisId> {
        Vec::new()
    }

    /// Called once the value is in effect, after every conflict check passed.
    fn opened(&self) {}
}

/// Identifies an axis. Based on [`TypeId`], one per [`Ambient`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisId {
    type_id: TypeId,
    name: &'static str,
}

impl AxisId {
    /// Returns the `AxisId` of `T`.
    #[must_use]
    pub fn of<T: Ambient>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::AXIS,
        }
    }

    /// Returns the axis name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScopedContext
// ─────────────────────────────────────────────────────────────────────────────

/// Guard for an ambient value in effect on a branch.
///
/// Release explicitly with [`release`](Self::release) to observe errors;
/// dropping an unreleased guard releases it and logs any mismatch.
#[must_use = "the ambient value is released as soon as the guard is dropped"]
pub struct ScopedContext<T: Ambient> {
    value: Arc<T>,
    id: u64,
    alive: Arc<AtomicBool>,
    released: bool,
}

impl<T: Ambient + core::fmt::Debug> core::fmt::Debug for ScopedContext<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopedContext")
            .field("axis", &T::AXIS)
            .field("value", &self.value)
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}

impl<T: Ambient> ScopedContext<T> {
    /// Puts `value` in effect on the calling branch.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::ConflictingScope`] if a live value of the same
    /// axis, or of an axis in [`Ambient::blocked_by`], is in effect on this
    /// branch, and [`ScopeError::InvalidState`] inside a tokio task that was
    /// not started with [`spawn`](crate::spawn) or [`Branch::scope`](crate::Branch::scope).
    pub fn open(value: T) -> Result<Self, ScopeError> {
        let axis = AxisId::of::<T>();
        let value = Arc::new(value);
        let alive = Arc::new(AtomicBool::new(true));
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);

        let slot = Slot {
            id,
            alive: Arc::clone(&alive),
            value: Arc::clone(&value) as Arc<dyn core::any::Any + Send + Sync>,
        };

        with_branch(|cell| {
            let mut slots = cell.borrow_mut();

            let live = |axis: &AxisId| slots.get(axis).is_some_and(Slot::is_alive);

            if let Some(blocker) = T::blocked_by().iter().find(|blocker| live(blocker)) {
                return Err(ScopeError::conflicting_scope(format!(
                    "an ambient {} cannot be opened while an ambient {} is in effect",
                    T::AXIS,
                    blocker.name()
                )));
            }

            if live(&axis) {
                return Err(ScopeError::conflicting_scope(format!(
                    "there is already an ambient {0} in effect; nesting ambient {0} scopes is \
                     not supported, release the previous one first",
                    T::AXIS
                )));
            }

            slots.insert(axis, slot);
            Ok(())
        })
        .unwrap_or_else(|reason| Err(no_branch::<T>(reason)))?;

        value.opened();
        tracing::debug!(axis = T::AXIS, scope = id, "ambient scope opened");

        Ok(Self {
            value,
            id,
            alive,
            released: false,
        })
    }

    /// Returns the live value of this axis on the calling branch, if any.
    #[must_use]
    pub fn current() -> Option<Arc<T>> {
        let axis = AxisId::of::<T>();
        with_branch(|cell| {
            let slots = cell.borrow();
            let slot = slots.get(&axis).filter(|slot| slot.is_alive())?;
            Arc::clone(&slot.value).downcast::<T>().ok()
        })
        .ok()
        .flatten()
    }

    /// Returns the scoped value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the unique identifier of this scope.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns true once the scope was released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Ends the scope.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidState`] if the scope was already
    /// released, if no value of this axis is in effect on the calling
    /// branch, or if the value in effect belongs to another scope.
    pub fn release(&mut self) -> Result<(), ScopeError> {
        if self.released {
            return Err(ScopeError::invalid_state(format!(
                "ambient {} scope was already released",
                T::AXIS
            )));
        }

        self.remove_slot()?;
        self.mark_released();
        tracing::debug!(axis = T::AXIS, scope = self.id, "ambient scope released");
        Ok(())
    }

    fn remove_slot(&self) -> Result<(), ScopeError> {
        let axis = AxisId::of::<T>();
        with_branch(|cell| {
            let mut slots = cell.borrow_mut();
            match slots.get(&axis) {
                None => Err(ScopeError::invalid_state(format!(
                    "tried to release an ambient {} but none is in effect on this branch",
                    T::AXIS
                ))),
                Some(slot) if slot.id != self.id => Err(ScopeError::invalid_state(format!(
                    "tried to release an ambient {} that is not the one in effect on this branch",
                    T::AXIS
                ))),
                Some(_) => {
                    slots.remove(&axis);
                    Ok(())
                }
            }
        })
        .unwrap_or_else(|reason| Err(no_branch::<T>(reason)))
    }

    fn mark_released(&mut self) {
        self.released = true;
        self.alive.store(false, Ordering::Release);
    }
}

impl<T: Ambient> Drop for ScopedContext<T> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(error) = self.remove_slot() {
            tracing::warn!(
                axis = T::AXIS,
                scope = self.id,
                %error,
                "ambient scope dropped away from the branch it was opened on"
            );
        }
        self.mark_released();
    }
}

fn no_branch<T: Ambient>(reason: NoBranch) -> ScopeError {
    match reason {
        NoBranch::UnscopedTask => ScopeError::invalid_state(format!(
            "ambient {} scopes need a branch inside tokio tasks; start the task with \
             ambients_scope::spawn or wrap it with Branch::scope",
            T::AXIS
        )),
        NoBranch::TornDown => ScopeError::invalid_state(format!(
            "ambient {} storage is not available on this thread",
            T::AXIS
        )),
    }
}
