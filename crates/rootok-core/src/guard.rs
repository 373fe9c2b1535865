//! # Scoped Callback Guard
//!
//! Some MAC libraries log through a single process-wide callback slot. The
//! module swaps its own callback in while it queries the policy and must put
//! the previous one back on every exit path, including early returns when
//! the security label cannot be read.
//!
//! [`ScopedCallback`] ties the restore to `Drop`.

/// A process-wide slot holding one callback.
pub trait CallbackSlot {
    /// The callback representation stored in the slot.
    type Callback: Copy;

    /// The callback currently installed.
    fn current(&self) -> Self::Callback;

    /// Replace the installed callback.
    fn install(&self, callback: Self::Callback);
}

/// Holds a callback slot and restores its previous occupant on drop.
#[must_use = "the previous callback is restored as soon as the guard is dropped"]
pub struct ScopedCallback<'a, S: CallbackSlot> {
    slot: &'a S,
    previous: S::Callback,
}

impl<'a, S: CallbackSlot> ScopedCallback<'a, S> {
    /// Install `callback`, remembering what was there before.
    pub fn install(slot: &'a S, callback: S::Callback) -> Self {
        let previous = slot.current();
        slot.install(callback);
        Self { slot, previous }
    }

    /// The callback that will be restored.
    pub fn previous(&self) -> S::Callback {
        self.previous
    }
}

impl<S: CallbackSlot> Drop for ScopedCallback<'_, S> {
    fn drop(&mut self) {
        self.slot.install(self.previous);
    }
}

// =============================================================================
// TESTS
// =============================================================================
