//! Per-device lock for drivers reached from more than one context.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// A driver behind a blocking mutex. Every call through [`Shared::lock`] is one
/// serialized transaction.
pub struct Shared<M: RawMutex, T> {
    inner: Mutex<M, RefCell<T>>,
}

impl<M: RawMutex, T> Shared<M, T> {
    pub fn new(device: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(device)),
        }
    }

    /// Run `f` with exclusive access to the device.
    ///
    /// Re-entering the lock from inside `f` panics.
    pub fn lock<U>(&self, f: impl FnOnce(&mut T) -> U) -> U {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}
