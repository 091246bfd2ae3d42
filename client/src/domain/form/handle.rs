//! Shared ownership of a form with snapshot publication.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::{FormSnapshot, RegistrationForm};

/// A [`RegistrationForm`] behind a mutex, publishing a [`FormSnapshot`]
/// after every mutation.
///
/// The lock is only held for the duration of a synchronous closure, so it is
/// never held across an await point.
#[derive(Debug)]
pub struct FormHandle {
    form: Mutex<RegistrationForm>,
    snapshots: watch::Sender<FormSnapshot>,
}

impl FormHandle {
    /// Wrap `form` and publish its initial snapshot.
    pub fn new(form: RegistrationForm) -> Self {
        let (snapshots, _) = watch::channel(form.snapshot());
        Self {
            form: Mutex::new(form),
            snapshots,
        }
    }

    /// Mutate the form and publish the resulting snapshot.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut RegistrationForm) -> R) -> R {
        let mut form = self.lock();
        let result = mutate(&mut form);
        self.snapshots.send_replace(form.snapshot());
        result
    }

    /// Read the form without publishing.
    pub fn read<R>(&self, inspect: impl FnOnce(&RegistrationForm) -> R) -> R {
        inspect(&self.lock())
    }

    /// Most recently published snapshot.
    pub fn snapshot(&self) -> FormSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.snapshots.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, RegistrationForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FormHandle {
    fn default() -> Self {
        Self::new(RegistrationForm::new())
    }
}
