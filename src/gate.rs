use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// One-shot barrier releasing all producer threads at a common instant.
///
/// The gate starts armed. Producer threads call [`wait`][StartGate::wait] as
/// their first action and block; a single [`release`][StartGate::release]
/// transitions the gate to released, permanently, and wakes every waiter at
/// once. Threads that call `wait` after the release proceed immediately.
///
/// The gate exists so that round-robin fairness is measured from one shared
/// origin instant: no stream gets a head start merely because its thread was
/// scheduled earlier.
///
/// Cloning produces another handle to the same gate.
#[derive(Clone)]
pub struct StartGate {
    shared: Arc<Shared>,
}

struct Shared {
    released: Mutex<bool>,
    condvar: Condvar,
}

impl StartGate {
    /// Makes a new gate in the armed state.
    pub fn new() -> Self {
        StartGate {
            shared: Arc::new(Shared {
                released: Mutex::new(false),
                condvar: Condvar::new(),
            }),
        }
    }

    /// Blocks the calling thread until the gate has been released.
    pub fn wait(&self) {
        let mut released = self.shared.released.lock();
        while !*released {
            self.shared.condvar.wait(&mut released);
        }
    }

    /// Releases the gate, waking all current waiters. The transition is one
    /// way; releasing an already released gate has no further effect.
    pub fn release(&self) {
        let mut released = self.shared.released.lock();
        *released = true;
        self.shared.condvar.notify_all();
    }
}

impl Default for StartGate {
    fn default() -> Self {
        StartGate::new()
    }
}
