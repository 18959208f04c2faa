//! In-flight guard for long-running operations.
//!
//! An upload or report export holds the gate until it finishes; a second
//! trigger while the first is running is refused with
//! [`ClientError::Busy`]. Dropping the guard releases the gate whether the
//! operation succeeded or failed.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ClientError;

#[derive(Debug)]
pub struct OperationGate {
    operation: &'static str,
    in_flight: AtomicBool,
}

impl OperationGate {
    pub const fn new(operation: &'static str) -> Self {
        Self {
            operation,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Mark the operation in flight, or fail if it already is.
    pub fn try_acquire(&self) -> Result<GateGuard<'_>, ClientError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::warn!(operation = self.operation, "Operation already in flight");
            return Err(ClientError::Busy(self.operation));
        }
        Ok(GateGuard { gate: self })
    }
}

/// Releases the gate on drop.
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a OperationGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::SeqCst);
    }
}
