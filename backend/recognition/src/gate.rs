//! Admission gate for the rate-limited recognition provider.
//!
//! The upstream vision endpoint tolerates exactly one in-flight request from
//! this deployment; concurrent intake tabs must queue. The gate admits one
//! caller at a time, waiters served in arrival order.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Capacity-1 fair admission gate. Cloning shares the underlying permit.
#[derive(Clone)]
pub struct AdmissionGate {
    permit: Arc<Semaphore>,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self { permit: Arc::new(Semaphore::new(1)) }
    }

    /// Wait for the single slot. The returned permit releases it on drop.
    pub async fn admit(&self) -> OwnedSemaphorePermit {
        // The semaphore is never closed, so acquisition cannot fail.
        self.permit
            .clone()
            .acquire_owned()
            .await
            .expect("admission gate semaphore closed")
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn at_most_one_caller_is_in_flight() {
        let gate = AdmissionGate::new();
        let in_flight = Arc::new(AtomicBool::new(false));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = gate.clone();
            let in_flight = in_flight.clone();
            let overlaps = overlaps.clone();
            handles.push(tokio::spawn(async move {
                let _permit = gate.admit().await;
                if in_flight.swap(true, Ordering::SeqCst) {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.store(false, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn permit_release_admits_the_next_waiter() {
        let gate = AdmissionGate::new();
        let first = gate.admit().await;
        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _permit = gate.admit().await;
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!waiter.is_finished());
        drop(first);
        waiter.await.unwrap();
    }
}
