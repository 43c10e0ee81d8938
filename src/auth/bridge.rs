//! Offloads blocking browser-driver calls from the async scheduler.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task;

use super::FlowError;

/// Runs blocking driver calls on the runtime's blocking pool, bounded so a
/// burst of concurrent flows cannot exhaust it.
///
/// Each flow awaits one offloaded call before issuing the next, so order is
/// preserved within a flow; nothing is ordered across flows.
#[derive(Clone, Debug)]
pub struct Bridge {
    permits: Arc<Semaphore>,
}

impl Bridge {
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Execute one blocking call and resolve when it completes. An error on
    /// the worker thread is handed back unchanged; a panic surfaces as an
    /// automation fault.
    pub async fn run<T, F>(&self, op: F) -> Result<T, FlowError>
    where
        F: FnOnce() -> Result<T, FlowError> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FlowError::Automation("bridge is shut down".to_string()))?;

        let joined = task::spawn_blocking(op).await;
        drop(permit);

        match joined {
            Ok(result) => result,
            Err(err) => Err(FlowError::Automation(format!(
                "worker thread failed: {err}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_returns_value() {
        let bridge = Bridge::new(2);
        let out = bridge.run(|| Ok(21 * 2)).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn test_run_propagates_error_unchanged() {
        let bridge = Bridge::new(2);
        let err = bridge
            .run::<(), _>(|| Err(FlowError::NotFound("login field")))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::NotFound("login field")));
    }

    #[tokio::test]
    async fn test_panic_surfaces_as_automation_fault() {
        let bridge = Bridge::new(2);
        let err = bridge
            .run::<(), _>(|| panic!("driver blew up"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Automation(_)));
    }

    #[tokio::test]
    async fn test_calls_in_one_flow_run_in_order() {
        let bridge = Bridge::new(4);
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));

        for step in 0..5_u8 {
            let log = log.clone();
            bridge
                .run(move || {
                    log.lock().unwrap().push(step);
                    Ok(())
                })
                .await
                .unwrap();
        }

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_zero_workers_still_runs() {
        let bridge = Bridge::new(0);
        assert!(bridge.run(|| Ok(())).await.is_ok());
    }
}
