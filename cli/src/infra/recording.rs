//! In-memory `ServiceController` that records calls instead of touching the
//! host. Used to verify operation ordering and fail-fast behaviour.

use std::cell::RefCell;

use crate::application::ports::ServiceController;
use crate::domain::error::DeployError;

/// One recorded service-manager call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Reload,
    Enable(String),
    Restart(String),
}

impl ServiceCall {
    fn operation(&self) -> &'static str {
        match self {
            Self::Reload => "daemon-reload",
            Self::Enable(_) => "enable",
            Self::Restart(_) => "restart",
        }
    }
}

/// Records every call in order; optionally fails one operation.
#[derive(Debug, Default)]
pub struct RecordingServiceController {
    calls: RefCell<Vec<ServiceCall>>,
    fail_on: Option<&'static str>,
}

impl RecordingServiceController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller whose `operation` (`daemon-reload`, `enable` or
    /// `restart`) fails after being recorded.
    #[must_use]
    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(operation),
        }
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: ServiceCall) -> Result<(), DeployError> {
        let operation = call.operation();
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(operation) {
            return Err(DeployError::ServiceControl {
                operation: operation.to_string(),
                exit_code: Some(1),
                cause: format!("simulated {operation} failure"),
            });
        }
        Ok(())
    }
}

impl ServiceController for RecordingServiceController {
    async fn reload_manager_config(&self) -> Result<(), DeployError> {
        self.record(ServiceCall::Reload)
    }

    async fn enable(&self, service_name: &str) -> Result<(), DeployError> {
        self.record(ServiceCall::Enable(service_name.to_string()))
    }

    async fn restart(&self, service_name: &str) -> Result<(), DeployError> {
        self.record(ServiceCall::Restart(service_name.to_string()))
    }
}
