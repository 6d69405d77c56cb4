//! Usage: Notification delivery pipeline (ordered interceptors + mandatory failure isolation).

mod descriptor;

pub use descriptor::{
    NotificationDescriptor, DEFAULT_LIGHTS, DEFAULT_SOUND, DEFAULT_VIBRATE, FLAG_INSISTENT,
    FLAG_ONGOING_EVENT, FLAG_ONLY_ALERT_ONCE, FLAG_SHOW_LIGHTS,
};

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub trait DeliveryInterceptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn before_deliver(
        &self,
        caller_package: &str,
        descriptor: &mut NotificationDescriptor,
    ) -> Result<(), String>;
}

#[derive(Default)]
pub struct DeliveryPipeline {
    interceptors: Vec<Arc<dyn DeliveryInterceptor>>,
}

impl DeliveryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, interceptor: Arc<dyn DeliveryInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Runs every registered interceptor over the descriptor, in registration
    /// order. An interceptor that errors or panics is logged and skipped; it
    /// must never block delivery of the underlying notification.
    pub fn run(&self, caller_package: &str, descriptor: &mut NotificationDescriptor) {
        for interceptor in &self.interceptors {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                interceptor.before_deliver(caller_package, descriptor)
            }));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        interceptor = interceptor.name(),
                        package = caller_package,
                        "interceptor error suppressed: {err}"
                    );
                }
                Err(_) => {
                    tracing::error!(
                        interceptor = interceptor.name(),
                        package = caller_package,
                        "interceptor panic suppressed"
                    );
                }
            }
        }
    }

    /// Runs the pipeline and then always hands the (possibly mutated)
    /// descriptor to `deliver`, exactly once.
    pub fn deliver<R>(
        &self,
        caller_package: &str,
        descriptor: &mut NotificationDescriptor,
        deliver: impl FnOnce(&NotificationDescriptor) -> R,
    ) -> R {
        self.run(caller_package, descriptor);
        deliver(descriptor)
    }
}
