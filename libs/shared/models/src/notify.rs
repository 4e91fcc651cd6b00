use tracing::{error, info};

/// User-facing notification channel. The web client renders these as
/// toasts; the server side only guarantees the triggering conditions:
/// an error notice on every failed operation, a success notice on every
/// successful mutation.
pub trait Notify: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default notifier: forwards notices to the tracing pipeline.
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn success(&self, message: &str) {
        info!(notice = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(notice = "error", "{}", message);
    }
}
