use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("flowfix.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("flowfix.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("flowfix.client.request_duration_seconds");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("flowfix.session.submissions");
pub(crate) static SESSION_REJECTED_EMPTY: Counter =
    Counter::new("flowfix.session.rejected_empty");
pub(crate) static SESSION_REJECTED_BUSY: Counter = Counter::new("flowfix.session.rejected_busy");
pub(crate) static SESSION_REPLIES: Counter = Counter::new("flowfix.session.replies");
pub(crate) static SESSION_FALLBACKS: Counter = Counter::new("flowfix.session.fallbacks");
pub(crate) static SESSION_EXCHANGE_DURATION: Moments =
    Moments::new("flowfix.session.exchange_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_REJECTED_EMPTY);
    collector.register_counter(&SESSION_REJECTED_BUSY);
    collector.register_counter(&SESSION_REPLIES);
    collector.register_counter(&SESSION_FALLBACKS);
    collector.register_moments(&SESSION_EXCHANGE_DURATION);
}
