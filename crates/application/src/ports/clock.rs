/// Monotonic millisecond clock driving activity timeouts, cache expiry and
/// save intervals.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}
