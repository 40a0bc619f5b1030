use std::time::Instant;

/// Runs `f` and logs how long it took at debug level.
pub fn time_this<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    log::debug!("Duration <<{label}>>: {:?}", start.elapsed());
    out
}
