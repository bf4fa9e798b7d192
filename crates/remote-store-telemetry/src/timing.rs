//! Entry/exit logging with elapsed time for long-running operations.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{Instrument, info, info_span};

use crate::init::build_sha;

/// Run `future` inside an `operation` span, logging entry and exit with the
/// elapsed time. The span carries the build SHA recorded by
/// [`init_logging`](crate::init_logging). The future's output is returned untouched.
pub async fn timed<F, T>(operation: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let span = info_span!("timed", operation, build_sha = build_sha());
    async move {
        info!("{operation}: entered");
        let started = Instant::now();
        let output = future.await;
        let elapsed = started.elapsed();
        info!(
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "{operation}: exiting - {}",
            format_elapsed(elapsed)
        );
        output
    }
    .instrument(span)
    .await
}

/// Render a duration as whole seconds plus leftover milliseconds.
///
/// `2s`, `2s 500ms`, `0s 5ms`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    if secs != 0 && millis == 0 {
        format!("{secs}s")
    } else {
        format!("{secs}s {millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_elapsed_drops_zero_millis_only_when_seconds_present() {
        assert_eq!(format_elapsed(Duration::from_millis(5)), "0s 5ms");
        assert_eq!(format_elapsed(Duration::ZERO), "0s 0ms");
        assert_eq!(format_elapsed(Duration::from_millis(2_000)), "2s");
        assert_eq!(format_elapsed(Duration::from_millis(2_500)), "2s 500ms");
        assert_eq!(format_elapsed(Duration::from_micros(1_999_999)), "1s 999ms");
    }

    #[tokio::test]
    async fn timed_returns_inner_output() {
        let value = timed("compute", async { 21 * 2 }).await;
        assert_eq!(value, 42);

        let result: Result<(), &str> = timed("fail", async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
    }
}
