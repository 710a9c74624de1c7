/// Classification for retry policy.
///
/// The pipeline never retries on its own. This tells the caller whether a
/// later attempt can reasonably succeed.
///
/// | Class | Worth retrying later? |
/// |-------|-----------------------|
/// | `Never` | No |
/// | `CallerMayRetry` | Yes, at the caller's discretion |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - unsupported symbol, bad configuration, or an upstream
    /// answer that will not change by asking again right away.
    Never,

    /// The upstream could not be reached or answered badly.
    ///
    /// Covers timeouts, transport failures, non-2xx statuses and unparsable
    /// bodies. Nothing was cached, so the next call goes back to the network.
    CallerMayRetry,
}
