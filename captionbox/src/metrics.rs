//! Metrics declaration and recording.
//!
//! Counters are process-local and only emitted when the `metrics` feature is
//! enabled; without it every recorder below compiles to nothing. Rendering is
//! left to whichever `metrics` recorder the host installs (the HTTP crate
//! uses the Prometheus exporter).

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of handled HTTP requests.
    pub static ref HTTP_REQUESTS_TOTAL: &'static str = {
        metrics::describe_counter!(
            "http_requests_total",
            "Total HTTP requests."
        );
        "http_requests_total"
    };
    /// Track number of HTTP requests answered with a 4xx or 5xx status.
    pub static ref HTTP_REQUEST_ERRORS_TOTAL: &'static str = {
        metrics::describe_counter!(
            "http_request_errors_total",
            "Total HTTP request errors (4xx/5xx)."
        );
        "http_request_errors_total"
    };
    /// Track number of cache hit events.
    pub static ref CACHE_HITS_TOTAL: &'static str = {
        metrics::describe_counter!(
            "cache_hits_total",
            "Total cache hits."
        );
        "cache_hits_total"
    };
    /// Track number of cache miss events.
    pub static ref CACHE_MISSES_TOTAL: &'static str = {
        metrics::describe_counter!(
            "cache_misses_total",
            "Total cache misses."
        );
        "cache_misses_total"
    };
}

/// Records one handled HTTP request.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_request() {
    metrics::counter!(*HTTP_REQUESTS_TOTAL).increment(1);
}

/// Records one HTTP request that ended with an error status.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_error() {
    metrics::counter!(*HTTP_REQUEST_ERRORS_TOTAL).increment(1);
}

/// Records a cache hit.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_cache_hit() {
    metrics::counter!(*CACHE_HITS_TOTAL).increment(1);
}

/// Records a cache miss.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_cache_miss() {
    metrics::counter!(*CACHE_MISSES_TOTAL).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_request() {}

#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_error() {}

#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_cache_hit() {}

#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_cache_miss() {}
