use metrics::{counter, histogram};
use std::time::Instant;

/// Increment a counter for successful registrations.
pub fn increment_user_registered() {
    counter!("users_registered_total").increment(1);
}

/// Increment a counter for favorites added.
pub fn increment_favorite_added() {
    counter!("favorites_added_total").increment(1);
}

/// Track HTTP request latency using a histogram, labelled by route.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let elapsed = start.elapsed();
    histogram!(
        "http_request_duration_seconds",
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(elapsed);
}
