//! Shared constants for diagram rendering.

use std::time::Duration;

/// Default rendering service URL.
pub const DEFAULT_SERVICE_URL: &str = "https://kroki.io";

/// Default HTTP timeout for rendering requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
