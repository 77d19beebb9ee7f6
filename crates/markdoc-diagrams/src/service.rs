//! HTTP client for the diagram rendering service.
//!
//! All built-in backends delegate layout to a Kroki-compatible service: the
//! diagram source is POSTed to `{base_url}/{endpoint}/svg` and the response
//! body is the rendered SVG. The underlying agent is built lazily so that
//! constructing a registry never touches the network and configuration
//! problems surface as initialization failures on first render.

use std::sync::OnceLock;
use std::time::Duration;

use ureq::Agent;

use crate::consts::DEFAULT_TIMEOUT;
use crate::error::RenderError;

/// Shared HTTP client for service-backed renderers.
///
/// Cheap to construct; the connection-pooling agent is created on first use
/// and reused for every subsequent request.
#[derive(Debug)]
pub struct ServiceClient {
    base_url: String,
    timeout: Duration,
    agent: OnceLock<Agent>,
}

impl ServiceClient {
    /// Create a client for the given service base URL. Surrounding
    /// whitespace is trimmed once here so requests and validation see the
    /// same string.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().to_owned(),
            timeout: DEFAULT_TIMEOUT,
            agent: OnceLock::new(),
        }
    }

    /// Set the HTTP timeout for rendering requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the agent if this is the first call; validate configuration
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Initialization`] for an unusable service URL.
    pub fn ensure_ready(&self) -> Result<(), RenderError> {
        self.engine().map(|_| ())
    }

    fn engine(&self) -> Result<&Agent, RenderError> {
        if self.agent.get().is_none()
            && !self.base_url.starts_with("http://")
            && !self.base_url.starts_with("https://")
        {
            return Err(RenderError::Initialization(format!(
                "invalid rendering service URL: {:?}",
                self.base_url
            )));
        }
        Ok(self.agent.get_or_init(|| create_agent(self.timeout)))
    }

    /// Render diagram source via the service, returning the SVG body.
    ///
    /// # Errors
    ///
    /// Initialization failures surface as [`RenderError::Initialization`];
    /// HTTP transport errors and non-2xx responses surface as
    /// [`RenderError::Backend`] with the service's diagnostic body.
    pub fn render_svg(&self, endpoint: &str, code: &str) -> Result<String, RenderError> {
        let agent = self.engine()?;
        let url = format!("{}/{endpoint}/svg", self.base_url.trim_end_matches('/'));

        tracing::debug!(endpoint, bytes = code.len(), "rendering diagram");

        let response = agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(code.as_bytes())
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(RenderError::Backend(format!(
                "HTTP {status}: {}",
                error_body.trim()
            )));
        }

        body.read_to_string()
            .map_err(|e| RenderError::Backend(e.to_string()))
    }
}

/// Create an HTTP agent with the specified timeout.
///
/// Error statuses are handled explicitly so the response body can be read
/// for the engine's diagnostic message.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}
