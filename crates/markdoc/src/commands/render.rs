//! `markdoc render` command implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use markdoc_diagrams::{DEFAULT_SERVICE_URL, RendererRegistry};
use markdoc_renderer::{DocumentRenderer, escape_html};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    input: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Diagram rendering service URL.
    #[arg(long, env = "MARKDOC_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    service_url: String,

    /// HTTP timeout for diagram rendering, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Emit a complete HTML page instead of a fragment.
    #[arg(long)]
    standalone: bool,

    /// Enable verbose output (diagram counts and render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// Diagram failures are reported as warnings and do not fail the
    /// command; the document carries error figures in their place.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the output cannot be
    /// written, or the arguments are invalid.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        if self.timeout == 0 {
            return Err(CliError::Validation(
                "timeout must be greater than zero".to_owned(),
            ));
        }

        let markdown = fs::read_to_string(&self.input)?;
        tracing::info!(input = %self.input.display(), "rendering document");

        let registry = RendererRegistry::with_defaults_and_timeout(
            &self.service_url,
            Duration::from_secs(self.timeout),
        );
        let document = DocumentRenderer::new(&registry).render(&markdown);

        if self.verbose {
            output.info(&format!(
                "Rendered {} diagrams ({} failed)",
                document.diagram_count,
                document.errors.len()
            ));
        }
        for failure in &document.errors {
            output.warning(&format!(
                "Diagram {} ({}): {}",
                failure.index + 1,
                failure.language,
                failure.message
            ));
        }

        let html = if self.standalone {
            standalone_page(&page_title(&self.input), &document.html)
        } else {
            document.html
        };

        match &self.output {
            Some(path) => {
                fs::write(path, html)?;
                output.success(&format!(
                    "Wrote {} ({} diagrams)",
                    path.display(),
                    document.diagram_count
                ));
            }
            None => output.result(&html),
        }

        Ok(())
    }
}

/// Page title derived from the input file name.
fn page_title(input: &Path) -> String {
    input
        .file_stem()
        .map_or_else(|| "Document".to_owned(), |stem| stem.to_string_lossy().into_owned())
}

/// Wrap an HTML fragment in a minimal complete page.
fn standalone_page(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
figure.diagram {{ margin: 1em 0; text-align: center; }}
figure.diagram-error pre {{ color: #b00020; text-align: left; }}
pre code {{ display: block; overflow-x: auto; }}
</style>
</head>
<body>
{body}</body>
</html>
"#
    )
}
