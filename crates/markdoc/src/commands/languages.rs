//! `markdoc languages` command implementation.

use clap::Args;
use markdoc_diagrams::{DEFAULT_SERVICE_URL, RendererRegistry};

use crate::output::Output;

/// Arguments for the languages command.
#[derive(Args)]
pub(crate) struct LanguagesArgs {
    /// Diagram rendering service URL.
    #[arg(long, env = "MARKDOC_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    service_url: String,
}

impl LanguagesArgs {
    /// Print the registered diagram languages, one per line.
    pub(crate) fn execute(self, output: &Output) {
        let registry = RendererRegistry::with_defaults(&self.service_url);
        let mut languages = registry.languages();
        languages.sort();
        for language in languages {
            output.result(&language);
        }
    }
}
