use std::sync::Arc;

use anyhow::Context;

use intake_ai::{GeminiClient, TextGenerator};
use intake_infra::{GoogleSheetsStore, InMemoryProductStore, ProductStore};
use intake_observability::{BugsnagReporter, ErrorReporter, TracingReporter};

use crate::config::AppConfig;

/// External collaborators shared by every request.
///
/// Handlers hold no other state; everything request-scoped lives on the stack.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn ProductStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn ProductStore>,
        generator: Arc<dyn TextGenerator>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            store,
            generator,
            reporter,
        }
    }

    /// Wire production collaborators from configuration.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let reporter: Arc<dyn ErrorReporter> = match &config.bugsnag {
            Some(cfg) => Arc::new(BugsnagReporter::new(cfg.clone())),
            None => Arc::new(TracingReporter),
        };

        let store: Arc<dyn ProductStore> = match &config.sheets {
            Some(cfg) => Arc::new(
                GoogleSheetsStore::new(cfg.clone()).context("failed to build sheets client")?,
            ),
            None => Arc::new(InMemoryProductStore::new()),
        };

        let generator = GeminiClient::new(config.gemini.clone(), Arc::clone(&reporter))
            .context("failed to build gemini client")?;

        Ok(Self::new(store, Arc::new(generator), reporter))
    }
}
