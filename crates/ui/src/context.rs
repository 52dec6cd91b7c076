use std::sync::Arc;

use intake_core::model::Schema;
use services::{AutoSaver, ExportService, IntakeService};

use crate::platform::{DesktopLinkOpener, LinkOpenerRef};

pub trait UiApp: Send + Sync {
    fn intake(&self) -> Arc<IntakeService>;
    fn autosaver(&self) -> AutoSaver;
    fn exporter(&self) -> Arc<ExportService>;

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(DesktopLinkOpener)
    }
}

#[derive(Clone)]
pub struct AppContext {
    schema: Arc<Schema>,
    intake: Arc<IntakeService>,
    autosaver: AutoSaver,
    exporter: Arc<ExportService>,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let intake = app.intake();
        Self {
            schema: intake.schema(),
            intake,
            autosaver: app.autosaver(),
            exporter: app.exporter(),
            link_opener: app.link_opener(),
        }
    }

    #[must_use]
    pub fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    #[must_use]
    pub fn intake(&self) -> Arc<IntakeService> {
        Arc::clone(&self.intake)
    }

    #[must_use]
    pub fn autosaver(&self) -> AutoSaver {
        self.autosaver.clone()
    }

    #[must_use]
    pub fn exporter(&self) -> Arc<ExportService> {
        Arc::clone(&self.exporter)
    }

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
