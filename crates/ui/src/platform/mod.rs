use std::sync::Arc;

mod opener;

/// Opens a URL or local path with the desktop's default handler.
pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use opener::DesktopLinkOpener;
