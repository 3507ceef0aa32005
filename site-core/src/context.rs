use crate::config::SiteConfig;
use crate::paths::BasePath;

/// Per-page state shared by every component, built once at start-up.
#[derive(Clone, Debug)]
pub struct SiteContext {
    pub config: SiteConfig,
    pub base: BasePath,
}

impl SiteContext {
    pub fn new(config: SiteConfig, host: &str) -> Self {
        let base = BasePath::resolve(host, &config);
        Self { config, base }
    }

    pub fn photo_label(&self, title: &str) -> String {
        format!("{} {}", self.config.photo_label_prefix, title)
    }
}
