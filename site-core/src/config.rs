use crate::error::SiteError;
use serde::{Deserialize, Serialize};

/// Markup hooks and deployment constants for the site.
///
/// Every field has a default, so an override document only needs to name
/// the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub placeholder: String,
    pub deploy_prefix: String,
    pub local_hosts: Vec<String>,
    pub rewrite_attributes: Vec<String>,
    pub include_attribute: String,
    pub teams_attribute: String,
    pub slideshow_attribute: String,
    pub images_attribute: String,
    pub year_element_id: String,
    pub slide_interval_ms: u32,
    pub photo_label_prefix: String,
    pub close_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            placeholder: "BASE_PATH".into(),
            deploy_prefix: "/kvtogo".into(),
            local_hosts: vec!["localhost".into(), "127.0.0.1".into()],
            rewrite_attributes: vec![
                "href".into(),
                "src".into(),
                "data-images".into(),
                "data-src".into(),
                "data-include".into(),
            ],
            include_attribute: "data-include".into(),
            teams_attribute: "data-teams".into(),
            slideshow_attribute: "data-hero-slideshow".into(),
            images_attribute: "data-images".into(),
            year_element_id: "year".into(),
            slide_interval_ms: 10_000,
            photo_label_prefix: "Teamfoto".into(),
            close_label: "Sluit foto".into(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> Result<Self, SiteError> {
        let config: SiteConfig =
            serde_json::from_str(text).map_err(|e| SiteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SiteError> {
        if self.placeholder.is_empty() {
            return Err(SiteError::Config("placeholder must not be empty".into()));
        }
        if self.slide_interval_ms == 0 {
            return Err(SiteError::Config("slide interval must be positive".into()));
        }

        let named = [
            ("include attribute", &self.include_attribute),
            ("teams attribute", &self.teams_attribute),
            ("slideshow attribute", &self.slideshow_attribute),
            ("images attribute", &self.images_attribute),
        ];
        for (what, value) in named {
            if value.trim().is_empty() {
                return Err(SiteError::Config(format!("{what} must not be empty")));
            }
        }
        if self.rewrite_attributes.iter().any(|a| a.trim().is_empty()) {
            return Err(SiteError::Config(
                "rewrite attributes must not contain an empty name".into(),
            ));
        }
        Ok(())
    }

    pub fn is_local_host(&self, host: &str) -> bool {
        self.local_hosts.iter().any(|h| h == host)
    }
}
