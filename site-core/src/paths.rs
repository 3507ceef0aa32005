use crate::config::SiteConfig;
use crate::context::SiteContext;
use crate::dom::Dom;
use crate::error::SiteError;

/// URL prefix under which the site is served.
///
/// Empty on local development hosts, the deployment sub-path everywhere else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    pub fn resolve(host: &str, config: &SiteConfig) -> Self {
        if config.is_local_host(host) {
            Self(String::new())
        } else {
            Self(config.deploy_prefix.clone())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replaces every occurrence of `token` in `text` with the base path.
    pub fn substitute(&self, text: &str, token: &str) -> String {
        if token.is_empty() {
            return text.to_string();
        }
        text.replace(token, &self.0)
    }

    pub fn join(&self, relative: &str) -> String {
        format!("{}/{}", self.0, relative.trim_start_matches('/'))
    }
}

/// Rewrites placeholder tokens inside the configured attributes of every
/// element in the document. Returns how many attribute values changed.
pub fn rewrite_placeholders<D: Dom>(dom: &D, ctx: &SiteContext) -> Result<usize, SiteError> {
    let token = &ctx.config.placeholder;
    let mut rewritten = 0;

    for attr in &ctx.config.rewrite_attributes {
        for node in dom.elements_with_attribute(attr) {
            let Some(value) = dom.attribute(&node, attr) else {
                continue;
            };
            if !value.contains(token.as_str()) {
                continue;
            }
            dom.set_attribute(&node, attr, &ctx.base.substitute(&value, token))?;
            rewritten += 1;
        }
    }

    log::debug!(
        "rewrote {rewritten} placeholder attribute(s) with base '{}'",
        ctx.base.as_str()
    );
    Ok(rewritten)
}
