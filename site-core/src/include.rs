use crate::context::SiteContext;
use crate::dom::Dom;
use crate::error::SiteError;
use crate::fetch::Fetch;
use futures::future::join_all;

/// Replaces every include marker with its fetched fragment.
///
/// All fetches are in flight together and every one is allowed to settle, so
/// a broken fragment does not keep the others off the page. Afterwards the
/// first failure, in document order, is returned so nothing after this step
/// runs. Returns the number of markers spliced.
pub async fn load_includes<D: Dom, F: Fetch>(
    dom: &D,
    fetch: &F,
    ctx: &SiteContext,
) -> Result<usize, SiteError> {
    let attr = ctx.config.include_attribute.as_str();
    let targets = dom.elements_with_attribute(attr);

    let requests = targets.into_iter().map(move |marker| async move {
        let Some(path) = dom.attribute(&marker, attr).filter(|p| !p.is_empty()) else {
            return Ok::<bool, SiteError>(false);
        };

        let response = fetch.get(&path).await?;
        if !response.is_success() {
            log::warn!("include {path} answered {}, splicing body anyway", response.status);
        }
        let markup = ctx.base.substitute(&response.body, &ctx.config.placeholder);
        dom.replace_with_markup(&marker, &markup)?;
        Ok(true)
    });

    let mut spliced = 0;
    let mut first_error = None;
    for result in join_all(requests).await {
        match result {
            Ok(true) => spliced += 1,
            Ok(false) => {}
            Err(e) => {
                log::error!("include failed: {e}");
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    log::debug!("spliced {spliced} include(s)");
    Ok(spliced)
}
