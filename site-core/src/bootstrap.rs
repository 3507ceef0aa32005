use crate::context::SiteContext;
use crate::dom::Dom;
use crate::error::SiteError;
use crate::fetch::{Clock, Fetch};
use crate::{include, paths, slideshow, team, year};

/// Runs every page enhancement in order.
///
/// Includes must all land before anything else starts; an include failure
/// is returned and the later steps are skipped. Team rendering and the
/// slideshow run side by side and report their own failures.
pub async fn run<D: Dom, F: Fetch, C: Clock>(
    dom: &D,
    fetch: &F,
    clock: &C,
    ctx: &SiteContext,
) -> Result<(), SiteError> {
    paths::rewrite_placeholders(dom, ctx)?;
    include::load_includes(dom, fetch, ctx).await?;
    year::stamp_year(dom, ctx, clock.current_year());

    futures::join!(team::render_teams(dom, fetch, clock, ctx), async {
        if let Err(e) = slideshow::init_slideshow(dom, ctx) {
            log::error!("slideshow setup failed: {e}");
        }
    });
    Ok(())
}
