use crate::context::SiteContext;
use crate::dom::Dom;

/// Writes `year` into the element with the configured id, if the page has one.
pub fn stamp_year<D: Dom>(dom: &D, ctx: &SiteContext, year: i32) -> bool {
    let Some(node) = dom.element_by_id(&ctx.config.year_element_id) else {
        return false;
    };
    dom.set_text(&node, &year.to_string());
    true
}
