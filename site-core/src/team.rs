use crate::context::SiteContext;
use crate::dom::Dom;
use crate::error::SiteError;
use crate::fetch::{cache_busted, Clock, Fetch};
use crate::modal::PhotoModal;
use crate::view::{self, Action, El, Trigger};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub title: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub photo_label: Option<String>,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    pub names: Vec<String>,
}

impl Team {
    pub fn from_record(record: serde_json::Value) -> Result<Self, SiteError> {
        Ok(serde_json::from_value(record)?)
    }

    pub fn photo_path(&self) -> Option<&str> {
        non_empty(&self.photo)
    }

    pub fn note_text(&self) -> Option<&str> {
        non_empty(&self.note)
    }

    /// The explicit photo label, or "<prefix> <title>".
    pub fn label(&self, ctx: &SiteContext) -> String {
        non_empty(&self.photo_label)
            .map(ToString::to_string)
            .unwrap_or_else(|| ctx.photo_label(&self.title))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Splits the feed into raw records. Each record is converted on its own, so
/// a malformed one only stops rendering at that point.
pub fn parse_feed(json: &str) -> Result<Vec<serde_json::Value>, SiteError> {
    Ok(serde_json::from_str(json)?)
}

pub fn team_view(team: &Team, ctx: &SiteContext) -> El {
    let label = team.label(ctx);

    let photo = match team.photo_path() {
        Some(path) => {
            let src = ctx.base.join(path);
            let open = Action::OpenPhoto {
                src: src.clone(),
                label: label.clone(),
            };
            El::new("div")
                .class("team-photo")
                .class("team-photo--clickable")
                .style("background-image", format!("url(\"{src}\")"))
                .attr("role", "button")
                .attr("tabindex", "0")
                .attr("aria-haspopup", "dialog")
                .on(Trigger::Click, open.clone())
                .on(Trigger::KeyActivate, open)
        }
        None => El::new("div").class("team-photo").class("placeholder"),
    }
    .attr("aria-label", label);

    let columns = team.columns.iter().map(|column| {
        El::new("div")
            .child(El::new("h3").text(column.label.clone()))
            .child(
                El::new("ul")
                    .class("team-names")
                    .children(column.names.iter().map(|name| El::new("li").text(name.clone()))),
            )
    });

    let mut info = El::new("div")
        .class("team-info")
        .child(El::new("h2").text(team.title.clone()))
        .child(El::new("div").class("team-columns").children(columns));
    if let Some(note) = team.note_text() {
        info = info.child(El::new("p").class("team-note").text(note));
    }

    El::new("article")
        .class("team-section")
        .child(photo)
        .child(info)
}

/// Fills the team container from its JSON feed. Failures are logged and
/// leave the container as it was at the point of failure.
pub async fn render_teams<D: Dom, F: Fetch, C: Clock>(
    dom: &D,
    fetch: &F,
    clock: &C,
    ctx: &SiteContext,
) {
    match try_render_teams(dom, fetch, clock, ctx).await {
        Ok(Some(count)) => log::debug!("rendered {count} team(s)"),
        Ok(None) => {}
        Err(e) => log::error!("team rendering failed: {e}"),
    }
}

/// `Ok(None)` when the page has no team container or data path.
pub async fn try_render_teams<D: Dom, F: Fetch, C: Clock>(
    dom: &D,
    fetch: &F,
    clock: &C,
    ctx: &SiteContext,
) -> Result<Option<usize>, SiteError> {
    let attr = &ctx.config.teams_attribute;
    let Some(container) = dom.first_with_attribute(attr) else {
        return Ok(None);
    };
    let Some(path) = dom.attribute(&container, attr).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let modal = PhotoModal::ensure(dom, &ctx.config)?;

    let url = cache_busted(&path, clock.now_millis());
    let response = fetch.get(&url).await?;
    if !response.is_success() {
        return Err(SiteError::Status {
            url,
            status: response.status,
        });
    }
    let records = parse_feed(&response.body)?;

    dom.clear_children(&container);
    let dispatch = modal.dispatcher();
    let total = records.len();
    for record in records {
        let team = Team::from_record(record)?;
        let section = view::mount(dom, &team_view(&team, ctx), &dispatch)?;
        dom.append_child(&container, &section)?;
    }
    Ok(Some(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn ctx() -> SiteContext {
        SiteContext::new(SiteConfig::default(), "www.example.org")
    }

    #[test]
    fn parses_camel_case_and_ignores_unknown_fields() {
        let teams: Vec<Team> = parse_feed(
            r#"[{
                "title": "Heren 1",
                "photo": "img/h1.jpg",
                "photoLabel": "Heren 1 op het veld",
                "columns": [{ "label": "Spelers", "names": ["Ann", "Bo"] }],
                "note": "Traint op dinsdag",
                "sponsor": "ignored"
            }]"#,
        )
        .expect("parse")
        .into_iter()
        .map(|r| Team::from_record(r).expect("team"))
        .collect();

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].photo_label.as_deref(), Some("Heren 1 op het veld"));
        assert_eq!(teams[0].columns[0].names, vec!["Ann", "Bo"]);
    }

    #[test]
    fn optional_fields_default() {
        let team = Team::from_record(serde_json::json!({ "title": "Jeugd", "columns": [] }))
            .expect("team");
        assert_eq!(team.photo, None);
        assert_eq!(team.note, None);
        assert_eq!(team.label(&ctx()), "Teamfoto Jeugd");
    }

    #[test]
    fn title_and_columns_are_required() {
        assert!(Team::from_record(serde_json::json!({ "columns": [] })).is_err());
        assert!(Team::from_record(serde_json::json!({ "title": "x" })).is_err());
        assert!(Team::from_record(serde_json::json!({
            "title": "x",
            "columns": [{ "label": "y", "names": ["n", 7] }]
        }))
        .is_err());
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(matches!(
            parse_feed(r#"{ "title": "x" }"#),
            Err(SiteError::TeamData(_))
        ));
    }

    #[test]
    fn clickable_photo_view() {
        let team = Team {
            title: "Dames 1".into(),
            photo: Some("img/d1.jpg".into()),
            photo_label: None,
            columns: vec![],
            note: None,
        };
        let view = team_view(&team, &ctx());
        let photo = &view.children[0];

        assert!(photo.has_class("team-photo--clickable"));
        assert_eq!(photo.attribute("role"), Some("button"));
        assert_eq!(photo.attribute("tabindex"), Some("0"));
        assert_eq!(photo.attribute("aria-haspopup"), Some("dialog"));
        assert_eq!(photo.attribute("aria-label"), Some("Teamfoto Dames 1"));
        assert_eq!(
            photo.style,
            vec![(
                "background-image".to_string(),
                "url(\"/kvtogo/img/d1.jpg\")".to_string()
            )]
        );
        let expected = Action::OpenPhoto {
            src: "/kvtogo/img/d1.jpg".into(),
            label: "Teamfoto Dames 1".into(),
        };
        assert_eq!(
            photo.bindings,
            vec![(Trigger::Click, expected.clone()), (Trigger::KeyActivate, expected)]
        );
    }

    #[test]
    fn photo_less_team_renders_inert_placeholder() {
        let team = Team {
            title: "Recreanten".into(),
            photo: Some(String::new()),
            photo_label: Some("Nog geen foto".into()),
            columns: vec![],
            note: Some(String::new()),
        };
        let view = team_view(&team, &ctx());
        let photo = &view.children[0];

        assert!(photo.has_class("placeholder"));
        assert!(photo.bindings.is_empty());
        assert!(photo.style.is_empty());
        assert_eq!(photo.attribute("role"), None);
        assert_eq!(photo.attribute("aria-label"), Some("Nog geen foto"));
        // empty note is treated as absent
        assert_eq!(view.children[1].children.len(), 2);
    }

    #[test]
    fn columns_and_note_follow_record() {
        let team = Team {
            title: "Heren 2".into(),
            photo: None,
            photo_label: None,
            columns: vec![
                Column {
                    label: "Spelers".into(),
                    names: vec!["Cas".into(), "Ab".into(), "Bram".into()],
                },
                Column {
                    label: "Coach".into(),
                    names: vec!["Dirk".into()],
                },
            ],
            note: Some("Zoekt versterking".into()),
        };
        let view = team_view(&team, &ctx());
        let info = &view.children[1];

        assert_eq!(info.children[0].text.as_deref(), Some("Heren 2"));
        let columns = &info.children[1].children;
        assert_eq!(columns.len(), 2);
        let names: Vec<_> = columns[0].children[1]
            .children
            .iter()
            .filter_map(|li| li.text.as_deref())
            .collect();
        assert_eq!(names, vec!["Cas", "Ab", "Bram"]);
        assert_eq!(info.children[2].text.as_deref(), Some("Zoekt versterking"));
        assert!(info.children[2].has_class("team-note"));
    }
}
