use site_core::fetch::{Clock, Fetch, FetchResponse};
use site_core::SiteError;
use std::future::Future;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

#[derive(Clone)]
pub struct WebFetch {
    window: Window,
}

impl WebFetch {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Fetch for WebFetch {
    fn get(&self, url: &str) -> impl Future<Output = Result<FetchResponse, SiteError>> {
        let window = self.window.clone();
        let url = url.to_string();
        async move { fetch_text(&window, &url).await }
    }
}

async fn fetch_text(window: &Window, url: &str) -> Result<FetchResponse, SiteError> {
    let network = |e: JsValue| SiteError::Network {
        url: url.to_string(),
        reason: format!("{e:?}"),
    };

    let value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(network)?;
    let response: Response = value.dyn_into().map_err(network)?;
    let status = response.status();
    let body = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;

    Ok(FetchResponse {
        status,
        body: body.as_string().unwrap_or_default(),
    })
}

pub struct JsClock;

impl Clock for JsClock {
    fn now_millis(&self) -> f64 {
        js_sys::Date::now()
    }

    fn current_year(&self) -> i32 {
        js_sys::Date::new_0().get_full_year() as i32
    }
}
