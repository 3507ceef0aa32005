#![allow(dead_code)]

use site_core::fetch::{Clock, Fetch, FetchResponse};
use site_core::SiteError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::{ready, Future};

/// Serves canned responses keyed by path; the query string is ignored.
#[derive(Default)]
pub struct MapFetch {
    routes: HashMap<String, Result<FetchResponse, String>>,
    pub requests: RefCell<Vec<String>>,
}

impl MapFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, path: &str, body: &str) -> Self {
        self.routes
            .insert(path.to_string(), Ok(FetchResponse::ok(body)));
        self
    }

    pub fn status(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            Ok(FetchResponse {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn fail(mut self, path: &str, reason: &str) -> Self {
        self.routes.insert(path.to_string(), Err(reason.to_string()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetch for MapFetch {
    fn get(&self, url: &str) -> impl Future<Output = Result<FetchResponse, SiteError>> {
        self.requests.borrow_mut().push(url.to_string());
        let path = url.split('?').next().unwrap_or(url);
        let result = match self.routes.get(path) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(SiteError::Network {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(SiteError::Network {
                url: url.to_string(),
                reason: "no route".into(),
            }),
        };
        ready(result)
    }
}

pub struct FixedClock {
    pub millis: f64,
    pub year: i32,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self {
            millis: 1_760_000_000_000.0,
            year: 2026,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> f64 {
        self.millis
    }

    fn current_year(&self) -> i32 {
        self.year
    }
}

pub const TEAMS_JSON: &str = r#"[
  {
    "title": "Heren 1",
    "photo": "img/teams/heren1.jpg",
    "columns": [
      { "label": "Spelers", "names": ["Ruben", "Ahmed", "Joost"] },
      { "label": "Staf", "names": ["Coach Eva"] }
    ],
    "note": "Training op donderdag"
  },
  {
    "title": "Dames 1",
    "photoLabel": "Dames 1 na de kampioenswedstrijd",
    "columns": [
      { "label": "Speelsters", "names": ["Iris", "Noor"] }
    ]
  },
  {
    "title": "Jeugd",
    "photo": "img/teams/jeugd.jpg",
    "columns": []
  }
]"#;
