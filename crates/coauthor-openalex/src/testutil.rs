//! In-memory OpenAlex stand-in for unit tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use coauthor_core::{Fetcher, Response, StreamError, Transport};
use serde_json::{Value, json};

/// (url, filter, page)
pub type PageKey = (String, String, u32);

/// Serves canned pages keyed by url, filter and page number.
///
/// Unknown pages answer with an empty `results` array; pages marked as
/// failing always answer 503.
#[derive(Default)]
pub struct FakeApi {
    pages: HashMap<PageKey, Value>,
    failing: HashSet<PageKey>,
    calls: RefCell<Vec<PageKey>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, filter: &str, page: u32, results: Value) -> Self {
        self.pages.insert(key(url, filter, page), json!({ "results": results }));
        self
    }

    pub fn fail(mut self, url: &str, filter: &str, page: u32) -> Self {
        self.failing.insert(key(url, filter, page));
        self
    }

    pub fn calls(&self) -> Vec<PageKey> {
        self.calls.borrow().clone()
    }

    /// Fetcher over this API that never actually sleeps.
    pub fn into_fetcher(self) -> Fetcher<Self> {
        Fetcher::new(self, 3).with_sleeper(|_| {})
    }
}

fn key(url: &str, filter: &str, page: u32) -> PageKey {
    (url.to_string(), filter.to_string(), page)
}

impl Transport for FakeApi {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, StreamError> {
        let param = |name: &str| {
            query
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        let page = param("page").parse().unwrap_or(1);
        let k = key(url, &param("filter"), page);
        self.calls.borrow_mut().push(k.clone());

        if self.failing.contains(&k) {
            return Err(StreamError::Http {
                status: Some(503),
                message: "Service Unavailable".into(),
            });
        }
        let body = self
            .pages
            .get(&k)
            .cloned()
            .unwrap_or_else(|| json!({ "results": [] }));
        Ok(Response {
            content_type: Some("application/json".into()),
            body: serde_json::to_vec(&body).unwrap(),
        })
    }
}
