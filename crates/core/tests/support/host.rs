//! Mock host capabilities: storage, location and navigation.

use std::collections::HashMap;

use authkit_core::{BrowserLocation, FormPost, Navigator, SessionStorage};
use authkit_domain::Result;
use parking_lot::Mutex;

/// In-memory `SessionStorage`.
#[derive(Debug, Default)]
pub struct MockStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MockStorage {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl SessionStorage for MockStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.lock().remove(key);
    }
}

/// Location backed by a mutable href string; records `push_state` calls.
#[derive(Debug)]
pub struct MockLocation {
    href: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MockLocation {
    pub fn new(href: &str) -> Self {
        Self { href: Mutex::new(href.to_string()), history: Mutex::new(Vec::new()) }
    }

    /// Simulate the browser landing on `href`.
    pub fn set_href(&self, href: &str) {
        *self.href.lock() = href.to_string();
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

impl BrowserLocation for MockLocation {
    fn href(&self) -> String {
        self.href.lock().clone()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let href = self.href();
        let without_fragment = href.split('#').next().unwrap_or_default();
        let (_, query) = without_fragment.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then(|| {
                urlencoding::decode(&value.replace('+', " ")).unwrap().into_owned()
            })
        })
    }

    fn push_state(&self, uri: &str) {
        self.history.lock().push(uri.to_string());
        *self.href.lock() = uri.to_string();
    }
}

/// Navigator that records instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    navigations: Mutex<Vec<String>>,
    forms: Mutex<Vec<FormPost>>,
}

impl RecordingNavigator {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    pub fn forms(&self) -> Vec<FormPost> {
        self.forms.lock().clone()
    }

    pub fn is_idle(&self) -> bool {
        self.navigations.lock().is_empty() && self.forms.lock().is_empty()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, uri: &str) {
        self.navigations.lock().push(uri.to_string());
    }

    fn submit_form(&self, form: &FormPost) {
        self.forms.lock().push(form.clone());
    }
}
