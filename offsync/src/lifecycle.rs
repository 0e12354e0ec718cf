//! Engine lifecycle and controlled clients.
//!
//! A deployment moves `Idle → Installing → Waiting → Activating → Active`;
//! a failed install parks it in `Failed` and activation is never attempted.
//! The client registry tracks open pages so activation can claim them and
//! notification clicks can focus or open the application window.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Installing,
    Waiting,
    Activating,
    Active,
    Failed,
}

impl LifecycleState {
    pub fn is_active(&self) -> bool {
        *self == LifecycleState::Active
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Installing => "installing",
            LifecycleState::Waiting => "waiting",
            LifecycleState::Activating => "activating",
            LifecycleState::Active => "active",
            LifecycleState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// An open application page.
#[derive(Debug, Clone)]
pub struct ClientPage {
    pub id: String,
    pub url: Url,
    /// Whether this engine version controls the page.
    pub controlled: bool,
    pub focused: bool,
}

/// Registry of open pages known to the engine.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<String, ClientPage>>,
    counter: AtomicU64,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> String {
        format!("client-{}", self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Register an open page that is not yet controlled.
    pub fn add(&self, url: Url) -> ClientPage {
        let page = ClientPage {
            id: self.next_id(),
            url,
            controlled: false,
            focused: false,
        };
        self.clients
            .lock()
            .unwrap()
            .insert(page.id.clone(), page.clone());
        page
    }

    /// Take control of every registered page. Returns how many were claimed.
    pub fn claim(&self) -> usize {
        let mut clients = self.clients.lock().unwrap();
        for page in clients.values_mut() {
            page.controlled = true;
        }
        clients.len()
    }

    /// Focus the first page already showing `url`, or open a new one.
    pub fn focus_or_open(&self, url: &Url) -> ClientPage {
        let mut clients = self.clients.lock().unwrap();
        if let Some(page) = clients.values_mut().find(|page| &page.url == url) {
            page.focused = true;
            return page.clone();
        }

        let page = ClientPage {
            id: self.next_id(),
            url: url.clone(),
            controlled: true,
            focused: true,
        };
        clients.insert(page.id.clone(), page.clone());
        page
    }

    pub fn controlled_count(&self) -> usize {
        self.clients
            .lock()
            .unwrap()
            .values()
            .filter(|page| page.controlled)
            .count()
    }

    pub fn len(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("http://localhost:5000/mobile/improved").unwrap()
    }

    #[test]
    fn test_claim_controls_all_pages() {
        let registry = ClientRegistry::new();
        registry.add(page_url());
        registry.add(page_url());

        assert_eq!(registry.controlled_count(), 0);
        assert_eq!(registry.claim(), 2);
        assert_eq!(registry.controlled_count(), 2);
    }

    #[test]
    fn test_focus_or_open_prefers_existing_page() {
        let registry = ClientRegistry::new();
        let existing = registry.add(page_url());

        let focused = registry.focus_or_open(&page_url());
        assert_eq!(focused.id, existing.id);
        assert!(focused.focused);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_focus_or_open_opens_when_absent() {
        let registry = ClientRegistry::new();
        let opened = registry.focus_or_open(&page_url());
        assert!(opened.focused);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::Waiting.to_string(), "waiting");
        assert!(LifecycleState::Active.is_active());
        assert!(!LifecycleState::Failed.is_active());
    }
}
