//! Trait for external citation-profile lookup.
//!
//! Profiles come from a remote citation index that lives outside this
//! workspace. Analytics never depend on it: lookups that fail are reported
//! as unavailable and the batch keeps going.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, info, warn};

/// Metrics of one researcher as reported by a citation index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalProfile {
    pub name: String,
    pub affiliation: Option<String>,
    pub citations: u64,
    pub h_index: u32,
    pub i10_index: Option<u32>,
    pub publications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProfileLookup {
    Found(ExternalProfile),
    NotFound,
    /// The index could not be queried.
    Unavailable(String),
    /// The batch was cancelled before this name was looked up.
    Cancelled,
}

/// Access to a citation index.
///
/// Implementations can use:
/// - a remote scholarly search service
/// - a local export of profiles
/// - mock data (testing)
pub trait CitationProfileProvider: Send + Sync {
    /// Look up a researcher by free-text name.
    fn lookup(&self, name: &str) -> ProfileLookup;

    fn name(&self) -> &str;
}

/// Look up every name in order, checking `cancel` before each lookup. Once
/// it is set, the remaining names are reported as [`ProfileLookup::Cancelled`].
pub fn fetch_profiles(
    provider: &dyn CitationProfileProvider,
    names: &[String],
    cancel: &AtomicBool,
) -> Vec<(String, ProfileLookup)> {
    let mut results = Vec::with_capacity(names.len());
    let mut cancelled_at = None;

    for (i, name) in names.iter().enumerate() {
        if cancelled_at.is_none() && cancel.load(Ordering::Relaxed) {
            cancelled_at = Some(i);
        }
        if cancelled_at.is_some() {
            results.push((name.clone(), ProfileLookup::Cancelled));
            continue;
        }

        let outcome = provider.lookup(name);
        match &outcome {
            ProfileLookup::Found(p) => debug!(provider = provider.name(), %name, citations = p.citations, "Profile found"),
            ProfileLookup::NotFound => debug!(provider = provider.name(), %name, "No profile"),
            ProfileLookup::Unavailable(reason) => {
                warn!(provider = provider.name(), %name, %reason, "Profile lookup unavailable")
            }
            ProfileLookup::Cancelled => {}
        }
        results.push((name.clone(), outcome));
    }

    let found = results
        .iter()
        .filter(|(_, r)| matches!(r, ProfileLookup::Found(_)))
        .count();
    info!(
        provider = provider.name(),
        requested = names.len(),
        found,
        cancelled = cancelled_at.map_or(0, |i| names.len() - i),
        "Profile batch finished"
    );
    results
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Mock provider with in-memory profiles.
#[derive(Debug, Default)]
pub struct MockProfileProvider {
    profiles: HashMap<String, ExternalProfile>,
    unavailable: bool,
}

impl MockProfileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, citations: u64, h_index: u32) -> Self {
        self.profiles.insert(
            name.to_lowercase(),
            ExternalProfile {
                name: name.to_string(),
                affiliation: None,
                citations,
                h_index,
                i10_index: None,
                publications: Vec::new(),
            },
        );
        self
    }

    /// Every lookup reports the index as unreachable.
    pub fn offline(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

impl CitationProfileProvider for MockProfileProvider {
    fn lookup(&self, name: &str) -> ProfileLookup {
        if self.unavailable {
            return ProfileLookup::Unavailable("offline".to_string());
        }
        match self.profiles.get(&name.trim().to_lowercase()) {
            Some(profile) => ProfileLookup::Found(profile.clone()),
            None => ProfileLookup::NotFound,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lookup_outcomes() {
        let provider = MockProfileProvider::new().with("Ana Souza", 120, 7);
        let results = fetch_profiles(&provider, &names(&["ana souza", "Nobody"]), &AtomicBool::new(false));
        assert!(matches!(&results[0].1, ProfileLookup::Found(p) if p.h_index == 7));
        assert_eq!(results[1].1, ProfileLookup::NotFound);
    }

    #[test]
    fn test_offline_provider_is_unavailable() {
        let provider = MockProfileProvider::new().offline();
        let results = fetch_profiles(&provider, &names(&["Ana"]), &AtomicBool::new(false));
        assert!(matches!(results[0].1, ProfileLookup::Unavailable(_)));
    }

    /// Sets the cancel flag after a given number of lookups.
    struct CancellingProvider<'a> {
        calls: AtomicUsize,
        after: usize,
        cancel: &'a AtomicBool,
    }

    impl CitationProfileProvider for CancellingProvider<'_> {
        fn lookup(&self, _name: &str) -> ProfileLookup {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.after {
                self.cancel.store(true, Ordering::SeqCst);
            }
            ProfileLookup::NotFound
        }

        fn name(&self) -> &str {
            "cancelling"
        }
    }

    #[test]
    fn test_cancellation_between_lookups() {
        let cancel = AtomicBool::new(false);
        let provider = CancellingProvider {
            calls: AtomicUsize::new(0),
            after: 2,
            cancel: &cancel,
        };
        let results = fetch_profiles(&provider, &names(&["a", "b", "c", "d"]), &cancel);
        let outcomes: Vec<&ProfileLookup> = results.iter().map(|(_, r)| r).collect();
        assert_eq!(
            outcomes,
            vec![
                &ProfileLookup::NotFound,
                &ProfileLookup::NotFound,
                &ProfileLookup::Cancelled,
                &ProfileLookup::Cancelled,
            ]
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cancelled_before_start() {
        let provider = MockProfileProvider::new().with("Ana", 1, 1);
        let results = fetch_profiles(&provider, &names(&["Ana"]), &AtomicBool::new(true));
        assert_eq!(results[0].1, ProfileLookup::Cancelled);
    }
}
