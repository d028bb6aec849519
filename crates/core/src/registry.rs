//! Page registry.
//!
//! Tracks every remote page object the bridge knows about: roots created
//! explicitly and children observed as side effects of navigation inside
//! an owning page. Raw remote identifiers never leave this crate; callers
//! only ever see `WebPage` handles, so the graph's mutation rules stay in
//! one place.

use std::collections::HashMap;

use parking_lot::Mutex;

/// A child page as most recently reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChildObservation {
    pub id: String,
    /// Declared target/window name; `None` when the window was opened
    /// without an explicit name.
    pub window_name: Option<String>,
}

#[derive(Debug, Clone)]
struct PageMeta {
    parent: Option<String>,
    seq: u64,
    window_name: Option<String>,
}

#[derive(Default)]
struct RegistryInner {
    pages: HashMap<String, PageMeta>,
    next_seq: u64,
}

/// Identifier-to-metadata arena for remote page objects.
///
/// Identity is stable: once an identifier is observed it keeps its
/// creation-order sequence for its whole lifetime, however often the
/// engine re-reports it.
#[derive(Default)]
pub(crate) struct Registry {
    inner: Mutex<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page created explicitly through the engine.
    pub fn register_root(&self, id: &str) {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.pages.insert(
            id.to_string(),
            PageMeta {
                parent: None,
                seq,
                window_name: None,
            },
        );
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().pages.contains_key(id)
    }

    /// Drops a single page. Tracked children of a removed parent stay
    /// registered; closing a parent never implicitly closes them.
    pub fn remove(&self, id: &str) {
        self.inner.lock().pages.remove(id);
    }

    /// Drops everything; used when the owning process closes.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.pages.clear();
    }

    /// Reconciles the tracked children of `parent` with the engine's
    /// latest report and returns their identifiers in creation order.
    ///
    /// New identifiers are appended in report order; previously tracked
    /// identifiers keep their original sequence; identifiers the engine
    /// no longer reports are dropped.
    pub fn sync_children(&self, parent: &str, observed: &[ChildObservation]) -> Vec<String> {
        let mut inner = self.inner.lock();

        let stale: Vec<String> = inner
            .pages
            .iter()
            .filter(|(id, meta)| {
                meta.parent.as_deref() == Some(parent)
                    && !observed.iter().any(|o| o.id == **id)
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in stale {
            inner.pages.remove(&id);
        }

        for child in observed {
            if let Some(meta) = inner.pages.get_mut(&child.id) {
                meta.window_name = child.window_name.clone();
            } else {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                inner.pages.insert(
                    child.id.clone(),
                    PageMeta {
                        parent: Some(parent.to_string()),
                        seq,
                        window_name: child.window_name.clone(),
                    },
                );
            }
        }

        let mut children: Vec<(u64, String)> = observed
            .iter()
            .filter_map(|o| inner.pages.get(&o.id).map(|m| (m.seq, o.id.clone())))
            .collect();
        children.sort();
        children.into_iter().map(|(_, id)| id).collect()
    }

    /// Declared window names of `parent`'s tracked children in creation
    /// order. Children without an explicit name are omitted.
    pub fn child_window_names(&self, parent: &str) -> Vec<String> {
        let inner = self.inner.lock();
        let mut named: Vec<(u64, String)> = inner
            .pages
            .values()
            .filter(|meta| meta.parent.as_deref() == Some(parent))
            .filter_map(|meta| meta.window_name.clone().map(|name| (meta.seq, name)))
            .collect();
        named.sort();
        named.into_iter().map(|(_, name)| name).collect()
    }
}
