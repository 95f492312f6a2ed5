//! Bounded cache of rendered descriptions.

use std::collections::{HashMap, VecDeque};

use crate::render::render_markdown;

/// Default number of rendered descriptions kept.
pub const DEFAULT_CAPACITY: usize = 20;

/// First-in first-out cache keyed by markdown source.
///
/// The editor re-renders descriptions on every preview refresh; most of
/// them have not changed since the last pass.
#[derive(Debug, Clone)]
pub struct MarkdownCache {
    capacity: usize,
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

impl MarkdownCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Render `source`, reusing a cached result when present.
    pub fn render(&mut self, source: &str) -> String {
        if let Some(html) = self.entries.get(source) {
            return html.clone();
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        let html = render_markdown(source);
        self.entries.insert(source.to_string(), html.clone());
        self.order.push_back(source.to_string());
        html
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for MarkdownCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
