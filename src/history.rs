//! Navigation history
//!
//! A bounded stack of visited paths with a cursor:
//! - `push` truncates forward entries and appends
//! - `replace` overwrites the current entry
//! - `back` / `forward` move the cursor and report `None` at the ends

use crate::NavigationDirection;

/// Default maximum number of entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Change produced by a history operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryChange {
    pub from: String,
    pub to: String,
    pub direction: NavigationDirection,
}

/// Navigation history stack
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    current: usize,
    /// Maximum number of entries (0 = unlimited)
    limit: usize,
}

impl History {
    /// History holding only `initial_path`
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self::with_limit(initial_path, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial_path: impl Into<String>, limit: usize) -> Self {
        Self {
            entries: vec![initial_path.into()],
            current: 0,
            limit,
        }
    }

    pub fn current_path(&self) -> &str {
        &self.entries[self.current]
    }

    /// Append `path`, dropping any forward entries
    pub fn push(&mut self, path: impl Into<String>) -> HistoryChange {
        let to = path.into();
        let from = self.current_path().to_string();

        self.entries.truncate(self.current + 1);
        self.entries.push(to.clone());
        self.current += 1;

        if self.limit > 0 && self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            self.current -= excess;
        }

        HistoryChange {
            from,
            to,
            direction: NavigationDirection::Forward,
        }
    }

    /// Overwrite the current entry
    pub fn replace(&mut self, path: impl Into<String>) -> HistoryChange {
        let to = path.into();
        let from = std::mem::replace(&mut self.entries[self.current], to.clone());

        HistoryChange {
            from,
            to,
            direction: NavigationDirection::Replace,
        }
    }

    pub fn back(&mut self) -> Option<HistoryChange> {
        if !self.can_go_back() {
            return None;
        }
        let from = self.current_path().to_string();
        self.current -= 1;
        Some(HistoryChange {
            from,
            to: self.current_path().to_string(),
            direction: NavigationDirection::Back,
        })
    }

    pub fn forward(&mut self) -> Option<HistoryChange> {
        if !self.can_go_forward() {
            return None;
        }
        let from = self.current_path().to_string();
        self.current += 1;
        Some(HistoryChange {
            from,
            to: self.current_path().to_string(),
            direction: NavigationDirection::Forward,
        })
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history holds at least its initial entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_back() {
        let mut history = History::default();
        let change = history.push("demo");
        assert_eq!(change.from, "");
        assert_eq!(change.to, "demo");
        assert_eq!(change.direction, NavigationDirection::Forward);

        let change = history.back().unwrap();
        assert_eq!(change.to, "");
        assert_eq!(change.direction, NavigationDirection::Back);
        assert!(history.back().is_none());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = History::default();
        history.push("a");
        history.push("b");
        history.back();
        history.push("c");

        assert_eq!(history.entries(), ["", "a", "c"]);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_replace() {
        let mut history = History::default();
        history.push("login");
        let change = history.replace("dashboard");

        assert_eq!(change.from, "login");
        assert_eq!(change.direction, NavigationDirection::Replace);
        assert_eq!(history.len(), 2);
        assert_eq!(history.back().map(|c| c.to), Some(String::new()));
    }

    #[test]
    fn test_forward() {
        let mut history = History::default();
        history.push("a");
        history.back();

        assert!(history.can_go_forward());
        assert_eq!(history.forward().map(|c| c.to), Some("a".to_string()));
        assert!(history.forward().is_none());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit("", 3);
        for path in ["a", "b", "c", "d"] {
            history.push(path);
        }

        assert_eq!(history.entries(), ["b", "c", "d"]);
        assert_eq!(history.current_path(), "d");
        history.back();
        history.back();
        assert_eq!(history.current_path(), "b");
        assert!(!history.can_go_back());
    }
}
