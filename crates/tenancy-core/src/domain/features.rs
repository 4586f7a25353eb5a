//! Feature flag sets

use serde::{Deserialize, Serialize};

/// Ordered list of feature identifiers. Adding keeps the list free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(Vec<String>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the feature was already present.
    pub fn add(&mut self, feature: &str) -> bool {
        if self.contains(feature) {
            return false;
        }
        self.0.push(feature.to_string());
        true
    }

    pub fn remove(&mut self, feature: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|f| f != feature);
        before != self.0.len()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.0.iter().any(|f| f == feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        for feature in iter {
            set.add(feature.as_ref());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_ordered() {
        let mut set = FeatureSet::new();
        assert!(set.add("Reports"));
        assert!(set.add("Dashboard"));
        assert!(!set.add("Reports"));
        assert_eq!(set.to_vec(), vec!["Reports", "Dashboard"]);
    }

    #[test]
    fn collecting_deduplicates() {
        let set: FeatureSet = ["A", "B", "A"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("B"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let set: FeatureSet = ["Reports"].into_iter().collect();
        assert!(!set.contains("reports"));
    }
}
