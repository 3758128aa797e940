//! Case storage keyed by id, grouped into named suites.

use std::collections::BTreeMap;

use crate::case::TestCase;
use crate::error::RegressionError;

/// All known cases and the suites that group them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    cases: BTreeMap<String, TestCase>,
    /// Suite name to case ids in registration order.
    suites: BTreeMap<String, Vec<String>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `case` under `suite`. Ids must be unique across suites.
    pub fn register(&mut self, suite: &str, case: TestCase) -> Result<(), RegressionError> {
        if self.cases.contains_key(&case.id) {
            return Err(RegressionError::DuplicateCase(case.id));
        }
        self.suites
            .entry(suite.to_string())
            .or_default()
            .push(case.id.clone());
        self.cases.insert(case.id.clone(), case);
        Ok(())
    }

    /// Looks up a case by id.
    pub fn get(&self, id: &str) -> Option<&TestCase> {
        self.cases.get(id)
    }

    /// The cases of `suite` in registration order.
    pub fn suite(&self, name: &str) -> Result<Vec<&TestCase>, RegressionError> {
        let ids = self
            .suites
            .get(name)
            .ok_or_else(|| RegressionError::UnknownSuite(name.to_string()))?;
        Ok(ids.iter().filter_map(|id| self.cases.get(id)).collect())
    }

    /// Suite names, sorted.
    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(String::as_str)
    }

    /// Every case, suite by suite.
    pub fn all(&self) -> Vec<&TestCase> {
        self.suites
            .values()
            .flatten()
            .filter_map(|id| self.cases.get(id))
            .collect()
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::TestCategory;

    #[test]
    fn register_and_lookup() {
        let mut reg = Registry::new();
        reg.register("a", TestCase::new("a-1", "first", TestCategory::Unit))
            .unwrap();
        reg.register("a", TestCase::new("a-2", "second", TestCategory::Unit))
            .unwrap();
        reg.register("b", TestCase::new("b-1", "third", TestCategory::Unit))
            .unwrap();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get("a-2").unwrap().name, "second");
        let ids: Vec<_> = reg.suite("a").unwrap().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a-1", "a-2"]);
        assert_eq!(reg.suite_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(reg.all().len(), 3);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut reg = Registry::new();
        reg.register("a", TestCase::new("x", "one", TestCategory::Unit))
            .unwrap();
        let err = reg
            .register("b", TestCase::new("x", "two", TestCategory::Unit))
            .unwrap_err();
        assert!(matches!(err, RegressionError::DuplicateCase(id) if id == "x"));
        assert!(reg.suite("b").is_err());
    }

    #[test]
    fn unknown_suite() {
        let reg = Registry::new();
        assert!(reg.is_empty());
        assert!(matches!(
            reg.suite("nope"),
            Err(RegressionError::UnknownSuite(_))
        ));
    }
}
