//! Memoizing object type code resolver
//!
//! One resolver is created per import run. Each distinct entity name is looked
//! up at most once; failures are returned to the caller and not cached.

use crate::metadata::MetadataSource;
use crate::templates::{TemplateError, TemplateResult};
use std::collections::HashMap;

/// Resolves entity names to the target environment's object type codes
#[derive(Debug)]
pub struct TypeCodeResolver<M: MetadataSource> {
    source: M,
    cache: HashMap<String, i32>,
}

impl<M: MetadataSource> TypeCodeResolver<M> {
    pub fn new(source: M) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    /// Object type code for `entity_name`, looked up on first use
    pub fn resolve(&mut self, entity_name: &str) -> TemplateResult<i32> {
        if let Some(code) = self.cache.get(entity_name) {
            return Ok(*code);
        }

        let code = self
            .source
            .lookup_type_code(entity_name)
            .map_err(|source| TemplateError::Resolution {
                entity: entity_name.to_string(),
                source,
            })?;

        tracing::debug!("Resolved {} to object type code {}", entity_name, code);
        self.cache.insert(entity_name.to_string(), code);
        Ok(code)
    }

    /// Number of cached entries
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// The underlying metadata source
    pub fn source(&self) -> &M {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataError, StaticMetadataSource};
    use std::cell::Cell;

    /// Counts lookups against an inner source
    struct CountingSource {
        inner: StaticMetadataSource,
        lookups: Cell<usize>,
    }

    impl MetadataSource for CountingSource {
        fn lookup_type_code(&self, entity_name: &str) -> Result<i32, MetadataError> {
            self.lookups.set(self.lookups.get() + 1);
            self.inner.lookup_type_code(entity_name)
        }
    }

    fn resolver() -> TypeCodeResolver<CountingSource> {
        TypeCodeResolver::new(CountingSource {
            inner: StaticMetadataSource::new().with_entity("Account", 1).with_entity("Contact", 2),
            lookups: Cell::new(0),
        })
    }

    #[test]
    fn test_single_lookup_per_entity() {
        let mut resolver = resolver();

        assert_eq!(resolver.resolve("Account").unwrap(), 1);
        assert_eq!(resolver.resolve("Account").unwrap(), 1);
        assert_eq!(resolver.source().lookups.get(), 1);

        assert_eq!(resolver.resolve("Contact").unwrap(), 2);
        assert_eq!(resolver.source().lookups.get(), 2);
        assert_eq!(resolver.cached(), 2);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let mut resolver = resolver();

        assert!(matches!(
            resolver.resolve("Lead"),
            Err(TemplateError::Resolution { ref entity, .. }) if entity == "Lead"
        ));
        assert!(resolver.resolve("Lead").is_err());
        assert_eq!(resolver.source().lookups.get(), 2);
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn test_separate_runs_do_not_share_cache() {
        let mut first = resolver();
        first.resolve("Account").unwrap();

        let second = resolver();
        assert_eq!(second.cached(), 0);
    }
}
