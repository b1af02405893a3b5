//! Seed loading service
//!
//! Reads the initial forest from a TOML seed file, or falls back to the
//! built-in demo data.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{demo_seed, Forest, ForestBuilder, SeedFile, SeedNode};
use crate::infrastructure::traits::FileSystem;

/// Service for turning seed data into a session forest.
pub struct SeedService {
    fs: Arc<dyn FileSystem>,
}

impl SeedService {
    /// Create a new seed service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a seed file.
    ///
    /// Layout:
    /// ```toml
    /// [[nodes]]
    /// id = "furniture"
    /// label = "Furniture"
    /// value = 1000
    ///
    /// [[nodes.children]]
    /// id = "tables"
    /// label = "Tables"
    /// value = 300
    /// ```
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<SeedNode>> {
        debug!("load: seed={}", path.display());
        let content = self.fs.read_to_string(path).with_path_context("read seed", path)?;
        let seeds = Self::parse(&content, path)?;
        if seeds.is_empty() {
            warn!("seed file {} declares no nodes", path.display());
        }
        Ok(seeds)
    }

    /// Parse seed content; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Vec<SeedNode>> {
        let file: SeedFile = toml::from_str(content).map_err(|e| ApplicationError::SeedFormat {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        Ok(file.nodes)
    }

    /// Seeds from `source`, or the demo data when no source is given.
    pub fn seeds(&self, source: Option<&Path>) -> ApplicationResult<Vec<SeedNode>> {
        match source {
            Some(path) => self.load(path),
            None => {
                debug!("no seed file configured, using demo data");
                Ok(demo_seed())
            }
        }
    }

    /// Build the balanced forest for `source`.
    pub fn load_forest(&self, source: Option<&Path>) -> ApplicationResult<Forest> {
        let seeds = self.seeds(source)?;
        Ok(ForestBuilder::new().build(&seeds)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_toml_when_parsing_then_keeps_children_in_order() {
        let content = r#"
[[nodes]]
id = "furniture"
label = "Furniture"
value = 1000

[[nodes.children]]
id = "tables"
label = "Tables"
value = 300
originalValue = 250

[[nodes.children]]
id = "chairs"
label = "Chairs"
value = 700.5
"#;
        let seeds = SeedService::parse(content, Path::new("seed.toml")).unwrap();
        assert_eq!(seeds.len(), 1);
        let children = &seeds[0].children;
        assert_eq!(children[0].id, "tables");
        assert_eq!(children[0].baseline(), 250.0);
        assert_eq!(children[1].value, 700.5);
        assert_eq!(children[1].baseline(), 700.5);
    }

    #[test]
    fn given_missing_field_when_parsing_then_reports_seed_format() {
        let content = "[[nodes]]\nid = \"x\"\n";
        let err = SeedService::parse(content, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ApplicationError::SeedFormat { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
