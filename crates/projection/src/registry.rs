//! CRS definition registry.

use std::collections::HashMap;

use tiler_common::{CrsId, TilerError, TilerResult};

use crate::transform::Transformer;

/// Maps CRS identifiers to PROJ.4 definition strings.
///
/// Lookups check explicitly registered definitions first, then (when
/// enabled) the bundled EPSG database from `crs-definitions`.
#[derive(Debug, Clone, Default)]
pub struct CrsRegistry {
    definitions: HashMap<CrsId, String>,
    use_epsg_database: bool,
}

impl CrsRegistry {
    /// A registry with no definitions at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry backed by the bundled EPSG database (UTM zones, national
    /// grids, Web Mercator, ...).
    pub fn with_epsg_database() -> Self {
        Self {
            definitions: HashMap::new(),
            use_epsg_database: true,
        }
    }

    /// Register (or replace) a definition for `id`.
    pub fn register(&mut self, id: CrsId, proj4: impl Into<String>) -> &mut Self {
        self.definitions.insert(id, proj4.into());
        self
    }

    /// PROJ.4 definition string for `id`, if known.
    pub fn definition(&self, id: &CrsId) -> Option<&str> {
        if let Some(def) = self.definitions.get(id) {
            return Some(def.as_str());
        }
        if !self.use_epsg_database {
            return None;
        }
        id.epsg_code()
            .and_then(|code| u16::try_from(code).ok())
            .and_then(crs_definitions::from_code)
            .map(|def| def.proj4)
    }

    pub fn contains(&self, id: &CrsId) -> bool {
        self.definition(id).is_some()
    }

    /// Check if `id` is a geographic (lon/lat in degrees) CRS.
    pub fn is_geographic(&self, id: &CrsId) -> TilerResult<bool> {
        let def = self.require(id)?;
        Ok(def.contains("+proj=longlat") || def.contains("+proj=latlong"))
    }

    /// Unit name used for resolution reporting.
    pub fn unit_name(&self, id: &CrsId) -> TilerResult<&'static str> {
        Ok(if self.is_geographic(id)? {
            "degrees"
        } else {
            "metres"
        })
    }

    /// Build a transformer between two registered systems.
    pub fn transformer(&self, source: &CrsId, target: &CrsId) -> TilerResult<Transformer> {
        let source_def = self.require(source)?;
        let target_def = self.require(target)?;
        Transformer::from_definitions(
            source.clone(),
            source_def,
            self.is_geographic(source)?,
            target.clone(),
            target_def,
            self.is_geographic(target)?,
        )
    }

    fn require(&self, id: &CrsId) -> TilerResult<&str> {
        self.definition(id)
            .ok_or_else(|| TilerError::Projection(format!("{} is not a registered CRS", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_database_lookup() {
        let registry = CrsRegistry::with_epsg_database();
        assert!(registry.contains(&CrsId::wgs84()));
        assert!(registry.contains(&CrsId::epsg(32633)));
        assert!(registry.is_geographic(&CrsId::wgs84()).unwrap());
        assert!(!registry.is_geographic(&CrsId::epsg(32633)).unwrap());
        assert_eq!(registry.unit_name(&CrsId::epsg(3857)).unwrap(), "metres");
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = CrsRegistry::empty();
        assert!(!registry.contains(&CrsId::wgs84()));
        assert!(matches!(
            registry.transformer(&CrsId::wgs84(), &CrsId::epsg(3857)),
            Err(TilerError::Projection(_))
        ));
    }

    #[test]
    fn test_registered_definition_wins() {
        let mut registry = CrsRegistry::empty();
        let id = CrsId::parse("LOCAL:sphere").unwrap();
        registry.register(id.clone(), "+proj=longlat +a=6371000 +b=6371000 +no_defs");
        assert!(registry.is_geographic(&id).unwrap());
        assert!(!registry.contains(&CrsId::wgs84()));
    }

    #[test]
    fn test_unknown_epsg_code() {
        let registry = CrsRegistry::with_epsg_database();
        assert!(!registry.contains(&CrsId::epsg(1)));
        assert!(!registry.contains(&CrsId::epsg(999_999)));
    }
}
