//! Bean declaration synthesis
//!
//! Beans are expanded exactly one level deep: a property whose own type is a
//! bean renders as `any`. That bounds the output and keeps generation
//! terminating on self-referential and mutually-referential type graphs.

use rustc_hash::FxHashMap;
use scriptbind_types::{BeanDescriptor, QualifiedName};

use crate::declaration::{InterfaceBlock, Member};
use crate::error::GenerateError;
use crate::mapper::TypeMapper;

/// Bean descriptors by qualified name, built once by the extractor
#[derive(Debug, Clone, Default)]
pub struct BeanCatalog {
    beans: FxHashMap<QualifiedName, BeanDescriptor>,
}

impl BeanCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a bean
    pub fn insert(&mut self, bean: BeanDescriptor) {
        self.beans.insert(bean.name.clone(), bean);
    }

    /// Look up a bean
    pub fn get(&self, name: &QualifiedName) -> Option<&BeanDescriptor> {
        self.beans.get(name)
    }

    /// Number of beans
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

impl FromIterator<BeanDescriptor> for BeanCatalog {
    fn from_iter<I: IntoIterator<Item = BeanDescriptor>>(iter: I) -> Self {
        let mut catalog = BeanCatalog::new();
        for bean in iter {
            catalog.insert(bean);
        }
        catalog
    }
}

/// Render one bean as an interface block
pub fn synthesize_bean(bean: &BeanDescriptor, mapper: &TypeMapper) -> InterfaceBlock {
    InterfaceBlock {
        name: bean.name.simple_name().to_string(),
        members: bean
            .properties
            .iter()
            .map(|property| Member::Property {
                name: property.name.clone(),
                ty: mapper.map_depth_limited(&property.ty),
            })
            .collect(),
    }
}

/// Render every bean the mapper recorded, in first-encountered order.
///
/// Beans missing from the catalog (declared outside the scanned sources)
/// render as empty blocks. Two recorded beans sharing a simple name, or a
/// bean named like the interface itself, are an error: the declaration file
/// has a single flat namespace.
pub fn synthesize_beans(
    interface: &QualifiedName,
    catalog: &BeanCatalog,
    mapper: &TypeMapper,
) -> Result<Vec<InterfaceBlock>, GenerateError> {
    let mut by_simple_name: FxHashMap<&str, &QualifiedName> = FxHashMap::default();
    // the contract block is declared under the interface's simple name
    by_simple_name.insert(interface.simple_name(), interface);
    let mut blocks = Vec::new();

    for name in mapper.encountered_beans() {
        if let Some(first) = by_simple_name.insert(name.simple_name(), name) {
            return Err(GenerateError::BeanNameCollision {
                interface: interface.to_string(),
                name: name.simple_name().to_string(),
                first: first.to_string(),
                second: name.to_string(),
            });
        }

        let block = match catalog.get(name) {
            Some(bean) => synthesize_bean(bean, mapper),
            None => {
                tracing::debug!(bean = %name, "bean not found in sources, emitting empty declaration");
                synthesize_bean(&BeanDescriptor::new(name.clone()), mapper)
            }
        };
        blocks.push(block);
    }

    Ok(blocks)
}
