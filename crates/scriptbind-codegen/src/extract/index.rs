//! Parsed view of a crate's sources
//!
//! The index records, per module, what a path written in that module can
//! refer to (imports, glob imports, declared items) plus every trait, type
//! and `impl` block in the crate. Paths are resolved the way rustc resolves
//! them for the common cases; anything it cannot resolve is kept as written.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use scriptbind_types::QualifiedName;
use syn::{GenericParam, Generics, ImplItemFn, Item, ItemImpl, ItemTrait, UseTree};

use super::ExtractError;

/// Import chains deeper than this are kept as written
const MAX_RESOLVE_DEPTH: usize = 8;

#[derive(Debug, Default)]
struct Module {
    path: Vec<String>,
    /// alias → path as written
    imports: FxHashMap<String, Vec<String>>,
    globs: Vec<Vec<String>>,
    /// names declared directly in the module (types, traits, child modules)
    items: FxHashSet<String>,
}

/// A trait declaration
#[derive(Debug)]
pub struct TraitEntry {
    /// Qualified trait name
    pub name: QualifiedName,
    /// Declaring module
    pub module: usize,
    /// The trait as parsed
    pub item: ItemTrait,
}

/// A struct or enum declaration
#[derive(Debug)]
pub struct TypeEntry {
    /// Qualified type name
    pub name: QualifiedName,
    /// Declaring module
    pub module: usize,
}

/// The methods of one `impl` block
#[derive(Debug)]
pub struct ImplEntry {
    /// Module the block appears in
    pub module: usize,
    /// `impl Trait for Type` rather than `impl Type`
    pub trait_impl: bool,
    /// Type parameters of the block
    pub generics: Vec<String>,
    /// Methods in source order
    pub methods: Vec<ImplItemFn>,
}

#[derive(Debug)]
struct TypeAlias {
    module: usize,
    target: syn::Type,
}

/// Every module, trait, type and `impl` block of one crate
#[derive(Debug)]
pub struct SourceIndex {
    crate_name: String,
    modules: Vec<Module>,
    module_ids: FxHashMap<Vec<String>, usize>,
    traits: Vec<TraitEntry>,
    trait_ids: FxHashMap<QualifiedName, usize>,
    types: Vec<TypeEntry>,
    type_ids: FxHashMap<QualifiedName, usize>,
    aliases: FxHashMap<QualifiedName, TypeAlias>,
    impls: FxHashMap<QualifiedName, Vec<ImplEntry>>,
    files: usize,
}

impl SourceIndex {
    /// Scan `source_dir` recursively for `.rs` files
    pub fn load(crate_name: &str, source_dir: &Path) -> Result<Self, ExtractError> {
        let pattern = format!(
            "{}/**/*.rs",
            glob::Pattern::escape(&source_dir.to_string_lossy())
        );

        let mut sources = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| ExtractError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            let text = std::fs::read_to_string(&path).map_err(|source| ExtractError::Io {
                path: path.clone(),
                source,
            })?;
            let module = module_path_for(crate_name, source_dir, &path);
            sources.push((module, path, text));
        }

        tracing::debug!(files = sources.len(), dir = %source_dir.display(), "scanned sources");
        Self::build(crate_name, sources)
    }

    /// Index in-memory sources given as `(module path, text)` pairs, where the
    /// module path is `::` separated and starts with the crate name.
    pub fn from_sources<'a, I>(crate_name: &str, sources: I) -> Result<Self, ExtractError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let sources = sources
            .into_iter()
            .map(|(module, text)| {
                let path: Vec<String> = module.split("::").map(str::to_string).collect();
                (path, PathBuf::from(module), text.to_string())
            })
            .collect();
        Self::build(crate_name, sources)
    }

    fn build(
        crate_name: &str,
        sources: Vec<(Vec<String>, PathBuf, String)>,
    ) -> Result<Self, ExtractError> {
        let mut index = SourceIndex {
            crate_name: crate_name.to_string(),
            modules: Vec::new(),
            module_ids: FxHashMap::default(),
            traits: Vec::new(),
            trait_ids: FxHashMap::default(),
            types: Vec::new(),
            type_ids: FxHashMap::default(),
            aliases: FxHashMap::default(),
            impls: FxHashMap::default(),
            files: sources.len(),
        };

        let mut pending = Vec::new();
        for (module, path, text) in sources {
            let file = syn::parse_file(&text).map_err(|e| ExtractError::Parse {
                path,
                message: e.to_string(),
            })?;
            index.add_items(module, &file.items, &mut pending);
        }

        // Self types can only be resolved once every module's items are known
        for (module, item) in pending {
            index.add_impl(module, item);
        }

        Ok(index)
    }

    fn module_id(&mut self, path: Vec<String>) -> usize {
        if let Some(&id) = self.module_ids.get(&path) {
            return id;
        }
        let id = self.modules.len();
        self.module_ids.insert(path.clone(), id);
        self.modules.push(Module {
            path,
            ..Module::default()
        });
        id
    }

    fn add_items(&mut self, path: Vec<String>, items: &[Item], pending: &mut Vec<(usize, ItemImpl)>) {
        let id = self.module_id(path.clone());
        let qualified = |name: &syn::Ident| {
            let mut segments = path.clone();
            segments.push(name.to_string());
            QualifiedName::from_segments(segments)
        };

        for item in items {
            match item {
                Item::Use(item) => {
                    collect_use(&item.tree, &mut Vec::new(), &mut self.modules[id]);
                }
                Item::Mod(item) => {
                    self.modules[id].items.insert(item.ident.to_string());
                    if let Some((_, content)) = &item.content {
                        let mut child = path.clone();
                        child.push(item.ident.to_string());
                        self.add_items(child, content, pending);
                    }
                }
                Item::Struct(item) => self.add_type(id, qualified(&item.ident)),
                Item::Enum(item) => self.add_type(id, qualified(&item.ident)),
                Item::Type(item) => {
                    self.modules[id].items.insert(item.ident.to_string());
                    self.aliases.insert(
                        qualified(&item.ident),
                        TypeAlias {
                            module: id,
                            target: (*item.ty).clone(),
                        },
                    );
                }
                Item::Trait(item) => {
                    let name = qualified(&item.ident);
                    self.modules[id].items.insert(item.ident.to_string());
                    self.trait_ids.insert(name.clone(), self.traits.len());
                    self.traits.push(TraitEntry {
                        name,
                        module: id,
                        item: item.clone(),
                    });
                }
                Item::Impl(item) => pending.push((id, item.clone())),
                _ => {}
            }
        }
    }

    fn add_type(&mut self, module: usize, name: QualifiedName) {
        self.modules[module].items.insert(name.simple_name().to_string());
        if self.type_ids.contains_key(&name) {
            return;
        }
        self.type_ids.insert(name.clone(), self.types.len());
        self.types.push(TypeEntry { name, module });
    }

    fn add_impl(&mut self, module: usize, item: ItemImpl) {
        let syn::Type::Path(self_ty) = &*item.self_ty else {
            return;
        };
        if self_ty.qself.is_some() {
            return;
        }

        let generics = type_params(&item.generics);
        let segments = path_segments(&self_ty.path);
        if segments.len() == 1 && generics.contains(&segments[0]) {
            // blanket impl
            return;
        }
        let name = self.resolve(module, &segments, self_ty.path.leading_colon.is_some());

        let methods = item
            .items
            .into_iter()
            .filter_map(|item| match item {
                syn::ImplItem::Fn(method) => Some(method),
                _ => None,
            })
            .collect();

        self.impls.entry(name).or_default().push(ImplEntry {
            module,
            trait_impl: item.trait_.is_some(),
            generics,
            methods,
        });
    }

    /// Crate name
    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    /// Number of indexed files
    pub fn file_count(&self) -> usize {
        self.files
    }

    /// Qualified name of a module
    pub fn module_name(&self, module: usize) -> QualifiedName {
        QualifiedName::from_segments(self.modules[module].path.iter().cloned())
    }

    /// Look up a trait
    pub fn find_trait(&self, name: &QualifiedName) -> Option<&TraitEntry> {
        self.trait_ids.get(name).map(|&i| &self.traits[i])
    }

    /// Traits in source order
    pub fn traits(&self) -> &[TraitEntry] {
        &self.traits
    }

    /// Structs and enums in source order
    pub fn types(&self) -> &[TypeEntry] {
        &self.types
    }

    /// Whether a struct or enum with this name is declared in the crate
    pub fn has_type(&self, name: &QualifiedName) -> bool {
        self.type_ids.contains_key(name)
    }

    /// `impl` blocks whose self type is `name`, in source order
    pub fn impls_of(&self, name: &QualifiedName) -> &[ImplEntry] {
        self.impls.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn alias(&self, name: &QualifiedName) -> Option<(usize, &syn::Type)> {
        self.aliases.get(name).map(|alias| (alias.module, &alias.target))
    }

    fn is_known(&self, name: &QualifiedName) -> bool {
        self.type_ids.contains_key(name)
            || self.trait_ids.contains_key(name)
            || self.aliases.contains_key(name)
            || self.module_ids.contains_key(name.segments())
    }

    /// Resolve a path written in `module` to a qualified name
    pub fn resolve(&self, module: usize, segments: &[String], leading_colon: bool) -> QualifiedName {
        self.resolve_at_depth(module, segments, leading_colon, 0)
    }

    fn resolve_at_depth(
        &self,
        module: usize,
        segments: &[String],
        leading_colon: bool,
        depth: usize,
    ) -> QualifiedName {
        let as_written = || QualifiedName::from_segments(segments.iter().cloned());
        let Some((first, rest)) = segments.split_first() else {
            return as_written();
        };
        if leading_colon || depth > MAX_RESOLVE_DEPTH {
            return as_written();
        }

        let current = &self.modules[module];
        let join = |base: &[String], rest: &[String]| {
            QualifiedName::from_segments(base.iter().chain(rest).cloned())
        };

        match first.as_str() {
            "crate" => join(&[self.crate_name.clone()], rest),
            "self" => join(&current.path, rest),
            "super" => {
                let mut base = current.path.clone();
                let mut rest = segments;
                while let Some((head, tail)) = rest.split_first() {
                    if head != "super" {
                        break;
                    }
                    if base.len() > 1 {
                        base.pop();
                    }
                    rest = tail;
                }
                join(&base, rest)
            }
            _ => {
                if let Some(target) = current.imports.get(first) {
                    let base = self.resolve_at_depth(module, target, false, depth + 1);
                    return join(base.segments(), rest);
                }
                if current.items.contains(first) {
                    return join(&current.path, segments);
                }
                for glob in &current.globs {
                    let base = self.resolve_at_depth(module, glob, false, depth + 1);
                    let candidate = join(base.segments(), segments);
                    if self.is_known(&candidate) {
                        return candidate;
                    }
                }
                as_written()
            }
        }
    }
}

fn collect_use(tree: &UseTree, prefix: &mut Vec<String>, module: &mut Module) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use(&path.tree, prefix, module);
            prefix.pop();
        }
        UseTree::Name(name) => {
            if name.ident == "self" {
                if let Some(last) = prefix.last() {
                    module.imports.insert(last.clone(), prefix.clone());
                }
            } else {
                let mut path = prefix.clone();
                path.push(name.ident.to_string());
                module.imports.insert(name.ident.to_string(), path);
            }
        }
        UseTree::Rename(rename) => {
            let mut path = prefix.clone();
            if rename.ident != "self" {
                path.push(rename.ident.to_string());
            }
            if rename.rename != "_" {
                module.imports.insert(rename.rename.to_string(), path);
            }
        }
        UseTree::Glob(_) => module.globs.push(prefix.clone()),
        UseTree::Group(group) => {
            for tree in &group.items {
                collect_use(tree, prefix, module);
            }
        }
    }
}

/// Segment identifiers of a path, generic arguments dropped
pub(crate) fn path_segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

/// Names of the type parameters of a generics list
pub(crate) fn type_params(generics: &Generics) -> Vec<String> {
    generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.to_string()),
            _ => None,
        })
        .collect()
}

/// `src/lib.rs` → `app`, `src/a/mod.rs` → `app::a`, `src/a/b.rs` → `app::a::b`
fn module_path_for(crate_name: &str, source_dir: &Path, file: &Path) -> Vec<String> {
    let relative = file.strip_prefix(source_dir).unwrap_or(file);
    let mut segments = vec![crate_name.to_string()];
    let components: Vec<String> = relative
        .iter()
        .map(|c| c.to_string_lossy().into_owned())
        .collect();

    if let Some((file_name, dirs)) = components.split_last() {
        segments.extend(dirs.iter().cloned());
        let stem = file_name.strip_suffix(".rs").unwrap_or(file_name);
        let is_root = dirs.is_empty() && (stem == "lib" || stem == "main");
        if !is_root && stem != "mod" {
            segments.push(stem.to_string());
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    fn segments(s: &str) -> Vec<String> {
        s.split("::").map(str::to_string).collect()
    }

    #[test]
    fn test_module_paths() {
        let src = Path::new("/work/src");
        assert_eq!(module_path_for("app", src, Path::new("/work/src/lib.rs")), vec!["app"]);
        assert_eq!(
            module_path_for("app", src, Path::new("/work/src/scripts/mod.rs")),
            vec!["app", "scripts"]
        );
        assert_eq!(
            module_path_for("app", src, Path::new("/work/src/scripts/calc.rs")),
            vec!["app", "scripts", "calc"]
        );
    }

    #[test]
    fn test_resolution_order() {
        let index = SourceIndex::from_sources(
            "app",
            [
                ("app", "pub mod model; pub mod scripts;"),
                ("app::model", "pub struct Person; pub struct Address;"),
                (
                    "app::scripts",
                    "use crate::model::Person as Human;\n\
                     use super::model::*;\n\
                     pub struct Local;",
                ),
            ],
        )
        .unwrap();
        let scripts = index.module_ids[&segments("app::scripts")];

        assert_eq!(index.resolve(scripts, &segments("Human"), false), name("app::model::Person"));
        assert_eq!(index.resolve(scripts, &segments("Local"), false), name("app::scripts::Local"));
        assert_eq!(index.resolve(scripts, &segments("Address"), false), name("app::model::Address"));
        assert_eq!(
            index.resolve(scripts, &segments("self::Local"), false),
            name("app::scripts::Local")
        );
        assert_eq!(
            index.resolve(scripts, &segments("chrono::NaiveDate"), false),
            name("chrono::NaiveDate")
        );
    }

    #[test]
    fn test_impls_keyed_by_resolved_self_type() {
        let index = SourceIndex::from_sources(
            "app",
            [
                ("app", "pub mod model; mod ext { use crate::model::Person; impl Person { pub fn get_age(&self) -> u32 { 1 } } }"),
                ("app::model", "pub struct Person; impl Person { pub fn get_name(&self) -> String { String::new() } }"),
            ],
        )
        .unwrap();

        let impls = index.impls_of(&name("app::model::Person"));
        assert_eq!(impls.len(), 2);
        assert!(index.has_type(&name("app::model::Person")));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let err = SourceIndex::from_sources("app", [("app", "pub struct {")]).unwrap_err();
        assert!(matches!(err, ExtractError::Parse { ref path, .. } if path == Path::new("app")));
    }
}
