use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;
use tree_sitter::{Node, Tree};

use super::module_path::ModulePath;
use super::utils::{node_text, node_to_position, split_top_level};
use crate::{
    error::{Error, Result},
    types::{BindingAnnotation, ContractRef, DeclarationKind, SourceLocation},
};

/// Attribute name recognised when none is configured
pub const DEFAULT_ATTRIBUTE: &str = "binding";

/// An item carrying the binding attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedItem {
    pub name: String,
    pub kind: DeclarationKind,
    /// `None` when the attribute is present but its arguments make no sense
    pub annotation: Option<BindingAnnotation>,
    /// Supertrait bounds, only filled for traits
    pub supertraits: Vec<String>,
    pub location: SourceLocation,
}

/// `impl Trait for Type`, both sides resolved to binary names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitImpl {
    pub trait_name: String,
    pub self_type: String,
}

/// Everything the scanner found in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedFile {
    pub file: PathBuf,
    pub items: Vec<ScannedItem>,
    pub impls: Vec<TraitImpl>,
}

/// Finds annotated items and trait impls in a parsed Rust file
pub struct DeclarationScanner {
    attribute: Regex,
    type_path: Regex,
}

impl DeclarationScanner {
    pub fn new(attribute_name: &str) -> Result<Self> {
        let attribute = Regex::new(&format!(
            r"(?s)^#\[\s*(?:[A-Za-z_]\w*\s*::\s*)*{}\s*(?P<args>[(=].*)?\]$",
            regex::escape(attribute_name)
        ))
        .map_err(|e| Error::ConfigError(format!("Invalid attribute name {attribute_name:?}: {e}")))?;
        let type_path = Regex::new(r"^(?:dyn\s+)?(?:::)?[A-Za-z_]\w*(?:\s*::\s*[A-Za-z_]\w*)*\s*(?:<.*>)?$")
            .map_err(|e| Error::ParseError(format!("Invalid type path pattern: {e}")))?;
        Ok(Self {
            attribute,
            type_path,
        })
    }

    pub fn scan(
        &self,
        tree: &Tree,
        source: &str,
        file_path: &Path,
        module: &ModulePath,
    ) -> Result<ScannedFile> {
        let mut scanned = ScannedFile {
            file: file_path.to_path_buf(),
            ..ScannedFile::default()
        };
        self.visit_block(&tree.root_node(), source, module, &mut scanned)?;
        debug!(
            "Scanned {}: {} annotated item(s), {} trait impl(s)",
            file_path.display(),
            scanned.items.len(),
            scanned.impls.len()
        );
        Ok(scanned)
    }

    fn visit_block(
        &self,
        block: &Node,
        source: &str,
        module: &ModulePath,
        out: &mut ScannedFile,
    ) -> Result<()> {
        let modules = child_modules(block, source);
        let uses = collect_uses(block, source, module, &modules);
        let context = PathContext {
            module,
            uses: &uses,
            modules: &modules,
        };

        let mut cursor = block.walk();
        for child in block.named_children(&mut cursor) {
            match child.kind() {
                "struct_item" => self.handle_item(&child, source, &context, DeclarationKind::Struct, out)?,
                "enum_item" => self.handle_item(&child, source, &context, DeclarationKind::Enum, out)?,
                "union_item" => self.handle_item(&child, source, &context, DeclarationKind::Union, out)?,
                "trait_item" => self.handle_item(&child, source, &context, DeclarationKind::Trait, out)?,
                "function_item" => {
                    self.handle_item(&child, source, &context, DeclarationKind::Function, out)?
                }
                "impl_item" => self.handle_impl(&child, source, &context, out),
                "mod_item" => {
                    // `mod foo;` has no body, its items live in another file
                    if let Some(body) = child.child_by_field_name("body") {
                        let name = child
                            .child_by_field_name("name")
                            .ok_or_else(|| Error::ParseError("Module without name".to_string()))?;
                        let nested = module.child(node_text(&name, source));
                        self.visit_block(&body, source, &nested, out)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn handle_item(
        &self,
        node: &Node,
        source: &str,
        context: &PathContext,
        kind: DeclarationKind,
        out: &mut ScannedFile,
    ) -> Result<()> {
        let Some(args) = self.binding_arguments(node, source) else {
            return Ok(());
        };

        let name_node = node
            .child_by_field_name("name")
            .ok_or_else(|| Error::ParseError(format!("{kind:?} without name")))?;
        let name = name_node
            .utf8_text(source.as_bytes())
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in item name: {e}")))?;

        let supertraits = if kind == DeclarationKind::Trait {
            node.child_by_field_name("bounds")
                .map(|bounds| supertraits(node_text(&bounds, source), context))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        out.items.push(ScannedItem {
            name: context.module.qualify(name),
            kind,
            annotation: self.parse_annotation(&args, context),
            supertraits,
            location: SourceLocation::new(out.file.clone(), node_to_position(node, true)),
        });
        Ok(())
    }

    fn handle_impl(&self, node: &Node, source: &str, context: &PathContext, out: &mut ScannedFile) {
        let (Some(trait_node), Some(type_node)) = (
            node.child_by_field_name("trait"),
            node.child_by_field_name("type"),
        ) else {
            return;
        };

        let mut cursor = node.walk();
        if node.children(&mut cursor).any(|child| child.kind() == "!") {
            return;
        }

        out.impls.push(TraitImpl {
            trait_name: context.resolve(node_text(&trait_node, source)),
            self_type: context.resolve(node_text(&type_node, source)),
        });
    }

    /// Arguments of the binding attribute preceding `node`, if there is one
    fn binding_arguments(&self, node: &Node, source: &str) -> Option<String> {
        let mut sibling = node.prev_sibling();

        while let Some(s) = sibling {
            match s.kind() {
                "attribute_item" => {
                    if let Some(captures) = self.attribute.captures(node_text(&s, source).trim()) {
                        let args = captures.name("args").map_or("", |m| m.as_str());
                        return Some(args.trim().to_string());
                    }
                }
                "line_comment" | "block_comment" => {}
                // Stop at anything that is not an attribute or comment
                _ => break,
            }
            sibling = s.prev_sibling();
        }

        None
    }

    fn parse_annotation(&self, args: &str, context: &PathContext) -> Option<BindingAnnotation> {
        if args.is_empty() {
            return Some(BindingAnnotation::inferred());
        }

        let inner = args.strip_prefix('(')?.strip_suffix(')')?.trim();
        if inner.is_empty() {
            return Some(BindingAnnotation::inferred());
        }

        let value = match inner.split_once('=') {
            Some((key, value)) if key.trim() == "contract" => value.trim(),
            Some(_) => return None,
            None => inner,
        };
        let unquoted = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value)
            .trim();

        let contract = if self.type_path.is_match(unquoted) {
            ContractRef::Named(context.resolve(unquoted))
        } else {
            ContractRef::Invalid(value.to_string())
        };
        Some(BindingAnnotation { contract })
    }
}

/// Name resolution scope: the enclosing module, its `use` imports and child modules
struct PathContext<'a> {
    module: &'a ModulePath,
    uses: &'a HashMap<String, String>,
    modules: &'a HashSet<String>,
}

impl PathContext<'_> {
    /// Binary name for a type or trait path as written in the source
    fn resolve(&self, raw: &str) -> String {
        let cleaned = clean_path(raw);
        let segments: Vec<&str> = cleaned.split("::").filter(|s| !s.is_empty()).collect();
        let Some((&first, rest)) = segments.split_first() else {
            return cleaned;
        };

        let base = match first {
            "crate" => self.module.crate_name.clone(),
            "self" => self.module.full(),
            "super" => {
                let mut module = self.module.parent();
                let mut rest = rest;
                while let Some((&"super", tail)) = rest.split_first() {
                    module = module.parent();
                    rest = tail;
                }
                return join(&module.full(), &rest.join("::"));
            }
            _ => match self.uses.get(first) {
                Some(target) => target.clone(),
                None if rest.is_empty() || self.modules.contains(first) => {
                    return self.module.qualify(&cleaned);
                }
                None => return cleaned,
            },
        };
        join(&base, &rest.join("::"))
    }
}

/// Strip references, `dyn`, generic arguments and whitespace from a path
fn clean_path(raw: &str) -> String {
    let mut text = raw.trim();
    loop {
        let stripped = text
            .trim_start_matches('&')
            .trim_start()
            .trim_start_matches("mut ")
            .trim_start_matches("dyn ")
            .trim_start();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    let text = text.split('<').next().unwrap_or(text);
    let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    text.trim_start_matches("::").to_string()
}

fn join(prefix: &str, suffix: &str) -> String {
    match (prefix.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{prefix}::{suffix}"),
    }
}

fn supertraits(bounds: &str, context: &PathContext) -> Vec<String> {
    let bounds = bounds.trim().trim_start_matches(':');
    split_top_level(bounds, '+')
        .into_iter()
        .map(str::trim)
        .filter(|bound| !bound.is_empty() && !bound.starts_with('\'') && !bound.starts_with('?'))
        .map(|bound| context.resolve(bound))
        .collect()
}

/// Names of the modules declared directly inside `block`, inline or not
fn child_modules(block: &Node, source: &str) -> HashSet<String> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "mod_item")
        .filter_map(|child| child.child_by_field_name("name"))
        .map(|name| node_text(&name, source).to_string())
        .collect()
}

/// Alias to binary name for every `use` directly inside `block`
fn collect_uses(
    block: &Node,
    source: &str,
    module: &ModulePath,
    modules: &HashSet<String>,
) -> HashMap<String, String> {
    let no_imports = HashMap::new();
    let context = PathContext {
        module,
        uses: &no_imports,
        modules,
    };

    let mut imports = Vec::new();
    let mut cursor = block.walk();
    for child in block.named_children(&mut cursor) {
        if child.kind() != "use_declaration" {
            continue;
        }
        if let Some(argument) = child.child_by_field_name("argument") {
            expand_use(node_text(&argument, source), "", &mut imports);
        }
    }

    imports
        .into_iter()
        .map(|(alias, path)| {
            let is_relative = match path.split("::").next() {
                Some("crate" | "self" | "super") => true,
                Some(first) => modules.contains(first),
                None => false,
            };
            let resolved = if is_relative { context.resolve(&path) } else { path };
            (alias, resolved)
        })
        .collect()
}

/// Flatten a use tree into `(alias, path)` pairs; globs and `_` imports are dropped
fn expand_use(tree: &str, prefix: &str, out: &mut Vec<(String, String)>) {
    let tree = tree.trim();

    if let (Some(open), true) = (tree.find('{'), tree.ends_with('}')) {
        let head = tree[..open].trim().trim_end_matches("::");
        let nested_prefix = join(prefix, head);
        let inner = &tree[open + 1..tree.len() - 1];
        for part in split_top_level(inner, ',') {
            if !part.trim().is_empty() {
                expand_use(part, &nested_prefix, out);
            }
        }
        return;
    }

    let (path, alias) = match tree.split_once(" as ") {
        Some((path, alias)) => (join(prefix, path.trim()), Some(alias.trim())),
        None => (join(prefix, tree), None),
    };
    if path.ends_with('*') || alias == Some("_") {
        return;
    }

    let path = path.strip_suffix("::self").unwrap_or(&path).to_string();
    let alias = match alias {
        Some(alias) => alias.to_string(),
        None => path.rsplit("::").next().unwrap_or(&path).to_string(),
    };
    out.push((alias, path));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RustParser;

    fn scan(source: &str) -> ScannedFile {
        let mut parser = RustParser::new().unwrap();
        let module = ModulePath::new("app", Vec::new());
        parser.scan(source, Path::new("src/lib.rs"), &module).unwrap()
    }

    #[test]
    fn test_expand_use_forms() {
        let mut out = Vec::new();
        expand_use("crate::shapes::{Circle, square::Square as Sq, self}", "", &mut out);
        expand_use("std::fmt::Debug", "", &mut out);
        expand_use("std::io::*", "", &mut out);
        expand_use("std::io::Write as _", "", &mut out);

        assert_eq!(
            out,
            vec![
                ("Circle".to_string(), "crate::shapes::Circle".to_string()),
                ("Sq".to_string(), "crate::shapes::square::Square".to_string()),
                ("shapes".to_string(), "crate::shapes".to_string()),
                ("Debug".to_string(), "std::fmt::Debug".to_string()),
            ]
        );
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("dyn Bob + Send"), "Bob+Send");
        assert_eq!(clean_path("&mut Wrapper<T>"), "Wrapper");
        assert_eq!(clean_path("::std::fmt::Debug"), "std::fmt::Debug");
    }

    #[test]
    fn test_plain_attribute_infers() {
        let scanned = scan(
            r#"
pub trait Bob {}

#[binding]
pub struct Fred;

impl Bob for Fred {}
"#,
        );

        assert_eq!(scanned.items.len(), 1);
        let fred = &scanned.items[0];
        assert_eq!(fred.name, "app::Fred");
        assert_eq!(fred.kind, DeclarationKind::Struct);
        assert_eq!(fred.annotation, Some(BindingAnnotation::inferred()));
        assert_eq!(fred.location.position.line, 4);
        assert_eq!(
            scanned.impls,
            vec![TraitImpl {
                trait_name: "app::Bob".to_string(),
                self_type: "app::Fred".to_string(),
            }]
        );
    }

    #[test]
    fn test_explicit_contracts() {
        let scanned = scan(
            r#"
use crate::people::Bob as Robert;

#[binding(contract = Robert)]
struct Fred;

/// Nancy
#[binding("other::Alice")]
#[derive(Default)]
enum Nancy { A }

#[bindery::binding(crate::people::Carol)]
struct Dave;
"#,
        );

        let contracts: Vec<_> = scanned
            .items
            .iter()
            .map(|item| (item.name.as_str(), item.annotation.clone()))
            .collect();
        assert_eq!(
            contracts,
            vec![
                ("app::Fred", Some(BindingAnnotation::named("app::people::Bob"))),
                ("app::Nancy", Some(BindingAnnotation::named("other::Alice"))),
                ("app::Dave", Some(BindingAnnotation::named("app::people::Carol"))),
            ]
        );
    }

    #[test]
    fn test_malformed_and_invalid_arguments() {
        let scanned = scan(
            r#"
#[binding = "app::Bob"]
struct Fred;

#[binding(flavour = Bob)]
struct Nancy;

#[binding(42)]
struct Dave;

#[bindings]
struct NotAnnotated;
"#,
        );

        assert_eq!(scanned.items.len(), 3);
        assert_eq!(scanned.items[0].annotation, None);
        assert_eq!(scanned.items[1].annotation, None);
        assert_eq!(
            scanned.items[2].annotation,
            Some(BindingAnnotation {
                contract: ContractRef::Invalid("42".to_string())
            })
        );
    }

    #[test]
    fn test_inline_modules_and_super() {
        let scanned = scan(
            r#"
pub trait Bob {}

mod people {
    use super::Bob;

    #[binding]
    pub struct Fred;

    impl Bob for Fred {}

    mod deeper {
        #[binding(super::super::Bob)]
        pub struct Nancy;
    }
}
"#,
        );

        let names: Vec<_> = scanned.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["app::people::Fred", "app::people::deeper::Nancy"]);
        assert_eq!(
            scanned.items[1].annotation,
            Some(BindingAnnotation::named("app::Bob"))
        );
        assert_eq!(scanned.impls[0].trait_name, "app::Bob");
        assert_eq!(scanned.impls[0].self_type, "app::people::Fred");
    }

    #[test]
    fn test_trait_supertraits() {
        let scanned = scan(
            r#"
pub trait Base {}

#[binding]
pub trait Special: Base + Send + 'static {}
"#,
        );

        let special = &scanned.items[0];
        assert_eq!(special.kind, DeclarationKind::Trait);
        assert_eq!(special.supertraits, vec!["app::Base", "app::Send"]);
    }

    #[test]
    fn test_ignores_inherent_and_negative_impls() {
        let scanned = scan(
            r#"
struct Fred;
impl Fred { fn new() -> Self { Fred } }
impl !Sync for Fred {}
impl<T> std::fmt::Debug for Wrapper<T> {}
"#,
        );

        assert_eq!(
            scanned.impls,
            vec![TraitImpl {
                trait_name: "std::fmt::Debug".to_string(),
                self_type: "app::Wrapper".to_string(),
            }]
        );
    }

    #[test]
    fn test_paths_through_child_modules_are_relative() {
        let scanned = scan(
            r#"
mod people;

pub mod shapes {
    pub trait Shape {}
}

use people::Fred;

#[binding]
pub struct Circle;

impl shapes::Shape for Circle {}

#[binding(shapes::Shape)]
pub struct Square;

#[binding(contract = Fred)]
pub struct Nancy;

impl std::fmt::Debug for Square {}
"#,
        );

        assert_eq!(
            scanned.impls,
            vec![
                TraitImpl {
                    trait_name: "app::shapes::Shape".to_string(),
                    self_type: "app::Circle".to_string(),
                },
                TraitImpl {
                    trait_name: "std::fmt::Debug".to_string(),
                    self_type: "app::Square".to_string(),
                },
            ]
        );
        assert_eq!(
            scanned.items[1].annotation,
            Some(BindingAnnotation::named("app::shapes::Shape"))
        );
        assert_eq!(
            scanned.items[2].annotation,
            Some(BindingAnnotation::named("app::people::Fred"))
        );
    }

    #[test]
    fn test_annotated_function_is_recorded_as_function() {
        let scanned = scan(
            r#"
#[binding(Bob)]
fn make_bob() {}
"#,
        );
        assert_eq!(scanned.items[0].kind, DeclarationKind::Function);
    }
}
