use std::collections::HashMap;
use tracing::warn;

use super::declaration_scanner::ScannedFile;
use crate::types::{Declaration, DeclarationKind, ImplementationName};

/// Scanned files of one compilation round.
///
/// Trait impls may live in a different file than the annotated type, so
/// declarations are only built once every file of the round has been added.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    files: Vec<ScannedFile>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: ScannedFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[ScannedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Annotated declarations with their directly implemented traits
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut implemented: HashMap<&str, Vec<&str>> = HashMap::new();
        for trait_impl in self.files.iter().flat_map(|file| &file.impls) {
            let traits = implemented.entry(trait_impl.self_type.as_str()).or_default();
            if !traits.contains(&trait_impl.trait_name.as_str()) {
                traits.push(trait_impl.trait_name.as_str());
            }
        }

        let mut declarations = Vec::new();
        for item in self.files.iter().flat_map(|file| &file.items) {
            let name = match ImplementationName::new(&item.name) {
                Ok(name) => name,
                Err(e) => {
                    warn!("Skipping {} at {}: {}", item.name, item.location, e);
                    continue;
                }
            };

            let mut declaration = Declaration::new(name, item.kind)
                .with_annotation(item.annotation.clone())
                .with_location(item.location.clone());
            declaration.interfaces = match item.kind {
                DeclarationKind::Trait => item.supertraits.clone(),
                _ => implemented
                    .get(item.name.as_str())
                    .map(|traits| traits.iter().map(|t| t.to_string()).collect())
                    .unwrap_or_default(),
            };
            declarations.push(declaration);
        }
        declarations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ModulePath, RustParser};
    use crate::types::BindingAnnotation;
    use std::path::Path;

    fn scan(parser: &mut RustParser, file: &str, module: &[&str], source: &str) -> ScannedFile {
        let module = ModulePath::new("app", module.iter().map(|s| s.to_string()).collect());
        parser.scan(source, Path::new(file), &module).unwrap()
    }

    #[test]
    fn test_impls_from_other_files_are_joined() {
        let mut parser = RustParser::new().unwrap();
        let mut sources = SourceSet::new();
        sources.add(scan(
            &mut parser,
            "src/fred.rs",
            &["fred"],
            "#[binding]\npub struct Fred;\n",
        ));
        sources.add(scan(
            &mut parser,
            "src/lib.rs",
            &[],
            "pub trait Bob {}\nimpl Bob for crate::fred::Fred {}\nimpl Clone for crate::fred::Fred { fn clone(&self) -> Self { todo!() } }\n",
        ));

        let declarations = sources.declarations();
        assert_eq!(declarations.len(), 1);
        let fred = &declarations[0];
        assert_eq!(fred.name.as_str(), "app::fred::Fred");
        assert_eq!(fred.interfaces, vec!["app::Bob", "app::Clone"]);
    }

    #[test]
    fn test_declarations_carry_interfaces_and_annotation() {
        let mut parser = RustParser::new().unwrap();
        let mut sources = SourceSet::new();
        sources.add(scan(
            &mut parser,
            "src/lib.rs",
            &[],
            r#"
pub trait Bob {}
#[binding]
pub struct Fred;
impl Bob for Fred {}
impl Bob for Fred {}
impl std::fmt::Debug for Fred {}

#[binding(Bob)]
pub trait Special: Bob {}
"#,
        ));

        let declarations = sources.declarations();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].interfaces, vec!["app::Bob", "std::fmt::Debug"]);
        assert_eq!(declarations[0].annotation, Some(BindingAnnotation::inferred()));
        assert!(declarations[0].location.is_some());
        assert_eq!(declarations[1].kind, DeclarationKind::Trait);
        assert_eq!(declarations[1].interfaces, vec!["app::Bob"]);
        assert_eq!(declarations[1].annotation, Some(BindingAnnotation::named("app::Bob")));
    }
}
