use crate::{
    error::{Error, Result},
    parser::{
        declaration_scanner::{DeclarationScanner, ScannedFile, DEFAULT_ATTRIBUTE},
        module_path::ModulePath,
    },
};
use std::path::Path;
use tree_sitter::Parser;

pub struct RustParser {
    parser: Parser,
    scanner: DeclarationScanner,
}

impl RustParser {
    pub fn new() -> Result<Self> {
        Self::with_attribute(DEFAULT_ATTRIBUTE)
    }

    /// Parser recognising `#[<attribute>]` as the binding annotation
    pub fn with_attribute(attribute: &str) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|e| Error::TreeSitterError(format!("Failed to set language: {e}")))?;
        Ok(Self {
            parser,
            scanner: DeclarationScanner::new(attribute)?,
        })
    }

    pub fn parse(&mut self, source: &str) -> Result<tree_sitter::Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| Error::ParseError("Failed to parse source code".to_string()))
    }

    pub fn scan(
        &mut self,
        source: &str,
        file_path: &Path,
        module: &ModulePath,
    ) -> Result<ScannedFile> {
        let tree = self.parse(source)?;
        self.scanner.scan(&tree, source, file_path, module)
    }

    /// Read and scan a file on disk.
    ///
    /// Without an explicit crate name the closest `Cargo.toml` decides it.
    pub fn scan_file(&mut self, file_path: &Path, crate_name: Option<&str>) -> Result<ScannedFile> {
        let source = std::fs::read_to_string(file_path)?;
        let crate_name = match crate_name {
            Some(name) => name.to_string(),
            None => {
                let manifest = ModulePath::find_cargo_toml(file_path).ok_or_else(|| {
                    Error::ConfigError(format!(
                        "No Cargo.toml found above {}",
                        file_path.display()
                    ))
                })?;
                ModulePath::crate_name_from_manifest(&manifest)?
            }
        };
        let module = ModulePath::for_file(file_path, &crate_name);
        self.scan(&source, file_path, &module)
    }
}
