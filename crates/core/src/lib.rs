//! bindery - Service binding registries for Rust
//!
//! This crate provides functionality to:
//! - Scan Rust sources for items carrying the binding attribute
//! - Collect (contract, implementation) pairs over compilation rounds and
//!   merge them into persisted, sorted registry resources
//! - Resolve registries from several search roots at runtime and hand the
//!   implementations to a pluggable binding strategy
pub mod binding;
pub mod collector;
pub mod config;
pub mod error;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use binding::{
    BeanDefinitionStrategy, BeanRegistry, BindFailure, BindFailureKind, BindingStrategy,
    MultiBinder, MultibindingStrategy, ServiceBinder,
};
pub use collector::{BindingCollector, CollectorOptions, FinalizeReport, Round, RoundOutcome};
pub use config::Config;
pub use parser::{RustParser, SourceSet};
pub use registry::{Registry, RegistryKind};
pub use resolver::{
    Classpath, Factory, ImplementationLoader, ImplementationTable, Resolved, ServiceResolver,
};
pub use resource::{MemoryResources, OutputDir, ResourceSource, ResourceStore, SearchPath};
