//! Compile-time collection of bindings
//!
//! The [`BindingCollector`] is fed one [`Round`] of annotated declarations at
//! a time. It keeps every inferred (contract, implementation) pair in memory
//! until the final round, then merges each touched contract with whatever was
//! persisted by earlier builds and writes the sorted union back.
//!
//! Problems never abort the session. They are recorded as [`Diagnostic`]s
//! so the host decides whether they fail the build.

pub mod inference;

pub use inference::{CANNOT_INFER, ContractInference, DEFAULT_UNIVERSAL_TYPES, INVALID_CONTRACT};

use tracing::{debug, error, info, warn};

use crate::registry::{self, BINDINGS_PREFIX, Registry};
use crate::resource::ResourceStore;
use crate::types::{ContractName, Declaration, Diagnostic, ImplementationName, Level};

/// Declarations presented to the collector in one compilation round
#[derive(Debug, Clone, Default)]
pub struct Round {
    pub declarations: Vec<Declaration>,
    /// Set on the last round of the session
    pub processing_over: bool,
}

impl Round {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self {
            declarations,
            processing_over: false,
        }
    }

    /// The closing round, usually without declarations
    pub fn last() -> Self {
        Self {
            declarations: Vec::new(),
            processing_over: true,
        }
    }

    pub fn is_final(&self) -> bool {
        self.processing_over
    }
}

/// What happened to one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Pairs were accumulated, nothing persisted yet
    Accumulated { discovered: usize },
    /// The session was finalized during this round
    Finalized(FinalizeReport),
    /// The session was already finalized; the round was ignored
    Closed,
}

/// Per-contract result of finalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeReport {
    pub written: Vec<ContractName>,
    pub unchanged: Vec<ContractName>,
    pub failed: Vec<ContractName>,
}

#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// Resource path prefix, see [`registry::path`]
    pub prefix: String,
    pub inference: ContractInference,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            prefix: BINDINGS_PREFIX.to_string(),
            inference: ContractInference::default(),
        }
    }
}

/// Accumulates bindings over the rounds of one compilation session
#[derive(Debug, Default)]
pub struct BindingCollector {
    options: CollectorOptions,
    pending: Registry,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

impl BindingCollector {
    pub fn new(options: CollectorOptions) -> Self {
        Self {
            options,
            pending: Registry::new(),
            diagnostics: Vec::new(),
            finished: false,
        }
    }

    pub fn options(&self) -> &CollectorOptions {
        &self.options
    }

    /// Pairs discovered so far and not yet persisted
    pub fn pending(&self) -> &Registry {
        &self.pending
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Handle one round; the final round triggers [`finalize`](Self::finalize)
    pub fn process(&mut self, round: &Round, store: &mut dyn ResourceStore) -> RoundOutcome {
        if self.finished {
            self.report(Diagnostic::warning(
                "Binding collection already finished, ignoring round",
            ));
            return RoundOutcome::Closed;
        }

        let discovered = self.discover(&round.declarations);
        if round.is_final() {
            RoundOutcome::Finalized(self.finalize(store))
        } else {
            RoundOutcome::Accumulated { discovered }
        }
    }

    /// Infer and remember the pairs of `declarations`, returns how many were new
    pub fn discover(&mut self, declarations: &[Declaration]) -> usize {
        let mut discovered = 0;
        for declaration in declarations {
            if declaration.annotation.is_none() {
                debug!("Skipping {}: annotation unusable", declaration.name);
                continue;
            }
            if !declaration.kind.is_class() && !declaration.kind.is_interface() {
                debug!("Skipping {}: {:?} cannot be bound", declaration.name, declaration.kind);
                continue;
            }

            match self.options.inference.infer(declaration) {
                Ok(contract) => {
                    debug!("Discovered {} for {}", declaration.name, contract);
                    if self.pending.insert(contract, declaration.name.clone()) {
                        discovered += 1;
                    }
                }
                Err(diagnostic) => self.report(diagnostic),
            }
        }
        discovered
    }

    /// Merge every touched contract with its persisted registry and write it back.
    ///
    /// Absent resources are created. A contract whose resource cannot be read
    /// or written is reported and skipped; the others are still processed.
    pub fn finalize(&mut self, store: &mut dyn ResourceStore) -> FinalizeReport {
        self.finished = true;
        let mut report = FinalizeReport::default();

        let pending = std::mem::take(&mut self.pending);
        for (contract, discovered) in pending.iter() {
            let path = registry::resource_path(&self.options.prefix, contract);

            let previous = match store.read(&path) {
                Ok(previous) => previous,
                Err(e) => {
                    self.report(Diagnostic::error(format!(
                        "Failed to load existing service definition files: {path}: {e}"
                    )));
                    report.failed.push(contract.clone());
                    continue;
                }
            };

            let mut merged = Registry::new();
            merged.extend(contract, discovered.iter().cloned());
            if let Some(text) = previous.as_deref() {
                let prior = self.parse_prior(&path, text);
                merged.extend(contract, prior);
            }

            let rendered = merged.render(contract);
            if previous.as_deref() == Some(rendered.as_str()) {
                debug!("{} is up to date", path);
                report.unchanged.push(contract.clone());
                continue;
            }

            self.report(Diagnostic::note(format!("Writing {path}")));
            match store.write(&path, &rendered) {
                Ok(()) => report.written.push(contract.clone()),
                Err(e) => {
                    self.report(Diagnostic::error(format!(
                        "Failed to write service definition files: {path}: {e}"
                    )));
                    report.failed.push(contract.clone());
                }
            }
        }

        info!(
            "Finalized bindings: {} written, {} unchanged, {} failed",
            report.written.len(),
            report.unchanged.len(),
            report.failed.len()
        );
        report
    }

    fn parse_prior(&mut self, path: &str, text: &str) -> Vec<ImplementationName> {
        let mut prior = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let Some(entry) = registry::parse_line(line) else {
                continue;
            };
            match ImplementationName::new(entry) {
                Ok(name) => prior.push(name),
                Err(e) => self.report(Diagnostic::warning(format!(
                    "Dropping malformed entry in {path}:{}: {e}",
                    index + 1
                ))),
            }
        }
        prior
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Error => error!("{diagnostic}"),
            Level::Warning => warn!("{diagnostic}"),
            Level::Note => info!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }
}
