//! Driver for the interop preparation pass.
//!
//! Runs [`jsi_prep::prepare_unit`] over every compilation unit of a
//! compilation, in parallel when asked to, and collects the per-unit results
//! in input order. Internal defects of the pass become `E9001` diagnostics on
//! the unit that triggered them; the other units are unaffected.

mod render;

use std::sync::Once;

use jsi_diagnostic::{Diagnostic, ErrorGuaranteed};
use jsi_ir::Tree;
use jsi_prep::{OptionError, PrepConfig, PrepEnv};
use rayon::prelude::*;

pub use render::render_diagnostics;

/// Worker stack size. The traversal recurses once per tree level and grows
/// its stack on demand, so this only bounds how often it has to.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// A type-checked compilation unit.
#[derive(Debug)]
pub struct SourceUnit {
    /// Path or other name shown in rendered diagnostics.
    pub name: String,
    pub tree: Tree,
}

/// Options of a whole preparation run.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PrepareOptions {
    pub prep: PrepConfig,
    /// Prepare units on a thread pool.
    pub parallel: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        PrepareOptions {
            prep: PrepConfig::default(),
            parallel: true,
        }
    }
}

impl PrepareOptions {
    /// Build options from plugin-style pass options.
    pub fn from_options<'o>(options: impl IntoIterator<Item = &'o str>) -> Result<Self, OptionError> {
        Ok(PrepareOptions {
            prep: PrepConfig::from_options(options)?,
            ..PrepareOptions::default()
        })
    }
}

/// Outcome of preparing one unit.
#[derive(Debug)]
pub struct UnitResult {
    pub name: String,
    /// The prepared tree; `None` if the pass hit an internal error.
    pub tree: Option<Tree>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitResult {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Outcome of a preparation run, one entry per input unit in input order.
#[derive(Debug, Default)]
pub struct PrepareSummary {
    pub units: Vec<UnitResult>,
}

impl PrepareSummary {
    pub fn error_count(&self) -> usize {
        self.units.iter().map(UnitResult::error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.units
            .iter()
            .flat_map(|unit| &unit.diagnostics)
            .filter(|d| !d.is_error())
            .count()
    }

    /// Proof that some unit failed, if one did.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count())
    }
}

/// Prepare every unit of a compilation.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn prepare_units(units: Vec<SourceUnit>, env: PrepEnv<'_>, options: PrepareOptions) -> PrepareSummary {
    let config = options.prep;
    let results = if options.parallel && units.len() > 1 {
        run_parallel(units, env, config)
    } else {
        units.into_iter().map(|unit| prepare_one(unit, env, config)).collect()
    };

    let summary = PrepareSummary { units: results };
    tracing::debug!(
        errors = summary.error_count(),
        warnings = summary.warning_count(),
        "preparation finished"
    );
    summary
}

fn run_parallel(units: Vec<SourceUnit>, env: PrepEnv<'_>, config: PrepConfig) -> Vec<UnitResult> {
    match rayon::ThreadPoolBuilder::new().stack_size(WORKER_STACK_SIZE).build() {
        Ok(pool) => pool.install(|| {
            units
                .into_par_iter()
                .map(|unit| prepare_one(unit, env, config))
                .collect()
        }),
        Err(e) => {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            units.into_iter().map(|unit| prepare_one(unit, env, config)).collect()
        }
    }
}

fn prepare_one(unit: SourceUnit, env: PrepEnv<'_>, config: PrepConfig) -> UnitResult {
    let span = tracing::debug_span!("unit", name = %unit.name);
    let _guard = span.enter();

    match jsi_prep::prepare_unit(unit.tree, env, config) {
        Ok(output) => UnitResult {
            name: unit.name,
            tree: Some(output.tree),
            diagnostics: output.diagnostics,
        },
        Err(err) => {
            tracing::warn!(error = %err, "internal error in interop preparation");
            UnitResult {
                name: unit.name,
                tree: None,
                diagnostics: vec![err.to_diagnostic()],
            }
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=jsi_prep=debug` or `RUST_LOG=jsi_prep=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
        }
    });
}
