//! Compliance linting and multi-vendor CLI rendering for network devices.
//!
//! Two independent paths share the data shapes in [`netcfg_model`]:
//!
//! - **Read path.** A [`NormalizedConfig`](netcfg_model::NormalizedConfig)
//!   snapshot is evaluated against an ordered list of rules, producing
//!   findings and a severity summary.
//! - **Write path.** A [`CanonicalConfig`](netcfg_model::CanonicalConfig)
//!   intent model is compiled into vendor command sections plus verify and
//!   rollback plans.
//!
//! # Architecture
//!
//! ## Linting
//!
//! - [`lint`]: the rule engine, rule ingestion and finding/summary types
//! - [`predicates`]: named programmatic checks and their registry
//! - [`rulepack`]: rule pack files, the embedded baseline pack and overrides
//!
//! ## Generation
//!
//! - [`render`]: one renderer per vendor, pre-flight checks on intent
//! - [`generate`]: single-intent command templates keyed by vendor and action
//!
//! ## Reporting
//!
//! - [`report`]: terminal-friendly colored output for the CLI
//!
//! # Examples
//!
//! ```ignore
//! use netcfg::lint::{LintContext, LintEngine, TargetType};
//! use netcfg::rulepack::embedded_rule_pack;
//! use netcfg_model::{load_file, NormalizedConfig};
//!
//! let config: NormalizedConfig = load_file("edge-rtr-01.json".as_ref())?;
//! let pack = embedded_rule_pack()?;
//! let engine = LintEngine::with_builtins();
//! let ctx = LintContext::new(&config, "edge-rtr-01", TargetType::Device);
//! let result = engine.evaluate_sync(&pack.rules, &ctx);
//! println!("passed={}", result.summary.passed);
//! ```

pub mod generate;
pub mod lint;
pub mod predicates;
pub mod render;
pub mod report;
pub mod rulepack;
