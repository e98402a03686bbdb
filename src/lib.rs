//! # Marketflow
//!
//! Marketflow is a lightweight marketing-content workflow engine written in Rust.
//! It turns a free-text campaign goal into a directed acyclic graph of content
//! stages, plans that graph into sequential execution phases, and runs every
//! stage of a phase concurrently against a pluggable stage runner.
//!
//! ## Core Features
//!
//! - **Goal Analysis**: keyword-table classification of a campaign goal into a
//!   category and an ordered stage module list
//! - **Workflow Planning**: static dependency resolution, topological ordering
//!   with fail-fast cycle detection, and heuristic phase grouping
//! - **Async Execution**: phases run strictly in sequence while the stages
//!   inside a phase run concurrently on `tokio`
//! - **Pluggable Runners**: deterministic mock stages for tests and demos, or
//!   a live HTTP content-generation backend
//! - **Pluggable Storage**: in-memory snapshots (testing) or one JSON file per
//!   workflow on disk (durable)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marketflow::{EngineBuilder, GenerateRequest};
//!
//! let engine = EngineBuilder::new().build()?;
//! engine.launch();
//!
//! let workflow = engine.generate(GenerateRequest::new("Launch my new SaaS product"))?;
//! engine.execute(&workflow.id)?;
//!
//! // poll until done
//! let status = engine.status(&workflow.id)?;
//! ```

mod analyzer;
mod builder;
mod catalog;
mod common;
mod config;
mod engine;
mod error;
mod events;
pub mod http;
mod model;
mod planner;
mod runner;
mod runtime;
mod store;
mod utils;
mod workflow;

use std::sync::{Arc, RwLock};

pub use analyzer::{Complexity, GoalAnalysis, GoalCategory, analyze};
pub use builder::EngineBuilder;
pub use catalog::{ModuleKind, StageCategory, StageTemplate};
pub use config::{Config, FsConfig, RunnerMode, ServerConfig, StoreType};
pub use engine::{Engine, GenerateRequest, Preferences};
pub use error::MarketflowError;
pub use model::*;
pub use runner::{HttpRunner, MockRunner, StageOutput, StageRunner, StageStatus};
pub use runtime::{ChannelEvent, ChannelOptions, ControlAction, ExecutionStatus, RunState};

/// Result type alias for Marketflow operations.
pub type Result<T> = std::result::Result<T, MarketflowError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
