/*
 * PET Patterns - Parallel Pattern Discovery
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (NodeId, SourcePosition, CuNode, edges, facts)
 * - features/    : Vertical slices (pet_graph -> loop passes -> task parallelism -> geometric decomposition)
 * - pipeline/    : Orchestration
 * - config/      : Presets, YAML loading, validation
 *
 * Input is a Program Execution Tree (computational units, functions and
 * loops with CHILD/SUCCESSOR/DATA edges) plus loop trip counts and
 * reduction facts. Output is kind-tagged suggestion records.
 */

#![allow(clippy::module_inception)] // feature/domain naming
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::too_many_arguments)] // Fixture builders take full node shapes

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (graph model and pattern detectors)
pub mod features;

/// Detection orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{DetectionConfig, Preset};
pub use errors::{PatternError, Result};
pub use features::pet_graph::{CuRecord, DependenceRecord, IngestReport, PetGraph, PetGraphBuilder, PetInput};
pub use pipeline::{analyze, DetectionReport, DetectionStats, PatternDetector, PatternSuggestion};
pub use shared::models::{AnalysisFacts, LoopIterationTable, NodeId, NodeKind, ReductionFact, SourcePosition};
