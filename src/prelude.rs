//! # flowscope Prelude
//!
//! The types most programs need to build, compile and run a flowchart. Import with
//! `use flowscope::prelude::*;`.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all flowscope operations
pub use crate::Error;

/// The result type used throughout flowscope
pub use crate::Result;

// ================================================================================================
// Flowchart Model
// ================================================================================================

/// Diagram container, builder, nodes and edges
pub use crate::flowchart::{BranchLabel, Diagram, DiagramBuilder, FlowEdge, FlowNode, NodeKind};

// ================================================================================================
// Expressions
// ================================================================================================

/// Tokens, variables and values
pub use crate::expression::{
    Binding, Bindings, Element, Expression, FunctionName, Operator, Value, Variable, VariableType,
};

/// Evaluation entry points
pub use crate::expression::{assign, evaluate_condition, evaluate_value};

// ================================================================================================
// Analysis and Compilation
// ================================================================================================

/// Control-flow graph and loops
pub use crate::analysis::{FlowCfg, LoopForest, LoopRegion, LoopType};

/// Compiler facade
pub use crate::codegen::{compile, Compilation, CompileOptions, Compiler, EmitterConfig};

// ================================================================================================
// Runtime
// ================================================================================================

/// Stepping interpreter
pub use crate::runtime::{Execution, ExecutionConfig, InputSource, ScriptedInput, StepEvent};
