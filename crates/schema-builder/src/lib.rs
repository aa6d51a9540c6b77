// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolution of a declaration graph into a schema model.
//!
//! A pass runs in three stages: metadata conformance (all problems reported together), resolution
//! (fails fast on malformed adapters, properties and property orders), and validation of the
//! resolved model through a pipeline of independent rules.

mod accessor;
mod adapter;
pub mod config;
mod context;
mod endpoint;
pub mod error;
mod narrowing;
mod registry;
mod system;
mod type_context;
mod util;
pub mod validation;

pub use adapter::AdapterSite;
pub use context::ResolutionContext;
pub use system::{SchemaSystem, emit_diagnostics};
pub use type_context::TypeVariableContext;
