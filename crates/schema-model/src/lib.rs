// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The resolved schema model read by generators: type definitions grouped into schemas, service
//! endpoints, namespace prefixes and validation results.

pub mod endpoint;
pub mod mapped_arena;
pub mod prefixes;
pub mod schema;
pub mod types;
pub mod validation;
pub mod wire;
