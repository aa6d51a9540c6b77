// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The declaration graph: statically declared types, their members and the metadata attached to
//! them, as supplied by a front end.

pub mod conformance;
pub mod declaration;
pub mod graph;
pub mod metadata;
pub mod type_ref;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
