// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use declaration_graph::type_ref::TypeRef;
use serde::{Deserialize, Serialize};

/// The type used to represent a value on the wire, after adapters and container narrowing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    Single(TypeRef),
    Collection(TypeRef),
}

impl WireType {
    pub fn element(&self) -> &TypeRef {
        match self {
            WireType::Single(typ) | WireType::Collection(typ) => typ,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, WireType::Collection(_))
    }
}

impl Display for WireType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WireType::Single(typ) => write!(f, "{typ}"),
            WireType::Collection(typ) => write!(f, "collection of {typ}"),
        }
    }
}

/// A converter together with the pair of types it maps between
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterType {
    /// Qualified name of the converter declaration
    pub adapter: String,
    /// The domain type the converter consumes (erased)
    pub adapted_type: TypeRef,
    /// The wire type the converter produces
    pub adapting_type: TypeRef,
}

impl AdapterType {
    /// Whether the converter maps a type onto itself
    pub fn is_identity(&self) -> bool {
        self.adapted_type.erasure() == self.adapting_type.erasure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn identity_adapter() {
        let adapter = AdapterType {
            adapter: "a.TrimAdapter".into(),
            adapted_type: TypeRef::declared("java.lang.String"),
            adapting_type: TypeRef::declared("java.lang.String"),
        };
        assert!(adapter.is_identity());

        let adapter = AdapterType {
            adapting_type: TypeRef::declared("a.Dto"),
            ..adapter
        };
        assert!(!adapter.is_identity());
    }

    #[multiplatform_test]
    fn display() {
        assert_eq!(
            WireType::Collection(TypeRef::declared("a.ThingDto")).to_string(),
            "collection of a.ThingDto"
        );
    }
}
