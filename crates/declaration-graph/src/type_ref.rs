// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A reference to a type as written at a use site (a field type, a super type, a type argument
/// etc.).
///
/// Type references are not resolved: a `Declared` reference names a declaration by its qualified
/// name and may or may not have a counterpart in the declaration graph (built-in scalars, for
/// example, usually don't).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TypeRef {
    Declared {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeRef>,
    },
    Array {
        component: Box<TypeRef>,
    },
    Variable {
        name: String,
    },
    Void,
}

impl TypeRef {
    pub fn declared(name: impl Into<String>) -> Self {
        TypeRef::Declared {
            name: name.into(),
            args: vec![],
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Declared {
            name: name.into(),
            args,
        }
    }

    pub fn array(component: TypeRef) -> Self {
        TypeRef::Array {
            component: Box::new(component),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        TypeRef::Variable { name: name.into() }
    }

    /// The qualified name of a declared type
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Declared { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Declared { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array { .. })
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// The same reference with all type arguments dropped (recursively for array components).
    pub fn erasure(&self) -> TypeRef {
        match self {
            TypeRef::Declared { name, .. } => TypeRef::declared(name.clone()),
            TypeRef::Array { component } => TypeRef::array(component.erasure()),
            other => other.clone(),
        }
    }

    pub fn has_variables(&self) -> bool {
        match self {
            TypeRef::Declared { args, .. } => args.iter().any(TypeRef::has_variables),
            TypeRef::Array { component } => component.has_variables(),
            TypeRef::Variable { .. } => true,
            TypeRef::Void => false,
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Declared { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    let args = args
                        .iter()
                        .map(|arg| arg.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "<{args}>")?;
                }
                Ok(())
            }
            TypeRef::Array { component } => write!(f, "{component}[]"),
            TypeRef::Variable { name } => write!(f, "{name}"),
            TypeRef::Void => write!(f, "void"),
        }
    }
}

/// The last segment of a dotted qualified name (`com.example.Thing` -> `Thing`)
pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map(|(_, simple)| simple)
        .unwrap_or(qualified_name)
}

/// Everything before the last segment of a dotted qualified name (`com.example.Thing` ->
/// `com.example`). The default package is the empty string.
pub fn package_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map(|(package, _)| package)
        .unwrap_or("")
}
