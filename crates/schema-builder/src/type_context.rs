// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Substitution of type variables while walking up an inheritance chain.
//!
//! A context is a persistent stack of frames, each binding the formal type parameters of one
//! declaration to the actual arguments seen from below. Pushing returns a new context and leaves
//! the original untouched, so sibling branches of a walk (super type and interfaces) can extend the
//! same context independently.

use std::{collections::HashMap, rc::Rc};

use declaration_graph::type_ref::TypeRef;

#[derive(Debug)]
struct Frame {
    bindings: HashMap<String, TypeRef>,
    parent: Option<Rc<Frame>>,
}

#[derive(Debug, Clone)]
pub struct TypeVariableContext {
    head: Option<Rc<Frame>>,
    /// Substituted for variables without a binding
    fallback: TypeRef,
}

impl TypeVariableContext {
    pub fn new(root_type: &str) -> Self {
        Self {
            head: None,
            fallback: TypeRef::declared(root_type),
        }
    }

    /// Binds `formals` to `actuals`. Actuals are resolved against this context first; formals
    /// without an actual (a raw reference) bind to the root type.
    pub fn push(&self, formals: &[String], actuals: &[TypeRef]) -> Self {
        let bindings = formals
            .iter()
            .enumerate()
            .map(|(index, formal)| {
                let actual = actuals
                    .get(index)
                    .map(|actual| self.resolve(actual))
                    .unwrap_or_else(|| self.fallback.clone());
                (formal.clone(), actual)
            })
            .collect();

        Self {
            head: Some(Rc::new(Frame {
                bindings,
                parent: self.head.clone(),
            })),
            fallback: self.fallback.clone(),
        }
    }

    /// Replaces every variable with its innermost binding. The result never contains a variable.
    pub fn resolve(&self, typ: &TypeRef) -> TypeRef {
        match typ {
            TypeRef::Declared { name, args } => TypeRef::Declared {
                name: name.clone(),
                args: args.iter().map(|arg| self.resolve(arg)).collect(),
            },
            TypeRef::Array { component } => TypeRef::array(self.resolve(component)),
            TypeRef::Variable { name } => self
                .lookup(name)
                .cloned()
                .unwrap_or_else(|| self.fallback.clone()),
            TypeRef::Void => TypeRef::Void,
        }
    }

    fn lookup(&self, name: &str) -> Option<&TypeRef> {
        let mut frame = self.head.as_deref();
        while let Some(current) = frame {
            if let Some(binding) = current.bindings.get(name) {
                return Some(binding);
            }
            frame = current.parent.as_deref();
        }
        None
    }
}
