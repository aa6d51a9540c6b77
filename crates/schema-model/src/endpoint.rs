// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use codemap::Span;
use declaration_graph::type_ref::TypeRef;
use serde::{Deserialize, Serialize};

use crate::wire::{AdapterType, WireType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterStyle {
    /// Parameters are wrapped in a generated request bean
    Wrapped,
    /// The single parameter is the whole message
    Bare,
}

/// A declaration exposed as a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub qualified_name: String,
    pub service_name: String,
    pub namespace: String,
    pub operations: Vec<Operation>,
    #[serde(skip)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub method_name: String,
    pub operation_name: String,
    pub style: ParameterStyle,
    pub parameters: Vec<MessagePart>,
    pub result: Option<MessagePart>,
    pub faults: Vec<Fault>,
    /// Generated request bean (wrapped style, or explicitly named)
    pub request_wrapper: Option<String>,
    /// Generated response bean (wrapped style, or explicitly named)
    pub response_wrapper: Option<String>,
    #[serde(skip)]
    pub span: Option<Span>,
}

/// A parameter or the result of an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePart {
    pub name: String,
    pub declared_type: TypeRef,
    pub wire_type: WireType,
    pub adapter: Option<AdapterType>,
    pub header: bool,
    #[serde(skip)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fault {
    /// Qualified name of the declared exception
    pub exception: String,
    /// Qualified name of the generated fault bean
    pub bean_name: String,
}

impl Operation {
    /// Parameters that make up the message body
    pub fn body_parameters(&self) -> impl Iterator<Item = &MessagePart> {
        self.parameters.iter().filter(|param| !param.header)
    }
}
