// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use codemap::Span;
use codemap_diagnostic::{Diagnostic, Level, SpanLabel, SpanStyle};
use thiserror::Error;

/// Errors that stop a resolution pass. Each one means the declaration graph itself is malformed
/// around the named item.
#[derive(Error, Debug)]
pub enum ModelBuildingError {
    #[error("Could not build the schema model")]
    Diagnosis(Vec<Diagnostic>),

    #[error("Adapter {adapter}: {message}")]
    InvalidAdapter { adapter: String, message: String },

    #[error("{site}: adapter {adapter} does not adapt {typ}")]
    AdapterMismatch {
        site: String,
        adapter: String,
        typ: String,
    },

    #[error("{owner}.{property}: a property without a setter must be a collection")]
    MissingSetter { owner: String, property: String },

    #[error(
        "{owner}.{property}: metadata '{key}' is declared on both {first} and {second} with different values"
    )]
    ConflictingMetadata {
        owner: String,
        property: String,
        key: String,
        first: String,
        second: String,
        first_span: Option<Span>,
        second_span: Option<Span>,
    },

    #[error("{owner}: property '{wire_name}' is missing from the explicit property order")]
    PropertyOrder { owner: String, wire_name: String },

    #[error("{site}: type {typ} not found")]
    TypeNotFound { site: String, typ: String },

    #[error("{0}")]
    Config(String),
}

impl ModelBuildingError {
    /// The error as diagnostics for [`emit_diagnostics`](crate::emit_diagnostics), labeling every
    /// source position the error knows about
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        let spans = match &self {
            ModelBuildingError::ConflictingMetadata {
                key,
                first,
                first_span,
                second_span,
                ..
            } => [
                (*first_span, SpanStyle::Secondary, format!("'{key}' first declared on {first}")),
                (*second_span, SpanStyle::Primary, "declared again here".to_string()),
            ]
            .into_iter()
            .filter_map(|(span, style, label)| {
                span.map(|span| SpanLabel {
                    span,
                    style,
                    label: Some(label),
                })
            })
            .collect(),
            _ => vec![],
        };

        match self {
            ModelBuildingError::Diagnosis(diagnostics) => diagnostics,
            other => vec![Diagnostic {
                level: Level::Error,
                message: other.to_string(),
                code: None,
                spans,
            }],
        }
    }
}
