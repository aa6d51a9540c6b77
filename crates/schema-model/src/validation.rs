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

/// Errors and warnings collected while validating a model.
///
/// Adding a problem never fails. Callers decide what to do with the result once every validator
/// has run: any error means the model must not be handed to generators.
#[derive(Debug, Default, Clone)]
pub struct ValidationResult {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, rule: &str, message: impl Into<String>, spans: &[Option<Span>]) {
        self.errors
            .push(diagnostic(Level::Error, rule, message.into(), spans));
    }

    pub fn add_warning(&mut self, rule: &str, message: impl Into<String>, spans: &[Option<Span>]) {
        self.warnings
            .push(diagnostic(Level::Warning, rule, message.into(), spans));
    }

    pub fn aggregate(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Errors followed by warnings
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.errors;
        diagnostics.extend(self.warnings);
        diagnostics
    }
}

fn diagnostic(level: Level, rule: &str, message: String, spans: &[Option<Span>]) -> Diagnostic {
    Diagnostic {
        level,
        message,
        code: Some(rule.to_string()),
        spans: spans
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, span)| SpanLabel {
                span: *span,
                style: if index == 0 {
                    SpanStyle::Primary
                } else {
                    SpanStyle::Secondary
                },
                label: None,
            })
            .collect(),
    }
}
