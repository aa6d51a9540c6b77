// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use schema_model::{schema::SchemaModel, validation::ValidationResult};

use super::Validator;
use crate::util::join_words;

/// At most one catch-all value per enum, and distinct wire labels
pub struct EnumValues;

impl Validator for EnumValues {
    fn rule(&self) -> &'static str {
        "enum-values"
    }

    fn validate(&self, model: &SchemaModel, result: &mut ValidationResult) {
        let rule = self.rule();

        for definition in model.type_definitions() {
            let values = definition.enum_values();

            let defaults: Vec<_> = values.iter().filter(|value| value.is_default).collect();
            if defaults.len() > 1 {
                let names: Vec<_> = defaults.iter().map(|value| value.name.as_str()).collect();
                result.add_error(
                    rule,
                    format!(
                        "Enum {}: only one value can be the default, found {}",
                        definition.qualified_name,
                        join_words(&names, "and")
                    ),
                    &defaults.iter().map(|value| value.span).collect::<Vec<_>>(),
                );
            }

            let mut labels = HashMap::new();
            for value in values {
                if let Some(first) = labels.insert(&value.wire_label, value) {
                    result.add_error(
                        rule,
                        format!(
                            "Enum {}: {} and {} have the same wire label '{}'",
                            definition.qualified_name, first.name, value.name, value.wire_label
                        ),
                        &[value.span, first.span],
                    );
                }
            }
        }
    }
}
