// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use schema_model::{
    endpoint::{MessagePart, ParameterStyle},
    schema::SchemaModel,
    types::Placement,
    validation::ValidationResult,
};

use super::Validator;

/// Collections only where the wire format can repeat a value
pub struct ContainerPlacement;

impl Validator for ContainerPlacement {
    fn rule(&self) -> &'static str {
        "container-placement"
    }

    fn validate(&self, model: &SchemaModel, result: &mut ValidationResult) {
        let rule = self.rule();

        for definition in model.type_definitions() {
            for accessor in definition.accessors() {
                if accessor.is_collection() && accessor.placement == Placement::Value {
                    result.add_error(
                        rule,
                        format!(
                            "{}.{}: the value of a type cannot be a collection ({})",
                            accessor.owner, accessor.simple_name, accessor.wire_type
                        ),
                        &[accessor.span],
                    );
                }
            }
        }

        for endpoint in &model.endpoints {
            for operation in &endpoint.operations {
                let site = format!("{}.{}", endpoint.qualified_name, operation.method_name);
                let bare = operation.style == ParameterStyle::Bare;

                let mut check = |part: &MessagePart, role: &str| {
                    if !part.wire_type.is_collection() {
                        return;
                    }

                    if part.header {
                        result.add_error(
                            rule,
                            format!("{site}: header {role} '{}' cannot be a collection", part.name),
                            &[part.span],
                        );
                    } else if bare {
                        result.add_error(
                            rule,
                            format!(
                                "{site}: the {role} '{}' of a bare operation cannot be a collection ({})",
                                part.name, part.wire_type
                            ),
                            &[part.span],
                        );
                    }
                };

                for parameter in &operation.parameters {
                    check(parameter, "parameter");
                }
                if let Some(returned) = &operation.result {
                    check(returned, "result");
                }
            }
        }
    }
}
