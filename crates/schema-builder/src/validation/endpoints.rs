// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use schema_model::{endpoint::ParameterStyle, schema::SchemaModel, validation::ValidationResult};

use super::Validator;

/// Operation names are unique within an endpoint, and bare operations have at most one body part
pub struct EndpointOperations;

impl Validator for EndpointOperations {
    fn rule(&self) -> &'static str {
        "endpoint-operations"
    }

    fn validate(&self, model: &SchemaModel, result: &mut ValidationResult) {
        let rule = self.rule();

        for endpoint in &model.endpoints {
            if endpoint.operations.is_empty() {
                result.add_warning(
                    rule,
                    format!("Endpoint {} has no operations", endpoint.qualified_name),
                    &[endpoint.span],
                );
            }

            let mut seen = HashMap::new();
            for operation in &endpoint.operations {
                if let Some(first) = seen.insert(&operation.operation_name, operation) {
                    result.add_error(
                        rule,
                        format!(
                            "Endpoint {}: methods {} and {} both define operation '{}'",
                            endpoint.qualified_name,
                            first.method_name,
                            operation.method_name,
                            operation.operation_name
                        ),
                        &[operation.span, first.span],
                    );
                }

                if operation.style != ParameterStyle::Bare {
                    continue;
                }

                let body_parameters = operation.body_parameters().count();
                if body_parameters > 1 {
                    result.add_error(
                        rule,
                        format!(
                            "{}.{}: a bare operation can have at most one body parameter, found {body_parameters}",
                            endpoint.qualified_name, operation.method_name
                        ),
                        &[operation.span],
                    );
                }

                if operation.request_wrapper.is_some() || operation.response_wrapper.is_some() {
                    result.add_warning(
                        rule,
                        format!(
                            "{}.{}: wrapper beans are ignored for bare operations",
                            endpoint.qualified_name, operation.method_name
                        ),
                        &[operation.span],
                    );
                }
            }
        }
    }
}
