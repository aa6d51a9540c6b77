// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use codemap::Span;
use schema_model::{schema::SchemaModel, validation::ValidationResult};

use super::Validator;
use crate::util::join_words;

/// Generated beans (request/response wrappers and fault beans) need distinct names across the model
pub struct UniqueBeanNames;

struct BeanOrigin {
    description: String,
    span: Option<Span>,
}

impl Validator for UniqueBeanNames {
    fn rule(&self) -> &'static str {
        "unique-bean-names"
    }

    fn validate(&self, model: &SchemaModel, result: &mut ValidationResult) {
        // The same exception always maps to the same bean, so origins are deduplicated by
        // description
        let mut beans: BTreeMap<String, Vec<BeanOrigin>> = BTreeMap::new();
        let mut add = |bean: &str, description: String, span: Option<Span>| {
            let origins = beans.entry(bean.to_string()).or_default();
            if !origins.iter().any(|origin| origin.description == description) {
                origins.push(BeanOrigin { description, span });
            }
        };

        for endpoint in &model.endpoints {
            for operation in &endpoint.operations {
                let method = format!("{}.{}", endpoint.qualified_name, operation.method_name);

                if let Some(request) = &operation.request_wrapper {
                    add(request, format!("the request wrapper of {method}"), operation.span);
                }
                if let Some(response) = &operation.response_wrapper {
                    add(response, format!("the response wrapper of {method}"), operation.span);
                }
                for fault in &operation.faults {
                    add(
                        &fault.bean_name,
                        format!("the fault bean of {}", fault.exception),
                        operation.span,
                    );
                }
            }
        }

        for (bean, origins) in beans {
            if origins.len() < 2 {
                continue;
            }

            let descriptions: Vec<_> = origins
                .iter()
                .map(|origin| origin.description.as_str())
                .collect();
            let spans: Vec<_> = origins.iter().map(|origin| origin.span).collect();

            result.add_error(
                self.rule(),
                format!(
                    "Generated bean {bean} is claimed by {}",
                    join_words(&descriptions, "and")
                ),
                &spans,
            );
        }
    }
}
