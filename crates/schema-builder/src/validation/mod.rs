// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Model validation.
//!
//! Each [`Validator`] checks one rule over the whole model and records what it finds into its own
//! [`ValidationResult`]. Units never stop each other; the pipeline aggregates their results in a
//! fixed order.

mod accessor_names;
mod attributes;
mod bean_names;
mod containers;
mod endpoints;
mod enums;

pub use accessor_names::UniqueAccessorNames;
pub use attributes::AttributeSimpleType;
pub use bean_names::UniqueBeanNames;
pub use containers::ContainerPlacement;
pub use endpoints::EndpointOperations;
pub use enums::EnumValues;

use schema_model::{schema::SchemaModel, validation::ValidationResult};
use tracing::{debug, info};

use crate::config::BuilderConfig;

pub trait Validator {
    /// Stable id of the rule, used in diagnostics and to disable the rule through configuration
    fn rule(&self) -> &'static str;

    fn validate(&self, model: &SchemaModel, result: &mut ValidationResult);
}

pub struct ValidatorPipeline {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorPipeline {
    pub fn new() -> Self {
        Self { validators: vec![] }
    }

    /// The built-in rules, in the order they run
    pub fn standard() -> Self {
        Self::new()
            .with(EndpointOperations)
            .with(UniqueBeanNames)
            .with(UniqueAccessorNames)
            .with(ContainerPlacement)
            .with(AttributeSimpleType)
            .with(EnumValues)
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn push(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn run(&self, model: &SchemaModel, config: &BuilderConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        for validator in &self.validators {
            let rule = validator.rule();
            if !config.is_rule_enabled(rule) {
                debug!("Skipping disabled rule {rule}");
                continue;
            }

            let mut unit_result = ValidationResult::new();
            validator.validate(model, &mut unit_result);
            debug!(
                "Rule {rule}: {} error(s), {} warning(s)",
                unit_result.errors().len(),
                unit_result.warnings().len()
            );
            result.aggregate(unit_result);
        }

        info!(
            "Validation finished with {} error(s) and {} warning(s)",
            result.errors().len(),
            result.warnings().len()
        );

        result
    }
}

impl Default for ValidatorPipeline {
    fn default() -> Self {
        Self::standard()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use declaration_graph::{
        metadata::{MetadataValue, keys},
        test_support::*,
    };
    use multiplatform_test::multiplatform_test;

    struct NoOperations;

    impl Validator for NoOperations {
        fn rule(&self) -> &'static str {
            "no-operations"
        }

        fn validate(&self, model: &SchemaModel, result: &mut ValidationResult) {
            for endpoint in &model.endpoints {
                result.add_error(
                    self.rule(),
                    format!("{} is not allowed", endpoint.qualified_name),
                    &[],
                );
            }
        }
    }

    fn service_graph() -> declaration_graph::graph::DeclarationGraph {
        graph(
            vec![class("a.Service").meta(keys::WEB_SERVICE, MetadataValue::Marker)],
            vec![],
        )
    }

    #[multiplatform_test]
    fn units_aggregate() {
        let model = test_util::build_model(&service_graph());
        let pipeline = ValidatorPipeline::standard().with(NoOperations);

        let result = pipeline.run(&model, &BuilderConfig::default());
        insta::assert_debug_snapshot!(test_util::render(result), @r#"
        [
            "error [no-operations] a.Service is not allowed",
            "warning [endpoint-operations] Endpoint a.Service has no operations",
        ]
        "#);
    }

    #[multiplatform_test]
    fn disabled_rules() {
        let model = test_util::build_model(&service_graph());
        let pipeline = ValidatorPipeline::standard().with(NoOperations);
        let config = BuilderConfig {
            disabled_rules: ["no-operations".to_string(), "endpoint-operations".to_string()]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let result = pipeline.run(&model, &config);
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
    }
}
