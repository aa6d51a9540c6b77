// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The query surface handed to generators.

use codemap::CodeMap;
use codemap_diagnostic::{ColorConfig, Diagnostic, Emitter};
use declaration_graph::{
    conformance::check_metadata, graph::DeclarationGraph, metadata::MetadataRegistry,
};
use schema_model::{
    endpoint::Endpoint,
    prefixes::NamespacePrefixes,
    schema::{Schema, SchemaModel},
    types::TypeDefinition,
    validation::ValidationResult,
    wire::AdapterType,
};
use tracing::{info, instrument};

use crate::{
    adapter::AdapterSite,
    config::BuilderConfig,
    context::ResolutionContext,
    error::ModelBuildingError,
    validation::{Validator, ValidatorPipeline},
};

/// A resolved schema model together with the context it was resolved in.
///
/// The context keeps its memoized adapters and accessors, so later
/// [`find_adapter`](Self::find_adapter) queries agree with the model.
pub struct SchemaSystem<'g> {
    model: SchemaModel,
    context: ResolutionContext<'g>,
    pipeline: ValidatorPipeline,
}

impl<'g> SchemaSystem<'g> {
    /// Checks the metadata of the graph, then resolves endpoints and assembles the schemas.
    #[instrument(skip_all)]
    pub fn build(
        graph: &'g DeclarationGraph,
        config: &'g BuilderConfig,
    ) -> Result<Self, ModelBuildingError> {
        let diagnostics = check_metadata(graph, MetadataRegistry::standard());
        if !diagnostics.is_empty() {
            return Err(ModelBuildingError::Diagnosis(diagnostics));
        }

        let mut context = ResolutionContext::new(graph, config);
        let endpoints = context.resolve_endpoints()?;
        let model = context.assemble(endpoints)?;

        info!(
            "Built {} schema(s) with {} type definition(s) and {} endpoint(s)",
            model.schemas.len(),
            model.type_definitions().count(),
            model.endpoints.len()
        );

        Ok(Self {
            model,
            context,
            pipeline: ValidatorPipeline::standard(),
        })
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    /// Schemas, ordered by namespace
    pub fn schemas(&self) -> &[Schema] {
        &self.model.schemas
    }

    pub fn schema(&self, namespace: &str) -> Option<&Schema> {
        self.model.schema(namespace)
    }

    pub fn get_type_definition(&self, qualified_name: &str) -> Option<&TypeDefinition> {
        self.model.get_type_definition(qualified_name)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.model.endpoints
    }

    pub fn namespace_prefixes(&self) -> &NamespacePrefixes {
        &self.model.prefixes
    }

    pub fn find_adapter(
        &mut self,
        site: &AdapterSite,
    ) -> Result<Option<AdapterType>, ModelBuildingError> {
        self.context.find_applicable_adapter(site)
    }

    /// Adds a rule that runs after the built-in ones
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.pipeline.push(Box::new(validator));
        self
    }

    pub fn validate(&self) -> ValidationResult {
        self.pipeline.run(&self.model, self.context.config)
    }

    /// Validates the model, failing if any rule reported an error. The warnings of a passing
    /// model are returned.
    pub fn ensure_valid(&self) -> Result<ValidationResult, ModelBuildingError> {
        let result = self.validate();

        if result.has_errors() {
            Err(ModelBuildingError::Diagnosis(result.into_diagnostics()))
        } else {
            Ok(result)
        }
    }
}

/// Renders diagnostics to stderr, with source snippets for spans in `codemap`
pub fn emit_diagnostics(diagnostics: &[Diagnostic], codemap: &CodeMap) {
    let mut emitter = Emitter::stderr(ColorConfig::Auto, Some(codemap));
    emitter.emit(diagnostics);
}
