// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Service endpoints and their operations.

use declaration_graph::{
    declaration::{HasMetadata, MemberDeclaration, MemberKind, TypeDeclaration},
    metadata::{Metadata, MetadataValue, keys},
    type_ref::{TypeRef, package_name, simple_name},
};
use heck::ToUpperCamelCase;
use schema_model::endpoint::{Endpoint, Fault, MessagePart, Operation, ParameterStyle};
use tracing::{debug, instrument};

use crate::{context::ResolutionContext, error::ModelBuildingError};

impl<'g> ResolutionContext<'g> {
    /// All declarations marked as web services (and not excluded), in name order
    #[instrument(skip_all)]
    pub fn resolve_endpoints(&mut self) -> Result<Vec<Endpoint>, ModelBuildingError> {
        let graph = self.graph;
        let config = self.config;

        graph
            .types()
            .filter(|declaration| {
                declaration.has_marker(keys::WEB_SERVICE)
                    && !config.is_excluded(&declaration.qualified_name)
            })
            .map(|declaration| self.resolve_endpoint(declaration))
            .collect()
    }

    fn resolve_endpoint(
        &mut self,
        declaration: &'g TypeDeclaration,
    ) -> Result<Endpoint, ModelBuildingError> {
        let default_style = parameter_style(&declaration.metadata, ParameterStyle::Wrapped)?;

        let operations = declaration
            .members
            .iter()
            .filter(|member| {
                matches!(member.kind, MemberKind::Method { .. })
                    && member.is_public()
                    && !member.is_static
                    && !member.has_marker(keys::EXCLUDE)
            })
            .map(|method| self.resolve_operation(declaration, method, default_style))
            .collect::<Result<Vec<_>, _>>()?;

        let service_name = declaration
            .get_metadata(keys::NAME)
            .and_then(MetadataValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}Service", declaration.simple_name()));

        debug!(
            "Added endpoint {} with {} operation(s)",
            declaration.qualified_name,
            operations.len()
        );

        Ok(Endpoint {
            qualified_name: declaration.qualified_name.clone(),
            service_name,
            namespace: self.type_namespace(declaration),
            operations,
            span: declaration.span,
        })
    }

    fn resolve_operation(
        &mut self,
        declaration: &'g TypeDeclaration,
        method: &'g MemberDeclaration,
        default_style: ParameterStyle,
    ) -> Result<Operation, ModelBuildingError> {
        let style = parameter_style(&method.metadata, default_style)?;
        let site = format!("{}.{}", declaration.qualified_name, method.name);
        let package = declaration.package.as_str();

        let parameters = method
            .parameters()
            .iter()
            .map(|param| {
                self.message_part(
                    &param.name,
                    &param.typ,
                    &param.metadata,
                    package,
                    &format!("{site}({})", param.name),
                )
                .map(|part| MessagePart {
                    span: param.span,
                    ..part
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let result = match method.value_type() {
            Some(return_type) if !return_type.is_void() => Some(MessagePart {
                span: method.span,
                ..self.message_part("return", return_type, &method.metadata, package, &site)?
            }),
            _ => None,
        };

        let faults = method
            .throws()
            .iter()
            .filter_map(TypeRef::name)
            .map(|exception| Fault {
                exception: exception.to_string(),
                bean_name: self.fault_bean_name(exception),
            })
            .collect();

        let wrapper_name = |key: &str, suffix: &str| {
            method
                .get_metadata(key)
                .and_then(MetadataValue::as_str)
                .map(str::to_string)
                .or_else(|| {
                    (style == ParameterStyle::Wrapped).then(|| {
                        format!(
                            "{}.jaxws.{}{suffix}",
                            declaration.package,
                            method.name.to_upper_camel_case()
                        )
                    })
                })
        };

        Ok(Operation {
            method_name: method.name.clone(),
            operation_name: method
                .get_metadata(keys::OPERATION_NAME)
                .and_then(MetadataValue::as_str)
                .unwrap_or(&method.name)
                .to_string(),
            style,
            parameters,
            result,
            faults,
            request_wrapper: wrapper_name(keys::REQUEST_WRAPPER, ""),
            response_wrapper: wrapper_name(keys::RESPONSE_WRAPPER, "Response"),
            span: method.span,
        })
    }

    fn message_part(
        &mut self,
        default_name: &str,
        declared: &TypeRef,
        metadata: &Metadata,
        package: &str,
        site: &str,
    ) -> Result<MessagePart, ModelBuildingError> {
        let declared_type = self.root_context().resolve(declared);
        let (wire_type, adapter) =
            self.wire_type(&declared_type, Some(metadata), Some(package), site)?;

        let header = metadata
            .get(keys::HEADER)
            .and_then(MetadataValue::as_bool)
            .unwrap_or(false);

        Ok(MessagePart {
            name: metadata
                .get(keys::NAME)
                .and_then(MetadataValue::as_str)
                .unwrap_or(default_name)
                .to_string(),
            declared_type,
            wire_type,
            adapter,
            header,
            span: None,
        })
    }

    fn fault_bean_name(&self, exception: &str) -> String {
        self.graph
            .get_type(exception)
            .and_then(|declaration| declaration.get_metadata(keys::FAULT_BEAN))
            .and_then(MetadataValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{}.jaxws.{}Bean",
                    package_name(exception),
                    simple_name(exception)
                )
            })
    }
}

fn parameter_style(
    metadata: &Metadata,
    default: ParameterStyle,
) -> Result<ParameterStyle, ModelBuildingError> {
    match metadata.get(keys::PARAMETER_STYLE).and_then(MetadataValue::as_str) {
        None => Ok(default),
        Some("wrapped") => Ok(ParameterStyle::Wrapped),
        Some("bare") => Ok(ParameterStyle::Bare),
        Some(other) => Err(ModelBuildingError::Config(format!(
            "Invalid parameter style '{other}' (expected 'wrapped' or 'bare')"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use declaration_graph::{declaration::Visibility, test_support::*};
    use multiplatform_test::multiplatform_test;
    use schema_model::wire::WireType;

    fn style(value: &str) -> MetadataValue {
        MetadataValue::String(value.to_string())
    }

    #[multiplatform_test]
    fn operations() {
        let graph = graph(
            vec![
                class("a.OrderService")
                    .meta(keys::WEB_SERVICE, MetadataValue::Marker)
                    .member(
                        method(
                            "findOrders",
                            TypeRef::generic("java.util.List", vec![TypeRef::declared("a.Order")]),
                            vec![
                                param("customer", string()),
                                param_with(
                                    "token",
                                    string(),
                                    &[(keys::HEADER, MetadataValue::Marker)],
                                ),
                            ],
                        )
                        .throws(TypeRef::declared("a.OrderException")),
                    )
                    .member(
                        method("cancel", TypeRef::Void, vec![param("id", string())])
                            .meta(keys::OPERATION_NAME, style("cancelOrder"))
                            .meta(keys::PARAMETER_STYLE, style("bare")),
                    )
                    .member(
                        method("internal", TypeRef::Void, vec![]).visibility(Visibility::Private),
                    )
                    .member(
                        method("ping", TypeRef::Void, vec![])
                            .meta(keys::EXCLUDE, MetadataValue::Marker),
                    ),
                class("a.Order"),
                class("a.OrderException")
                    .meta(keys::FAULT_BEAN, style("a.faults.OrderFault")),
            ],
            vec![],
        );
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let endpoints = context.resolve_endpoints().unwrap();
        assert_eq!(endpoints.len(), 1);

        let endpoint = &endpoints[0];
        assert_eq!(endpoint.service_name, "OrderServiceService");

        let names: Vec<_> = endpoint
            .operations
            .iter()
            .map(|operation| operation.operation_name.as_str())
            .collect();
        assert_eq!(names, vec!["findOrders", "cancelOrder"]);

        let find = &endpoint.operations[0];
        assert_eq!(find.style, ParameterStyle::Wrapped);
        assert_eq!(find.request_wrapper.as_deref(), Some("a.jaxws.FindOrders"));
        assert_eq!(find.response_wrapper.as_deref(), Some("a.jaxws.FindOrdersResponse"));
        assert_eq!(find.body_parameters().count(), 1);
        assert_eq!(
            find.result.as_ref().map(|result| &result.wire_type),
            Some(&WireType::Collection(TypeRef::declared("a.Order")))
        );
        assert_eq!(find.faults[0].bean_name, "a.faults.OrderFault");

        let cancel = &endpoint.operations[1];
        assert_eq!(cancel.style, ParameterStyle::Bare);
        assert!(cancel.request_wrapper.is_none());
        assert!(cancel.result.is_none());
    }

    #[multiplatform_test]
    fn default_fault_bean() {
        let graph = graph(
            vec![
                class("a.Service")
                    .meta(keys::WEB_SERVICE, MetadataValue::Marker)
                    .member(
                        method("run", TypeRef::Void, vec![])
                            .throws(TypeRef::declared("b.Failure")),
                    ),
            ],
            vec![],
        );
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let endpoints = context.resolve_endpoints().unwrap();
        assert_eq!(
            endpoints[0].operations[0].faults[0].bean_name,
            "b.jaxws.FailureBean"
        );
    }

    #[multiplatform_test]
    fn invalid_parameter_style() {
        let graph = graph(
            vec![
                class("a.Service")
                    .meta(keys::WEB_SERVICE, MetadataValue::Marker)
                    .meta(keys::PARAMETER_STYLE, style("rpc")),
            ],
            vec![],
        );
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        assert!(matches!(
            context.resolve_endpoints(),
            Err(ModelBuildingError::Config(_))
        ));
    }
}
