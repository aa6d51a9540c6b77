// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Converters (adapters) that substitute a domain type with a different wire type.

use std::fmt::{Display, Formatter};

use declaration_graph::{
    declaration::HasMetadata,
    metadata::{Metadata, MetadataValue, keys},
    type_ref::TypeRef,
};
use schema_model::wire::{AdapterType, WireType};
use tracing::debug;

use crate::{context::ResolutionContext, error::ModelBuildingError, util::join_words};

/// A place whose type may be adapted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterSite {
    /// A resolved accessor, by property or member name
    Accessor { owner: String, member: String },
    MethodReturn { owner: String, method: String },
    MethodParameter {
        owner: String,
        method: String,
        parameter: String,
    },
    /// A bare type declaration
    Type(String),
}

impl Display for AdapterSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterSite::Accessor { owner, member }
            | AdapterSite::MethodReturn {
                owner,
                method: member,
            } => write!(f, "{owner}.{member}"),
            AdapterSite::MethodParameter {
                owner,
                method,
                parameter,
            } => write!(f, "{owner}.{method}({parameter})"),
            AdapterSite::Type(name) => write!(f, "{name}"),
        }
    }
}

impl<'g> ResolutionContext<'g> {
    /// Determines the (adapted, adapting) pair a converter implements.
    ///
    /// Walks the converter's ancestors, binding type arguments at each step, until one of the
    /// configured converter contracts is found.
    pub fn resolve_adapter(
        &mut self,
        adapter: &TypeRef,
    ) -> Result<AdapterType, ModelBuildingError> {
        let key = adapter.to_string();
        if let Some(resolved) = self.adapters.get(&key) {
            return Ok(resolved.clone());
        }

        let invalid = |message: String| ModelBuildingError::InvalidAdapter {
            adapter: key.clone(),
            message,
        };

        let Some(name) = adapter.name() else {
            return Err(invalid("a converter must be a declared type".to_string()));
        };

        if self.graph.get_type(name).is_none() {
            return Err(invalid("declaration not found".to_string()));
        }

        let config = self.config;
        for contract in config.converters.iter() {
            let Some(converter) = self.find_supertype(adapter, &contract.interface) else {
                continue;
            };

            let args = converter.args();
            let (Some(adapted), Some(adapting), 2) = (
                args.get(contract.adapted_index),
                args.get(contract.adapting_index),
                args.len(),
            ) else {
                return Err(invalid(format!(
                    "{} must specify both a value type and a bound type",
                    contract.interface
                )));
            };

            let resolved = AdapterType {
                adapter: name.to_string(),
                adapted_type: adapted.erasure(),
                adapting_type: adapting.clone(),
            };

            debug!(
                "Resolved adapter {name}: {} -> {}",
                resolved.adapted_type, resolved.adapting_type
            );

            self.adapters.insert(key.clone(), resolved.clone());
            return Ok(resolved);
        }

        let contracts: Vec<_> = config
            .converters
            .iter()
            .map(|contract| contract.interface.as_str())
            .collect();
        Err(invalid(format!(
            "is not an instance of {}",
            join_words(&contracts, "or")
        )))
    }

    pub fn can_adapt(&self, adapter: &AdapterType, typ: &TypeRef) -> bool {
        self.is_assignable(typ, &adapter.adapted_type)
    }

    /// The adapting type to use for `instance`. If `instance` is a container whose element the
    /// adapter can adapt, the adapter applies per element.
    pub fn adapting_type_for(&self, adapter: &AdapterType, instance: &TypeRef) -> WireType {
        match self.container_element(instance) {
            Some(element) if self.can_adapt(adapter, &element) => {
                WireType::Collection(adapter.adapting_type.clone())
            }
            _ => WireType::Single(adapter.adapting_type.clone()),
        }
    }

    /// Finds the adapter applying to a site, if any
    pub fn find_applicable_adapter(
        &mut self,
        site: &AdapterSite,
    ) -> Result<Option<AdapterType>, ModelBuildingError> {
        let graph = self.graph;
        let site_name = site.to_string();

        let find_owner = |owner: &str| {
            graph
                .get_type(owner)
                .ok_or_else(|| ModelBuildingError::TypeNotFound {
                    site: site_name.clone(),
                    typ: owner.to_string(),
                })
        };
        let member_not_found =
            || ModelBuildingError::Config(format!("{site_name}: member not found"));

        match site {
            AdapterSite::Type(name) => {
                let declaration = find_owner(name)?;
                self.find_adapter_for(&declaration.as_type_ref(), None, None, &site_name)
            }
            AdapterSite::Accessor { owner, member } => {
                find_owner(owner)?;
                let accessors = self.resolve_accessors(owner)?;
                accessors
                    .iter()
                    .find(|accessor| {
                        &accessor.simple_name == member || &accessor.member_name == member
                    })
                    .map(|accessor| accessor.adapter.clone())
                    .ok_or_else(member_not_found)
            }
            AdapterSite::MethodReturn { owner, method } => {
                let declaration = find_owner(owner)?;
                let method = declaration.get_member(method).ok_or_else(member_not_found)?;
                let typ = method.value_type().ok_or_else(member_not_found)?;
                let typ = self.root_context().resolve(typ);
                self.find_adapter_for(
                    &typ,
                    Some(method.metadata()),
                    Some(declaration.package.as_str()),
                    &site_name,
                )
            }
            AdapterSite::MethodParameter {
                owner,
                method,
                parameter,
            } => {
                let declaration = find_owner(owner)?;
                let parameter = declaration
                    .get_member(method)
                    .and_then(|method| {
                        method
                            .parameters()
                            .iter()
                            .find(|param| &param.name == parameter)
                    })
                    .ok_or_else(member_not_found)?;
                let typ = self.root_context().resolve(&parameter.typ);
                self.find_adapter_for(
                    &typ,
                    Some(parameter.metadata()),
                    Some(declaration.package.as_str()),
                    &site_name,
                )
            }
        }
    }

    /// Finds the adapter for a value of `declared` type.
    ///
    /// Precedence: metadata on the site itself, then on the (element) type's declaration, then the
    /// adapters listed on the referring package. An adapter mapping a type onto itself counts as
    /// no adapter.
    pub(crate) fn find_adapter_for(
        &mut self,
        declared: &TypeRef,
        site_metadata: Option<&Metadata>,
        referer_package: Option<&str>,
        site: &str,
    ) -> Result<Option<AdapterType>, ModelBuildingError> {
        let graph = self.graph;
        let element = self
            .container_element(declared)
            .unwrap_or_else(|| declared.clone());

        let site_adapter = site_metadata
            .and_then(|metadata| metadata.get(keys::ADAPTER))
            .and_then(MetadataValue::as_type_ref);

        let Some(element_name) = element.name() else {
            return match site_adapter {
                Some(adapter) => Err(ModelBuildingError::InvalidAdapter {
                    adapter: adapter.to_string(),
                    message: format!(
                        "{site}: only declared types can be adapted ({element} cannot be adapted)"
                    ),
                }),
                None => Ok(None),
            };
        };

        let type_adapter = || {
            graph
                .get_type(element_name)
                .and_then(|declaration| declaration.get_metadata(keys::ADAPTER))
                .and_then(MetadataValue::as_type_ref)
        };

        let package_adapter = || {
            referer_package
                .and_then(|package| graph.get_package(package))
                .and_then(|package| package.get_metadata(keys::PACKAGE_ADAPTERS))
                .and_then(MetadataValue::as_adapter_pairs)
                .and_then(|pairs| pairs.iter().find(|pair| pair.target == element_name))
                .map(|pair| &pair.adapter)
        };

        let Some(candidate) = site_adapter.or_else(type_adapter).or_else(package_adapter) else {
            return Ok(None);
        };

        let adapter = self.resolve_adapter(candidate)?;

        if !self.can_adapt(&adapter, &element) && !self.can_adapt(&adapter, declared) {
            return Err(ModelBuildingError::AdapterMismatch {
                site: site.to_string(),
                adapter: adapter.adapter,
                typ: declared.to_string(),
            });
        }

        // Compared with what the adapter actually replaces: each element, or the whole value
        let adapted = if self.can_adapt(&adapter, &element) {
            &element
        } else {
            declared
        };
        if adapter.is_identity() || adapter.adapting_type.erasure() == adapted.erasure() {
            debug!("{site}: ignoring no-op adapter {}", adapter.adapter);
            return Ok(None);
        }

        Ok(Some(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use declaration_graph::{
        graph::DeclarationGraph,
        metadata::AdapterPair,
        test_support::*,
    };
    use multiplatform_test::multiplatform_test;

    const XML_ADAPTER: &str = "javax.xml.bind.annotation.adapters.XmlAdapter";
    const CONVERTER: &str = "com.fasterxml.jackson.databind.util.Converter";

    fn xml_adapter(name: &str, value_type: &str, bound_type: &str) -> TypeBuilder {
        class(name).extends(TypeRef::generic(
            XML_ADAPTER,
            vec![TypeRef::declared(value_type), TypeRef::declared(bound_type)],
        ))
    }

    fn adapter_meta(adapter: &str) -> MetadataValue {
        MetadataValue::TypeRef(TypeRef::declared(adapter))
    }

    fn resolve(graph: &DeclarationGraph, adapter: &str) -> Result<AdapterType, ModelBuildingError> {
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(graph, &config);
        context.resolve_adapter(&TypeRef::declared(adapter))
    }

    #[multiplatform_test]
    fn direct_adapter() {
        let graph = graph(
            vec![
                xml_adapter("a.ThingAdapter", "a.ThingDto", "a.Thing"),
                class("a.Thing"),
                class("a.ThingDto"),
            ],
            vec![],
        );

        let adapter = resolve(&graph, "a.ThingAdapter").unwrap();
        assert_eq!(adapter.adapted_type, TypeRef::declared("a.Thing"));
        assert_eq!(adapter.adapting_type, TypeRef::declared("a.ThingDto"));
    }

    #[multiplatform_test]
    fn json_converter_argument_order() {
        let graph = graph(
            vec![class("a.ThingConverter").implements(TypeRef::generic(
                CONVERTER,
                vec![TypeRef::declared("a.Thing"), TypeRef::declared("java.lang.String")],
            ))],
            vec![],
        );

        let adapter = resolve(&graph, "a.ThingConverter").unwrap();
        assert_eq!(adapter.adapted_type, TypeRef::declared("a.Thing"));
        assert_eq!(adapter.adapting_type, string());
    }

    fn generic_chain(intermediates: usize) -> DeclarationGraph {
        // GenericAdapter<W, D> extends XmlAdapter<W, D>
        // MidAdapter<D> extends GenericAdapter<String, D>
        // [intermediate non-generic classes]
        // ConcreteAdapter extends ... MidAdapter<Thing>
        let mut types = vec![
            class("a.GenericAdapter")
                .type_params(&["W", "D"])
                .extends(TypeRef::generic(
                    XML_ADAPTER,
                    vec![TypeRef::variable("W"), TypeRef::variable("D")],
                )),
            class("a.MidAdapter").type_params(&["D"]).extends(TypeRef::generic(
                "a.GenericAdapter",
                vec![string(), TypeRef::variable("D")],
            )),
            class("a.Thing"),
        ];

        let mut parent = TypeRef::generic("a.MidAdapter", vec![TypeRef::declared("a.Thing")]);
        for index in 0..intermediates {
            let name = format!("a.Intermediate{index}");
            types.push(class(&name).extends(parent));
            parent = TypeRef::declared(name);
        }
        types.push(class("a.ConcreteAdapter").extends(parent));

        graph(types, vec![])
    }

    #[multiplatform_test]
    fn generic_substitution_is_independent_of_chain_length() {
        for intermediates in [0, 1, 3] {
            let adapter = resolve(&generic_chain(intermediates), "a.ConcreteAdapter").unwrap();
            assert_eq!(adapter.adapted_type, TypeRef::declared("a.Thing"));
            assert_eq!(adapter.adapting_type, string());
        }
    }

    #[multiplatform_test]
    fn not_a_converter() {
        let graph = graph(vec![class("a.NotAnAdapter")], vec![]);

        let err = resolve(&graph, "a.NotAnAdapter").unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Adapter a.NotAnAdapter: is not an instance of {XML_ADAPTER}, jakarta.xml.bind.annotation.adapters.XmlAdapter, or {CONVERTER}"
            )
        );
    }

    #[multiplatform_test]
    fn raw_converter_contract() {
        let graph = graph(
            vec![class("a.RawAdapter").extends(TypeRef::declared(XML_ADAPTER))],
            vec![],
        );

        let err = resolve(&graph, "a.RawAdapter").unwrap_err();
        let ModelBuildingError::InvalidAdapter { message, .. } = &err else {
            panic!("expected an invalid adapter, got {err}");
        };
        assert!(message.contains("must specify both"));
    }

    fn precedence_graph(site: bool, type_level: bool, package_level: bool) -> DeclarationGraph {
        let mut property = field("thing", TypeRef::declared("a.Thing"));
        if site {
            property = property.meta(keys::ADAPTER, adapter_meta("a.SiteAdapter"));
        }

        let mut thing = class("a.Thing");
        if type_level {
            thing = thing.meta(keys::ADAPTER, adapter_meta("a.TypeAdapter"));
        }

        let mut holder_package = package("b");
        if package_level {
            holder_package = holder_package.meta(
                keys::PACKAGE_ADAPTERS,
                MetadataValue::AdapterPairs(vec![AdapterPair {
                    adapter: TypeRef::declared("a.PackageAdapter"),
                    target: "a.Thing".to_string(),
                }]),
            );
        }

        graph(
            vec![
                class("b.Holder").member(property),
                thing,
                xml_adapter("a.SiteAdapter", "a.SiteDto", "a.Thing"),
                xml_adapter("a.TypeAdapter", "a.TypeDto", "a.Thing"),
                xml_adapter("a.PackageAdapter", "a.PackageDto", "a.Thing"),
            ],
            vec![holder_package],
        )
    }

    fn holder_adapter(graph: &DeclarationGraph) -> Option<String> {
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(graph, &config);
        context
            .find_applicable_adapter(&AdapterSite::Accessor {
                owner: "b.Holder".into(),
                member: "thing".into(),
            })
            .unwrap()
            .map(|adapter| adapter.adapter)
    }

    #[multiplatform_test]
    fn adapter_precedence() {
        assert_eq!(
            holder_adapter(&precedence_graph(true, true, true)).as_deref(),
            Some("a.SiteAdapter")
        );
        assert_eq!(
            holder_adapter(&precedence_graph(false, true, true)).as_deref(),
            Some("a.TypeAdapter")
        );
        assert_eq!(
            holder_adapter(&precedence_graph(false, false, true)).as_deref(),
            Some("a.PackageAdapter")
        );
        assert_eq!(holder_adapter(&precedence_graph(false, false, false)), None);
    }

    #[multiplatform_test]
    fn no_op_adapter_is_absent() {
        let graph = graph(
            vec![
                class("a.Holder").member(
                    field("label", string()).meta(keys::ADAPTER, adapter_meta("a.TrimAdapter")),
                ),
                xml_adapter("a.TrimAdapter", "java.lang.String", "java.lang.String"),
            ],
            vec![],
        );
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let site = AdapterSite::Accessor {
            owner: "a.Holder".into(),
            member: "label".into(),
        };
        assert_eq!(context.find_applicable_adapter(&site).unwrap(), None);
    }

    #[multiplatform_test]
    fn whole_container_adapter_is_kept() {
        // JoinAdapter extends XmlAdapter<String, List<String>>
        let tags = TypeRef::generic("java.util.List", vec![string()]);
        let graph = graph(
            vec![
                class("a.Holder").member(
                    field("tags", tags.clone()).meta(keys::ADAPTER, adapter_meta("a.JoinAdapter")),
                ),
                class("a.JoinAdapter")
                    .extends(TypeRef::generic(XML_ADAPTER, vec![string(), tags])),
            ],
            vec![],
        );
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let adapter = context
            .find_applicable_adapter(&AdapterSite::Accessor {
                owner: "a.Holder".into(),
                member: "tags".into(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(adapter.adapter, "a.JoinAdapter");
        assert_eq!(adapter.adapted_type, TypeRef::declared("java.util.List"));
        assert_eq!(adapter.adapting_type, string());
    }

    #[multiplatform_test]
    fn mismatched_adapter() {
        let graph = graph(
            vec![
                class("a.Holder").member(
                    field("other", TypeRef::declared("a.Other"))
                        .meta(keys::ADAPTER, adapter_meta("a.ThingAdapter")),
                ),
                class("a.Other"),
                class("a.Thing"),
                xml_adapter("a.ThingAdapter", "a.ThingDto", "a.Thing"),
            ],
            vec![],
        );
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let err = context
            .find_applicable_adapter(&AdapterSite::Accessor {
                owner: "a.Holder".into(),
                member: "other".into(),
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "a.Holder.other: adapter a.ThingAdapter does not adapt a.Other"
        );
    }

    #[multiplatform_test]
    fn method_sites() {
        let graph = graph(
            vec![
                class("a.Service").member(
                    method(
                        "find",
                        TypeRef::declared("a.Thing"),
                        vec![param_with(
                            "thing",
                            TypeRef::declared("a.Thing"),
                            &[(keys::ADAPTER, adapter_meta("a.ThingAdapter"))],
                        )],
                    )
                    .meta(keys::ADAPTER, adapter_meta("a.ThingAdapter")),
                ),
                class("a.Thing"),
                xml_adapter("a.ThingAdapter", "a.ThingDto", "a.Thing"),
            ],
            vec![],
        );
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let returned = context
            .find_applicable_adapter(&AdapterSite::MethodReturn {
                owner: "a.Service".into(),
                method: "find".into(),
            })
            .unwrap();
        let parameter = context
            .find_applicable_adapter(&AdapterSite::MethodParameter {
                owner: "a.Service".into(),
                method: "find".into(),
                parameter: "thing".into(),
            })
            .unwrap();

        assert_eq!(returned, parameter);
        assert_eq!(
            returned.map(|adapter| adapter.adapting_type),
            Some(TypeRef::declared("a.ThingDto"))
        );
        assert_eq!(
            context
                .find_applicable_adapter(&AdapterSite::Type("a.Thing".into()))
                .unwrap(),
            None
        );
    }
}
