// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Container narrowing: arrays, collections and streams reduce to their element type.

use declaration_graph::{metadata::Metadata, type_ref::TypeRef};
use schema_model::wire::{AdapterType, WireType};

use crate::{context::ResolutionContext, error::ModelBuildingError};

impl<'g> ResolutionContext<'g> {
    /// The element type of a container, or `None` if `typ` is not a container.
    ///
    /// Arrays narrow to their component (unless the array itself is a known scalar, such as
    /// `byte[]`). Recognized containers and declared subclasses of them narrow to their type
    /// argument, or to the root type when used raw.
    pub fn container_element(&self, typ: &TypeRef) -> Option<TypeRef> {
        match typ {
            TypeRef::Array { component } => {
                if self.config.known_type(&typ.to_string()).is_some() {
                    None
                } else {
                    Some(component.as_ref().clone())
                }
            }
            TypeRef::Declared { name, args } => {
                if self.config.is_container(name) {
                    return Some(self.single_argument(args));
                }

                if self.config.known_type(name).is_some() || self.graph.get_type(name).is_none() {
                    return None;
                }

                self.config.containers.iter().find_map(|container| {
                    self.find_supertype(typ, container)
                        .map(|container| self.single_argument(container.args()))
                })
            }
            TypeRef::Variable { .. } | TypeRef::Void => None,
        }
    }

    fn single_argument(&self, args: &[TypeRef]) -> TypeRef {
        match args {
            [element] => element.clone(),
            _ => self.root_type(),
        }
    }

    /// The effective element type of `typ` for wire purposes.
    ///
    /// An interface element narrows to the adapting type of its adapter if it has one, and to the
    /// root type otherwise.
    pub fn narrow(
        &mut self,
        typ: &TypeRef,
        referer_package: Option<&str>,
    ) -> Result<TypeRef, ModelBuildingError> {
        let element = self
            .container_element(typ)
            .unwrap_or_else(|| typ.clone());

        let Some(name) = element.name() else {
            return Ok(element);
        };

        if self.config.known_type(name).is_some() || self.config.is_container(name) {
            return Ok(element);
        }

        let graph = self.graph;
        match graph.get_type(name) {
            Some(declaration) if declaration.is_interface() => {
                let site = declaration.qualified_name.clone();
                let adapter = self.find_adapter_for(&element, None, referer_package, &site)?;
                Ok(adapter
                    .map(|adapter| adapter.adapting_type)
                    .unwrap_or_else(|| self.root_type()))
            }
            _ => Ok(element),
        }
    }

    /// The wire type of a value declared as `declared` at a site carrying `site_metadata`,
    /// together with the adapter applied to it.
    pub fn wire_type(
        &mut self,
        declared: &TypeRef,
        site_metadata: Option<&Metadata>,
        referer_package: Option<&str>,
        site: &str,
    ) -> Result<(WireType, Option<AdapterType>), ModelBuildingError> {
        let adapter = self.find_adapter_for(declared, site_metadata, referer_package, site)?;

        let (typ, per_element) = match &adapter {
            Some(adapter) => match self.adapting_type_for(adapter, declared) {
                WireType::Collection(typ) => (typ, true),
                WireType::Single(typ) => (typ, false),
            },
            None => (declared.clone(), false),
        };

        let is_container = self.container_element(&typ).is_some();
        let element = self.narrow(&typ, referer_package)?;

        let wire_type = if per_element || is_container {
            WireType::Collection(element)
        } else {
            WireType::Single(element)
        };

        Ok((wire_type, adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use declaration_graph::{
        graph::DeclarationGraph,
        metadata::{MetadataValue, keys},
        test_support::*,
    };
    use multiplatform_test::multiplatform_test;

    fn list_of(typ: TypeRef) -> TypeRef {
        TypeRef::generic("java.util.List", vec![typ])
    }

    fn sample_graph() -> DeclarationGraph {
        graph(
            vec![
                interface("a.Shape"),
                interface("a.Adaptable").meta(
                    keys::ADAPTER,
                    MetadataValue::TypeRef(TypeRef::declared("a.AdaptableAdapter")),
                ),
                class("a.AdaptableAdapter").extends(TypeRef::generic(
                    "javax.xml.bind.annotation.adapters.XmlAdapter",
                    vec![TypeRef::declared("a.AdaptableDto"), TypeRef::declared("a.Adaptable")],
                )),
                class("a.AdaptableDto"),
                class("a.Thing"),
                class("a.ThingList").extends(TypeRef::generic(
                    "java.util.ArrayList",
                    vec![TypeRef::declared("a.Thing")],
                )),
                class("a.JoinAdapter").extends(TypeRef::generic(
                    "javax.xml.bind.annotation.adapters.XmlAdapter",
                    vec![string(), list_of(string())],
                )),
            ],
            vec![],
        )
    }

    fn narrow(typ: TypeRef) -> TypeRef {
        let graph = sample_graph();
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);
        context.narrow(&typ, None).unwrap()
    }

    #[multiplatform_test]
    fn containers() {
        assert_eq!(narrow(list_of(string())), string());
        assert_eq!(narrow(TypeRef::declared("java.util.List")), object());
        assert_eq!(narrow(TypeRef::array(string())), string());
        assert_eq!(
            narrow(TypeRef::generic("java.util.stream.Stream", vec![string()])),
            string()
        );
        assert_eq!(narrow(TypeRef::declared("a.ThingList")), TypeRef::declared("a.Thing"));
    }

    #[multiplatform_test]
    fn concrete_collection_classes() {
        for container in ["java.util.ArrayList", "java.util.HashSet", "java.util.ArrayDeque"] {
            assert_eq!(narrow(TypeRef::generic(container, vec![string()])), string());
        }
        assert_eq!(narrow(TypeRef::declared("java.util.LinkedList")), object());

        let graph = sample_graph();
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let (wire_type, _) = context
            .wire_type(
                &TypeRef::generic("java.util.TreeSet", vec![TypeRef::declared("a.Thing")]),
                None,
                None,
                "site",
            )
            .unwrap();
        assert_eq!(wire_type, WireType::Collection(TypeRef::declared("a.Thing")));

        let (wire_type, _) = context
            .wire_type(&TypeRef::declared("a.ThingList"), None, None, "site")
            .unwrap();
        assert_eq!(wire_type, WireType::Collection(TypeRef::declared("a.Thing")));
    }

    #[multiplatform_test]
    fn non_containers_are_unchanged() {
        assert_eq!(narrow(string()), string());
        assert_eq!(narrow(TypeRef::declared("a.Thing")), TypeRef::declared("a.Thing"));

        let bytes = TypeRef::array(TypeRef::declared("byte"));
        assert_eq!(narrow(bytes.clone()), bytes);
    }

    #[multiplatform_test]
    fn interface_elements() {
        assert_eq!(narrow(list_of(TypeRef::declared("a.Shape"))), object());
        assert_eq!(narrow(TypeRef::declared("a.Shape")), object());
        assert_eq!(
            narrow(list_of(TypeRef::declared("a.Adaptable"))),
            TypeRef::declared("a.AdaptableDto")
        );
    }

    #[multiplatform_test]
    fn wire_types() {
        let graph = sample_graph();
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let (wire_type, adapter) = context
            .wire_type(&list_of(TypeRef::declared("a.Thing")), None, None, "site")
            .unwrap();
        assert_eq!(wire_type, WireType::Collection(TypeRef::declared("a.Thing")));
        assert_eq!(adapter, None);

        let (wire_type, adapter) = context
            .wire_type(&TypeRef::declared("a.Adaptable"), None, None, "site")
            .unwrap();
        assert_eq!(wire_type, WireType::Single(TypeRef::declared("a.AdaptableDto")));
        assert_eq!(adapter.map(|adapter| adapter.adapter).as_deref(), Some("a.AdaptableAdapter"));

        let (wire_type, _) = context
            .wire_type(&list_of(TypeRef::declared("a.Adaptable")), None, None, "site")
            .unwrap();
        assert_eq!(wire_type, WireType::Collection(TypeRef::declared("a.AdaptableDto")));
    }

    #[multiplatform_test]
    fn whole_container_adaptation() {
        let graph = sample_graph();
        let config = BuilderConfig::default();
        let mut context = ResolutionContext::new(&graph, &config);

        let mut metadata = Metadata::new();
        metadata.insert(
            keys::ADAPTER.to_string(),
            MetadataValue::TypeRef(TypeRef::declared("a.JoinAdapter")),
        );

        let (wire_type, adapter) = context
            .wire_type(&list_of(string()), Some(&metadata), None, "site")
            .unwrap();
        assert_eq!(wire_type, WireType::Single(string()));
        assert_eq!(adapter.map(|adapter| adapter.adapter).as_deref(), Some("a.JoinAdapter"));
    }
}
