// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

pub const XML_SCHEMA_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Namespaces with reserved prefixes
pub const WELL_KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("http://schemas.xmlsoap.org/wsdl/", "wsdl"),
    ("http://schemas.xmlsoap.org/wsdl/http/", "http"),
    ("http://schemas.xmlsoap.org/wsdl/mime/", "mime"),
    ("http://schemas.xmlsoap.org/wsdl/soap/", "soap"),
    ("http://schemas.xmlsoap.org/wsdl/soap12/", "soap12"),
    ("http://schemas.xmlsoap.org/soap/encoding/", "soapenc"),
    (XML_SCHEMA_NAMESPACE, "xs"),
    ("http://www.w3.org/2001/XMLSchema-instance", "xsi"),
    ("http://ws-i.org/profiles/basic/1.1/xsd", "wsi"),
    ("http://wadl.dev.java.net/2009/02", "wadl"),
    ("http://www.w3.org/XML/1998/namespace", "xml"),
];

/// Namespace to prefix assignment.
///
/// Reserved prefixes are fixed up front. Every other namespace gets `ns<N>`, where `N` only ever
/// increases and skips values whose prefix is already taken. The result depends on the order in
/// which namespaces are assigned, so callers pass them sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamespacePrefixes {
    prefixes: BTreeMap<String, String>,
    #[serde(skip)]
    next_index: usize,
}

impl NamespacePrefixes {
    pub fn new<'a>(reserved: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            prefixes: reserved
                .into_iter()
                .map(|(namespace, prefix)| (namespace.to_string(), prefix.to_string()))
                .collect(),
            next_index: 0,
        }
    }

    pub fn well_known() -> Self {
        Self::new(WELL_KNOWN_NAMESPACES.iter().copied())
    }

    /// Returns the prefix of `namespace`, generating one if needed. The empty namespace never gets
    /// a prefix.
    pub fn assign(&mut self, namespace: &str) -> Option<&str> {
        if namespace.is_empty() {
            return None;
        }

        if !self.prefixes.contains_key(namespace) {
            let taken: HashSet<&str> = self.prefixes.values().map(String::as_str).collect();
            let mut prefix = format!("ns{}", self.next_index);
            self.next_index += 1;
            while taken.contains(prefix.as_str()) {
                prefix = format!("ns{}", self.next_index);
                self.next_index += 1;
            }
            self.prefixes.insert(namespace.to_string(), prefix);
        }

        self.prefixes.get(namespace).map(String::as_str)
    }

    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.prefixes.get(namespace).map(String::as_str)
    }

    /// All assignments, ordered by namespace
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(namespace, prefix)| (namespace.as_str(), prefix.as_str()))
    }
}
