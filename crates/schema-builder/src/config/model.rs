// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeMap, HashSet};

use wildmatch::WildMatch;

pub const DEFAULT_ROOT_TYPE: &str = "java.lang.Object";

/// Collection types of the platform library. Declarations never include these, so concrete and
/// abstract collection classes are listed alongside the interfaces.
pub const DEFAULT_CONTAINERS: &[&str] = &[
    "java.util.Collection",
    "java.util.List",
    "java.util.Set",
    "java.util.SortedSet",
    "java.util.NavigableSet",
    "java.util.Queue",
    "java.util.Deque",
    "java.util.AbstractCollection",
    "java.util.AbstractList",
    "java.util.AbstractSequentialList",
    "java.util.AbstractSet",
    "java.util.AbstractQueue",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.Vector",
    "java.util.Stack",
    "java.util.HashSet",
    "java.util.LinkedHashSet",
    "java.util.TreeSet",
    "java.util.EnumSet",
    "java.util.ArrayDeque",
    "java.util.PriorityQueue",
    "java.util.concurrent.CopyOnWriteArrayList",
    "java.util.concurrent.CopyOnWriteArraySet",
    "java.util.concurrent.ConcurrentLinkedQueue",
    "java.util.concurrent.ConcurrentLinkedDeque",
    "java.util.concurrent.ConcurrentSkipListSet",
    "java.util.concurrent.BlockingQueue",
    "java.util.concurrent.LinkedBlockingQueue",
    "java.util.concurrent.ArrayBlockingQueue",
    "java.util.stream.Stream",
];

/// Built-in scalars and their XML schema type names
pub const DEFAULT_KNOWN_TYPES: &[(&str, &str)] = &[
    ("boolean", "boolean"),
    ("byte", "byte"),
    ("char", "unsignedShort"),
    ("double", "double"),
    ("float", "float"),
    ("int", "int"),
    ("long", "long"),
    ("short", "short"),
    ("byte[]", "base64Binary"),
    ("java.lang.Boolean", "boolean"),
    ("java.lang.Byte", "byte"),
    ("java.lang.Character", "unsignedShort"),
    ("java.lang.Double", "double"),
    ("java.lang.Float", "float"),
    ("java.lang.Integer", "int"),
    ("java.lang.Long", "long"),
    ("java.lang.Short", "short"),
    ("java.lang.String", "string"),
    ("java.lang.Class", "string"),
    ("java.math.BigInteger", "integer"),
    ("java.math.BigDecimal", "decimal"),
    ("java.net.URI", "string"),
    ("java.nio.ByteBuffer", "base64Binary"),
    ("java.util.Calendar", "dateTime"),
    ("java.util.Date", "dateTime"),
    ("java.util.GregorianCalendar", "dateTime"),
    ("java.util.UUID", "string"),
    ("java.util.concurrent.atomic.AtomicBoolean", "boolean"),
    ("java.util.concurrent.atomic.AtomicInteger", "int"),
    ("java.util.concurrent.atomic.AtomicLong", "long"),
    ("java.sql.Timestamp", "dateTime"),
    ("java.time.LocalDate", "date"),
    ("java.time.LocalTime", "time"),
    ("java.time.LocalDateTime", "dateTime"),
    ("java.time.OffsetDateTime", "dateTime"),
    ("java.time.ZonedDateTime", "dateTime"),
    ("javax.xml.datatype.Duration", "duration"),
    ("javax.xml.datatype.XMLGregorianCalendar", "dateTime"),
    ("javax.xml.namespace.QName", "QName"),
];

/// A generic converter interface and the positions of its two type arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterContract {
    pub interface: String,
    pub adapted_index: usize,
    pub adapting_index: usize,
}

impl ConverterContract {
    pub fn new(interface: &str, adapted_index: usize, adapting_index: usize) -> Self {
        Self {
            interface: interface.to_string(),
            adapted_index,
            adapting_index,
        }
    }

    pub fn defaults() -> Vec<ConverterContract> {
        vec![
            // XmlAdapter<ValueType, BoundType>
            Self::new("javax.xml.bind.annotation.adapters.XmlAdapter", 1, 0),
            Self::new("jakarta.xml.bind.annotation.adapters.XmlAdapter", 1, 0),
            // Converter<IN, OUT>
            Self::new("com.fasterxml.jackson.databind.util.Converter", 0, 1),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfig {
    /// Order properties alphabetically unless a type says otherwise
    pub alphabetical: bool,
    pub root_type: String,
    pub containers: Vec<String>,
    pub converters: Vec<ConverterContract>,
    /// Qualified name -> scalar wire name
    pub known_types: BTreeMap<String, String>,
    /// Namespace -> reserved prefix
    pub namespaces: BTreeMap<String, String>,
    pub exclude: Vec<WildMatch>,
    pub disabled_rules: HashSet<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            alphabetical: false,
            root_type: DEFAULT_ROOT_TYPE.to_string(),
            containers: DEFAULT_CONTAINERS.iter().map(|c| c.to_string()).collect(),
            converters: ConverterContract::defaults(),
            known_types: DEFAULT_KNOWN_TYPES
                .iter()
                .map(|(name, wire_name)| (name.to_string(), wire_name.to_string()))
                .collect(),
            namespaces: BTreeMap::new(),
            exclude: vec![],
            disabled_rules: HashSet::new(),
        }
    }
}

impl BuilderConfig {
    pub fn known_type(&self, name: &str) -> Option<&str> {
        self.known_types.get(name).map(String::as_str)
    }

    pub fn is_container(&self, name: &str) -> bool {
        self.containers.iter().any(|container| container == name)
    }

    pub fn is_excluded(&self, qualified_name: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| pattern.matches(qualified_name))
    }

    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        !self.disabled_rules.contains(rule)
    }
}
