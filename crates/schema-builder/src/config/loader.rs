// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use anyhow::{Result, anyhow, bail};
use schema_model::prefixes::WELL_KNOWN_NAMESPACES;
use serde::Deserialize;
use wildmatch::WildMatch;

use super::model::{BuilderConfig, ConverterContract};
use crate::error::ModelBuildingError;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigSer {
    pub alphabetical: Option<bool>,
    pub root_type: Option<String>,
    /// Added to the default containers
    pub containers: Option<Vec<String>>,
    /// Added to the default converter contracts
    pub converters: Option<Vec<ConverterContractSer>>,
    /// Added to (or overriding) the default known types
    pub known_types: Option<BTreeMap<String, String>>,
    pub namespaces: Option<BTreeMap<String, String>>,
    pub exclude: Option<Vec<String>>,
    pub disabled_rules: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConverterContractSer {
    pub interface: String,
    pub adapted_index: usize,
    pub adapting_index: usize,
}

impl TryFrom<ConfigSer> for BuilderConfig {
    type Error = anyhow::Error;

    fn try_from(config: ConfigSer) -> Result<Self, Self::Error> {
        let mut builder_config = BuilderConfig::default();

        if let Some(alphabetical) = config.alphabetical {
            builder_config.alphabetical = alphabetical;
        }

        if let Some(root_type) = config.root_type {
            builder_config.root_type = root_type;
        }

        for container in config.containers.unwrap_or_default() {
            if !builder_config.is_container(&container) {
                builder_config.containers.push(container);
            }
        }

        for converter in config.converters.unwrap_or_default() {
            builder_config
                .converters
                .push(ConverterContract::try_from(converter)?);
        }

        builder_config
            .known_types
            .extend(config.known_types.unwrap_or_default());

        let namespaces = config.namespaces.unwrap_or_default();
        // Prefix -> the namespace holding it
        let mut owners: HashMap<&str, &str> = WELL_KNOWN_NAMESPACES
            .iter()
            .map(|&(namespace, prefix)| (prefix, namespace))
            .collect();
        for (namespace, prefix) in &namespaces {
            if prefix.is_empty() {
                bail!("Empty prefix for namespace '{namespace}'");
            }
            if let Some(owner) = owners.insert(prefix, namespace)
                && owner != namespace
            {
                bail!("Prefix '{prefix}' of namespace '{namespace}' is already used by '{owner}'");
            }
        }
        builder_config.namespaces = namespaces;

        builder_config.exclude = config
            .exclude
            .unwrap_or_default()
            .iter()
            .map(|pattern| WildMatch::new(pattern))
            .collect();

        builder_config.disabled_rules = config
            .disabled_rules
            .unwrap_or_default()
            .into_iter()
            .collect();

        Ok(builder_config)
    }
}

impl TryFrom<ConverterContractSer> for ConverterContract {
    type Error = anyhow::Error;

    fn try_from(converter: ConverterContractSer) -> Result<Self, Self::Error> {
        let ConverterContractSer {
            interface,
            adapted_index,
            adapting_index,
        } = converter;

        if adapted_index > 1 || adapting_index > 1 || adapted_index == adapting_index {
            bail!(
                "Invalid converter '{interface}': adapted-index and adapting-index must be 0 and 1 (in some order)"
            );
        }

        Ok(ConverterContract {
            interface,
            adapted_index,
            adapting_index,
        })
    }
}

pub fn load_config_from_str(toml_str: &str) -> Result<BuilderConfig> {
    let config: ConfigSer =
        toml::from_str(toml_str).map_err(|e| anyhow!("Failed to parse configuration: {}", e))?;

    config.try_into()
}

pub fn load_config_from_file(path: &Path) -> Result<BuilderConfig> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read file '{}': {}", path.display(), e))?;
    let config: ConfigSer = toml::from_str(&toml_str)
        .map_err(|e| anyhow!("Failed to parse TOML file '{}': {}", path.display(), e))?;

    config.try_into()
}

impl BuilderConfig {
    /// Loads a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ModelBuildingError> {
        load_config_from_file(path).map_err(|e| ModelBuildingError::Config(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::model::DEFAULT_ROOT_TYPE;

    #[test]
    fn empty_config_is_default() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, BuilderConfig::default());
    }

    #[test]
    fn full_config() {
        let config = load_config_from_str(
            r#"
            alphabetical = true
            containers = ["com.example.Bag"]
            exclude = ["com.example.internal.*"]
            disabled-rules = ["unique-bean-names"]

            [known-types]
            "org.joda.time.DateTime" = "dateTime"

            [namespaces]
            "urn:example" = "ex"

            [[converters]]
            interface = "com.example.Codec"
            adapted-index = 0
            adapting-index = 1
            "#,
        )
        .unwrap();

        assert!(config.alphabetical);
        assert_eq!(config.root_type, DEFAULT_ROOT_TYPE);
        assert!(config.is_container("com.example.Bag"));
        assert!(config.is_container("java.util.List"));
        assert!(config.is_excluded("com.example.internal.Secret"));
        assert!(!config.is_excluded("com.example.Thing"));
        assert!(!config.is_rule_enabled("unique-bean-names"));
        assert_eq!(config.known_type("org.joda.time.DateTime"), Some("dateTime"));
        assert_eq!(config.known_type("java.lang.String"), Some("string"));
        assert_eq!(
            config.namespaces.get("urn:example").map(String::as_str),
            Some("ex")
        );
        assert_eq!(
            config.converters.last(),
            Some(&ConverterContract::new("com.example.Codec", 0, 1))
        );
    }

    #[test]
    fn invalid_converter_indices() {
        let err = load_config_from_str(
            r#"
            [[converters]]
            interface = "com.example.Codec"
            adapted-index = 1
            adapting-index = 1
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Invalid converter 'com.example.Codec'"));
    }

    #[test]
    fn colliding_prefixes_rejected() {
        let err = load_config_from_str(
            r#"
            [namespaces]
            "urn:x" = "xs"
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Prefix 'xs' of namespace 'urn:x' is already used by 'http://www.w3.org/2001/XMLSchema'"
        );

        let err = load_config_from_str(
            r#"
            [namespaces]
            "urn:a" = "ex"
            "urn:b" = "ex"
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Prefix 'ex' of namespace 'urn:b' is already used by 'urn:a'"
        );

        // Restating a well-known prefix is not a collision
        let config = load_config_from_str(
            r#"
            [namespaces]
            "http://www.w3.org/2001/XMLSchema" = "xs"
            "#,
        )
        .unwrap();
        assert_eq!(config.namespaces.len(), 1);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(load_config_from_str("alphabetic = true").is_err());
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root-type = \"java.lang.Record\"").unwrap();

        let config = load_config_from_file(file.path()).unwrap();
        assert_eq!(config.root_type, "java.lang.Record");

        assert!(load_config_from_file(Path::new("does-not-exist.toml")).is_err());
    }

    #[test]
    fn load_reports_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root-type = 42").unwrap();

        let Err(ModelBuildingError::Config(message)) = BuilderConfig::load(file.path()) else {
            panic!("expected a configuration error");
        };
        assert!(message.starts_with("Failed to parse TOML file"));
    }
}
