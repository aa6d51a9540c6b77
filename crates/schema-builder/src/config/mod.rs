// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod loader;
mod model;

pub use loader::{ConfigSer, load_config_from_file, load_config_from_str};
pub use model::{
    BuilderConfig, ConverterContract, DEFAULT_CONTAINERS, DEFAULT_KNOWN_TYPES, DEFAULT_ROOT_TYPE,
};
