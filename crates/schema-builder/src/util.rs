// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Joins words with commas, putting `last_sep` before the last one.
///
/// e.g. `join_words(&["a", "b", "c"], "or") == "a, b, or c"` and `join_words(&["a", "b"], "and") == "a and b"`
pub fn join_words(words: &[impl AsRef<str>], last_sep: &str) -> String {
    match words {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} {last_sep} {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let init = init
                .iter()
                .map(|word| word.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{init}, {last_sep} {}", last.as_ref())
        }
    }
}
