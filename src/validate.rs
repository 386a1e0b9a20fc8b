// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Required-field checks and meaning deduplication.
//!
//! Every meaning must be defined exactly once per document. Later
//! units may reuse a definition by setting their description to
//! `ibid`; those units are dropped from the output.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::unit::{TranslationUnit, ValidatedUnit};

/// Meanings seen so far in one document, in the order they were
/// first defined.
#[derive(Debug, Default, Clone)]
pub struct MeaningRegistry {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl MeaningRegistry {
    pub fn new() -> Self {
        MeaningRegistry::default()
    }

    pub fn contains(&self, meaning: &str) -> bool {
        self.seen.contains(meaning)
    }

    /// Add `meaning`. Returns `false` if it was already present.
    pub fn register(&mut self, meaning: &str) -> bool {
        if !self.seen.insert(meaning.to_string()) {
            return false;
        }
        self.order.push(meaning.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

fn is_ibid(description: &str) -> bool {
    description.to_lowercase() == "ibid"
}

/// Take a non-empty required field, or fail naming it.
fn require(
    value: Option<String>,
    field: &'static str,
    document: &str,
    key: &str,
) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::RequiredFieldMissing {
            context: format!("{document}:{key}"),
            field,
        }),
    }
}

/// Validate one unit against the meanings seen so far in `document`.
///
/// Returns `Ok(None)` for an `ibid` unit whose meaning is already
/// defined. Such units leave `registry` unchanged.
pub fn validate_unit(
    document: &str,
    mut unit: TranslationUnit,
    registry: &mut MeaningRegistry,
) -> Result<Option<ValidatedUnit>> {
    let description = require(unit.description.take(), "description", document, &unit.key)?;
    let meaning = require(unit.meaning.take(), "meaning", document, &unit.key)?;
    let source = require(unit.source.take(), "source", document, &unit.key)?;

    if is_ibid(&description) {
        if !registry.contains(&meaning) {
            return Err(Error::DanglingIbid {
                context: document.to_string(),
                meaning,
                description,
            });
        }
        log::debug!("Dropping unit {} which refers to {meaning:?}", unit.key);
        return Ok(None);
    }

    if !registry.register(&meaning) {
        return Err(Error::DuplicateMeaning {
            context: document.to_string(),
            meaning,
        });
    }
    Ok(Some(ValidatedUnit::new(unit, source, description, meaning)))
}

/// Validate units of `document` as they are produced, in document
/// order.
///
/// `units` is consumed lazily, so an extraction error is only reported
/// if every earlier unit validated. The meaning registry lives only for
/// the duration of this call, so a failure leaves nothing behind.
pub fn validate_each<I>(document: &str, units: I) -> Result<Vec<ValidatedUnit>>
where
    I: IntoIterator<Item = Result<TranslationUnit>>,
{
    let mut registry = MeaningRegistry::new();
    let mut validated = Vec::new();
    for unit in units {
        if let Some(unit) = validate_unit(document, unit?, &mut registry)? {
            validated.push(unit);
        }
    }
    Ok(validated)
}

/// Validate all units of `document`, in document order.
///
/// # Examples
///
/// ```
/// use xliff_to_json::unit::TranslationUnit;
/// use xliff_to_json::validate::validate_units;
///
/// let unit = |key: &str, meaning: &str, description: &str| {
///     let mut unit = TranslationUnit::new(key);
///     unit.source = Some(String::from("Hello"));
///     unit.meaning = Some(String::from(meaning));
///     unit.description = Some(String::from(description));
///     unit
/// };
///
/// let validated = validate_units(
///     "messages.xlf",
///     vec![unit("a", "greet", "Says hello"), unit("b", "greet", "ibid")],
/// )
/// .unwrap();
/// assert_eq!(validated.len(), 1);
/// assert_eq!(validated[0].key(), "a");
/// ```
pub fn validate_units<I>(document: &str, units: I) -> Result<Vec<ValidatedUnit>>
where
    I: IntoIterator<Item = TranslationUnit>,
{
    validate_each(document, units.into_iter().map(Ok))
}
