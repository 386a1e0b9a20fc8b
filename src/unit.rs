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

use std::collections::BTreeMap;

/// A translation unit as found in the document, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationUnit {
    /// The `id` attribute of the `trans-unit`. Never empty.
    pub key: String,
    /// Literal inner XML of `<source>`.
    pub source: Option<String>,
    /// Literal inner XML of `<target>`.
    pub target: Option<String>,
    /// Text of `<note from="description">`.
    pub description: Option<String>,
    /// Text of `<note from="meaning">`.
    pub meaning: Option<String>,
    /// Notes with any other `from` value.
    pub notes: BTreeMap<String, String>,
}

impl TranslationUnit {
    pub fn new(key: impl Into<String>) -> Self {
        TranslationUnit {
            key: key.into(),
            ..TranslationUnit::default()
        }
    }

    /// Store the text of a `<note>` under its `from` value. A later
    /// note with the same `from` replaces the earlier one.
    pub fn set_note(&mut self, from: &str, text: String) {
        match from {
            "description" => self.description = Some(text),
            "meaning" => self.meaning = Some(text),
            _ => {
                self.notes.insert(from.to_string(), text);
            }
        }
    }

    /// Look up a note by its `from` value.
    pub fn note(&self, from: &str) -> Option<&str> {
        match from {
            "description" => self.description.as_deref(),
            "meaning" => self.meaning.as_deref(),
            _ => self.notes.get(from).map(String::as_str),
        }
    }
}

/// A translation unit with a non-empty description, meaning and
/// source. Only built by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUnit {
    key: String,
    source: String,
    target: Option<String>,
    description: String,
    meaning: String,
    notes: BTreeMap<String, String>,
}

impl ValidatedUnit {
    pub(crate) fn new(
        unit: TranslationUnit,
        source: String,
        description: String,
        meaning: String,
    ) -> Self {
        ValidatedUnit {
            key: unit.key,
            source,
            target: unit.target,
            description,
            meaning,
            notes: unit.notes,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn meaning(&self) -> &str {
        &self.meaning
    }

    /// Notes other than the description and meaning.
    pub fn notes(&self) -> &BTreeMap<String, String> {
        &self.notes
    }
}

impl From<ValidatedUnit> for TranslationUnit {
    fn from(unit: ValidatedUnit) -> Self {
        TranslationUnit {
            key: unit.key,
            source: Some(unit.source),
            target: unit.target,
            description: Some(unit.description),
            meaning: Some(unit.meaning),
            notes: unit.notes,
        }
    }
}
