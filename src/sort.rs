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

//! Order units by where their meaning is declared in the templates.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::templates::TemplateCorpus;
use crate::unit::ValidatedUnit;

/// ASCII whitespace, as understood by the template tooling.
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r##"(?x)
              (?-u:\s) meaning           # the attribute name
              (?-u:\s)* = (?-u:\s)*      # the assignment
              "(?<value>[^"]*)"          # the quoted meaning
        "##;
        Regex::new(pattern).expect("well-formed regex")
    })
}

/// First declaration offset of every meaning in a corpus.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Definitions<'a> {
    offsets: HashMap<&'a str, usize>,
}

impl<'a> Definitions<'a> {
    /// Find all `meaning="..."` declarations in `corpus`.
    ///
    /// A declaration must be preceded and followed by whitespace. A
    /// candidate is tried at every whitespace position, so a rejected
    /// candidate never hides a declaration inside it.
    pub fn scan(corpus: &'a str) -> Self {
        let bytes = corpus.as_bytes();
        let mut offsets = HashMap::new();
        let mut pos = 0;
        while let Some(captures) = declaration_regex().captures_at(corpus, pos) {
            let (Some(whole), Some(value)) = (captures.get(0), captures.name("value")) else {
                break;
            };
            if bytes.get(whole.end()).is_some_and(|&byte| is_space(byte)) {
                offsets.entry(value.as_str()).or_insert(whole.start());
            }
            // The match starts with one ASCII byte.
            pos = whole.start() + 1;
        }
        Definitions { offsets }
    }

    /// Byte offset of the first declaration of `meaning`.
    pub fn offset(&self, meaning: &str) -> Option<usize> {
        self.offsets.get(meaning).copied()
    }
}

/// Byte offset of the first `meaning="..."` declaration of `meaning`.
///
/// The declaration must be surrounded by whitespace and its value must
/// equal `meaning`, so a meaning never matches inside a longer one.
///
/// # Examples
///
/// ```
/// use xliff_to_json::sort::definition_offset;
///
/// let templates = r#"{msg meaning="greet.long" } {msg meaning = "greet" }"#;
/// assert_eq!(definition_offset(templates, "greet"), Some(32));
/// assert_eq!(definition_offset(templates, "gree"), None);
/// ```
pub fn definition_offset(corpus: &str, meaning: &str) -> Option<usize> {
    Definitions::scan(corpus).offset(meaning)
}

/// Sort `units` by the position of their meaning declaration in
/// `corpus`.
///
/// The sort is stable. A unit whose meaning is not declared anywhere
/// fails the whole sort.
pub fn sort_units(units: Vec<ValidatedUnit>, corpus: &TemplateCorpus) -> Result<Vec<ValidatedUnit>> {
    let definitions = Definitions::scan(corpus.text());
    let mut keyed = units
        .into_iter()
        .map(|unit| match definitions.offset(unit.meaning()) {
            Some(offset) => Ok((offset, unit)),
            None => Err(Error::UndefinedMeaning {
                context: corpus.reference().to_string(),
                meaning: unit.meaning().to_string(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(offset, _)| *offset);
    Ok(keyed.into_iter().map(|(_, unit)| unit).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::TranslationUnit;
    use crate::validate::validate_units;
    use pretty_assertions::assert_eq;

    fn units(defs: &[(&str, &str)]) -> Vec<ValidatedUnit> {
        let units = defs.iter().map(|(key, meaning)| {
            let mut unit = TranslationUnit::new(*key);
            unit.source = Some(format!("Source of {key}"));
            unit.meaning = Some(meaning.to_string());
            unit.description = Some(format!("Description of {key}"));
            unit
        });
        validate_units("test.xlf", units).unwrap()
    }

    #[track_caller]
    fn assert_sorted_keys(defs: &[(&str, &str)], templates: &str, expected: &[&str]) {
        let corpus = TemplateCorpus::new("template.soy", templates);
        let sorted = sort_units(units(defs), &corpus).unwrap();
        assert_eq!(
            sorted.iter().map(ValidatedUnit::key).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn offset_allows_spaces_around_equals() {
        assert_eq!(definition_offset(r#"{msg meaning  =  "a" }"#, "a"), Some(4));
        assert_eq!(definition_offset(r#"{msg meaning="a" }"#, "a"), Some(4));
    }

    #[test]
    fn offset_requires_surrounding_whitespace() {
        assert_eq!(definition_offset(r#"{msg meaning="a"}"#, "a"), None);
        assert_eq!(definition_offset(r#"{msg xmeaning="a" }"#, "a"), None);
    }

    #[test]
    fn offset_is_first_match() {
        let templates = r#"{msg meaning="a" } {msg meaning="a" }"#;
        assert_eq!(definition_offset(templates, "a"), Some(4));
    }

    #[test]
    fn offset_treats_meaning_literally() {
        let templates = r#"{msg meaning="a.b" } {msg meaning="a+b" }"#;
        assert_eq!(definition_offset(templates, "a+b"), Some(25));
        assert_eq!(definition_offset(templates, "a.c"), None);
        assert_eq!(definition_offset(r#"{msg meaning="axb" }"#, "a.b"), None);
    }

    #[test]
    fn offset_adjacent_declarations() {
        let templates = r#" meaning="a" meaning="b" "#;
        assert_eq!(definition_offset(templates, "a"), Some(0));
        assert_eq!(definition_offset(templates, "b"), Some(12));
    }

    #[test]
    fn offset_after_rejected_candidate() {
        // The unterminated value swallows the next declaration.
        let templates = r#" meaning="x meaning="y" "#;
        assert_eq!(definition_offset(templates, "y"), Some(11));
        assert_eq!(definition_offset(templates, "x meaning="), None);
    }

    #[test]
    fn offset_only_ascii_whitespace() {
        assert_eq!(definition_offset("\u{a0}meaning=\"a\" ", "a"), None);
        assert_eq!(definition_offset(" meaning=\"a\"\u{3000}", "a"), None);
        assert_eq!(definition_offset("\tmeaning\x0b=\x0c\"a\"\r", "a"), Some(0));
    }

    #[test]
    fn offset_long_meaning() {
        let meaning = "a".repeat(2_000_000);
        let templates = format!(r#" meaning="{meaning}" "#);
        assert_eq!(definition_offset(&templates, &meaning), Some(0));
        assert_eq!(definition_offset(&templates, &meaning[1..]), None);
    }

    #[test]
    fn sort_long_meaning() {
        let meaning = "m".repeat(2_000_000);
        let corpus = TemplateCorpus::new(
            "template.soy",
            format!(r#" meaning="b"  meaning="{meaning}" "#),
        );
        let sorted = sort_units(units(&[("long", meaning.as_str()), ("short", "b")]), &corpus).unwrap();
        assert_eq!(
            sorted.iter().map(ValidatedUnit::key).collect::<Vec<_>>(),
            vec!["short", "long"]
        );
    }

    #[test]
    fn sort_by_definition_order() {
        assert_sorted_keys(
            &[("A", "greet"), ("C", "farewell")],
            r#"{msg meaning="farewell" desc="Says goodbye"} {msg meaning="greet" desc="Says hello"}"#,
            &["C", "A"],
        );
    }

    #[test]
    fn sort_keeps_sorted_input() {
        assert_sorted_keys(
            &[("1", "one"), ("2", "two"), ("3", "three")],
            r#" meaning="one"  meaning="two"  meaning="three" "#,
            &["1", "2", "3"],
        );
    }

    #[test]
    fn sort_is_stable_for_equal_offsets() {
        // Two declarations cannot share an offset, so feed two units
        // with the same meaning through the sorter directly.
        let mut units = units(&[("A", "greet")]);
        units.push(ValidatedUnit::new(
            TranslationUnit::new("B"),
            String::from("Hello"),
            String::from("Says hello"),
            String::from("greet"),
        ));
        let corpus = TemplateCorpus::new("template.soy", r#" meaning="greet" "#);
        let sorted = sort_units(units, &corpus).unwrap();
        assert_eq!(
            sorted.iter().map(ValidatedUnit::key).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
    }

    #[test]
    fn sort_offsets_are_non_decreasing() {
        let templates = r#" meaning="d"  meaning="b"  meaning="a"  meaning="c" "#;
        let corpus = TemplateCorpus::new("template.soy", templates);
        let sorted = sort_units(
            units(&[("1", "a"), ("2", "b"), ("3", "c"), ("4", "d")]),
            &corpus,
        )
        .unwrap();
        let offsets = sorted
            .iter()
            .map(|unit| definition_offset(templates, unit.meaning()).unwrap())
            .collect::<Vec<_>>();
        assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(offsets.len(), 4);
    }

    #[test]
    fn sort_undefined_meaning() {
        let corpus = TemplateCorpus::new("template.soy", r#" meaning="greet" "#);
        let err = sort_units(units(&[("A", "greet"), ("B", "farewell")]), &corpus).unwrap_err();
        assert!(matches!(err, Error::UndefinedMeaning { ref meaning, .. } if meaning == "farewell"));
        assert_eq!(err.context(), "template.soy");
    }

    #[test]
    fn sort_empty() {
        let corpus = TemplateCorpus::new("template.soy", "");
        assert_eq!(sort_units(Vec::new(), &corpus).unwrap(), Vec::new());
    }
}
