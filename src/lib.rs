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

//! Convert XLIFF exports into ordered message lists.
//!
//! A build step exports the messages of a project as an XLIFF file.
//! Each `trans-unit` carries a source text and translator notes with a
//! `description` and a `meaning`. The functions here turn such a
//! document into a list of validated messages, one per meaning, ordered
//! by where the meaning is declared in the project's templates. The
//! [`output`] module writes the list as JSON files for
//! translatewiki.net.
//!
//! A meaning may appear on several units. The first unit defines it,
//! and every later unit must use the description `ibid` to refer back
//! to that definition.

pub mod error;
pub mod extract;
pub mod output;
pub mod sort;
pub mod templates;
pub mod unit;
pub mod validate;
pub mod xliff;

pub use error::{Error, Result};
pub use templates::TemplateCorpus;
pub use unit::{TranslationUnit, ValidatedUnit};

use xliff::Document;

/// Extract and validate every `trans-unit` of `document`.
///
/// Units are processed in document order, so the first problem in the
/// document is the one reported.
pub fn process_document(document: &Document) -> Result<Vec<ValidatedUnit>> {
    let units = document.trans_units().into_iter().map(|trans_unit| {
        extract::extract_unit(trans_unit).map_err(|err| err.in_document(document.name()))
    });
    let validated = validate::validate_each(document.name(), units)?;
    log::info!(
        "Found {} messages in {}",
        validated.len(),
        document.name()
    );
    Ok(validated)
}

/// Extract, validate and sort the messages of `document`.
///
/// # Examples
///
/// ```
/// use xliff_to_json::xliff::Document;
/// use xliff_to_json::{convert, TemplateCorpus};
///
/// let document = Document::parse(
///     "messages.xlf",
///     r#"<xliff><file><body>
///          <trans-unit id="1">
///            <source>Hello</source>
///            <note from="description">Says hello</note>
///            <note from="meaning">greet</note>
///          </trans-unit>
///          <trans-unit id="2">
///            <source>Goodbye</source>
///            <note from="description">Says goodbye</note>
///            <note from="meaning">farewell</note>
///          </trans-unit>
///        </body></file></xliff>"#,
/// )
/// .unwrap();
/// let templates = TemplateCorpus::from_sources([(
///     "template.soy",
///     "{msg meaning=\"farewell\" desc=\"\"}\n{msg meaning=\"greet\" desc=\"\"}",
/// )]);
///
/// let units = convert(&document, &templates).unwrap();
/// let keys = units.iter().map(|unit| unit.key()).collect::<Vec<_>>();
/// assert_eq!(keys, vec!["2", "1"]);
/// ```
pub fn convert(document: &Document, templates: &TemplateCorpus) -> Result<Vec<ValidatedUnit>> {
    let units = process_document(document)?;
    sort::sort_units(units, templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trans_unit(key: &str, meaning: &str, description: &str) -> String {
        format!(
            r#"<trans-unit id="{key}" datatype="html">
                 <source>Source of {key}</source>
                 <note priority="1" from="description">{description}</note>
                 <note priority="1" from="meaning">{meaning}</note>
               </trans-unit>"#
        )
    }

    fn document(units: &[String]) -> Document {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file source-language="en" datatype="plaintext" original="SoyMsgBundle">
    <body>
      {}
    </body>
  </file>
</xliff>"#,
            units.join("\n")
        );
        Document::parse("messages.xlf", &xml).unwrap()
    }

    fn greet_farewell_templates() -> TemplateCorpus {
        TemplateCorpus::from_sources([(
            "template.soy",
            r#"{template .messages}
  {msg meaning="farewell" desc="Says goodbye"}Goodbye{/msg}
  {msg meaning="greet" desc="Says hello"}Hello{/msg}
{/template}"#,
        )])
    }

    fn keys(units: &[ValidatedUnit]) -> Vec<&str> {
        units.iter().map(ValidatedUnit::key).collect()
    }

    #[test]
    fn convert_drops_ibid_and_sorts() {
        let document = document(&[
            trans_unit("A", "greet", "Says hello"),
            trans_unit("B", "greet", "ibid"),
            trans_unit("C", "farewell", "Says goodbye"),
        ]);
        let validated = process_document(&document).unwrap();
        assert_eq!(keys(&validated), vec!["A", "C"]);

        let sorted = convert(&document, &greet_farewell_templates()).unwrap();
        assert_eq!(keys(&sorted), vec!["C", "A"]);
    }

    #[test]
    fn convert_ibid_before_definition() {
        let document = document(&[
            trans_unit("B", "greet", "ibid"),
            trans_unit("A", "greet", "Says hello"),
            trans_unit("C", "farewell", "Says goodbye"),
        ]);
        let err = convert(&document, &greet_farewell_templates()).unwrap_err();
        assert!(matches!(err, Error::DanglingIbid { .. }));
        assert_eq!(err.context(), "messages.xlf");
    }

    #[test]
    fn convert_duplicate_meaning() {
        let document = document(&[
            trans_unit("A", "greet", "Says hello"),
            trans_unit("B", "greet", "Says hi"),
        ]);
        let err = convert(&document, &greet_farewell_templates()).unwrap_err();
        assert!(matches!(err, Error::DuplicateMeaning { .. }));
    }

    #[test]
    fn convert_undefined_meaning() {
        let document = document(&[
            trans_unit("A", "greet", "Says hello"),
            trans_unit("D", "unknown", "Not in the templates"),
        ]);
        let err = convert(&document, &greet_farewell_templates()).unwrap_err();
        assert!(matches!(err, Error::UndefinedMeaning { ref meaning, .. } if meaning == "unknown"));
        assert_eq!(err.context(), "template.soy");
    }

    #[test]
    fn process_document_reports_first_problem() {
        // The second unit has no key, but the first one already lacks
        // a description.
        let document = document(&[
            String::from(r#"<trans-unit id="1"><source>x</source></trans-unit>"#),
            String::from("<trans-unit><source>y</source></trans-unit>"),
        ]);
        let err = process_document(&document).unwrap_err();
        assert!(matches!(err, Error::RequiredFieldMissing { field: "description", .. }));
        assert_eq!(err.context(), "messages.xlf:1");
    }

    #[test]
    fn process_document_qualifies_extraction_errors() {
        let document = document(&[String::from(
            r#"<trans-unit id="7"><note from="meaning"></note></trans-unit>"#,
        )]);
        let err = process_document(&document).unwrap_err();
        assert!(matches!(err, Error::MalformedNote { .. }));
        assert_eq!(err.context(), "messages.xlf:7");
    }

    #[test]
    fn process_document_missing_key() {
        let document = document(&[String::from("<trans-unit><source>y</source></trans-unit>")]);
        let err = process_document(&document).unwrap_err();
        assert!(matches!(err, Error::MissingKey { .. }));
        assert_eq!(err.context(), "messages.xlf");
    }

    #[test]
    fn process_document_keeps_target_and_markup() {
        let document = document(&[String::from(
            r#"<trans-unit id="1">
                 <source>Hello <x id="NAME"/></source>
                 <target>Hallo <x id="NAME"/></target>
                 <note from="description">Says hello</note>
                 <note from="meaning">greet</note>
               </trans-unit>"#,
        )]);
        let validated = process_document(&document).unwrap();
        assert_eq!(validated[0].source(), r#"Hello <x id="NAME"/>"#);
        assert_eq!(validated[0].target(), Some(r#"Hallo <x id="NAME"/>"#));
    }

    #[test]
    fn process_document_is_idempotent() {
        let document = document(&[
            trans_unit("A", "greet", "Says hello"),
            trans_unit("B", "greet", "ibid"),
            trans_unit("C", "farewell", "Says goodbye"),
        ]);
        assert_eq!(
            process_document(&document).unwrap(),
            process_document(&document).unwrap()
        );
    }

    #[test]
    fn process_empty_document() {
        let document = document(&[]);
        assert_eq!(process_document(&document).unwrap(), Vec::new());
    }
}
