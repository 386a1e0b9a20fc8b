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

//! Turn `trans-unit` elements into [`TranslationUnit`] values.

use crate::error::{Error, Result};
use crate::unit::TranslationUnit;
use crate::xliff::{Element, Node};

/// Literal inner XML of the single `tag` element below `trans_unit`.
fn field_value(trans_unit: &Element, key: &str, tag: &'static str) -> Result<Option<String>> {
    match trans_unit.descendants_named(tag).as_slice() {
        [] => Ok(None),
        [element] => Ok(Some(element.inner_xml())),
        _ => Err(Error::AmbiguousField {
            context: key.to_string(),
            field: tag,
        }),
    }
}

/// Extract a single translation unit.
///
/// Errors carry the unit key as context, or an empty context when the
/// key itself is missing.
///
/// # Examples
///
/// ```
/// use xliff_to_json::extract::extract_unit;
/// use xliff_to_json::xliff::Document;
///
/// let doc = Document::parse(
///     "messages.xlf",
///     r#"<trans-unit id="4711">
///          <source>Hello</source>
///          <note from="description">Says hello</note>
///          <note from="meaning">greet</note>
///        </trans-unit>"#,
/// )
/// .unwrap();
/// let unit = extract_unit(doc.root()).unwrap();
/// assert_eq!(unit.key, "4711");
/// assert_eq!(unit.source.as_deref(), Some("Hello"));
/// assert_eq!(unit.target, None);
/// assert_eq!(unit.meaning.as_deref(), Some("greet"));
/// ```
pub fn extract_unit(trans_unit: &Element) -> Result<TranslationUnit> {
    let key = match trans_unit.attribute("id") {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Err(Error::MissingKey {
                context: String::new(),
            })
        }
    };

    let mut unit = TranslationUnit::new(key);
    unit.source = field_value(trans_unit, key, "source")?;
    unit.target = field_value(trans_unit, key, "target")?;

    for note in trans_unit.descendants_named("note") {
        let from = note.attribute("from").unwrap_or_default();
        match note.children() {
            [Node::Text { data, .. }] if !from.is_empty() => unit.set_note(from, data.clone()),
            _ => {
                return Err(Error::MalformedNote {
                    context: key.to_string(),
                    from: from.to_string(),
                })
            }
        }
    }

    log::debug!("Extracted unit {key}");
    Ok(unit)
}
