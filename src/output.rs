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

//! Write translatewiki.net style JSON message files.
//!
//! Three files are produced in the output directory:
//!
//! - `<lang>.json` with the source text of each message,
//! - `qqq.json` with the description of each message,
//! - `keys.json` mapping each message to its XLIFF unit key.
//!
//! Messages are keyed by their meaning and appear in the order given.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::unit::ValidatedUnit;

/// Where and how to write the message files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Contact for translators, e.g. `Jane Doe <jane@example.com>`.
    pub author: String,
    /// Language code of the source text.
    pub lang: String,
    pub output_dir: PathBuf,
    /// Also write `keys.json`.
    pub write_key_file: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            author: String::from("Ellen Spertus <ellen.spertus@gmail.com>"),
            lang: String::from("en"),
            output_dir: PathBuf::from("json"),
            write_key_file: true,
        }
    }
}

fn metadata(author: &str, locale: &str, last_updated: &str) -> Value {
    json!({
        "authors": [author],
        "lastupdated": last_updated,
        "locale": locale,
        "messagedocumentation": "qqq",
    })
}

/// Undo the `{lb}` and `{rb}` brace escapes of Closure templates.
fn unescape_braces(text: &str) -> String {
    text.replace("{lb}", "{").replace("{rb}", "}")
}

fn messages<F>(units: &[ValidatedUnit], metadata: Option<Value>, value: F) -> Value
where
    F: Fn(&ValidatedUnit) -> String,
{
    let mut map = Map::new();
    if let Some(metadata) = metadata {
        map.insert(String::from("@metadata"), metadata);
    }
    for unit in units {
        map.insert(unit.meaning().to_string(), Value::String(value(unit)));
    }
    Value::Object(map)
}

/// The contents of `<lang>.json`: the source text of each message.
pub fn source_messages(units: &[ValidatedUnit], options: &WriteOptions, last_updated: &str) -> Value {
    let metadata = metadata(&options.author, &options.lang, last_updated);
    messages(units, Some(metadata), |unit| unit.source().to_string())
}

/// The contents of `qqq.json`: the description of each message.
pub fn description_messages(
    units: &[ValidatedUnit],
    options: &WriteOptions,
    last_updated: &str,
) -> Value {
    let metadata = metadata(&options.author, "qqq", last_updated);
    messages(units, Some(metadata), |unit| unescape_braces(unit.description()))
}

/// The contents of `keys.json`: the XLIFF key of each message.
pub fn key_messages(units: &[ValidatedUnit]) -> Value {
    messages(units, None, |unit| unit.key().to_string())
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    std::fs::write(path, text).map_err(|source| Error::Io {
        context: path.display().to_string(),
        source,
    })
}

/// Write all message files for `units`. Returns the written paths.
pub fn write_files(units: &[ValidatedUnit], options: &WriteOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&options.output_dir).map_err(|source| Error::Io {
        context: options.output_dir.display().to_string(),
        source,
    })?;
    let last_updated = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string();

    let mut files = vec![
        (
            options.output_dir.join(format!("{}.json", options.lang)),
            source_messages(units, options, &last_updated),
        ),
        (
            options.output_dir.join("qqq.json"),
            description_messages(units, options, &last_updated),
        ),
    ];
    if options.write_key_file {
        files.push((options.output_dir.join("keys.json"), key_messages(units)));
    }

    let mut written = Vec::new();
    for (path, value) in files {
        write_json(&path, &value)?;
        log::info!("Wrote {} messages to {}", units.len(), path.display());
        written.push(path);
    }
    Ok(written)
}
