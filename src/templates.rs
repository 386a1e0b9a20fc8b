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

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sort::is_space;

/// Template source text in which message meanings are declared.
///
/// Each line is trimmed of ASCII whitespace and the lines of all
/// templates are joined with single spaces, so declarations spread
/// over several lines can be matched as one run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCorpus {
    reference: String,
    text: String,
}

fn join_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.trim_matches(|c: char| c.is_ascii() && is_space(c as u8)))
        .collect::<Vec<_>>()
        .join(" ")
}

impl TemplateCorpus {
    /// Wrap already joined template text. `reference` names where it
    /// came from and is used as error context.
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        TemplateCorpus {
            reference: reference.into(),
            text: text.into(),
        }
    }

    /// Build a corpus from `(name, contents)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use xliff_to_json::templates::TemplateCorpus;
    ///
    /// let corpus = TemplateCorpus::from_sources([
    ///     ("a.soy", "{msg\n    meaning=\"greet\"\n}"),
    ///     ("b.soy", "  {msg meaning=\"bye\"}  \n"),
    /// ]);
    /// assert_eq!(corpus.reference(), "a.soy, b.soy");
    /// assert_eq!(corpus.text(), "{msg meaning=\"greet\" } {msg meaning=\"bye\"}");
    /// ```
    pub fn from_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let (names, texts): (Vec<_>, Vec<_>) = sources
            .into_iter()
            .map(|(name, text)| (name, join_lines(text)))
            .unzip();
        TemplateCorpus::new(names.join(", "), texts.join(" "))
    }

    /// Read and join the template files at `paths`.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut names = Vec::new();
        let mut contents = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let name = path.display().to_string();
            let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
                context: name.clone(),
                source,
            })?;
            names.push(name);
            contents.push(text);
        }
        Ok(TemplateCorpus::from_sources(
            names
                .iter()
                .map(String::as_str)
                .zip(contents.iter().map(String::as_str)),
        ))
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Split template arguments on commas. Empty entries are skipped.
///
/// ```
/// use std::path::PathBuf;
/// use xliff_to_json::templates::template_paths;
///
/// assert_eq!(
///     template_paths(["a.soy,b.soy", " c.soy ,", "d.soy"]),
///     vec![
///         PathBuf::from("a.soy"),
///         PathBuf::from("b.soy"),
///         PathBuf::from("c.soy"),
///         PathBuf::from("d.soy"),
///     ]
/// );
/// ```
pub fn template_paths<I, S>(args: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .flat_map(|arg| {
            arg.as_ref()
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        })
        .collect()
}
