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

use thiserror::Error;

/// Errors raised while converting an XLIFF document.
///
/// Every variant carries a `context`, which is a filename, a unit key,
/// or `filename:key`. The rest of the variant describes the problem.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{context}: could not parse XML: {message}")]
    Xml { context: String, message: String },
    #[error("{context}: id attribute not found")]
    MissingKey { context: String },
    #[error("{context}: unable to extract {field}")]
    AmbiguousField { context: String, field: &'static str },
    #[error("{context}: unable to extract note from {from:?}")]
    MalformedNote { context: String, from: String },
    #[error("{context}: {field} not found")]
    RequiredFieldMissing { context: String, field: &'static str },
    #[error(
        "{context}: first encountered definition of {meaning:?} has definition {description:?}. \
         This error can occur if the definition was not provided on the first appearance \
         of the message or if the source messages differ."
    )]
    DanglingIbid {
        context: String,
        meaning: String,
        description: String,
    },
    #[error("{context}: second definition of {meaning:?}")]
    DuplicateMeaning { context: String, meaning: String },
    #[error("{context}: msg definition for meaning not found: {meaning}")]
    UndefinedMeaning { context: String, meaning: String },
    #[error("Serde error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The filename and/or unit key the error refers to.
    pub fn context(&self) -> &str {
        match self {
            Error::Io { context, .. }
            | Error::Xml { context, .. }
            | Error::MissingKey { context }
            | Error::AmbiguousField { context, .. }
            | Error::MalformedNote { context, .. }
            | Error::RequiredFieldMissing { context, .. }
            | Error::DanglingIbid { context, .. }
            | Error::DuplicateMeaning { context, .. }
            | Error::UndefinedMeaning { context, .. } => context,
            Error::Json(_) => "",
        }
    }

    /// Qualify a unit-level error with the name of its document.
    ///
    /// A missing key has no unit to name, so its context becomes the
    /// document name. Other unit errors become `document:key`.
    pub(crate) fn in_document(self, document: &str) -> Self {
        let qualify = |context: String| {
            if context.is_empty() {
                document.to_string()
            } else {
                format!("{document}:{context}")
            }
        };
        match self {
            Error::MissingKey { context } => Error::MissingKey {
                context: qualify(context),
            },
            Error::AmbiguousField { context, field } => Error::AmbiguousField {
                context: qualify(context),
                field,
            },
            Error::MalformedNote { context, from } => Error::MalformedNote {
                context: qualify(context),
                from,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
