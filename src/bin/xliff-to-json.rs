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

//! Convert an `.xlf` file into JSON files for translatewiki.net.
//!
//! The messages of the XLIFF file are validated, ordered by where
//! their meaning is declared in the given templates, and written as
//! `<lang>.json`, `qqq.json` and `keys.json`. The input file is
//! removed afterwards, unless `--keep-input` is given.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;
use xliff_to_json::output::{write_files, WriteOptions};
use xliff_to_json::templates::template_paths;
use xliff_to_json::xliff::Document;
use xliff_to_json::{convert, TemplateCorpus};

/// Create translation files.
#[derive(Debug, Parser)]
struct Cli {
    /// Name and email address of contact for translators.
    #[arg(long, default_value = "Ellen Spertus <ellen.spertus@gmail.com>")]
    author: String,
    /// ISO 639-1 source language code.
    #[arg(long, default_value = "en")]
    lang: String,
    /// Directory for output files.
    #[arg(long, default_value = "json")]
    output_dir: PathBuf,
    /// File containing the XLIFF definitions.
    #[arg(long, value_name = "messages.xlf")]
    xlf: PathBuf,
    /// Templates in which the message meanings are declared, comma or
    /// space separated. Used for ordering messages.
    #[arg(long, num_args = 1.., default_value = "template.soy")]
    templates: Vec<String>,
    /// Do not remove the XLIFF file after a successful conversion.
    #[arg(long)]
    keep_input: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let document = Document::open(&cli.xlf)
        .with_context(|| format!("Could not read {}", cli.xlf.display()))?;
    let templates = TemplateCorpus::load(&template_paths(&cli.templates))
        .context("Could not read templates")?;
    let units = convert(&document, &templates)
        .with_context(|| format!("Could not convert {}", cli.xlf.display()))?;

    let options = WriteOptions {
        author: cli.author.clone(),
        lang: cli.lang.clone(),
        output_dir: cli.output_dir.clone(),
        write_key_file: true,
    };
    write_files(&units, &options).context("Writing message files")?;

    if !cli.keep_input {
        remove_input(&cli.xlf)?;
    }
    Ok(())
}

fn remove_input(path: &Path) -> anyhow::Result<()> {
    std::fs::remove_file(path).with_context(|| format!("Could not remove {}", path.display()))?;
    info!("Removed {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    run(&cli)
}
