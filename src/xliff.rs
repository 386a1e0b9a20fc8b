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

//! A small XML tree for XLIFF documents.
//!
//! The tree keeps enough of the input to serialize the inside of a
//! `<source>` or `<target>` element back to literal XML: start tags
//! are stored as written and text nodes keep their escaped form next
//! to the unescaped data.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// A node below an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data. `raw` is the text as written in the document
    /// (CDATA sections keep their `<![CDATA[...]]>` wrapper), `data`
    /// is the unescaped value.
    Text { raw: String, data: String },
    Comment(String),
    ProcessingInstruction(String),
}

impl Node {
    /// Append the XML serialization of this node to `out`.
    pub fn write_xml(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_xml(out),
            Node::Text { raw, .. } => out.push_str(raw),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Node::ProcessingInstruction(text) => {
                out.push_str("<?");
                out.push_str(text);
                out.push_str("?>");
            }
        }
    }

    /// The XML serialization of this node.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    /// Start tag contents between `<` and `>`, as written.
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart) -> std::result::Result<Self, String> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let tag = String::from_utf8_lossy(start).trim_end().to_string();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| format!("<{name}>: {err}"))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|err| format!("<{name}> attribute {key:?}: {err}"))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            tag,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// All elements below this one with the given tag name, in
    /// document order. The element itself is not included.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if let Node::Element(element) = child {
                if element.name == name {
                    found.push(element);
                }
                element.collect_named(name, found);
            }
        }
    }

    /// The concatenated serialization of the children.
    pub fn inner_xml(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_xml(&mut out);
        }
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_xml(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A fully parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    root: Element,
}

impl Document {
    /// Parse `text` as XML. The `name` is used as error context,
    /// typically the path of the file.
    ///
    /// # Examples
    ///
    /// ```
    /// use xliff_to_json::xliff::Document;
    ///
    /// let doc = Document::parse(
    ///     "messages.xlf",
    ///     r#"<xliff><file><body>
    ///          <trans-unit id="1"><source>Hi <x id="NAME"/>!</source></trans-unit>
    ///        </body></file></xliff>"#,
    /// )
    /// .unwrap();
    /// let units = doc.trans_units();
    /// assert_eq!(units.len(), 1);
    /// assert_eq!(units[0].attribute("id"), Some("1"));
    /// assert_eq!(
    ///     units[0].descendants_named("source")[0].inner_xml(),
    ///     r#"Hi <x id="NAME"/>!"#
    /// );
    /// ```
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Document> {
        let name = name.into();
        match parse_root(text) {
            Ok(root) => Ok(Document { name, root }),
            Err(message) => Err(Error::Xml {
                context: name,
                message,
            }),
        }
    }

    /// Read and parse the file at `path`.
    pub fn open(path: &Path) -> Result<Document> {
        let name = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            context: name.clone(),
            source,
        })?;
        Document::parse(name, &text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All `trans-unit` elements in document order.
    pub fn trans_units(&self) -> Vec<&Element> {
        let mut units = Vec::new();
        if self.root.name == "trans-unit" {
            units.push(&self.root);
        }
        units.extend(self.root.descendants_named("trans-unit"));
        units
    }
}

fn parse_root(text: &str) -> std::result::Result<Element, String> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| format!("{err} (at byte {})", reader.buffer_position()))?;
        let node = match event {
            Event::Start(start) => {
                stack.push(Element::from_start(&start)?);
                continue;
            }
            Event::Empty(start) => Node::Element(Element::from_start(&start)?),
            Event::End(_) => match stack.pop() {
                Some(element) => Node::Element(element),
                None => return Err(String::from("unexpected closing tag")),
            },
            Event::Text(text) => Node::Text {
                raw: String::from_utf8_lossy(&text).into_owned(),
                data: text.unescape().map_err(|err| err.to_string())?.into_owned(),
            },
            Event::CData(cdata) => {
                let data = String::from_utf8_lossy(&cdata).into_owned();
                Node::Text {
                    raw: format!("<![CDATA[{data}]]>"),
                    data,
                }
            }
            Event::Comment(comment) => Node::Comment(String::from_utf8_lossy(&comment).into_owned()),
            Event::PI(pi) => Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned()),
            Event::Decl(_) | Event::DocType(_) => continue,
            Event::Eof => break,
        };

        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            // Only the root element matters outside of any element;
            // prolog whitespace, comments and instructions are dropped.
            None => {
                if let Node::Element(element) = node {
                    if root.is_some() {
                        return Err(String::from("more than one root element"));
                    }
                    root = Some(element);
                }
            }
        }
    }

    if let Some(element) = stack.last() {
        return Err(format!("unclosed element <{}>", element.name));
    }
    root.ok_or_else(|| String::from("no root element"))
}
