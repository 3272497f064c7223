//! Channel-agnostic notification messages.
//!
//! A message is a summary line plus ordered sections of labelled fields.
//! Transports map sections onto their own block structure; values may
//! contain `<url|text>` link markup.

use std::fmt;

use serde::Serialize;

/// One labelled value in a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field label, e.g. `Who`.
    pub label: String,
    /// Rendered value.
    pub value: String,
}

impl Field {
    /// Creates a new field.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// An ordered group of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Fields in display order.
    pub fields: Vec<Field>,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field::new(label, value));
        self
    }

    /// Appends a field only if `value` is present.
    pub fn optional_field(
        self,
        label: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        match value {
            Some(value) => self.field(label, value),
            None => self,
        }
    }

    /// Returns the value of the first field with this label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }
}

/// A notification ready for a sink.
///
/// By convention the first section is the header and the second the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    /// Plain-text summary, used as the notification fallback text.
    pub summary: String,
    /// Display sections, in order.
    pub sections: Vec<Section>,
}

impl NotificationMessage {
    /// Creates a message with no sections.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            sections: Vec::new(),
        }
    }

    /// Appends a section.
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Returns the header section, if present.
    pub fn header(&self) -> Option<&Section> {
        self.sections.first()
    }

    /// Returns the body section, if present.
    pub fn body(&self) -> Option<&Section> {
        self.sections.get(1)
    }
}

/// A link rendered as `<url|text>`, or just the text when there is no URL.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    url: Option<&'a str>,
    text: &'a str,
}

impl<'a> Link<'a> {
    /// Creates a link.
    pub fn new(url: &'a str, text: &'a str) -> Self {
        Self {
            url: Some(url),
            text,
        }
    }

    /// Creates a link that renders as plain text when `url` is `None`.
    pub fn maybe(url: Option<&'a str>, text: &'a str) -> Self {
        Self { url, text }
    }
}

impl fmt::Display for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.url {
            Some(url) => write!(f, "<{}|{}>", url, self.text),
            None => f.write_str(self.text),
        }
    }
}
