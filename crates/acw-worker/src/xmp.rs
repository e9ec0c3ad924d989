//! XMP metadata document serializer.
//!
//! Produces a single `rdf:Description` with custom namespace bindings.
//! Arrays are written as `rdf:Seq` and structs as resources:
//!
//! ```xml
//! <ccai:colorNames>
//!   <rdf:Seq>
//!     <rdf:li>Purple</rdf:li>
//!   </rdf:Seq>
//! </ccai:colorNames>
//! ```

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{WorkerError, WorkerResult};

const XMP_META_NS: &str = "adobe:ns:meta/";
const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RESERVED_PREFIXES: &[&str] = &["x", "rdf", "xml", "xmlns"];

#[derive(Debug, Clone, PartialEq)]
pub enum XmpValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Date(DateTime<Utc>),
    Seq(Vec<XmpValue>),
    /// Named fields; names are qualified (`prefix:name`)
    Struct(Vec<(String, XmpValue)>),
}

impl From<&str> for XmpValue {
    fn from(value: &str) -> Self {
        XmpValue::Text(value.to_string())
    }
}

impl From<String> for XmpValue {
    fn from(value: String) -> Self {
        XmpValue::Text(value)
    }
}

impl From<i64> for XmpValue {
    fn from(value: i64) -> Self {
        XmpValue::Integer(value)
    }
}

impl From<u64> for XmpValue {
    fn from(value: u64) -> Self {
        XmpValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for XmpValue {
    fn from(value: f64) -> Self {
        XmpValue::Real(value)
    }
}

impl From<DateTime<Utc>> for XmpValue {
    fn from(value: DateTime<Utc>) -> Self {
        XmpValue::Date(value)
    }
}

impl<T: Into<XmpValue>> From<Vec<T>> for XmpValue {
    fn from(values: Vec<T>) -> Self {
        XmpValue::Seq(values.into_iter().map(Into::into).collect())
    }
}

/// An XMP packet under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmpDocument {
    namespaces: Vec<(String, String)>,
    properties: Vec<(String, XmpValue)>,
}

impl XmpDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri`.
    pub fn namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.namespaces.push((prefix.to_string(), uri.to_string()));
        self
    }

    /// Append a property; `name` is qualified (`prefix:name`).
    pub fn property(mut self, name: &str, value: impl Into<XmpValue>) -> Self {
        self.properties.push((name.to_string(), value.into()));
        self
    }

    pub fn properties(&self) -> &[(String, XmpValue)] {
        &self.properties
    }

    pub fn get(&self, name: &str) -> Option<&XmpValue> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Serialize to an XMP packet.
    ///
    /// Fails when a property or struct field uses an undeclared prefix.
    pub fn to_xml(&self) -> WorkerResult<String> {
        for (prefix, _) in &self.namespaces {
            if RESERVED_PREFIXES.contains(&prefix.as_str()) || !is_name(prefix) {
                return Err(WorkerError::output(format!("Invalid XMP namespace prefix: {}", prefix)));
            }
        }

        let mut out = String::new();
        out.push_str("<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n");
        let _ = writeln!(out, "<x:xmpmeta xmlns:x=\"{}\">", XMP_META_NS);
        let _ = writeln!(out, "  <rdf:RDF xmlns:rdf=\"{}\">", RDF_NS);
        out.push_str("    <rdf:Description rdf:about=\"\"");
        for (prefix, uri) in &self.namespaces {
            let _ = write!(out, "\n        xmlns:{}=\"{}\"", prefix, escape(uri));
        }
        out.push_str(">\n");

        for (name, value) in &self.properties {
            self.check_name(name)?;
            write_property(&mut out, name, value, 3, self)?;
        }

        out.push_str("    </rdf:Description>\n");
        out.push_str("  </rdf:RDF>\n");
        out.push_str("</x:xmpmeta>\n");
        out.push_str("<?xpacket end=\"w\"?>");
        Ok(out)
    }

    fn check_name(&self, name: &str) -> WorkerResult<()> {
        let declared = name
            .split_once(':')
            .filter(|(prefix, local)| is_name(local) && self.namespaces.iter().any(|(p, _)| p == prefix));
        match declared {
            Some(_) => Ok(()),
            None => Err(WorkerError::output(format!(
                "XMP property `{}` does not use a declared namespace prefix",
                name
            ))),
        }
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn scalar_text(value: &XmpValue) -> Option<String> {
    match value {
        XmpValue::Text(s) => Some(escape(s)),
        XmpValue::Integer(i) => Some(i.to_string()),
        XmpValue::Real(f) => Some(f.to_string()),
        XmpValue::Date(d) => Some(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        XmpValue::Seq(_) | XmpValue::Struct(_) => None,
    }
}

fn write_property(
    out: &mut String,
    name: &str,
    value: &XmpValue,
    level: usize,
    doc: &XmpDocument,
) -> WorkerResult<()> {
    indent(out, level);
    if let Some(text) = scalar_text(value) {
        let _ = writeln!(out, "<{}>{}</{}>", name, text, name);
        return Ok(());
    }

    match value {
        XmpValue::Seq(items) => {
            let _ = writeln!(out, "<{}>", name);
            indent(out, level + 1);
            out.push_str("<rdf:Seq>\n");
            for item in items {
                write_item(out, item, level + 2, doc)?;
            }
            indent(out, level + 1);
            out.push_str("</rdf:Seq>\n");
            indent(out, level);
            let _ = writeln!(out, "</{}>", name);
        }
        XmpValue::Struct(fields) => {
            let _ = writeln!(out, "<{} rdf:parseType=\"Resource\">", name);
            for (field, field_value) in fields {
                doc.check_name(field)?;
                write_property(out, field, field_value, level + 1, doc)?;
            }
            indent(out, level);
            let _ = writeln!(out, "</{}>", name);
        }
        _ => {}
    }
    Ok(())
}

fn write_item(out: &mut String, item: &XmpValue, level: usize, doc: &XmpDocument) -> WorkerResult<()> {
    indent(out, level);
    if let Some(text) = scalar_text(item) {
        let _ = writeln!(out, "<rdf:li>{}</rdf:li>", text);
        return Ok(());
    }

    match item {
        XmpValue::Struct(fields) => {
            out.push_str("<rdf:li rdf:parseType=\"Resource\">\n");
            for (field, field_value) in fields {
                doc.check_name(field)?;
                write_property(out, field, field_value, level + 1, doc)?;
            }
            indent(out, level);
            out.push_str("</rdf:li>\n");
        }
        XmpValue::Seq(items) => {
            out.push_str("<rdf:li>\n");
            indent(out, level + 1);
            out.push_str("<rdf:Seq>\n");
            for nested in items {
                write_item(out, nested, level + 2, doc)?;
            }
            indent(out, level + 1);
            out.push_str("</rdf:Seq>\n");
            indent(out, level);
            out.push_str("</rdf:li>\n");
        }
        _ => {}
    }
    Ok(())
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
