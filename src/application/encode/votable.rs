//! VOTable XML serialization with tab indentation.

use crate::domain::{
    ResultSet,
    votable::{Field, Info, Resource, Table, VoTable},
};

const XML_PROLOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

pub fn encode(result: &ResultSet) -> String {
    to_xml(&VoTable::from_result(result))
}

/// Serialize the error document for a failed request.
pub fn error_document(detail: &str, status: u16) -> String {
    to_xml(&VoTable::error(detail, status))
}

pub fn to_xml(document: &VoTable) -> String {
    let root = Element::new("VOTABLE")
        .attr("version", &document.version)
        .attr("xmlns", &document.xmlns)
        .child(resource_element(&document.resource));

    let mut out = String::from(XML_PROLOG);
    root.write(&mut out, 0);
    out
}

fn resource_element(resource: &Resource) -> Element<'_> {
    let mut element = Element::new("RESOURCE").attr("type", &resource.kind);
    for info in &resource.infos {
        element = element.child(info_element(info));
    }
    for table in &resource.tables {
        element = element.child(table_element(table));
    }
    element
}

fn info_element(info: &Info) -> Element<'_> {
    let mut element = Element::new("INFO").attr("name", &info.name);
    if let Some(value) = info.value.as_deref() {
        element = element.attr("value", value);
    }
    if let Some(description) = info.description.as_deref() {
        element = element.child(Element::new("DESCRIPTION").text(description));
    }
    element
}

fn table_element(table: &Table) -> Element<'_> {
    let mut element = Element::new("TABLE").attr("name", &table.name);
    if let Some(description) = table.description.as_deref() {
        element = element.child(Element::new("DESCRIPTION").text(description));
    }
    for field in &table.fields {
        element = element.child(field_element(field));
    }

    let mut tabledata = Element::new("TABLEDATA");
    for row in &table.rows {
        let mut tr = Element::new("TR");
        for cell in row {
            tr = tr.child(Element::new("TD").text(cell));
        }
        tabledata = tabledata.child(tr);
    }
    element.child(Element::new("DATA").child(tabledata))
}

fn field_element(field: &Field) -> Element<'_> {
    let mut element = Element::new("FIELD")
        .attr("name", &field.name)
        .attr("datatype", &field.datatype);
    if let Some(arraysize) = field.arraysize.as_deref() {
        element = element.attr("arraysize", arraysize);
    }
    if let Some(unit) = field.unit.as_deref() {
        element = element.attr("unit", unit);
    }
    if let Some(description) = field.description.as_deref() {
        element = element.child(Element::new("DESCRIPTION").text(description));
    }
    element
}

#[derive(Debug)]
struct Element<'a> {
    name: &'static str,
    attrs: Vec<(&'static str, &'a str)>,
    text: Option<&'a str>,
    children: Vec<Element<'a>>,
}

impl<'a> Element<'a> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    fn attr(mut self, name: &'static str, value: &'a str) -> Self {
        self.attrs.push((name, value));
        self
    }

    fn text(mut self, text: &'a str) -> Self {
        self.text = Some(text);
        self
    }

    fn child(mut self, child: Element<'a>) -> Self {
        self.children.push(child);
        self
    }

    fn write(&self, out: &mut String, depth: usize) {
        indent(out, depth);
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(out, value, true);
            out.push('"');
        }
        out.push('>');

        if self.children.is_empty() {
            if let Some(text) = self.text {
                escape_into(out, text, false);
            }
        } else {
            for child in &self.children {
                out.push('\n');
                child.write(out, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
        }

        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn escape_into(out: &mut String, input: &str, attribute: bool) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#xA;"),
            '\t' if attribute => out.push_str("&#x9;"),
            '\r' => out.push_str("&#xD;"),
            ch if !is_xml_char(ch) => out.push(char::REPLACEMENT_CHARACTER),
            _ => out.push(ch),
        }
    }
}

/// XML 1.0 `Char` production.
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
        || ch >= '\u{10000}'
}
