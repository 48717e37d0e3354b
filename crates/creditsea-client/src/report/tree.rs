use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::report::NormalizeError;

/// Deepest element nesting accepted before the document is treated as an
/// unexpected tree shape.
pub const MAX_DEPTH: usize = 256;

/// One value in a parsed document.
///
/// Text-only elements without attributes collapse to [`Node::Text`]; anything
/// carrying children or attributes stays an [`Node::Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// An element with every child key mapped to the ordered sequence of its
/// occurrences. Singular elements are still one-item sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub children: BTreeMap<String, Vec<Node>>,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
}

impl Element {
    fn push_child(&mut self, name: String, node: Node) {
        self.children.entry(name).or_default().push(node);
    }

    /// Segments split by comments or CDATA are kept verbatim; trimming happens
    /// once the element closes.
    fn push_text(&mut self, value: &str) {
        match self.text.as_mut() {
            Some(existing) => existing.push_str(value),
            None => self.text = Some(value.to_string()),
        }
    }

    fn into_node(mut self) -> Node {
        self.text = self
            .text
            .take()
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty());
        if self.children.is_empty() && self.attributes.is_empty() {
            return Node::Text(self.text.unwrap_or_default());
        }
        Node::Element(self)
    }
}

impl Node {
    pub fn child(&self, key: &str) -> Option<&[Node]> {
        match self {
            Self::Element(element) => element.children.get(key).map(Vec::as_slice),
            Self::Text(_) => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element(element) => element.attributes.get(name).map(String::as_str),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            Self::Element(element) => element.text.as_deref(),
        }
    }
}

/// A parsed document. The root element sits under its own name inside a
/// wrapper node, so it is reached with the same lookups as any child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    root_name: String,
    wrapper: Node,
}

impl RawDocument {
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn as_node(&self) -> &Node {
        &self.wrapper
    }
}

struct OpenElement {
    name: String,
    element: Element,
}

pub fn parse_document(bytes: &[u8]) -> Result<RawDocument, NormalizeError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|error| {
            NormalizeError::MalformedInput(format!(
                "{error} (at byte {})",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(multiple_roots());
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(NormalizeError::Normalization(format!(
                        "unexpected tree shape: elements nest deeper than {MAX_DEPTH} levels"
                    )));
                }
                let (name, element) = open_element(&start)?;
                stack.push(OpenElement { name, element });
            }
            Event::Empty(start) => {
                let (name, element) = open_element(&start)?;
                attach(&mut stack, &mut root, name, element.into_node())?;
            }
            Event::End(_) => {
                let Some(open) = stack.pop() else {
                    return Err(NormalizeError::MalformedInput(
                        "closing tag without a matching opening tag".to_string(),
                    ));
                };
                attach(&mut stack, &mut root, open.name, open.element.into_node())?;
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|error| NormalizeError::MalformedInput(error.to_string()))?;
                push_text(&mut stack, &value)?;
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                let value = std::str::from_utf8(&raw)
                    .map_err(|error| NormalizeError::MalformedInput(error.to_string()))?;
                push_text(&mut stack, value)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(NormalizeError::MalformedInput(format!(
            "document ended before `{}` was closed",
            open.name
        )));
    }

    let Some((root_name, root_node)) = root else {
        return Err(NormalizeError::MalformedInput(
            "document has no root element".to_string(),
        ));
    };

    let mut wrapper = Element::default();
    wrapper.push_child(root_name.clone(), root_node);
    Ok(RawDocument {
        root_name,
        wrapper: Node::Element(wrapper),
    })
}

fn open_element(start: &BytesStart<'_>) -> Result<(String, Element), NormalizeError> {
    let name = decode_name(start.name().as_ref())?;
    let mut element = Element::default();
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|error| NormalizeError::MalformedInput(error.to_string()))?;
        let key = decode_name(attribute.key.as_ref())?;
        let value = attribute
            .unescape_value()
            .map_err(|error| NormalizeError::MalformedInput(error.to_string()))?;
        element.attributes.insert(key, value.into_owned());
    }
    Ok((name, element))
}

fn decode_name(raw: &[u8]) -> Result<String, NormalizeError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|error| NormalizeError::MalformedInput(format!("element name: {error}")))
}

fn attach(
    stack: &mut [OpenElement],
    root: &mut Option<(String, Node)>,
    name: String,
    node: Node,
) -> Result<(), NormalizeError> {
    if let Some(parent) = stack.last_mut() {
        parent.element.push_child(name, node);
        return Ok(());
    }
    if root.is_some() {
        return Err(multiple_roots());
    }
    *root = Some((name, node));
    Ok(())
}

fn push_text(stack: &mut [OpenElement], value: &str) -> Result<(), NormalizeError> {
    match stack.last_mut() {
        Some(open) => {
            open.element.push_text(value);
            Ok(())
        }
        None if value.trim().is_empty() => Ok(()),
        None => Err(NormalizeError::MalformedInput(
            "text content outside the root element".to_string(),
        )),
    }
}

fn multiple_roots() -> NormalizeError {
    NormalizeError::MalformedInput("document has more than one root element".to_string())
}

#[cfg(test)]
mod tests {
    use super::{MAX_DEPTH, Node, parse_document};
    use crate::report::NormalizeError;

    #[test]
    fn singular_elements_are_still_sequences() {
        let parsed = parse_document(
            b"<CreditReport><Applicant><Name>Asha</Name></Applicant></CreditReport>",
        );
        assert!(parsed.is_ok());
        if let Ok(document) = parsed {
            assert_eq!(document.root_name(), "CreditReport");
            let roots = document.as_node().child("CreditReport");
            assert_eq!(roots.map(<[Node]>::len), Some(1));
            let applicants = roots
                .and_then(<[Node]>::first)
                .and_then(|report| report.child("Applicant"));
            assert_eq!(applicants.map(<[Node]>::len), Some(1));
            let names = applicants
                .and_then(<[Node]>::first)
                .and_then(|applicant| applicant.child("Name"));
            assert_eq!(names, Some(&[Node::Text("Asha".to_string())][..]));
        }
    }

    #[test]
    fn repeated_elements_keep_document_order() {
        let parsed = parse_document(
            b"<R><Account><No>1</No></Account><Account><No>2</No></Account></R>",
        );
        assert!(parsed.is_ok());
        if let Ok(document) = parsed {
            let accounts = document
                .as_node()
                .child("R")
                .and_then(<[Node]>::first)
                .and_then(|root| root.child("Account"))
                .unwrap_or(&[]);
            let numbers = accounts
                .iter()
                .filter_map(|account| account.child("No"))
                .filter_map(<[Node]>::first)
                .filter_map(Node::as_text)
                .collect::<Vec<&str>>();
            assert_eq!(numbers, vec!["1", "2"]);
        }
    }

    #[test]
    fn attributes_entities_and_cdata_are_decoded() {
        let parsed = parse_document(
            br#"<R><Status code="11">Active &amp; current</Status><Note><![CDATA[a < b]]></Note></R>"#,
        );
        assert!(parsed.is_ok());
        if let Ok(document) = parsed {
            let root = document.as_node().child("R").and_then(<[Node]>::first);
            let status = root
                .and_then(|node| node.child("Status"))
                .and_then(<[Node]>::first);
            assert_eq!(status.and_then(|node| node.attribute("code")), Some("11"));
            assert_eq!(status.and_then(Node::as_text), Some("Active & current"));
            let note = root
                .and_then(|node| node.child("Note"))
                .and_then(<[Node]>::first)
                .and_then(Node::as_text);
            assert_eq!(note, Some("a < b"));
        }
    }

    #[test]
    fn text_split_by_comments_and_cdata_keeps_inner_spacing() {
        let parsed = parse_document(
            b"<R><Name>John <!-- middle --> Doe</Name>\
              <Address>\n  12 MG Road<![CDATA[ , ]]>Pune\n</Address>\
              <Blank> <!-- only a comment --> </Blank></R>",
        );
        assert!(parsed.is_ok());
        if let Ok(document) = parsed {
            let root = document.as_node().child("R").and_then(<[Node]>::first);
            let text_of = |key: &str| {
                root.and_then(|node| node.child(key))
                    .and_then(<[Node]>::first)
                    .and_then(Node::as_text)
                    .map(str::to_string)
            };
            assert_eq!(text_of("Name").as_deref(), Some("John  Doe"));
            assert_eq!(text_of("Address").as_deref(), Some("12 MG Road , Pune"));
            assert_eq!(text_of("Blank").as_deref(), Some(""));
        }
    }

    #[test]
    fn element_text_around_children_is_trimmed() {
        let parsed = parse_document(b"<R>\n  <A>1</A>\n  tail \n</R>");
        assert!(parsed.is_ok());
        if let Ok(document) = parsed {
            let root = document.as_node().child("R").and_then(<[Node]>::first);
            assert_eq!(root.and_then(Node::as_text), Some("tail"));
        }
    }

    #[test]
    fn empty_elements_become_empty_text() {
        let parsed = parse_document(b"<R><Accounts></Accounts><Enquiries/></R>");
        assert!(parsed.is_ok());
        if let Ok(document) = parsed {
            let root = document.as_node().child("R").and_then(<[Node]>::first);
            let accounts = root.and_then(|node| node.child("Accounts"));
            assert_eq!(accounts, Some(&[Node::Text(String::new())][..]));
            let enquiries = root.and_then(|node| node.child("Enquiries"));
            assert_eq!(enquiries, Some(&[Node::Text(String::new())][..]));
        }
    }

    #[test]
    fn rejects_inputs_that_are_not_markup() {
        let cases: [&[u8]; 6] = [
            b"This is not valid XML content at all",
            b"",
            b"<R><A></B></R>",
            b"<R><A>",
            b"<R/><S/>",
            b"<R>&unknown;</R>",
        ];
        for case in cases {
            let parsed = parse_document(case);
            assert!(
                matches!(parsed, Err(NormalizeError::MalformedInput(_))),
                "expected malformed input for {:?}",
                String::from_utf8_lossy(case)
            );
        }
    }

    #[test]
    fn rejects_excessive_nesting_as_unexpected_shape() {
        let mut body = String::new();
        for _ in 0..=MAX_DEPTH {
            body.push_str("<a>");
        }
        for _ in 0..=MAX_DEPTH {
            body.push_str("</a>");
        }
        let parsed = parse_document(body.as_bytes());
        assert!(matches!(parsed, Err(NormalizeError::Normalization(_))));
    }
}
