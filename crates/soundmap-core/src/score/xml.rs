//! Lossless XML event tree.
//!
//! The document is kept as the flat sequence of events quick-xml produced,
//! each tagged with the namespace its element name resolved to. Writing the
//! sequence back reproduces the input byte for byte except where a node was
//! replaced, which is what lets saving touch only `instrument-sound` text.

use crate::error::{Result, SoundMapError};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;

#[derive(Debug, Clone)]
pub(crate) struct XmlNode {
    pub(crate) event: Event<'static>,
    /// Namespace URI of the element name (`Start`, `Empty`, `End` only).
    pub(crate) namespace: Option<String>,
}

impl XmlNode {
    pub(crate) fn new(event: Event<'static>, namespace: Option<String>) -> Self {
        Self { event, namespace }
    }

    fn start(&self) -> Option<&BytesStart<'static>> {
        match &self.event {
            Event::Start(e) | Event::Empty(e) => Some(e),
            _ => None,
        }
    }

    fn is_text(&self) -> bool {
        matches!(self.event, Event::Text(_) | Event::CData(_))
    }

    fn is_whitespace_text(&self) -> bool {
        match &self.event {
            Event::Text(t) => t.iter().all(u8::is_ascii_whitespace),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct XmlTree {
    pub(crate) nodes: Vec<XmlNode>,
    /// Namespace of the root element; every lookup is qualified with it.
    pub(crate) namespace: Option<String>,
}

impl XmlTree {
    /// Parse a complete document, rejecting anything that is not well-formed.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = NsReader::from_str(text);

        let mut nodes = Vec::new();
        let mut depth = 0usize;
        let mut root: Option<Option<String>> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = match resolved {
                ResolveResult::Bound(ns) => {
                    Some(String::from_utf8_lossy(ns.as_ref()).into_owned())
                }
                ResolveResult::Unbound => None,
                ResolveResult::Unknown(prefix) => {
                    return Err(SoundMapError::format(format!(
                        "unbound namespace prefix '{}'",
                        String::from_utf8_lossy(&prefix)
                    )));
                }
            };

            match &event {
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) => {
                    for attr in e.attributes() {
                        attr.map_err(quick_xml::Error::from)?;
                    }
                    if depth == 0 {
                        if root.is_some() {
                            return Err(SoundMapError::format("more than one root element"));
                        }
                        root = Some(namespace.clone());
                    }
                    if matches!(event, Event::Start(_)) {
                        depth += 1;
                    }
                }
                Event::End(e) => {
                    if depth == 0 {
                        return Err(SoundMapError::format(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                    depth -= 1;
                }
                Event::Text(t) if depth == 0 => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(SoundMapError::format("text outside the root element"));
                    }
                }
                Event::CData(_) if depth == 0 => {
                    return Err(SoundMapError::format("CDATA outside the root element"));
                }
                _ => {}
            }

            nodes.push(XmlNode::new(event.into_owned(), namespace));
        }

        if depth != 0 {
            return Err(SoundMapError::format(format!(
                "{} element(s) not closed at end of document",
                depth
            )));
        }
        let Some(namespace) = root else {
            return Err(SoundMapError::format("no root element"));
        };

        Ok(Self { nodes, namespace })
    }

    /// Serialize the events back to text.
    pub(crate) fn write(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            writer.write_event(&node.event)?;
        }
        String::from_utf8(writer.into_inner())
            .map_err(|e| SoundMapError::Other(format!("Serialized score is not UTF-8: {}", e)))
    }

    /// True when node `index` is an element with this local name in the
    /// document namespace.
    pub(crate) fn is_element(&self, index: usize, local: &str) -> bool {
        let node = &self.nodes[index];
        match node.start() {
            Some(e) => {
                e.local_name().as_ref() == local.as_bytes() && node.namespace == self.namespace
            }
            None => false,
        }
    }

    /// Index of the `End` matching the element starting at `start`, or
    /// `start` itself for an empty element.
    pub(crate) fn element_end(&self, start: usize) -> usize {
        if matches!(self.nodes[start].event, Event::Empty(_)) {
            return start;
        }
        let mut depth = 0usize;
        for (index, node) in self.nodes.iter().enumerate().skip(start) {
            match node.event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return index;
                    }
                }
                _ => {}
            }
        }
        // Unreachable for trees accepted by `parse`.
        self.nodes.len() - 1
    }

    /// All elements with this local name, in document order.
    pub(crate) fn elements(&self, local: &str) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&index| self.is_element(index, local))
            .collect()
    }

    /// First descendant (not the element itself) with this local name.
    pub(crate) fn first_descendant(&self, element: usize, local: &str) -> Option<usize> {
        let end = self.element_end(element);
        (element + 1..end).find(|&index| self.is_element(index, local))
    }

    /// Direct child elements, in order.
    pub(crate) fn children(&self, element: usize) -> Vec<usize> {
        let end = self.element_end(element);
        let mut children = Vec::new();
        let mut index = element + 1;
        while index < end {
            if self.nodes[index].start().is_some() {
                children.push(index);
                index = self.element_end(index) + 1;
            } else {
                index += 1;
            }
        }
        children
    }

    /// Value of an attribute on an element.
    pub(crate) fn attribute(&self, element: usize, name: &str) -> Result<Option<String>> {
        let Some(start) = self.nodes[element].start() else {
            return Ok(None);
        };
        match start.try_get_attribute(name)? {
            Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
            None => Ok(None),
        }
    }

    /// Leading character data of an element (text before its first child).
    pub(crate) fn text(&self, element: usize) -> Result<Option<String>> {
        if matches!(self.nodes[element].event, Event::Empty(_)) {
            return Ok(None);
        }
        let mut text = String::new();
        let mut found = false;
        for node in self.nodes[element + 1..].iter().take_while(|n| n.is_text()) {
            match &node.event {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c[..])),
                _ => {}
            }
            found = true;
        }
        Ok(found.then_some(text))
    }

    /// Replace the leading character data of an element.
    pub(crate) fn set_text(&mut self, element: usize, value: &str) {
        let namespace = self.nodes[element].namespace.clone();
        let text = XmlNode::new(Event::Text(BytesText::new(value).into_owned()), None);

        let start = match &self.nodes[element].event {
            Event::Empty(e) => Some(e.clone()),
            _ => None,
        };
        if let Some(start) = start {
            let end = end_for(&start);
            self.nodes[element] = XmlNode::new(Event::Start(start), namespace.clone());
            self.nodes
                .splice(element + 1..element + 1, [text, XmlNode::new(end, namespace)]);
            return;
        }

        let text_len = self.nodes[element + 1..]
            .iter()
            .take_while(|n| n.is_text())
            .count();
        self.nodes
            .splice(element + 1..element + 1 + text_len, [text]);
    }

    /// Insert a new `<local>value</local>` child into `parent`, before the
    /// first child named in `before`, or last.
    ///
    /// The child reuses the parent's prefix and namespace and copies the
    /// indentation of existing children when there is any.
    pub(crate) fn insert_child(
        &mut self,
        parent: usize,
        local: &str,
        value: &str,
        before: &[&str],
    ) {
        let namespace = self.nodes[parent].namespace.clone();
        let Some(parent_start) = self.nodes[parent].start().cloned() else {
            return;
        };

        let name = match parent_start.name().prefix() {
            Some(prefix) => format!("{}:{}", String::from_utf8_lossy(prefix.as_ref()), local),
            None => local.to_string(),
        };
        let child = [
            XmlNode::new(Event::Start(BytesStart::new(name.clone())), namespace.clone()),
            XmlNode::new(Event::Text(BytesText::new(value).into_owned()), None),
            XmlNode::new(Event::End(BytesEnd::new(name)), namespace.clone()),
        ];

        if matches!(self.nodes[parent].event, Event::Empty(_)) {
            let end = end_for(&parent_start);
            self.nodes[parent] = XmlNode::new(Event::Start(parent_start), namespace.clone());
            let mut inserted: Vec<XmlNode> = child.into();
            inserted.push(XmlNode::new(end, namespace));
            self.nodes.splice(parent + 1..parent + 1, inserted);
            return;
        }

        let children = self.children(parent);
        let indent = children
            .first()
            .filter(|&&first| first > 0 && self.nodes[first - 1].is_whitespace_text())
            .map(|&first| self.nodes[first - 1].clone());

        let blocker = children.iter().copied().find(|&c| {
            self.nodes[c]
                .start()
                .map(|e| before.iter().any(|b| e.local_name().as_ref() == b.as_bytes()))
                .unwrap_or(false)
        });

        let mut inserted: Vec<XmlNode> = Vec::with_capacity(4);
        let position = match blocker {
            Some(blocker) => {
                // Existing whitespace before the blocker now precedes the new child.
                inserted.extend(child);
                inserted.extend(indent);
                blocker
            }
            None => {
                let end = self.element_end(parent);
                let closing_ws = end > parent + 1 && self.nodes[end - 1].is_whitespace_text();
                inserted.extend(indent);
                inserted.extend(child);
                if closing_ws {
                    end - 1
                } else {
                    end
                }
            }
        };
        self.nodes.splice(position..position, inserted);
    }
}

fn end_for(start: &BytesStart<'static>) -> Event<'static> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    Event::End(BytesEnd::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_is_lossless() {
        let source = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
            <!DOCTYPE a>\n<a x='1'  y=\"&amp;\"><!-- note --><b/>t&lt;<c >x</c></a>\n";
        let tree = XmlTree::parse(source).unwrap();
        assert_eq!(tree.write().unwrap(), source);
    }

    #[test]
    fn test_rejects_malformed() {
        for source in ["<a><b></a>", "<a>", "", "<a/><b/>", "<a/>trailing", "</a>"] {
            assert!(XmlTree::parse(source).is_err(), "{:?} should fail", source);
        }
    }

    #[test]
    fn test_set_text_on_empty_element() {
        let mut tree = XmlTree::parse("<a><s/></a>").unwrap();
        let s = tree.elements("s")[0];
        tree.set_text(s, "x & y");
        assert_eq!(tree.write().unwrap(), "<a><s>x &amp; y</s></a>");
        assert_eq!(tree.text(s).unwrap().as_deref(), Some("x & y"));
    }

    #[test]
    fn test_insert_child_before_blocker_with_indent() {
        let source = "<i>\n  <name>V</name>\n  <virtual-instrument/>\n</i>";
        let mut tree = XmlTree::parse(source).unwrap();
        tree.insert_child(0, "sound", "s.v", &["virtual-instrument"]);
        assert_eq!(
            tree.write().unwrap(),
            "<i>\n  <name>V</name>\n  <sound>s.v</sound>\n  <virtual-instrument/>\n</i>"
        );
    }

    #[test]
    fn test_insert_child_last_with_indent() {
        let source = "<i>\n  <name>V</name>\n</i>";
        let mut tree = XmlTree::parse(source).unwrap();
        tree.insert_child(0, "sound", "s.v", &["virtual-instrument"]);
        assert_eq!(
            tree.write().unwrap(),
            "<i>\n  <name>V</name>\n  <sound>s.v</sound>\n</i>"
        );
    }

    #[test]
    fn test_insert_child_keeps_prefix() {
        let source = r#"<m:i xmlns:m="urn:m"/>"#;
        let mut tree = XmlTree::parse(source).unwrap();
        tree.insert_child(0, "sound", "x", &[]);
        assert_eq!(
            tree.write().unwrap(),
            r#"<m:i xmlns:m="urn:m"><m:sound>x</m:sound></m:i>"#
        );
        let reparsed = XmlTree::parse(&tree.write().unwrap()).unwrap();
        assert_eq!(reparsed.elements("sound").len(), 1);
    }
}
