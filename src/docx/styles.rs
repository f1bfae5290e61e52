use std::collections::HashMap;

use super::WML_NS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

#[derive(Clone, Debug)]
pub struct StyleDef {
    pub id: String,
    pub name: String,
    pub kind: StyleKind,
}

/// Styles defined by one document, addressable by display name or by id.
#[derive(Clone, Debug, Default)]
pub struct StyleRegistry {
    by_name: HashMap<String, StyleDef>,
    name_by_id: HashMap<String, String>,
    default_paragraph: Option<String>,
}

/// Word stores some built-in style names in lower case ("heading 1") and
/// shows them capitalized. Lookups use the displayed form.
fn ui_name(name: &str) -> String {
    const BUILTIN: &[(&str, &str)] = &[
        ("caption", "Caption"),
        ("footer", "Footer"),
        ("header", "Header"),
        ("title", "Title"),
        ("subtitle", "Subtitle"),
        ("toc 1", "TOC 1"),
        ("toc 2", "TOC 2"),
        ("toc 3", "TOC 3"),
        ("toc heading", "TOC Heading"),
    ];
    if let Some(level) = name.strip_prefix("heading ")
        && level.chars().all(|c| c.is_ascii_digit())
    {
        return format!("Heading {level}");
    }
    BUILTIN
        .iter()
        .find(|(stored, _)| *stored == name)
        .map(|(_, shown)| shown.to_string())
        .unwrap_or_else(|| name.to_string())
}

pub(super) fn parse_styles(xml_content: &str) -> StyleRegistry {
    let mut registry = StyleRegistry::default();
    let Ok(xml) = roxmltree::Document::parse(xml_content) else {
        log::warn!("styles part is not well-formed XML, treating it as empty");
        return registry;
    };

    for node in xml.root_element().children() {
        if node.tag_name().name() != "style" || node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        let Some(id) = node.attribute((WML_NS, "styleId")) else {
            continue;
        };
        let kind = match node.attribute((WML_NS, "type")).unwrap_or("paragraph") {
            "character" => StyleKind::Character,
            "table" => StyleKind::Table,
            "numbering" => StyleKind::Numbering,
            _ => StyleKind::Paragraph,
        };
        let name = super::wml_attr(node, "name")
            .map(ui_name)
            .unwrap_or_else(|| id.to_string());
        let is_default = node
            .attribute((WML_NS, "default"))
            .is_some_and(|v| v == "1" || v == "true");
        if is_default && kind == StyleKind::Paragraph {
            registry.default_paragraph = Some(name.clone());
        }
        registry.name_by_id.insert(id.to_string(), name.clone());
        registry.by_name.insert(
            name.clone(),
            StyleDef {
                id: id.to_string(),
                name,
                kind,
            },
        );
    }

    registry
}

impl StyleRegistry {
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&StyleDef> {
        self.by_name.get(name)
    }

    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(|s| s.id.as_str())
    }

    /// Display name for a style id referenced from document XML. Unknown ids
    /// come back unchanged.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.name_by_id.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn is_paragraph_style(&self, name: &str) -> bool {
        self.get(name).is_some_and(|s| s.kind == StyleKind::Paragraph)
    }

    /// The style a paragraph without `w:pStyle` renders in.
    pub fn default_paragraph_style(&self) -> &str {
        self.default_paragraph.as_deref().unwrap_or("Normal")
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
