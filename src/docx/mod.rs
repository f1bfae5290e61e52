pub mod media;
mod package;
pub mod styles;
pub mod table;
pub mod wml;
pub mod xml;

use std::path::Path;

use crate::error::{Error, Result};

pub use package::Package;
pub use styles::{StyleKind, StyleRegistry};
use xml::Element;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const CONTENT_TYPES: &str = "[Content_Types].xml";
const ROOT_RELS: &str = "_rels/.rels";

const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_STYLES: &str = "/styles";
const REL_HEADER: &str = "/header";
const REL_FOOTER: &str = "/footer";

/// Text width of a US Letter page with 1" margins, in twips.
const DEFAULT_TEXT_WIDTH: u32 = 9360;

pub(crate) fn wml<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

pub(crate) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Table,
}

/// One top-level body element: its kind and its index among body elements
/// of that kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyElement {
    pub kind: BlockKind,
    pub index: usize,
}

/// Header and footer parts in effect for one section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionParts {
    pub header: Option<String>,
    pub footer: Option<String>,
}

/// "word/document.xml" -> "word/_rels/document.xml.rels"
fn part_rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolves a relationship target against the directory of its source part.
fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(abs) = target.strip_prefix('/') {
        return abs.to_string();
    }
    let mut segments: Vec<&str> = source_part
        .rsplit_once('/')
        .map(|(dir, _)| dir.split('/').collect())
        .unwrap_or_default();
    for seg in target.split('/') {
        match seg {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            s => segments.push(s),
        }
    }
    segments.join("/")
}

fn main_part_name(package: &Package) -> String {
    let Some(raw) = package.raw(ROOT_RELS) else {
        return "word/document.xml".into();
    };
    let Ok(text) = std::str::from_utf8(raw) else {
        return "word/document.xml".into();
    };
    let Ok(xml) = roxmltree::Document::parse(text) else {
        return "word/document.xml".into();
    };
    xml.root_element()
        .children()
        .find(|n| {
            n.tag_name().name() == "Relationship"
                && n.attribute("Type").is_some_and(|t| t.ends_with(REL_OFFICE_DOCUMENT))
        })
        .and_then(|n| n.attribute("Target"))
        .map(|t| resolve_target("", t))
        .unwrap_or_else(|| "word/document.xml".into())
}

/// A word-processing document held in memory for reading and editing.
pub struct Document {
    package: Package,
    main_part: String,
    rels_part: String,
    styles: StyleRegistry,
}

impl Document {
    pub fn open(path: &Path) -> Result<Document> {
        Document::from_package(Package::open(path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Document> {
        Document::from_package(Package::from_bytes(bytes)?)
    }

    pub fn from_package(mut package: Package) -> Result<Document> {
        let main_part = main_part_name(&package);
        if !package.contains(&main_part) {
            return Err(Error::InvalidDocx(format!(
                "missing {main_part} (is this a DOCX file?)"
            )));
        }
        package.load_xml(&main_part)?;
        let root = package
            .xml(&main_part)
            .ok_or_else(|| Error::InvalidDocx(format!("{main_part} could not be loaded")))?;
        if root.attr("xmlns:w") != Some(WML_NS) {
            return Err(Error::InvalidDocx(
                "main part does not bind WordprocessingML to the w prefix".into(),
            ));
        }
        if root.child("w:body").is_none() {
            return Err(Error::InvalidDocx("missing w:body".into()));
        }

        let rels_part = part_rels_path(&main_part);
        if package.contains(&rels_part) {
            package.load_xml(&rels_part)?;
        } else {
            package.put_xml(
                &rels_part,
                Element::new("Relationships").with_attr("xmlns", PKG_REL_NS),
            );
        }
        if package.contains(CONTENT_TYPES) {
            package.load_xml(CONTENT_TYPES)?;
        }

        let mut doc = Document {
            package,
            main_part,
            rels_part,
            styles: StyleRegistry::default(),
        };

        let hf_parts: Vec<String> = doc
            .related_parts(REL_HEADER)
            .chain(doc.related_parts(REL_FOOTER))
            .collect();
        for part in hf_parts {
            if doc.package.contains(&part) {
                doc.package.load_xml(&part)?;
            } else {
                log::warn!("relationship points at missing part {part}");
            }
        }

        let styles_part = doc
            .related_parts(REL_STYLES)
            .next()
            .unwrap_or_else(|| "word/styles.xml".into());
        doc.styles = match doc.package.raw(&styles_part).map(std::str::from_utf8) {
            Some(Ok(text)) => styles::parse_styles(text),
            _ => {
                log::warn!("no readable {styles_part}, style registry is empty");
                StyleRegistry::default()
            }
        };

        Ok(doc)
    }

    /// A minimal document: one empty body with a Letter section and the
    /// `Normal` and `Table Grid` styles.
    pub fn blank() -> Document {
        let mut package = Package::empty();

        let content_types = Element::new("Types")
            .with_attr("xmlns", CONTENT_TYPES_NS)
            .with_child(
                Element::new("Default")
                    .with_attr("Extension", "rels")
                    .with_attr(
                        "ContentType",
                        "application/vnd.openxmlformats-package.relationships+xml",
                    ),
            )
            .with_child(
                Element::new("Default")
                    .with_attr("Extension", "xml")
                    .with_attr("ContentType", "application/xml"),
            )
            .with_child(
                Element::new("Override")
                    .with_attr("PartName", "/word/document.xml")
                    .with_attr(
                        "ContentType",
                        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                    ),
            )
            .with_child(
                Element::new("Override")
                    .with_attr("PartName", "/word/styles.xml")
                    .with_attr(
                        "ContentType",
                        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
                    ),
            );
        package.put_xml(CONTENT_TYPES, content_types);

        package.put_xml(
            ROOT_RELS,
            Element::new("Relationships")
                .with_attr("xmlns", PKG_REL_NS)
                .with_child(
                    Element::new("Relationship")
                        .with_attr("Id", "rId1")
                        .with_attr("Type", &format!("{REL_NS}{REL_OFFICE_DOCUMENT}"))
                        .with_attr("Target", "word/document.xml"),
                ),
        );

        let sect_pr = Element::new("w:sectPr")
            .with_child(
                Element::new("w:pgSz")
                    .with_attr("w:w", "12240")
                    .with_attr("w:h", "15840"),
            )
            .with_child(
                Element::new("w:pgMar")
                    .with_attr("w:top", "1440")
                    .with_attr("w:right", "1440")
                    .with_attr("w:bottom", "1440")
                    .with_attr("w:left", "1440")
                    .with_attr("w:header", "720")
                    .with_attr("w:footer", "720")
                    .with_attr("w:gutter", "0"),
            );
        package.put_xml(
            "word/document.xml",
            Element::new("w:document")
                .with_attr("xmlns:w", WML_NS)
                .with_attr("xmlns:r", REL_NS)
                .with_child(Element::new("w:body").with_child(sect_pr)),
        );

        package.put_xml(
            "word/_rels/document.xml.rels",
            Element::new("Relationships")
                .with_attr("xmlns", PKG_REL_NS)
                .with_child(
                    Element::new("Relationship")
                        .with_attr("Id", "rId1")
                        .with_attr("Type", &format!("{REL_NS}{REL_STYLES}"))
                        .with_attr("Target", "styles.xml"),
                ),
        );

        let styles_xml = format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
                "<w:styles xmlns:w=\"{ns}\">",
                "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">",
                "<w:name w:val=\"Normal\"/><w:qFormat/></w:style>",
                "<w:style w:type=\"table\" w:default=\"1\" w:styleId=\"TableNormal\">",
                "<w:name w:val=\"Normal Table\"/><w:tblPr><w:tblInd w:w=\"0\" w:type=\"dxa\"/>",
                "<w:tblCellMar><w:top w:w=\"0\" w:type=\"dxa\"/><w:left w:w=\"108\" w:type=\"dxa\"/>",
                "<w:bottom w:w=\"0\" w:type=\"dxa\"/><w:right w:w=\"108\" w:type=\"dxa\"/>",
                "</w:tblCellMar></w:tblPr></w:style>",
                "<w:style w:type=\"table\" w:styleId=\"TableGrid\"><w:name w:val=\"Table Grid\"/>",
                "<w:basedOn w:val=\"TableNormal\"/><w:tblPr><w:tblBorders>",
                "<w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                "<w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                "<w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                "<w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                "<w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                "<w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                "</w:tblBorders></w:tblPr></w:style>",
                "</w:styles>"
            ),
            ns = WML_NS
        );
        let styles = styles::parse_styles(&styles_xml);
        package.put_raw("word/styles.xml", styles_xml.into_bytes());

        Document {
            package,
            main_part: "word/document.xml".into(),
            rels_part: "word/_rels/document.xml.rels".into(),
            styles,
        }
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.package.save(path)
    }

    /// Targets of the main part's relationships whose type ends with `kind`.
    fn related_parts(&self, kind: &str) -> impl Iterator<Item = String> + '_ {
        let kind = kind.to_string();
        self.package
            .xml(&self.rels_part)
            .into_iter()
            .flat_map(|rels| rels.children_named("Relationship"))
            .filter(move |r| r.attr("Type").is_some_and(|t| t.ends_with(&kind)))
            .filter(|r| r.attr("TargetMode") != Some("External"))
            .filter_map(|r| r.attr("Target"))
            .map(move |t| resolve_target(&self.main_part, t))
    }

    fn rel_target(&self, id: &str) -> Option<String> {
        self.package
            .xml(&self.rels_part)?
            .children_named("Relationship")
            .find(|r| r.attr("Id") == Some(id))
            .and_then(|r| r.attr("Target"))
            .map(|t| resolve_target(&self.main_part, t))
    }

    fn body(&self) -> Option<&Element> {
        self.package.xml(&self.main_part)?.child("w:body")
    }

    fn body_mut(&mut self) -> Option<&mut Element> {
        self.package.xml_mut(&self.main_part)?.child_mut("w:body")
    }

    /// Top-level body content in document order, each element tagged with its
    /// kind and its index among elements of that kind.
    pub fn body_elements(&self) -> Vec<BodyElement> {
        let mut paragraphs = 0;
        let mut tables = 0;
        let mut out = Vec::new();
        for el in self.body().into_iter().flat_map(Element::elements) {
            let (kind, counter) = match el.name.as_str() {
                "w:p" => (BlockKind::Paragraph, &mut paragraphs),
                "w:tbl" => (BlockKind::Table, &mut tables),
                _ => continue,
            };
            out.push(BodyElement {
                kind,
                index: *counter,
            });
            *counter += 1;
        }
        out
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Element> {
        self.body()
            .into_iter()
            .flat_map(|b| b.children_named("w:p"))
    }

    pub fn tables(&self) -> impl Iterator<Item = &Element> {
        self.body()
            .into_iter()
            .flat_map(|b| b.children_named("w:tbl"))
    }

    pub fn paragraph(&self, index: usize) -> Option<&Element> {
        self.paragraphs().nth(index)
    }

    pub fn table(&self, index: usize) -> Option<&Element> {
        self.tables().nth(index)
    }

    pub fn table_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.body_mut()?.children_named_mut("w:tbl").nth(index)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.body_mut()
            .into_iter()
            .flat_map(|b| b.children_named_mut("w:p"))
    }

    /// Appends a block element at the end of the body, ahead of the final
    /// section properties.
    pub fn append_block(&mut self, block: Element) {
        let Some(body) = self.body_mut() else {
            return;
        };
        let at = body
            .children
            .iter()
            .rposition(|c| matches!(c, xml::XmlNode::Element(e) if e.is("w:sectPr")))
            .unwrap_or(body.children.len());
        body.insert(at, block);
    }

    /// Inserts `block` right before body paragraph `index`.
    pub fn insert_before_paragraph(&mut self, index: usize, block: Element) -> bool {
        let Some(body) = self.body_mut() else {
            return false;
        };
        match body.position_of("w:p", index) {
            Some(at) => {
                body.insert(at, block);
                true
            }
            None => false,
        }
    }

    pub fn remove_table(&mut self, index: usize) -> Option<Element> {
        let body = self.body_mut()?;
        let at = body.position_of("w:tbl", index)?;
        match body.children.remove(at) {
            xml::XmlNode::Element(e) => Some(e),
            xml::XmlNode::Text(_) => None,
        }
    }

    /// Width available to body text in the last section, in twips.
    pub fn text_width(&self) -> u32 {
        let Some(sect) = self.body().and_then(|b| b.child("w:sectPr")) else {
            return DEFAULT_TEXT_WIDTH;
        };
        let twips = |el: Option<&Element>, attr: &str| {
            el.and_then(|e| e.attr(attr))
                .and_then(|v| v.parse::<i64>().ok())
        };
        let page = twips(sect.child("w:pgSz"), "w:w");
        let left = twips(sect.child("w:pgMar"), "w:left").unwrap_or(1440);
        let right = twips(sect.child("w:pgMar"), "w:right").unwrap_or(1440);
        match page {
            Some(w) if w > left + right => (w - left - right) as u32,
            _ => DEFAULT_TEXT_WIDTH,
        }
    }

    /// Default header/footer of every section, in section order. A section
    /// without its own reference inherits the previous section's part.
    pub fn sections(&self) -> Vec<SectionParts> {
        let Some(body) = self.body() else {
            return Vec::new();
        };
        let mut sect_prs: Vec<&Element> = body
            .children_named("w:p")
            .filter_map(|p| p.child("w:pPr").and_then(|ppr| ppr.child("w:sectPr")))
            .collect();
        // The body-level sectPr describes the final section.
        if let Some(last) = body.child("w:sectPr") {
            sect_prs.push(last);
        }

        let default_ref = |sect: &Element, name: &str| -> Option<String> {
            sect.children_named(name)
                .find(|r| r.attr("w:type").is_none_or(|t| t == "default"))
                .and_then(|r| r.attr("r:id"))
                .and_then(|id| self.rel_target(id))
        };

        let mut out: Vec<SectionParts> = Vec::with_capacity(sect_prs.len());
        for sect in sect_prs {
            let inherited = out.last().cloned().unwrap_or_default();
            out.push(SectionParts {
                header: default_ref(sect, "w:headerReference").or(inherited.header),
                footer: default_ref(sect, "w:footerReference").or(inherited.footer),
            });
        }
        out
    }

    /// A loaded header or footer part.
    pub fn part(&self, name: &str) -> Option<&Element> {
        self.package.xml(name)
    }

    pub fn part_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.package.xml_mut(name)
    }

    /// Embedded media entries: (part name, bytes).
    pub fn media(&self) -> Vec<(&str, &[u8])> {
        self.package
            .part_names()
            .filter(|n| n.starts_with("word/media/"))
            .filter_map(|n| self.package.raw(n).map(|data| (n, data)))
            .collect()
    }

    fn next_rel_id(&self) -> String {
        let max = self
            .package
            .xml(&self.rels_part)
            .into_iter()
            .flat_map(|rels| rels.children_named("Relationship"))
            .filter_map(|r| r.attr("Id"))
            .filter_map(|id| id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Next free `wp:docPr` id in the main part.
    pub fn next_drawing_id(&self) -> u32 {
        self.package
            .xml(&self.main_part)
            .map(|root| {
                root.descendants()
                    .into_iter()
                    .filter(|e| e.is("wp:docPr"))
                    .filter_map(|e| e.attr("id"))
                    .filter_map(|v| v.parse::<u32>().ok())
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
            + 1
    }

    fn ensure_default_content_type(&mut self, ext: &str, content_type: &str) {
        let Some(types) = self.package.xml_mut(CONTENT_TYPES) else {
            return;
        };
        let known = types.children_named("Default").any(|d| {
            d.attr("Extension")
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        });
        if !known {
            types.insert(
                0,
                Element::new("Default")
                    .with_attr("Extension", ext)
                    .with_attr("ContentType", content_type),
            );
        }
    }

    /// Stores an image under `word/media/` and relates it to the main part.
    /// Returns the relationship id and the stored part name.
    pub fn add_image(&mut self, data: Vec<u8>, ext: &str) -> Result<(String, String)> {
        let ext = ext.to_ascii_lowercase();
        let content_type = media::content_type_for(&ext)
            .ok_or_else(|| Error::InvalidDocx(format!("unsupported image type .{ext}")))?;

        let part_name = (1..)
            .map(|n| format!("word/media/image{n}.{ext}"))
            .find(|name| !self.package.contains(name))
            .unwrap_or_else(|| format!("word/media/image0.{ext}"));
        self.package.put_raw(&part_name, data);
        self.ensure_default_content_type(&ext, content_type);

        let rel_id = self.next_rel_id();
        let target = part_name.trim_start_matches("word/").to_string();
        let rels = self
            .package
            .xml_mut(&self.rels_part)
            .ok_or_else(|| Error::InvalidDocx("missing document relationships".into()))?;
        rels.push(
            Element::new("Relationship")
                .with_attr("Id", &rel_id)
                .with_attr("Type", media::IMAGE_REL)
                .with_attr("Target", &target),
        );
        Ok((rel_id, part_name))
    }
}
