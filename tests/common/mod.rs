#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use doctransfer::Document;
use doctransfer::docx::xml::Element;
use doctransfer::docx::{table, wml};
use zip::write::SimpleFileOptions;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `<w:p>` with an optional style id and a single run.
pub fn para(style_id: Option<&str>, text: &str) -> String {
    let ppr = style_id
        .map(|id| format!("<w:pPr><w:pStyle w:val=\"{id}\"/></w:pPr>"))
        .unwrap_or_default();
    format!("<w:p>{ppr}<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", escape(text))
}

/// A paragraph carrying numbering properties.
pub fn list_para(style_id: Option<&str>, text: &str) -> String {
    let pstyle = style_id
        .map(|id| format!("<w:pStyle w:val=\"{id}\"/>"))
        .unwrap_or_default();
    format!(
        "<w:p><w:pPr>{pstyle}<w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"1\"/></w:numPr></w:pPr>\
         <w:r><w:t>{}</w:t></w:r></w:p>",
        escape(text)
    )
}

/// A table of single-paragraph cells, one `w:tc` per entry.
pub fn table_xml(rows: &[&[&str]]) -> String {
    let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut xml = String::from("<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr><w:tblGrid>");
    for _ in 0..cols {
        xml.push_str("<w:gridCol w:w=\"1000\"/>");
    }
    xml.push_str("</w:tblGrid>");
    for row in rows {
        xml.push_str("<w:tr>");
        for text in *row {
            xml.push_str(&format!("<w:tc>{}</w:tc>", para(None, text)));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// `rows` x `cols` table whose cell text is "r{row}c{col}", labelled `label`
/// in cell (0,0).
pub fn labelled_table(label: &str, rows: usize, cols: usize) -> String {
    let cells: Vec<Vec<String>> = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| if r == 0 && c == 0 { label.to_string() } else { format!("r{r}c{c}") })
                .collect()
        })
        .collect();
    let refs: Vec<Vec<&str>> = cells
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    let rows: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
    table_xml(&rows)
}

/// Tiny solid-color PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

struct StyleEntry {
    kind: &'static str,
    id: String,
    name: String,
    default: bool,
}

/// Writes a DOCX package in memory.
///
/// Each header or footer added opens a new section: all but the last are
/// closed by a section-break paragraph after the body content, the last one
/// goes to the body-level `w:sectPr`.
pub struct DocxBuilder {
    styles: Vec<StyleEntry>,
    body: String,
    headers: Vec<String>,
    footers: Vec<String>,
    media: Vec<(String, Vec<u8>)>,
}

impl DocxBuilder {
    /// A package with the default `Normal` paragraph style.
    pub fn new() -> Self {
        DocxBuilder {
            styles: Vec::new(),
            body: String::new(),
            headers: Vec::new(),
            footers: Vec::new(),
            media: Vec::new(),
        }
        .style_entry("paragraph", "Normal", "Normal", true)
    }

    /// A template carrying every destination style the pipeline writes.
    pub fn template() -> Self {
        DocxBuilder::new()
            .style("paragraph", "Heading1", "heading 1")
            .style("paragraph", "Heading2", "heading 2")
            .style("paragraph", "00TEXT", "00_TEXT")
            .style("paragraph", "00BULLET", "00_BULLET")
            .style("paragraph", "00TITLETABLE", "00_TITLE TABLE")
            .style("paragraph", "00PICTURE", "00_PICTURE")
            .style("paragraph", "00BOLD", "00_BOLD")
            .style("paragraph", "00HEADER", "00_HEADER")
            .style("paragraph", "00HEADERTITLE", "00_HEADER TITLE")
            .style("table", "TableGrid", "Table Grid")
    }

    fn style_entry(mut self, kind: &'static str, id: &str, name: &str, default: bool) -> Self {
        self.styles.push(StyleEntry {
            kind,
            id: id.to_string(),
            name: name.to_string(),
            default,
        });
        self
    }

    pub fn style(self, kind: &'static str, id: &str, name: &str) -> Self {
        self.style_entry(kind, id, name, false)
    }

    pub fn body(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    /// Header part holding `xml` (usually tables).
    pub fn header(mut self, xml: &str) -> Self {
        self.headers.push(xml.to_string());
        self
    }

    pub fn footer(mut self, xml: &str) -> Self {
        self.footers.push(xml.to_string());
        self
    }

    pub fn media(mut self, name: &str, data: Vec<u8>) -> Self {
        self.media.push((name.to_string(), data));
        self
    }

    fn styles_xml(&self) -> String {
        let mut xml = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><w:styles xmlns:w=\"{W_NS}\">");
        for s in &self.styles {
            let default = if s.default { " w:default=\"1\"" } else { "" };
            xml.push_str(&format!(
                "<w:style w:type=\"{}\"{default} w:styleId=\"{}\"><w:name w:val=\"{}\"/></w:style>",
                s.kind,
                s.id,
                escape(&s.name)
            ));
        }
        xml.push_str("</w:styles>");
        xml
    }

    fn sect_pr(&self, section: usize) -> String {
        let mut xml = String::from("<w:sectPr>");
        if section < self.headers.len() {
            xml.push_str(&format!(
                "<w:headerReference w:type=\"default\" r:id=\"rIdH{section}\"/>"
            ));
        }
        if section < self.footers.len() {
            xml.push_str(&format!(
                "<w:footerReference w:type=\"default\" r:id=\"rIdF{section}\"/>"
            ));
        }
        xml.push_str(
            "<w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
             <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
             w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
        );
        xml
    }

    fn document_xml(&self) -> String {
        let sections = self.headers.len().max(self.footers.len()).max(1);
        let mut body = self.body.clone();
        for s in 0..sections - 1 {
            body.push_str(&format!("<w:p><w:pPr>{}</w:pPr></w:p>", self.sect_pr(s)));
        }
        body.push_str(&self.sect_pr(sections - 1));
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"{W_NS}\" xmlns:r=\"{R_NS}\"><w:body>{body}</w:body></w:document>"
        )
    }

    fn document_rels(&self) -> String {
        let mut xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Relationships xmlns=\"{PKG_REL_NS}\">\
             <Relationship Id=\"rId1\" Type=\"{R_NS}/styles\" Target=\"styles.xml\"/>"
        );
        for i in 0..self.headers.len() {
            xml.push_str(&format!(
                "<Relationship Id=\"rIdH{i}\" Type=\"{R_NS}/header\" Target=\"header{i}.xml\"/>"
            ));
        }
        for i in 0..self.footers.len() {
            xml.push_str(&format!(
                "<Relationship Id=\"rIdF{i}\" Type=\"{R_NS}/footer\" Target=\"footer{i}.xml\"/>"
            ));
        }
        for (i, (name, _)) in self.media.iter().enumerate() {
            xml.push_str(&format!(
                "<Relationship Id=\"rIdM{i}\" Type=\"{R_NS}/image\" Target=\"media/{name}\"/>"
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut put = |name: &str, data: &[u8]| {
            zip.start_file(name, options).expect("start zip entry");
            zip.write_all(data).expect("write zip entry");
        };

        put(
            "[Content_Types].xml",
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
                "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
                "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
                "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
                "<Override PartName=\"/word/document.xml\" ",
                "ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>",
                "</Types>"
            )
            .as_bytes(),
        );
        put(
            "_rels/.rels",
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Relationships xmlns=\"{PKG_REL_NS}\">\
                 <Relationship Id=\"rId1\" Type=\"{R_NS}/officeDocument\" Target=\"word/document.xml\"/>\
                 </Relationships>"
            )
            .as_bytes(),
        );
        put("word/document.xml", self.document_xml().as_bytes());
        put("word/_rels/document.xml.rels", self.document_rels().as_bytes());
        put("word/styles.xml", self.styles_xml().as_bytes());
        for (i, content) in self.headers.iter().enumerate() {
            let xml = format!("<w:hdr xmlns:w=\"{W_NS}\" xmlns:r=\"{R_NS}\">{content}</w:hdr>");
            put(&format!("word/header{i}.xml"), xml.as_bytes());
        }
        for (i, content) in self.footers.iter().enumerate() {
            let xml = format!("<w:ftr xmlns:w=\"{W_NS}\" xmlns:r=\"{R_NS}\">{content}</w:ftr>");
            put(&format!("word/footer{i}.xml"), xml.as_bytes());
        }
        for (name, data) in &self.media {
            put(&format!("word/media/{name}"), data);
        }

        zip.finish().expect("finish zip").into_inner()
    }

    pub fn document(&self) -> Document {
        Document::from_bytes(&self.build()).expect("fixture loads")
    }

    pub fn write_to(&self, path: &Path) {
        fs::write(path, self.build()).expect("write fixture");
    }
}

/// Text of every body paragraph, in order.
pub fn paragraph_texts(doc: &Document) -> Vec<String> {
    doc.paragraphs().map(wml::paragraph_text).collect()
}

/// Style id of every body paragraph, in order.
pub fn paragraph_styles(doc: &Document) -> Vec<Option<String>> {
    doc.paragraphs()
        .map(|p| wml::paragraph_style_id(p).map(str::to_string))
        .collect()
}

/// Trimmed text of body table `index`.
pub fn table_grid(doc: &Document, index: usize) -> Vec<Vec<String>> {
    doc.table(index).map(table::text_grid).unwrap_or_default()
}

/// First table of a header or footer part.
pub fn part_table<'a>(doc: &'a Document, part: &str) -> &'a Element {
    doc.part(part)
        .and_then(|root| root.child("w:tbl"))
        .expect("part has a table")
}

/// Parses a saved part with roxmltree, the way a consumer of the file would.
pub fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut entry = archive.by_name(name).expect("part exists");
    let mut text = String::new();
    std::io::Read::read_to_string(&mut entry, &mut text).expect("utf-8 part");
    roxmltree::Document::parse(&text).expect("well-formed part");
    text
}
