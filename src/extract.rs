use std::path::{Path, PathBuf};

use crate::config::HeaderFooterPick;
use crate::docx::xml::Element;
use crate::docx::{BlockKind, Document, StyleRegistry, table, wml};
use crate::error::Result;
use crate::model::{Block, Cell, DocumentInfo, Grid, Paragraph, Run, Table};

pub const REVISION_HISTORY: &str = "Revision History";
pub const APPROVAL_TABLE: &str = "Approval Table";

fn style_name<'a>(p: &'a Element, styles: &'a StyleRegistry) -> &'a str {
    wml::paragraph_style_id(p)
        .map(|id| styles.name_of(id))
        .unwrap_or_else(|| styles.default_paragraph_style())
}

fn read_paragraph(p: &Element, styles: &StyleRegistry) -> Paragraph {
    Paragraph {
        style: style_name(p, styles).to_string(),
        text: wml::paragraph_text(p),
        is_list_item: wml::has_numbering(p),
        runs: wml::runs(p)
            .map(|r| Run {
                text: wml::run_text(r),
                bold: wml::run_toggle(r, "w:b"),
                italic: wml::run_toggle(r, "w:i"),
            })
            .collect(),
    }
}

fn read_table(tbl: &Element, styles: &StyleRegistry) -> Table {
    let layout = table::layout(tbl);
    let rows = layout
        .iter()
        .enumerate()
        .map(|(ri, row)| {
            (0..row.len())
                .map(|ci| match table::cell(tbl, ri, ci) {
                    Some(tc) => Cell {
                        text: table::cell_text(tc).trim().to_string(),
                        style: table::first_paragraph(tc)
                            .map(|p| style_name(p, styles).to_string()),
                    },
                    None => Cell {
                        text: String::new(),
                        style: None,
                    },
                })
                .collect()
        })
        .collect();
    Table { rows }
}

/// Reads the body of `doc` into blocks, in document order. The document is
/// not modified.
pub fn extract_content(doc: &Document) -> Vec<Block> {
    let styles = doc.styles();
    let mut blocks = Vec::new();
    for el in doc.body_elements() {
        match el.kind {
            BlockKind::Paragraph => {
                let Some(p) = doc.paragraph(el.index) else {
                    continue;
                };
                blocks.push(Block::Paragraph(read_paragraph(p, styles)));
            }
            BlockKind::Table => {
                let Some(tbl) = doc.table(el.index) else {
                    continue;
                };
                blocks.push(Block::Table(read_table(tbl, styles)));
            }
        }
    }
    log::debug!(
        "extracted {} blocks ({} tables)",
        blocks.len(),
        blocks.iter().filter(|b| matches!(b, Block::Table(_))).count()
    );
    blocks
}

/// Grid of the first body table whose cell (0,0) reads `label`.
pub fn locate_table(doc: &Document, label: &str) -> Option<Grid> {
    doc.tables()
        .find(|tbl| table::label(tbl).as_deref() == Some(label))
        .map(table::text_grid)
}

fn pick_grid<'a>(
    parts: impl Iterator<Item = &'a str>,
    doc: &Document,
    pick: HeaderFooterPick,
) -> Option<Grid> {
    let mut grids = parts
        .filter_map(|name| doc.part(name))
        .flat_map(|root| root.children_named("w:tbl"))
        .map(table::text_grid);
    match pick {
        HeaderFooterPick::First => grids.next(),
        HeaderFooterPick::Last => grids.last(),
    }
}

/// Header and footer table text, visited section by section.
pub fn extract_document_info(doc: &Document, pick: HeaderFooterPick) -> DocumentInfo {
    let sections = doc.sections();
    let header = pick_grid(sections.iter().filter_map(|s| s.header.as_deref()), doc, pick);
    let footer = pick_grid(sections.iter().filter_map(|s| s.footer.as_deref()), doc, pick);
    if header.is_none() {
        log::debug!("no header table found");
    }
    if footer.is_none() {
        log::debug!("no footer table found");
    }
    DocumentInfo { header, footer }
}

/// Writes every embedded media entry of `doc` into `dir` under its base name.
pub fn stage_images(doc: &Document, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut staged = Vec::new();
    for (name, data) in doc.media() {
        let Some(file_name) = name.rsplit('/').next().filter(|n| !n.is_empty()) else {
            continue;
        };
        let path = dir.join(file_name);
        std::fs::write(&path, data)?;
        log::info!("Extracted image: {file_name}");
        staged.push(path);
    }
    Ok(staged)
}

/// A new document holding a copy of every body table of `doc`.
pub fn export_supplemental_tables(doc: &Document) -> Document {
    let mut out = Document::blank();
    for tbl in doc.tables() {
        out.append_block(tbl.clone());
    }
    out
}

/// `<first six characters of the stem>_supplemental_tables.docx`
pub fn supplemental_tables_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix: String = stem.chars().take(6).collect();
    format!("{prefix}_supplemental_tables.docx")
}
