use crate::config::{StyleRoles, TransferConfig};
use crate::docx::wml::{self, Alignment};
use crate::docx::{Document, table};
use crate::error::{Error, Result};
use crate::model::{DocumentInfo, Grid};

#[derive(Clone, Copy)]
enum Role {
    Bold,
    Header,
    HeaderTitle,
}

impl Role {
    fn style(self, roles: &StyleRoles) -> &str {
        match self {
            Role::Bold => &roles.bold,
            Role::Header => &roles.header,
            Role::HeaderTitle => &roles.header_title,
        }
    }
}

struct Field {
    row: usize,
    col: usize,
    role: Role,
}

const HEADER_FIELDS: [Field; 4] = [
    Field { row: 0, col: 5, role: Role::Bold },
    Field { row: 1, col: 4, role: Role::Bold },
    Field { row: 2, col: 3, role: Role::Header },
    Field { row: 3, col: 0, role: Role::HeaderTitle },
];

const FOOTER_FIELD: Field = Field { row: 0, col: 2, role: Role::Bold };

const FOOTER_FONT_SIZE: f32 = 9.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InjectReport {
    pub written: usize,
    pub failed: usize,
}

enum Finish {
    Center,
    FontSize(f32),
}

fn write_field(
    dest: &mut Document,
    part: &str,
    table_index: usize,
    field: &Field,
    source: Option<&Grid>,
    finish: Finish,
    config: &TransferConfig,
) -> Result<()> {
    let structural = |what: &'static str| Error::StructuralIndex {
        table: part.to_string(),
        what,
        row: field.row,
        col: field.col,
    };
    let value = source
        .and_then(|g| g.get(field.row))
        .and_then(|r| r.get(field.col))
        .ok_or_else(|| structural("source value"))?;

    let style = field.role.style(&config.roles);
    let style_id = dest
        .styles()
        .id_of(style)
        .ok_or_else(|| Error::MissingStyle(style.to_string()))?
        .to_string();
    let paragraph_level = dest.styles().is_paragraph_style(style);

    let tc = dest
        .part_mut(part)
        .and_then(|root| root.children_named_mut("w:tbl").nth(table_index))
        .and_then(|tbl| table::cell_mut(tbl, field.row, field.col))
        .ok_or_else(|| structural("destination cell"))?;

    wml::set_cell_text(tc, value);
    if let Some(p) = tc.child_mut("w:p") {
        wml::apply_style(p, &style_id, paragraph_level);
    }
    match finish {
        Finish::Center => {
            for p in wml::cell_paragraphs_mut(tc) {
                wml::set_alignment(p, Alignment::Center);
            }
            wml::set_cell_vertical_center(tc);
        }
        Finish::FontSize(points) => {
            for p in wml::cell_paragraphs_mut(tc) {
                for run in p.children_named_mut("w:r") {
                    wml::set_run_size(run, points);
                }
            }
        }
    }
    Ok(())
}

fn distinct(parts: impl Iterator<Item = Option<String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in parts.flatten() {
        if !out.contains(&part) {
            out.push(part);
        }
    }
    out
}

/// Writes the document number, revision, title and footer fields into the
/// fixed cells of the template's header and footer tables.
///
/// Fields are independent: a missing value, cell or style is logged and the
/// remaining fields are still written.
pub fn inject_document_info(
    dest: &mut Document,
    info: &DocumentInfo,
    config: &TransferConfig,
) -> InjectReport {
    let mut report = InjectReport::default();
    let sections = dest.sections();
    let headers = distinct(sections.iter().map(|s| s.header.clone()));
    let footers = distinct(sections.iter().map(|s| s.footer.clone()));

    let mut record = |result: Result<()>, side: &str, field: &Field| match result {
        Ok(()) => report.written += 1,
        Err(e) => {
            log::error!("Error setting {side} cell ({},{}): {e}", field.row, field.col);
            report.failed += 1;
        }
    };

    for part in &headers {
        let count = dest.part(part).map(|r| r.children_named("w:tbl").count()).unwrap_or(0);
        for t in 0..count {
            for field in &HEADER_FIELDS {
                let result = write_field(
                    dest,
                    part,
                    t,
                    field,
                    info.header.as_ref(),
                    Finish::Center,
                    config,
                );
                record(result, "header", field);
            }
        }
    }

    for part in &footers {
        let count = dest.part(part).map(|r| r.children_named("w:tbl").count()).unwrap_or(0);
        for t in 0..count {
            let result = write_field(
                dest,
                part,
                t,
                &FOOTER_FIELD,
                info.footer.as_ref(),
                Finish::FontSize(FOOTER_FONT_SIZE),
                config,
            );
            record(result, "footer", &FOOTER_FIELD);
        }
    }

    log::info!(
        "document information: {} field(s) written, {} failed",
        report.written,
        report.failed
    );
    report
}
