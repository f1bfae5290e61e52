use crate::config::TransferConfig;
use crate::docx::wml::{self, Alignment};
use crate::docx::xml::Element;
use crate::docx::{Document, StyleRegistry, table};
use crate::error::{Error, Result};
use crate::model::{Block, Paragraph, Table};

fn is_heading(style: &str) -> bool {
    style.to_ascii_lowercase().contains("heading")
}

/// Destination style of a paragraph: its translated style, unless it is a
/// list item outside a heading, which always gets the bullet style.
fn paragraph_style<'a>(para: &Paragraph, config: &'a TransferConfig) -> &'a str {
    let translated = config
        .style_map
        .translate(&para.style, &config.roles.text);
    if para.is_list_item && !is_heading(translated) {
        &config.roles.bullet
    } else {
        translated
    }
}

fn require<'a>(styles: &'a StyleRegistry, name: &str) -> Result<&'a str> {
    styles
        .id_of(name)
        .ok_or_else(|| Error::MissingStyle(name.to_string()))
}

/// Every style the blocks will reference must exist before the first block
/// is written.
fn check_styles(blocks: &[Block], styles: &StyleRegistry, config: &TransferConfig) -> Result<()> {
    for block in blocks {
        match block {
            Block::Paragraph(para) => {
                require(styles, paragraph_style(para, config))?;
            }
            Block::Table(tbl) if tbl.column_count() > 0 => {
                require(styles, &config.roles.table_grid)?;
                for cell in tbl.rows.iter().flatten() {
                    let mapped = cell.style.as_deref().and_then(|s| config.style_map.get(s));
                    if let Some(name) = mapped {
                        require(styles, name)?;
                    }
                }
            }
            Block::Table(_) => {}
        }
    }
    Ok(())
}

fn build_paragraph(
    para: &Paragraph,
    styles: &StyleRegistry,
    config: &TransferConfig,
) -> Result<Element> {
    let style = paragraph_style(para, config);
    let style_id = require(styles, style)?;
    let mut p = wml::new_paragraph(None);
    for run in &para.runs {
        p.push(wml::new_run(&run.text, run.bold, run.italic));
    }
    // Character styles land on the first run, so runs go in first.
    wml::apply_style(&mut p, style_id, styles.is_paragraph_style(style));
    Ok(p)
}

fn build_table(
    tbl: &Table,
    styles: &StyleRegistry,
    config: &TransferConfig,
    text_width: u32,
) -> Result<Element> {
    let cols = tbl.column_count();
    let grid_style = require(styles, &config.roles.table_grid)?;
    let mut out = table::new_table(cols, text_width, Some(grid_style));

    for (ri, row) in tbl.rows.iter().enumerate() {
        if row.len() > cols {
            log::warn!(
                "table row {ri} has {} cells but the table has {cols} columns, dropping the rest",
                row.len()
            );
        }
        let mut tr = table::new_row(&out);
        for (tc, cell) in tr.children_named_mut("w:tc").zip(row) {
            wml::set_cell_text(tc, &cell.text);
            let mapped = cell.style.as_deref().and_then(|s| config.style_map.get(s));
            if let Some(name) = mapped {
                let id = require(styles, name)?;
                let paragraph_level = styles.is_paragraph_style(name);
                for p in wml::cell_paragraphs_mut(tc) {
                    wml::apply_style(p, id, paragraph_level);
                }
            }
            if mapped != Some(config.roles.table_title.as_str()) {
                if let Some(p) = tc.child_mut("w:p") {
                    wml::set_alignment(p, Alignment::Left);
                }
                wml::set_cell_vertical_center(tc);
            }
        }
        out.push(tr);
    }
    Ok(out)
}

/// Appends `blocks` to the body of `dest` in order, translating styles.
///
/// Style references are validated up front: on `Error::MissingStyle` the
/// document is left untouched.
pub fn write_content(
    blocks: &[Block],
    dest: &mut Document,
    config: &TransferConfig,
) -> Result<()> {
    check_styles(blocks, dest.styles(), config)?;

    let text_width = dest.text_width();
    let mut built = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Block::Paragraph(para) => {
                built.push(build_paragraph(para, dest.styles(), config)?);
            }
            Block::Table(tbl) if tbl.column_count() > 0 => {
                built.push(build_table(tbl, dest.styles(), config, text_width)?);
            }
            Block::Table(_) => log::debug!("skipping empty table"),
        }
    }

    let count = built.len();
    for el in built {
        dest.append_block(el);
    }
    log::info!("wrote {count} blocks");
    Ok(())
}
