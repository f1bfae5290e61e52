//! Table access on the layout grid.
//!
//! Cells are addressed by (row, grid column). A cell spanning several grid
//! columns answers for each of them, and a vertically merged continuation
//! answers with the cell that started the merge, so fixed coordinates keep
//! pointing at the same logical cell whatever the merge layout.

use super::wml;
use super::xml::Element;
use crate::model::Grid;

/// Physical location of a `w:tc`: row index and position among the row's cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellAddr {
    pub row: usize,
    pub tc: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum VMerge {
    None,
    Restart,
    Continue,
}

pub fn rows(tbl: &Element) -> impl Iterator<Item = &Element> {
    tbl.children_named("w:tr")
}

fn grid_span(tc: &Element) -> usize {
    tc.child("w:tcPr")
        .and_then(|pr| pr.child("w:gridSpan"))
        .and_then(|n| n.attr("w:val"))
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}

fn v_merge(tc: &Element) -> VMerge {
    tc.child("w:tcPr")
        .and_then(|pr| pr.child("w:vMerge"))
        .map(|n| match n.attr("w:val") {
            Some("restart") => VMerge::Restart,
            _ => VMerge::Continue,
        })
        .unwrap_or(VMerge::None)
}

/// Resolves every grid position of the table to the cell that owns it.
pub fn layout(tbl: &Element) -> Vec<Vec<CellAddr>> {
    let mut grid: Vec<Vec<CellAddr>> = Vec::new();
    for (ri, tr) in rows(tbl).enumerate() {
        let mut row = Vec::new();
        for (ti, tc) in tr.children_named("w:tc").enumerate() {
            let col = row.len();
            let own = CellAddr { row: ri, tc: ti };
            let addr = match v_merge(tc) {
                VMerge::Continue => grid
                    .last()
                    .and_then(|above: &Vec<CellAddr>| above.get(col).copied())
                    .unwrap_or(own),
                VMerge::None | VMerge::Restart => own,
            };
            for _ in 0..grid_span(tc) {
                row.push(addr);
            }
        }
        grid.push(row);
    }
    grid
}

fn physical(tbl: &Element, addr: CellAddr) -> Option<&Element> {
    rows(tbl).nth(addr.row)?.children_named("w:tc").nth(addr.tc)
}

fn physical_mut(tbl: &mut Element, addr: CellAddr) -> Option<&mut Element> {
    tbl.children_named_mut("w:tr")
        .nth(addr.row)?
        .children_named_mut("w:tc")
        .nth(addr.tc)
}

pub fn cell(tbl: &Element, row: usize, col: usize) -> Option<&Element> {
    let addr = *layout(tbl).get(row)?.get(col)?;
    physical(tbl, addr)
}

pub fn cell_mut(tbl: &mut Element, row: usize, col: usize) -> Option<&mut Element> {
    let addr = *layout(tbl).get(row)?.get(col)?;
    physical_mut(tbl, addr)
}

/// Paragraph texts of a cell joined by newlines, untrimmed.
pub fn cell_text(tc: &Element) -> String {
    tc.children_named("w:p")
        .map(wml::paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn first_paragraph(tc: &Element) -> Option<&Element> {
    tc.child("w:p")
}

/// Trimmed text of every grid cell.
pub fn text_grid(tbl: &Element) -> Grid {
    layout(tbl)
        .iter()
        .map(|row| {
            row.iter()
                .map(|addr| {
                    physical(tbl, *addr)
                        .map(|tc| cell_text(tc).trim().to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

/// Trimmed text of cell (0,0), the label admin tables are recognised by.
pub fn label(tbl: &Element) -> Option<String> {
    cell(tbl, 0, 0).map(|tc| cell_text(tc).trim().to_string())
}

/// An empty table with `cols` equal grid columns spread over `width` twips.
pub fn new_table(cols: usize, width: u32, style_id: Option<&str>) -> Element {
    let mut tbl_pr = Element::new("w:tblPr");
    if let Some(id) = style_id {
        tbl_pr.set_ordered_child(
            Element::new("w:tblStyle").with_attr("w:val", id),
            wml::TBLPR_ORDER,
        );
    }
    tbl_pr.set_ordered_child(
        Element::new("w:tblW")
            .with_attr("w:w", "0")
            .with_attr("w:type", "auto"),
        wml::TBLPR_ORDER,
    );
    tbl_pr.set_ordered_child(
        Element::new("w:tblLook")
            .with_attr("w:val", "04A0")
            .with_attr("w:firstRow", "1")
            .with_attr("w:lastRow", "0")
            .with_attr("w:firstColumn", "1")
            .with_attr("w:lastColumn", "0")
            .with_attr("w:noHBand", "0")
            .with_attr("w:noVBand", "1"),
        wml::TBLPR_ORDER,
    );

    let col_width = (width / cols.max(1) as u32).to_string();
    let mut tbl_grid = Element::new("w:tblGrid");
    for _ in 0..cols {
        tbl_grid.push(Element::new("w:gridCol").with_attr("w:w", &col_width));
    }

    Element::new("w:tbl").with_child(tbl_pr).with_child(tbl_grid)
}

/// A row with one empty cell per grid column of `tbl`, not yet attached.
pub fn new_row(tbl: &Element) -> Element {
    let widths: Vec<&str> = tbl
        .child("w:tblGrid")
        .map(|g| {
            g.children_named("w:gridCol")
                .map(|c| c.attr("w:w").unwrap_or("0"))
                .collect()
        })
        .unwrap_or_default();
    let mut tr = Element::new("w:tr");
    for w in widths {
        let tc_pr = Element::new("w:tcPr").with_child(
            Element::new("w:tcW")
                .with_attr("w:w", w)
                .with_attr("w:type", "dxa"),
        );
        tr.push(
            Element::new("w:tc")
                .with_child(tc_pr)
                .with_child(Element::new("w:p")),
        );
    }
    tr
}
