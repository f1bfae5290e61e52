use crate::config::TransferConfig;
use crate::docx::{Document, table, wml};
use crate::error::{Error, Result};
use crate::extract::{APPROVAL_TABLE, REVISION_HISTORY};
use crate::model::AdminRow;

/// Row of an admin table that carries the document's own entry.
pub const DATA_ROW: usize = 2;

struct AdminTable<'a> {
    label: &'static str,
    width: usize,
    row: Option<&'a AdminRow>,
    seen: usize,
}

fn fill_row(
    dest: &mut Document,
    index: usize,
    admin: &AdminTable,
    config: &TransferConfig,
) -> Result<()> {
    let structural = |what: &'static str, col: usize| Error::StructuralIndex {
        table: admin.label.to_string(),
        what,
        row: DATA_ROW,
        col,
    };
    let row = admin.row.ok_or_else(|| structural("source row", 0))?;
    let style = &config.roles.text;
    let style_id = dest
        .styles()
        .id_of(style)
        .ok_or_else(|| Error::MissingStyle(style.clone()))?
        .to_string();
    let paragraph_level = dest.styles().is_paragraph_style(style);

    let tbl = dest
        .table_mut(index)
        .ok_or_else(|| structural("destination table", 0))?;
    for col in 0..admin.width {
        let value = row.get(col).ok_or_else(|| structural("source value", col))?;
        let tc = table::cell_mut(tbl, DATA_ROW, col)
            .ok_or_else(|| structural("destination cell", col))?;
        wml::set_cell_text(tc, value);
        if let Some(p) = tc.child_mut("w:p") {
            wml::apply_style(p, &style_id, paragraph_level);
        }
    }
    Ok(())
}

/// Writes the revision and approval rows into the template's admin tables and
/// removes the second copy of each table.
///
/// Every occurrence of a labelled table except the second gets row
/// [`DATA_ROW`] filled in; the second is deleted. Missing row data or a
/// missing cell aborts with `Error::StructuralIndex`.
pub fn reconcile_admin_tables(
    dest: &mut Document,
    revision: Option<&AdminRow>,
    approval: Option<&AdminRow>,
    config: &TransferConfig,
) -> Result<()> {
    let mut admins = [
        AdminTable {
            label: APPROVAL_TABLE,
            width: 4,
            row: approval,
            seen: 0,
        },
        AdminTable {
            label: REVISION_HISTORY,
            width: 3,
            row: revision,
            seen: 0,
        },
    ];

    let labels: Vec<Option<String>> = dest.tables().map(table::label).collect();
    let mut to_remove = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        let Some(label) = label else {
            continue;
        };
        for admin in admins.iter_mut().filter(|a| a.label == label.as_str()) {
            admin.seen += 1;
            if admin.seen == 2 {
                to_remove.push(index);
            } else {
                fill_row(dest, index, admin, config)?;
                log::debug!("filled {} (table {index})", admin.label);
            }
        }
    }

    to_remove.sort_unstable_by(|a, b| b.cmp(a));
    for index in &to_remove {
        dest.remove_table(*index);
    }
    log::info!(
        "admin tables reconciled: {} approval, {} revision, {} duplicate(s) removed",
        admins[0].seen,
        admins[1].seen,
        to_remove.len()
    );
    Ok(())
}
