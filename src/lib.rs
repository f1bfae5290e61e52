pub mod config;
pub mod docx;
mod error;
pub mod extract;
pub mod fixups;
pub mod images;
pub mod inject;
pub mod model;
pub mod reconcile;
pub mod style_map;
pub mod write;

pub use config::{HeaderFooterPick, StyleRoles, TransferConfig};
pub use docx::Document;
pub use error::{Error, Result};
pub use extract::{extract_content, extract_document_info, locate_table};
pub use fixups::apply_caption_fixups;
pub use images::{BindReport, bind_images};
pub use inject::{InjectReport, inject_document_info};
pub use model::{AdminRow, Block, DocumentInfo};
pub use reconcile::reconcile_admin_tables;
pub use style_map::StyleMap;
pub use write::write_content;

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Default)]
pub struct TransferReport {
    pub blocks: usize,
    pub info: InjectReport,
    pub images: BindReport,
    pub captions: usize,
    pub supplemental_tables: Option<PathBuf>,
}

/// Migrates `source` into a copy of `template` and saves it as `output`.
///
/// Embedded media of the source is staged in `staging_dir` and bound above
/// the matching "Figure N" captions. Nothing is saved if a fatal error occurs.
pub fn transfer_document(
    source: &Path,
    template: &Path,
    output: &Path,
    staging_dir: &Path,
    config: &TransferConfig,
) -> Result<TransferReport> {
    let t0 = Instant::now();
    let mut report = TransferReport::default();

    let src = Document::open(source)?;
    let revision = locate_table(&src, extract::REVISION_HISTORY)
        .and_then(|g| AdminRow::from_grid(&g, reconcile::DATA_ROW));
    let approval = locate_table(&src, extract::APPROVAL_TABLE)
        .and_then(|g| AdminRow::from_grid(&g, reconcile::DATA_ROW));

    if config.supplemental_tables {
        let dir = output.parent().unwrap_or(Path::new("."));
        let path = dir.join(extract::supplemental_tables_name(source));
        extract::export_supplemental_tables(&src).save(&path)?;
        log::info!("Tables extracted and saved to {}", path.display());
        report.supplemental_tables = Some(path);
    }

    let blocks = extract_content(&src);
    let info = extract_document_info(&src, config.header_footer_pick);
    report.blocks = blocks.len();
    let t_extract = t0.elapsed();

    let mut dest = Document::open(template)?;
    write_content(&blocks, &mut dest, config)?;
    reconcile_admin_tables(&mut dest, revision.as_ref(), approval.as_ref(), config)?;
    report.info = inject_document_info(&mut dest, &info, config);
    report.captions = apply_caption_fixups(&mut dest, config);
    let t_write = t0.elapsed();

    let staged = extract::stage_images(&src, staging_dir)?;
    report.images = bind_images(&mut dest, &staged, config)?;
    let t_images = t0.elapsed();

    dest.save(output)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: extract={:.1}ms, write={:.1}ms, images={:.1}ms, save={:.1}ms, total={:.1}ms",
        t_extract.as_secs_f64() * 1000.0,
        (t_write - t_extract).as_secs_f64() * 1000.0,
        (t_images - t_write).as_secs_f64() * 1000.0,
        (t_total - t_images).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
    );
    log::info!("Document saved to {}", output.display());
    Ok(report)
}

/// Outcome of one document in a folder run.
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub result: Result<TransferReport>,
}

fn docx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_docx = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
        if is_docx && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Runs [`transfer_document`] for every `.docx` in `input_dir`, writing each
/// result under the same file name in `output_dir`. A failed document is
/// logged and the batch moves on.
pub fn transfer_folder(
    input_dir: &Path,
    template: &Path,
    output_dir: &Path,
    staging_dir: &Path,
    config: &TransferConfig,
) -> Result<Vec<FileOutcome>> {
    std::fs::create_dir_all(output_dir)?;
    let files = docx_files(input_dir)?;
    if files.is_empty() {
        log::warn!("no .docx files found in {}", input_dir.display());
    }

    let mut outcomes = Vec::with_capacity(files.len());
    for source in files {
        let Some(name) = source.file_name() else {
            continue;
        };
        let output = output_dir.join(name);
        let result = transfer_document(&source, template, &output, staging_dir, config);
        match &result {
            Ok(_) => log::info!("Processed {} and saved to {}", source.display(), output.display()),
            Err(e) => log::error!("Failed to process {}: {e}", source.display()),
        }
        outcomes.push(FileOutcome {
            source,
            output,
            result,
        });
    }
    Ok(outcomes)
}
