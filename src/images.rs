use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::TransferConfig;
use crate::docx::wml::{self, Alignment};
use crate::docx::{Document, media};
use crate::error::Result;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindReport {
    /// File names placed, in processing order.
    pub placed: Vec<String>,
    /// File names left out, in processing order.
    pub skipped: Vec<String>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .filter(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// All ASCII digits of the file stem, in order: "fig_3-1.png" -> "31".
pub fn figure_number(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let digits: String = stem.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// Index of the first body paragraph captioned `anchor` ("Figure 12"). The
/// number must end where the anchor ends, so "Figure 1" does not match a
/// "Figure 12" caption.
pub fn find_anchor(doc: &Document, anchor: &str) -> Option<usize> {
    doc.paragraphs().position(|p| {
        wml::paragraph_text(p)
            .strip_prefix(anchor)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
    })
}

fn place(
    dest: &mut Document,
    path: &Path,
    ext: &str,
    anchor_index: usize,
    config: &TransferConfig,
) -> Result<()> {
    let data = std::fs::read(path)?;
    let (width, height) = image::ImageReader::new(Cursor::new(&data))
        .with_guessed_format()?
        .into_dimensions()?;
    let extent = media::scaled_extent(width, height, config.image_width_in);
    let drawing_id = dest.next_drawing_id();
    let (rel_id, _) = dest.add_image(data, ext)?;

    let mut p = wml::new_paragraph(None);
    wml::set_alignment(&mut p, Alignment::Center);
    p.push(media::inline_picture_run(
        &rel_id,
        drawing_id,
        &file_name(path),
        extent,
    ));
    dest.insert_before_paragraph(anchor_index, p);
    Ok(())
}

fn bind_sorted(
    dest: &mut Document,
    files: &[PathBuf],
    config: &TransferConfig,
    report: &mut BindReport,
) -> Result<()> {
    for path in files {
        let name = file_name(path);
        let Some(ext) = extension(path) else {
            log::warn!("Skipping {name}: not a PNG or JPEG image.");
            report.skipped.push(name);
            continue;
        };
        let Some(number) = figure_number(path) else {
            log::warn!("Skipping {name}: could not determine figure number.");
            report.skipped.push(name);
            continue;
        };
        let anchor = format!("Figure {number}");
        let Some(index) = find_anchor(dest, &anchor) else {
            log::warn!("{anchor} not found in the document. Skipping {name}.");
            report.skipped.push(name);
            continue;
        };
        match place(dest, path, &ext, index, config) {
            Ok(()) => {
                log::debug!("placed {name} before paragraph {index}");
                report.placed.push(name);
            }
            Err(crate::Error::Image(e)) => {
                log::warn!("Skipping {name}: {e}");
                report.skipped.push(name);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Inserts each staged image above its "Figure N" caption, N being the digits
/// of the file name, then deletes every staged file whether or not it was
/// placed.
pub fn bind_images(
    dest: &mut Document,
    files: &[PathBuf],
    config: &TransferConfig,
) -> Result<BindReport> {
    let mut sorted = files.to_vec();
    sorted.sort_by_key(|p| file_name(p));

    let mut report = BindReport::default();
    let result = bind_sorted(dest, &sorted, config, &mut report);

    for path in &sorted {
        match std::fs::remove_file(path) {
            Ok(()) => log::debug!("Deleted {}", path.display()),
            Err(e) => log::warn!("could not delete {}: {e}", path.display()),
        }
    }

    result?;
    log::info!(
        "images: {} placed, {} skipped",
        report.placed.len(),
        report.skipped.len()
    );
    Ok(report)
}
