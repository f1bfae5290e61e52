use crate::config::TransferConfig;
use crate::docx::Document;
use crate::docx::wml::{self, Alignment};

const CAPTION_SIZE: f32 = 9.0;
const NOTICE_SIZE: f32 = 8.0;

/// Italicizes figure captions and the template notice line and sets their
/// fixed sizes; the notice is also centered. Returns the number of
/// paragraphs touched.
pub fn apply_caption_fixups(dest: &mut Document, config: &TransferConfig) -> usize {
    let picture_id = dest
        .styles()
        .id_of(&config.roles.picture)
        .map(str::to_string);

    let mut touched = 0;
    for p in dest.paragraphs_mut() {
        let is_caption =
            picture_id.is_some() && wml::paragraph_style_id(p) == picture_id.as_deref();
        let size = if is_caption {
            CAPTION_SIZE
        } else if wml::paragraph_text(p).starts_with(&config.template_notice) {
            wml::set_alignment(p, Alignment::Center);
            NOTICE_SIZE
        } else {
            continue;
        };
        for run in p.children_named_mut("w:r") {
            wml::set_run_italic(run);
            wml::set_run_size(run, size);
        }
        touched += 1;
    }
    log::debug!("caption fix-ups applied to {touched} paragraph(s)");
    touched
}
