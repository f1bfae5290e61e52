use crate::style_map::StyleMap;

/// Which header/footer table wins when several sections define one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderFooterPick {
    /// Later tables and sections overwrite earlier ones.
    #[default]
    Last,
    First,
}

/// Destination style names the pipeline writes by role.
#[derive(Clone, Debug)]
pub struct StyleRoles {
    pub text: String,
    pub bullet: String,
    pub table_title: String,
    pub table_grid: String,
    pub picture: String,
    pub bold: String,
    pub header: String,
    pub header_title: String,
}

impl Default for StyleRoles {
    fn default() -> Self {
        StyleRoles {
            text: "00_TEXT".into(),
            bullet: "00_BULLET".into(),
            table_title: "00_TITLE TABLE".into(),
            table_grid: "Table Grid".into(),
            picture: "00_PICTURE".into(),
            bold: "00_BOLD".into(),
            header: "00_HEADER".into(),
            header_title: "00_HEADER TITLE".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TransferConfig {
    pub style_map: StyleMap,
    pub roles: StyleRoles,
    pub header_footer_pick: HeaderFooterPick,
    /// Width of bound figures, in inches.
    pub image_width_in: f32,
    /// Paragraphs starting with this text get the template notice fix-up.
    pub template_notice: String,
    pub supplemental_tables: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        TransferConfig {
            style_map: StyleMap::default(),
            roles: StyleRoles::default(),
            header_footer_pick: HeaderFooterPick::Last,
            image_width_in: 3.0,
            template_notice: "Created from Template LLDC".into(),
            supplemental_tables: false,
        }
    }
}
