/// Cell text laid out on a table's grid, row-major.
pub type Grid = Vec<Vec<String>>;

#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    /// Display name of the paragraph style in the source document.
    pub style: String,
    pub text: String,
    /// Set when the paragraph carries numbering properties, whatever its style.
    pub is_list_item: bool,
    pub runs: Vec<Run>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub text: String,
    /// Style of the first paragraph; `None` for a cell without paragraphs.
    pub style: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Column count the writer uses for the destination table.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_regular(&self) -> bool {
        let cols = self.column_count();
        self.rows.iter().all(|r| r.len() == cols)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentInfo {
    pub header: Option<Grid>,
    pub footer: Option<Grid>,
}

/// One row of an administrative table, written at a fixed row index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminRow(pub Vec<String>);

impl AdminRow {
    /// Row `index` of a located admin table grid.
    pub fn from_grid(grid: &Grid, index: usize) -> Option<AdminRow> {
        grid.get(index).cloned().map(AdminRow)
    }

    pub fn get(&self, col: usize) -> Option<&str> {
        self.0.get(col).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
