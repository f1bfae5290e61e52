use std::collections::HashMap;

/// Source style name -> destination style name pairs shipped with the crate.
const BUILTIN: &[(&str, &str)] = &[
    ("Heading 1", "Heading 1"),
    ("Heading 2", "Heading 2"),
    ("Heading 3", "Heading 3"),
    ("Heading 4", "Heading 4"),
    ("Heading 5", "Heading 5"),
    ("Heading 6", "Heading 6"),
    ("Normal", "00_TEXT"),
    ("List Paragraph", "00_BULLET"),
    ("Documet_Title", "00_TEXT"),
    ("Norm_NoIndent", "00_TEXT"),
    ("_ArialTableHeader", "00_TITLE TABLE"),
    ("00_TITLE TABLE", "00_TITLE TABLE"),
    ("_TimesTableBody", "00_TEXT"),
    ("Caption", "00_PICTURE"),
    ("Norm_1_2Head", "00_TEXT"),
    ("Norm_4Head", "00_TEXT"),
    ("Norm_3Head", "00_TEXT"),
    ("00_TEXT", "00_TEXT"),
];

/// Immutable translation table between the style namespaces of a source
/// document and a template. Built once and handed to every call that needs it.
#[derive(Clone, Debug)]
pub struct StyleMap {
    entries: HashMap<String, String>,
}

impl Default for StyleMap {
    fn default() -> Self {
        StyleMap::from_pairs(BUILTIN.iter().copied())
    }
}

impl StyleMap {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        StyleMap {
            entries: pairs
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// The built-in table with `overrides` layered on top; later pairs win.
    pub fn with_overrides(overrides: &[(String, String)]) -> Self {
        let mut map = StyleMap::default();
        for (from, to) in overrides {
            map.entries.insert(from.clone(), to.clone());
        }
        map
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Never fails: an unmapped `source` yields `default`.
    pub fn translate<'a>(&'a self, source: &str, default: &'a str) -> &'a str {
        self.get(source).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
