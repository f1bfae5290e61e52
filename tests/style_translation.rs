mod common;

use common::DocxBuilder;
use doctransfer::StyleMap;
use doctransfer::docx::StyleKind;

#[test]
fn builtin_table_translates_known_styles() {
    let map = StyleMap::default();
    assert_eq!(map.translate("Normal", "00_TEXT"), "00_TEXT");
    assert_eq!(map.translate("Heading 3", "00_TEXT"), "Heading 3");
    assert_eq!(map.translate("List Paragraph", "00_TEXT"), "00_BULLET");
    assert_eq!(map.translate("_ArialTableHeader", "00_TEXT"), "00_TITLE TABLE");
    assert_eq!(map.translate("Caption", "00_TEXT"), "00_PICTURE");
    assert_eq!(map.translate("Documet_Title", "x"), "00_TEXT");
}

#[test]
fn unknown_style_falls_back_to_default() {
    let map = StyleMap::default();
    assert_eq!(map.get("Fancy Quote"), None);
    assert_eq!(map.translate("Fancy Quote", "00_TEXT"), "00_TEXT");
    // Lookups are exact.
    assert_eq!(map.get("normal"), None);
}

#[test]
fn overrides_extend_and_replace_builtin_pairs() {
    let overrides = vec![
        ("Body Text".to_string(), "00_TEXT".to_string()),
        ("Caption".to_string(), "00_TEXT".to_string()),
    ];
    let map = StyleMap::with_overrides(&overrides);
    assert_eq!(map.get("Body Text"), Some("00_TEXT"));
    assert_eq!(map.get("Caption"), Some("00_TEXT"));
    assert_eq!(map.len(), StyleMap::default().len() + 1);
}

#[test]
fn from_pairs_builds_only_the_given_table() {
    let map = StyleMap::from_pairs([("A", "B")]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.translate("A", "Z"), "B");
    assert_eq!(map.translate("Normal", "Z"), "Z");
}

#[test]
fn registry_normalizes_builtin_lowercase_names() {
    common::init_logging();
    let doc = DocxBuilder::template()
        .style("paragraph", "Caption", "caption")
        .style("character", "Strong", "Strong")
        .document();
    let styles = doc.styles();

    assert_eq!(styles.id_of("Heading 1"), Some("Heading1"));
    assert_eq!(styles.id_of("heading 1"), None);
    assert_eq!(styles.id_of("Caption"), Some("Caption"));
    assert_eq!(styles.name_of("00TEXT"), "00_TEXT");
    assert_eq!(styles.name_of("NoSuchId"), "NoSuchId");
    assert_eq!(styles.default_paragraph_style(), "Normal");
    assert!(styles.is_paragraph_style("00_BULLET"));
    assert_eq!(styles.get("Strong").map(|s| s.kind), Some(StyleKind::Character));
    assert!(!styles.is_paragraph_style("Strong"));
    assert!(!styles.is_paragraph_style("Table Grid"));
}
