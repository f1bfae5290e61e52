mod common;

use common::DocxBuilder;
use doctransfer::Document;
use doctransfer::docx::xml::{self, Element};

#[test]
fn attribute_whitespace_survives_a_reparse() {
    let root = Element::new("w:x")
        .with_attr("xmlns:w", "urn:test")
        .with_attr("w:v", "a\tb\nc\rd \"e\" & <f>");

    let out = xml::to_string(&root);
    assert!(out.contains("a&#9;b&#10;c&#13;d &quot;e&quot; &amp; &lt;f&gt;"));
    assert!(!out.contains('\t'));

    let reparsed = xml::parse(&out).unwrap();
    assert_eq!(reparsed.attr("w:v"), Some("a\tb\nc\rd \"e\" & <f>"));
}

#[test]
fn text_content_keeps_literal_whitespace() {
    let root = Element::new("t").with_text("one\ttwo\nthree");
    let out = xml::to_string(&root);
    assert!(out.ends_with("<t>one\ttwo\nthree</t>"));
    let reparsed = xml::parse(&out).unwrap();
    assert_eq!(xml::to_string(&reparsed), out);
}

#[test]
fn raw_parts_load_whole() {
    common::init_logging();
    let large: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    let bytes = DocxBuilder::new()
        .media("image1.png", common::png(3, 2))
        .media("blob.bin", large.clone())
        .build();

    let doc = Document::from_bytes(&bytes).unwrap();
    let media = doc.media();
    let blob = media.iter().find(|(name, _)| *name == "word/media/blob.bin").unwrap();
    assert_eq!(blob.1, large.as_slice());

    let reloaded = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    let png = reloaded
        .media()
        .into_iter()
        .find(|(name, _)| *name == "word/media/image1.png")
        .map(|(_, data)| data.to_vec());
    assert_eq!(png, Some(common::png(3, 2)));
}

#[test]
fn archives_that_are_not_documents_are_rejected() {
    assert!(Document::from_bytes(b"PK\x03\x04 truncated").is_err());
    assert!(Document::from_bytes(&[]).is_err());
}
