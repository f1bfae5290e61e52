//! Reading and editing WordprocessingML elements on the owned tree.

use super::xml::{Element, XmlNode};

const PPR_ORDER: &[&str] = &[
    "w:pStyle",
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:framePr",
    "w:widowControl",
    "w:numPr",
    "w:suppressLineNumbers",
    "w:pBdr",
    "w:shd",
    "w:tabs",
    "w:suppressAutoHyphens",
    "w:kinsoku",
    "w:wordWrap",
    "w:overflowPunct",
    "w:topLinePunct",
    "w:autoSpaceDE",
    "w:autoSpaceDN",
    "w:bidi",
    "w:adjustRightInd",
    "w:snapToGrid",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:mirrorIndents",
    "w:suppressOverlap",
    "w:jc",
    "w:textDirection",
    "w:textAlignment",
    "w:textboxTightWrap",
    "w:outlineLvl",
    "w:divId",
    "w:cnfStyle",
    "w:rPr",
    "w:sectPr",
    "w:pPrChange",
];

const RPR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
];

const TCPR_ORDER: &[&str] = &[
    "w:cnfStyle",
    "w:tcW",
    "w:gridSpan",
    "w:hMerge",
    "w:vMerge",
    "w:tcBorders",
    "w:shd",
    "w:noWrap",
    "w:tcMar",
    "w:textDirection",
    "w:tcFitText",
    "w:vAlign",
    "w:hideMark",
];

pub(crate) const TBLPR_ORDER: &[&str] = &[
    "w:tblStyle",
    "w:tblpPr",
    "w:tblOverlap",
    "w:bidiVisual",
    "w:tblStyleRowBandSize",
    "w:tblStyleColBandSize",
    "w:tblW",
    "w:jc",
    "w:tblCellSpacing",
    "w:tblInd",
    "w:tblBorders",
    "w:shd",
    "w:tblLayout",
    "w:tblCellMar",
    "w:tblLook",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn val(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

fn val_element(name: &str, val: &str) -> Element {
    Element::new(name).with_attr("w:val", val)
}

/// Concatenated character data directly under `el`.
pub fn element_text(el: &Element) -> String {
    el.children
        .iter()
        .filter_map(|c| match c {
            XmlNode::Text(t) => Some(t.as_str()),
            XmlNode::Element(_) => None,
        })
        .collect()
}

pub fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            "w:t" => text.push_str(&element_text(child)),
            "w:tab" | "w:ptab" => text.push('\t'),
            "w:br" | "w:cr" => text.push('\n'),
            "w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

/// A WML on/off property such as `w:b`. Present with no `w:val`, or with
/// anything other than an explicit "off" value, means on.
pub fn run_toggle(run: &Element, prop: &str) -> bool {
    run.child("w:rPr")
        .and_then(|rpr| rpr.child(prop))
        .is_some_and(|p| {
            p.attr("w:val")
                .is_none_or(|v| v != "0" && v != "false" && v != "off")
        })
}

/// Runs whose text belongs to the paragraph, hyperlink runs included.
fn text_runs(p: &Element) -> Vec<&Element> {
    let mut runs = Vec::new();
    for child in p.elements() {
        match child.name.as_str() {
            "w:r" => runs.push(child),
            "w:hyperlink" | "w:ins" | "w:smartTag" => runs.extend(child.children_named("w:r")),
            _ => {}
        }
    }
    runs
}

pub fn paragraph_text(p: &Element) -> String {
    text_runs(p).into_iter().map(run_text).collect()
}

/// Direct run children, the ones a paragraph's formatting is edited through.
pub fn runs(p: &Element) -> impl Iterator<Item = &Element> {
    p.children_named("w:r")
}

pub fn paragraph_style_id(p: &Element) -> Option<&str> {
    p.child("w:pPr")
        .and_then(|ppr| ppr.child("w:pStyle"))
        .and_then(|s| s.attr("w:val"))
}

pub fn has_numbering(p: &Element) -> bool {
    p.has_descendant("w:numPr")
}

pub fn set_paragraph_style(p: &mut Element, style_id: &str) {
    p.first_child_or_insert("w:pPr")
        .set_ordered_child(val_element("w:pStyle", style_id), PPR_ORDER);
}

pub fn set_alignment(p: &mut Element, alignment: Alignment) {
    p.first_child_or_insert("w:pPr")
        .set_ordered_child(val_element("w:jc", alignment.val()), PPR_ORDER);
}

pub fn alignment(p: &Element) -> Option<&str> {
    p.child("w:pPr")
        .and_then(|ppr| ppr.child("w:jc"))
        .and_then(|jc| jc.attr("w:val"))
}

/// Text content for a run: tabs and line breaks become their own elements.
fn push_run_content(run: &mut Element, text: &str) {
    let mut buf = String::new();
    let flush = |run: &mut Element, buf: &mut String| {
        if !buf.is_empty() {
            let mut t = Element::new("w:t").with_text(buf);
            if buf.starts_with(char::is_whitespace) || buf.ends_with(char::is_whitespace) {
                t.set_attr("xml:space", "preserve");
            }
            run.push(t);
            buf.clear();
        }
    };
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush(run, &mut buf);
                run.push(Element::new("w:tab"));
            }
            '\n' | '\r' => {
                flush(run, &mut buf);
                run.push(Element::new("w:br"));
            }
            _ => buf.push(ch),
        }
    }
    flush(run, &mut buf);
}

pub fn new_run(text: &str, bold: bool, italic: bool) -> Element {
    let mut run = Element::new("w:r");
    if bold || italic {
        let mut rpr = Element::new("w:rPr");
        if bold {
            rpr.push(Element::new("w:b"));
        }
        if italic {
            rpr.push(Element::new("w:i"));
        }
        run.push(rpr);
    }
    push_run_content(&mut run, text);
    run
}

pub fn new_paragraph(style_id: Option<&str>) -> Element {
    let mut p = Element::new("w:p");
    if let Some(id) = style_id {
        set_paragraph_style(&mut p, id);
    }
    p
}

pub fn set_run_style(run: &mut Element, style_id: &str) {
    run.first_child_or_insert("w:rPr")
        .set_ordered_child(val_element("w:rStyle", style_id), RPR_ORDER);
}

pub fn set_run_italic(run: &mut Element) {
    run.first_child_or_insert("w:rPr")
        .set_ordered_child(Element::new("w:i"), RPR_ORDER);
}

/// Font size in points; stored as half-points for both script classes.
pub fn set_run_size(run: &mut Element, points: f32) {
    let half_points = ((points * 2.0).round() as u32).to_string();
    let rpr = run.first_child_or_insert("w:rPr");
    rpr.set_ordered_child(val_element("w:sz", &half_points), RPR_ORDER);
    rpr.set_ordered_child(val_element("w:szCs", &half_points), RPR_ORDER);
}

/// Replaces the cell's content with one unstyled paragraph holding `text`.
/// Cell properties are kept.
pub fn set_cell_text(tc: &mut Element, text: &str) {
    tc.children
        .retain(|c| matches!(c, XmlNode::Element(e) if e.is("w:tcPr")));
    let mut p = Element::new("w:p");
    p.push(new_run(text, false, false));
    tc.push(p);
}

pub fn set_cell_vertical_center(tc: &mut Element) {
    tc.first_child_or_insert("w:tcPr")
        .set_ordered_child(val_element("w:vAlign", "center"), TCPR_ORDER);
}

pub fn cell_paragraphs_mut(tc: &mut Element) -> impl Iterator<Item = &mut Element> {
    tc.children_named_mut("w:p")
}

/// Applies a named style to a paragraph: paragraph styles through `w:pStyle`,
/// character styles on the first run (created when the paragraph has none).
pub fn apply_style(p: &mut Element, style_id: &str, paragraph_level: bool) {
    if paragraph_level {
        set_paragraph_style(p, style_id);
        return;
    }
    if p.child("w:r").is_none() {
        p.push(Element::new("w:r"));
    }
    if let Some(run) = p.child_mut("w:r") {
        set_run_style(run, style_id);
    }
}
