use super::xml::Element;

const WPD_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
pub(super) const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

pub const EMU_PER_INCH: f64 = 914_400.0;

pub(super) fn content_type_for(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Display size in EMU for an image scaled to `width_in` inches, keeping the
/// pixel aspect ratio.
pub fn scaled_extent(pixel_width: u32, pixel_height: u32, width_in: f32) -> (u64, u64) {
    let cx = (width_in as f64 * EMU_PER_INCH).round();
    let cy = if pixel_width == 0 {
        cx
    } else {
        (cx * pixel_height as f64 / pixel_width as f64).round()
    };
    (cx as u64, cy as u64)
}

/// A run holding an inline picture that references relationship `rel_id`.
pub fn inline_picture_run(
    rel_id: &str,
    drawing_id: u32,
    file_name: &str,
    extent: (u64, u64),
) -> Element {
    let (cx, cy) = (extent.0.to_string(), extent.1.to_string());
    let id = drawing_id.to_string();

    let blip_fill = Element::new("pic:blipFill")
        .with_child(
            Element::new("a:blip")
                .with_attr("xmlns:r", super::REL_NS)
                .with_attr("r:embed", rel_id),
        )
        .with_child(Element::new("a:stretch").with_child(Element::new("a:fillRect")));

    let sp_pr = Element::new("pic:spPr")
        .with_child(
            Element::new("a:xfrm")
                .with_child(Element::new("a:off").with_attr("x", "0").with_attr("y", "0"))
                .with_child(Element::new("a:ext").with_attr("cx", &cx).with_attr("cy", &cy)),
        )
        .with_child(
            Element::new("a:prstGeom")
                .with_attr("prst", "rect")
                .with_child(Element::new("a:avLst")),
        );

    let pic = Element::new("pic:pic")
        .with_attr("xmlns:pic", PIC_NS)
        .with_child(
            Element::new("pic:nvPicPr")
                .with_child(
                    Element::new("pic:cNvPr")
                        .with_attr("id", "0")
                        .with_attr("name", file_name),
                )
                .with_child(Element::new("pic:cNvPicPr")),
        )
        .with_child(blip_fill)
        .with_child(sp_pr);

    let graphic = Element::new("a:graphic")
        .with_attr("xmlns:a", super::DML_NS)
        .with_child(
            Element::new("a:graphicData")
                .with_attr("uri", PIC_NS)
                .with_child(pic),
        );

    let inline = Element::new("wp:inline")
        .with_attr("xmlns:wp", WPD_NS)
        .with_attr("distT", "0")
        .with_attr("distB", "0")
        .with_attr("distL", "0")
        .with_attr("distR", "0")
        .with_child(Element::new("wp:extent").with_attr("cx", &cx).with_attr("cy", &cy))
        .with_child(
            Element::new("wp:docPr")
                .with_attr("id", &id)
                .with_attr("name", &format!("Picture {id}")),
        )
        .with_child(
            Element::new("wp:cNvGraphicFramePr").with_child(
                Element::new("a:graphicFrameLocks")
                    .with_attr("xmlns:a", super::DML_NS)
                    .with_attr("noChangeAspect", "1"),
            ),
        )
        .with_child(graphic);

    Element::new("w:r").with_child(Element::new("w:drawing").with_child(inline))
}
