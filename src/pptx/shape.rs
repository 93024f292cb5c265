//! Shapes placed on a slide and their DrawingML serialisation.
//!
//! Geometry is expressed in inches and converted to EMUs only when XML is
//! produced, so layout code can use the same numbers as the design tokens.
//! Transparency follows the presentation-tool convention: `0` is opaque,
//! `100` is invisible. DrawingML stores the inverse (`alpha`) in 1/1000 %.

use crate::design::emu;

/// Escape XML special characters and drop characters XML 1.0 cannot carry
/// (C0 controls other than tab/LF/CR, and U+FFFE/U+FFFF).
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Position and size of a shape, in inches from the slide's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Preset geometry of a non-text shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Rect,
    RoundRect,
}

impl Geometry {
    fn preset(self) -> &'static str {
        match self {
            Geometry::Rect => "rect",
            Geometry::RoundRect => "roundRect",
        }
    }
}

/// Solid fill colour with transparency.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: String,
    pub transparency: u8,
}

impl Fill {
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            transparency: 0,
        }
    }

    pub fn with_transparency(mut self, transparency: u8) -> Self {
        self.transparency = transparency.min(100);
        self
    }
}

/// Outline of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub color: String,
    pub width_pt: f64,
    pub transparency: u8,
}

/// Styling for rectangles and rounded rectangles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeOptions {
    /// `None` renders no fill.
    pub fill: Option<Fill>,
    /// `None` renders no outline.
    pub line: Option<Line>,
    /// Corner radius in inches (rounded rectangles only).
    pub rect_radius: Option<f64>,
    /// Clockwise rotation in degrees.
    pub rotate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Run and paragraph styling for a text box.
///
/// Built fluently:
/// ```rust
/// use carousel_forge::pptx::{Align, TextOptions};
///
/// let opts = TextOptions::new(18.0, "F4F4F1")
///     .font("Arial")
///     .bold()
///     .align(Align::Center)
///     .char_spacing(4.0);
/// assert!(opts.bold);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    pub font_face: Option<String>,
    /// Point size.
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub align: Align,
    pub valign: VAlign,
    /// Extra spacing between characters, in points.
    pub char_spacing: Option<f64>,
    /// Line height as a multiple of single spacing.
    pub line_spacing_multiple: Option<f64>,
    pub transparency: u8,
    /// Inner margin on all four sides, in inches.
    pub margin: f64,
}

impl TextOptions {
    pub fn new(font_size: f64, color: impl Into<String>) -> Self {
        Self {
            font_face: None,
            font_size,
            color: color.into(),
            bold: false,
            align: Align::Left,
            valign: VAlign::Top,
            char_spacing: None,
            line_spacing_multiple: None,
            transparency: 0,
            margin: 0.0,
        }
    }

    pub fn font(mut self, face: impl Into<String>) -> Self {
        self.font_face = Some(face.into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn char_spacing(mut self, points: f64) -> Self {
        self.char_spacing = Some(points);
        self
    }

    pub fn line_spacing(mut self, multiple: f64) -> Self {
        self.line_spacing_multiple = Some(multiple);
        self
    }

    pub fn transparency(mut self, transparency: u8) -> Self {
        self.transparency = transparency.min(100);
        self
    }
}

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text {
        id: u32,
        text: String,
        frame: Frame,
        opts: TextOptions,
    },
    Geometry {
        id: u32,
        geometry: Geometry,
        frame: Frame,
        opts: ShapeOptions,
    },
}

impl Shape {
    pub fn id(&self) -> u32 {
        match self {
            Shape::Text { id, .. } | Shape::Geometry { id, .. } => *id,
        }
    }

    pub fn frame(&self) -> Frame {
        match self {
            Shape::Text { frame, .. } | Shape::Geometry { frame, .. } => *frame,
        }
    }

    /// Text content, for text boxes.
    pub fn text(&self) -> Option<&str> {
        match self {
            Shape::Text { text, .. } => Some(text),
            Shape::Geometry { .. } => None,
        }
    }


    /// Append this shape's `<p:sp>` element.
    pub(crate) fn write_xml(&self, xml: &mut String) {
        match self {
            Shape::Text {
                id,
                text,
                frame,
                opts,
            } => write_text_shape(xml, *id, text, frame, opts),
            Shape::Geometry {
                id,
                geometry,
                frame,
                opts,
            } => write_geometry_shape(xml, *id, *geometry, frame, opts),
        }
    }
}

// ── XML helpers ──────────────────────────────────────────────────────────

fn alpha(transparency: u8) -> u32 {
    (100 - u32::from(transparency.min(100))) * 1000
}

fn write_color(xml: &mut String, color: &str, transparency: u8) {
    if transparency == 0 {
        xml.push_str(&format!(r#"<a:srgbClr val="{}"/>"#, escape_xml(color)));
    } else {
        xml.push_str(&format!(
            r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
            escape_xml(color),
            alpha(transparency)
        ));
    }
}

fn write_xfrm(xml: &mut String, frame: &Frame, rotate: Option<f64>) {
    match rotate {
        Some(deg) if deg != 0.0 => {
            xml.push_str(&format!(r#"<a:xfrm rot="{}">"#, (deg * 60_000.0).round() as i64))
        }
        _ => xml.push_str("<a:xfrm>"),
    }
    xml.push_str(&format!(
        r#"<a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/>"#,
        emu(frame.x),
        emu(frame.y),
        emu(frame.w),
        emu(frame.h)
    ));
    xml.push_str("</a:xfrm>");
}

/// Rounded-rectangle adjust value: the radius relative to the shorter side.
fn round_rect_adjust(radius: f64, frame: &Frame) -> i64 {
    let shorter = frame.w.min(frame.h);
    if shorter <= 0.0 {
        return 0;
    }
    ((radius * 100_000.0) / shorter).round().clamp(0.0, 50_000.0) as i64
}

fn write_geometry_shape(
    xml: &mut String,
    id: u32,
    geometry: Geometry,
    frame: &Frame,
    opts: &ShapeOptions,
) {
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(&format!(r#"<p:cNvPr id="{id}" name="Shape {id}"/>"#));
    xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, frame, opts.rotate);
    xml.push_str(&format!(r#"<a:prstGeom prst="{}"><a:avLst>"#, geometry.preset()));
    if let (Geometry::RoundRect, Some(radius)) = (geometry, opts.rect_radius) {
        xml.push_str(&format!(
            r#"<a:gd name="adj" fmla="val {}"/>"#,
            round_rect_adjust(radius, frame)
        ));
    }
    xml.push_str("</a:avLst></a:prstGeom>");

    match &opts.fill {
        Some(fill) => {
            xml.push_str("<a:solidFill>");
            write_color(xml, &fill.color, fill.transparency);
            xml.push_str("</a:solidFill>");
        }
        None => xml.push_str("<a:noFill/>"),
    }

    match &opts.line {
        Some(line) => {
            xml.push_str(&format!(
                r#"<a:ln w="{}"><a:solidFill>"#,
                (line.width_pt * 12_700.0).round() as i64
            ));
            write_color(xml, &line.color, line.transparency);
            xml.push_str("</a:solidFill></a:ln>");
        }
        None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
    }

    xml.push_str("</p:spPr></p:sp>");
}

fn write_text_shape(xml: &mut String, id: u32, text: &str, frame: &Frame, opts: &TextOptions) {
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(&format!(r#"<p:cNvPr id="{id}" name="Text {id}"/>"#));
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

    xml.push_str("<p:spPr>");
    write_xfrm(xml, frame, None);
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
    xml.push_str("</p:spPr>");

    let inset = emu(opts.margin);
    let anchor = match opts.valign {
        VAlign::Top => "t",
        VAlign::Middle => "ctr",
        VAlign::Bottom => "b",
    };
    xml.push_str("<p:txBody>");
    xml.push_str(&format!(
        r#"<a:bodyPr wrap="square" lIns="{inset}" tIns="{inset}" rIns="{inset}" bIns="{inset}" anchor="{anchor}" rtlCol="0"/>"#
    ));
    xml.push_str("<a:lstStyle/>");

    let size = (opts.font_size * 100.0).round() as i64;
    // Vertical tab is the presentation-tool soft break; treat it like CR/LF.
    let text = text.replace("\r\n", "\n").replace(['\r', '\u{b}'], "\n");
    for paragraph in text.split('\n') {
        xml.push_str("<a:p>");
        write_paragraph_props(xml, opts);
        if paragraph.is_empty() {
            xml.push_str(&format!(r#"<a:endParaRPr lang="en-US" sz="{size}" dirty="0"/>"#));
        } else {
            xml.push_str("<a:r>");
            write_run_props(xml, opts);
            xml.push_str(&format!("<a:t>{}</a:t>", escape_xml(paragraph)));
            xml.push_str("</a:r>");
        }
        xml.push_str("</a:p>");
    }

    xml.push_str("</p:txBody></p:sp>");
}

fn write_paragraph_props(xml: &mut String, opts: &TextOptions) {
    let algn = match opts.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    match opts.line_spacing_multiple {
        Some(mult) => {
            xml.push_str(&format!(r#"<a:pPr algn="{algn}"><a:lnSpc>"#));
            xml.push_str(&format!(
                r#"<a:spcPct val="{}"/>"#,
                (mult * 100_000.0).round() as i64
            ));
            xml.push_str("</a:lnSpc></a:pPr>");
        }
        None => xml.push_str(&format!(r#"<a:pPr algn="{algn}"/>"#)),
    }
}

fn write_run_props(xml: &mut String, opts: &TextOptions) {
    xml.push_str(&format!(
        r#"<a:rPr lang="en-US" sz="{}""#,
        (opts.font_size * 100.0).round() as i64
    ));
    if opts.bold {
        xml.push_str(r#" b="1""#);
    }
    if let Some(spc) = opts.char_spacing {
        xml.push_str(&format!(r#" spc="{}""#, (spc * 100.0).round() as i64));
    }
    xml.push_str(r#" dirty="0">"#);

    xml.push_str("<a:solidFill>");
    write_color(xml, &opts.color, opts.transparency);
    xml.push_str("</a:solidFill>");

    if let Some(ref face) = opts.font_face {
        let face = escape_xml(face);
        xml.push_str(&format!(
            r#"<a:latin typeface="{face}"/><a:cs typeface="{face}"/>"#
        ));
    }
    xml.push_str("</a:rPr>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml_of(shape: &Shape) -> String {
        let mut xml = String::new();
        shape.write_xml(&mut xml);
        xml
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn control_characters_never_reach_xml() {
        assert_eq!(escape_xml("a\u{0}b\u{1b}c\u{FFFF}"), "abc");
        assert_eq!(escape_xml("tab\there"), "tab\there");

        let shape = Shape::Text {
            id: 2,
            text: "soft\u{b}break\r\nnext".into(),
            frame: Frame::new(0.7, 2.5, 8.6, 0.5),
            opts: TextOptions::new(20.0, "F4F4F1"),
        };
        let xml = xml_of(&shape);
        assert_eq!(xml.matches("<a:p>").count(), 3);
        assert!(xml.contains("<a:t>soft</a:t>"));
        assert!(xml.contains("<a:t>break</a:t>"));
        assert!(xml.contains("<a:t>next</a:t>"));
        assert!(!xml.contains('\u{b}'));
        assert!(!xml.contains('\r'));
    }

    #[test]
    fn multiline_text_becomes_paragraphs() {
        let shape = Shape::Text {
            id: 2,
            text: "LINE ONE\nLINE TWO".into(),
            frame: Frame::new(0.7, 1.2, 8.6, 4.2),
            opts: TextOptions::new(72.0, "D4B896").bold().line_spacing(0.85),
        };
        let xml = xml_of(&shape);
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(xml.contains(r#"sz="7200""#));
        assert!(xml.contains(r#" b="1""#));
        assert!(xml.contains(r#"<a:spcPct val="85000"/>"#));
        assert!(xml.contains(r#"<a:off x="640080" y="1097280"/>"#));
    }

    #[test]
    fn transparency_maps_to_alpha() {
        let shape = Shape::Geometry {
            id: 3,
            geometry: Geometry::Rect,
            frame: Frame::new(7.5, 1.5, 2.0, 1.2),
            opts: ShapeOptions {
                fill: Some(Fill::solid("F4F4F1").with_transparency(90)),
                rotate: Some(5.0),
                ..Default::default()
            },
        };
        let xml = xml_of(&shape);
        assert!(xml.contains(r#"<a:alpha val="10000"/>"#));
        assert!(xml.contains(r#"rot="300000""#));
        assert!(xml.contains("<a:ln><a:noFill/></a:ln>"));
    }

    #[test]
    fn round_rect_radius_is_relative_to_shorter_side() {
        let frame = Frame::new(0.0, 0.0, 3.0, 0.5);
        assert_eq!(round_rect_adjust(0.25, &frame), 50_000);
        let frame = Frame::new(0.0, 0.0, 7.74, 1.2);
        assert_eq!(round_rect_adjust(0.1, &frame), 8_333);
        assert_eq!(round_rect_adjust(0.1, &Frame::new(0.0, 0.0, 0.0, 1.0)), 0);
    }

    #[test]
    fn outline_width_in_emu() {
        let shape = Shape::Geometry {
            id: 4,
            geometry: Geometry::RoundRect,
            frame: Frame::new(0.0, 0.0, 2.0, 1.0),
            opts: ShapeOptions {
                fill: None,
                line: Some(Line {
                    color: "F4F4F1".into(),
                    width_pt: 1.0,
                    transparency: 80,
                }),
                rect_radius: Some(0.1),
                rotate: None,
            },
        };
        let xml = xml_of(&shape);
        assert!(xml.contains(r#"<a:ln w="12700">"#));
        assert!(xml.contains(r#"<a:alpha val="20000"/>"#));
        assert!(xml.contains("<a:noFill/>"));
        assert!(xml.contains(r#"prst="roundRect""#));
    }
}
