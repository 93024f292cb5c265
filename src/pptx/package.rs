//! OOXML packaging: turn a [`Presentation`] into `.pptx` zip bytes.
//!
//! Part layout:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml, docProps/app.xml
//! ppt/presentation.xml (+ _rels)
//! ppt/slideMasters/slideMaster1.xml (+ _rels)
//! ppt/slideLayouts/slideLayout1.xml (+ _rels)   blank layout
//! ppt/theme/theme1.xml
//! ppt/slides/slideN.xml (+ _rels)
//! ppt/media/imageN.png                            one per distinct background
//! ```
//!
//! Relationship ids in `presentation.xml.rels`: `rId1` master, `rId2..` slides
//! in order, then the theme.

use super::shape::escape_xml;
use super::{Presentation, Slide};
use crate::design::emu;
use crate::error::CarouselError;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Serialise `pres` into an in-memory `.pptx`.
pub fn write_package(pres: &Presentation) -> Result<Vec<u8>, CarouselError> {
    let media = collect_media(pres.slides());
    let slide_media: Vec<Option<usize>> = pres
        .slides()
        .iter()
        .map(|s| s.background().and_then(|bg| media_index(&media, bg)))
        .collect();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let content_types = content_types_xml(pres.slide_count(), !media.is_empty());
    add_part(&mut zip, "[Content_Types].xml", &content_types)?;
    add_part(&mut zip, "_rels/.rels", &root_rels_xml())?;
    add_part(&mut zip, "docProps/core.xml", &core_props_xml(pres))?;
    add_part(&mut zip, "docProps/app.xml", &app_props_xml(pres.slide_count()))?;
    add_part(&mut zip, "ppt/presentation.xml", &presentation_xml(pres))?;
    add_part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        &presentation_rels_xml(pres.slide_count()),
    )?;
    add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
    add_part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &rels_xml(&[
            ("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            ("rId2", REL_THEME, "../theme/theme1.xml"),
        ]),
    )?;
    add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml())?;
    add_part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &rels_xml(&[("rId1", REL_MASTER, "../slideMasters/slideMaster1.xml")]),
    )?;
    add_part(&mut zip, "ppt/theme/theme1.xml", THEME_XML)?;

    for (i, (slide, media_idx)) in pres.slides().iter().zip(&slide_media).enumerate() {
        let n = i + 1;
        add_part(&mut zip, &format!("ppt/slides/slide{n}.xml"), &slide_xml(slide, media_idx.is_some()))?;

        let image_target = media_idx.map(|m| format!("../media/image{}.png", m + 1));
        let mut rels = vec![("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml")];
        if let Some(target) = image_target.as_deref() {
            rels.push(("rId2", REL_IMAGE, target));
        }
        add_part(&mut zip, &format!("ppt/slides/_rels/slide{n}.xml.rels"), &rels_xml(&rels))?;
    }

    for (i, png) in media.iter().enumerate() {
        let name = format!("ppt/media/image{}.png", i + 1);
        // PNG is already deflated; store it as-is.
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip.start_file(name.as_str(), options)?;
        zip.write_all(png)
            .map_err(|e| CarouselError::Package(format!("{name}: {e}")))?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(
        "Packaged PPTX: {} slides, {} media parts, {} bytes",
        pres.slide_count(),
        media.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn add_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    content: &str,
) -> Result<(), CarouselError> {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(name, options)?;
    zip.write_all(content.as_bytes())
        .map_err(|e| CarouselError::Package(format!("{name}: {e}")))
}

/// Distinct background images in first-use order, compared by identity.
fn collect_media(slides: &[Slide]) -> Vec<Arc<[u8]>> {
    let mut media: Vec<Arc<[u8]>> = Vec::new();
    for bg in slides.iter().filter_map(Slide::background) {
        if media_index(&media, bg).is_none() {
            media.push(Arc::clone(bg));
        }
    }
    media
}

fn media_index(media: &[Arc<[u8]>], bg: &Arc<[u8]>) -> Option<usize> {
    media.iter().position(|m| Arc::ptr_eq(m, bg))
}

// ── Package-level parts ──────────────────────────────────────────────────

fn content_types_xml(slide_count: usize, has_png: bool) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    if has_png {
        xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
    }
    let overrides = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", CT_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/docProps/core.xml", CT_CORE),
        ("/docProps/app.xml", CT_APP),
    ];
    for (part, ct) in overrides {
        xml.push_str(&format!(r#"<Override PartName="{part}" ContentType="{ct}"/>"#));
    }
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_SLIDE}"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn rels_xml(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_PKG_RELS}">"#));
    for (id, rel_type, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn root_rels_xml() -> String {
    rels_xml(&[
        ("rId1", REL_OFFICE_DOC, "ppt/presentation.xml"),
        ("rId2", REL_CORE, "docProps/core.xml"),
        ("rId3", REL_APP, "docProps/app.xml"),
    ])
}

fn core_props_xml(pres: &Presentation) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    );
    if let Some(title) = pres.title() {
        xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    }
    if let Some(author) = pres.author() {
        let author = escape_xml(author);
        xml.push_str(&format!("<dc:creator>{author}</dc:creator>"));
        xml.push_str(&format!("<cp:lastModifiedBy>{author}</cp:lastModifiedBy>"));
    }
    xml.push_str("<cp:revision>1</cp:revision>");
    xml.push_str("</cp:coreProperties>");
    xml
}

fn app_props_xml(slide_count: usize) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    xml.push_str(&format!(
        "<Application>{} {}</Application>",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    xml.push_str(&format!("<Slides>{slide_count}</Slides>"));
    xml.push_str("</Properties>");
    xml
}

// ── Presentation parts ───────────────────────────────────────────────────

fn presentation_xml(pres: &Presentation) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1">"#
    ));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if pres.slide_count() > 0 {
        xml.push_str("<p:sldIdLst>");
        for i in 0..pres.slide_count() {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + i,
                i + 2
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/>"#,
        emu(pres.width()),
        emu(pres.height())
    ));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let targets: Vec<(String, &str, String)> = std::iter::once((
        "rId1".to_string(),
        REL_MASTER,
        "slideMasters/slideMaster1.xml".to_string(),
    ))
    .chain((1..=slide_count).map(|n| (format!("rId{}", n + 1), REL_SLIDE, format!("slides/slide{n}.xml"))))
    .chain(std::iter::once((
        format!("rId{}", slide_count + 2),
        REL_THEME,
        "theme/theme1.xml".to_string(),
    )))
    .collect();
    let rels: Vec<(&str, &str, &str)> = targets
        .iter()
        .map(|(id, t, target)| (id.as_str(), *t, target.as_str()))
        .collect();
    rels_xml(&rels)
}

const EMPTY_SP_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn slide_master_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(r#"<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#));
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    xml.push_str(EMPTY_SP_TREE);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#);
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("<p:txStyles>");
    xml.push_str(r#"<p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle>"#);
    xml.push_str(r#"<p:bodyStyle><a:lvl1pPr><a:defRPr sz="2000"/></a:lvl1pPr></p:bodyStyle>"#);
    xml.push_str(r#"<p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle>"#);
    xml.push_str("</p:txStyles></p:sldMaster>");
    xml
}

fn slide_layout_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(
        r#"<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1">"#
    ));
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(EMPTY_SP_TREE);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    xml
}

fn slide_xml(slide: &Slide, has_background: bool) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#));
    xml.push_str("<p:cSld>");
    if has_background {
        xml.push_str(r#"<p:bg><p:bgPr><a:blipFill dpi="0" rotWithShape="1"><a:blip r:embed="rId2"/><a:srcRect/><a:stretch><a:fillRect/></a:stretch></a:blipFill><a:effectLst/></p:bgPr></p:bg>"#);
    }
    xml.push_str("<p:spTree>");
    xml.push_str(EMPTY_SP_TREE);
    for shape in slide.shapes() {
        shape.write_xml(&mut xml);
    }
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Carousel">"#,
    r#"<a:themeElements>"#,
    r#"<a:clrScheme name="Carousel">"#,
    r#"<a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="3B0510"/></a:dk2><a:lt2><a:srgbClr val="F4F4F1"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="5A1025"/></a:accent1><a:accent2><a:srgbClr val="D4B896"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="A0674B"/></a:accent3><a:accent4><a:srgbClr val="E1DBD7"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="7A2040"/></a:accent5><a:accent6><a:srgbClr val="1A0308"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="D4B896"/></a:hlink><a:folHlink><a:srgbClr val="A0674B"/></a:folHlink>"#,
    r#"</a:clrScheme>"#,
    r#"<a:fontScheme name="Carousel">"#,
    r#"<a:majorFont><a:latin typeface="Georgia"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Georgia"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    r#"</a:fontScheme>"#,
    r#"<a:fmtScheme name="Carousel">"#,
    r#"<a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst>"#,
    r#"<a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst>"#,
    r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#,
    r#"<a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst>"#,
    r#"</a:fmtScheme>"#,
    r#"</a:themeElements>"#,
    r#"</a:theme>"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::{Canvas, Frame, TextOptions};
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn shared_background_is_stored_once() {
        let png: Arc<[u8]> = Arc::from(vec![0x89u8, b'P', b'N', b'G'].into_boxed_slice());
        let mut pres = Presentation::new(10.0, 12.5);
        for _ in 0..3 {
            pres.add_slide().set_background(Arc::clone(&png));
        }
        let bytes = write_package(&pres).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let media: Vec<&str> = archive
            .file_names()
            .filter(|n| n.starts_with("ppt/media/"))
            .collect();
        assert_eq!(media, vec!["ppt/media/image1.png"]);

        let rels = read_part(&bytes, "ppt/slides/_rels/slide3.xml.rels");
        assert!(rels.contains("../media/image1.png"));
    }

    #[test]
    fn presentation_declares_custom_size_and_slides() {
        let mut pres = Presentation::new(10.0, 12.5);
        pres.add_slide()
            .add_text("Hi", Frame::new(0.0, 0.0, 1.0, 1.0), TextOptions::new(12.0, "000000"));
        pres.add_slide();
        let bytes = write_package(&pres).unwrap();

        let xml = read_part(&bytes, "ppt/presentation.xml");
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="11430000"/>"#));
        assert_eq!(xml.matches("<p:sldId ").count(), 2);

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme""#));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide2.xml"));
        assert!(!types.contains("Extension=\"png\""));
    }

    #[test]
    fn core_properties_carry_title_and_author() {
        let mut pres = Presentation::new(10.0, 12.5);
        pres.set_title("Loops & Gaps");
        pres.set_author("Sneha");
        let bytes = write_package(&pres).unwrap();
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Loops &amp; Gaps</dc:title>"));
        assert!(core.contains("<dc:creator>Sneha</dc:creator>"));
    }
}
