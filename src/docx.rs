//! Minimal Word (`.docx`) export of a generated request.
//!
//! The package holds just the parts Word needs to open the file: content
//! types, package relationships, the document body, a style sheet with the
//! `Title` and `Heading1` styles and the core properties. Every zip entry
//! carries the same fixed timestamp so identical inputs give identical
//! bytes.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use tracing::{debug, instrument};
use zip::{write::FileOptions, CompressionMethod, DateTime, ZipWriter};

pub const DOCX_FILE_NAME: &str = "Pedido_Impecable.docx";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const DOCUMENT_TITLE: &str = "Guion de Pedido Impecable";
pub const SCRIPT_HEADING: &str = "Conversación Sugerida:";
pub const ANALYSIS_HEADING: &str = "Análisis Ontológico:";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:lang w:val="es-ES"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="300"/><w:contextualSpacing/></w:pPr><w:rPr><w:color w:val="17365D"/><w:spacing w:val="5"/><w:kern w:val="28"/><w:sz w:val="52"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="365F91"/><w:sz w:val="28"/></w:rPr></w:style></w:styles>"#;

/// Build the `.docx` bytes for a script and its analysis.
#[instrument(level = "trace", skip_all)]
pub fn export_docx(guion: &str, analisis: &str) -> Result<Vec<u8>> {
    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", PACKAGE_RELS_XML.to_string()),
        ("docProps/core.xml", core_properties_xml()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
        ("word/document.xml", document_xml(guion, analisis)),
        ("word/styles.xml", STYLES_XML.to_string()),
    ];

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, xml) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("failed to start {name}"))?;
        zip.write_all(xml.as_bytes())
            .with_context(|| format!("failed to write {name}"))?;
    }
    let bytes = zip.finish().context("failed to finish docx package")?.into_inner();

    debug!(size = bytes.len(), "exported docx");
    Ok(bytes)
}

fn core_properties_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title><dc:language>es</dc:language></cp:coreProperties>"#,
        escape_xml(DOCUMENT_TITLE)
    )
}

fn document_xml(guion: &str, analisis: &str) -> String {
    let mut body = String::new();
    body.push_str(&paragraph(Some("Title"), DOCUMENT_TITLE));
    body.push_str(&paragraph(Some("Heading1"), SCRIPT_HEADING));
    body.push_str(&paragraph(None, guion));
    body.push_str(&paragraph(Some("Heading1"), ANALYSIS_HEADING));
    body.push_str(&paragraph(None, analisis));

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

fn paragraph(style: Option<&str>, text: &str) -> String {
    let mut xml = String::from("<w:p>");
    if let Some(style) = style {
        xml.push_str(&format!(r#"<w:pPr><w:pStyle w:val="{style}"/></w:pPr>"#));
    }
    if !text.is_empty() {
        xml.push_str("<w:r>");
        xml.push_str(&run_content(text));
        xml.push_str("</w:r>");
    }
    xml.push_str("</w:p>");
    xml
}

/// Text, breaks and tabs of a single run. `\n` becomes a line break inside
/// the same paragraph.
fn run_content(text: &str) -> String {
    let mut xml = String::new();
    let mut pending = String::new();
    let flush = |xml: &mut String, pending: &mut String| {
        if !pending.is_empty() {
            xml.push_str(r#"<w:t xml:space="preserve">"#);
            xml.push_str(&escape_xml(pending));
            xml.push_str("</w:t>");
            pending.clear();
        }
    };

    for c in text.chars() {
        match c {
            '\n' => {
                flush(&mut xml, &mut pending);
                xml.push_str("<w:br/>");
            }
            '\t' => {
                flush(&mut xml, &mut pending);
                xml.push_str("<w:tab/>");
            }
            '\r' => {}
            c if is_xml_char(c) => pending.push(c),
            _ => {}
        }
    }
    flush(&mut xml, &mut pending);
    xml
}

fn is_xml_char(c: char) -> bool {
    !matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
