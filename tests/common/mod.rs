//! In-memory documents for tests.
//!
//! Shared by the integration tests and, through a `#[path]` module, by the
//! library's unit tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build a zip archive holding the given entries
pub fn zip_with_entries(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Build a zip holding one stored entry whose zip64 header declares
/// `declared_size` uncompressed bytes instead of the real length
pub fn zip_with_forged_size(name: &str, data: &[u8], declared_size: u64) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    writer.start_file(name, options).unwrap();
    writer.write_all(data).unwrap();
    let mut bytes = writer.finish().unwrap().into_inner();

    // Zip64 extra field: id 0x0001, data size, uncompressed size, compressed size
    let real = (data.len() as u64).to_le_bytes();
    let mut patched = 0;
    for i in 0..bytes.len().saturating_sub(20) {
        let size = u16::from_le_bytes([bytes[i + 2], bytes[i + 3]]);
        if bytes[i..i + 2] == [0x01, 0x00]
            && size >= 16
            && bytes[i + 4..i + 12] == real
            && bytes[i + 12..i + 20] == real
        {
            bytes[i + 4..i + 12].copy_from_slice(&declared_size.to_le_bytes());
            patched += 1;
        }
    }
    assert!(patched > 0, "no zip64 size field found");
    bytes
}

/// Truncated and byte-flipped variants of a buffer
pub fn mutations(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut variants = Vec::with_capacity(bytes.len() * 2);
    for i in 0..bytes.len() {
        variants.push(bytes[..i].to_vec());
        let mut flipped = bytes.to_vec();
        flipped[i] ^= 0xFF;
        variants.push(flipped);
    }
    variants
}

/// Wrap WordprocessingML body markup into a minimal .docx container
pub fn docx_with_body(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );
    zip_with_entries(&[
        ("[Content_Types].xml", b"<Types/>".as_slice()),
        ("word/document.xml", document.as_bytes()),
    ])
}

/// A WordprocessingML paragraph, optionally styled
pub fn docx_paragraph(style: Option<&str>, text: &str) -> String {
    let properties = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, s))
        .unwrap_or_default();
    format!(r#"<w:p>{}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, properties, text)
}

/// Build a PDF with one text line per page
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut document = build_pdf(pages);
    let mut output = Vec::new();
    document.save_to(&mut output).unwrap();
    output
}

/// Build a PDF whose information dictionary carries a title
pub fn pdf_with_title(pages: &[&str], title: &str) -> Vec<u8> {
    let mut document = build_pdf(pages);
    let info_id = document.add_object(dictionary! {
        "Title" => Object::string_literal(title),
    });
    document.trailer.set("Info", info_id);
    let mut output = Vec::new();
    document.save_to(&mut output).unwrap();
    output
}

fn build_pdf(pages: &[&str]) -> Document {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            document.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);
    document
}
