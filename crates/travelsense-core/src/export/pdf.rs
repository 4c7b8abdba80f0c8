//! Minimal PDF 1.4 writer
//!
//! Emits one content stream per page using the standard Helvetica and
//! Helvetica-Bold fonts, so no font data is embedded. Text is encoded as
//! WinAnsi; characters outside it become `?`.

use std::fmt::Write as _;

use super::document::{Document, Font, Page, PAGE_HEIGHT, PAGE_WIDTH};

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Object numbers of the fixed objects
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
/// First object number used by pages; each page takes two (page, content)
const FIRST_PAGE: usize = 5;

pub(crate) fn render(doc: &Document) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let page_ids: Vec<usize> = (0..doc.pages.len())
        .map(|i| FIRST_PAGE + i * 2)
        .collect();

    push_object(
        &mut out,
        &mut offsets,
        CATALOG,
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES).as_bytes(),
    );

    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    push_object(
        &mut out,
        &mut offsets,
        PAGES,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_ids.len()
        )
        .as_bytes(),
    );

    push_object(&mut out, &mut offsets, FONT_REGULAR, font_dict("Helvetica").as_bytes());
    push_object(&mut out, &mut offsets, FONT_BOLD, font_dict("Helvetica-Bold").as_bytes());

    for (page, id) in doc.pages.iter().zip(&page_ids) {
        let content_id = id + 1;
        let page_dict = format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >> >> /Contents {} 0 R >>",
            PAGES,
            PAGE_WIDTH * PT_PER_MM,
            PAGE_HEIGHT * PT_PER_MM,
            FONT_REGULAR,
            FONT_BOLD,
            content_id
        );
        push_object(&mut out, &mut offsets, *id, page_dict.as_bytes());

        let stream = content_stream(page);
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(&stream);
        body.extend_from_slice(b"\nendstream");
        push_object(&mut out, &mut offsets, content_id, &body);
    }

    let xref_start = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        offsets.len() + 1,
        CATALOG,
        xref_start
    );
    out.extend_from_slice(xref.as_bytes());

    out
}

fn font_dict(base: &str) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        base
    )
}

/// Objects are written in increasing id order, so the offset table index is id - 1
fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize, body: &[u8]) {
    debug_assert_eq!(offsets.len() + 1, id);
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

fn content_stream(page: &Page) -> Vec<u8> {
    let mut stream = Vec::new();
    for line in &page.lines {
        let font = match line.font {
            Font::Regular => "F1",
            Font::Bold => "F2",
        };
        let x = line.x * PT_PER_MM;
        let y = (PAGE_HEIGHT - line.y) * PT_PER_MM;
        let gray = f32::from(line.gray) / 255.0;

        stream.extend_from_slice(
            format!(
                "BT /{} {:.1} Tf {:.3} g {:.2} {:.2} Td (",
                font, line.size, gray, x, y
            )
            .as_bytes(),
        );
        stream.extend_from_slice(&encode_text(&line.text));
        stream.extend_from_slice(b") Tj ET\n");
    }
    stream
}

/// Encode a string as an escaped WinAnsi PDF literal body
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\t' => b' ',
            _ => b'?',
        };
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            0x80..=0xff => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
            _ => out.push(byte),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::document::Layout;

    fn sample(pages: usize) -> Document {
        let mut layout = Layout::new();
        for i in 0..pages {
            if i > 0 {
                layout.new_page();
            }
            layout.text(&format!("Page {}", i + 1), 12.0, Font::Bold);
        }
        layout.finish()
    }

    #[test]
    fn test_pdf_structure() {
        let bytes = render(&sample(2));
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("(Page 2) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render(&sample(1));

        let xref = bytes.windows(5).position(|w| w == b"xref\n").unwrap();
        let table = String::from_utf8_lossy(&bytes[xref..]).to_string();
        let entries: Vec<usize> = table
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            assert!(bytes[*offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
    }

    #[test]
    fn test_encode_text_escapes() {
        assert_eq!(encode_text("a (b) \\c"), b"a \\(b\\) \\\\c".to_vec());
        assert_eq!(encode_text("café"), b"caf\\351".to_vec());
        assert_eq!(encode_text("東京"), b"??".to_vec());
    }

    #[test]
    fn test_coordinates_flip_to_bottom_left() {
        let bytes = render(&sample(1));
        let text = String::from_utf8_lossy(&bytes);
        // x = 20mm, y = 297mm - 20mm
        let expected = format!(
            "{:.2} {:.2} Td",
            20.0 * PT_PER_MM,
            (PAGE_HEIGHT - 20.0) * PT_PER_MM
        );
        assert!(text.contains(&expected));
    }
}
