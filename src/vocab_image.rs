//! Renders the vocabulary stage of a lesson as a PNG card.

use ab_glyph::{FontVec, PxScale};
use anyhow::{anyhow, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::io::Cursor;

use crate::store::VocabItem;

const WIDTH: u32 = 1600;
const PADDING: i32 = 20;
const LINE_HEIGHT: i32 = 36;

/// Candidate font files, most specific first. The renderer is tolerant of
/// missing files and takes the first one that loads.
const FONT_PATHS: &[&str] = &[
    "./assets/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn load_font() -> Result<FontVec> {
    for path in FONT_PATHS {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return Ok(font);
            }
        }
    }
    Err(anyhow!("no usable font found for vocabulary rendering"))
}

/// Lay out the card as text lines: a title, a gap, then numbered
/// term/definition/example blocks separated by blank lines.
pub fn layout_lines(title: &str, vocab: &[VocabItem]) -> Vec<String> {
    let mut lines = vec![format!("Vocabulary: {}", title), String::new()];
    for (i, item) in vocab.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, item.term));
        lines.push(format!("   - {}", item.definition));
        if !item.example.is_empty() {
            lines.push(format!("   - e.g. {}", item.example));
        }
        lines.push(String::new());
    }
    lines
}

/// Render the vocabulary list into PNG bytes. Fails when no font is
/// available; callers treat that as a skippable condition.
pub fn render_vocab_card(title: &str, vocab: &[VocabItem]) -> Result<Vec<u8>> {
    let font = load_font()?;
    let lines = layout_lines(title, vocab);

    let height = (PADDING * 2 + LINE_HEIGHT * lines.len() as i32) as u32;
    let mut canvas = RgbImage::from_pixel(WIDTH, height.max(LINE_HEIGHT as u32), Rgb([244, 247, 252]));

    let mut y = PADDING;
    draw_text_mut(
        &mut canvas,
        Rgb([20, 20, 20]),
        PADDING,
        y,
        PxScale::from(34.0),
        &font,
        &lines[0],
    );
    y += LINE_HEIGHT * 2;

    for line in &lines[2..] {
        if !line.is_empty() {
            draw_text_mut(
                &mut canvas,
                Rgb([30, 30, 30]),
                PADDING,
                y,
                PxScale::from(26.0),
                &font,
                line,
            );
        }
        y += LINE_HEIGHT;
    }

    let mut buffer = Cursor::new(Vec::new());
    canvas.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(term: &str, definition: &str, example: &str) -> VocabItem {
        VocabItem {
            term: term.to_string(),
            definition: definition.to_string(),
            example: example.to_string(),
        }
    }

    #[test]
    fn layout_numbers_terms_and_keeps_examples() {
        let lines = layout_lines(
            "Mining",
            &[item("ore", "rock with metal", "iron ore"), item("vein", "ore seam", "")],
        );
        assert_eq!(lines[0], "Vocabulary: Mining");
        assert!(lines.contains(&"1. ore".to_string()));
        assert!(lines.contains(&"   - e.g. iron ore".to_string()));
        assert!(lines.contains(&"2. vein".to_string()));
        // item without an example gets no e.g. line
        assert_eq!(lines.iter().filter(|l| l.contains("e.g.")).count(), 1);
    }

    #[test]
    fn layout_of_empty_vocab_is_just_the_title() {
        let lines = layout_lines("Empty", &[]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn render_produces_png_bytes() {
        match render_vocab_card("Mining", &[item("ore", "rock with metal", "iron ore")]) {
            Ok(bytes) => assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n"),
            Err(_) => eprintln!("Skipping render test: no usable font on this host"),
        }
    }
}
