pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;
pub(crate) const TEXT_SCALE: i32 = 2;
pub(crate) const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
pub(crate) const LINE_ADVANCE: i32 = (GLYPH_HEIGHT + 2) * TEXT_SCALE;

const FIRST_GLYPH: u32 = ' ' as u32;
const FALLBACK_CHAR: char = '?';

/// 3x5 bitmap font for printable ASCII. Each entry packs five 3-bit rows, top
/// row in the highest bits.
const GLYPHS: [u16; 95] = [
    0x0000, 0x2482, 0x5a00, 0x5f7d, 0x7ddf, 0x52a5, 0x2aab, 0x2400,
    0x1491, 0x4494, 0x0aa8, 0x05d0, 0x0014, 0x01c0, 0x0002, 0x12a4,
    0x7b6f, 0x2c97, 0x73e7, 0x73cf, 0x5bc9, 0x79cf, 0x79ef, 0x7292,
    0x7bef, 0x7bcf, 0x0410, 0x0414, 0x1511, 0x0e38, 0x4454, 0x72c2,
    0x7be7, 0x2bed, 0x6bae, 0x7927, 0x6b6e, 0x79a7, 0x79a4, 0x796f,
    0x5bed, 0x7497, 0x726f, 0x5bad, 0x4927, 0x5fed, 0x5ffd, 0x7b6f,
    0x6ba4, 0x7b79, 0x6bad, 0x79cf, 0x7492, 0x5b6f, 0x5b6a, 0x5bfd,
    0x5aad, 0x5a92, 0x72a7, 0x6926, 0x4889, 0x324b, 0x2a00, 0x0007,
    0x4400, 0x0e7f, 0x49ae, 0x0f27, 0x13ef, 0x0fa7, 0x39a4, 0x0f79,
    0x49ad, 0x2092, 0x106a, 0x4bad, 0x4927, 0x0ded, 0x0d6d, 0x0f6f,
    0x0d74, 0x0f79, 0x0d64, 0x0f8f, 0x2e93, 0x0b6f, 0x0b6a, 0x0b7a,
    0x0a95, 0x0b79, 0x0e57, 0x3593, 0x2492, 0x64d6, 0x0780,
];

fn glyph_bits(ch: char) -> Option<u16> {
    let code = u32::from(ch);
    if !(FIRST_GLYPH..FIRST_GLYPH + GLYPHS.len() as u32).contains(&code) {
        return None;
    }
    Some(GLYPHS[(code - FIRST_GLYPH) as usize])
}

fn glyph_row(bits: u16, row: i32) -> u16 {
    (bits >> ((GLYPH_HEIGHT - 1 - row) * GLYPH_WIDTH)) & 0b111
}

pub(crate) fn text_width_px(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE
}

/// Draws `text` left-aligned at (x, y); characters outside the font draw as `?`.
pub(crate) fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
) {
    let fallback = glyph_bits(FALLBACK_CHAR).unwrap_or(0);
    for ch in text.chars() {
        let bits = glyph_bits(ch).unwrap_or(fallback);
        draw_glyph_clipped(frame, width, height, x, y, bits, color);
        x += GLYPH_ADVANCE;
    }
}

fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    bits: u16,
    color: [u8; 4],
) {
    if bits == 0 {
        return;
    }
    for row in 0..GLYPH_HEIGHT {
        let row_bits = glyph_row(bits, row);
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            draw_filled_rect(
                frame,
                width,
                height,
                x + col * TEXT_SCALE,
                y + row * TEXT_SCALE,
                TEXT_SCALE,
                TEXT_SCALE,
                color,
            );
        }
    }
}

/// Greedy word wrap on spaces. Words longer than a line are hard-split.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(index, _)| index)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(byte_offset) = y
        .checked_mul(width)
        .and_then(|row| row.checked_add(x))
        .and_then(|pixel| pixel.checked_mul(4))
    else {
        return;
    };
    let Some(pixel) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };
    pixel.copy_from_slice(&color);
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width as usize, px as usize, py as usize, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    let right = x + rect_width - 1;
    let bottom = y + rect_height - 1;
    draw_filled_rect(frame, width, height, x, y, rect_width, 1, color);
    draw_filled_rect(frame, width, height, x, bottom, rect_width, 1, color);
    draw_filled_rect(frame, width, height, x, y, 1, rect_height, color);
    draw_filled_rect(frame, width, height, right, y, 1, rect_height, color);
}
