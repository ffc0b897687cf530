// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the drawing canvas.
// 2) Thick (user) and thin (template) strokes rasterized into a pixel buffer.
// 3) A tiny 5x7 bitmap font to render HUD text and chart labels.

use crate::error::Error;
use crate::types::{FrameBuffer, Point, StrokeStyle};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Anything strokes can be drawn onto.
pub trait Surface {
    /// Wipe everything drawn so far.
    fn clear_surface(&mut self);
    /// Start a new stroke at `origin`.
    fn begin_path(&mut self, origin: Point, style: StrokeStyle);
    /// Extend the current stroke with one straight segment.
    fn draw_segment(&mut self, from: Point, to: Point, style: StrokeStyle);
}

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the canvas.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer position in canvas pixels; None while the pointer is outside the window.
    pub fn mouse_pos(&self) -> Option<Point> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Point::new(x as f64, y as f64))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    pub fn freehand_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::F, KeyRepeat::No) }
    pub fn follow_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::G, KeyRepeat::No) }
    pub fn clear_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::C, KeyRepeat::No) }
    pub fn export_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::E, KeyRepeat::No) }
    pub fn plots_pressed_once(&self) -> bool { self.window.is_key_pressed(Key::P, KeyRepeat::No) }
}

/// Pixel canvas the recorder and the template draw onto.
/// Visual: this is the white page you see; strokes accumulate until cleared.
pub struct Canvas {
    frame: FrameBuffer,
    background: u32,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Self { frame: FrameBuffer::new(width, height, background), background }
    }

    pub fn frame(&self) -> &FrameBuffer { &self.frame }
}

impl Surface for Canvas {
    fn clear_surface(&mut self) {
        self.frame.fill(self.background);
    }

    fn begin_path(&mut self, origin: Point, style: StrokeStyle) {
        // Visual: a dot marks where the stroke starts, even if the pointer never moves.
        let (x, y) = (origin.x.round() as i32, origin.y.round() as i32);
        draw_thick_line(&mut self.frame, x, y, x, y, stroke_px(style.width), style.color);
    }

    fn draw_segment(&mut self, from: Point, to: Point, style: StrokeStyle) {
        draw_thick_line(
            &mut self.frame,
            from.x.round() as i32,
            from.y.round() as i32,
            to.x.round() as i32,
            to.y.round() as i32,
            stroke_px(style.width),
            style.color,
        );
    }
}

#[inline]
fn stroke_px(width: f32) -> i32 {
    (width.round() as i32).max(1)
}

/* ---------- Software drawing: pixels, lines, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Stamp a `size x size` square whose top-left sits `(size-1)/2` up-left of (x,y).
#[inline]
fn put_brush(fb: &mut FrameBuffer, x: i32, y: i32, size: i32, color: u32) {
    let lo = -((size - 1) / 2);
    let hi = size / 2;
    for dy in lo..=hi {
        for dx in lo..=hi {
            put_pixel(fb, x + dx, y + dy, color);
        }
    }
}

/// Walk the Bresenham pixels from (x0,y0) to (x1,y1), both ends included.
fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a straight line `size` pixels thick.
/// Visual: 1 = hairline (template), 2 = the user's pen.
pub fn draw_thick_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, size: i32, color: u32) {
    bresenham(x0, y0, x1, y1, |x, y| put_brush(fb, x, y, size, color));
}

/* ---------- 5x7 bitmap font (uppercase subset for the HUD + chart labels) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
pub fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y).
/// Visual: a tiny glyph in `color`; with `shadow` it gets a 1-pixel black drop shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, shadow: Option<u32>) {
    let Some(rows) = glyph5x7(ch) else { return; };
    let passes = shadow.map(|c| (1, c)).into_iter().chain(std::iter::once((0, color)));
    for (offset, ink) in passes {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, ink);
                }
            }
        }
    }
}

/// Draw `text` with 5x7 glyphs (6 px advance) and a drop shadow so it stays readable
/// over strokes. Unknown characters leave a gap.
pub fn draw_hud_text(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, Some(0x00_00_00_00));
        x += 6;
    }
}
