//! Binary PPM (P6) export of the simulated panel

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use w601_board::{Framebuffer, LCD_HEIGHT, LCD_WIDTH};

/// Write the frame as P6: text header, then one RGB triple per pixel
pub fn write<W: Write>(fb: &Framebuffer, out: &mut W) -> std::io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", LCD_WIDTH, LCD_HEIGHT)?;
    for (r, g, b) in fb.to_rgb888() {
        out.write_all(&[r, g, b])?;
    }
    out.flush()
}

pub fn save(fb: &Framebuffer, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write(fb, &mut BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))
}
