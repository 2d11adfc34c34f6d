use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use image::{ImageOutputFormat, RgbaImage};
use std::io::Cursor;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let image = RgbaImage::from_raw(width, height, rgba.to_vec())
        .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height} surface"))?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .context("encode surface as png")?;
    Ok(bytes)
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", general_purpose::STANDARD.encode(png))
}

pub fn encode_png_data_uri(width: u32, height: u32, rgba: &[u8]) -> Result<String> {
    Ok(png_data_uri(&encode_png(width, height, rgba)?))
}
