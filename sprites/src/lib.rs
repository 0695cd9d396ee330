//! Lossless re-encoding of PNG sprite sheets.
//!
//! Images are decoded without any transformation so the color type, bit
//! depth, palette, transparency and color space chunks survive unchanged,
//! then written back with the strongest deflate level and adaptive row
//! filtering.

use png::{AdaptiveFilterType, Compression, Decoder, Encoder, Transformations};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error("failed to decode {}: {source}", path.display())]
    Decode { path: PathBuf, source: png::DecodingError },

    #[error("failed to encode {}: {source}", path.display())]
    Encode { path: PathBuf, source: png::EncodingError },

    #[error("{} is an animated PNG, only still images can be re-encoded", path.display())]
    Animated { path: PathBuf },
}

/// Before/after sizes of one optimized image.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizeReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub original_bytes: u64,
    pub optimized_bytes: u64,
}

impl OptimizeReport {
    /// Negative when the re-encoded file came out larger.
    pub fn saved_bytes(&self) -> i64 {
        self.original_bytes as i64 - self.optimized_bytes as i64
    }

    pub fn saved_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.saved_bytes() as f64 / self.original_bytes as f64 * 100.0
        }
    }
}

impl fmt::Display for OptimizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Original: {:.2}MB", self.original_bytes as f64 / MB)?;
        writeln!(f, "  Optimized: {:.2}MB", self.optimized_bytes as f64 / MB)?;
        write!(
            f,
            "  Saved: {:.2}MB ({:.1}%)",
            self.saved_bytes() as f64 / MB,
            self.saved_percent()
        )
    }
}

/// Re-encode the PNG at `input` into `output`. Both may be the same path.
pub fn optimize_png(input: &Path, output: &Path) -> Result<OptimizeReport, SpriteError> {
    let original = std::fs::read(input).map_err(|source| SpriteError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let encoded = reencode(&original, input)?;

    std::fs::write(output, &encoded).map_err(|source| SpriteError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    log::debug!(
        "{} -> {}: {} -> {} bytes",
        input.display(),
        output.display(),
        original.len(),
        encoded.len()
    );

    Ok(OptimizeReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        original_bytes: original.len() as u64,
        optimized_bytes: encoded.len() as u64,
    })
}

/// Decode `data` and encode it again with maximum compression.
pub fn reencode(data: &[u8], path: &Path) -> Result<Vec<u8>, SpriteError> {
    let decode_err = |source| SpriteError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let encode_err = |source| SpriteError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let mut decoder = Decoder::new(Cursor::new(data));
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(decode_err)?;

    if reader.info().animation_control.is_some() {
        return Err(SpriteError::Animated { path: path.to_path_buf() });
    }

    let mut pixels = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut pixels).map_err(decode_err)?;
    pixels.truncate(frame.buffer_size());

    // Carry the decoded header over so palette, tRNS, color space chunks
    // (iCCP, sRGB, gAMA, cHRM), pHYs and text survive the re-encode.
    let mut info = reader.info().clone();
    info.interlaced = false;
    info.animation_control = None;
    info.frame_control = None;

    log::debug!(
        "{}: {}x{} {:?} {:?}, icc {}, srgb {:?}, gamma {:?}",
        path.display(),
        frame.width,
        frame.height,
        frame.color_type,
        frame.bit_depth,
        info.icc_profile.is_some(),
        info.srgb,
        info.source_gamma
    );

    let mut out = Vec::new();
    {
        let mut encoder = Encoder::with_info(&mut out, info).map_err(encode_err)?;
        encoder.set_compression(Compression::Best);
        encoder.set_adaptive_filter(AdaptiveFilterType::Adaptive);

        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(&pixels).map_err(encode_err)?;
        writer.finish().map_err(encode_err)?;
    }

    Ok(out)
}
