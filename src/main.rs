//! # stegotext
//!
//! Command-line tool for hiding text in images and getting it back out.
//!
//! ## Usage
//!
//! ```bash
//! # Hide a message (writes photo-stego.png next to the input)
//! stegotext embed -i photo.png -t "meet at noon"
//!
//! # Hide a ciphered message with an explicit output path
//! stegotext embed -i photo.png -t "meet at noon" --cipher xor -k hunter2 -o out.png
//!
//! # Recover it
//! stegotext extract -i out.png --cipher xor -k hunter2
//!
//! # How much will fit?
//! stegotext capacity -i photo.png
//! ```
//!
//! Output is always written as PNG: lossy formats would destroy the
//! embedded bits.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use image::{ImageFormat, RgbaImage};
use log::{info, warn, LevelFilter};

use stegotext::cipher::{self, CipherMethod};
use stegotext::config::StegoConfig;
use stegotext::steganography;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML profile with default cipher settings)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide a text message inside an image
    Embed {
        /// Input image path
        #[arg(short, long)]
        image: PathBuf,

        /// Message to hide
        #[arg(short, long)]
        text: String,

        /// Output path (defaults to <input>-stego.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cipher applied before embedding
        #[arg(long, value_enum)]
        cipher: Option<CipherMethod>,

        /// Cipher key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Recover a hidden message from an image
    Extract {
        /// Input image path
        #[arg(short, long)]
        image: PathBuf,

        /// Cipher the message was embedded with
        #[arg(long, value_enum)]
        cipher: Option<CipherMethod>,

        /// Cipher key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Report how much text an image can carry
    Capacity {
        /// Input image path
        #[arg(short, long)]
        image: PathBuf,
    },
}

fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .init();
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();

    let profile = match &cli.config {
        Some(path) => StegoConfig::from_file(path)?,
        None => StegoConfig::default(),
    };

    match cli.command {
        Command::Embed {
            image,
            text,
            output,
            cipher,
            key,
        } => {
            let (method, key) = resolve_cipher(cipher, key, &profile);
            run_embed(&image, &text, output, method, &key)
        }
        Command::Extract { image, cipher, key } => {
            let (method, key) = resolve_cipher(cipher, key, &profile);
            run_extract(&image, method, &key)
        }
        Command::Capacity { image } => run_capacity(&image),
    }
}

/// Flags win over the profile; the profile wins over the defaults.
fn resolve_cipher(
    method: Option<CipherMethod>,
    key: Option<String>,
    profile: &StegoConfig,
) -> (CipherMethod, String) {
    (
        method.unwrap_or(profile.cipher.method),
        key.unwrap_or_else(|| profile.cipher.key.clone()),
    )
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)?;
    Ok(img.to_rgba8())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}-stego.png", stem))
}

fn run_embed(
    input: &Path,
    text: &str,
    output: Option<PathBuf>,
    method: CipherMethod,
    key: &str,
) -> Result<()> {
    if text.is_empty() {
        return Err(anyhow!("refusing to embed an empty message"));
    }

    let img = load_rgba(input)?;
    let (width, height) = img.dimensions();
    let pixel_count = (width as usize) * (height as usize);
    info!("📷 Loaded {}x{} image ({} pixels)", width, height, pixel_count);

    let ciphered = cipher::apply(method, key, text.as_bytes())?;
    let max_message = steganography::max_message_bytes(pixel_count);
    if ciphered.len() > max_message {
        return Err(anyhow!(
            "text too large for this image: {} bytes after the {} cipher, but at most {} fit",
            ciphered.len(),
            method,
            max_message
        ));
    }

    let pixels = steganography::embed_payload(img.as_raw(), &ciphered)?;

    let out_path = output.unwrap_or_else(|| default_output_path(input));
    let is_png = out_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        warn!(
            "⚠️ Output {} will be written as PNG regardless of its extension",
            out_path.display()
        );
    }

    let stego = RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| anyhow!("pixel buffer does not match image dimensions"))?;
    stego.save_with_format(&out_path, ImageFormat::Png)?;

    info!(
        "✅ Embedded {} message bytes into {}",
        ciphered.len(),
        out_path.display()
    );
    Ok(())
}

fn run_extract(input: &Path, method: CipherMethod, key: &str) -> Result<()> {
    let img = load_rgba(input)?;
    let payload = steganography::extract_payload(img.as_raw())?;
    info!("✅ Recovered a {} byte payload", payload.len());

    // A failed inversion falls back to the raw extracted bytes.
    let plain = match cipher::invert(method, key, &payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("⚠️ Cipher inversion failed ({}); showing the raw payload", e);
            payload
        }
    };

    println!("{}", String::from_utf8_lossy(&plain));
    Ok(())
}

fn run_capacity(input: &Path) -> Result<()> {
    let img = load_rgba(input)?;
    let (width, height) = img.dimensions();
    let pixel_count = (width as usize) * (height as usize);

    println!("{}x{} image, {} pixels", width, height, pixel_count);
    println!(
        "{} framed bytes of capacity, up to {} bytes of message text",
        steganography::capacity_bytes(pixel_count),
        steganography::max_message_bytes(pixel_count)
    );
    Ok(())
}
