//! Build script for the web crate.
//!
//! Fingerprints `static/css/main.css` and publishes the fingerprint as
//! `CSS_HASH`. A copy named `main.{CSS_HASH}.css` is written next to it under
//! `derived/`, which the base template links to.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters kept from the SHA-256 digest.
const FINGERPRINT_LEN: usize = 8;

fn main() -> Result<(), Box<dyn Error>> {
    let static_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?).join("static/css");
    let stylesheet = static_dir.join("main.css");
    println!("cargo:rerun-if-changed={}", stylesheet.display());

    let Ok(css) = fs::read(&stylesheet) else {
        // Templates still compile, the stylesheet link just 404s
        println!("cargo:warning=Stylesheet missing at {}", stylesheet.display());
        println!("cargo:rustc-env=CSS_HASH=");
        return Ok(());
    };

    let fingerprint = fingerprint(&css);
    println!("cargo:rustc-env=CSS_HASH={fingerprint}");
    publish(&stylesheet, &static_dir.join("derived"), &fingerprint)?;
    Ok(())
}

fn fingerprint(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    digest
        .iter()
        .flat_map(|byte| [byte >> 4, byte & 0x0f])
        .take(FINGERPRINT_LEN)
        .map(|nibble| char::from_digit(u32::from(nibble), 16).unwrap_or('0'))
        .collect()
}

fn publish(stylesheet: &Path, derived_dir: &Path, fingerprint: &str) -> std::io::Result<()> {
    fs::create_dir_all(derived_dir)?;
    fs::copy(stylesheet, derived_dir.join(format!("main.{fingerprint}.css")))?;
    Ok(())
}
