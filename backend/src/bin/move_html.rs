//! Copy the frontend `index.html` into the static-serving directory.
//!
//! Usage: `move-html [source] [public_dir]` (defaults: `index.html`, `public`).

use anyhow::Context;
use std::path::Path;

/// Returns false when the source file does not exist.
fn publish_html(source: &Path, public_dir: &Path) -> anyhow::Result<bool> {
    if !public_dir.exists() {
        std::fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {}", public_dir.display()))?;
        println!("Created {} directory", public_dir.display());
    }

    if !source.exists() {
        return Ok(false);
    }

    let file_name = source.file_name().unwrap_or_else(|| "index.html".as_ref());
    let dest = public_dir.join(file_name);
    std::fs::copy(source, &dest)
        .with_context(|| format!("Failed to copy {} to {}", source.display(), dest.display()))?;

    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "index.html".to_string());
    let public_dir = args.next().unwrap_or_else(|| "public".to_string());

    if publish_html(Path::new(&source), Path::new(&public_dir))? {
        println!("Moved {} to {}/", source, public_dir);
    } else {
        eprintln!("Warning: {} not found", source);
    }

    println!();
    println!("Ready to deploy!");

    Ok(())
}
