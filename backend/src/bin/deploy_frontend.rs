//! Point the static frontend's `config.js` at the deployed backend.
//!
//! Usage: `deploy-frontend [public_dir]` with `BACKEND_URL` in the environment.

use anyhow::Context;
use std::path::Path;

const DEFAULT_BACKEND_URL: &str = "https://chinese-tutor-backend.onrender.com";

fn rewrite_backend_url(content: &str, backend_url: &str) -> String {
    content.replace(
        &format!("BACKEND_URL = '{}'", DEFAULT_BACKEND_URL),
        &format!("BACKEND_URL = '{}'", backend_url),
    )
}

/// Returns false when there is no `config.js` to update.
fn update_config(public_dir: &Path, backend_url: &str) -> anyhow::Result<bool> {
    let config_path = public_dir.join("config.js");
    if !config_path.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    std::fs::write(&config_path, rewrite_backend_url(&content, backend_url))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(true)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let public_dir = std::env::args().nth(1).unwrap_or_else(|| "public".to_string());
    let backend_url =
        std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());

    if update_config(Path::new(&public_dir), &backend_url)? {
        println!("Updated config.js with backend URL: {}", backend_url);
    } else {
        eprintln!("Warning: config.js not found in {} directory", public_dir);
    }

    println!();
    println!("Frontend ready for deployment!");
    println!("Backend URL: {}", backend_url);
    println!();
    println!("Next steps:");
    println!("1. Commit and push your changes");
    println!("2. Deploy the static site");
    println!("3. Set BACKEND_URL for the frontend build");

    Ok(())
}
