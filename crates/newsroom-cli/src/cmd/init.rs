use anyhow::Context;
use newsroom_core::config::Config;
use newsroom_core::{io, paths};
use std::path::Path;

use crate::output::print_json;

pub fn run(root: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let publication = match name {
        Some(n) => n.to_string(),
        None => root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "newsroom".to_string()),
    };

    for dir in [paths::NEWSROOM_DIR, paths::ARTICLES_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let created = Config::new(&publication)
        .save_if_missing(root)
        .context("failed to write config.yaml")?;

    if json {
        return print_json(&serde_json::json!({
            "root": root,
            "config_created": created,
        }));
    }

    println!("Initializing newsroom in: {}", root.display());
    if created {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }
    Ok(())
}
