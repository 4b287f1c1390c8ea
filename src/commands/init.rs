//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Default configuration written by `init`
const DEFAULT_CONFIG: &str = r#"# Site
title: Portfolio
description: ''
author: John Doe
language: en

# Directory
public_dir: public
static_dir: static

# Temp pages
temp:
  dir: content/temp
  extension: mdx
  route: /t
  not_found: /404
  fallback_delay_ms: 50
  empty_message: No temp pages yet.

# Code highlighting
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

# Elements available inside temp pages
components:
  Callout:
    tag: div
    class: callout
  Note:
    tag: aside
    class: note
  Figure:
    tag: figure
    class: figure
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("content/temp"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::debug!("Created: {:?}", config_path);
    }

    let gitignore_path = target_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, "public/\n")?;
    }

    Ok(())
}
