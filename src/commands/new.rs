//! Create a new temp page

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create `<slug>.<extension>` in the content directory
pub fn create_page(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() || slug.contains(['/', '\\']) {
        anyhow::bail!("Invalid slug: {:?}", slug);
    }

    fs::create_dir_all(&folio.content_dir)?;
    let file_path = folio
        .content_dir
        .join(format!("{}{}", slug, folio.config.temp.suffix()));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\ndate: {}\n---\n\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_create_page_slugifies_title() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let path = create_page(&folio, "Hello World: Part 2", None).unwrap();
        assert_eq!(path, dir.path().join("content/temp/hello-world-part-2.mdx"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World: Part 2"));
        assert!(fm.parse_date().is_some());
    }

    #[test]
    fn test_create_page_with_explicit_slug() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let path = create_page(&folio, "Anything", Some("scratch")).unwrap();
        assert!(path.ends_with("scratch.mdx"));
    }

    #[test]
    fn test_create_page_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        create_page(&folio, "Notes", None).unwrap();
        assert!(create_page(&folio, "Notes", None).is_err());
    }

    #[test]
    fn test_create_page_rejects_path_slug() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(create_page(&folio, "x", Some("../escape")).is_err());
    }
}
