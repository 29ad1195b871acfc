//! Page assembly: turns the content tree into HTML files on disk.
//!
//! Everything here is I/O around the conversion core. A content error in
//! any page aborts the build before that page is written.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::config::Config;
use crate::error::{MarkdownError, SiteError};
use crate::markdown_to_html;
use crate::parser::extract_title;

pub const TITLE_PLACEHOLDER: &str = "{{ Title }}";
pub const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

/// Counts reported after a full build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub files_copied: usize,
    pub pages_generated: usize,
}

/// Copy static assets, then render every Markdown page.
pub fn build(config: &Config) -> Result<BuildSummary, SiteError> {
    let paths = &config.paths;

    let files_copied = copy_directory(&paths.static_dir, &paths.output)?;
    info!("Copied {files_copied} static files");

    let pages_generated = generate_pages_recursive(
        &paths.content,
        &paths.template,
        &paths.output,
        &config.site.base_path,
    )?;
    info!("Generated {pages_generated} pages");

    Ok(BuildSummary {
        files_copied,
        pages_generated,
    })
}

/// Fill the template with the page title and converted content.
pub fn render_page(
    markdown: &str,
    template: &str,
    base_path: &str,
) -> Result<String, MarkdownError> {
    let content = markdown_to_html(markdown)?;
    let title = extract_title(markdown)?;

    let page = template
        .replace(TITLE_PLACEHOLDER, &title)
        .replace(CONTENT_PLACEHOLDER, &content);
    Ok(rewrite_base_path(&page, base_path))
}

/// Point root-relative `href` and `src` attributes at `base_path`.
pub fn rewrite_base_path(html: &str, base_path: &str) -> String {
    html.replace("href=\"/", &format!("href=\"{base_path}"))
        .replace("src=\"/", &format!("src=\"{base_path}"))
}

pub fn generate_page(
    from: &Path,
    template_path: &Path,
    dest: &Path,
    base_path: &str,
) -> Result<(), SiteError> {
    info!(
        "Generating page from {} to {} using {}",
        from.display(),
        dest.display(),
        template_path.display()
    );

    let markdown = fs::read_to_string(from).map_err(|e| SiteError::io(from, e))?;
    let template =
        fs::read_to_string(template_path).map_err(|e| SiteError::io(template_path, e))?;

    let page = render_page(&markdown, &template, base_path).map_err(|source| SiteError::Page {
        path: from.to_path_buf(),
        source,
    })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }
    fs::write(dest, page).map_err(|e| SiteError::io(dest, e))
}

/// Render every `.md` file under `content_dir` to the matching `.html` path
/// under `output_dir`. Returns the number of pages written.
pub fn generate_pages_recursive(
    content_dir: &Path,
    template_path: &Path,
    output_dir: &Path,
    base_path: &str,
) -> Result<usize, SiteError> {
    let mut count = 0;

    for entry in sorted_entries(content_dir)? {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| SiteError::io(&path, e))?;
        let dest = output_dir.join(entry.file_name());

        if file_type.is_dir() {
            count += generate_pages_recursive(&path, template_path, &dest, base_path)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            generate_page(&path, template_path, &dest.with_extension("html"), base_path)?;
            count += 1;
        }
    }

    Ok(count)
}

/// Mirror `src` into `dst`, deleting whatever `dst` held before.
/// Returns the number of files copied.
pub fn copy_directory(src: &Path, dst: &Path) -> Result<usize, SiteError> {
    // An unreadable source leaves the previous output untouched.
    let entries = sorted_entries(src)?;

    if dst.exists() {
        info!("Deleting existing directory: {}", dst.display());
        fs::remove_dir_all(dst).map_err(|e| SiteError::io(dst, e))?;
    }

    create_dir(dst)?;
    copy_entries(entries, dst)
}

fn copy_entries(entries: Vec<fs::DirEntry>, dst: &Path) -> Result<usize, SiteError> {
    let mut count = 0;

    for entry in entries {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| SiteError::io(&src_path, e))?;

        if file_type.is_dir() {
            create_dir(&dst_path)?;
            count += copy_entries(sorted_entries(&src_path)?, &dst_path)?;
        } else {
            debug!("Copying file: {} -> {}", src_path.display(), dst_path.display());
            fs::copy(&src_path, &dst_path).map_err(|e| SiteError::io(&src_path, e))?;
            count += 1;
        }
    }

    Ok(count)
}

fn create_dir(path: &Path) -> Result<(), SiteError> {
    debug!("Creating directory: {}", path.display());
    fs::create_dir(path).map_err(|e| SiteError::io(path, e))
}

fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>, SiteError> {
    let mut entries = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
        .map_err(|e| SiteError::io(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}
