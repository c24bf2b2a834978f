// src/utils.rs
use anyhow::Result;

/// Resume formats the matching backend can parse.
pub const ALLOWED_RESUME_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

/// Upload limit enforced by the backend (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let allowed_ok = get_file_extension(filename)
        .map(|ext| allowed.contains(&ext.as_str()))
        .unwrap_or(false);

    if !allowed_ok {
        let listed = allowed
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>();
        let listed = match listed.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        };
        anyhow::bail!("File type not allowed. Please upload {} files", listed);
    }

    Ok(())
}

/// Validate a resume upload before it leaves the page
pub fn validate_resume_upload(filename: &str, size: usize) -> Result<()> {
    validate_file_extension(filename, ALLOWED_RESUME_EXTENSIONS)?;

    if size > MAX_UPLOAD_BYTES {
        anyhow::bail!("File too large. Maximum size is 16MB");
    }

    Ok(())
}

/// Get content type for an upload
pub fn content_type_for(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Escape text for insertion into markup
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
