/// Size ceiling for uploaded files.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "csv"];

/// Local pre-flight validation of an upload candidate. Rejections are
/// user-facing messages; no network call may be made for them.
pub fn validate_upload(path: &str, byte_len: u64) -> Result<(), String> {
    let extension = path
        .rsplit('.')
        .next()
        .filter(|ext| !ext.contains(['/', '\\']) && ext.len() < path.len())
        .map(str::to_ascii_lowercase);
    let allowed = extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext));
    if !allowed {
        return Err("Error: Only PDF, TXT, and CSV files are allowed".to_string());
    }
    if byte_len > MAX_UPLOAD_BYTES {
        return Err(format!(
            "Error: File size exceeds {}MB limit",
            MAX_UPLOAD_BYTES / 1024 / 1024
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_upload, MAX_UPLOAD_BYTES};

    #[test]
    fn accepts_allowed_kinds_case_insensitively() {
        assert!(validate_upload("notes.pdf", 1024).is_ok());
        assert!(validate_upload("data.CSV", 1024).is_ok());
        assert!(validate_upload("/tmp/readme.TXT", 1024).is_ok());
    }

    #[test]
    fn rejects_other_kinds() {
        let err = validate_upload("slides.docx", 1024).unwrap_err();
        assert!(err.contains("Only PDF, TXT, and CSV"));
        assert!(validate_upload("no_extension", 1024).is_err());
    }

    #[test]
    fn rejects_oversize_files() {
        assert!(validate_upload("big.pdf", MAX_UPLOAD_BYTES).is_ok());
        let err = validate_upload("big.pdf", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(err.contains("exceeds 10MB"));
    }
}
