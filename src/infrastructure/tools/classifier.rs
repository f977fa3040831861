//! # Content Classifier
//!
//! Decides whether a file is safe to decode as text.
//!
//! Policy, first match wins:
//! 1. extension on the text allowlist => Text (even if the bytes contain NUL),
//! 2. MIME guess by name in the `text/*` family => Text,
//! 3. NUL byte within the first 1024 bytes => Binary, otherwise Text.
//!
//! A file that cannot be opened or read while sniffing is Binary.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use mime_guess::mime;

use crate::domain::paths::{SNIFF_LEN, TEXT_EXTENSIONS};
use crate::domain::types::FileClassification;
use crate::infrastructure::tools::sandbox::ResolvedPath;

pub fn classify(path: &ResolvedPath) -> FileClassification {
    let path = path.as_path();

    if has_text_extension(path) {
        return FileClassification::Text;
    }

    if let Some(guess) = mime_guess::from_path(path).first()
        && guess.type_() == mime::TEXT
    {
        return FileClassification::Text;
    }

    sniff(path)
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn sniff(path: &Path) -> FileClassification {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    let read = File::open(path).and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut head));

    match read {
        Ok(_) if head.contains(&0) => FileClassification::Binary,
        Ok(_) => FileClassification::Text,
        Err(e) => {
            tracing::debug!("Sniff failed for {}: {} (treating as binary)", path.display(), e);
            FileClassification::Binary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::tools::sandbox::PathGuard;
    use std::fs;
    use tempfile::TempDir;

    fn classify_bytes(name: &str, bytes: &[u8]) -> FileClassification {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(name), bytes).unwrap();
        let guard = PathGuard::new(temp_dir.path()).unwrap();
        classify(&guard.resolve(name).unwrap())
    }

    #[test]
    fn test_nul_in_head_is_binary() {
        assert_eq!(
            classify_bytes("blob.bin", b"\x7fELF\x00\x01"),
            FileClassification::Binary
        );
    }

    #[test]
    fn test_plain_bytes_without_known_extension_are_text() {
        assert_eq!(
            classify_bytes("Makefile", b"all:\n\tcargo build\n"),
            FileClassification::Text
        );
    }

    #[test]
    fn test_allowlist_takes_precedence_over_sniff() {
        assert_eq!(
            classify_bytes("data.txt", b"abc\x00def"),
            FileClassification::Text
        );
        assert_eq!(
            classify_bytes("SHOUTY.JSON", b"{\x00}"),
            FileClassification::Text
        );
    }

    #[test]
    fn test_text_mime_family_takes_precedence_over_sniff() {
        assert_eq!(
            classify_bytes("invite.ics", b"BEGIN:VCALENDAR\x00"),
            FileClassification::Text
        );
    }

    #[test]
    fn test_nul_after_sniff_window_is_text() {
        let mut bytes = vec![b'a'; 1024];
        bytes.push(0);
        assert_eq!(classify_bytes("late.chunk", &bytes), FileClassification::Text);
    }

    #[test]
    fn test_unreadable_file_is_binary() {
        let temp_dir = TempDir::new().unwrap();
        let guard = PathGuard::new(temp_dir.path()).unwrap();
        let missing = guard.resolve("ghost.chunk").unwrap();
        assert_eq!(classify(&missing), FileClassification::Binary);
    }
}
