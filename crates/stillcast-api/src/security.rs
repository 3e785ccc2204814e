//! Input sanitization.

/// Maximum length for a client-supplied filename.
const MAX_FILENAME_LENGTH: usize = 128;

/// Reduce a client-supplied filename to a safe basename.
///
/// Keeps only the final path component (for either separator style),
/// drops control characters, and replaces everything outside
/// `[A-Za-z0-9._-]`. The result never escapes the directory it is joined
/// onto and stays a single argument-vector element without quoting.
/// Names that sanitize to nothing get `fallback`.
pub fn sanitize_filename(name: &str, fallback: &'static str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let mut out: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LENGTH)
        .collect();

    // Dot/underscore-only names ("..", "._") carry no information and
    // must never survive as a path component.
    if out.chars().all(|c| matches!(c, '.' | '_')) {
        out.clear();
    }

    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(sanitize_filename("cover.png", "image"), "cover.png");
        assert_eq!(sanitize_filename("track_01-final.mp3", "audio"), "track_01-final.mp3");
    }

    #[test]
    fn test_path_traversal_is_stripped() {
        assert_eq!(sanitize_filename("../../etc/passwd", "image"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini", "image"), "boot.ini");
        assert_eq!(sanitize_filename("..", "image"), "image");
    }

    #[test]
    fn test_sanitized_name_stays_inside_directory() {
        let dir = std::path::Path::new("/tmp/job");
        let joined = dir.join(sanitize_filename("../../etc/passwd", "image"));
        assert!(joined.starts_with(dir));
    }

    #[test]
    fn test_shell_metacharacters_are_replaced() {
        assert_eq!(
            sanitize_filename("a;rm -rf $HOME.png", "image"),
            "a_rm_-rf__HOME.png"
        );
        assert_eq!(sanitize_filename("$(whoami).jpg", "image"), "__whoami_.jpg");
    }

    #[test]
    fn test_control_characters_are_dropped() {
        assert_eq!(sanitize_filename("a\x00b\nc.png", "image"), "abc.png");
    }

    #[test]
    fn test_empty_and_degenerate_names_use_fallback() {
        assert_eq!(sanitize_filename("", "image"), "image");
        assert_eq!(sanitize_filename("///", "image"), "image");
        assert_eq!(sanitize_filename("...", "audio"), "audio");
    }

    #[test]
    fn test_length_is_capped() {
        let long = "a".repeat(500) + ".png";
        assert_eq!(sanitize_filename(&long, "image").len(), 128);
    }
}
