//! Item identifier derivation.
//!
//! Archive items need a globally unique identifier. The base comes from
//! the single attachment's sanitized filename, or from the invoking
//! username for multi-file batches; a second-resolution timestamp suffix
//! keeps invocations apart. Two invocations with the same base inside the
//! same second can still collide — known limitation, not guarded.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters an archive identifier may not contain.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9._-]").unwrap());

/// Suffix format: `YYYYMMDDHHMMSS`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Identifier base for a single-file upload: lowercased filename with
/// every disallowed character replaced by `_`.
pub fn filename_base(filename: &str) -> String {
    DISALLOWED
        .replace_all(&filename.to_lowercase(), "_")
        .into_owned()
}

/// Identifier base for a multi-file upload: `discord-upload-{username}`,
/// lowercased, spaces replaced by underscores.
pub fn username_base(username: &str) -> String {
    format!("discord-upload-{}", username.replace(' ', "_")).to_lowercase()
}

/// Append the timestamp suffix to a base identifier.
pub fn unique_identifier(base: &str, now: DateTime<Local>) -> String {
    format!("{}-{}", base, now.format(TIMESTAMP_FORMAT))
}

/// Public viewing URL for an archived item.
pub fn details_url(identifier: &str) -> String {
    format!("https://archive.org/details/{identifier}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn sanitizes_single_filename() {
        assert_eq!(filename_base("My Video.MP4"), "my_video.mp4");
        assert_eq!(filename_base("report.pdf"), "report.pdf");
        assert_eq!(filename_base("weird!@#name.txt"), "weird___name.txt");
    }

    #[test]
    fn username_base_replaces_spaces_and_lowercases() {
        assert_eq!(username_base("Jane Doe"), "discord-upload-jane_doe");
        assert_eq!(username_base("bob"), "discord-upload-bob");
    }

    #[test]
    fn identifier_is_deterministic_given_timestamp() {
        let id = unique_identifier("my_video.mp4", fixed_now());
        assert_eq!(id, "my_video.mp4-20250314092653");
        let id = unique_identifier("discord-upload-jane_doe", fixed_now());
        assert_eq!(id, "discord-upload-jane_doe-20250314092653");
    }

    #[test]
    fn details_url_embeds_identifier() {
        assert_eq!(
            details_url("my_video.mp4-20250314092653"),
            "https://archive.org/details/my_video.mp4-20250314092653"
        );
    }
}
