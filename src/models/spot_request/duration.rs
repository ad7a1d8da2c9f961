//! Spoken-duration estimate for a spot script, at 150 words per minute.

pub const WORDS_PER_MINUTE: u32 = 150;

/// Whitespace-separated tokens; blank text has none.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// `ceil(words / 150 * 60)` seconds.
pub fn estimate_duration_secs(text: &str) -> u32 {
    (word_count(text) * 60).div_ceil(WORDS_PER_MINUTE)
}

/// `"45s"` below a minute, `"1m 5s"` from there on.
pub fn format_duration(secs: u32) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
