use crate::transcript::LanguageDescriptor;

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// One-line description of a caption track for console output
pub fn describe_language(language: &LanguageDescriptor) -> String {
    let mut flags = Vec::new();
    if language.is_generated {
        flags.push("auto-generated");
    }
    if language.is_translatable {
        flags.push("translatable");
    }

    if flags.is_empty() {
        format!("{} ({})", language.language, language.language_code)
    } else {
        format!(
            "{} ({}) [{}]",
            language.language,
            language.language_code,
            flags.join(", ")
        )
    }
}
