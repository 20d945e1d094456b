use chrono::{DateTime, Utc};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a registration timestamp for display
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Join tags for display, or a placeholder when there are none
pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}

/// Pad or truncate to exactly `width` characters for column output
pub fn fit_column(s: &str, width: usize) -> String {
    format!("{:<width$}", truncate_string(s, width), width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Zoë Ångström", 6), "Zoë...");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2015, 11, 10, 1, 47, 18).unwrap();
        assert_eq!(format_date(&date), "Nov 10, 2015");
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&[]), "none");
        assert_eq!(format_tags(&["swift".to_string(), "ios".to_string()]), "swift, ios");
    }

    #[test]
    fn test_fit_column() {
        assert_eq!(fit_column("Ann", 6), "Ann   ");
        assert_eq!(fit_column("Alford Rodriguez", 8), "Alfor...");
    }
}
