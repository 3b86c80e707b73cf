//! Date helper functions

use chrono::{DateTime, Locale, TimeZone};

/// Format a date using a Moment.js-compatible format string and a locale
/// name such as `pt_BR` (unknown locales fall back to POSIX).
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY", "pt_BR") // -> "15 mar 2021"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str, locale: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format_localized(&chrono_format, parse_locale(locale))
        .to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

fn parse_locale(name: &str) -> Locale {
    Locale::try_from(name.replace('-', "_").as_str()).unwrap_or(Locale::POSIX)
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn sample() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2021, 3, 15, 19, 25, 28)
            .unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&sample(), "YYYY-MM-DD", "en_US"), "2021-03-15");
        assert_eq!(format_date(&sample(), "DD MMM YYYY", "en_US"), "15 Mar 2021");
        assert_eq!(format_date(&sample(), "DD MMM YYYY", "pt_BR"), "15 mar 2021");
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        assert_eq!(format_date(&sample(), "DD MMMM YYYY", "xx"), "15 March 2021");
        assert_eq!(format_date(&sample(), "DD MMM YYYY", "pt-BR"), "15 mar 2021");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml(&sample()), "2021-03-15T19:25:28.000+00:00");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("DD MMM YYYY"), "%d %b %Y");
    }
}
