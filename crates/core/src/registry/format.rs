//! Line format shared by registry writers and readers
//!
//! A registry resource is UTF-8 text with one implementation name per line.
//! Everything from the first `#` on a line is a comment, surrounding
//! whitespace is ignored and lines left empty contribute nothing.

use std::io::{self, BufRead};

/// Marker starting a comment that runs to the end of the line
pub const COMMENT: char = '#';

/// Strip the comment and surrounding whitespace of one line.
///
/// Returns `None` when nothing is left.
pub fn parse_line(raw: &str) -> Option<&str> {
    let content = match raw.find(COMMENT) {
        Some(index) => &raw[..index],
        None => raw,
    };
    let content = content.trim();
    if content.is_empty() { None } else { Some(content) }
}

/// Read every surviving entry with its 1-based line number
pub fn parse_entries(reader: impl BufRead) -> io::Result<Vec<(usize, String)>> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(entry) = parse_line(&line) {
            entries.push((index + 1, entry.to_string()));
        }
    }
    Ok(entries)
}

/// Render names one per line, each terminated by `\n`
pub fn render<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for name in names {
        out.push_str(name.as_ref());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_strips_comments() {
        assert_eq!(parse_line("app::Fred # the first one"), Some("app::Fred"));
        assert_eq!(parse_line("  app::Nancy\t"), Some("app::Nancy"));
        assert_eq!(parse_line("# only a comment"), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   # indented comment"), None);
    }

    #[test]
    fn test_parse_entries_keeps_line_numbers() {
        let text = "# header\n\napp::Fred\n   \napp::Nancy # trailing\n";
        let entries = parse_entries(Cursor::new(text)).unwrap();
        assert_eq!(
            entries,
            vec![(3, "app::Fred".to_string()), (5, "app::Nancy".to_string())]
        );
    }

    #[test]
    fn test_parse_entries_handles_crlf_and_missing_final_newline() {
        let text = "app::Fred\r\napp::Nancy";
        let entries = parse_entries(Cursor::new(text)).unwrap();
        let names: Vec<_> = entries.into_iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["app::Fred", "app::Nancy"]);
    }

    #[test]
    fn test_render() {
        assert_eq!(render(["a::A", "b::B"]), "a::A\nb::B\n");
        assert_eq!(render(Vec::<String>::new()), "");
    }
}
