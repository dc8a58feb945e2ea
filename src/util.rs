use std::path::Path;

/// Repository URLs listed one per line; blank lines and `#` comments are skipped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn read_url_list(path: &Path) -> std::io::Result<Vec<String>> {
    Ok(parse_url_list(&std::fs::read_to_string(path)?))
}
