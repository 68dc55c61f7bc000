use std::path::Path;

use crate::OutputFormat;

const FALLBACK_STEM: &str = "image";
const MAX_STEM_LEN: usize = 80;

/// Name for a saved result: `restored_{stem}.{ext}` where the stem comes from
/// the uploaded file and the extension from the output format.
pub fn result_filename(source_name: &str, format: OutputFormat) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("");
    format!("restored_{}.{}", sanitize_stem(stem), format.extension())
}

fn sanitize_stem(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut cleaned = compacted.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        return FALLBACK_STEM.to_string();
    }
    if cleaned.len() > MAX_STEM_LEN {
        let mut end = MAX_STEM_LEN;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
