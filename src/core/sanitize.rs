// src/core/sanitize.rs

/// Decode the handful of named entities tables actually use, plus any numeric
/// `&#NNN;` / `&#xHH;` reference. Unknown names are left as-is.
pub fn normalize_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(|c| if c == '\u{a0}' { ' ' } else { c });
    }
    Some(match name {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "minus" => '\u{2212}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        _ => return None,
    })
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Remove any `[ ... ]` bracket tags (footnote markers like `[1]`, `[a]`, `[note 3]`).
/// Greedy within each bracket pair, no nesting.
pub fn strip_brackets(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_bracket = false;
    for ch in s.chars() {
        match ch {
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            _ if !in_bracket => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// First number in a table cell, ignoring footnotes, currency signs, units and
/// thousands separators. `"$1,234.5 bn[3]"` → `1234.5`, `"−3.2%"` → `-3.2`.
/// Dashes, blanks and placeholders (`"..."`, `"n/a"`) yield `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let text = strip_brackets(cell);
    let chars: Vec<char> = text.chars().collect();
    let first_digit = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut begin = first_digit;
    let mut num = String::new();
    if begin > 0 && chars[begin - 1] == '.' {
        begin -= 1;
    }
    if begin > 0 && matches!(chars[begin - 1], '-' | '\u{2212}' | '\u{2012}' | '\u{2013}') {
        num.push('-');
    }
    if chars[begin] == '.' {
        num.push('0');
    }

    for &c in &chars[begin..] {
        match c {
            '0'..='9' | '.' => num.push(c),
            ',' => {}
            _ => break,
        }
    }

    num.trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Filesystem-safe stem from a chart title. Empty titles fall back to `chart_<n>`.
pub fn slug(title: &str, n: usize) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_us = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch.to_ascii_lowercase()); last_us = false; }
        else if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !last_us { out.push('_'); last_us = true; }
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { format!("chart_{}", n) } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_variants() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number("$1,234.5 bn[3]"), Some(1234.5));
        assert_eq!(parse_number("\u{2212}3.2%"), Some(-3.2));
        assert_eq!(parse_number("-0.5"), Some(-0.5));
        assert_eq!(parse_number(".75"), Some(0.75));
        assert_eq!(parse_number("877 (2022)"), Some(877.0));
        assert_eq!(parse_number("12."), Some(12.0));
    }

    #[test]
    fn parse_number_rejects_placeholders() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("\u{2014}"), None);
        assert_eq!(parse_number("..."), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("[1]"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn brackets_and_entities() {
        assert_eq!(strip_brackets("United States[a][12]"), "United States");
        assert_eq!(normalize_entities("AT&amp;T&nbsp;Inc"), "AT&T Inc");
        assert_eq!(normalize_entities("&#8212; &#x2212;3 &bogus; a & b"), "\u{2014} \u{2212}3 &bogus; a & b");
        assert_eq!(normalize_ws("  a \n\t b  "), "a b");
    }

    #[test]
    fn slug_is_filesystem_safe() {
        assert_eq!(slug("Unemployment Rate (%)", 0), "unemployment_rate");
        assert_eq!(slug("GDP - current US$", 0), "gdp_current_us");
        assert_eq!(slug("???", 4), "chart_4");
    }
}
