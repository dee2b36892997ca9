//! Text normalization and tokenization for name matching

/// Lower-case `text` and replace every character outside `[a-z0-9\s-]` with a space.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Split text into matching tokens.
///
/// Unlike a plain whitespace split, lower-to-upper case transitions
/// (`FrontCaliper`) also count as word breaks, so camel-cased node names from
/// modelling tools tokenize like spaced part names. The result is normalized,
/// split on whitespace, and tokens of one character or less are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(&split_camel_case(text))
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

fn split_camel_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev {
            if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// 31-multiplier string hash over UTF-16 code units, wrapped to 32 bits and
/// folded to its absolute value. Pure function of the input.
pub fn stable_hash(value: &str) -> u64 {
    let mut hash: i32 = 0;
    for unit in value.encode_utf16() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    (hash as i64).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Front_Brake.Caliper"), "front brake caliper");
        assert_eq!(normalize("Oil-Filter #2"), "oil-filter  2");
    }

    #[test]
    fn test_tokenize_drops_short_tokens() {
        assert_eq!(tokenize("A Front  Brake x2"), vec!["front", "brake", "x2"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("a b c").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_hyphenated() {
        assert_eq!(tokenize("Water-Pump Cover"), vec!["water-pump", "cover"]);
    }

    #[test]
    fn test_tokenize_splits_camel_case() {
        assert_eq!(tokenize("FrontCaliperMesh"), vec!["front", "caliper", "mesh"]);
        assert_eq!(tokenize("ECU"), vec!["ecu"]);
        assert_eq!(tokenize("Node003"), vec!["node003"]);
    }

    #[test]
    fn test_stable_hash_known_values() {
        assert_eq!(stable_hash(""), 0);
        assert_eq!(stable_hash("a"), 97);
        assert_eq!(stable_hash("ab"), 97 * 31 + 98);
        // Wraps like a 32-bit integer
        assert_eq!(stable_hash("hello world"), 1_794_106_052);
    }

    #[test]
    fn test_stable_hash_is_deterministic() {
        let id = "6c1b2f9e-4b4e-5d1a-9a51-3f6f2d2b7c10";
        assert_eq!(stable_hash(id), stable_hash(id));
    }
}
