//! Filename collation: `0-9, Aa-Zz` instead of byte order's `0-9, A-Z, a-z`.

use std::cmp::Ordering;

/// Map a byte into the collation code space.
///
/// Uppercase letters land on odd slots starting at 123 and lowercase letters
/// on the even slot right after their uppercase twin, so `A < a < B < b`.
/// Bytes above `'z'` move past the letter block; everything else keeps its
/// raw value.
fn collation_key(byte: u8) -> u16 {
    let b = u16::from(byte);
    match byte {
        b'A'..=b'Z' => 123 + 2 * (b - u16::from(b'A')),
        b'a'..=b'z' => 124 + 2 * (b - u16::from(b'a')),
        123..=255 => b + 133,
        _ => b,
    }
}

/// Compare two filenames, given as raw bytes, under the collation order.
///
/// Bytes are compared pairwise over the shared prefix; if the prefix is
/// equal the shorter name sorts first. Raw bytes keep non-UTF-8 `OsStr`
/// names comparable.
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering {
    for (&x, &y) in a.iter().zip(b.iter()) {
        match collation_key(x).cmp(&collation_key(y)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(a: &str, b: &str) -> Ordering {
        compare_bytes(a.as_bytes(), b.as_bytes())
    }

    #[test]
    fn differs_in_last_byte() {
        assert_eq!(compare("abc", "abd"), Ordering::Less);
        assert_eq!(compare("abd", "abc"), Ordering::Greater);
    }

    #[test]
    fn uppercase_immediately_before_lowercase() {
        assert_eq!(compare("A", "a"), Ordering::Less);
        assert_eq!(compare("a", "B"), Ordering::Less);
        assert_eq!(compare("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare("Alpha", "a"), Ordering::Less);
    }

    #[test]
    fn longer_name_after_shared_prefix() {
        assert_eq!(compare("ab", "a"), Ordering::Greater);
        assert_eq!(compare("a", "ab"), Ordering::Less);
        assert_eq!(compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn digits_before_letters() {
        assert_eq!(compare("9", "A"), Ordering::Less);
        assert_eq!(compare("0", "a"), Ordering::Less);
        // Byte-prefix rule, not numeric: '1' < '2'.
        assert_eq!(compare("File10", "File2"), Ordering::Less);
    }

    #[test]
    fn non_letters_keep_raw_order() {
        assert_eq!(compare("_", "A"), Ordering::Less);
        assert_eq!(compare("{", "z"), Ordering::Greater);
        assert_eq!(compare("{", "~"), Ordering::Less);
        assert_eq!(compare_bytes(&[0xC3], &[0x7E]), Ordering::Greater);
    }

    #[test]
    fn sort_is_a_total_order() {
        let mut names = vec![
            "beta", "Alpha", "alpha", "_x", "10", "2", "Beta", "a", "A", "ab", "~", "z",
        ];
        names.sort_by(|a, b| compare(a, b));
        assert_eq!(
            names,
            vec!["10", "2", "_x", "A", "Alpha", "a", "ab", "alpha", "Beta", "beta", "z", "~"]
        );

        for a in &names {
            for b in &names {
                let ab = compare(a, b);
                assert_eq!(ab, compare(b, a).reverse());
                assert_eq!(ab == Ordering::Equal, a == b);
                for c in &names {
                    if ab == Ordering::Less && compare(b, c) == Ordering::Less {
                        assert_eq!(compare(a, c), Ordering::Less);
                    }
                }
            }
        }
    }
}
