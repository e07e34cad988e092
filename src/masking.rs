//! Masking helpers for identifiers that appear in log output.
//!
//! Log lines carry enough of an identifier to correlate incidents without
//! exposing the full value. Phone numbers, user ids, invite codes, and
//! couple ids each get a shape-preserving partial mask.

use uuid::Uuid;

/// Masks a phone number, preserving enough edges to correlate.
///
/// Hyphenated numbers keep every block except the second-to-last, which is
/// fully masked (`010-1234-5678` -> `010-****-5678`). Plain numbers keep a
/// length-dependent number of leading and trailing digits
/// (`01012345678` -> `010****5678`). A leading `+` country prefix survives.
pub fn mask_phone(phone: &str) -> String {
    if phone.trim().is_empty() {
        return String::new();
    }

    if phone.contains('-') {
        let parts: Vec<&str> = phone.split('-').collect();
        let mask_index = parts.len().saturating_sub(2);
        return parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                if i == mask_index {
                    "*".repeat(part.chars().count())
                } else {
                    (*part).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("-");
    }

    let (prefix, raw) = phone
        .strip_prefix('+')
        .map_or(("", phone), |rest| ("+", rest));
    let chars: Vec<char> = raw.chars().collect();
    let len = chars.len();

    match len {
        0 | 1 => phone.to_string(),
        2..=4 => format!("{prefix}{}{}", "*".repeat(len - 1), chars[len - 1]),
        5..=7 => {
            let start: String = chars[..2].iter().collect();
            let end: String = chars[len - 2..].iter().collect();
            format!("{prefix}{start}{}{end}", "*".repeat(len - 4))
        }
        _ => {
            let start: String = chars[..3].iter().collect();
            let end: String = chars[len - 4..].iter().collect();
            format!("{prefix}{start}{}{end}", "*".repeat(len - 7))
        }
    }
}

/// Masks a user id, keeping at most the last two digits
/// (`123456` -> `****56`).
pub fn mask_user_id(user_id: i64) -> String {
    if user_id < 0 {
        return String::new();
    }

    let s = user_id.to_string();
    let len = s.len();

    if len <= 2 {
        return "*".repeat(len);
    }

    format!("{}{}", "*".repeat(len - 2), &s[len - 2..])
}

/// Masks an invite code, keeping a length-dependent number of edge
/// characters (`AB12CD` -> `AB**CD`).
pub fn mask_invite_code(code: &str) -> String {
    if code.trim().is_empty() {
        return String::new();
    }

    let chars: Vec<char> = code.chars().collect();
    let len = chars.len();

    if len <= 2 {
        "*".repeat(len)
    } else if len <= 4 {
        format!("{}{}{}", chars[0], "*".repeat(len - 2), chars[len - 1])
    } else {
        let start: String = chars[..2].iter().collect();
        let end: String = chars[len - 2..].iter().collect();
        format!("{start}{}{end}", "*".repeat(len - 4))
    }
}

/// Masks a couple id, keeping the first UUID segment
/// (`3f2a9c1d-...` -> `3f2a9c1d-****`).
pub fn mask_couple_id(couple_id: Uuid) -> String {
    let s = couple_id.to_string();
    let first_segment = s.split('-').next().unwrap_or(&s);
    format!("{first_segment}-****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone_hyphenated() {
        assert_eq!(mask_phone("010-1234-5678"), "010-****-5678");
        assert_eq!(mask_phone("02-123-4567"), "02-***-4567");
    }

    #[test]
    fn test_mask_phone_plain() {
        assert_eq!(mask_phone("01012345678"), "010****5678");
        assert_eq!(mask_phone("0101"), "***1");
        assert_eq!(mask_phone("1234567"), "12***67");
    }

    #[test]
    fn test_mask_phone_country_prefix() {
        assert_eq!(mask_phone("+821012345678"), "+821*****5678");
    }

    #[test]
    fn test_mask_phone_degenerate() {
        assert_eq!(mask_phone(""), "");
        assert_eq!(mask_phone("   "), "");
        assert_eq!(mask_phone("7"), "7");
    }

    #[test]
    fn test_mask_user_id() {
        assert_eq!(mask_user_id(123_456), "****56");
        assert_eq!(mask_user_id(42), "**");
        assert_eq!(mask_user_id(7), "*");
        assert_eq!(mask_user_id(-1), "");
    }

    #[test]
    fn test_mask_invite_code() {
        assert_eq!(mask_invite_code("AB12CD"), "AB**CD");
        assert_eq!(mask_invite_code("ABC"), "A*C");
        assert_eq!(mask_invite_code("AB"), "**");
        assert_eq!(mask_invite_code(""), "");
    }

    #[test]
    fn test_mask_couple_id() {
        let id = Uuid::parse_str("3f2a9c1d-0000-4000-8000-000000000000").unwrap_or_default();
        assert_eq!(mask_couple_id(id), "3f2a9c1d-****");
    }
}
