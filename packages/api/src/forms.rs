//! Client-side checks run before a form may be submitted.

/// 3 to 20 ASCII letters.
pub fn valid_username(username: &str) -> bool {
    (3..=20).contains(&username.len()) && username.chars().all(|c| c.is_ascii_alphabetic())
}

/// 4 to 20 characters: ASCII letters, digits and `!@#$%`.
pub fn valid_password(password: &str) -> bool {
    (4..=20).contains(&password.len())
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!@#$%".contains(c))
}

/// A note needs an owner, a title and some text.
pub fn valid_note(user: &str, title: &str, text: &str) -> bool {
    [user, title, text].iter().all(|field| !field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(valid_username("alice"));
        assert!(!valid_username("al"));
        assert!(!valid_username("alice1"));
        assert!(!valid_username(&"a".repeat(21)));
    }

    #[test]
    fn test_password_rules() {
        assert!(valid_password("abc1!"));
        assert!(valid_password("Pa$$"));
        assert!(!valid_password("abc"));
        assert!(!valid_password("has space"));
    }

    #[test]
    fn test_note_requires_every_field() {
        assert!(valid_note("u1", "Printer", "Out of toner"));
        assert!(!valid_note("", "Printer", "Out of toner"));
        assert!(!valid_note("u1", "  ", "Out of toner"));
    }
}
