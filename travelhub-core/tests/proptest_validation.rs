use proptest::prelude::*;
use travelhub_core::models::{Password, ResortType, Username, Window};

fn expected_password_ok(s: &str) -> bool {
    let len = s.chars().count();
    (8..=13).contains(&len)
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| !c.is_ascii_alphanumeric())
}

proptest! {
    /// Property: limit is always clamped into 1..=100
    #[test]
    fn prop_window_limit_clamped(offset in any::<u64>(), limit in any::<u32>()) {
        let w = Window::new(offset, limit);
        prop_assert!((1..=100).contains(&w.limit));
        prop_assert_eq!(w.offset, offset);
    }

    /// Property: a window never indexes past the listing and never
    /// yields more than `limit` items
    #[test]
    fn prop_window_range_in_bounds(offset in 0u64..500, limit in any::<u32>(), len in 0usize..300) {
        let w = Window::new(offset, limit);
        let r = w.range(len);
        prop_assert!(r.start <= r.end);
        prop_assert!(r.end <= len);
        prop_assert!(r.len() <= w.limit as usize);
    }

    /// Property: every resort type parses back from any casing
    #[test]
    fn prop_resort_type_case_insensitive(
        idx in 0usize..ResortType::all().len(),
        mask in prop::collection::vec(any::<bool>(), 32),
    ) {
        let ty = ResortType::all()[idx];
        let mangled: String = ty
            .as_str()
            .chars()
            .zip(mask.iter().cycle())
            .map(|(c, &up)| if up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect();
        prop_assert_eq!(mangled.parse::<ResortType>().unwrap(), ty);
    }

    /// Property: the password policy accepts exactly the strings it describes
    #[test]
    fn prop_password_policy(s in "[ -~]{0,20}") {
        prop_assert_eq!(Password::new(&s).is_ok(), expected_password_ok(&s));
    }

    /// Property: username validation never panics, and accepted names are
    /// trimmed and restricted to the allowed alphabet
    #[test]
    fn prop_username_accepts_only_allowed_alphabet(s in "\\PC{0,100}") {
        if let Ok(name) = Username::new(&s) {
            let name = name.as_str();
            prop_assert_eq!(name, s.trim());
            prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || "._-".contains(c)));
            prop_assert!((3..=80).contains(&name.chars().count()));
        }
    }
}
