use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_player_name(last_first: &str) -> String {
    let trimmed = last_first.trim();
    if trimmed.is_empty() {
        return "Unknown".to_string();
    }

    match trimmed.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => trimmed.to_string(),
    }
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .collect()
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_reorders_last_first() {
        assert_eq!(format_player_name("James, LeBron"), "LeBron James");
        assert_eq!(format_player_name(" Curry ,  Stephen "), "Stephen Curry");
    }

    #[test]
    fn name_without_comma_passes_through() {
        assert_eq!(format_player_name("Nene"), "Nene");
    }

    #[test]
    fn blank_name_is_unknown() {
        assert_eq!(format_player_name(""), "Unknown");
        assert_eq!(format_player_name("   "), "Unknown");
    }

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("LeBron James"), "LJ");
        assert_eq!(initials("Nene"), "N");
        assert_eq!(initials("Juan Carlos Navarro"), "JC");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x1, y1) = stable_pair("203507");
        let (x2, y2) = stable_pair("203507");
        assert_eq!((x1, y1), (x2, y2));
        assert!((-1.0..=1.0).contains(&x1));
        assert!((-1.0..=1.0).contains(&y1));
    }
}
