// Genres Module
// Static catalog of beat styles

pub mod types;

pub use types::Genre;

/// (id, name, emoji, description)
const CATALOG: [(&str, &str, &str, &str); 8] = [
    ("trap", "Trap", "\u{1F525}", "Heavy 808s, fast hi-hats"),
    ("lofi", "Lo-Fi", "\u{2615}", "Chill, jazzy, relaxed"),
    ("house", "House", "\u{1F3A7}", "Four-on-the-floor, groovy"),
    ("dnb", "Drum & Bass", "\u{26A1}", "Fast, energetic, complex"),
    ("afrobeats", "Afrobeats", "\u{1F30D}", "Rhythmic, percussive, vibrant"),
    ("drill", "Drill", "\u{1F32A}\u{FE0F}", "Dark, sliding 808s, menacing"),
    ("pop", "Pop", "\u{2728}", "Catchy, clean, radio-ready"),
    ("jazz", "Jazz", "\u{1F3B7}", "Swung, complex, soulful"),
];

/// List all available genres
pub fn list_genres() -> Vec<Genre> {
    CATALOG
        .iter()
        .map(|(id, name, emoji, description)| Genre::new(id, name, emoji, description))
        .collect()
}

/// Get a genre by id (case-insensitive)
pub fn get_genre(id: &str) -> Option<Genre> {
    list_genres()
        .into_iter()
        .find(|g| g.id.eq_ignore_ascii_case(id.trim()))
}

/// Get all genre ids
pub fn list_genre_ids() -> Vec<String> {
    CATALOG.iter().map(|(id, ..)| id.to_string()).collect()
}
