//! Spellback codec — phonetic read-back used when confirming collected values.
//!
//! Pure string transforms, no I/O.

/// Phonetic word for a lowercase ASCII letter or digit.
fn phonetic(c: char) -> Option<&'static str> {
    let word = match c {
        'a' => "Alpha",
        'b' => "Bravo",
        'c' => "Charlie",
        'd' => "Delta",
        'e' => "Echo",
        'f' => "Foxtrot",
        'g' => "Golf",
        'h' => "Hotel",
        'i' => "India",
        'j' => "Juliet",
        'k' => "Kilo",
        'l' => "Lima",
        'm' => "Mike",
        'n' => "November",
        'o' => "Oscar",
        'p' => "Papa",
        'q' => "Quebec",
        'r' => "Romeo",
        's' => "Sierra",
        't' => "Tango",
        'u' => "Uniform",
        'v' => "Victor",
        'w' => "Whiskey",
        'x' => "X-ray",
        'y' => "Yankee",
        'z' => "Zulu",
        '0' => "Zero",
        '1' => "One",
        '2' => "Two",
        '3' => "Three",
        '4' => "Four",
        '5' => "Five",
        '6' => "Six",
        '7' => "Seven",
        '8' => "Eight",
        '9' => "Nine",
        _ => return None,
    };
    Some(word)
}

/// Digit for a spoken number word (`"zero"`..`"nine"`), case-insensitive.
fn spoken_digit(word: &str) -> Option<char> {
    let digit = match word.to_lowercase().as_str() {
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        _ => return None,
    };
    Some(digit)
}

/// Spell `text` out one word per character.
///
/// Letters and digits become their phonetic words, spaces become `Space`,
/// anything else passes through uppercased. Words are joined by single
/// spaces; the empty string spells to the empty string.
pub fn spell_out(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match phonetic(c) {
            Some(word) => word.to_string(),
            None if c == ' ' => "Space".to_string(),
            None => c.to_uppercase().collect(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse a spoken identifier into its characters.
///
/// Number words map to digits, every other whitespace-separated token is
/// kept literally. Tokens are concatenated with no separator and the result
/// is uppercased: `"one two three"` → `"123"`, `"A B C"` → `"ABC"`.
pub fn normalize_spoken_digits(text: &str) -> String {
    text.split_whitespace()
        .map(|token| match spoken_digit(token) {
            Some(d) => d.to_string(),
            None => token.to_string(),
        })
        .collect::<String>()
        .to_uppercase()
}

/// Whether any token of `text` is a spoken number word.
pub fn contains_spoken_digits(text: &str) -> bool {
    text.split_whitespace().any(|t| spoken_digit(t).is_some())
}
