use std::collections::HashMap;

use once_cell::sync::Lazy;

const DIGIT_HEIGHT: usize = 5;
const FILL_CHAR: char = '█';

type Glyph = [&'static str; DIGIT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('0', ["111", "1 1", "1 1", "1 1", "111"]),
        ('1', [" 1 ", "11 ", " 1 ", " 1 ", "111"]),
        ('2', ["111", "  1", "111", "1  ", "111"]),
        ('3', ["111", "  1", " 11", "  1", "111"]),
        ('4', ["1 1", "1 1", "111", "  1", "  1"]),
        ('5', ["111", "1  ", "111", "  1", "111"]),
        ('6', ["111", "1  ", "111", "1 1", "111"]),
        ('7', ["111", "  1", " 1 ", " 1 ", " 1 "]),
        ('8', ["111", "1 1", "111", "1 1", "111"]),
        ('9', ["111", "1 1", "111", "  1", "111"]),
        (':', ["   ", " 1 ", "   ", " 1 ", "   "]),
    ])
});

/// Render a clock string like `4:59` in block digits. Characters without a
/// glyph are skipped.
pub fn render(text: &str) -> Vec<String> {
    let glyphs: Vec<&Glyph> = text.chars().filter_map(|ch| GLYPHS.get(&ch)).collect();
    (0..DIGIT_HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|glyph| {
                    glyph[row]
                        .chars()
                        .flat_map(|cell| {
                            let ch = if cell == '1' { FILL_CHAR } else { ' ' };
                            [ch, ch]
                        })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_renders_fixed_height() {
        let lines = render("4:59");
        assert_eq!(lines.len(), DIGIT_HEIGHT);
        assert!(lines.iter().any(|line| line.contains(FILL_CHAR)));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert_eq!(render("1x"), render("1"));
        assert!(render("").iter().all(String::is_empty));
    }
}
