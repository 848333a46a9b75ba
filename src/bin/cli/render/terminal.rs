use cardstack_lib::flashcards::Card;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Heading line for a stack: `Verbs (12 cards)`
pub fn stack_header(stack: &str, count: usize, use_color: bool) -> String {
    let noun = if count == 1 { "card" } else { "cards" };
    format!(
        "{} {}",
        paint(stack, &format!("{}{}", Color::BOLD, Color::MAGENTA), use_color),
        paint(&format!("({} {})", count, noun), Color::GRAY, use_color)
    )
}

/// One card as `  #id  front → back`, multi-line text folded onto one line
pub fn card_line(card: &Card, id_width: usize, use_color: bool) -> String {
    let id = format!("#{:<width$}", card.id, width = id_width);
    format!(
        "  {}  {} {} {}",
        paint(&id, Color::CYAN, use_color),
        single_line(&card.front),
        paint("\u{2192}", Color::GRAY, use_color),
        single_line(&card.back)
    )
}

/// Collapse line breaks so a card fits on one terminal row
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" \u{23ce} ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_folds_breaks() {
        assert_eq!(single_line("a\n\n b "), "a \u{23ce} b");
    }

    #[test]
    fn test_card_line_without_color() {
        let card = Card::new(7, "front", "back", "S");
        assert_eq!(card_line(&card, 2, false), "  #7   front \u{2192} back");
    }

    #[test]
    fn test_stack_header_pluralizes() {
        assert_eq!(stack_header("S", 1, false), "S (1 card)");
        assert_eq!(stack_header("S", 3, false), "S (3 cards)");
    }
}
