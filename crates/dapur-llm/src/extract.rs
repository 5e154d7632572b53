use std::sync::LazyLock;

use regex::Regex;

static RECIPE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Recipe Name:\s*(.+?)\*\*").expect("Invalid recipe name regex")
});

/// Indonesian heading, tried only when the English one is absent.
static NAMA_RESEP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Nama Resep:\s*(.+?)\*\*").expect("Invalid nama resep regex")
});

/// Best-effort recipe name from generated text. Matches the heading the
/// prompt asks for; `None` when the model ignored the format.
pub fn extract_recipe_name(text: &str) -> Option<String> {
    [&*RECIPE_NAME_REGEX, &*NAMA_RESEP_REGEX]
        .into_iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_heading() {
        let text = "**Recipe Name: Golden Egg Fried Rice**\n\n1. Preparation Time: 10 min";
        assert_eq!(extract_recipe_name(text).as_deref(), Some("Golden Egg Fried Rice"));
    }

    #[test]
    fn indonesian_heading() {
        let text = "Berikut resepnya.\n**Nama Resep:  Nasi Goreng Telur **\n...";
        assert_eq!(extract_recipe_name(text).as_deref(), Some("Nasi Goreng Telur"));
    }

    #[test]
    fn english_wins_over_indonesian() {
        let text = "**Nama Resep: Nasi Goreng**\n**Recipe Name: Fried Rice**";
        assert_eq!(extract_recipe_name(text).as_deref(), Some("Fried Rice"));
    }

    #[test]
    fn heading_must_be_on_one_line() {
        assert_eq!(extract_recipe_name("**Recipe Name: Fried\nRice**"), None);
    }

    #[test]
    fn no_heading() {
        assert_eq!(extract_recipe_name("Just cook the rice."), None);
        assert_eq!(extract_recipe_name(""), None);
    }
}
