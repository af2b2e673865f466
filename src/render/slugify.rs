//! Slug generation for archive file names.

/// Generate a lowercase ASCII slug from text.
///
/// Letters with common Latin diacritics are folded to their base letter,
/// whitespace, `-` and `_` become hyphens, everything else is dropped, and
/// runs of hyphens collapse.
///
/// # Examples
///
/// ```
/// use scormkit::render::slugify;
///
/// assert_eq!(slugify("Excel Initiation"), "excel-initiation");
/// assert_eq!(slugify("Sécurité : niveau 2"), "securite-niveau-2");
/// ```
pub fn slugify(text: &str) -> String {
    text.chars()
        .map(|c| {
            let c = fold_diacritic(c);
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_with_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn test_slugify_accents() {
        assert_eq!(slugify("Évaluation finale"), "evaluation-finale");
        assert_eq!(slugify("Garçon à l'école"), "garcon-a-lecole");
    }

    #[test]
    fn test_slugify_leading_trailing_spaces() {
        assert_eq!(slugify("  Hello   World  "), "hello-world");
    }

    #[test]
    fn test_slugify_underscores() {
        assert_eq!(slugify("hello_world"), "hello-world");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_hyphens() {
        assert_eq!(slugify("hello--world"), "hello-world");
        assert_eq!(slugify("-hello-"), "hello");
    }
}
