//! Heuristic plural stripping for allergen words.
//!
//! This is not a linguistic stemmer. It absorbs the common English plural
//! endings so that "peanuts" meets "peanut" and "berries" meets "berry", and
//! it will happily under- or over-stem irregular words.

/// Reduce a token to a likely singular form.
///
/// Rules are tried in order and the first one that applies wins:
///
/// 1. `...ies` with more than 4 characters: replace `ies` by `y` ("berries" → "berry")
/// 2. `...es` with more than 3 characters: drop the final `s` ("boxes" → "boxe")
/// 3. `...s` with more than 2 characters: drop the final `s` ("nuts" → "nut")
///
/// Anything else is returned unchanged. Lengths are counted in characters.
///
/// # Examples
///
/// ```rust
/// use allergen_scanner::morphology::singularize;
///
/// assert_eq!(singularize("berries"), "berry");
/// assert_eq!(singularize("peanuts"), "peanut");
/// assert_eq!(singularize("soy"), "soy");
/// ```
pub fn singularize(token: &str) -> String {
    let length = token.chars().count();

    // Suffixes are ASCII, so byte slicing below stays on char boundaries
    if length > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{}y", stem);
        }
    }

    if length > 3 && token.ends_with("es") {
        return token[..token.len() - 1].to_string();
    }

    if length > 2 {
        if let Some(stem) = token.strip_suffix('s') {
            return stem.to_string();
        }
    }

    token.to_string()
}
