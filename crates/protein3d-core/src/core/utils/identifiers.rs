use phf::{Set, phf_set};

/// Element letters a documented-missing atom may carry.
static MISSING_ATOM_ELEMENTS: Set<char> = phf_set! { 'C', 'N', 'O', 'H' };

/// Normalizes an element symbol to its capitalized form (`"FE"` becomes `"Fe"`).
///
/// Non-alphabetic characters (charges, digits) are dropped.
pub fn normalize_element(symbol: &str) -> String {
    let mut letters = symbol.trim().chars().filter(|c| c.is_ascii_alphabetic());
    let mut normalized = String::with_capacity(2);
    if let Some(first) = letters.next() {
        normalized.push(first.to_ascii_uppercase());
        normalized.extend(letters.map(|c| c.to_ascii_lowercase()));
    }
    normalized
}

/// Infers an element symbol from the raw four-column atom name field.
///
/// By convention a two-letter element is left-justified in the field (`"FE  "`),
/// while one-letter elements start in the second column (`" CA "`). Names that
/// start with a digit (`"1HB "`) are hydrogen-style labels and use the first letter.
pub fn infer_element_from_name(raw_name: &str) -> String {
    let chars: Vec<char> = raw_name.chars().take(4).collect();
    match chars.as_slice() {
        [first, second, ..] if first.is_ascii_alphabetic() && second.is_ascii_alphabetic() => {
            normalize_element(&[*first, *second].iter().collect::<String>())
        }
        [first, ..] if first.is_ascii_alphabetic() => normalize_element(&first.to_string()),
        _ => chars
            .iter()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| normalize_element(&c.to_string()))
            .unwrap_or_default(),
    }
}

/// Returns the element of a documented-missing atom, if its name starts with C, N, O or H.
pub fn missing_atom_element(atom_name: &str) -> Option<char> {
    atom_name
        .chars()
        .next()
        .filter(|c| MISSING_ATOM_ELEMENTS.contains(c))
}

pub fn elements_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
