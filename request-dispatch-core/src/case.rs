//! Identifier casing used for generated creator and selector names
//!
//! Word splitting follows the usual JavaScript `camelCase` rules: words are
//! separated by any non-alphanumeric character, by a lower-to-upper case
//! transition (`fooBar`), by the end of an acronym (`XMLHttp` -> `XML`, `Http`)
//! and by letter/digit boundaries.

/// Split an identifier into its words.
pub fn words(input: &str) -> Vec<String> {
    let mut words = Vec::new();

    for chunk in input.split(|c: char| !c.is_alphanumeric()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && !current.is_empty() {
                let prev = chars[i - 1];
                let next = chars.get(i + 1).copied();
                let boundary = (prev.is_lowercase() && c.is_uppercase())
                    || (prev.is_uppercase()
                        && c.is_uppercase()
                        && next.is_some_and(|n| n.is_lowercase()))
                    || (prev.is_ascii_digit() != c.is_ascii_digit());
                if boundary {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }

        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

/// Convert an identifier to camelCase (`SIGN_UP` -> `signUp`).
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, word) in words(input).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            out.push_str(&upper_first(&lower));
        }
    }
    out
}

/// Convert an identifier to PascalCase (`SIGN_UP` -> `SignUp`).
pub fn pascal_case(input: &str) -> String {
    upper_first(&camel_case(input))
}

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
