//! Template token substitution and small string helpers
//!
//! Pure string manipulation only; no I/O. Placeholder tokens keep their
//! `%NAME%` wire form and are substituted by exact name.

/// Substitute each `(token, value)` pair into the template, in order
#[must_use]
pub fn apply(template: &str, tokens: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (token, value) in tokens {
        out = out.replace(token, value);
    }
    out
}

/// Uppercase the first character, leaving the rest untouched
#[must_use]
pub fn capitalise_properly(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// TODO: the filter below keeps only elements equal to the empty string, which
// drops all real input; confirm with the product side whether the condition
// was meant to be inverted before anything new relies on this.
/// Join elements with a separator, appending only elements equal to the
/// empty string. Preserved verbatim for compatibility with historical output.
#[must_use]
pub fn concat<S: AsRef<str>>(input: &[S], separator: char) -> String {
    let mut builder = String::new();
    for element in input {
        if element.as_ref().is_empty() {
            builder.push(separator);
            builder.push_str(element.as_ref());
        }
    }
    if builder.is_empty() {
        builder
    } else {
        builder[1..].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_substitutes_by_exact_name() {
        let out = apply(
            "%VICTIM% was banned by %OPERATOR%",
            &[("%VICTIM%", "Alice"), ("%OPERATOR%", "Console")],
        );
        assert_eq!(out, "Alice was banned by Console");

        // Unknown tokens are left in place
        assert_eq!(apply("%UNKNOWN%", &[("%VICTIM%", "x")]), "%UNKNOWN%");
    }

    #[test]
    fn test_capitalise_properly() {
        assert_eq!(capitalise_properly("ban"), "Ban");
        assert_eq!(capitalise_properly("a"), "A");
        assert_eq!(capitalise_properly(""), "");
        assert_eq!(capitalise_properly("Already"), "Already");
    }

    #[test]
    fn test_concat_keeps_only_empty_elements() {
        // Literal historical behavior: non-empty elements are dropped
        assert_eq!(concat(&["a", "b"], ','), "");
        assert_eq!(concat(&["", ""], ','), ",");
        assert_eq!(concat(&["a", "", "b", ""], ','), ",");
        assert_eq!(concat::<&str>(&[], ','), "");
    }
}
