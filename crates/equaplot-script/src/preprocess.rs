//! Formula text normalization
//!
//! Users type formulas the way they would on paper: `2x^2 + 3(x - 1)`,
//! `Sin(X)`, `π/2`. The evaluator needs explicit operators and a single
//! spelling for every function, so the text goes through these steps in
//! order:
//!
//! 1. strip whitespace
//! 2. lowercase
//! 3. replace the `π` glyph with `pi`
//! 4. rewrite `a^b` as `pow(a,b)`, at most [`MAX_EXPONENT_PASSES`] times
//! 5. insert `*` after a digit followed by a letter or `(`, and after `)`
//!    followed by a digit, letter or `(`
//! 6. spell known function names the way the evaluator registers them, and
//!    make a variable directly followed by `(` multiply, so `x(x+1)` reads
//!    as `x*(x+1)`
//!
//! Nothing is rejected here. Unknown names pass through and fail at
//! evaluation time; `^` that cannot be rewritten stays in the text and is
//! reported as a [`PreprocessWarning`].
//!
//! The output contains no whitespace and no rewritable `^`, so running it
//! through again returns it unchanged.

use crate::error::PreprocessWarning;

/// Exponent rewrite passes before giving up on remaining `^`
pub const MAX_EXPONENT_PASSES: usize = 5;

/// Alternate spelling of pi accepted in formulas
pub const PI_GLYPH: char = 'π';

/// Function names with a canonical spelling, as registered by the evaluator
pub const CANONICAL_FUNCTIONS: [&str; 13] = [
    "sin", "cos", "tan", "asin", "acos", "atan", "sqrt", "abs", "pow", "exp", "log", "floor",
    "ceiling",
];

/// Names bound by the evaluator rather than called
pub const VARIABLE_NAMES: [&str; 6] = ["x", "z", "t", "time", "pi", "e"];

fn is_variable(name: &str) -> bool {
    VARIABLE_NAMES.contains(&name)
}

/// Normalized formula text plus anything that could not be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub canonical: String,
    pub warnings: Vec<PreprocessWarning>,
}

/// Normalize a raw formula into canonical expression text
pub fn preprocess(raw: &str) -> Preprocessed {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut text = stripped.to_lowercase().replace(PI_GLYPH, "pi");

    if text.is_empty() {
        return Preprocessed {
            canonical: "0".to_string(),
            warnings: Vec::new(),
        };
    }

    let mut passes = 0;
    while text.contains('^') && passes < MAX_EXPONENT_PASSES {
        let next = rewrite_exponents_once(&text);
        passes += 1;
        if next == text {
            break;
        }
        text = next;
    }

    let mut warnings = Vec::new();
    let remaining = text.matches('^').count();
    if remaining > 0 {
        warnings.push(PreprocessWarning::UnresolvedExponent { remaining });
    }

    let text = insert_implicit_multiplication(&text);
    let canonical = canonicalize_identifiers(&text);

    Preprocessed {
        canonical,
        warnings,
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.'
}

/// Start of the run of token characters ending at `end`
fn token_start(chars: &[char], end: usize) -> usize {
    let mut start = end;
    while start > 0 && is_token_char(chars[start - 1]) {
        start -= 1;
    }
    start
}

fn matching_open(chars: &[char], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        match chars[i] {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn matching_close(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Where the base of a `^` begins in the already-emitted text
///
/// A base is a run of letters, digits and dots, optionally followed by a
/// parenthesized group. The whole run is taken, so `2x^2` squares `2x` and
/// `sin(x)^2` squares `sin(x)`.
fn base_start(out: &[char]) -> Option<usize> {
    let end = out.len();
    let last = *out.last()?;

    if last == ')' {
        let open = matching_open(out, end - 1)?;
        return Some(token_start(out, open));
    }

    if is_token_char(last) {
        return Some(token_start(out, end));
    }

    None
}

/// Where the exponent following a `^` at `start - 1` ends
///
/// Same shape as a base: a run of letters, digits and dots, optionally
/// followed by a parenthesized group. `x^2y` raises `x` to `2y`.
fn exponent_end(chars: &[char], start: usize) -> Option<usize> {
    let mut end = start;
    while end < chars.len() && is_token_char(chars[end]) {
        end += 1;
    }

    if chars.get(end) == Some(&'(') {
        return matching_close(chars, end).map(|i| i + 1);
    }

    (end > start).then_some(end)
}

/// One left-to-right sweep rewriting every `^` whose operands can be found
fn rewrite_exponents_once(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<char> = Vec::with_capacity(chars.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '^'
            && let Some(left) = base_start(&out)
            && let Some(right_end) = exponent_end(&chars, i + 1)
        {
            let base: String = out.drain(left..).collect();
            let exponent: String = chars[i + 1..right_end].iter().collect();
            out.extend(format!("pow({base},{exponent})").chars());
            i = right_end;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    out.into_iter().collect()
}

fn insert_implicit_multiplication(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if let Some(p) = prev {
            let after_digit = p.is_ascii_digit() && (c.is_ascii_alphabetic() || c == '(');
            let after_group = p == ')' && (c.is_ascii_alphanumeric() || c == '(');
            if after_digit || after_group {
                out.push('*');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

/// Respell called function names and split variables from a following group
fn canonicalize_identifiers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let starts_identifier =
            chars[i].is_ascii_alphabetic() && (i == 0 || !chars[i - 1].is_ascii_alphanumeric());
        if !starts_identifier {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut end = i;
        while end < chars.len() && chars[end].is_ascii_alphanumeric() {
            end += 1;
        }
        let name: String = chars[i..end].iter().collect();
        let is_call = chars.get(end) == Some(&'(');

        match CANONICAL_FUNCTIONS
            .iter()
            .find(|f| is_call && f.eq_ignore_ascii_case(&name))
        {
            Some(canonical) => out.push_str(canonical),
            None => out.push_str(&name),
        }
        if is_call && is_variable(&name) {
            out.push('*');
        }
        i = end;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        preprocess(raw).canonical
    }

    #[test]
    fn test_strips_whitespace_and_lowercases() {
        assert_eq!(canon(" Sin( X ) * Z "), "sin(x)*z");
    }

    #[test]
    fn test_empty_formula_is_zero() {
        assert_eq!(canon(""), "0");
        assert_eq!(canon("   "), "0");
    }

    #[test]
    fn test_pi_glyph() {
        assert_eq!(canon("π"), "pi");
        assert_eq!(canon("2π"), "2*pi");
        assert_eq!(canon("Π/2"), "pi/2");
    }

    #[test]
    fn test_simple_exponent() {
        assert_eq!(canon("x^2"), "pow(x,2)");
        assert_eq!(canon("2^x"), "pow(2,x)");
        assert_eq!(canon("x^2.5"), "pow(x,2.5)");
    }

    #[test]
    fn test_group_exponents() {
        assert_eq!(canon("(x/2)^2-(z/2)^2"), "pow((x/2),2)-pow((z/2),2)");
        assert_eq!(canon("(x+1)^(1/2)"), "pow((x+1),(1/2))");
    }

    #[test]
    fn test_function_call_as_base_and_exponent() {
        assert_eq!(canon("sin(x)^2"), "pow(sin(x),2)");
        assert_eq!(canon("e^sin(t)"), "pow(e,sin(t))");
    }

    #[test]
    fn test_whole_token_is_the_base() {
        assert_eq!(canon("2x^2"), "pow(2*x,2)");
        assert_eq!(canon("3(x+1)^2"), "pow(3*(x+1),2)");
        assert_eq!(canon("x(x+1)^2"), "pow(x*(x+1),2)");
        assert_eq!(canon("2sin(x)^2"), "pow(2*sin(x),2)");
    }

    #[test]
    fn test_whole_token_is_the_exponent() {
        assert_eq!(canon("x^2y"), "pow(x,2*y)");
        assert_eq!(canon("2^3x"), "pow(2,3*x)");
        assert_eq!(canon("x^2(z+1)"), "pow(x,2*(z+1))");
    }

    #[test]
    fn test_nested_exponents_take_several_passes() {
        assert_eq!(canon("x^(y^2)"), "pow(x,(pow(y,2)))");
    }

    #[test]
    fn test_chained_exponent_is_left_associative() {
        assert_eq!(canon("x^2^3"), "pow(pow(x,2),3)");
    }

    #[test]
    fn test_unresolvable_exponent_is_kept_with_warning() {
        let result = preprocess("x^-1");
        assert_eq!(result.canonical, "x^-1");
        assert_eq!(
            result.warnings,
            vec![PreprocessWarning::UnresolvedExponent { remaining: 1 }]
        );
    }

    #[test]
    fn test_exponent_cap() {
        // Six nesting levels, one resolved per pass
        let result = preprocess("x^(x^(x^(x^(x^(x^2)))))");
        assert_eq!(
            result.warnings,
            vec![PreprocessWarning::UnresolvedExponent { remaining: 1 }]
        );
        assert!(result.canonical.contains("x^2"));
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(canon("2x"), "2*x");
        assert_eq!(canon("1.5z"), "1.5*z");
        assert_eq!(canon("x(x+1)"), "x*(x+1)");
        assert_eq!(canon("pi(z)"), "pi*(z)");
        assert_eq!(canon("2(x+1)"), "2*(x+1)");
        assert_eq!(canon("(x+1)(x-1)"), "(x+1)*(x-1)");
        assert_eq!(canon("(x)2"), "(x)*2");
        assert_eq!(canon("(x)z"), "(x)*z");
        assert_eq!(canon("2sin(x)"), "2*sin(x)");
    }

    #[test]
    fn test_function_names_respelled() {
        assert_eq!(canon("CEILING(x)+Floor(z)"), "ceiling(x)+floor(z)");
        // Not called, so not a function name
        assert_eq!(canon("sin+1"), "sin+1");
        // Whole identifiers only
        assert_eq!(canon("asin(x)"), "asin(x)");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(canon("foo(x)+#"), "foo(x)+#");
    }

    #[test]
    fn test_idempotent_on_canonical_text() {
        let formulas = [
            "(x/2)^2-(z/2)^2",
            "t*sin(t*5)",
            "2x^2 + 3(x - 1)",
            "Sin(X)*Cos(Z)",
            "x^(y^2)",
            "sqrt(abs(x*z))/2π",
            "(x+1)(x-1)",
            "x(x+1)^2",
            "",
        ];
        for raw in formulas {
            let once = canon(raw);
            assert_eq!(canon(&once), once, "not idempotent for {raw:?}");
        }
    }
}
