//! Runtime value coercions. Every Jerboa value is an `i64`; this module holds the
//! handful of conversions the interpreter and parser need between that single type
//! and the text/boolean forms the language surfaces it through.

/// String → integer, per §4.3.1: a decimal parse that truncates toward zero, falling
/// back to `0` on any failure (including on `NumericLiteral` text carrying an
/// exponent, which `str::parse::<i64>` can't handle directly).
#[must_use]
pub fn text_to_int(text: &str) -> i64 {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return n;
    }
    if let Some(n) = parse_with_exponent(text) {
        return n;
    }
    // `readnum` hands back whatever the user typed, which may be a decimal such as
    // "3.5" or "-3.5" — the spec's truncate-toward-zero rule covers these too.
    text.parse::<f64>().map(|f| f as i64).unwrap_or(0)
}

/// Parses `[+-]?digits(E|e[+]?digits)?`, as produced by the lexer's `DIGIT`/`EXPONENT`
/// states, truncating any fractional result toward zero.
fn parse_with_exponent(text: &str) -> Option<i64> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => return None,
    };
    let mantissa: i64 = mantissa.parse().ok()?;
    let exponent: i32 = exponent.trim_start_matches('+').parse().ok()?;
    if exponent < 0 {
        // Not reachable through the lexer's grammar (no negative exponents), but
        // truncation toward zero is the right fallback if it ever is.
        let scale = 10i64.checked_pow(exponent.unsigned_abs())?;
        return Some(mantissa / scale);
    }
    let scale = 10i64.checked_pow(exponent.try_into().ok()?)?;
    mantissa.checked_mul(scale)
}

/// Boolean → integer, per §4.3.1.
#[must_use]
pub const fn bool_to_int(b: bool) -> i64 {
    if b {
        1
    } else {
        0
    }
}

/// Integer → boolean, per the "zero is false" convention used by `if`/`while`/`!`/`&&`/`||`.
#[must_use]
pub const fn int_to_bool(n: i64) -> bool {
    n != 0
}
