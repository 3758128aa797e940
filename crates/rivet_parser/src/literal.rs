//! Integer literal decoding shared by the parser and the evaluator.

/// Decodes a decimal or sized literal into a two-state integer.
///
/// Accepts `42`, `1_000`, `4'b1010`, `8'hFF`, `'d3`, and signed forms like
/// `8'sh7f`. `x`, `z`, and `?` digits in based literals read as 0. Values wrap on
/// overflow and sized literals are truncated to their width. Returns `None` for
/// anything that is not a literal, identifiers included.
pub fn parse_literal(text: &str) -> Option<i64> {
    let text = text.trim();
    let Some(tick) = text.find('\'') else {
        if !text.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        return parse_digits(text, 10, false);
    };

    let (size, rest) = text.split_at(tick);
    let rest = &rest[1..];
    let rest = rest.strip_prefix(['s', 'S']).unwrap_or(rest);
    let mut chars = rest.chars();
    let radix = match chars.next()?.to_ascii_lowercase() {
        'b' => 2,
        'o' => 8,
        'd' => 10,
        'h' => 16,
        _ => return None,
    };
    let value = parse_digits(chars.as_str(), radix, true)?;

    if size.is_empty() {
        return Some(value);
    }
    let width = parse_digits(size, 10, false)?;
    Some(mask(value, width))
}

/// Folds `A op B op C ...` strictly left to right.
///
/// Operands are literals or names resolved through `lookup`; operators are
/// `+ - * / <<`. Parentheses are ignored. Used for range bounds and parameter
/// values, where expressions like `WIDTH-1` are the norm.
pub fn fold_constant<'a>(
    words: impl IntoIterator<Item = &'a str>,
    lookup: impl Fn(&str) -> Option<i64>,
) -> Option<i64> {
    let words: Vec<&str> = words
        .into_iter()
        .filter(|w| *w != "(" && *w != ")")
        .collect();
    let operand = |w: &str| parse_literal(w).or_else(|| lookup(w));
    let (first, rest) = words.split_first()?;
    let mut value = operand(*first)?;
    for pair in rest.chunks(2) {
        let [op, rhs] = pair else {
            return None;
        };
        let rhs = operand(*rhs)?;
        value = match *op {
            "+" => value.wrapping_add(rhs),
            "-" => value.wrapping_sub(rhs),
            "*" => value.wrapping_mul(rhs),
            "/" if rhs != 0 => value.wrapping_div(rhs),
            "<<" if (0..64).contains(&rhs) => value.wrapping_shl(rhs as u32),
            _ => return None,
        };
    }
    Some(value)
}

fn parse_digits(digits: &str, radix: u32, allow_unknown: bool) -> Option<i64> {
    let mut value: u64 = 0;
    let mut any = false;
    for ch in digits.chars() {
        if ch == '_' {
            continue;
        }
        let digit = match ch.to_ascii_lowercase() {
            'x' | 'z' | '?' if allow_unknown => 0,
            c => c.to_digit(radix)?,
        };
        value = value
            .wrapping_mul(u64::from(radix))
            .wrapping_add(u64::from(digit));
        any = true;
    }
    any.then_some(value as i64)
}

fn mask(value: i64, width: i64) -> i64 {
    if (1..64).contains(&width) {
        value & (u64::MAX >> (64 - width)) as i64
    } else {
        value
    }
}
