//! Expression evaluator over named signal state.
//!
//! [`evaluate`] handles exactly three shapes of space-separated text: a single
//! operand, a unary operator and operand, or `lhs op rhs`. Anything else,
//! including unbound names and unknown operators, evaluates to 0. The evaluator
//! never fails.

use std::collections::{BTreeMap, HashMap};

use rivet_parser::parse_literal;

/// Read access to named integer values.
pub trait SignalEnv {
    /// Returns the current value of `name`, or `None` if it is unbound.
    fn value(&self, name: &str) -> Option<i64>;
}

impl SignalEnv for HashMap<String, i64> {
    fn value(&self, name: &str) -> Option<i64> {
        self.get(name).copied()
    }
}

impl SignalEnv for BTreeMap<String, i64> {
    fn value(&self, name: &str) -> Option<i64> {
        self.get(name).copied()
    }
}

impl<T: SignalEnv + ?Sized> SignalEnv for &T {
    fn value(&self, name: &str) -> Option<i64> {
        (**self).value(name)
    }
}

/// Evaluates `expr` against `env`.
///
/// ```
/// use std::collections::HashMap;
/// use rivet_sim::evaluate;
///
/// let env: HashMap<String, i64> = [("a".to_string(), 6), ("b".to_string(), 3)].into();
/// assert_eq!(evaluate("a & b", &env), 2);
/// assert_eq!(evaluate("4'b1010", &env), 10);
/// assert_eq!(evaluate("a + b + 1", &env), 0);
/// ```
pub fn evaluate(expr: &str, env: &impl SignalEnv) -> i64 {
    let tokens: Vec<&str> = expr.split_whitespace().collect();
    match tokens.as_slice() {
        [operand] => operand_value(operand, env),
        [op, operand] => unary(op, operand_value(operand, env)),
        [lhs, op, rhs] => binary(operand_value(lhs, env), op, operand_value(rhs, env)),
        _ => 0,
    }
}

fn operand_value(token: &str, env: &impl SignalEnv) -> i64 {
    signed_literal(token)
        .or_else(|| env.value(token))
        .unwrap_or(0)
}

/// A literal with an optional leading `-`, as in `-1` or `-4'd3`.
fn signed_literal(token: &str) -> Option<i64> {
    match token.strip_prefix('-') {
        Some(magnitude) => parse_literal(magnitude).map(i64::wrapping_neg),
        None => parse_literal(token),
    }
}

fn unary(op: &str, value: i64) -> i64 {
    match op {
        "~" => !value,
        "!" => i64::from(value == 0),
        "-" => value.wrapping_neg(),
        _ => 0,
    }
}

fn binary(lhs: i64, op: &str, rhs: i64) -> i64 {
    match op {
        "+" => lhs.wrapping_add(rhs),
        "-" => lhs.wrapping_sub(rhs),
        "*" => lhs.wrapping_mul(rhs),
        "/" if rhs == 0 => 0,
        "/" => lhs.wrapping_div(rhs),
        "%" if rhs == 0 => 0,
        "%" => lhs.wrapping_rem(rhs),
        "&" => lhs & rhs,
        "|" => lhs | rhs,
        "^" => lhs ^ rhs,
        "<<" => shift_amount(rhs).map_or(0, |n| lhs.wrapping_shl(n)),
        ">>" => shift_amount(rhs).map_or(0, |n| ((lhs as u64) >> n) as i64),
        "==" => i64::from(lhs == rhs),
        "!=" => i64::from(lhs != rhs),
        "<" => i64::from(lhs < rhs),
        ">" => i64::from(lhs > rhs),
        "<=" => i64::from(lhs <= rhs),
        ">=" => i64::from(lhs >= rhs),
        "&&" => i64::from(lhs != 0 && rhs != 0),
        "||" => i64::from(lhs != 0 || rhs != 0),
        _ => 0,
    }
}

fn shift_amount(rhs: i64) -> Option<u32> {
    u32::try_from(rhs).ok().filter(|n| *n < 64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn single_operands() {
        let e = env(&[("a", 7)]);
        assert_eq!(evaluate("42", &e), 42);
        assert_eq!(evaluate("4'b1010", &e), 10);
        assert_eq!(evaluate("8'hff", &e), 255);
        assert_eq!(evaluate("a", &e), 7);
        assert_eq!(evaluate("missing", &e), 0);
        assert_eq!(evaluate("", &e), 0);
    }

    #[test]
    fn binary_operators() {
        let e = env(&[("a", 6), ("b", 3)]);
        assert_eq!(evaluate("2 + 3", &e), 5);
        assert_eq!(evaluate("a & b", &e), 2);
        assert_eq!(evaluate("a | b", &e), 7);
        assert_eq!(evaluate("a ^ b", &e), 5);
        assert_eq!(evaluate("a - b", &e), 3);
        assert_eq!(evaluate("a * b", &e), 18);
        assert_eq!(evaluate("a / b", &e), 2);
        assert_eq!(evaluate("a << 2", &e), 24);
        assert_eq!(evaluate("a >> 1", &e), 3);
        assert_eq!(evaluate("a == 6", &e), 1);
        assert_eq!(evaluate("a != 6", &e), 0);
        assert_eq!(evaluate("b < a", &e), 1);
        assert_eq!(evaluate("b >= a", &e), 0);
        assert_eq!(evaluate("a && 0", &e), 0);
        assert_eq!(evaluate("a || 0", &e), 1);
    }

    #[test]
    fn unary_operators() {
        let e = env(&[("a", 0), ("b", 5)]);
        assert_eq!(evaluate("! a", &e), 1);
        assert_eq!(evaluate("! b", &e), 0);
        assert_eq!(evaluate("~ a", &e), -1);
        assert_eq!(evaluate("- b", &e), -5);
        assert_eq!(evaluate("? b", &e), 0);
    }

    #[test]
    fn degenerate_forms_are_zero() {
        let e = env(&[("a", 1)]);
        assert_eq!(evaluate("a / 0", &e), 0);
        assert_eq!(evaluate("a % 0", &e), 0);
        assert_eq!(evaluate("a << 64", &e), 0);
        assert_eq!(evaluate("a >> -1", &e), 0);
        assert_eq!(evaluate("a ** 2", &e), 0);
        assert_eq!(evaluate("a + a + a", &e), 0);
        assert_eq!(evaluate("a+1", &e), 0);
    }

    #[test]
    fn negative_literals() {
        let e = env(&[("a", 4)]);
        assert_eq!(evaluate("-1", &e), -1);
        assert_eq!(evaluate("a + -1", &e), 3);
        assert_eq!(evaluate("-4'd3", &e), -3);
        assert_eq!(evaluate("-a", &e), 0);
        assert_eq!(evaluate("63'd5", &e), 5);
    }

    #[test]
    fn arithmetic_wraps() {
        let e = env(&[("big", i64::MAX)]);
        assert_eq!(evaluate("big + 1", &e), i64::MIN);
        assert_eq!(evaluate("big * 2", &e), -2);
    }

    #[test]
    fn works_over_btreemap_and_refs() {
        let mut e = BTreeMap::new();
        e.insert("x".to_string(), 9);
        let r = &e;
        assert_eq!(evaluate("x + 1", &r), 10);
    }
}
