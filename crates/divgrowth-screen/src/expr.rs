//! Filter expressions over named screening metrics.
//!
//! A deliberately small language: numeric literals, booleans, variable names,
//! arithmetic (`+ - * / % **`), comparisons (`== != < <= > >=`, chainable as
//! in `1 < c5 < 20`) and boolean connectives (`and`/`or`/`not` or
//! `&&`/`||`/`!`). There are no function calls, attribute access, strings or
//! assignments, and the only names in scope are the ones handed in through
//! [`Variables`].
//!
//! `!` is an alias of `not` and has the same low precedence: `!up > 5` reads
//! as `not (up > 5)`. Input is limited to [`MAX_TOKENS`] tokens and
//! [`MAX_DEPTH`] levels of nesting.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Longest accepted expression, in tokens.
pub const MAX_TOKENS: usize = 1024;

/// Deepest accepted nesting of parentheses, prefix operators and exponents.
pub const MAX_DEPTH: usize = 64;

/// Errors raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// A character or token that does not belong in the grammar.
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),
    /// Input ended in the middle of an expression.
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    /// Structurally invalid input.
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),
    /// A name that is not a screening variable.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    /// Division or modulo by zero.
    #[error("Division by zero")]
    DivisionByZero,
    /// An operation produced a non-finite number.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Value {
    /// Numeric view; booleans count as `1` and `0`.
    pub const fn as_number(self) -> f64 {
        match self {
            Self::Number(n) => n,
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
        }
    }

    /// Truthiness: non-zero numbers and `true`.
    pub const fn is_truthy(self) -> bool {
        match self {
            Self::Number(n) => n != 0.0,
            Self::Bool(b) => b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Named numeric inputs for an expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: BTreeMap<String, f64>,
}

impl Variables {
    /// Creates an empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`, with the sign of the divisor
    Mod,
    /// `**`
    Pow,
}

/// Short-circuiting boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `not` / `!`
    Not,
    /// `-`
    Neg,
    /// `+`
    Pos,
}

/// Expression AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number literal
    Number(f64),
    /// Boolean literal
    Bool(bool),
    /// Variable reference
    Variable(String),
    /// Unary operation
    Unary {
        /// Operator
        op: UnaryOperator,
        /// Operand
        expr: Box<Expr>,
    },
    /// Binary operation
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: BinaryOperator,
        /// Right operand
        right: Box<Expr>,
    },
    /// Boolean connective
    Logical {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: LogicalOperator,
        /// Right operand
        right: Box<Expr>,
    },
    /// Comparison chain: `a < b <= c` holds when every adjacent pair holds.
    Compare {
        /// Leftmost operand
        first: Box<Expr>,
        /// Each further operator and operand
        rest: Vec<(CompareOperator, Expr)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Bool(bool),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Eof,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Numbers, with optional fraction and exponent
        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit)) {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value: f64 = text
                .parse()
                .map_err(|_| ExpressionError::InvalidSyntax(format!("Invalid number: {text}")))?;
            tokens.push(Token::Number(value));
            continue;
        }

        // Identifiers and keywords
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            let token = match ident.as_str() {
                "true" | "True" => Token::Bool(true),
                "false" | "False" => Token::Bool(false),
                "and" => Token::And,
                "or" => Token::Or,
                "not" => Token::Not,
                _ => Token::Ident(ident),
            };
            tokens.push(token);
            continue;
        }

        // Multi-character operators
        if i + 1 < chars.len() {
            let two: String = chars[i..i + 2].iter().collect();
            let token = match two.as_str() {
                "**" => Some(Token::StarStar),
                "==" => Some(Token::Eq),
                "!=" => Some(Token::Ne),
                "<=" => Some(Token::Le),
                ">=" => Some(Token::Ge),
                "&&" => Some(Token::And),
                "||" => Some(Token::Or),
                _ => None,
            };
            if let Some(t) = token {
                tokens.push(t);
                i += 2;
                continue;
            }
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '<' => Token::Lt,
            '>' => Token::Gt,
            '!' => Token::Not,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => return Err(ExpressionError::UnexpectedToken(c.to_string())),
        };
        tokens.push(token);
        i += 1;
    }

    if tokens.len() > MAX_TOKENS {
        return Err(ExpressionError::InvalidSyntax(format!(
            "expression longer than {MAX_TOKENS} tokens"
        )));
    }
    tokens.push(Token::Eof);
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Runs `parse` one nesting level deeper.
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Expr, ExpressionError>,
    ) -> Result<Expr, ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::InvalidSyntax(
                "expression nested too deeply".into(),
            ));
        }
        self.depth += 1;
        let expr = parse(self);
        self.depth -= 1;
        expr
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn parse(mut self) -> Result<Expr, ExpressionError> {
        let expr = self.parse_or()?;
        match self.current() {
            Token::Eof => Ok(expr),
            other => Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_and()?;
        while matches!(self.current(), Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOperator::Or,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_not()?;
        while matches!(self.current(), Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Expr::Logical {
                left: Box::new(left),
                op: LogicalOperator::And,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ExpressionError> {
        if matches!(self.current(), Token::Not) {
            self.advance();
            let expr = self.nested(Self::parse_not)?;
            return Ok(Expr::Unary {
                op: UnaryOperator::Not,
                expr: Box::new(expr),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExpressionError> {
        let first = self.parse_additive()?;
        let mut rest = Vec::new();

        loop {
            let op = match self.current() {
                Token::Eq => CompareOperator::Eq,
                Token::Ne => CompareOperator::Ne,
                Token::Lt => CompareOperator::Lt,
                Token::Le => CompareOperator::Le,
                Token::Gt => CompareOperator::Gt,
                Token::Ge => CompareOperator::Ge,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_additive()?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current() {
                Token::Star => BinaryOperator::Mul,
                Token::Slash => BinaryOperator::Div,
                Token::Percent => BinaryOperator::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.current() {
            Token::Minus => UnaryOperator::Neg,
            Token::Plus => UnaryOperator::Pos,
            _ => return self.parse_power(),
        };
        self.advance();
        let expr = self.nested(Self::parse_unary)?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.parse_primary()?;
        if matches!(self.current(), Token::StarStar) {
            self.advance();
            // Right-associative; the exponent may carry a sign.
            let exponent = self.nested(Self::parse_unary)?;
            return Ok(Expr::Binary {
                left: Box::new(base),
                op: BinaryOperator::Pow,
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        let expr = match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                Expr::Number(n)
            }
            Token::Bool(b) => {
                self.advance();
                Expr::Bool(b)
            }
            Token::Ident(name) => {
                self.advance();
                Expr::Variable(name)
            }
            Token::LParen => {
                self.advance();
                let expr = self.nested(Self::parse_or)?;
                if !matches!(self.current(), Token::RParen) {
                    return Err(ExpressionError::InvalidSyntax("Expected ')'".into()));
                }
                self.advance();
                expr
            }
            Token::Eof => return Err(ExpressionError::UnexpectedEnd),
            other => return Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
        };
        Ok(expr)
    }
}

/// Hyphenated spellings accepted for readability on the command line.
const HYPHENATED: [(&str, &str); 6] = [
    ("years-up", "years_up"),
    ("years-stalled", "years_stalled"),
    ("years-reduced", "years_reduced"),
    ("years-stopped", "years_stopped"),
    ("avg-yield", "avg_yield"),
    ("cagr-overall", "cagr_overall"),
];

/// A parsed filter expression.
///
/// # Examples
///
/// ```
/// use divgrowth_screen::{Expression, Variables};
///
/// let expr = Expression::parse("(years_stopped + years_stalled) * 2 <= years_up").unwrap();
/// let mut vars = Variables::new();
/// vars.set("years_up", 8.0).set("years_stalled", 1.0).set("years_stopped", 2.0);
/// assert!(expr.matches(&vars).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Expr,
}

impl Expression {
    /// Parses `input`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExpressionError`] describing the first syntax problem.
    pub fn parse(input: &str) -> Result<Self, ExpressionError> {
        let mut normalized = input.to_string();
        for (hyphenated, underscored) in HYPHENATED {
            normalized = normalized.replace(hyphenated, underscored);
        }
        let ast = Parser::new(tokenize(&normalized)?).parse()?;
        Ok(Self {
            source: input.to_string(),
            ast,
        })
    }

    /// The text the expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed syntax tree.
    pub const fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Evaluates the expression.
    ///
    /// # Errors
    ///
    /// Fails on unknown variables, division by zero and non-finite powers.
    pub fn evaluate(&self, vars: &Variables) -> Result<Value, ExpressionError> {
        eval(&self.ast, vars)
    }

    /// Evaluates the expression and returns its truthiness.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub fn matches(&self, vars: &Variables) -> Result<bool, ExpressionError> {
        self.evaluate(vars).map(Value::is_truthy)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn eval(expr: &Expr, vars: &Variables) -> Result<Value, ExpressionError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Variable(name) => vars
            .get(name)
            .map(Value::Number)
            .ok_or_else(|| ExpressionError::UnknownVariable(name.clone())),
        Expr::Unary { op, expr } => {
            let value = eval(expr, vars)?;
            Ok(match op {
                UnaryOperator::Not => Value::Bool(!value.is_truthy()),
                UnaryOperator::Neg => Value::Number(-value.as_number()),
                UnaryOperator::Pos => Value::Number(value.as_number()),
            })
        }
        Expr::Binary { left, op, right } => {
            let lhs = eval(left, vars)?.as_number();
            arithmetic(*op, lhs, eval(right, vars)?.as_number())
        }
        Expr::Logical { left, op, right } => {
            let lhs = eval(left, vars)?;
            // Short-circuit, yielding the deciding operand
            match op {
                LogicalOperator::And if !lhs.is_truthy() => Ok(lhs),
                LogicalOperator::Or if lhs.is_truthy() => Ok(lhs),
                LogicalOperator::And | LogicalOperator::Or => eval(right, vars),
            }
        }
        Expr::Compare { first, rest } => {
            let mut lhs = eval(first, vars)?.as_number();
            for (op, right) in rest {
                let rhs = eval(right, vars)?.as_number();
                let holds = match op {
                    CompareOperator::Eq => lhs == rhs,
                    CompareOperator::Ne => lhs != rhs,
                    CompareOperator::Lt => lhs < rhs,
                    CompareOperator::Le => lhs <= rhs,
                    CompareOperator::Gt => lhs > rhs,
                    CompareOperator::Ge => lhs >= rhs,
                };
                if !holds {
                    return Ok(Value::Bool(false));
                }
                lhs = rhs;
            }
            Ok(Value::Bool(true))
        }
    }
}

fn arithmetic(op: BinaryOperator, a: f64, b: f64) -> Result<Value, ExpressionError> {
    let result = match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => {
            if b == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            a / b
        }
        BinaryOperator::Mod => {
            if b == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            // Result takes the sign of the divisor.
            a - b * (a / b).floor()
        }
        BinaryOperator::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            let p = a.powf(b);
            if !p.is_finite() {
                return Err(ExpressionError::Arithmetic(format!("{a} ** {b}")));
            }
            p
        }
    };
    Ok(Value::Number(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vars() -> Variables {
        let mut vars = Variables::new();
        vars.set("up", 8.0)
            .set("stalled", 1.0)
            .set("reduced", 0.0)
            .set("stopped", 2.0)
            .set("yield", 3.5)
            .set("c5", 12.0)
            .set("years_up", 8.0)
            .set("years_stalled", 1.0)
            .set("years_stopped", 2.0);
        vars
    }

    fn eval_str(input: &str) -> Result<Value, ExpressionError> {
        Expression::parse(input)?.evaluate(&vars())
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = tokenize("42 + 3.14 * 1e2").unwrap();
        assert_eq!(tokens[0], Token::Number(42.0));
        assert_eq!(tokens[1], Token::Plus);
        assert_eq!(tokens[2], Token::Number(3.14));
        assert_eq!(tokens[4], Token::Number(100.0));
    }

    #[test]
    fn test_tokenize_rejects_foreign_characters() {
        assert!(matches!(
            tokenize("up; drop"),
            Err(ExpressionError::UnexpectedToken(ref t)) if t == ";"
        ));
        assert!(tokenize("__import__('os')").is_err());
        assert!(tokenize("up.real").is_err());
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval_str("2 + 3 * 4").unwrap(), Value::Number(14.0));
        assert_eq!(eval_str("(2 + 3) * 4").unwrap(), Value::Number(20.0));
        assert_eq!(eval_str("-2 ** 2").unwrap(), Value::Number(-4.0));
        assert_eq!(eval_str("2 ** 3 ** 2").unwrap(), Value::Number(512.0));
        assert_eq!(eval_str("2 ** -1").unwrap(), Value::Number(0.5));
        assert_eq!(eval_str("7 % 3").unwrap(), Value::Number(1.0));
        assert_eq!(eval_str("-7 % 3").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_classic_condition() {
        let expr = Expression::parse("(years_stopped + years_stalled) * 2 <= years_up").unwrap();
        assert!(expr.matches(&vars()).unwrap());
    }

    #[test]
    fn test_hyphenated_names() {
        let expr = Expression::parse("(years-stopped + years-stalled) * 2 <= years-up").unwrap();
        assert!(expr.matches(&vars()).unwrap());
        assert_eq!(expr.source(), "(years-stopped + years-stalled) * 2 <= years-up");
    }

    #[test]
    fn test_boolean_connectives() {
        assert!(eval_str("up > 5 and yield >= 3").unwrap().is_truthy());
        assert!(eval_str("up > 5 && yield >= 3").unwrap().is_truthy());
        assert!(!eval_str("up > 10 or stopped == 0").unwrap().is_truthy());
        assert!(eval_str("not stopped == 0").unwrap().is_truthy());
        assert!(eval_str("!reduced").unwrap().is_truthy());
        assert!(eval_str("True and not False").unwrap().is_truthy());
    }

    #[test]
    fn test_chained_comparison() {
        assert!(eval_str("10 < c5 < 20").unwrap().is_truthy());
        assert!(!eval_str("0 < c5 < 10").unwrap().is_truthy());
        assert!(eval_str("1 <= stalled == 1 < up").unwrap().is_truthy());
    }

    #[test]
    fn test_short_circuit_skips_errors() {
        assert!(!eval_str("up > 100 and missing > 0").unwrap().is_truthy());
        assert!(eval_str("up > 1 or 1 / 0").unwrap().is_truthy());
    }

    #[test]
    fn test_unknown_variable() {
        assert_eq!(
            eval_str("dividends > 3"),
            Err(ExpressionError::UnknownVariable("dividends".to_string()))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval_str("up / reduced"), Err(ExpressionError::DivisionByZero));
        assert_eq!(eval_str("up % 0"), Err(ExpressionError::DivisionByZero));
        assert_eq!(eval_str("0 ** -1"), Err(ExpressionError::DivisionByZero));
    }

    #[test]
    fn test_non_finite_power() {
        assert!(matches!(eval_str("10 ** 1000"), Err(ExpressionError::Arithmetic(_))));
        assert!(matches!(eval_str("(-8) ** 0.5"), Err(ExpressionError::Arithmetic(_))));
    }

    #[test]
    fn test_malformed_syntax() {
        assert_eq!(Expression::parse("up >"), Err(ExpressionError::UnexpectedEnd));
        assert!(matches!(
            Expression::parse("(up > 1"),
            Err(ExpressionError::InvalidSyntax(_))
        ));
        assert!(matches!(
            Expression::parse("up 1"),
            Err(ExpressionError::UnexpectedToken(_))
        ));
        assert_eq!(Expression::parse(""), Err(ExpressionError::UnexpectedEnd));
    }

    #[test]
    fn test_bang_has_not_precedence() {
        assert_eq!(eval_str("!up > 5").unwrap(), Value::Bool(false));
        assert_eq!(eval_str("not up > 5").unwrap(), Value::Bool(false));
        assert!(eval_str("up > 1 && !reduced").unwrap().is_truthy());
        assert!(matches!(
            Expression::parse("1 + not 0"),
            Err(ExpressionError::UnexpectedToken(_))
        ));
        assert!(matches!(
            Expression::parse("-!up"),
            Err(ExpressionError::UnexpectedToken(_))
        ));
    }

    #[test]
    fn test_logical_nodes_kept_apart_from_arithmetic() {
        let expr = Expression::parse("up - 1 and stopped").unwrap();
        assert!(matches!(
            expr.ast(),
            Expr::Logical {
                op: LogicalOperator::And,
                ..
            }
        ));
        assert_eq!(expr.evaluate(&vars()).unwrap(), Value::Number(2.0));
        assert_eq!(eval_str("reduced or up").unwrap(), Value::Number(8.0));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let parens = format!("{}up{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(
            Expression::parse(&parens),
            Err(ExpressionError::InvalidSyntax(_))
        ));
        let signs = format!("{}1", "-".repeat(10_000));
        assert!(matches!(
            Expression::parse(&signs),
            Err(ExpressionError::InvalidSyntax(_))
        ));

        // Within the token limit, but past the nesting limit
        let parens = format!("{}up{}", "(".repeat(200), ")".repeat(200));
        assert!(matches!(
            Expression::parse(&parens),
            Err(ExpressionError::InvalidSyntax(ref m)) if m.contains("nested")
        ));
        for input in [
            format!("{}1", "-".repeat(500)),
            format!("{}up", "not ".repeat(100)),
            format!("{}2", "2 ** ".repeat(100)),
        ] {
            assert!(matches!(
                Expression::parse(&input),
                Err(ExpressionError::InvalidSyntax(ref m)) if m.contains("nested")
            ));
        }
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let parens = format!("{}up{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(eval_str(&parens).unwrap(), Value::Number(8.0));
        assert_eq!(eval_str("- - -1").unwrap(), Value::Number(-1.0));
        assert!(eval_str("not not not reduced").unwrap().is_truthy());
    }

    #[test]
    fn test_long_chains_are_bounded() {
        let chain = format!("{}1", "1 + ".repeat(300));
        assert_eq!(eval_str(&chain).unwrap(), Value::Number(301.0));

        let chain = format!("{}1", "1 + ".repeat(5_000));
        assert!(matches!(
            Expression::parse(&chain),
            Err(ExpressionError::InvalidSyntax(ref m)) if m.contains("tokens")
        ));
    }

    #[test]
    fn test_numeric_result_truthiness() {
        let value = eval_str("yield * 2").unwrap();
        assert_relative_eq!(value.as_number(), 7.0);
        assert!(value.is_truthy());
        assert!(!eval_str("reduced").unwrap().is_truthy());
    }
}
