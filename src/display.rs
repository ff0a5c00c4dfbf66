//! Display implementations for expressions.
//!
//! Three notations share one precedence-aware algorithm and differ only in
//! their symbol tables and bracket syntax:
//!
//! ## Standard (`to_string()` / `{}`)
//! - `a*b+c`, `(a+b)*c`, `a-(b-c)`
//! - `sqrt(x+1)`, `sqr(x)`, `log10(x)`, `pi`
//!
//! ## LaTeX (`to_latex()`)
//! - `\frac{x+1}{2}`, `x^{y+1}`, `a \cdot b`
//! - `\sqrt{x}`, `\ln\left(x\right)`, `\pi`
//!
//! ## Unicode (`to_unicode()`)
//! - `x²+2·x−1`, `√(x)`, `π`
//!
//! Numbers are rendered with a configurable number of significant digits in
//! the style of C's `%g`. Containers render as their name unless the format
//! requests expansion.

use std::fmt;

use crate::DEFAULT_PRECISION;
use crate::ast::{BinaryOp, Expr, ExprKind, Lambda, Leaf, Precedence, UnaryOp, Var};
use crate::traits::{INTEGER_TOLERANCE, MathScalar};

// =============================================================================
// FORMAT SETTINGS
// =============================================================================

/// Output notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notation {
    #[default]
    Standard,
    Latex,
    Unicode,
}

/// Formatter settings: display precision, container expansion and notation.
///
/// ```ignore
/// let text = Format::new(4).expand(true).latex().render(&expr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Significant digits for numeric leaves
    pub precision: usize,
    /// Render containers as their inner expression instead of their name
    pub expand: bool,
    pub notation: Notation,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            expand: false,
            notation: Notation::Standard,
        }
    }
}

impl Format {
    pub fn new(precision: usize) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    pub fn latex(self) -> Self {
        self.notation(Notation::Latex)
    }

    pub fn unicode(self) -> Self {
        self.notation(Notation::Unicode)
    }

    /// Render an expression with these settings
    pub fn render<T: MathScalar>(&self, expr: &Expr<T>) -> String {
        Rendered { expr, format: self }.to_string()
    }

    /// Render a bare scalar with these settings
    pub fn number<T: MathScalar>(&self, value: T) -> String {
        format_number(value, self.precision, self.notation)
    }
}

/// An expression paired with the settings to render it with
pub struct Rendered<'a, T: MathScalar> {
    pub(crate) expr: &'a Expr<T>,
    pub(crate) format: &'a Format,
}

impl<T: MathScalar> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.expr, self.format)
    }
}

// =============================================================================
// SYMBOL TABLES
// =============================================================================

/// Greek letters: (name, latex, unicode)
static GREEK_LETTERS: &[(&str, &str, &str)] = &[
    ("alpha", r"\alpha", "\u{3b1}"),
    ("beta", r"\beta", "\u{3b2}"),
    ("gamma", r"\gamma", "\u{3b3}"),
    ("delta", r"\delta", "\u{3b4}"),
    ("epsilon", r"\epsilon", "\u{3b5}"),
    ("theta", r"\theta", "\u{3b8}"),
    ("lambda", r"\lambda", "\u{3bb}"),
    ("mu", r"\mu", "\u{3bc}"),
    ("pi", r"\pi", "\u{3c0}"),
    ("rho", r"\rho", "\u{3c1}"),
    ("sigma", r"\sigma", "\u{3c3}"),
    ("tau", r"\tau", "\u{3c4}"),
    ("phi", r"\phi", "\u{3c6}"),
    ("omega", r"\omega", "\u{3c9}"),
];

fn greek_to_latex(name: &str) -> Option<&'static str> {
    GREEK_LETTERS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, latex, _)| *latex)
}

fn greek_to_unicode(name: &str) -> Option<&'static str> {
    GREEK_LETTERS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, _, unicode)| *unicode)
}

fn binary_symbol(op: BinaryOp, notation: Notation) -> &'static str {
    match (notation, op) {
        (Notation::Latex, BinaryOp::Mul) => r" \cdot ",
        (Notation::Unicode, BinaryOp::Mul) => "\u{b7}",
        (Notation::Unicode, BinaryOp::Sub) => "\u{2212}",
        (_, op) => op.symbol(),
    }
}

fn latex_function(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Log => r"\ln",
        UnaryOp::Log10 => r"\log_{10}",
        UnaryOp::Sin => r"\sin",
        UnaryOp::Asin => r"\arcsin",
        UnaryOp::Cos => r"\cos",
        UnaryOp::Acos => r"\arccos",
        UnaryOp::Tan => r"\tan",
        UnaryOp::Atan => r"\arctan",
        UnaryOp::Sinh => r"\sinh",
        UnaryOp::Asinh => r"\operatorname{arsinh}",
        UnaryOp::Cosh => r"\cosh",
        UnaryOp::Acosh => r"\operatorname{arcosh}",
        UnaryOp::Tanh => r"\tanh",
        UnaryOp::Atanh => r"\operatorname{artanh}",
        // Rendered with dedicated syntax in write_unary
        UnaryOp::Negate | UnaryOp::Sqrt | UnaryOp::Square | UnaryOp::Abs => op.name(),
    }
}

fn open_paren(notation: Notation) -> &'static str {
    match notation {
        Notation::Latex => r"\left(",
        Notation::Standard | Notation::Unicode => "(",
    }
}

fn close_paren(notation: Notation) -> &'static str {
    match notation {
        Notation::Latex => r"\right)",
        Notation::Standard | Notation::Unicode => ")",
    }
}

#[inline]
const fn to_superscript(c: char) -> char {
    match c {
        '0' => '\u{2070}',
        '1' => '\u{b9}',
        '2' => '\u{b2}',
        '3' => '\u{b3}',
        '4' => '\u{2074}',
        '5' => '\u{2075}',
        '6' => '\u{2076}',
        '7' => '\u{2077}',
        '8' => '\u{2078}',
        '9' => '\u{2079}',
        '-' => '\u{207b}',
        _ => c,
    }
}

/// Superscript form of a small integral exponent, `None` otherwise
fn superscript_exponent<T: MathScalar>(exponent: &Expr<T>) -> Option<String> {
    let leaf = exponent.as_leaf()?;
    if !leaf.displays_value() {
        return None;
    }
    let value = leaf.value().to_f64()?;
    if !value.is_finite() || value.abs() >= 1000.0 || (value - value.round()).abs() > INTEGER_TOLERANCE
    {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)] // Checked integral and small above
    let n = value.round() as i64;
    Some(n.to_string().chars().map(to_superscript).collect())
}

// =============================================================================
// NUMBERS
// =============================================================================

/// Render a finite `f64` like C's `%g` with `precision` significant digits
pub fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let digits = precision as i32;
    if exponent < -4 || exponent >= digits {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        #[allow(clippy::cast_sign_loss)] // exponent < digits here
        let decimals = (digits - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

fn format_number<T: MathScalar>(value: T, precision: usize, notation: Notation) -> String {
    let n = value.to_f64().unwrap_or(f64::NAN);
    if n.is_nan() {
        return match notation {
            Notation::Standard | Notation::Unicode => "NaN".to_string(),
            Notation::Latex => r"\text{NaN}".to_string(),
        };
    }
    if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        return match notation {
            Notation::Standard => format!("{sign}Infinity"),
            Notation::Latex => format!(r"{sign}\infty"),
            Notation::Unicode => format!("{}\u{221e}", if n > 0.0 { "" } else { "\u{2212}" }),
        };
    }
    let text = format_general(n, precision);
    match notation {
        Notation::Unicode => text.replacen('-', "\u{2212}", 1),
        Notation::Standard | Notation::Latex => text,
    }
}

// =============================================================================
// RECURSIVE RENDERING
// =============================================================================

/// The node that is actually drawn: expanded containers are looked through
fn resolve<T: MathScalar>(expr: &Expr<T>, format: &Format) -> Expr<T> {
    match expr.container_inner() {
        Some(inner) if format.expand => resolve(&inner, format),
        _ => expr.clone(),
    }
}

fn is_negation<T: MathScalar>(expr: &Expr<T>) -> bool {
    matches!(expr.kind(), ExprKind::Unary(UnaryOp::Negate, _))
}

/// Atomic operands print without brackets after a prefix operator
fn is_atomic<T: MathScalar>(expr: &Expr<T>) -> bool {
    expr.precedence() == Precedence::Parentheses && !is_negation(expr)
}

/// Parenthesization rule for one operand of a binary node. `use_commutation`
/// marks the side that is free to reorder: the right side of left-associative
/// operators and the left side of right-associative ones.
fn needs_parens<T: MathScalar>(parent: BinaryOp, child: &Expr<T>, use_commutation: bool) -> bool {
    if is_negation(child) {
        return use_commutation || parent.is_right_associative();
    }
    let p = parent.precedence();
    let c = child.precedence();
    if !use_commutation || parent.is_commutative() {
        p < c
    } else {
        p <= c
    }
}

fn write_expr<T: MathScalar>(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr<T>,
    format: &Format,
) -> fmt::Result {
    match expr.kind() {
        ExprKind::Leaf(leaf) => write_leaf(f, leaf, format),
        ExprKind::Unary(op, child) => write_unary(f, *op, child, format),
        ExprKind::Binary(op, left, right) => write_binary(f, *op, left, right, format),
        ExprKind::Container { name, inner } => {
            if format.expand {
                let inner = inner.borrow().clone();
                write_expr(f, &inner, format)
            } else {
                write_name(f, name, format.notation)
            }
        }
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str, notation: Notation) -> fmt::Result {
    let glyph = match notation {
        Notation::Standard => None,
        Notation::Latex => greek_to_latex(name),
        Notation::Unicode => greek_to_unicode(name),
    };
    f.write_str(glyph.unwrap_or(name))
}

fn write_leaf<T: MathScalar>(
    f: &mut fmt::Formatter<'_>,
    leaf: &Leaf<T>,
    format: &Format,
) -> fmt::Result {
    match leaf.name() {
        Some(name) if !leaf.displays_value() => write_name(f, name, format.notation),
        _ => f.write_str(&format.number(leaf.value())),
    }
}

fn write_wrapped<T: MathScalar>(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr<T>,
    parens: bool,
    format: &Format,
) -> fmt::Result {
    if parens {
        f.write_str(open_paren(format.notation))?;
        write_expr(f, expr, format)?;
        f.write_str(close_paren(format.notation))
    } else {
        write_expr(f, expr, format)
    }
}

fn write_unary<T: MathScalar>(
    f: &mut fmt::Formatter<'_>,
    op: UnaryOp,
    child: &Expr<T>,
    format: &Format,
) -> fmt::Result {
    let shown = resolve(child, format);
    let notation = format.notation;
    match (op, notation) {
        (UnaryOp::Negate, _) => {
            f.write_str(if notation == Notation::Unicode { "\u{2212}" } else { "-" })?;
            write_wrapped(f, &shown, !is_atomic(&shown), format)
        }
        (UnaryOp::Sqrt, Notation::Latex) => {
            f.write_str(r"\sqrt{")?;
            write_expr(f, &shown, format)?;
            f.write_str("}")
        }
        (UnaryOp::Sqrt, Notation::Unicode) => {
            f.write_str("\u{221a}")?;
            write_wrapped(f, &shown, true, format)
        }
        (UnaryOp::Square, Notation::Latex) => {
            write_wrapped(f, &shown, true, format)?;
            f.write_str("^{2}")
        }
        (UnaryOp::Square, Notation::Unicode) => {
            write_wrapped(f, &shown, !is_atomic(&shown), format)?;
            f.write_str("\u{b2}")
        }
        (UnaryOp::Abs, Notation::Latex) => {
            f.write_str(r"\left|")?;
            write_expr(f, &shown, format)?;
            f.write_str(r"\right|")
        }
        (UnaryOp::Abs, Notation::Unicode) => {
            f.write_str("|")?;
            write_expr(f, &shown, format)?;
            f.write_str("|")
        }
        (_, Notation::Latex) => {
            f.write_str(latex_function(op))?;
            write_wrapped(f, &shown, true, format)
        }
        (_, Notation::Standard | Notation::Unicode) => {
            f.write_str(op.name())?;
            write_wrapped(f, &shown, true, format)
        }
    }
}

fn write_binary<T: MathScalar>(
    f: &mut fmt::Formatter<'_>,
    op: BinaryOp,
    left: &Expr<T>,
    right: &Expr<T>,
    format: &Format,
) -> fmt::Result {
    let left = resolve(left, format);
    let right = resolve(right, format);
    let left_parens = needs_parens(op, &left, op.is_right_associative());
    let right_parens = needs_parens(op, &right, !op.is_right_associative());

    match (op, format.notation) {
        (BinaryOp::Div, Notation::Latex) => {
            f.write_str(r"\frac{")?;
            write_expr(f, &left, format)?;
            f.write_str("}{")?;
            write_expr(f, &right, format)?;
            f.write_str("}")
        }
        (BinaryOp::Pow, Notation::Latex) => {
            write_wrapped(f, &left, left_parens, format)?;
            f.write_str("^{")?;
            write_expr(f, &right, format)?;
            f.write_str("}")
        }
        (BinaryOp::Pow, Notation::Unicode) => {
            write_wrapped(f, &left, left_parens, format)?;
            match superscript_exponent(&right) {
                Some(sup) => f.write_str(&sup),
                None => {
                    f.write_str("^")?;
                    write_wrapped(f, &right, right_parens, format)
                }
            }
        }
        (op, notation) => {
            write_wrapped(f, &left, left_parens, format)?;
            f.write_str(binary_symbol(op, notation))?;
            write_wrapped(f, &right, right_parens, format)
        }
    }
}

// =============================================================================
// DISPLAY IMPLEMENTATIONS
// =============================================================================

/// Standard notation. A precision given in the format string (`{:.3}`)
/// overrides the default significant digits.
impl<T: MathScalar> fmt::Display for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = Format::new(f.precision().unwrap_or(DEFAULT_PRECISION));
        write_expr(f, self, &format)
    }
}

impl<T: MathScalar> fmt::Display for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.expr(), f)
    }
}

impl<T: MathScalar> fmt::Display for Lambda<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.expr(), f)
    }
}

impl<T: MathScalar> Expr<T> {
    /// Render with explicit settings
    pub fn format(&self, format: &Format) -> String {
        format.render(self)
    }

    /// Convert the expression to LaTeX format.
    #[must_use]
    pub fn to_latex(&self) -> String {
        Format::default().latex().render(self)
    }

    /// Convert the expression to Unicode format.
    #[must_use]
    pub fn to_unicode(&self) -> String {
        Format::default().unicode().render(self)
    }
}
