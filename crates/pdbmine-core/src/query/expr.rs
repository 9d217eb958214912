use super::error::QueryError;
use crate::dataset::schema::Schema;
use crate::dataset::table::Row;
use crate::dataset::value::Value;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CompareOp::Eq => "=",
                CompareOp::NotEq => "!=",
                CompareOp::Lt => "<",
                CompareOp::LtEq => "<=",
                CompareOp::Gt => ">",
                CompareOp::GtEq => ">=",
            }
        )
    }
}

/// A SQL `LIKE` pattern.
///
/// `%` matches any run of characters, `_` exactly one, and a backslash makes
/// the following character literal. The matcher is built when an expression
/// is compiled against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    source: String,
}

impl LikePattern {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Translates the pattern into an anchored regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] when the translated expression
    /// exceeds the regex engine's size limits.
    pub fn to_regex(&self) -> Result<Regex, QueryError> {
        let mut translated = String::from("(?s)^");
        let mut chars = self.source.chars();
        while let Some(c) = chars.next() {
            match c {
                '%' => translated.push_str(".*"),
                '_' => translated.push('.'),
                '\\' => match chars.next() {
                    Some(escaped) => translated.push_str(&regex::escape(&escaped.to_string())),
                    None => translated.push_str(&regex::escape("\\")),
                },
                other => translated.push_str(&regex::escape(&other.to_string())),
            }
        }
        translated.push('$');

        Regex::new(&translated).map_err(|e| QueryError::InvalidPattern {
            pattern: self.source.clone(),
            reason: e.to_string(),
        })
    }
}

/// A row expression over an annotation table.
///
/// Expressions are built either with [`col`]/[`lit`] and the combinator
/// methods, or by parsing query text; both produce the same tree for the
/// same condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Value),
    IsNull(Box<Expr>),
    IsNotNull(Box<Expr>),
    Like {
        expr: Box<Expr>,
        pattern: LikePattern,
        negated: bool,
    },
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

/// Refers to the column called `name`.
pub fn col(name: &str) -> Expr {
    Expr::Column(name.to_string())
}

/// A constant value.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

impl Expr {
    pub fn is_null(self) -> Expr {
        Expr::IsNull(Box::new(self))
    }

    pub fn is_not_null(self) -> Expr {
        Expr::IsNotNull(Box::new(self))
    }

    /// Matches a SQL `LIKE` pattern.
    pub fn like(self, pattern: &str) -> Expr {
        self.like_pattern(pattern, false)
    }

    pub fn not_like(self, pattern: &str) -> Expr {
        self.like_pattern(pattern, true)
    }

    fn like_pattern(self, pattern: &str, negated: bool) -> Expr {
        Expr::Like {
            expr: Box::new(self),
            pattern: LikePattern::new(pattern),
            negated,
        }
    }

    fn compare(self, op: CompareOp, right: impl Into<Expr>) -> Expr {
        Expr::Compare {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn equals(self, right: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Eq, right)
    }

    pub fn not_equals(self, right: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::NotEq, right)
    }

    pub fn lt(self, right: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Lt, right)
    }

    pub fn lt_eq(self, right: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::LtEq, right)
    }

    pub fn gt(self, right: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Gt, right)
    }

    pub fn gt_eq(self, right: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::GtEq, right)
    }

    pub fn and(self, right: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(right))
    }

    pub fn or(self, right: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(right))
    }

    pub fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    /// Names of all columns referenced by the expression, in order of appearance.
    pub fn columns(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_columns(&mut names);
        names
    }

    fn collect_columns<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Column(name) => names.push(name),
            Expr::Literal(_) => {}
            Expr::IsNull(e) | Expr::IsNotNull(e) | Expr::Not(e) => e.collect_columns(names),
            Expr::Like { expr, .. } => expr.collect_columns(names),
            Expr::Compare { left, right, .. } | Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_columns(names);
                right.collect_columns(names);
            }
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        lit(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        lit(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        lit(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Literal(Value::String(s)) => write!(f, "'{}'", s.replace('\'', "''")),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::IsNull(e) => write!(f, "{} IS NULL", e),
            Expr::IsNotNull(e) => write!(f, "{} IS NOT NULL", e),
            Expr::Like {
                expr,
                pattern,
                negated,
            } => write!(
                f,
                "{} {}LIKE '{}'",
                expr,
                if *negated { "NOT " } else { "" },
                pattern.as_str().replace('\'', "''")
            ),
            Expr::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expr::And(l, r) => write!(f, "({} AND {})", l, r),
            Expr::Or(l, r) => write!(f, "({} OR {})", l, r),
            Expr::Not(e) => write!(f, "NOT ({})", e),
        }
    }
}

#[derive(Debug, Clone)]
enum Operand {
    Column(usize),
    Literal(Value),
}

impl Operand {
    fn resolve<'r>(&'r self, row: &'r Row) -> &'r Value {
        match self {
            Operand::Column(index) => &row[*index],
            Operand::Literal(value) => value,
        }
    }
}

#[derive(Debug, Clone)]
enum Predicate {
    IsNull(Operand),
    IsNotNull(Operand),
    Like {
        operand: Operand,
        matcher: Regex,
        negated: bool,
    },
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Evaluates with SQL three-valued logic; `None` is UNKNOWN.
    fn evaluate(&self, row: &Row) -> Option<bool> {
        match self {
            Predicate::IsNull(operand) => Some(operand.resolve(row).is_null()),
            Predicate::IsNotNull(operand) => Some(!operand.resolve(row).is_null()),
            Predicate::Like {
                operand,
                matcher,
                negated,
            } => {
                let matched = match operand.resolve(row) {
                    Value::Null => return None,
                    Value::String(s) => matcher.is_match(s),
                    other => matcher.is_match(&other.to_string()),
                };
                Some(matched != *negated)
            }
            Predicate::Compare { left, op, right } => left
                .resolve(row)
                .compare(right.resolve(row))
                .map(|ordering| op.holds(ordering)),
            Predicate::And(l, r) => match (l.evaluate(row), r.evaluate(row)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Predicate::Or(l, r) => match (l.evaluate(row), r.evaluate(row)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            Predicate::Not(p) => p.evaluate(row).map(|b| !b),
        }
    }
}

/// A boolean expression resolved against a schema, ready to test rows.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    predicate: Predicate,
}

impl CompiledFilter {
    /// Resolves column names and checks that `expr` is a boolean condition.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownColumn`] for a column missing from
    /// `schema` and [`QueryError::TypeMismatch`] when a value appears where a
    /// condition is expected (or the other way around), and
    /// [`QueryError::InvalidPattern`] for a `LIKE` pattern that cannot be
    /// compiled.
    pub fn compile(expr: &Expr, schema: &Schema) -> Result<Self, QueryError> {
        Ok(Self {
            predicate: bind_predicate(expr, schema)?,
        })
    }

    /// Returns `true` only when the condition is TRUE for the row; FALSE and
    /// UNKNOWN both reject it.
    pub fn matches(&self, row: &Row) -> bool {
        self.predicate.evaluate(row) == Some(true)
    }
}

fn bind_operand(expr: &Expr, schema: &Schema) -> Result<Operand, QueryError> {
    match expr {
        Expr::Column(name) => schema
            .index_of(name)
            .map(Operand::Column)
            .ok_or_else(|| QueryError::UnknownColumn { name: name.clone() }),
        Expr::Literal(value) => Ok(Operand::Literal(value.clone())),
        other => Err(QueryError::TypeMismatch(format!(
            "expected a column or literal, found condition `{}`",
            other
        ))),
    }
}

fn bind_predicate(expr: &Expr, schema: &Schema) -> Result<Predicate, QueryError> {
    Ok(match expr {
        Expr::Column(_) | Expr::Literal(_) => {
            return Err(QueryError::TypeMismatch(format!(
                "expected a condition, found value `{}`",
                expr
            )));
        }
        Expr::IsNull(e) => Predicate::IsNull(bind_operand(e, schema)?),
        Expr::IsNotNull(e) => Predicate::IsNotNull(bind_operand(e, schema)?),
        Expr::Like {
            expr,
            pattern,
            negated,
        } => Predicate::Like {
            operand: bind_operand(expr, schema)?,
            matcher: pattern.to_regex()?,
            negated: *negated,
        },
        Expr::Compare { left, op, right } => Predicate::Compare {
            left: bind_operand(left, schema)?,
            op: *op,
            right: bind_operand(right, schema)?,
        },
        Expr::And(l, r) => Predicate::And(
            Box::new(bind_predicate(l, schema)?),
            Box::new(bind_predicate(r, schema)?),
        ),
        Expr::Or(l, r) => Predicate::Or(
            Box::new(bind_predicate(l, schema)?),
            Box::new(bind_predicate(r, schema)?),
        ),
        Expr::Not(e) => Predicate::Not(Box::new(bind_predicate(e, schema)?)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::schema::Field;
    use crate::dataset::value::DataType;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("Ki", DataType::Double),
            Field::new("Kd", DataType::Double),
            Field::new("ecNo", DataType::String),
        ])
    }

    fn row(ki: Option<f64>, kd: Option<f64>, ec: Option<&str>) -> Row {
        vec![ki.into(), kd.into(), ec.into()]
    }

    fn kinase_filter() -> Expr {
        col("Ki")
            .is_not_null()
            .or(col("Kd").is_not_null())
            .and(col("ecNo").like("2.7.11.%"))
    }

    #[test]
    fn like_pattern_handles_wildcards_and_literals() {
        let pattern = LikePattern::new("2.7.11.%").to_regex().unwrap();
        assert!(pattern.is_match("2.7.11.1"));
        assert!(pattern.is_match("2.7.11."));
        assert!(!pattern.is_match("2.7.1.11"));
        assert!(!pattern.is_match("2x7x11x1"));

        let single = LikePattern::new("A_C").to_regex().unwrap();
        assert!(single.is_match("ABC"));
        assert!(!single.is_match("ABBC"));

        let escaped = LikePattern::new("100\\%").to_regex().unwrap();
        assert!(escaped.is_match("100%"));
        assert!(!escaped.is_match("1000"));
    }

    #[test]
    fn kinase_filter_accepts_expected_rows() {
        let filter = CompiledFilter::compile(&kinase_filter(), &schema()).unwrap();
        assert!(filter.matches(&row(Some(1.0), None, Some("2.7.11.1"))));
        assert!(filter.matches(&row(None, Some(3.0), Some("2.7.11.24"))));
        assert!(!filter.matches(&row(None, None, Some("2.7.11.1"))));
        assert!(!filter.matches(&row(Some(1.0), None, Some("3.4.21.4"))));
        assert!(!filter.matches(&row(Some(1.0), None, None)));
    }

    #[test]
    fn unknown_is_not_negated_into_true() {
        let expr = col("ecNo").like("2.7.%").not();
        let filter = CompiledFilter::compile(&expr, &schema()).unwrap();
        assert!(!filter.matches(&row(None, None, None)));
        assert!(filter.matches(&row(None, None, Some("1.1.1.1"))));
    }

    #[test]
    fn or_with_unknown_and_true_is_true() {
        let expr = col("Ki").gt(0.5).or(col("Kd").is_not_null());
        let filter = CompiledFilter::compile(&expr, &schema()).unwrap();
        assert!(filter.matches(&row(None, Some(1.0), None)));
        assert!(!filter.matches(&row(None, None, None)));
    }

    #[test]
    fn comparisons_use_numeric_order() {
        let filter = CompiledFilter::compile(&col("Ki").lt_eq(10_i64), &schema()).unwrap();
        assert!(filter.matches(&row(Some(10.0), None, None)));
        assert!(!filter.matches(&row(Some(10.5), None, None)));
    }

    #[test]
    fn unknown_column_is_rejected_at_compile_time() {
        let err = CompiledFilter::compile(&col("IC50").is_null(), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownColumn {
                name: "IC50".to_string()
            }
        );
    }

    #[test]
    fn oversized_like_pattern_fails_to_compile() {
        let pattern = "_".repeat(200_000);
        let expr = col("ecNo").like(&pattern);
        let err = CompiledFilter::compile(&expr, &schema()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPattern { .. }));
    }

    #[test]
    fn bare_column_is_not_a_condition() {
        let err = CompiledFilter::compile(&col("Ki"), &schema()).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch(_)));
    }

    #[test]
    fn display_renders_query_text() {
        assert_eq!(
            kinase_filter().to_string(),
            "((Ki IS NOT NULL OR Kd IS NOT NULL) AND ecNo LIKE '2.7.11.%')"
        );
        assert_eq!(col("hetId").equals("O'X").to_string(), "hetId = 'O''X'");
    }

    #[test]
    fn columns_lists_referenced_names() {
        assert_eq!(kinase_filter().columns(), vec!["Ki", "Kd", "ecNo"]);
    }
}
