use sea_orm::{DatabaseBackend, Statement, Value};

/// Predicates carry `?` placeholders alongside their bound values. Numbering
/// into Postgres `$n` happens once, in [`SqlFilter::render`], so count and page
/// queries share one builder and only the page query gets the LIMIT/OFFSET tail.
#[derive(Debug, Default, Clone)]
pub struct SqlFilter {
    joins: Vec<String>,
    predicates: Vec<String>,
    values: Vec<Value>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a join that a predicate depends on. Joins carry no bound values.
    pub fn join(&mut self, join: &str) -> &mut Self {
        self.joins.push(join.to_string());
        self
    }

    /// AND-combines `predicate`; it must contain one `?` per value, in order.
    pub fn and<I>(&mut self, predicate: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        let before = self.values.len();
        self.values.extend(values);
        debug_assert_eq!(
            count_placeholders(predicate),
            self.values.len() - before,
            "placeholder count mismatch in `{}`",
            predicate
        );
        self.predicates.push(predicate.to_string());
        self
    }

    /// OR-combines `predicates` into one parenthesised group, binding `value`
    /// once per member.
    pub fn any_of(&mut self, predicates: &[&str], value: Value) -> &mut Self {
        if predicates.is_empty() {
            return self;
        }
        let group = format!("({})", predicates.join(" OR "));
        let values = std::iter::repeat(value).take(predicates.len());
        self.and(&group, values)
    }

    /// `head` is the SELECT ... FROM part; `tail` (ORDER BY, LIMIT, ...) may add
    /// its own `?` placeholders bound to `tail_values`.
    pub fn render(&self, head: &str, tail: &str, tail_values: Vec<Value>) -> (String, Vec<Value>) {
        let mut sql = String::from(head.trim_end());
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail.trim());
        }

        let mut values = self.values.clone();
        values.extend(tail_values);
        (number_placeholders(&sql), values)
    }

    pub fn statement(&self, head: &str, tail: &str, tail_values: Vec<Value>) -> Statement {
        let (sql, values) = self.render(head, tail, tail_values);
        Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values)
    }
}

/// Rewrites `?` into `$1, $2, ...`, leaving quoted literals alone.
pub fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut in_literal = false;
    for c in sql.chars() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                out.push(c);
            }
            '?' if !in_literal => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
            }
            _ => out.push(c),
        }
    }
    out
}

fn count_placeholders(sql: &str) -> usize {
    let mut in_literal = false;
    sql.chars()
        .filter(|c| {
            if *c == '\'' {
                in_literal = !in_literal;
            }
            *c == '?' && !in_literal
        })
        .count()
}
