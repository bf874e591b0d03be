// query.rs
//
// Copyright 2017 Jordan Petridis <jpetridis@gnome.org>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Query specifications for the record store.
//!
//! A [`Query`] is an ephemeral value describing one read: target table,
//! projection, filters, ordering and limit. Filters are a tagged type, so
//! null tests (which bind no placeholder) are a first-class case instead of
//! a string-suffix special case. Rendering is pure: the generated fragment
//! and the values it binds are returned together, in matching order.

pub use rusqlite::types::Value;

/// Comparison operators that bind exactly one placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Like,
    NotLike,
}

impl Comparison {
    fn sql(self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::NotEqual => " <>",
            Comparison::Greater => " >",
            Comparison::Less => " <",
            Comparison::GreaterOrEqual => " >=",
            Comparison::LessOrEqual => " <=",
            Comparison::Like => " LIKE ",
            Comparison::NotLike => " NOT LIKE ",
        }
    }

    fn from_suffix(token: &str) -> Option<Comparison> {
        match token {
            "<>" => Some(Comparison::NotEqual),
            ">" => Some(Comparison::Greater),
            "<" => Some(Comparison::Less),
            ">=" => Some(Comparison::GreaterOrEqual),
            "<=" => Some(Comparison::LessOrEqual),
            "LIKE" => Some(Comparison::Like),
            "NOT LIKE" => Some(Comparison::NotLike),
            _ => None,
        }
    }
}

/// One filter clause. Clauses are joined with `AND` only; `OR` and
/// parenthesized grouping are out of contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column <op> ?`, one bound value.
    Compare {
        column: String,
        op: Comparison,
        value: Value,
    },
    /// `column IN (?,..)`, one placeholder per element. The value is an
    /// ordered collection by construction, never a scalar.
    Within {
        column: String,
        negated: bool,
        values: Vec<Value>,
    },
    /// `column IS [NOT] NULL`, zero placeholders.
    Null { column: String, negated: bool },
}

impl Filter {
    pub fn equal(column: &str, value: impl Into<Value>) -> Filter {
        Filter::compare(column, Comparison::Equal, value)
    }

    pub fn compare(column: &str, op: Comparison, value: impl Into<Value>) -> Filter {
        Filter::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn within(column: &str, values: Vec<Value>) -> Filter {
        Filter::Within {
            column: column.into(),
            negated: false,
            values,
        }
    }

    pub fn not_within(column: &str, values: Vec<Value>) -> Filter {
        Filter::Within {
            column: column.into(),
            negated: true,
            values,
        }
    }

    pub fn is_null(column: &str) -> Filter {
        Filter::Null {
            column: column.into(),
            negated: false,
        }
    }

    pub fn is_not_null(column: &str) -> Filter {
        Filter::Null {
            column: column.into(),
            negated: true,
        }
    }

    /// Parse an operator-suffixed mapping key, `"age >="` or `"name LIKE"`
    /// style, and pair it with `value`.
    ///
    /// Only the comparison family is expressible this way since those are
    /// the operators that pair a column with a single scalar. Set membership
    /// and null tests have their own constructors. A key without a
    /// recognized suffix is treated verbatim as a column name compared for
    /// equality.
    pub fn from_key(key: &str, value: impl Into<Value>) -> Filter {
        if let Some((column, suffix)) = key.rsplit_once(' ') {
            // "NOT LIKE" spans the last two tokens.
            if let Some((head, "NOT")) = column.rsplit_once(' ') {
                if suffix == "LIKE" {
                    return Filter::compare(head, Comparison::NotLike, value);
                }
            }
            if let Some(op) = Comparison::from_suffix(suffix) {
                return Filter::compare(column, op, value);
            }
        }
        Filter::equal(key, value)
    }

    fn render(&self, clause: &mut String, bound: &mut Vec<Value>) {
        match self {
            Filter::Compare { column, op, value } => {
                clause.push_str(column);
                clause.push_str(op.sql());
                clause.push('?');
                bound.push(value.clone());
            }
            Filter::Within {
                column,
                negated,
                values,
            } => {
                clause.push_str(column);
                clause.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        clause.push(',');
                    }
                    clause.push('?');
                    bound.push(value.clone());
                }
                clause.push(')');
            }
            Filter::Null { column, negated } => {
                clause.push_str(column);
                clause.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
        }
    }
}

/// Render a `WHERE` fragment together with the values it binds.
///
/// Placeholders appear in the fragment in exactly the order their values
/// appear in the returned vector. Returns an empty fragment for an empty
/// filter list.
pub(crate) fn render_where(filters: &[Filter]) -> (String, Vec<Value>) {
    if filters.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut clause = String::from(" WHERE ");
    let mut bound = Vec::new();
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            clause.push_str(" AND ");
        }
        filter.render(&mut clause, &mut bound);
    }
    (clause, bound)
}

/// Field projection of a select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    /// `*`, all columns in storage order.
    #[default]
    All,
    /// An explicit ordered column list, quoted to dodge reserved words.
    Columns(Vec<String>),
}

impl Projection {
    pub fn columns(names: &[&str]) -> Projection {
        Projection::Columns(names.iter().map(|s| s.to_string()).collect())
    }

    fn render(&self) -> String {
        match self {
            Projection::All => "*".to_string(),
            Projection::Columns(cols) => format!("`{}`", cols.join("`,`")),
        }
    }
}

/// One read against the record store.
#[derive(Debug, Clone, Builder, PartialEq)]
#[builder(derive(Debug))]
#[builder(setter(into))]
pub struct Query {
    table: String,
    #[builder(default)]
    projection: Projection,
    #[builder(default)]
    filters: Vec<Filter>,
    #[builder(default, setter(strip_option))]
    order_by: Option<String>,
    #[builder(default, setter(strip_option))]
    limit: Option<u32>,
}

impl Query {
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render the statement text and its bound values.
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", self.projection.render(), self.table);

        let (clause, bound) = render_where(&self.filters);
        sql.push_str(&clause);

        if let Some(ref order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        (sql, bound)
    }
}
