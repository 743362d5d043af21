//! Statement inspection for the read-only guard.
//!
//! Walks sqlparser's PostgreSQL AST looking for anything that writes:
//! DML and DDL statements, data-modifying CTEs, `SELECT INTO` and row locks.

use std::fmt;

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::{Parser, ParserError};

/// The first kind of write found in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WriteKind {
    Insert,
    Update,
    Delete,
    Drop,
    Truncate,
    Alter,
    Create,
    SelectInto,
    RowLock,
    /// Any statement that is not a query.
    Other,
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Drop => "DROP",
            Self::Truncate => "TRUNCATE",
            Self::Alter => "ALTER",
            Self::Create => "CREATE",
            Self::SelectInto => "SELECT INTO",
            Self::RowLock => "FOR UPDATE/FOR SHARE",
            Self::Other => "A statement other than SELECT",
        };
        f.write_str(text)
    }
}

pub(super) fn parse(sql: &str) -> Result<Vec<Statement>, ParserError> {
    Parser::parse_sql(&PostgreSqlDialect {}, sql)
}

/// Returns the first write found in `statement`, or `None` if it only reads.
pub(super) fn find_write(statement: &Statement) -> Option<WriteKind> {
    match statement {
        // Queries may still hide data-modifying CTEs
        Statement::Query(query) => query_write(query),

        Statement::Insert(_) => Some(WriteKind::Insert),
        Statement::Update { .. } => Some(WriteKind::Update),
        Statement::Delete(_) => Some(WriteKind::Delete),
        Statement::Drop { .. } => Some(WriteKind::Drop),
        Statement::Truncate { .. } => Some(WriteKind::Truncate),
        Statement::AlterTable { .. } => Some(WriteKind::Alter),
        Statement::CreateTable(_) => Some(WriteKind::Create),

        _ => Some(WriteKind::Other),
    }
}

fn query_write(query: &Query) -> Option<WriteKind> {
    if !query.locks.is_empty() {
        return Some(WriteKind::RowLock);
    }

    query
        .with
        .iter()
        .flat_map(|with| &with.cte_tables)
        .find_map(|cte| query_write(&cte.query))
        .or_else(|| set_expr_write(&query.body))
}

fn set_expr_write(set_expr: &SetExpr) -> Option<WriteKind> {
    match set_expr {
        SetExpr::Select(select) => select_write(select),
        SetExpr::Query(query) => query_write(query),
        SetExpr::SetOperation { left, right, .. } => {
            set_expr_write(left).or_else(|| set_expr_write(right))
        }
        SetExpr::Values(_) | SetExpr::Table(_) => None,
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) => find_write(stmt),
        #[allow(unreachable_patterns)]
        _ => Some(WriteKind::Other),
    }
}

fn select_write(select: &Select) -> Option<WriteKind> {
    if select.into.is_some() {
        return Some(WriteKind::SelectInto);
    }
    select.from.iter().find_map(table_with_joins_write)
}

fn table_with_joins_write(twj: &TableWithJoins) -> Option<WriteKind> {
    table_factor_write(&twj.relation).or_else(|| {
        twj.joins
            .iter()
            .find_map(|join| table_factor_write(&join.relation))
    })
}

fn table_factor_write(factor: &TableFactor) -> Option<WriteKind> {
    match factor {
        TableFactor::Derived { subquery, .. } => query_write(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => table_with_joins_write(table_with_joins),
        _ => None,
    }
}
