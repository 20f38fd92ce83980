use std::str::SplitWhitespace;

use tracing::debug;

use crate::error::{ExecuteError, PrepareError};
use crate::row::Row;
use crate::table::Table;
use crate::{EMAIL_SIZE, USERNAME_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// What a successfully executed statement produced.
#[derive(Debug, PartialEq, Eq)]
pub enum ExecuteResult {
    Inserted,
    Rows(Vec<Row>),
}

impl Statement {
    /// Parses one input line. Insert arguments are checked in order: shape
    /// and id format, then id sign, then column lengths.
    pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
        let mut tokens = input.split_whitespace();
        match tokens.next() {
            Some("insert") => prepare_insert(tokens),
            Some("select") => match tokens.next() {
                None => Ok(Statement::Select),
                Some(_) => Err(PrepareError::Syntax),
            },
            _ => Err(PrepareError::UnrecognizedStatement(input.to_string())),
        }
    }

    pub fn execute(&self, table: &mut Table) -> Result<ExecuteResult, ExecuteError> {
        match self {
            Statement::Insert(row) => {
                table.append(row)?;
                Ok(ExecuteResult::Inserted)
            }
            Statement::Select => {
                let rows = table.scan().collect::<Result<Vec<_>, _>>()?;
                debug!(rows = rows.len(), "select");
                Ok(ExecuteResult::Rows(rows))
            }
        }
    }
}

fn prepare_insert(mut tokens: SplitWhitespace<'_>) -> Result<Statement, PrepareError> {
    let (Some(id), Some(username), Some(email), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(PrepareError::Syntax);
    };

    let id: i64 = id.parse().map_err(|_| PrepareError::Syntax)?;
    if id <= 0 {
        return Err(PrepareError::NegativeId);
    }
    let id = u32::try_from(id).map_err(|_| PrepareError::Syntax)?;

    if username.len() > USERNAME_SIZE || email.len() > EMAIL_SIZE {
        return Err(PrepareError::StringTooLong);
    }

    Ok(Statement::Insert(Row::new(id, username, email)))
}
