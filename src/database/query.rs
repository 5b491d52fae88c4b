// ABOUTME: Live-row query builder shared by every gateway read
// ABOUTME: Applies the soft-delete predicate and numbers `$n` placeholders in push order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

/// Predicate selecting rows that are not soft-deleted
pub const LIVE: &str = "deleted_at IS NULL";

/// Live predicate for an aliased table
#[must_use]
pub fn live(alias: &str) -> String {
    format!("{alias}.{LIVE}")
}

/// `SELECT` restricted to live rows of every table it touches
///
/// Placeholders are `$1`, `$2`, ... in the order conditions are added; bind values in
/// the same order.
#[derive(Debug, Clone)]
pub struct LiveQuery {
    columns: String,
    from: String,
    joins: Vec<String>,
    conditions: Vec<String>,
    group_by: Option<String>,
    order_by: Option<String>,
    params: usize,
}

impl LiveQuery {
    /// Select `columns` from the live rows of `table`
    #[must_use]
    pub fn select(columns: impl Into<String>, table: &str) -> Self {
        Self {
            columns: columns.into(),
            from: table.to_owned(),
            joins: Vec::new(),
            conditions: vec![LIVE.to_owned()],
            group_by: None,
            order_by: None,
            params: 0,
        }
    }

    /// Select `columns` from the live rows of `table` under `alias`
    #[must_use]
    pub fn select_aliased(columns: impl Into<String>, table: &str, alias: &str) -> Self {
        Self {
            from: format!("{table} {alias}"),
            conditions: vec![live(alias)],
            ..Self::select(columns, table)
        }
    }

    /// Outer-join the live rows of `table`; `on` must not mention deletion
    #[must_use]
    pub fn left_join_live(mut self, table: &str, alias: &str, on: &str) -> Self {
        self.joins
            .push(format!("LEFT JOIN {table} {alias} ON {on} AND {}", live(alias)));
        self
    }

    fn next_param(&mut self) -> String {
        self.params += 1;
        format!("${}", self.params)
    }

    /// Require `column = <next parameter>`
    #[must_use]
    pub fn where_eq(mut self, column: &str) -> Self {
        let param = self.next_param();
        self.conditions.push(format!("{column} = {param}"));
        self
    }

    /// Require `column >= <next parameter>`
    #[must_use]
    pub fn where_at_least(mut self, column: &str) -> Self {
        let param = self.next_param();
        self.conditions.push(format!("{column} >= {param}"));
        self
    }

    /// Require `column <= <next parameter>`
    #[must_use]
    pub fn where_at_most(mut self, column: &str) -> Self {
        let param = self.next_param();
        self.conditions.push(format!("{column} <= {param}"));
        self
    }

    /// Require `column` to be one of `count` parameters; an empty list matches nothing
    #[must_use]
    pub fn where_in(mut self, column: &str, count: usize) -> Self {
        if count == 0 {
            self.conditions.push("1 = 0".to_owned());
            return self;
        }
        let params: Vec<String> = (0..count).map(|_| self.next_param()).collect();
        self.conditions
            .push(format!("{column} IN ({})", params.join(", ")));
        self
    }

    /// Collapse rows sharing `column`
    #[must_use]
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by = Some(column.to_owned());
        self
    }

    /// Order the result
    #[must_use]
    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_by = Some(clause.to_owned());
        self
    }

    /// Render the SQL text
    #[must_use]
    pub fn build(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.from);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&self.conditions.join(" AND "));
        if let Some(group_by) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        sql
    }
}
