// ABOUTME: DDL for the metadata tables, the recipe association tables and their indexes
// ABOUTME: Portable across SQLite and PostgreSQL; every statement is idempotent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Metadata Service

use cookbook_core::models::MetadataKind;

/// Ordered migration statements
///
/// Natural keys are unique among live rows only. Single-valued association tables
/// additionally allow one live link per recipe.
pub(super) fn statements() -> Vec<String> {
    let mut statements = Vec::new();

    for kind in MetadataKind::ALL {
        let table = kind.table();
        let key_column = kind.key_column();
        let key_type = if key_column == "name" { "TEXT" } else { "BIGINT" };

        statements.push(format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                {key_column} {key_type} NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT
            )
            "
        ));
        statements.push(format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_{key_column}_live \
             ON {table} ({key_column}) WHERE deleted_at IS NULL"
        ));
    }

    for kind in MetadataKind::ALL {
        let table = kind.association_table();
        let column = kind.association_column();

        statements.push(format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                recipe_id TEXT NOT NULL,
                {column} TEXT NOT NULL,
                created_at TEXT NOT NULL,
                deleted_at TEXT,
                PRIMARY KEY (recipe_id, {column})
            )
            "
        ));
        statements.push(format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table} ({column})"
        ));
        if kind.is_single_valued() {
            statements.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_recipe_live \
                 ON {table} (recipe_id) WHERE deleted_at IS NULL"
            ));
        }
    }

    statements
}
