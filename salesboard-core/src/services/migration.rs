//! Schema migrations for the sales and log databases
//!
//! A migration set is an ordered list of embedded SQL files whose first
//! entry creates `sys_migrations`. Applied names are recorded there, so a
//! set can be run on every open.

use duckdb::Connection;

use crate::domain::result::Result;

/// An ordered list of `(file name, sql)` pairs
pub type MigrationSet = &'static [(&'static str, &'static str)];

/// Outcome of one migration run
#[derive(Debug, Default)]
pub struct MigrationResult {
    pub applied: Vec<String>,
    pub already_applied: usize,
}

/// Applies a migration set to one connection
pub struct MigrationService<'a> {
    conn: &'a Connection,
    set: MigrationSet,
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection, set: MigrationSet) -> Self {
        Self { conn, set }
    }

    /// Apply every migration of the set not yet recorded, in list order
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let recorded = self.applied()?;
        let mut result = MigrationResult::default();

        for (name, sql) in self.set {
            if recorded.iter().any(|r| r == name) {
                result.already_applied += 1;
                continue;
            }
            self.conn.execute_batch(sql)?;
            self.conn.execute(
                "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                [name],
            )?;
            result.applied.push(name.to_string());
        }

        Ok(result)
    }

    /// Names recorded in `sys_migrations`; empty before the first run
    pub fn applied(&self) -> Result<Vec<String>> {
        let tracked: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
            [],
            |row| row.get(0),
        )?;
        if tracked == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    pub fn pending(&self) -> Result<Vec<&'static str>> {
        let recorded = self.applied()?;
        Ok(self
            .set
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| !recorded.iter().any(|r| r == name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_migrations::LOG_MIGRATIONS;
    use crate::migrations::MIGRATIONS;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_fresh_database_gets_every_migration_once() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn, MIGRATIONS);
        assert_eq!(service.pending().unwrap().len(), MIGRATIONS.len());

        let first = service.run_pending().unwrap();
        assert_eq!(first.applied.len(), MIGRATIONS.len());
        assert_eq!(first.already_applied, 0);

        let second = service.run_pending().unwrap();
        assert!(second.applied.is_empty());
        assert_eq!(second.already_applied, MIGRATIONS.len());
        assert!(service.pending().unwrap().is_empty());

        for table in ["categories", "products", "sales"] {
            assert!(table_exists(&conn, table), "missing table {}", table);
        }
    }

    #[test]
    fn test_partially_migrated_database_resumes() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationService::new(&conn, &MIGRATIONS[..1])
            .run_pending()
            .unwrap();

        let service = MigrationService::new(&conn, MIGRATIONS);
        assert_eq!(service.pending().unwrap(), vec![MIGRATIONS[1].0, MIGRATIONS[2].0]);

        let result = service.run_pending().unwrap();
        assert_eq!(result.already_applied, 1);
        assert_eq!(result.applied.len(), MIGRATIONS.len() - 1);
    }

    #[test]
    fn test_log_set_runs_through_same_runner() {
        let conn = Connection::open_in_memory().unwrap();
        let result = MigrationService::new(&conn, LOG_MIGRATIONS)
            .run_pending()
            .unwrap();

        assert_eq!(result.applied.len(), LOG_MIGRATIONS.len());
        assert!(table_exists(&conn, "sys_logs"));
        assert!(!table_exists(&conn, "products"));
    }
}
