use super::error::{MigrationError, MigrationResult};
use super::store::MigrationStore;
use super::types::{ColumnType, infer_column_type};
use crate::traits::Output;
use regex::Regex;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid identifier pattern regex")
    })
}

/// Manages dynamic, additive-only schema migrations.
///
/// Table and column names are interpolated into DDL, so both are restricted
/// to plain SQL identifiers before any statement is built.
pub struct SchemaMigrationManager {
    store: Arc<dyn MigrationStore>,
    output: Arc<dyn Output>,
}

impl SchemaMigrationManager {
    pub fn new(store: Arc<dyn MigrationStore>, output: Arc<dyn Output>) -> Self {
        Self { store, output }
    }

    /// Create or evolve `table` to match the shape of `sample`.
    ///
    /// Idempotent per definition hash: a sample whose inferred definition was
    /// already applied is a no-op. Evolution is additive-only: new columns
    /// are added, existing ones are never dropped or retyped. On failure,
    /// inverse statements are replayed in reverse order (best-effort) and
    /// the original error is returned.
    pub async fn evolve_table(
        &self,
        table: &str,
        sample: &Map<String, Value>,
    ) -> MigrationResult<()> {
        validate_identifier(table)?;
        if sample.is_empty() {
            return Err(MigrationError::EmptySample {
                table: table.to_string(),
            });
        }

        let mut definition: BTreeMap<String, ColumnType> = BTreeMap::new();
        for (column, value) in sample {
            validate_identifier(column)?;
            definition.insert(column.clone(), infer_column_type(value));
        }

        let hash = definition_hash(&definition)?;

        self.store.ensure_journal().await?;
        if self.store.journal_contains(table, &hash).await? {
            self.output
                .dimmed(&format!("No migration required for {}", table));
            return Ok(());
        }

        let existing = self.store.existing_columns(table).await?;

        let mut statements: Vec<(String, String)> = Vec::new();
        if existing.is_empty() {
            let columns = definition
                .iter()
                .map(|(name, col_type)| format!("{} {}", name, col_type.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            statements.push((
                format!("CREATE TABLE {} ({})", table, columns),
                format!("DROP TABLE IF EXISTS {}", table),
            ));
        } else {
            for (column, col_type) in &definition {
                if !existing.contains(column) {
                    statements.push((
                        format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, col_type.as_sql()),
                        format!("ALTER TABLE {} DROP COLUMN IF EXISTS {}", table, column),
                    ));
                }
            }
        }

        let mut inverses: Vec<String> = Vec::new();
        for (statement, inverse) in &statements {
            inverses.push(inverse.clone());
            if let Err(err) = self.store.execute(statement).await {
                self.rollback(&inverses).await;
                return Err(err);
            }
        }

        let applied_at = chrono::Utc::now().naive_utc();
        if let Err(err) = self.store.record(table, &hash, applied_at).await {
            self.rollback(&inverses).await;
            return Err(err);
        }

        self.output
            .info(&format!("Schema evolved for table {}", table));
        Ok(())
    }

    /// Replay inverse statements in reverse order. Failures are logged, not
    /// raised: the original migration error is what the caller sees.
    async fn rollback(&self, inverses: &[String]) {
        for inverse in inverses.iter().rev() {
            if let Err(err) = self.store.execute(inverse).await {
                self.output
                    .error(&format!("Rollback statement failed: {}", err));
            }
        }
        self.output.warning("Rollback completed");
    }
}

/// Hash the canonical (sorted) column definition
fn definition_hash(definition: &BTreeMap<String, ColumnType>) -> MigrationResult<String> {
    let canonical: BTreeMap<&str, &str> = definition
        .iter()
        .map(|(name, col_type)| (name.as_str(), col_type.as_sql()))
        .collect();

    let raw = serde_json::to_string(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn validate_identifier(name: &str) -> MigrationResult<()> {
    if identifier_pattern().is_match(name) {
        Ok(())
    } else {
        Err(MigrationError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockOutput;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store that interprets the manager's DDL so rollback can be
    /// verified against the resulting table state.
    struct MockStore {
        tables: Mutex<HashMap<String, Vec<String>>>,
        journal: Mutex<Vec<(String, String)>>,
        executed: Mutex<Vec<String>>,
        fail_on_statement: Option<usize>,
        fail_record: bool,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                tables: Mutex::new(HashMap::new()),
                journal: Mutex::new(Vec::new()),
                executed: Mutex::new(Vec::new()),
                fail_on_statement: None,
                fail_record: false,
            }
        }

        fn with_table(self, table: &str, columns: &[&str]) -> Self {
            self.tables.lock().unwrap().insert(
                table.to_string(),
                columns.iter().map(|c| c.to_string()).collect(),
            );
            self
        }

        fn failing_on(mut self, statement_index: usize) -> Self {
            self.fail_on_statement = Some(statement_index);
            self
        }

        fn columns(&self, table: &str) -> Option<Vec<String>> {
            self.tables.lock().unwrap().get(table).cloned()
        }

        fn executed_statements(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }

        fn apply(&self, sql: &str) {
            let mut tables = self.tables.lock().unwrap();
            let words: Vec<&str> = sql.split_whitespace().collect();

            if sql.starts_with("CREATE TABLE") {
                let table = words[2].to_string();
                let inner = &sql[sql.find('(').unwrap() + 1..sql.rfind(')').unwrap()];
                let columns = inner
                    .split(',')
                    .map(|c| c.trim().split_whitespace().next().unwrap().to_string())
                    .collect();
                tables.insert(table, columns);
            } else if sql.starts_with("DROP TABLE IF EXISTS") {
                tables.remove(words[4]);
            } else if sql.contains("ADD COLUMN") {
                let table = words[2].to_string();
                let column = words[5].to_string();
                tables.entry(table).or_default().push(column);
            } else if sql.contains("DROP COLUMN IF EXISTS") {
                let table = words[2].to_string();
                let column = words[7].to_string();
                if let Some(columns) = tables.get_mut(&table) {
                    columns.retain(|c| c != &column);
                }
            }
        }
    }

    #[async_trait]
    impl MigrationStore for MockStore {
        async fn ensure_journal(&self) -> MigrationResult<()> {
            Ok(())
        }

        async fn journal_contains(&self, name: &str, hash: &str) -> MigrationResult<bool> {
            Ok(self
                .journal
                .lock()
                .unwrap()
                .iter()
                .any(|(n, h)| n == name && h == hash))
        }

        async fn record(
            &self,
            name: &str,
            hash: &str,
            _applied_at: NaiveDateTime,
        ) -> MigrationResult<()> {
            if self.fail_record {
                return Err(MigrationError::Database("journal unavailable".to_string()));
            }
            self.journal
                .lock()
                .unwrap()
                .push((name.to_string(), hash.to_string()));
            Ok(())
        }

        async fn existing_columns(&self, table: &str) -> MigrationResult<Vec<String>> {
            Ok(self.columns(table).unwrap_or_default())
        }

        async fn execute(&self, sql: &str) -> MigrationResult<()> {
            let index = {
                let mut executed = self.executed.lock().unwrap();
                executed.push(sql.to_string());
                executed.len() - 1
            };

            if self.fail_on_statement == Some(index) {
                return Err(MigrationError::Database("statement rejected".to_string()));
            }

            self.apply(sql);
            Ok(())
        }
    }

    fn manager(store: Arc<MockStore>) -> (SchemaMigrationManager, Arc<MockOutput>) {
        let output = Arc::new(MockOutput::new());
        (
            SchemaMigrationManager::new(store, output.clone()),
            output,
        )
    }

    #[tokio::test]
    async fn test_creates_table_when_absent() {
        let store = Arc::new(MockStore::new());
        let (manager, _) = manager(store.clone());

        let sample = json!({"id": 5, "name": "short", "payload": {"a": 1}});
        manager
            .evolve_table("events", sample.as_object().unwrap())
            .await
            .unwrap();

        assert_eq!(
            store.columns("events").unwrap(),
            vec!["id", "name", "payload"]
        );
        let statements = store.executed_statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0],
            "CREATE TABLE events (id INTEGER, name VARCHAR(255), payload JSONB)"
        );
    }

    #[tokio::test]
    async fn test_idempotent_second_call_is_noop() {
        let store = Arc::new(MockStore::new());
        let (manager, output) = manager(store.clone());

        let sample = json!({"id": 5, "name": "short"});
        let sample = sample.as_object().unwrap();

        manager.evolve_table("events", sample).await.unwrap();
        let first_count = store.executed_statements().len();

        manager.evolve_table("events", sample).await.unwrap();
        assert_eq!(store.executed_statements().len(), first_count);
        assert!(
            output
                .get_messages()
                .iter()
                .any(|m| matches!(m, crate::traits::output::OutputMessage::Dimmed(s) if s.contains("No migration required")))
        );
    }

    #[tokio::test]
    async fn test_additive_only_evolution() {
        let store = Arc::new(MockStore::new().with_table("events", &["a", "b"]));
        let (manager, _) = manager(store.clone());

        let sample = json!({"a": 1, "b": "x", "c": 2.5});
        manager
            .evolve_table("events", sample.as_object().unwrap())
            .await
            .unwrap();

        assert_eq!(store.columns("events").unwrap(), vec!["a", "b", "c"]);
        let statements = store.executed_statements();
        assert_eq!(statements, vec!["ALTER TABLE events ADD COLUMN c DECIMAL"]);
    }

    #[tokio::test]
    async fn test_rollback_restores_premigration_state() {
        let store = Arc::new(
            MockStore::new()
                .with_table("events", &["a"])
                // First ADD COLUMN succeeds, second fails
                .failing_on(1),
        );
        let (manager, output) = manager(store.clone());

        let sample = json!({"a": 1, "b": "x", "c": "y"});
        let err = manager
            .evolve_table("events", sample.as_object().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::Database(_)));
        assert_eq!(store.columns("events").unwrap(), vec!["a"]);
        assert!(store.journal.lock().unwrap().is_empty());
        assert!(output.has_warning());
    }

    #[tokio::test]
    async fn test_failed_create_drops_table() {
        let store = Arc::new(MockStore::new().failing_on(0));
        let (manager, _) = manager(store.clone());

        let sample = json!({"id": 1});
        let err = manager
            .evolve_table("events", sample.as_object().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::Database(_)));
        assert!(store.columns("events").is_none());
        // The failed CREATE plus its inverse DROP
        assert_eq!(store.executed_statements().len(), 2);
    }

    #[tokio::test]
    async fn test_record_failure_rolls_back() {
        let store = Arc::new(MockStore {
            fail_record: true,
            ..MockStore::new()
        });
        let (manager, _) = manager(store.clone());

        let sample = json!({"id": 1});
        let err = manager
            .evolve_table("events", sample.as_object().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::Database(_)));
        assert!(store.columns("events").is_none());
    }

    #[tokio::test]
    async fn test_invalid_table_name_rejected() {
        let store = Arc::new(MockStore::new());
        let (manager, _) = manager(store.clone());

        let sample = json!({"id": 1});
        let err = manager
            .evolve_table("events; DROP TABLE users", sample.as_object().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::InvalidIdentifier(_)));
        assert!(store.executed_statements().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_column_name_rejected() {
        let store = Arc::new(MockStore::new());
        let (manager, _) = manager(store.clone());

        let sample = json!({"bad column": 1});
        let err = manager
            .evolve_table("events", sample.as_object().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_empty_sample_rejected() {
        let store = Arc::new(MockStore::new());
        let (manager, _) = manager(store.clone());

        let sample = json!({});
        let err = manager
            .evolve_table("events", sample.as_object().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, MigrationError::EmptySample { .. }));
    }

    #[test]
    fn test_definition_hash_is_order_independent() {
        let mut first = BTreeMap::new();
        first.insert("a".to_string(), ColumnType::Integer);
        first.insert("b".to_string(), ColumnType::Text);

        let mut second = BTreeMap::new();
        second.insert("b".to_string(), ColumnType::Text);
        second.insert("a".to_string(), ColumnType::Integer);

        assert_eq!(
            definition_hash(&first).unwrap(),
            definition_hash(&second).unwrap()
        );
    }

    #[test]
    fn test_definition_hash_changes_with_type() {
        let mut first = BTreeMap::new();
        first.insert("a".to_string(), ColumnType::Integer);

        let mut second = BTreeMap::new();
        second.insert("a".to_string(), ColumnType::Text);

        assert_ne!(
            definition_hash(&first).unwrap(),
            definition_hash(&second).unwrap()
        );
    }
}
