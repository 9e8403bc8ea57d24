use tracing::error;

use crate::database::Database;
use crate::models::SeatRecord;

/// Замена всей таблицы `seats` одной транзакцией.
///
/// Строки сначала копятся в памяти, `commit` выполняет `DELETE` и все `INSERT`
/// атомарно. При любой ошибке транзакция откатывается и старые данные остаются.
#[derive(Debug, Default)]
pub struct ReplaceTransaction {
    staged: Vec<SeatRecord>,
}

impl ReplaceTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, record: SeatRecord) {
        self.staged.push(record);
    }

    #[cfg(test)]
    pub(crate) fn records(&self) -> &[SeatRecord] {
        &self.staged
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Возвращает количество вставленных строк
    pub async fn commit(self, db: &Database) -> Result<u64, sqlx::Error> {
        let mut tx = db.pool.begin().await?;

        sqlx::query("DELETE FROM seats").execute(&mut *tx).await?;

        let mut inserted = 0u64;
        for record in &self.staged {
            let result = sqlx::query("INSERT INTO seats (name_en, name_zh, seat) VALUES (?, ?, ?)")
                .bind(&record.name_en)
                .bind(&record.name_zh)
                .bind(&record.seat)
                .execute(&mut *tx)
                .await;

            match result {
                Ok(done) => inserted += done.rows_affected(),
                Err(e) => {
                    error!("replace aborted at staged row {}: {:?}", inserted, e);
                    // откатываем транзакцию и возвращаем ошибку
                    let _ = tx.rollback().await;
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

pub async fn count_seats(db: &Database) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM seats")
        .fetch_one(&db.pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn migrated() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    async fn all_rows(db: &Database) -> Vec<SeatRecord> {
        sqlx::query_as::<_, SeatRecord>("SELECT name_en, name_zh, seat FROM seats ORDER BY rowid")
            .fetch_all(&db.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn commit_replaces_previous_rows() {
        let db = migrated().await;

        let mut first = ReplaceTransaction::new();
        first.stage(SeatRecord::new("Old", "旧", "Z1"));
        first.stage(SeatRecord::new("Older", "更旧", "Z2"));
        assert_eq!(first.commit(&db).await.unwrap(), 2);

        let mut second = ReplaceTransaction::new();
        second.stage(SeatRecord::new("Alice", "爱丽丝", "A12"));
        assert_eq!(second.commit(&db).await.unwrap(), 1);

        assert_eq!(all_rows(&db).await, vec![SeatRecord::new("Alice", "爱丽丝", "A12")]);
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let db = migrated().await;
        let mut tx = ReplaceTransaction::new();
        tx.stage(SeatRecord::new("Alice", "", "A1"));
        tx.stage(SeatRecord::new("Alice", "", "A1"));
        assert_eq!(tx.len(), 2);
        tx.commit(&db).await.unwrap();
        assert_eq!(count_seats(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_commit_clears_table() {
        let db = migrated().await;
        let mut seed = ReplaceTransaction::new();
        seed.stage(SeatRecord::new("Old", "", "Z1"));
        seed.commit(&db).await.unwrap();

        let empty = ReplaceTransaction::new();
        assert!(empty.is_empty());
        assert_eq!(empty.commit(&db).await.unwrap(), 0);
        assert_eq!(count_seats(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_commit_keeps_old_rows() {
        let db = migrated().await;
        let mut seed = ReplaceTransaction::new();
        seed.stage(SeatRecord::new("Old", "", "Z1"));
        seed.commit(&db).await.unwrap();

        // Триггер роняет вставку второй строки посреди транзакции
        sqlx::query(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON seats \
             WHEN NEW.seat = 'BOOM' BEGIN SELECT RAISE(ABORT, 'boom'); END",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let mut tx = ReplaceTransaction::new();
        tx.stage(SeatRecord::new("New", "", "N1"));
        tx.stage(SeatRecord::new("Bad", "", "BOOM"));
        assert!(tx.commit(&db).await.is_err());

        assert_eq!(all_rows(&db).await, vec![SeatRecord::new("Old", "", "Z1")]);
    }
}
