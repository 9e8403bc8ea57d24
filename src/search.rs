use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::SeatRecord;

/// Сколько ключевых слов реально уходит в запрос
pub const KEYWORD_CAP: usize = 5;

/// Предупреждение показываем, если во вводе больше стольких слов
pub const WARN_ABOVE_TOKENS: usize = 4;

pub const TRUNCATION_WARNING: &str = "To prevent abuse, only the first 5 keywords were processed.";

/// Разобранный поисковый ввод
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: Vec<String>,
    pub truncated: bool,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let truncated = tokens.len() > WARN_ABOVE_TOKENS;

        Self {
            keywords: tokens
                .into_iter()
                .take(KEYWORD_CAP)
                .map(str::to_string)
                .collect(),
            truncated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Один SELECT: по группе `(name_en OR name_zh)` на каждое слово, группы через OR.
/// `instr` даёт буквальное и регистрозависимое совпадение подстроки.
pub fn build_search_sql(keyword_count: usize) -> String {
    let conditions = vec!["(instr(name_en, ?) > 0 OR instr(name_zh, ?) > 0)"; keyword_count];

    format!(
        "SELECT name_en, name_zh, seat FROM seats WHERE {} ORDER BY name_en",
        conditions.join(" OR ")
    )
}

/// Клиент поиска мест
#[derive(Clone)]
pub struct SeatSearch {
    pool: SqlitePool,
}

impl SeatSearch {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn search(&self, query: &SearchQuery) -> AppResult<Vec<SeatRecord>> {
        // Пустой ввод до базы не доходит
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let sql = build_search_sql(query.keywords.len());
        let mut statement = sqlx::query_as::<_, SeatRecord>(&sql);
        for keyword in &query.keywords {
            statement = statement.bind(keyword).bind(keyword);
        }

        Ok(statement.fetch_all(&self.pool).await?)
    }
}
