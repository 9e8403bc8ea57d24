use tracing::{info, warn};

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::SeatRecord;
use crate::store::{count_seats, ReplaceTransaction};

/// Потолок размера CSV (3 MiB), проверяется до разбора
pub const MAX_UPLOAD_BYTES: usize = 3 * 1024 * 1024;

pub const REQUIRED_COLUMNS: [&str; 3] = ["name_en", "name_zh", "seat"];

const BOM: char = '\u{feff}';

/// Результат разбора CSV: валидные строки и число пропущенных
#[derive(Debug)]
pub struct ParsedCsv {
    pub replacement: ReplaceTransaction,
    pub skipped: usize,
}

// Кавычки просто вырезаются, запятые внутри кавычек не поддерживаются
fn split_cells(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect()
}

/// Разбирает текст CSV в готовую к коммиту замену таблицы
pub fn parse_csv(text: &str) -> AppResult<ParsedCsv> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let lines: Vec<&str> = text.trim().split('\n').collect();

    if lines.len() < 2 {
        return Err(AppError::MalformedInput);
    }

    let headers = split_cells(lines[0]);
    let position = |column: &str| headers.iter().position(|h| h == column);

    let (Some(en), Some(zh), Some(seat)) = (position("name_en"), position("name_zh"), position("seat")) else {
        let missing = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| position(column).is_none())
            .map(str::to_string)
            .collect();
        return Err(AppError::MissingColumns(missing));
    };
    let min_cells = en.max(zh).max(seat) + 1;

    let mut replacement = ReplaceTransaction::new();
    let mut skipped = 0;

    for line in &lines[1..] {
        let cells = split_cells(line);
        if cells.len() < min_cells {
            skipped += 1;
            continue;
        }

        let record = SeatRecord::new(cells[en].clone(), cells[zh].clone(), cells[seat].clone());
        if record.is_blank() {
            skipped += 1;
            continue;
        }

        replacement.stage(record);
    }

    Ok(ParsedCsv { replacement, skipped })
}

/// Обработчик загрузки: разбор, проверка политики и атомарная замена
#[derive(Clone)]
pub struct UploadProcessor {
    db: Database,
    reject_empty: bool,
}

impl UploadProcessor {
    pub fn new(db: Database, reject_empty: bool) -> Self {
        Self { db, reject_empty }
    }

    /// Возвращает число вставленных строк
    pub async fn process(&self, bytes: &[u8]) -> AppResult<u64> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::FileTooLarge);
        }

        let text = String::from_utf8_lossy(bytes);
        let parsed = parse_csv(&text)?;

        if parsed.replacement.is_empty() {
            if self.reject_empty {
                warn!("Rejected upload without usable rows ({} skipped)", parsed.skipped);
                return Err(AppError::EmptyUpload);
            }
            warn!("Upload has no usable rows ({} skipped), table will be emptied", parsed.skipped);
        }

        let inserted = parsed.replacement.commit(&self.db).await?;
        match count_seats(&self.db).await {
            Ok(total) => info!(
                "Seat table replaced: {} rows inserted, {} skipped, {} in table",
                inserted, parsed.skipped, total
            ),
            Err(e) => warn!("Seat table replaced ({} rows), but count failed: {:?}", inserted, e),
        }
        Ok(inserted)
    }
}
