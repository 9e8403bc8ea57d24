use sqlx::FromRow;

/// Одна строка таблицы `seats`. Дубликаты допустимы, идентификатора нет.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SeatRecord {
    pub name_en: String,
    pub name_zh: String,
    pub seat: String,
}

impl SeatRecord {
    pub fn new(name_en: impl Into<String>, name_zh: impl Into<String>, seat: impl Into<String>) -> Self {
        Self {
            name_en: name_en.into(),
            name_zh: name_zh.into(),
            seat: seat.into(),
        }
    }

    // Строка без единого заполненного поля не сохраняется
    pub fn is_blank(&self) -> bool {
        self.name_en.is_empty() && self.name_zh.is_empty() && self.seat.is_empty()
    }
}
