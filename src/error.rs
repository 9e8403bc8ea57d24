use thiserror::Error;

/// Ошибки всех сценариев. Текст `Display` показывается пользователю как есть,
/// поэтому детали `sqlx::Error` наружу не выводим.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid password")]
    InvalidPassword,

    #[error("Please enter a name to search")]
    EmptySearchInput,

    #[error("No record found. Please check input.")]
    NoRecordFound,

    #[error("File too large.")]
    FileTooLarge,

    #[error("CSV file must have at least a header row and one data row")]
    MalformedInput,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("CSV file contains no usable rows")]
    EmptyUpload,

    #[error("internal storage error")]
    Store(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;
