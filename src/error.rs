use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;

/// Helper trait for converting Option to AppError::NotFound
pub trait OptionExt<T> {
    fn ok_or_not_found(self, msg: impl Into<String>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, msg: impl Into<String>) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(msg.into()))
    }
}

/// Helper trait for wrapping store failures with the step that failed
pub trait StoreStep<T> {
    fn step(self, context: &str) -> AppResult<T>;
}

impl<T> StoreStep<T> for Result<T, sea_orm::DbErr> {
    fn step(self, context: &str) -> AppResult<T> {
        self.map_err(|source| {
            tracing::error!("{}: {}", context, source);
            AppError::Store {
                context: context.to_string(),
                source,
            }
        })
    }
}

/// Helper to convert anyhow errors to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_ext() {
        let opt: Option<i32> = None;
        let result = opt.ok_or_not_found("pohon kinerja tidak ditemukan");
        assert!(matches!(result, Err(AppError::NotFound(_))));

        assert_eq!(Some(7).ok_or_not_found("x").unwrap(), 7);
    }

    #[test]
    fn test_store_step_context() {
        let err: Result<(), sea_orm::DbErr> =
            Err(sea_orm::DbErr::Custom("koneksi terputus".to_string()));
        let wrapped = err.step("gagal menghapus target").unwrap_err();
        assert!(wrapped.to_string().starts_with("gagal menghapus target"));
    }
}
