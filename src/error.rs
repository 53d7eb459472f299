use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EkrError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не удалось прочитать режим из {path:?}: {source}")]
    ModeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Некорректное значение режима в {path:?}: {value:?}")]
    ModeParse { path: PathBuf, value: String },

    #[error("Неверный шаблон поиска: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Внешняя утилита завершилась с ошибкой: {0}")]
    ToolFailed(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl EkrError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(EkrError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, EkrError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! ekr_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::EkrError::DeviceNotFound(format!($($arg)*))
    };
    (tool_failed, $($arg:tt)*) => {
        $crate::error::EkrError::ToolFailed(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::EkrError::Internal(format!($($arg)*))
    };
}
