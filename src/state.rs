use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::DataMode;
use crate::services::mail::Mailer;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub mode: DataMode,
    pub config: AppConfig,
    pub mailer: Box<dyn Mailer>,
}

impl AppState {
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db.lock().map_err(|_| {
            tracing::error!("database mutex poisoned");
            AppError::StorageUnavailable
        })
    }

    /// Admin writes are refused while serving the synthetic dataset.
    pub fn ensure_writable(&self) -> Result<(), AppError> {
        match self.mode {
            DataMode::Database => Ok(()),
            DataMode::Demo => Err(AppError::StorageUnavailable),
        }
    }
}
