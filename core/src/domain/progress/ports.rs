use std::future::Future;
use uuid::Uuid;

use crate::domain::common::entities::app_errors::CoreError;
use crate::domain::progress::value_objects::ProgressReport;

/// Service trait for photo progress analytics.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressService: Send + Sync {
    fn get_photo_progress(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<ProgressReport, CoreError>> + Send;
}
