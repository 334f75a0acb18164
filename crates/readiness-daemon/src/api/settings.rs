use serde_json::Value;
use std::sync::Arc;

use super::{ApiError, Result};
use crate::settings::SettingsManager;
use readiness_core::models::Settings;

pub async fn get(manager: &Arc<SettingsManager>, _params: Option<Value>) -> Result<Value> {
    let settings = manager.get().await?;
    Ok(serde_json::to_value(settings)?)
}

/// Params are the settings record itself; it replaces the stored one wholesale
pub async fn save(manager: &Arc<SettingsManager>, params: Option<Value>) -> Result<Value> {
    let settings: Settings = serde_json::from_value(
        params.ok_or_else(|| ApiError::InvalidParams("Missing params".to_string()))?,
    )
    .map_err(|e| ApiError::InvalidParams(e.to_string()))?;

    let saved = manager.save(settings).await?;
    Ok(serde_json::to_value(saved)?)
}
