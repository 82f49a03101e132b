//! # Tauri 命令层
//!
//! 每次调用都按当前配置取 API Key，配置修改后无需重启即可生效。

use tauri::State;

use super::{FirebaseIdentity, SessionState, User};
use crate::config::ConfigState;
use crate::error::AppError;

fn provider(base: &FirebaseIdentity, config: &ConfigState) -> Result<FirebaseIdentity, AppError> {
    let snapshot = config.snapshot()?;
    Ok(base.with_api_key(snapshot.effective_api_key()))
}

#[tauri::command]
pub async fn login(
    session: State<'_, SessionState>,
    identity: State<'_, FirebaseIdentity>,
    config: State<'_, ConfigState>,
    email: String,
    password: String,
) -> Result<User, AppError> {
    let provider = provider(&identity, &config)?;
    Ok(session.login(&provider, &email, &password).await?)
}

#[tauri::command]
pub async fn register(
    session: State<'_, SessionState>,
    identity: State<'_, FirebaseIdentity>,
    config: State<'_, ConfigState>,
    email: String,
    password: String,
    display_name: String,
) -> Result<User, AppError> {
    let provider = provider(&identity, &config)?;
    Ok(session.register(&provider, &email, &password, &display_name).await?)
}

#[tauri::command]
pub async fn reset_password(
    session: State<'_, SessionState>,
    identity: State<'_, FirebaseIdentity>,
    config: State<'_, ConfigState>,
    email: String,
) -> Result<String, AppError> {
    let provider = provider(&identity, &config)?;
    Ok(session.reset_password(&provider, &email).await?.to_string())
}

#[tauri::command]
pub async fn google_sign_in(
    session: State<'_, SessionState>,
    identity: State<'_, FirebaseIdentity>,
    config: State<'_, ConfigState>,
    id_token: String,
) -> Result<User, AppError> {
    let provider = provider(&identity, &config)?;
    Ok(session.google_sign_in(&provider, &id_token).await?)
}

#[tauri::command]
pub async fn logout(
    session: State<'_, SessionState>,
    identity: State<'_, FirebaseIdentity>,
) -> Result<(), AppError> {
    Ok(session.logout(&*identity).await?)
}

#[tauri::command]
pub fn current_user(session: State<'_, SessionState>) -> Option<User> {
    session.current()
}
