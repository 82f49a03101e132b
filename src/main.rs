// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # 二维码 / 条码生成器 — 应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use ecode_generator::config::{self, AppConfig, ConfigState};
use ecode_generator::export::{self, ExportServiceState};
use ecode_generator::generator::{self, GeneratorState};
use ecode_generator::identity::{self, FirebaseIdentity, SessionState};
use ecode_generator::{dashboard, storage};
use tauri::{Manager, RunEvent};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = tauri::Builder::default()
        // 插件初始化
        .plugin(tauri_plugin_dialog::init())
        // 应用设置
        .setup(|app| {
            log::info!("setup: begin");
            let handle = app.handle().clone();

            let config_state = match ConfigState::load(&handle) {
                Ok(state) => state,
                Err(err) => {
                    log::error!("setup: 配置加载失败，使用不落盘的默认配置: {err}");
                    ConfigState::in_memory(AppConfig::default())
                }
            };
            let api_key = config_state.snapshot()?.effective_api_key();
            if api_key.is_none() {
                log::warn!("setup: 未配置身份提供方 API Key，登录功能不可用");
            }
            app.manage(config_state);
            log::info!("setup: config state managed");

            app.manage(ExportServiceState::new());
            app.manage(GeneratorState::new());
            log::info!("setup: generator panels ready");

            match FirebaseIdentity::new(api_key) {
                Ok(identity) => {
                    app.manage(identity);
                    log::info!("setup: identity provider managed");
                }
                Err(err) => {
                    log::error!("setup: 身份服务初始化失败，应用将以受限模式运行: {err}");
                }
            }

            let session = SessionState::new();
            session.init(handle)?;
            app.manage(session);

            log::info!("setup: complete");
            Ok(())
        })
        // 注册所有 Tauri 命令
        .invoke_handler(tauri::generate_handler![
            // 面板
            generator::commands::qr_snapshot,
            generator::commands::qr_set_input,
            generator::commands::qr_set_code_type,
            generator::commands::qr_update_option,
            generator::commands::qr_toggle_advanced,
            generator::commands::barcode_snapshot,
            generator::commands::barcode_set_input,
            generator::commands::barcode_set_code_type,
            generator::commands::barcode_update_option,
            generator::commands::barcode_toggle_advanced,
            // 导出与提示
            generator::commands::export_code,
            generator::commands::dismiss_notification,
            export::commands::get_export_config,
            export::commands::set_export_config,
            // 身份
            identity::commands::login,
            identity::commands::register,
            identity::commands::reset_password,
            identity::commands::google_sign_in,
            identity::commands::logout,
            identity::commands::current_user,
            // 仪表盘
            dashboard::get_dashboard,
            // 配置与存储
            config::get_app_config,
            config::set_app_config,
            storage::get_export_dir_info,
        ])
        .build(tauri::generate_context!())
        .expect("构建 Tauri 应用时出错");

    app.run(|app, event| {
        if let RunEvent::Exit = event {
            if let Some(session) = app.try_state::<SessionState>() {
                session.teardown();
            }
            log::info!("👋 应用退出");
        }
    });
}
