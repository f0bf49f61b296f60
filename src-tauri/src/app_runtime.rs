use shell_host::ShellConfig;
use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, asset_schemes, desktop_bridge, load_task, main_window,
    runtime_paths, ShellState, LINUX_DISABLE_COMPOSITING_ENV, MAIN_WINDOW_LABEL,
};

fn apply_hardware_acceleration_policy(config: &ShellConfig) {
    if config.hardware_acceleration {
        return;
    }

    if cfg!(target_os = "linux") && std::env::var_os(LINUX_DISABLE_COMPOSITING_ENV).is_none() {
        std::env::set_var(LINUX_DISABLE_COMPOSITING_ENV, "1");
        append_startup_log("hardware acceleration disabled for the webview");
    }
}

pub(crate) fn run() {
    let config = ShellConfig::from_env();
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop mode: {}",
        if config.development_server {
            "development server"
        } else {
            "packaged"
        }
    ));
    apply_hardware_acceleration_policy(&config);

    let builder = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _args, _cwd| {
            append_desktop_log("second instance launched; focusing main window");
            main_window::focus_main_window(app_handle, append_desktop_log);
        }))
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_invoke,
        ]);

    asset_schemes::register_asset_schemes(builder)
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            if let WindowEvent::Destroyed = event {
                let app_handle = window.app_handle();
                if let Some(state) = app_handle.try_state::<ShellState>() {
                    state.load_cancel.cancel();
                }
                append_desktop_log("main window closed, quitting");
                app_handle.exit(0);
            }
        })
        .on_page_load(|webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {}", payload.url()));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {}", payload.url()));
                let app_handle = webview.app_handle();
                let Some(state) = app_handle.try_state::<ShellState>() else {
                    return;
                };
                if state.config.open_devtools
                    && payload.url().scheme() != "about"
                    && state.claim_devtools_open()
                {
                    main_window::open_devtools(app_handle, append_desktop_log);
                }
            }
        })
        .setup(move |app| {
            let app_handle = app.handle().clone();

            let webui_dir =
                runtime_paths::resolve_webui_dir(&app_handle, &config, append_startup_log);
            append_startup_log(&format!("serving app scheme from {}", webui_dir.display()));

            let routes = desktop_bridge::load_route_table(
                &webui_dir,
                config.route_order,
                append_startup_log,
            );
            let bridge = desktop_bridge::build_capability_registry(routes)
                .map_err(|error| format!("Failed to register bridge capabilities: {error}"))?;
            let bridge_script = desktop_bridge::bridge_script(&bridge);
            let hardware_acceleration = config.hardware_acceleration;

            app.manage(ShellState::new(
                config,
                webui_dir,
                runtime_paths::storage_root_dir(),
                bridge,
            ));

            main_window::create_main_window(&app_handle, &bridge_script, hardware_acceleration)?;
            load_task::spawn_initial_load(&app_handle, append_startup_log)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, event| {
            if let RunEvent::Exit = event {
                append_desktop_log("desktop process exiting");
            }
        });
}
