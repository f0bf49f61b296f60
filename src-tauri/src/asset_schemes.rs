use shell_host::{serve_storage, AssetResponse, APP_SCHEME, STORAGE_SCHEME};
use tauri::{
    http::{
        header::{ALLOW, CACHE_CONTROL, CONTENT_TYPE},
        Method, Request, Response, StatusCode,
    },
    AppHandle, Builder, Manager, Wry,
};

use crate::{append_protocol_log, ShellState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemeMode {
    Buffer,
    File,
}

fn plain_status(status: StatusCode) -> Response<Vec<u8>> {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = status;
    response
}

pub(crate) fn into_http_response(asset: AssetResponse) -> Response<Vec<u8>> {
    let mut builder = Response::builder()
        .status(asset.status)
        .header(CACHE_CONTROL, "no-store");
    if let Some(mime_type) = asset.mime_type {
        builder = builder.header(CONTENT_TYPE, mime_type);
    }

    builder
        .body(asset.body)
        .unwrap_or_else(|_| plain_status(StatusCode::INTERNAL_SERVER_ERROR))
}

fn method_not_allowed() -> Response<Vec<u8>> {
    let mut response = plain_status(StatusCode::METHOD_NOT_ALLOWED);
    response
        .headers_mut()
        .insert(ALLOW, tauri::http::HeaderValue::from_static("GET"));
    response
}

fn handle_scheme_request(
    app_handle: &AppHandle,
    mode: SchemeMode,
    request: &Request<Vec<u8>>,
) -> Response<Vec<u8>> {
    if request.method() != Method::GET {
        append_protocol_log(&format!(
            "rejected {} {}: only GET is served",
            request.method(),
            request.uri()
        ));
        return method_not_allowed();
    }

    let Some(state) = app_handle.try_state::<ShellState>() else {
        append_protocol_log(&format!(
            "shell state unavailable while serving {}",
            request.uri()
        ));
        return plain_status(StatusCode::SERVICE_UNAVAILABLE);
    };

    let uri = request.uri().to_string();
    let asset = match mode {
        SchemeMode::Buffer => state.assets.respond(&uri, append_protocol_log),
        SchemeMode::File => serve_storage(
            STORAGE_SCHEME,
            &uri,
            &state.storage_root,
            append_protocol_log,
        ),
    };
    into_http_response(asset)
}

fn register_scheme(builder: Builder<Wry>, scheme: &'static str, mode: SchemeMode) -> Builder<Wry> {
    builder.register_asynchronous_uri_scheme_protocol(scheme, move |ctx, request, responder| {
        let app_handle = ctx.app_handle().clone();
        tauri::async_runtime::spawn_blocking(move || {
            responder.respond(handle_scheme_request(&app_handle, mode, &request));
        });
    })
}

/// Installs the `app://` (buffer mode) and `storage://` (file mode) handlers. Every request is
/// answered exactly once, off the UI thread.
pub(crate) fn register_asset_schemes(builder: Builder<Wry>) -> Builder<Wry> {
    let builder = register_scheme(builder, APP_SCHEME, SchemeMode::Buffer);
    register_scheme(builder, STORAGE_SCHEME, SchemeMode::File)
}
