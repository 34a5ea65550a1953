//! C FFI layer for embedding the engine in non-Rust hosts.
//!
//! All functions are `extern "C"` and exchange data as JSON strings.
//! Playback commands are queued inside the engine and handed back to the
//! host after every call that can produce them.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;

use serde::Serialize;

use crate::config::{BackdropConfig, ConfigLoader};
use crate::engine::BackdropEngine;
use crate::sink::CommandQueue;

/// Opaque handle for a BackdropEngine with a queued command sink.
pub struct FfiBackdropEngine(BackdropEngine<CommandQueue>);

/// Reads an optional UTF-8 C string. `Err(())` means the bytes were not UTF-8.
unsafe fn opt_str<'a>(s: *const c_char) -> Result<Option<&'a str>, ()> {
    if s.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(s).to_str().map(Some).map_err(|_| ())
}

fn to_json_cstring<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => cstr.into_raw(),
            Err(_) => ptr::null_mut(),
        },
        Err(_) => ptr::null_mut(),
    }
}

fn into_handle(config: BackdropConfig) -> *mut FfiBackdropEngine {
    let engine = BackdropEngine::new(config, CommandQueue::new());
    Box::into_raw(Box::new(FfiBackdropEngine(engine)))
}

// ============================================================================
// Engine lifecycle
// ============================================================================

/// Creates a new engine from a YAML config string. A null pointer uses the
/// built-in defaults.
///
/// # Safety
/// - `config_yaml` must be null or a valid null-terminated UTF-8 string
/// - The returned pointer must be freed with `backdrop_engine_free`
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_new(config_yaml: *const c_char) -> *mut FfiBackdropEngine {
    let yaml = match opt_str(config_yaml) {
        Ok(yaml) => yaml,
        Err(_) => return ptr::null_mut(),
    };

    let config = match yaml {
        None => BackdropConfig::default(),
        Some(yaml) => match ConfigLoader::from_yaml_str(yaml) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Rejected backdrop config: {}", e);
                return ptr::null_mut();
            }
        },
    };

    into_handle(config)
}

/// Creates a new engine from a YAML config file.
///
/// # Safety
/// - `path` must be a valid null-terminated UTF-8 string
/// - The returned pointer must be freed with `backdrop_engine_free`
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_new_from_file(path: *const c_char) -> *mut FfiBackdropEngine {
    let path = match opt_str(path) {
        Ok(Some(path)) => path,
        _ => return ptr::null_mut(),
    };

    match ConfigLoader::new().load(Path::new(path)) {
        Ok(config) => into_handle(config),
        Err(e) => {
            tracing::warn!("Failed to load backdrop config {}: {}", path, e);
            ptr::null_mut()
        }
    }
}

/// Frees an engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by a `backdrop_engine_new*` function
/// - `engine` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_free(engine: *mut FfiBackdropEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

// ============================================================================
// Events
// ============================================================================

/// Delivers a notification and returns the playback commands it produced
/// (plus any still queued) as a JSON array.
///
/// Returns null if the arguments are invalid or the payload is not JSON.
///
/// # Safety
/// - `engine` must be a valid pointer
/// - `notification` must be a valid null-terminated UTF-8 string
/// - `payload_json` must be null or a valid null-terminated UTF-8 string
/// - The returned string must be freed with `backdrop_free_string`
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_notify(
    engine: *mut FfiBackdropEngine,
    notification: *const c_char,
    payload_json: *const c_char,
) -> *mut c_char {
    if engine.is_null() {
        return ptr::null_mut();
    }
    let engine = &mut (*engine).0;

    let notification = match opt_str(notification) {
        Ok(Some(name)) => name,
        _ => return ptr::null_mut(),
    };
    let payload = match opt_str(payload_json) {
        Ok(None) => serde_json::Value::Null,
        Ok(Some(json)) => match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Malformed JSON payload for {}: {}", notification, e);
                return ptr::null_mut();
            }
        },
        Err(_) => return ptr::null_mut(),
    };

    engine.notify(notification, &payload);
    to_json_cstring(&engine.sink_mut().drain())
}

/// Asks the engine to resume the current video (host re-render) and returns
/// the queued commands as a JSON array.
///
/// # Safety
/// - `engine` must be a valid pointer
/// - The returned string must be freed with `backdrop_free_string`
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_refresh(engine: *mut FfiBackdropEngine) -> *mut c_char {
    if engine.is_null() {
        return ptr::null_mut();
    }
    let engine = &mut (*engine).0;
    engine.refresh();
    to_json_cstring(&engine.sink_mut().drain())
}

/// Returns queued playback commands as a JSON array without delivering an event.
///
/// # Safety
/// - `engine` must be a valid pointer
/// - The returned string must be freed with `backdrop_free_string`
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_take_commands(engine: *mut FfiBackdropEngine) -> *mut c_char {
    if engine.is_null() {
        return ptr::null_mut();
    }
    to_json_cstring(&(*engine).0.sink_mut().drain())
}

/// Logs a playback failure reported by the host's player.
///
/// # Safety
/// - `engine` must be a valid pointer
/// - `url` and `reason` must be null or valid null-terminated UTF-8 strings
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_report_playback_failure(
    engine: *const FfiBackdropEngine,
    url: *const c_char,
    reason: *const c_char,
) {
    if engine.is_null() {
        return;
    }
    let url = opt_str(url).ok().flatten().unwrap_or("<unknown>");
    let reason = opt_str(reason).ok().flatten().unwrap_or("<unknown>");
    (*engine).0.report_playback_failure(url, reason);
}

/// Returns the engine state (current scene, sun times, override) as JSON.
///
/// # Safety
/// - `engine` must be a valid pointer
/// - The returned string must be freed with `backdrop_free_string`
#[no_mangle]
pub unsafe extern "C" fn backdrop_engine_state_json(engine: *const FfiBackdropEngine) -> *mut c_char {
    if engine.is_null() {
        return ptr::null_mut();
    }
    to_json_cstring(&(*engine).0.snapshot())
}

// ============================================================================
// Utilities
// ============================================================================

/// Frees a string returned by an FFI function.
///
/// # Safety
/// - `s` must be a valid pointer returned by a backdrop FFI function, or null
#[no_mangle]
pub unsafe extern "C" fn backdrop_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Returns the library version as a string.
///
/// # Safety
/// - The returned string must be freed with `backdrop_free_string`
#[no_mangle]
pub extern "C" fn backdrop_version() -> *mut c_char {
    let version = env!("CARGO_PKG_VERSION");
    match CString::new(version) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SinkCommand;
    use std::io::Write;
    use tempfile::TempDir;

    unsafe fn take_string(s: *mut c_char) -> String {
        assert!(!s.is_null());
        let owned = CStr::from_ptr(s).to_str().unwrap().to_string();
        backdrop_free_string(s);
        owned
    }

    unsafe fn take_commands(s: *mut c_char) -> Vec<SinkCommand> {
        serde_json::from_str(&take_string(s)).unwrap()
    }

    #[test]
    fn test_engine_create_free_with_defaults() {
        unsafe {
            let engine = backdrop_engine_new(ptr::null());
            assert!(!engine.is_null());
            let seeded = take_commands(backdrop_engine_take_commands(engine));
            assert_eq!(seeded.len(), 1);
            backdrop_engine_free(engine);
        }
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let yaml = CString::new("sprite_sheets:\n  rain: rain.mp4\n").unwrap();
        unsafe {
            assert!(backdrop_engine_new(yaml.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_engine_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backdrop.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"sprite_sheets:\n  default: sky.webm\n").unwrap();
        let path = CString::new(path.to_str().unwrap()).unwrap();

        unsafe {
            let engine = backdrop_engine_new_from_file(path.as_ptr());
            assert!(!engine.is_null());
            backdrop_engine_free(engine);
        }
    }

    #[test]
    fn test_notify_returns_commands() {
        let name = CString::new("CURRENTWEATHER_TYPE").unwrap();
        let payload = CString::new(r#"{"type": "rain"}"#).unwrap();

        unsafe {
            let engine = backdrop_engine_new(ptr::null());
            take_string(backdrop_engine_take_commands(engine));

            let commands = take_commands(backdrop_engine_notify(engine, name.as_ptr(), payload.as_ptr()));
            assert!(matches!(
                commands.as_slice(),
                [SinkCommand::LoadAndPlay { url, .. }] if url.ends_with("videos/rain-day.mp4")
            ));

            let commands = take_commands(backdrop_engine_notify(engine, name.as_ptr(), payload.as_ptr()));
            assert_eq!(commands, vec![SinkCommand::ResumeIfPaused]);

            let state = take_string(backdrop_engine_state_json(engine));
            assert!(state.contains("\"rain\""));

            backdrop_engine_free(engine);
        }
    }

    #[test]
    fn test_notify_malformed_json_is_null() {
        let name = CString::new("CURRENTWEATHER_TYPE").unwrap();
        let payload = CString::new("{not json").unwrap();
        unsafe {
            let engine = backdrop_engine_new(ptr::null());
            assert!(backdrop_engine_notify(engine, name.as_ptr(), payload.as_ptr()).is_null());
            backdrop_engine_free(engine);
        }
    }

    #[test]
    fn test_free_null_string() {
        unsafe {
            // Should not crash
            backdrop_free_string(ptr::null_mut());
            backdrop_engine_free(ptr::null_mut());
        }
    }

    #[test]
    fn test_version() {
        unsafe {
            let version = take_string(backdrop_version());
            assert!(!version.is_empty());
        }
    }
}
