use std::sync::Mutex;

use mandel_view_core::{CommandQueue, ViewerConfig, ViewerSession};
use mandel_view_protocol::{Point, SurfaceTransform};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Handle-indexed slots. Removing empties a slot; handles are never reused.
struct Registry<T> {
    slots: Vec<Option<T>>,
}

impl<T> Registry<T> {
    const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn insert(&mut self, value: T) -> usize {
        self.slots.push(Some(value));
        self.slots.len() - 1
    }

    fn get_mut(&mut self, handle: usize) -> Option<&mut T> {
        self.slots.get_mut(handle).and_then(Option::as_mut)
    }

    fn remove(&mut self, handle: usize) -> Option<T> {
        self.slots.get_mut(handle).and_then(Option::take)
    }
}

static SESSIONS: Mutex<Registry<ViewerSession<CommandQueue>>> = Mutex::new(Registry::new());

fn with_session<T>(
    handle: usize,
    f: impl FnOnce(&mut ViewerSession<CommandQueue>) -> Result<T, JsError>,
) -> Result<T, JsError> {
    let mut sessions = SESSIONS
        .lock()
        .map_err(|_| JsError::new("session registry poisoned"))?;
    let session = sessions
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid or destroyed session handle"))?;
    f(session)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Start a viewer session from a JSON config (empty string = defaults).
/// Returns a handle for later calls.
///
/// The first `showImage` command is queued immediately; fetch it with
/// [`take_commands`].
#[wasm_bindgen]
pub fn create_session(config_json: &str) -> Result<usize, JsError> {
    let config = if config_json.trim().is_empty() {
        ViewerConfig::default()
    } else {
        ViewerConfig::from_json(config_json.as_bytes())
            .map_err(|e| JsError::new(&e.to_string()))?
    };
    let (width, height) = config.viewport_size();
    let surface = CommandQueue::at_rest(width, height, config.gesture.neutral_zoom_level);
    let session =
        ViewerSession::new(config, surface).map_err(|e| JsError::new(&e.to_string()))?;

    let mut sessions = SESSIONS
        .lock()
        .map_err(|_| JsError::new("session registry poisoned"))?;
    Ok(sessions.insert(session))
}

/// End a session and free its state. Later calls with `handle` fail.
#[wasm_bindgen]
pub fn destroy_session(handle: usize) -> Result<(), JsError> {
    let mut sessions = SESSIONS
        .lock()
        .map_err(|_| JsError::new("session registry poisoned"))?;
    sessions
        .remove(handle)
        .map(drop)
        .ok_or_else(|| JsError::new("invalid or destroyed session handle"))
}

/// Report the pan/zoom widget's transform (model position of the viewport
/// center and its zoom level) and fold it into the view. Returns the new
/// state as JSON.
#[wasm_bindgen]
pub fn gesture(
    handle: usize,
    model_x: f64,
    model_y: f64,
    zoom_level: i32,
) -> Result<String, JsError> {
    with_session(handle, |session| {
        session.surface_mut().set_transform(SurfaceTransform {
            model_center: Point::new(model_x, model_y),
            zoom_level,
        });
        let state = session
            .on_gesture()
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_json(&state)
    })
}

/// Signal that the displayed image finished loading. Returns the rect to
/// fit as JSON, or `undefined` if no image was pending.
#[wasm_bindgen]
pub fn image_loaded(handle: usize) -> Result<Option<String>, JsError> {
    with_session(handle, |session| {
        session.on_image_load().map(|rect| to_json(&rect)).transpose()
    })
}

/// Drain queued surface commands as a JSON array.
#[wasm_bindgen]
pub fn take_commands(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| to_json(&session.surface_mut().drain()))
}

/// Query string (no leading `?`) of the `/render` image for the current state.
#[wasm_bindgen]
pub fn image_query(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| Ok(session.image_request().to_query()))
}

#[wasm_bindgen]
pub fn get_state(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| to_json(session.state()))
}

#[wasm_bindgen]
pub fn get_extents(handle: usize) -> Result<String, JsError> {
    with_session(handle, |session| to_json(&session.extents()))
}

#[wasm_bindgen]
pub fn reset(handle: usize) -> Result<(), JsError> {
    with_session(handle, |session| {
        session.reset();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handles_stay_dead() {
        let mut registry = Registry::new();
        let a = registry.insert("a");
        let b = registry.insert("b");
        assert_eq!(registry.remove(a), Some("a"));
        assert_eq!(registry.get_mut(a), None);
        assert_eq!(registry.remove(a), None);
        assert_eq!(registry.get_mut(b), Some(&mut "b"));

        // A new session never takes over an old handle.
        let c = registry.insert("c");
        assert_ne!(c, a);
        assert_eq!(registry.get_mut(c), Some(&mut "c"));
        assert_eq!(registry.get_mut(99), None);
    }

    #[test]
    fn destroyed_session_state_is_dropped() {
        let config = ViewerConfig::default();
        let surface = CommandQueue::at_rest(900.0, 600.0, config.gesture.neutral_zoom_level);
        let mut registry = Registry::new();
        let handle = registry.insert(ViewerSession::new(config, surface).unwrap());
        assert!(registry.get_mut(handle).is_some());
        assert!(registry.remove(handle).is_some());
        assert!(registry.get_mut(handle).is_none());
    }
}
