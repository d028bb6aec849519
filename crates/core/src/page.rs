//! WebPage handle.
//!
//! A `WebPage` is a local reference to a remote page object living inside
//! an open [`Process`](crate::Process). Every operation is one synchronous
//! call through the owning process's control channel; the handle itself
//! holds no page state beyond its identifier and the frame-navigation
//! context.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::Mutex;
use phantomjs_protocol::{Cookie, Headers, PaperSize, Position, Rect, Request};
use phantomjs_runtime::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_json::Value;

use crate::frame::FrameContext;
use crate::process::ProcessInner;
use crate::registry::ChildObservation;

/// A child page as the engine reports it.
#[derive(Debug, Deserialize)]
struct PageDescriptor {
    id: String,
    #[serde(default, rename = "windowName")]
    window_name: String,
}

/// A handle to a remote page object.
///
/// The handle is valid while its owning process is open and the remote
/// page has not been closed; afterwards every operation fails
/// deterministically with `Error::InvalidHandle`.
pub struct WebPage {
    process: Arc<ProcessInner>,
    id: String,
    frame: Mutex<FrameContext>,
    closed: AtomicBool,
}

impl fmt::Debug for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPage")
            .field("id", &self.id)
            .field("frame", &*self.frame.lock())
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}

impl WebPage {
    pub(crate) fn attached(process: Arc<ProcessInner>, id: String) -> Self {
        Self {
            process,
            id,
            frame: Mutex::new(FrameContext::MainFrame),
            closed: AtomicBool::new(false),
        }
    }

    fn call(&self, request: Request) -> Result<Value> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::InvalidHandle(format!("page {} is closed", self.id)));
        }
        if !self.process.registry.contains(&self.id) {
            return Err(Error::InvalidHandle(format!(
                "page {} is no longer tracked",
                self.id
            )));
        }
        self.process.call(&request)
    }

    /// Reads a page property.
    fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.call(Request::object(&self.id, name))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Reads a string property, treating an engine `null` as empty.
    fn get_string(&self, name: &str) -> Result<String> {
        match self.call(Request::object(&self.id, name))? {
            Value::Null => Ok(String::new()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    /// Writes a page property.
    fn set<T: Serialize>(&self, name: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.call(Request::object(&self.id, name).arg(value))?;
        Ok(())
    }

    /// Invokes a page method.
    fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        self.call(Request::object(&self.id, name).args(args))
    }

    /// Reads a frame-scoped string property under the current context.
    fn frame_get_string(&self, name: &str) -> Result<String> {
        let selector = self.frame.lock().selector();
        match self.call(Request::object(&self.id, name).frame(selector))? {
            Value::Null => Ok(String::new()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    // --- document ---------------------------------------------------------

    /// Navigates the page to a URL, blocking until the load finishes.
    /// Resets the frame context to the top-level document.
    pub fn open(&self, url: &str) -> Result<()> {
        self.invoke("open", vec![Value::String(url.to_string())])?;
        *self.frame.lock() = FrameContext::MainFrame;
        Ok(())
    }

    /// Releases the remote page object. Subsequent calls on this handle
    /// fail with `Error::InvalidHandle`. Tracked child pages stay alive
    /// until closed explicitly.
    pub fn close(&self) -> Result<()> {
        self.invoke("close", Vec::new())?;
        self.process.registry.remove(&self.id);
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    /// The page's HTML content.
    pub fn content(&self) -> Result<String> {
        self.get_string("content")
    }

    /// Replaces the page's HTML content.
    pub fn set_content(&self, content: &str) -> Result<()> {
        self.set("content", content)
    }

    /// The page's content reduced to plain text.
    pub fn plain_text(&self) -> Result<String> {
        self.get_string("plainText")
    }

    /// The page title.
    pub fn title(&self) -> Result<String> {
        self.get_string("title")
    }

    /// The page's current URL.
    pub fn url(&self) -> Result<String> {
        self.get_string("url")
    }

    /// Whether the page can navigate forward in its history.
    pub fn can_go_forward(&self) -> Result<bool> {
        self.get("canGoForward")
    }

    /// Whether the page can navigate back in its history.
    pub fn can_go_back(&self) -> Result<bool> {
        self.get("canGoBack")
    }

    /// Navigates back in the page's history.
    pub fn go_back(&self) -> Result<()> {
        self.invoke("goBack", Vec::new()).map(|_| ())
    }

    /// Navigates forward in the page's history.
    pub fn go_forward(&self) -> Result<()> {
        self.invoke("goForward", Vec::new()).map(|_| ())
    }

    /// Reloads the current page.
    pub fn reload(&self) -> Result<()> {
        self.invoke("reload", Vec::new()).map(|_| ())
    }

    /// Stops loading the current page.
    pub fn stop(&self) -> Result<()> {
        self.invoke("stop", Vec::new()).map(|_| ())
    }

    /// Evaluates a JavaScript function body in the page context and
    /// returns its result. `js` must be a full function expression, e.g.
    /// `function() { return document.title; }`.
    pub fn evaluate_javascript(&self, js: &str) -> Result<Value> {
        self.invoke("evaluateJavaScript", vec![Value::String(js.to_string())])
    }

    /// Renders the page to a file; the format is inferred from the
    /// extension.
    pub fn render(&self, path: &str) -> Result<()> {
        self.invoke("render", vec![Value::String(path.to_string())])
            .map(|_| ())
    }

    /// Renders the page and returns the raw image bytes.
    pub fn render_base64(&self, format: &str) -> Result<Vec<u8>> {
        let value = self.invoke("renderBase64", vec![Value::String(format.to_string())])?;
        let encoded: String = serde_json::from_value(value)?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| Error::Remote(format!("invalid base64 render payload: {e}")))
    }

    // --- attributes -------------------------------------------------------

    /// The clipping rectangle used when rendering. The zero value means
    /// no clip rectangle has been set.
    pub fn clip_rect(&self) -> Result<Rect> {
        self.get("clipRect")
    }

    /// Sets the clipping rectangle used when rendering.
    pub fn set_clip_rect(&self, rect: Rect) -> Result<()> {
        self.set("clipRect", rect)
    }

    /// The cookies visible to this page.
    pub fn cookies(&self) -> Result<Vec<Cookie>> {
        self.get("cookies")
    }

    /// Replaces the page's cookie set.
    pub fn set_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        self.set("cookies", cookies)
    }

    /// Adds one cookie; returns whether the engine accepted it.
    pub fn add_cookie(&self, cookie: &Cookie) -> Result<bool> {
        let value = self.invoke("addCookie", vec![serde_json::to_value(cookie)?])?;
        Ok(serde_json::from_value(value)?)
    }

    /// Deletes the named cookie; returns whether one was removed.
    pub fn delete_cookie(&self, name: &str) -> Result<bool> {
        let value = self.invoke("deleteCookie", vec![Value::String(name.to_string())])?;
        Ok(serde_json::from_value(value)?)
    }

    /// Removes every cookie visible to this page.
    pub fn clear_cookies(&self) -> Result<()> {
        self.invoke("clearCookies", Vec::new()).map(|_| ())
    }

    /// The custom headers sent with every request from this page.
    pub fn custom_headers(&self) -> Result<Headers> {
        self.get("customHeaders")
    }

    /// Replaces the full custom-header set; no merge with a previously
    /// set one.
    pub fn set_custom_headers(&self, headers: &Headers) -> Result<()> {
        self.set("customHeaders", headers)
    }

    /// The library path used to resolve injected scripts.
    pub fn library_path(&self) -> Result<String> {
        self.get_string("libraryPath")
    }

    /// Sets the library path used to resolve injected scripts.
    pub fn set_library_path(&self, path: &str) -> Result<()> {
        self.set("libraryPath", path)
    }

    /// Whether navigation away from the current page is locked.
    pub fn navigation_locked(&self) -> Result<bool> {
        self.get("navigationLocked")
    }

    /// Locks or unlocks navigation away from the current page.
    pub fn set_navigation_locked(&self, locked: bool) -> Result<()> {
        self.set("navigationLocked", locked)
    }

    /// The engine's offline-storage directory.
    pub fn offline_storage_path(&self) -> Result<String> {
        self.get_string("offlineStoragePath")
    }

    /// The offline-storage quota in bytes.
    pub fn offline_storage_quota(&self) -> Result<i64> {
        self.get("offlineStorageQuota")
    }

    /// Whether windows opened by this page are tracked as children.
    pub fn owns_pages(&self) -> Result<bool> {
        self.get("ownsPages")
    }

    /// Toggles tracking of windows opened by this page.
    pub fn set_owns_pages(&self, owns: bool) -> Result<()> {
        self.set("ownsPages", owns)
    }

    /// The paper size used when rendering to a paged format. The zero
    /// value means no paper size has been set.
    pub fn paper_size(&self) -> Result<PaperSize> {
        self.get("paperSize")
    }

    /// Sets the paper size used when rendering to a paged format.
    pub fn set_paper_size(&self, size: &PaperSize) -> Result<()> {
        self.set("paperSize", size)
    }

    /// The current scroll position.
    pub fn scroll_position(&self) -> Result<Position> {
        self.get("scrollPosition")
    }

    /// Sets the scroll position.
    pub fn set_scroll_position(&self, position: Position) -> Result<()> {
        self.set("scrollPosition", position)
    }

    /// The zoom factor applied to the page.
    pub fn zoom_factor(&self) -> Result<f64> {
        self.get("zoomFactor")
    }

    /// Sets the zoom factor applied to the page.
    pub fn set_zoom_factor(&self, factor: f64) -> Result<()> {
        self.set("zoomFactor", factor)
    }

    // --- child pages ------------------------------------------------------

    /// The live tracked child pages, in creation order. Pages opened as
    /// navigation side effects are tracked only while
    /// [`owns_pages`](Self::owns_pages) is enabled.
    pub fn pages(&self) -> Result<Vec<WebPage>> {
        let ordered = self.sync_children()?;
        Ok(ordered
            .into_iter()
            .map(|id| WebPage::attached(Arc::clone(&self.process), id))
            .collect())
    }

    /// The declared window names of tracked child pages, in creation
    /// order. Windows opened without an explicit target name are omitted
    /// here but still appear in [`pages`](Self::pages).
    pub fn page_window_names(&self) -> Result<Vec<String>> {
        self.sync_children()?;
        Ok(self.process.registry.child_window_names(&self.id))
    }

    fn sync_children(&self) -> Result<Vec<String>> {
        let value = self.call(Request::object(&self.id, "pages"))?;
        let descriptors: Vec<PageDescriptor> = serde_json::from_value(value)?;
        let observed: Vec<ChildObservation> = descriptors
            .into_iter()
            .map(|d| ChildObservation {
                id: d.id,
                window_name: (!d.window_name.is_empty()).then_some(d.window_name),
            })
            .collect();
        Ok(self.process.registry.sync_children(&self.id, &observed))
    }

    // --- frame context ----------------------------------------------------

    /// The current frame-navigation context of this handle.
    pub fn frame_context(&self) -> FrameContext {
        self.frame.lock().clone()
    }

    /// Selects the named frame among the current frameset's direct
    /// children. Fails with `Error::FrameNotFound` and leaves the context
    /// unchanged if no such frame exists. The selection persists across
    /// subsequent calls on this handle until changed again.
    pub fn switch_to_frame_name(&self, name: &str) -> Result<()> {
        self.switch_to(FrameContext::Name(name.to_string()))
    }

    /// Selects a frame by zero-based position within the current
    /// frameset; same failure semantics as
    /// [`switch_to_frame_name`](Self::switch_to_frame_name).
    pub fn switch_to_frame_position(&self, index: u32) -> Result<()> {
        self.switch_to(FrameContext::Index(index))
    }

    /// Resets the context to the top-level document.
    pub fn switch_to_main_frame(&self) {
        *self.frame.lock() = FrameContext::MainFrame;
    }

    fn switch_to(&self, candidate: FrameContext) -> Result<()> {
        // Validate remotely before committing, so a failed switch
        // provably leaves the context unchanged.
        self.call(Request::object(&self.id, "frameName").frame(candidate.selector()))?;
        *self.frame.lock() = candidate;
        Ok(())
    }

    /// The name of the currently selected frame.
    pub fn frame_name(&self) -> Result<String> {
        self.frame_get_string("frameName")
    }

    /// The absolute URL of the currently selected frame's document.
    pub fn frame_url(&self) -> Result<String> {
        self.frame_get_string("frameUrl")
    }

    /// The HTML content of the currently selected frame.
    pub fn frame_content(&self) -> Result<String> {
        self.frame_get_string("frameContent")
    }

    /// Replaces the HTML content of the currently selected frame.
    pub fn set_frame_content(&self, content: &str) -> Result<()> {
        let selector = self.frame.lock().selector();
        self.call(
            Request::object(&self.id, "frameContent")
                .arg(Value::String(content.to_string()))
                .frame(selector),
        )?;
        Ok(())
    }

    /// The currently selected frame's content reduced to plain text.
    pub fn frame_plain_text(&self) -> Result<String> {
        self.frame_get_string("framePlainText")
    }

    /// The title of the currently selected frame's document.
    pub fn frame_title(&self) -> Result<String> {
        self.frame_get_string("frameTitle")
    }

    /// The name of the frame currently holding input focus, independent
    /// of this handle's frame-navigation context.
    pub fn focused_frame_name(&self) -> Result<String> {
        self.get_string("focusedFrameName")
    }

    /// The number of direct frames in the top-level document's frameset.
    pub fn frame_count(&self) -> Result<u32> {
        self.get("framesCount")
    }

    /// The names of the top-level document's direct frames, in document
    /// order.
    pub fn frame_names(&self) -> Result<Vec<String>> {
        self.get("framesName")
    }
}
