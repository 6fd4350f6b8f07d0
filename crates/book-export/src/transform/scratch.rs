//! Off-screen scratch containers handed to the typesetting engine
//!
//! A [`ScratchHost`] plays the part of the document body: containers are
//! attached to it while a math unit is being typeset and detached when the
//! owning [`ScratchGuard`] is dropped, on every exit path.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Reusable glyph path definitions, keyed by symbol id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolDefs {
    pub paths: Vec<(String, String)>,
}

impl SymbolDefs {
    pub fn new(paths: Vec<(String, String)>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Process-wide symbol cache written by the typesetting engine
///
/// Math transformations only read it. A cache without definitions is a
/// degraded state the rasterization path tolerates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolCache {
    defs: Option<SymbolDefs>,
}

impl SymbolCache {
    pub fn new(defs: SymbolDefs) -> Self {
        Self { defs: Some(defs) }
    }

    /// A cache element that exists but carries no definitions
    pub fn without_defs() -> Self {
        Self { defs: None }
    }

    pub fn defs(&self) -> Option<&SymbolDefs> {
        self.defs.as_ref()
    }
}

/// Vector output of the typesetting engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgElement {
    /// Width attribute as written by the engine, e.g. `"12.418ex"`
    pub width: String,
    pub height: String,
    pub view_box: Option<String>,
    /// Definition blocks at the start of the element
    pub defs: Vec<SymbolDefs>,
    /// Serialized drawing content
    pub body: String,
}

impl SvgElement {
    pub fn new(width: impl Into<String>, height: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
            view_box: None,
            defs: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_view_box(mut self, view_box: impl Into<String>) -> Self {
        self.view_box = Some(view_box.into());
        self
    }

    /// Standalone SVG document with every definition block inlined
    pub fn to_markup(&self) -> String {
        let mut markup = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}""#,
            escape_attr(&self.width),
            escape_attr(&self.height)
        );
        if let Some(view_box) = &self.view_box {
            markup.push_str(&format!(r#" viewBox="{}""#, escape_attr(view_box)));
        }
        markup.push('>');
        for defs in self.defs.iter().filter(|defs| !defs.is_empty()) {
            markup.push_str("<defs>");
            for (id, path) in &defs.paths {
                markup.push_str(&format!(
                    r#"<path id="{}" d="{}"/>"#,
                    escape_attr(id),
                    escape_attr(path)
                ));
            }
            markup.push_str("</defs>");
        }
        markup.push_str(&self.body);
        markup.push_str("</svg>");
        markup
    }

    pub(crate) fn prepend_defs(&mut self, defs: SymbolDefs) {
        self.defs.insert(0, defs);
    }

    pub(crate) fn remove_prepended_defs(&mut self) {
        if !self.defs.is_empty() {
            self.defs.remove(0);
        }
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// One rendered math node inside a scratch container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedMath {
    pub svg: Option<SvgElement>,
}

/// Scratch element holding markup before typesetting and nodes after
#[derive(Debug)]
pub struct ScratchContainer {
    id: u64,
    pub markup: String,
    pub rendered: Vec<RenderedMath>,
}

impl ScratchContainer {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Host that scratch containers attach to while in use
#[derive(Debug, Default)]
pub struct ScratchHost {
    next_id: AtomicU64,
    attached: Mutex<BTreeSet<u64>>,
}

impl ScratchHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container for `markup` and attach it
    pub fn attach(&self, markup: impl Into<String>) -> ScratchGuard<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.attached_ids().insert(id);
        ScratchGuard {
            host: self,
            container: ScratchContainer {
                id,
                markup: markup.into(),
                rendered: Vec::new(),
            },
        }
    }

    /// Number of containers currently attached
    pub fn attached_count(&self) -> usize {
        self.attached_ids().len()
    }

    pub fn is_attached(&self, id: u64) -> bool {
        self.attached_ids().contains(&id)
    }

    fn detach(&self, id: u64) {
        self.attached_ids().remove(&id);
    }

    fn attached_ids(&self) -> std::sync::MutexGuard<'_, BTreeSet<u64>> {
        self.attached.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Exclusive owner of an attached container; detaches on drop
#[derive(Debug)]
pub struct ScratchGuard<'a> {
    host: &'a ScratchHost,
    container: ScratchContainer,
}

impl Deref for ScratchGuard<'_> {
    type Target = ScratchContainer;

    fn deref(&self) -> &ScratchContainer {
        &self.container
    }
}

impl DerefMut for ScratchGuard<'_> {
    fn deref_mut(&mut self) -> &mut ScratchContainer {
        &mut self.container
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        self.host.detach(self.container.id);
        log::trace!("Detached scratch container {}", self.container.id);
    }
}
