//! Notification contracts consumed by the scene projection layer.

use crate::document::Document;

/// Two-callback refresh contract.
///
/// Called once per outermost update bracket: `will_refresh` for every
/// observer, then `did_refresh` for every observer.
pub trait SceneObserver {
    fn will_refresh(&mut self, document: &Document);
    fn did_refresh(&mut self, document: &Document);
}

/// Called with the new revision after each refresh
pub type RevisionListener = Box<dyn FnMut(u64)>;
