use std::rc::Rc;

use trellis_core::{NodeId, Surface};

/// Renders floating content (dropdowns, menus) into a host node attached to
/// the surface root, outside the owner's clipping ancestors.
///
/// The host exists only while there is content. Dropping the portal detaches
/// it.
pub struct Portal {
    surface: Rc<Surface>,
    host: Option<NodeId>,
}

impl Portal {
    pub fn new(surface: Rc<Surface>, has_content: bool) -> Self {
        let mut portal = Self {
            surface,
            host: None,
        };
        portal.set_content(has_content);
        portal
    }

    /// Attaches the host when content appears, detaches it when content goes
    /// away.
    pub fn set_content(&mut self, has_content: bool) {
        match (has_content, self.host) {
            (true, None) => {
                let root = self.surface.root();
                let host = self.surface.create_node(Some(root));
                log::trace!("portal host {host:?} attached");
                self.host = Some(host);
            }
            (false, Some(host)) => {
                self.surface.remove_node(host);
                log::trace!("portal host {host:?} detached");
                self.host = None;
            }
            _ => {}
        }
    }

    /// Node floating content is parented to, if attached.
    pub fn host(&self) -> Option<NodeId> {
        self.host
    }

    pub fn is_attached(&self) -> bool {
        self.host.is_some()
    }

    pub fn unmount(mut self) {
        self.set_content(false);
    }
}

impl Drop for Portal {
    fn drop(&mut self) {
        self.set_content(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Size;

    #[test]
    fn test_host_follows_content() {
        let surface = Surface::new(Size::new(800.0, 600.0));
        let base = surface.node_count();

        let mut portal = Portal::new(surface.clone(), false);
        assert!(!portal.is_attached());

        portal.set_content(true);
        let host = portal.host();
        assert_eq!(host.and_then(|h| surface.parent(h)), Some(surface.root()));
        portal.set_content(true);
        assert_eq!(portal.host(), host);

        portal.set_content(false);
        assert_eq!(surface.node_count(), base);

        let portal = Portal::new(surface.clone(), true);
        assert_eq!(surface.node_count(), base + 1);
        drop(portal);
        assert_eq!(surface.node_count(), base);
    }
}
