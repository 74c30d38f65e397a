//! Breadcrumb trail. The first segment is the root button, later segments are
//! arrow-shaped path buttons.

use std::rc::Rc;

/// Render description of one breadcrumb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSegment {
    pub index: usize,
    pub label: String,
    pub root: bool,
    /// Last non-root segment.
    pub last: bool,
    /// Segments after the first path button carry a left arrow.
    pub left_arrow: bool,
}

pub struct NavigationPath {
    path: Vec<String>,
    on_click: Option<Rc<dyn Fn(usize)>>,
}

impl Default for NavigationPath {
    fn default() -> Self {
        Self::new(vec!["Root".to_string()])
    }
}

impl NavigationPath {
    pub fn new(path: Vec<String>) -> Self {
        Self {
            path,
            on_click: None,
        }
    }

    pub fn on_click(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    pub fn set_path(&mut self, path: Vec<String>) {
        self.path = path;
    }

    pub fn segments(&self) -> Vec<PathSegment> {
        let len = self.path.len();
        self.path
            .iter()
            .enumerate()
            .map(|(i, label)| PathSegment {
                index: i,
                label: label.clone(),
                root: i == 0,
                last: i > 0 && i == len - 1,
                left_arrow: i > 1,
            })
            .collect()
    }

    pub fn click(&self, index: usize) {
        if index >= self.path.len() {
            log::warn!("navigation path: no segment {index}");
            return;
        }
        if let Some(cb) = &self.on_click {
            cb(index);
        }
    }
}
