//! Prefix tree of routings
//!
//! Dispatches by leading path segments. Each child sees the path with its own
//! prefix removed, the same way a mount prefix is removed by the dispatcher.

use super::{MethodSet, ResponseData, Routing, RoutingPath, RoutingRequest};
use crate::viewer::ReportViewer;

/// Routings registered below segment prefixes
///
/// Longer prefixes are tried first. A child answering
/// [`ResponseData::NotFound`] lets the next matching (shorter) prefix try,
/// any other answer is final.
#[derive(Default)]
pub struct RoutingTree {
    routes: Vec<(RoutingPath, Box<dyn Routing>)>,
}

impl RoutingTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `routing` below `prefix` (`""` or `"/"` registers at the root)
    #[must_use]
    pub fn route<R>(mut self, prefix: &str, routing: R) -> Self
    where
        R: Routing + 'static,
    {
        let prefix = RoutingPath::parse(prefix);
        // stable: equal lengths keep insertion order
        let position = self
            .routes
            .iter()
            .position(|(existing, _)| existing.len() < prefix.len())
            .unwrap_or(self.routes.len());
        self.routes.insert(position, (prefix, Box::new(routing)));
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered prefixes in the order they are tried
    pub fn prefixes(&self) -> impl Iterator<Item = &RoutingPath> {
        self.routes.iter().map(|(prefix, _)| prefix)
    }
}

impl Routing for RoutingTree {
    fn allowed_methods(&self) -> MethodSet {
        self.routes
            .iter()
            .fold(MethodSet::EMPTY, |methods, (_, routing)| {
                methods | routing.allowed_methods()
            })
    }

    fn fetch_data(
        &self,
        path: &RoutingPath,
        request: &RoutingRequest,
        viewer: &dyn ReportViewer,
    ) -> ResponseData {
        for (prefix, routing) in &self.routes {
            let Some(sub_path) = path.strip_prefix(prefix) else {
                continue;
            };
            match routing.fetch_data(&sub_path, request, viewer) {
                ResponseData::NotFound => continue,
                resolved => return resolved,
            }
        }
        ResponseData::NotFound
    }
}

impl std::fmt::Debug for RoutingTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingTree")
            .field("prefixes", &self.prefixes().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{HttpMethod, RoutingStatic};
    use crate::viewer::ReportStore;

    /// Echoes the path it receives
    struct Echo;

    impl Routing for Echo {
        fn fetch_data(
            &self,
            path: &RoutingPath,
            _request: &RoutingRequest,
            _viewer: &dyn ReportViewer,
        ) -> ResponseData {
            if path.first_segment() == "none" {
                return ResponseData::not_found();
            }
            ResponseData::found(path.suffix(), "text/plain")
        }
    }

    struct PostOnly;

    impl Routing for PostOnly {
        fn allowed_methods(&self) -> MethodSet {
            MethodSet::only(HttpMethod::Post)
        }

        fn fetch_data(
            &self,
            _path: &RoutingPath,
            _request: &RoutingRequest,
            _viewer: &dyn ReportViewer,
        ) -> ResponseData {
            ResponseData::not_found()
        }
    }

    fn fetch(tree: &RoutingTree, raw: &str) -> ResponseData {
        let viewer = ReportStore::new("test");
        tree.fetch_data(&RoutingPath::parse(raw), &RoutingRequest::get(raw), &viewer)
    }

    #[test]
    fn test_child_sees_stripped_path() {
        let tree = RoutingTree::new().route("api", Echo);
        assert_eq!(
            fetch(&tree, "/api/comparisons/a-b.json"),
            ResponseData::found("comparisons/a-b.json", "text/plain")
        );
        assert_eq!(fetch(&tree, "/api"), ResponseData::found("", "text/plain"));
        assert_eq!(fetch(&tree, "/other"), ResponseData::not_found());
    }

    #[test]
    fn test_longest_prefix_first() {
        let tree = RoutingTree::new()
            .route("/", RoutingStatic::text("root"))
            .route("a", Echo)
            .route("a/b", RoutingStatic::text("deep"));

        let order: Vec<String> = tree.prefixes().map(RoutingPath::suffix).collect();
        assert_eq!(order, ["a/b", "a", ""]);

        assert_eq!(
            fetch(&tree, "a/b"),
            ResponseData::found("deep", "text/plain; charset=utf-8")
        );
        assert_eq!(fetch(&tree, "a/c"), ResponseData::found("c", "text/plain"));
        assert_eq!(
            fetch(&tree, "/"),
            ResponseData::found("root", "text/plain; charset=utf-8")
        );
    }

    #[test]
    fn test_not_found_falls_through_to_shorter_prefix() {
        let tree = RoutingTree::new()
            .route("a", Echo)
            .route("", Echo);

        // "a" declines "a/none/x"; the root routing receives the full path
        assert_eq!(
            fetch(&tree, "a/none/x"),
            ResponseData::found("a/none/x", "text/plain")
        );
        assert_eq!(fetch(&tree, "none"), ResponseData::not_found());
    }

    #[test]
    fn test_allowed_methods_union() {
        let tree = RoutingTree::new().route("a", Echo).route("b", PostOnly);
        assert_eq!(
            tree.allowed_methods(),
            MethodSet::GET.with(HttpMethod::Post)
        );
        assert_eq!(RoutingTree::new().allowed_methods(), MethodSet::EMPTY);
    }
}
