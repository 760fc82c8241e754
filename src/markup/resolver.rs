//! Symbol and image resolution for `#S` and `#F` directives.
//!
//! The scanner never loads images itself. It asks an ordered
//! [`ResolverChain`]; the first resolver that returns an image wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::color::MarkupColor;

use super::types::{Image, ImageKind};

/// What the scanner asks a resolver for.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRequest<'a> {
    pub name: &'a str,
    pub kind: ImageKind,
    /// Current effective font size, in points.
    pub point_size: f32,
    /// Symbols follow the bold toggle as their weight.
    pub bold: bool,
    pub color: Option<MarkupColor>,
}

/// Something that can turn a symbol or image name into an [`Image`].
pub trait SymbolResolver: Send + Sync {
    fn resolve(&self, request: &SymbolRequest<'_>) -> Option<Image>;
}

impl<F> SymbolResolver for F
where
    F: Fn(&SymbolRequest<'_>) -> Option<Image> + Send + Sync,
{
    fn resolve(&self, request: &SymbolRequest<'_>) -> Option<Image> {
        self(request)
    }
}

/// Ordered list of resolvers. Cheap to clone.
#[derive(Clone, Default)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn SymbolResolver>>,
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverChain")
            .field("len", &self.resolvers.len())
            .finish()
    }
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver; it is tried after every resolver already present.
    #[must_use]
    pub fn with(mut self, resolver: impl SymbolResolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Append a closure resolver.
    #[must_use]
    pub fn with_fn<F>(self, resolver: F) -> Self
    where
        F: Fn(&SymbolRequest<'_>) -> Option<Image> + Send + Sync + 'static,
    {
        self.with(resolver)
    }

    pub fn push(&mut self, resolver: impl SymbolResolver + 'static) {
        self.resolvers.push(Arc::new(resolver));
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Try each resolver in order.
    pub fn resolve(&self, request: &SymbolRequest<'_>) -> Option<Image> {
        for (index, resolver) in self.resolvers.iter().enumerate() {
            if let Some(image) = resolver.resolve(request) {
                tracing::debug!(name = request.name, index, "symbol resolved");
                return Some(image);
            }
        }
        tracing::debug!(
            name = request.name,
            kind = ?request.kind,
            tried = self.resolvers.len(),
            "no resolver supplied image"
        );
        None
    }
}

/// Resolves names from a fixed table of handles.
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    kind: Option<ImageKind>,
    entries: HashMap<String, String>,
}

impl CatalogResolver {
    /// A catalog answering requests of any kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog that only answers requests of `kind`.
    pub fn for_kind(kind: ImageKind) -> Self {
        Self {
            kind: Some(kind),
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, handle: impl Into<String>) -> Self {
        self.entries.insert(name.into(), handle.into());
        self
    }

    /// Map `from` to whatever `to` maps to, for names the host does not have.
    #[must_use]
    pub fn alias(mut self, from: impl Into<String>, to: &str) -> Self {
        if let Some(handle) = self.entries.get(to).cloned() {
            self.entries.insert(from.into(), handle);
        }
        self
    }
}

impl SymbolResolver for CatalogResolver {
    fn resolve(&self, request: &SymbolRequest<'_>) -> Option<Image> {
        if self.kind.is_some_and(|kind| kind != request.kind) {
            return None;
        }
        self.entries.get(request.name).map(|handle| Image {
            name: request.name.to_string(),
            kind: request.kind,
            handle: handle.clone(),
            point_size: request.point_size,
        })
    }
}

/// Accepts every name, using the name itself as the handle.
///
/// Useful as the last link of a chain when the host draws placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderResolver;

impl SymbolResolver for PlaceholderResolver {
    fn resolve(&self, request: &SymbolRequest<'_>) -> Option<Image> {
        Some(Image {
            name: request.name.to_string(),
            kind: request.kind,
            handle: request.name.to_string(),
            point_size: request.point_size,
        })
    }
}
