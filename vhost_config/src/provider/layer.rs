//! Layer metadata and transport values for snapshot builds.

use camino::{Utf8Path, Utf8PathBuf};

use crate::value::ParameterMap;

/// Provenance of a configuration layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum LayerProvenance {
    /// Values every deployment starts from.
    Defaults,
    /// The mandatory main configuration.
    Base,
    /// Per-tenant overrides for one virtualhost.
    Virtualhost,
}

/// Representation of a configuration layer.
#[derive(Clone, Debug)]
pub struct Layer {
    provenance: LayerProvenance,
    parameters: ParameterMap,
    path: Option<Utf8PathBuf>,
}

impl Layer {
    /// Construct a defaults layer.
    #[must_use]
    pub const fn defaults(parameters: ParameterMap, path: Option<Utf8PathBuf>) -> Self {
        Self {
            provenance: LayerProvenance::Defaults,
            parameters,
            path,
        }
    }

    /// Construct a base layer.
    #[must_use]
    pub const fn base(parameters: ParameterMap, path: Option<Utf8PathBuf>) -> Self {
        Self {
            provenance: LayerProvenance::Base,
            parameters,
            path,
        }
    }

    /// Construct a virtualhost override layer.
    #[must_use]
    pub const fn virtualhost(parameters: ParameterMap, path: Option<Utf8PathBuf>) -> Self {
        Self {
            provenance: LayerProvenance::Virtualhost,
            parameters,
            path,
        }
    }

    /// Returns the provenance of the layer.
    #[must_use]
    pub const fn provenance(&self) -> LayerProvenance {
        self.provenance
    }

    /// Returns the associated path if this layer was read from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Borrow the layer's parameters.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    /// Consume the layer, returning its parameters.
    #[must_use]
    pub fn into_parameters(self) -> ParameterMap {
        self.parameters
    }
}
