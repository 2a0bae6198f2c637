// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry generation.
///
/// Per-element failures are caught by the floor pass and turned into
/// diagnostics; none of these aborts generation of the rest of a floor.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    Triangulation(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("Texture load failed: {0}")]
    Texture(String),
}

impl Error {
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Error::DegenerateGeometry(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Error::MissingReference(msg.into())
    }
}
