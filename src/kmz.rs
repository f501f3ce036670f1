//! KMZ container packaging
//!
//! A KMZ archive always carries the serialized document under a fixed
//! entry name and, when the document references bundled assets, the 1×1
//! transparent anchor image alongside it. The store-vs-deflate choice for
//! the document entry is a [`CompressionPolicy`]; the anchor image is
//! always deflated.

use std::io::{Cursor, Write};

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::builder::KmlBuilder;
use crate::error::{BuildError, Result};
use crate::style::LOCAL_ANCHOR_ASSET;

/// Fixed entry name of the serialized document inside the archive
pub const DOCUMENT_ENTRY_NAME: &str = "doc.kml";

/// Documents below this size are stored uncompressed under
/// [`CompressionPolicy::StoreSmall`], avoiding DEFLATE overhead on tiny
/// payloads.
const STORE_THRESHOLD_BYTES: usize = 100_000;

/// Store-vs-deflate policy for the document entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionPolicy {
    /// Deflate the document entry regardless of size
    AlwaysDeflate,
    /// Store documents under 100 KB, deflate larger ones
    #[default]
    StoreSmall,
}

impl CompressionPolicy {
    fn method_for(self, uncompressed_len: usize) -> CompressionMethod {
        match self {
            CompressionPolicy::AlwaysDeflate => CompressionMethod::Deflated,
            CompressionPolicy::StoreSmall if uncompressed_len > STORE_THRESHOLD_BYTES => {
                CompressionMethod::Deflated
            }
            CompressionPolicy::StoreSmall => CompressionMethod::Stored,
        }
    }
}

/// Resolve a bundled binary asset by its logical name
pub(crate) fn bundled_asset(name: &str) -> Option<&'static [u8]> {
    match name {
        LOCAL_ANCHOR_ASSET => Some(include_bytes!("../assets/1x1.png")),
        _ => None,
    }
}

impl KmlBuilder {
    /// Build a KMZ archive under the default compression policy
    pub fn build_kmz(&self) -> Result<Vec<u8>> {
        self.build_kmz_with(CompressionPolicy::default())
    }

    /// Build a KMZ archive, choosing the document compression per `policy`
    pub fn build_kmz_with(&self, policy: CompressionPolicy) -> Result<Vec<u8>> {
        let kml = self.build_kml();

        let mut archive = ZipWriter::new(Cursor::new(Vec::new()));

        let document_options =
            SimpleFileOptions::default().compression_method(policy.method_for(kml.len()));
        archive
            .start_file(DOCUMENT_ENTRY_NAME, document_options)
            .map_err(packaging_error)?;
        archive
            .write_all(&kml)
            .map_err(|e| BuildError::Packaging(e.to_string()))?;

        if self.requires_kmz() {
            let icon = bundled_asset(LOCAL_ANCHOR_ASSET).ok_or_else(|| {
                BuildError::MissingLocalResource(LOCAL_ANCHOR_ASSET.to_owned())
            })?;
            let icon_options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            archive
                .start_file(LOCAL_ANCHOR_ASSET, icon_options)
                .map_err(packaging_error)?;
            archive
                .write_all(icon)
                .map_err(|e| BuildError::Packaging(e.to_string()))?;
        }

        let cursor = archive.finish().map_err(packaging_error)?;
        Ok(cursor.into_inner())
    }
}

fn packaging_error(err: zip::result::ZipError) -> BuildError {
    BuildError::Packaging(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_always_deflate() {
        assert_eq!(
            CompressionPolicy::AlwaysDeflate.method_for(10),
            CompressionMethod::Deflated
        );
        assert_eq!(
            CompressionPolicy::AlwaysDeflate.method_for(1_000_000),
            CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_policy_store_small_threshold() {
        assert_eq!(
            CompressionPolicy::StoreSmall.method_for(99_999),
            CompressionMethod::Stored
        );
        assert_eq!(
            CompressionPolicy::StoreSmall.method_for(100_000),
            CompressionMethod::Stored
        );
        assert_eq!(
            CompressionPolicy::StoreSmall.method_for(100_001),
            CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_bundled_asset_lookup() {
        let png = bundled_asset(LOCAL_ANCHOR_ASSET).expect("anchor image bundled");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert!(bundled_asset("missing.png").is_none());
    }
}
