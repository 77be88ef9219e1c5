//! Generated `catalog.v1` messages plus the client and server stubs.

pub mod pb {
    tonic::include_proto!("catalog.v1");
}

pub use pb::catalog_client::CatalogClient;
pub use pb::catalog_server::{Catalog, CatalogServer};

/// Encoded `FileDescriptorSet` for server reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("catalog_descriptor");
