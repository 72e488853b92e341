//! Directory listing: the filename collation and the per-directory snapshot.

pub mod collate;
pub mod snapshot;
