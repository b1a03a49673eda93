//! Persistência em segundo plano.
//!
//! O `SnapshotWriter` recebe cópias do estado do motor e grava em disco
//! fora do caminho das requisições, com retry e coalescência.

mod writer;

pub use writer::SnapshotWriter;
