//! Model of the Tabelo shell: application window, documents, settings and the
//! chrome components. The platform host lives in the binary.

pub mod app;
pub mod clipboard;
pub mod document;
pub mod error;
pub mod settings;
pub mod ui;
pub mod workspace;
