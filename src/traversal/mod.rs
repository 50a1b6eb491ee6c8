//! Read-only walks and enumerations over already loaded trees.

mod enumerate;
mod walk;

pub use walk::DirVisitor;
