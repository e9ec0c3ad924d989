//! Concrete rendition workers.

pub mod animal;
pub mod color;
pub mod entities;
pub mod metadata;
pub mod pdf;
pub mod photoshop;
pub mod tagging;

pub use animal::AnimalWorker;
pub use color::ColorWorker;
pub use entities::EntityWorker;
pub use metadata::MetadataWorker;
pub use pdf::PdfWorker;
pub use photoshop::PhotoshopWorker;
pub use tagging::TaggingWorker;
