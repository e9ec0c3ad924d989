//! HTTP clients for the vendor APIs called by rendition workers.
//!
//! Every client issues one request per call and never retries. Vendor
//! failures are reported with the vendor's own code and text so the caller
//! can surface them unchanged.

pub mod auth;
pub mod azure;
pub mod download;
pub mod error;
pub mod http;
pub mod pdf_services;
pub mod photoshop;
pub mod sensei;

pub use auth::{AzureCredentials, ImsCredentials, ServiceAccount};
pub use azure::AzureVisionClient;
pub use download::Downloader;
pub use error::{ApiError, ApiResult};
pub use http::{FileUpload, HttpConfig};
pub use pdf_services::{PdfServicesClient, PdfServicesOutput};
pub use photoshop::{PhotoshopClient, PhotoshopJob, PollConfig};
pub use sensei::{
    AnalyzerRequest, CasEntry, CasResponse, CasResult, ContentAnalyzerRequests, Feature, FeatureValue,
    SenseiClient,
};
