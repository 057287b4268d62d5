//! Frontera con la plataforma externa: tipos de request/response y traits de
//! cliente.

pub mod client;
pub mod types;

pub use client::{PlatformClient, PlatformConnector, TransportError};
pub use types::{DescribeConfigResponse, ListResourcesRequest, ListResourcesResponse, PlatformResource, ResourceConfig, ResourcePage,
                ResourceTag, ResponseStatus, TagFilter};
