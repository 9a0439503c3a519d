//! Request pipeline for the mobile client API.
//!
//! - [`transport`]: the HTTP boundary and the default TLS-pinned transport
//! - [`interceptor`]: header, error and parameter stages run on every call
//! - [`service`]: typed RPC methods built on top of both

pub mod interceptor;
pub mod service;
pub mod transport;

pub use interceptor::{
    DynamicParameters, ErrorBehaviour, ErrorInterceptor, HeaderInterceptor, Interceptor,
    InterceptorChain, ParameterInterceptor,
};
pub use service::{ApiResponse, ServiceClient, DEFAULT_BASE_URL};
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport};
