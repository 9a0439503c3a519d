//! Interceptor chain applied to every request.
//!
//! Three stages, always in this order on the way out and in reverse order
//! on the way back:
//!
//! 1. [`HeaderInterceptor`] adds the authorization and content-type headers
//! 2. [`ErrorInterceptor`] turns error statuses into [`ApiError::Remote`],
//!    or only logs them, depending on [`ErrorBehaviour`]
//! 3. [`ParameterInterceptor`] appends the session's [`DynamicParameters`]
//!
//! The chain is immutable. Installing the session parameters produces a new
//! chain via [`InterceptorChain::with_parameters`].

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::transport::{ApiRequest, RawResponse, Transport};
use crate::auth::AuthToken;
use crate::error::{ApiError, Result, ServerError};
use crate::models::Subscription;

/// Scheme prefix of the authorization header.
const AUTH_SCHEME: &str = "GoogleLogin";

/// A request/response transform.
pub trait Interceptor: Send + Sync + fmt::Debug {
    fn on_request(&self, _request: &mut ApiRequest) -> Result<()> {
        Ok(())
    }

    fn on_response(&self, response: RawResponse) -> Result<RawResponse> {
        Ok(response)
    }
}

/// Adds `Authorization` and `Content-Type` headers.
#[derive(Debug, Clone)]
pub struct HeaderInterceptor {
    token: AuthToken,
}

impl HeaderInterceptor {
    pub fn new(token: AuthToken) -> Self {
        Self { token }
    }
}

impl Interceptor for HeaderInterceptor {
    fn on_request(&self, request: &mut ApiRequest) -> Result<()> {
        let auth = format!("{} auth={}", AUTH_SCHEME, self.token.as_str());
        request.append_header("authorization", &auth)?;
        request.append_header("content-type", "application/json")?;
        Ok(())
    }
}

/// What to do with error statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorBehaviour {
    /// Fail the call with [`ApiError::Remote`].
    #[default]
    Raise,
    /// Log the status and hand the raw response to the caller.
    Log,
}

/// Normalizes error responses.
///
/// Only 4xx and 5xx count as errors; redirects must reach the caller.
#[derive(Debug, Clone, Copy)]
pub struct ErrorInterceptor {
    behaviour: ErrorBehaviour,
}

impl ErrorInterceptor {
    pub fn new(behaviour: ErrorBehaviour) -> Self {
        Self { behaviour }
    }

    pub fn behaviour(&self) -> ErrorBehaviour {
        self.behaviour
    }
}

impl Interceptor for ErrorInterceptor {
    fn on_response(&self, response: RawResponse) -> Result<RawResponse> {
        if !response.is_error() {
            return Ok(response);
        }

        let status = response.status.as_u16();
        let error = ServerError::parse(&response.body);

        match self.behaviour {
            ErrorBehaviour::Raise => {
                debug!("Raising remote error {}: {}", status, error);
                Err(ApiError::Remote { status, error })
            }
            ErrorBehaviour::Log => {
                warn!("Service returned {}: {}", status, error);
                Ok(response)
            }
        }
    }
}

/// Query parameters sent with every request of a session.
///
/// Cheap to clone; the underlying list is never mutated once created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicParameters(Arc<[(String, String)]>);

impl DynamicParameters {
    pub fn new(params: Vec<(String, String)>) -> Self {
        Self(params.into())
    }

    /// `dv`, `hl` and `tier` for a session.
    pub fn for_session(locale: &str, subscription: Subscription) -> Self {
        Self::new(vec![
            ("dv".to_string(), "0".to_string()),
            ("hl".to_string(), locale.to_string()),
            ("tier".to_string(), subscription.code().to_string()),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Appends [`DynamicParameters`] to the query string.
#[derive(Debug, Clone, Default)]
pub struct ParameterInterceptor {
    params: DynamicParameters,
}

impl ParameterInterceptor {
    pub fn new(params: DynamicParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &DynamicParameters {
        &self.params
    }
}

impl Interceptor for ParameterInterceptor {
    fn on_request(&self, request: &mut ApiRequest) -> Result<()> {
        for (key, value) in self.params.iter() {
            request.append_query(key, value);
        }
        Ok(())
    }
}

/// The three stages in their fixed order.
#[derive(Debug, Clone)]
pub struct InterceptorChain {
    header: Arc<HeaderInterceptor>,
    errors: Arc<ErrorInterceptor>,
    parameters: Arc<ParameterInterceptor>,
}

impl InterceptorChain {
    /// Chain with an empty parameter set.
    pub fn new(token: AuthToken, behaviour: ErrorBehaviour) -> Self {
        Self {
            header: Arc::new(HeaderInterceptor::new(token)),
            errors: Arc::new(ErrorInterceptor::new(behaviour)),
            parameters: Arc::new(ParameterInterceptor::default()),
        }
    }

    /// Same chain with `params` installed in the parameter stage.
    pub fn with_parameters(&self, params: DynamicParameters) -> Self {
        Self {
            header: Arc::clone(&self.header),
            errors: Arc::clone(&self.errors),
            parameters: Arc::new(ParameterInterceptor::new(params)),
        }
    }

    pub fn parameters(&self) -> &DynamicParameters {
        self.parameters.parameters()
    }

    pub fn error_behaviour(&self) -> ErrorBehaviour {
        self.errors.behaviour()
    }

    fn stages(&self) -> [&dyn Interceptor; 3] {
        [
            &*self.header,
            &*self.errors,
            &*self.parameters,
        ]
    }

    /// Run `request` through the chain and `transport`.
    pub async fn send(&self, transport: &dyn Transport, mut request: ApiRequest) -> Result<RawResponse> {
        for stage in self.stages() {
            stage.on_request(&mut request)?;
        }

        let mut response = transport.execute(request).await?;

        for stage in self.stages().into_iter().rev() {
            response = stage.on_response(response)?;
        }

        Ok(response)
    }
}
