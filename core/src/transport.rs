//! The seam between the request model and the network.
//!
//! # Design
//! `Transport` is the only place I/O happens. `HttpClient` drives it and
//! folds its `Result` into an `HttpResponse`, so tests can swap in a stub
//! and the model stays deterministic. `UreqTransport` is the real engine:
//! it builds a fresh agent per call, which means no connection is ever
//! reused between requests.

use crate::error::{TransportError, TransportErrorKind};
use crate::http::HttpRequest;

/// Status and body of an exchange the transport completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes one request, blocking until it completes, times out or fails.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Split a raw header line into name and value for engines that want them
/// separately. Lines without a `:` or with an empty name are rejected.
pub fn split_header_line(line: &str) -> Result<(&str, &str), TransportError> {
    match line.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(TransportError::new(
            TransportErrorKind::InvalidHeader,
            format!("header line {line:?} is not of the form 'Name: Value'"),
        )),
    }
}

#[cfg(feature = "ureq")]
pub use self::engine::UreqTransport;

#[cfg(feature = "ureq")]
mod engine {
    use std::io;
    use std::time::Duration;

    use tracing::debug;

    use super::{split_header_line, RawResponse, Transport};
    use crate::config::TransportConfig;
    use crate::error::{TransportError, TransportErrorKind};
    use crate::http::{HttpMethod, HttpRequest};

    /// Blocking transport backed by `ureq`.
    #[derive(Debug, Clone, Default)]
    pub struct UreqTransport {
        config: TransportConfig,
    }

    impl UreqTransport {
        pub fn new(config: TransportConfig) -> Self {
            Self { config }
        }

        pub fn config(&self) -> &TransportConfig {
            &self.config
        }

        fn agent(&self, request: &HttpRequest) -> ureq::Agent {
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_connect(limit(request.connect_timeout))
                .timeout_global(limit(request.response_timeout))
                .build()
                .new_agent()
        }

        fn header_pairs<'a>(&'a self, request: &'a HttpRequest) -> Result<Vec<(&'a str, &'a str)>, TransportError> {
            let mut pairs = request
                .header_lines()
                .map(split_header_line)
                .collect::<Result<Vec<_>, _>>()?;
            for (name, value) in &pairs {
                ureq::http::HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| TransportError::new(TransportErrorKind::InvalidHeader, format!("{name}: {e}")))?;
                ureq::http::HeaderValue::from_str(value)
                    .map_err(|e| TransportError::new(TransportErrorKind::InvalidHeader, format!("{name}: {e}")))?;
            }
            if let Some(agent) = self.config.user_agent.as_deref() {
                if !pairs.iter().any(|(name, _)| name.eq_ignore_ascii_case("user-agent")) {
                    pairs.push(("User-Agent", agent));
                }
            }
            Ok(pairs)
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
            check_scheme(&request.url)?;
            let headers = self.header_pairs(request)?;
            let agent = self.agent(request);

            let result = match request.method {
                HttpMethod::Get => {
                    let mut builder = agent.get(request.url.as_str());
                    for (name, value) in headers {
                        builder = builder.header(name, value);
                    }
                    builder.call()
                }
                HttpMethod::Post => {
                    let mut builder = agent.post(request.url.as_str());
                    for (name, value) in headers {
                        builder = builder.header(name, value);
                    }
                    match request.body_for_transport() {
                        Some(body) => builder.send(body),
                        None => builder.send_empty(),
                    }
                }
            };

            let mut response = result.map_err(classify)?;
            let status = response.status().as_u16();
            let body = response
                .body_mut()
                .with_config()
                .limit(self.config.max_body_bytes)
                .read_to_vec()
                .map_err(classify)?;
            debug!(status, bytes = body.len(), "response received");
            Ok(RawResponse { status, body })
        }
    }

    /// A zero timeout means no limit.
    fn limit(timeout: Duration) -> Option<Duration> {
        (!timeout.is_zero()).then_some(timeout)
    }

    fn check_scheme(url: &str) -> Result<(), TransportError> {
        let Some((scheme, _)) = url.split_once("://") else {
            return Ok(());
        };
        if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            Ok(())
        } else {
            Err(TransportError::new(
                TransportErrorKind::UnsupportedProtocol,
                format!("scheme {scheme:?} is not supported"),
            ))
        }
    }

    fn classify(err: ureq::Error) -> TransportError {
        let kind = match &err {
            ureq::Error::Timeout(_) => TransportErrorKind::Timeout,
            ureq::Error::HostNotFound => TransportErrorKind::CouldNotResolveHost,
            ureq::Error::ConnectionFailed => TransportErrorKind::CouldNotConnect,
            ureq::Error::BadUri(_) => TransportErrorKind::BadUrl,
            ureq::Error::BodyExceedsLimit(_) => TransportErrorKind::BodyTooLarge,
            ureq::Error::Tls(_) => TransportErrorKind::Tls,
            ureq::Error::Io(io_err) => match io_err.kind() {
                io::ErrorKind::ConnectionRefused | io::ErrorKind::AddrNotAvailable => {
                    TransportErrorKind::CouldNotConnect
                }
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportErrorKind::Timeout,
                io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero => TransportErrorKind::SendError,
                _ => TransportErrorKind::RecvError,
            },
            _ => TransportErrorKind::Other,
        };
        TransportError::new(kind, err.to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn zero_timeout_is_unlimited() {
            assert_eq!(limit(Duration::ZERO), None);
            assert_eq!(limit(Duration::from_secs(3)), Some(Duration::from_secs(3)));
        }

        #[test]
        fn non_http_scheme_is_unsupported() {
            let err = check_scheme("ftp://example.test/file").unwrap_err();
            assert_eq!(err.kind, TransportErrorKind::UnsupportedProtocol);
            assert!(check_scheme("HTTPS://example.test").is_ok());
            assert!(check_scheme("example.test").is_ok());
        }

        #[test]
        fn classify_maps_timeouts_and_refusals() {
            let refused = ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused));
            assert_eq!(classify(refused).kind, TransportErrorKind::CouldNotConnect);
            assert_eq!(classify(ureq::Error::HostNotFound).kind, TransportErrorKind::CouldNotResolveHost);
        }

        #[test]
        fn connect_timeout_on_plain_text_post_is_code_28() {
            let transport = UreqTransport::default();
            let mut request = HttpRequest::build(
                "http://10.255.255.1/",
                Some(b"payload".to_vec()),
                HttpMethod::Post,
                None,
                Duration::from_secs(1),
                Duration::ZERO,
            )
            .unwrap();
            request.append_header("Content-Type: text/plain");
            assert_eq!(transport.header_pairs(&request).unwrap(), vec![("Content-Type", "text/plain")]);
            assert_eq!(limit(request.connect_timeout), Some(Duration::from_secs(1)));

            let err = classify(ureq::Error::Timeout(ureq::Timeout::Connect));
            assert_eq!(err.kind, TransportErrorKind::Timeout);
            assert_eq!(err.code(), 28);
            assert_eq!(err.message(), "Timeout was reached");

            let err = classify(ureq::Error::Io(io::Error::from(io::ErrorKind::TimedOut)));
            assert_eq!(err.kind, TransportErrorKind::Timeout);
        }

        #[test]
        fn configured_user_agent_is_added_once() {
            let transport = UreqTransport::new(TransportConfig {
                user_agent: Some("minihttp-test/1".to_string()),
                ..TransportConfig::default()
            });
            let mut request = HttpRequest::build(
                "http://example.test",
                None,
                HttpMethod::Get,
                None,
                Duration::from_secs(1),
                Duration::from_secs(1),
            )
            .unwrap();
            let pairs = transport.header_pairs(&request).unwrap();
            assert_eq!(pairs, vec![("User-Agent", "minihttp-test/1")]);

            request.append_header("user-agent: custom");
            let pairs = transport.header_pairs(&request).unwrap();
            assert_eq!(pairs, vec![("user-agent", "custom")]);
        }

        #[test]
        fn invalid_header_name_is_rejected_before_io() {
            let transport = UreqTransport::default();
            let mut request = HttpRequest::build(
                "http://example.test",
                None,
                HttpMethod::Get,
                None,
                Duration::from_secs(1),
                Duration::from_secs(1),
            )
            .unwrap();
            request.append_header("Bad Name: x");
            let err = transport.header_pairs(&request).unwrap_err();
            assert_eq!(err.kind, TransportErrorKind::InvalidHeader);
        }
    }
}
