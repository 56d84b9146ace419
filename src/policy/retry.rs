//! Retry decisions.
//!
//! # Design Decisions
//! - A decision is a pure function of the original request and the attempt's
//!   outcome; it must cope with either side of the `Result`
//! - Client errors (4xx) are permanent; server errors (5xx) and temporary
//!   network failures are worth another attempt

use http::request::Parts;

use super::Outcome;

/// Decides whether another attempt should be made.
pub trait RetryPolicy: Send + Sync {
    fn should_retry(&self, request: &Parts, outcome: Outcome<'_>) -> bool;
}

impl<F> RetryPolicy for F
where
    F: Fn(&Parts, Outcome<'_>) -> bool + Send + Sync,
{
    fn should_retry(&self, request: &Parts, outcome: Outcome<'_>) -> bool {
        self(request, outcome)
    }
}

/// Retries temporary network errors and 5xx responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRetryPolicy;

impl RetryPolicy for DefaultRetryPolicy {
    fn should_retry(&self, _request: &Parts, outcome: Outcome<'_>) -> bool {
        match outcome {
            Ok(response) => response.status().is_server_error(),
            Err(err) => err.is_temporary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body;
    use crate::error::Error;
    use http::{Request, Response};
    use std::io;

    fn parts() -> Parts {
        Request::get("http://localhost/ping").body(()).unwrap().into_parts().0
    }

    fn status(code: u16) -> Response<body::ResponseBody> {
        Response::builder().status(code).body(body::empty()).unwrap()
    }

    #[test]
    fn server_errors_are_retried() {
        for code in [500, 502, 503, 504, 599] {
            assert!(
                DefaultRetryPolicy.should_retry(&parts(), Ok(&status(code))),
                "{code} should be retried"
            );
        }
    }

    #[test]
    fn client_errors_and_successes_are_not_retried() {
        for code in [200, 201, 301, 400, 404, 429, 499] {
            assert!(
                !DefaultRetryPolicy.should_retry(&parts(), Ok(&status(code))),
                "{code} should not be retried"
            );
        }
    }

    #[test]
    fn temporary_errors_are_retried() {
        let err = Error::Io(io::ErrorKind::TimedOut.into());
        assert!(DefaultRetryPolicy.should_retry(&parts(), Err(&err)));

        let err = Error::Io(io::ErrorKind::ConnectionReset.into());
        assert!(DefaultRetryPolicy.should_retry(&parts(), Err(&err)));
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let err = Error::Io(io::ErrorKind::ConnectionRefused.into());
        assert!(!DefaultRetryPolicy.should_retry(&parts(), Err(&err)));

        let err = Error::Request(Request::get("not a uri\n").body(()).unwrap_err());
        assert!(!DefaultRetryPolicy.should_retry(&parts(), Err(&err)));
    }

    #[test]
    fn custom_policy_can_match_on_error_text() {
        fn on_some_error(_: &Parts, outcome: Outcome<'_>) -> bool {
            matches!(outcome, Err(err) if err.to_string().contains("some error"))
        }

        let err = Error::Io(io::Error::new(io::ErrorKind::Other, "some error"));
        assert!(on_some_error.should_retry(&parts(), Err(&err)));
        assert!(!on_some_error.should_retry(&parts(), Ok(&status(500))));
    }
}
