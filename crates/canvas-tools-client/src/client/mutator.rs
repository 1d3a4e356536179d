use super::{api_v1, CanvasClient};
use crate::{error::CanvasClientResult, request::MutationRequest};
use reqwest::StatusCode;
use std::{thread, time::Duration};

/// Canvas answers updates with 200, but any status up to and including 206 counts as applied.
pub fn is_mutation_success(status: StatusCode) -> bool {
    status.as_u16() <= 206
}

/// What happened to a single mutation that reached the server.
#[derive(Debug)]
pub enum MutationOutcome {
    Success {
        status: StatusCode,
    },
    Failure {
        status: StatusCode,
        /// The request as it was sent, with the credential redacted.
        request_dump: String,
        response_body: String,
    },
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { status } | Self::Failure { status, .. } => *status,
        }
    }
}

/// Sends resource updates one at a time, pausing after each one.
pub struct Mutator<'a> {
    client: &'a CanvasClient,
    delay: Duration,
}

impl<'a> Mutator<'a> {
    pub fn new(client: &'a CanvasClient) -> Self {
        Self {
            client,
            delay: client.mutation_delay(),
        }
    }

    /// Sends the request as a form-encoded PUT and classifies the response.
    /// The configured delay is slept afterwards whether or not the request succeeded.
    ///
    /// # Errors
    /// If the request cannot be built or sent, or the response cannot be read.
    /// A response with a failing status is not an error, see `MutationOutcome::Failure`.
    pub fn mutate(&self, request: &MutationRequest) -> CanvasClientResult<MutationOutcome> {
        let result = api_v1::put_form(self.client, &request.path, &request.fields).map(|res| {
            if is_mutation_success(res.status) {
                MutationOutcome::Success { status: res.status }
            } else {
                log::debug!("{} failed with {}", request.path, res.status);
                MutationOutcome::Failure {
                    status: res.status,
                    request_dump: res.request_dump,
                    response_body: res.body,
                }
            }
        });
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;
    use crate::{
        request::{FormFields, VericiteSettings},
        ClientSettings,
    };
    use canvas_server_mock::{auth_matcher, mock_assignment_update, TOKEN};
    use mockito::{Matcher, Server};
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::Instant,
    };

    fn init() {
        use log::*;
        use simple_logger::*;

        let _ = SimpleLogger::new()
            .with_level(LevelFilter::Debug)
            .with_module_level("mockito", LevelFilter::Warn)
            .with_module_level("reqwest", LevelFilter::Warn)
            .with_module_level("hyper", LevelFilter::Warn)
            .init();
    }

    fn make_client(server: &Server, delay: Duration) -> CanvasClient {
        let mut settings = ClientSettings::new(server.url().parse().unwrap(), TOKEN);
        settings.mutation_delay = delay;
        CanvasClient::new(settings).unwrap()
    }

    #[test]
    fn success_threshold() {
        for code in [100, 200, 201, 204, 206] {
            assert!(is_mutation_success(StatusCode::from_u16(code).unwrap()));
        }
        for code in [207, 302, 400, 401, 404, 500] {
            assert!(!is_mutation_success(StatusCode::from_u16(code).unwrap()));
        }
    }

    #[test]
    fn rewrites_external_tool_url() {
        init();
        let mut server = Server::new();
        let m = server
            .mock("PUT", "/courses/101/assignments/55")
            .match_header("authorization", auth_matcher())
            .match_body(Matcher::UrlEncoded(
                "assignment[external_tool_tag_attributes][url]".into(),
                "https://api.vericite.com/web/v1/authenticate/lti".into(),
            ))
            .with_body(r#"{"id":55}"#)
            .expect(1)
            .create();

        let client = make_client(&server, Duration::ZERO);
        let request = MutationRequest::assignment(
            101,
            55,
            FormFields::assignment_external_tool_url(
                "https://api.vericite.com/web/v1/authenticate/lti",
            ),
        );
        let outcome = client.mutator().mutate(&request).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.status(), StatusCode::OK);
        m.assert();
    }

    #[test]
    fn failure_keeps_diagnostics() {
        init();
        let mut server = Server::new();
        let _m = server
            .mock("PUT", "/courses/101/assignments/56")
            .with_status(403)
            .with_body(r#"{"status":"unauthorized"}"#)
            .create();

        let client = make_client(&server, Duration::ZERO);
        let request = MutationRequest::assignment(
            101,
            56,
            FormFields::assignment_vericite(&VericiteSettings::default()),
        );
        match client.mutator().mutate(&request).unwrap() {
            MutationOutcome::Failure {
                status,
                request_dump,
                response_body,
            } => {
                assert_eq!(status.as_u16(), 403);
                assert!(request_dump.contains("PUT "));
                assert!(request_dump.contains("/courses/101/assignments/56"));
                assert!(request_dump.contains("vericite_enabled%5D=true"));
                assert!(!request_dump.contains(TOKEN));
                assert_eq!(response_body, r#"{"status":"unauthorized"}"#);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn repeated_mutation_converges() {
        init();
        let mut server = Server::new();
        let state: Arc<Mutex<HashMap<String, String>>> = Arc::default();
        let server_state = Arc::clone(&state);
        let m = server
            .mock("PUT", "/courses/7/assignments/8")
            .with_body_from_request(move |req| {
                let body = req.body().unwrap();
                let mut state = server_state.lock().unwrap();
                for (key, value) in url::form_urlencoded::parse(body) {
                    state.insert(key.into_owned(), value.into_owned());
                }
                b"{}".to_vec()
            })
            .expect(2)
            .create();

        let client = make_client(&server, Duration::ZERO);
        let settings = VericiteSettings::default();
        let request =
            MutationRequest::assignment(7, 8, FormFields::assignment_vericite(&settings));
        let mutator = client.mutator();

        assert!(mutator.mutate(&request).unwrap().is_success());
        let after_first = state.lock().unwrap().clone();
        assert!(mutator.mutate(&request).unwrap().is_success());
        let after_second = state.lock().unwrap().clone();

        assert_eq!(after_first, after_second);
        assert_eq!(after_first.len(), 6);
        assert_eq!(
            after_first
                .get("assignment[turnitin_settings][originality_report_visibility]")
                .map(String::as_str),
            Some("immediate")
        );
        m.assert();
    }

    #[test]
    fn sleeps_after_failure() {
        init();
        let mut server = Server::new();
        let _m = mock_assignment_update(&mut server, 1, 2, 500);

        let delay = Duration::from_millis(100);
        let client = make_client(&server, delay);
        let request = MutationRequest::assignment(
            1,
            2,
            FormFields::assignment_external_tool_url("https://app.vericite.com/vericite/"),
        );
        let start = Instant::now();
        let outcome = client.mutator().mutate(&request).unwrap();
        assert!(!outcome.is_success());
        assert!(start.elapsed() >= delay);
    }
}
