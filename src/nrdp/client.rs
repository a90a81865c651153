use std::time::Duration;

use quick_xml::{Reader, events::Event};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT_CHARSET, CONTENT_TYPE},
};
use tracing::{instrument, trace};
use url::form_urlencoded::byte_serialize;

use crate::error::TransportError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Result of one submission round trip
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The receiver answered with status `0`
    Success,

    /// The receiver answered with a non-zero status, `message` is empty if it gave none
    ReceiverRejected { message: String },

    /// Network failure, non-200 answer or an answer that could not be understood
    TransportError(TransportError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success)
    }
}

/// Parsed `<result>` document returned by the receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverResponse {
    pub status: i64,
    pub message: Option<String>,
}

impl ReceiverResponse {
    /// Extract `/result/status` and `/result/message` from the response body.
    pub fn parse(body: &str) -> Result<ReceiverResponse, TransportError> {
        let malformed = |reason: String| TransportError::MalformedResponse(reason);

        let mut reader = Reader::from_str(body);
        reader.config_mut().trim_text(true);

        let mut path: Vec<String> = Vec::new();
        let mut root = None;
        let mut status: Option<String> = None;
        let mut message: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) => {
                    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                    root.get_or_insert_with(|| name.clone());
                    path.push(name);
                }
                Ok(Event::Empty(element)) => {
                    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                    root.get_or_insert_with(|| name.clone());
                    if is_result_child(&path) && name == "status" {
                        status.get_or_insert_with(String::new);
                    }
                }
                Ok(Event::End(_)) => {
                    path.pop();
                }
                Ok(Event::Text(text)) => {
                    let text = text.unescape().map_err(|e| malformed(e.to_string()))?;
                    collect_text(&path, &text, &mut status, &mut message);
                }
                Ok(Event::CData(data)) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    collect_text(&path, &text, &mut status, &mut message);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(malformed(e.to_string())),
            }
        }

        if !path.is_empty() {
            return Err(malformed(format!("unclosed element <{}>", path.join("/"))));
        }

        match root.as_deref() {
            Some("result") => {}
            Some(other) => return Err(malformed(format!("unexpected root element <{other}>"))),
            None => return Err(malformed("empty document".to_string())),
        }

        let status = status.ok_or_else(|| malformed("missing /result/status".to_string()))?;
        let status = status
            .trim()
            .parse()
            .map_err(|_| TransportError::InvalidStatus(status.clone()))?;

        Ok(ReceiverResponse { status, message })
    }
}

fn is_result_child(path: &[String]) -> bool {
    path.len() == 1 && path[0] == "result"
}

fn collect_text(
    path: &[String],
    text: &str,
    status: &mut Option<String>,
    message: &mut Option<String>,
) {
    let [root, field] = path else {
        return;
    };

    if root != "result" {
        return;
    }

    match field.as_str() {
        "status" => status.get_or_insert_with(String::new).push_str(text),
        "message" => message.get_or_insert_with(String::new).push_str(text),
        _ => {}
    }
}

/// `token=<token>&cmd=submitcheck&XMLDATA=<payload>`, percent-encoded as UTF-8
pub fn form_body(token: &str, payload: &str) -> String {
    let token: String = byte_serialize(token.as_bytes()).collect();
    let payload: String = byte_serialize(payload.as_bytes()).collect();

    format!("token={token}&cmd=submitcheck&XMLDATA={payload}\n")
}

/// Submits encoded check results to an NRDP receiver.
///
/// Exactly one HTTP exchange per call, failures are never retried.
#[derive(Debug, Clone, Default)]
pub struct ReceiverClient {
    client: Client,
}

impl ReceiverClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Client whose requests are abandoned after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    #[instrument(skip(self, token, payload))]
    pub async fn submit(&self, url: &str, token: &str, payload: &str) -> SubmissionOutcome {
        match self.post(url, token, payload).await {
            Ok(ReceiverResponse { status: 0, .. }) => SubmissionOutcome::Success,
            Ok(ReceiverResponse { message, .. }) => SubmissionOutcome::ReceiverRejected {
                message: message.unwrap_or_default(),
            },
            Err(e) => SubmissionOutcome::TransportError(e),
        }
    }

    async fn post(
        &self,
        url: &str,
        token: &str,
        payload: &str,
    ) -> Result<ReceiverResponse, TransportError> {
        trace!("submitting payload: {payload}");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT_CHARSET, "UTF-8")
            .body(form_body(token, payload))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(TransportError::Status(response.status()));
        }

        let body = response.text().await?;
        trace!("receiver answered: {body}");

        ReceiverResponse::parse(&body)
    }
}
