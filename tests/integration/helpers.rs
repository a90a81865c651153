//! Helper functions for integration tests

use nrdp_reporter::{
    ProcessGroupStatus,
    config::ReporterConfig,
    metrics::Metric,
    monitors::threshold::{MetricMode, Thresholds},
};
use regex::Regex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCEPTED: &str = "<result><status>0</status><message>OK</message></result>";

pub async fn start_receiver(response: ResponseTemplate) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/nrdp/"))
        .respond_with(response)
        .mount(&mock_server)
        .await;

    mock_server
}

pub async fn start_accepting_receiver() -> MockServer {
    start_receiver(ResponseTemplate::new(200).set_body_string(ACCEPTED)).await
}

pub fn receiver_url(server: &MockServer) -> String {
    format!("{}/nrdp/", server.uri())
}

pub fn create_test_config(receiver_url: String) -> ReporterConfig {
    ReporterConfig::new(receiver_url, "test-token")
        .with_hostname("nifi-01")
        .with_mode(Metric::ActiveThreadCount, MetricMode::Reporting)
        .with_mode(
            Metric::FlowfilesQueued,
            MetricMode::Alerting(Thresholds {
                warning: 100,
                critical: 200,
            }),
        )
}

/// root (queued 50) → child-a (queued 150), child-b (queued 250)
pub fn three_group_tree() -> ProcessGroupStatus {
    let group = |name: &str, queued_count| ProcessGroupStatus {
        name: name.to_string(),
        queued_count,
        active_thread_count: 1,
        ..Default::default()
    };

    group("root", 50)
        .with_child(group("child-a", 150))
        .with_child(group("child-b", 250))
}

/// Decoded form fields of every request the receiver got, in arrival order.
///
/// The body ends with a newline, which is stripped from the last field.
pub async fn submitted_forms(server: &MockServer) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            url::form_urlencoded::parse(&request.body)
                .into_owned()
                .map(|(key, value)| (key, value.trim_end_matches('\n').to_string()))
                .collect()
        })
        .collect()
}

pub fn form_field<'a>(form: &'a [(String, String)], name: &str) -> Option<&'a str> {
    form.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Text of every `<name>` element in `xml`
pub fn element_texts(xml: &str, name: &str) -> Vec<String> {
    let pattern = Regex::new(&format!("<{name}>([^<]*)</{name}>")).unwrap();
    pattern
        .captures_iter(xml)
        .map(|captures| captures[1].to_string())
        .collect()
}
