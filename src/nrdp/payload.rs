use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::EncodingError, monitors::threshold::Verdict};

/// A verdict bound to the service and host it is reported for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub service_name: String,
    pub host_name: String,
    pub verdict: Verdict,
    pub include_performance_data: bool,
}

impl CheckResult {
    /// Text of the `output` element
    pub fn output(&self) -> String {
        self.verdict.output(self.include_performance_data)
    }
}

/// Check results of one process group, submitted as a single document.
///
/// Results are encoded in the order they were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResultBatch {
    results: Vec<CheckResult>,
}

impl CheckResultBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        service_name: impl ToString,
        host_name: impl ToString,
        verdict: Verdict,
        include_performance_data: bool,
    ) {
        self.results.push(CheckResult {
            service_name: service_name.to_string(),
            host_name: host_name.to_string(),
            verdict,
            include_performance_data,
        });
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter()
    }

    /// Serialize into the `checkresults` document expected by the receiver.
    pub fn encode(&self) -> Result<String, EncodingError> {
        let mut writer = Writer::new(Vec::new());

        let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
        write(&mut writer, Event::Decl(decl))?;
        write(&mut writer, Event::Start(BytesStart::new("checkresults")))?;

        for result in &self.results {
            let mut element = BytesStart::new("checkresult");
            element.push_attribute(("checktype", "1"));
            element.push_attribute(("type", "service"));
            write(&mut writer, Event::Start(element))?;

            let state = result.verdict.severity.code().to_string();
            text_element(&mut writer, "servicename", &result.service_name)?;
            text_element(&mut writer, "hostname", &result.host_name)?;
            text_element(&mut writer, "state", &state)?;
            text_element(&mut writer, "output", &result.output())?;

            write(&mut writer, Event::End(BytesEnd::new("checkresult")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("checkresults")))?;

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EncodingError> {
    writer
        .write_event(event)
        .map_err(|e| EncodingError::Xml(e.to_string()))
}

fn text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &'static str,
    value: &str,
) -> Result<(), EncodingError> {
    if let Some(invalid) = value.chars().find(|c| !is_xml_char(*c)) {
        return Err(EncodingError::InvalidCharacter {
            field: name,
            value: format!("{value} (U+{:04X})", invalid as u32),
        });
    }

    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(value)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

/// `Char` production of XML 1.0
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
