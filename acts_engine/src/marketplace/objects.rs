use chrono::{Days, NaiveDate, NaiveDateTime};
use log::*;
use serde::{Deserialize, Serialize};

/// The certificate category in the documents API.
pub const DOCUMENT_CATEGORY: &str = "act-income-mp";
pub const DOCUMENT_LOCALE: &str = "ru";
pub const DOWNLOAD_EXTENSION: &str = "xlsx";
pub const CREATION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

//--------------------------------------   DateWindow   -------------------------------------------------------------

/// An inclusive range of days to list documents for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self { begin, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { begin: day, end: day }
    }

    /// The day before `run_date`. Scheduled runs always look at yesterday's certificates.
    pub fn yesterday(run_date: NaiveDate) -> Self {
        Self::single_day(run_date.checked_sub_days(Days::new(1)).unwrap_or(run_date))
    }

    pub fn begin_param(&self) -> String {
        self.begin.format(QUERY_DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(QUERY_DATE_FORMAT).to_string()
    }
}

//--------------------------------------   Listing   ----------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentListResponse {
    #[serde(default)]
    pub data: Option<DocumentListData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentListData {
    #[serde(default)]
    pub documents: Option<Vec<RawDocument>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub service_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub creation_time: Option<String>,
}

impl DocumentListResponse {
    pub fn into_descriptors(self) -> Vec<DocumentDescriptor> {
        self.data
            .and_then(|d| d.documents)
            .unwrap_or_default()
            .into_iter()
            .map(DocumentDescriptor::from)
            .collect()
    }
}

/// One certificate as advertised by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub service_name: String,
    pub name: String,
    pub creation_time: Option<NaiveDateTime>,
    /// The supply number taken from the document name, e.g. `31337` for `Акт приемки 31337.xlsx`
    pub supply_id: String,
}

impl From<RawDocument> for DocumentDescriptor {
    fn from(raw: RawDocument) -> Self {
        let creation_time = raw.creation_time.as_deref().and_then(|t| {
            NaiveDateTime::parse_from_str(t, CREATION_TIME_FORMAT)
                .map_err(|e| warn!("🌐️ Unexpected creation time '{t}' for {}. {e}", raw.service_name))
                .ok()
        });
        let supply_id = supply_from_document_name(&raw.name);
        Self { service_name: raw.service_name, name: raw.name, creation_time, supply_id }
    }
}

fn supply_from_document_name(name: &str) -> String {
    let last_word = name.split(' ').last().unwrap_or(name);
    last_word.split('.').next().unwrap_or(last_word).to_string()
}

/// The result of listing documents. An upstream outage is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentListing {
    Documents(Vec<DocumentDescriptor>),
    UpstreamFailure(u16),
}

//--------------------------------------   Download   ---------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub params: Vec<DownloadParam>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadParam {
    pub extension: String,
    pub service_name: String,
}

impl DownloadRequest {
    pub fn for_documents(documents: &[DocumentDescriptor]) -> Self {
        let params = documents
            .iter()
            .map(|d| DownloadParam { extension: DOWNLOAD_EXTENSION.to_string(), service_name: d.service_name.clone() })
            .collect();
        Self { params }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadResponse {
    #[serde(default)]
    pub data: Option<DownloadData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadData {
    #[serde(default)]
    pub document: Option<String>,
}

impl DownloadResponse {
    /// The base64 encoded archive, if the response carried a non-empty one.
    pub fn into_document(self) -> Option<String> {
        self.data.and_then(|d| d.document).filter(|d| !d.is_empty())
    }
}

/// The result of fetching one account's certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A base64 encoded zip archive.
    Payload(String),
    /// Nothing was issued in the requested window.
    NoData,
    /// The API is down (HTTP 500). Not retried.
    UpstreamFailure(u16),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn yesterday_window() {
        let window = DateWindow::yesterday(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(window.begin_param(), "2024-02-29");
        assert_eq!(window.begin, window.end);
    }

    #[test]
    fn listing_response() {
        let json = r#"{"data": {"documents": [
            {"serviceName": "act-income-mp-31337", "name": "Акт приемки 31337.xlsx", "creationTime": "2024-03-01T08:15:00Z"},
            {"serviceName": "act-income-mp-42", "name": "42", "creationTime": "yesterday"}
        ]}}"#;
        let response: DocumentListResponse = serde_json::from_str(json).unwrap();
        let descriptors = response.into_descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].supply_id, "31337");
        assert_eq!(
            descriptors[0].creation_time,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(8, 15, 0)
        );
        assert_eq!(descriptors[1].supply_id, "42");
        assert_eq!(descriptors[1].creation_time, None);
    }

    #[test]
    fn empty_listing_responses() {
        let empty: DocumentListResponse = serde_json::from_str(r#"{"data": {"documents": null}}"#).unwrap();
        assert!(empty.into_descriptors().is_empty());
        let missing: DocumentListResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.into_descriptors().is_empty());
    }

    #[test]
    fn download_request_body() {
        let documents = vec![DocumentDescriptor {
            service_name: "act-income-mp-31337".into(),
            name: "31337".into(),
            creation_time: None,
            supply_id: "31337".into(),
        }];
        let body = serde_json::to_value(DownloadRequest::for_documents(&documents)).unwrap();
        assert_eq!(body, serde_json::json!({"params": [{"extension": "xlsx", "serviceName": "act-income-mp-31337"}]}));
    }
}
