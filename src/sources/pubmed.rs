//! PubMed source implementation using the NCBI E-utilities API.
//!
//! Searching is a single `esearch` request returning PMIDs. Details are
//! fetched with one `efetch` request per PMID, one after the other.

use async_trait::async_trait;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::PubMedConfig;
use crate::models::{Author, Paper, PaperBuilder, SearchQuery};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// PubMed E-utilities API base URL
pub const PUBMED_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Entrez database queried by default
pub const PUBMED_DATABASE: &str = "pubmed";

/// PubMed research source
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: HttpClient,
    base_url: String,
    database: String,
}

impl PubMedSource {
    /// Create a source pointing at the public E-utilities endpoint
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(HttpClient::new()?, PUBMED_BASE_URL))
    }

    /// Create a source from configuration
    pub fn from_config(config: &PubMedConfig) -> Result<Self, SourceError> {
        let client = HttpClient::with_settings(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            database: config.database.clone(),
        })
    }

    /// Create with a custom HTTP client and base URL (for testing)
    pub fn with_client(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            database: PUBMED_DATABASE.to_string(),
        }
    }

    /// Build E-utilities search URL
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let params = [
            ("db", self.database.clone()),
            ("term", query.query.clone()),
            ("retmax", query.max_results.to_string()),
            ("usehistory", "y".to_string()),
            ("retmode", "xml".to_string()),
        ];

        format!("{}/esearch.fcgi?{}", self.base_url, encode_params(&params))
    }

    /// Build E-utilities fetch URL for a single PubMed ID
    fn build_fetch_url(&self, id: &str) -> String {
        let params = [
            ("db", self.database.clone()),
            ("id", id.to_string()),
            ("retmode", "xml".to_string()),
        ];

        format!("{}/efetch.fcgi?{}", self.base_url, encode_params(&params))
    }

    /// GET a URL and return the body, failing on non-success statuses
    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to reach PubMed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PubMed API returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))
    }

    /// Parse E-utilities search response XML
    fn parse_search_response(xml: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct ESearchResult {
            #[serde(default)]
            IdList: Option<IdList>,
            #[serde(rename = "ERROR", default)]
            error: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct IdList {
            #[serde(rename = "Id", default)]
            ids: Vec<String>,
        }

        let result: ESearchResult = from_str(xml)
            .map_err(|e| SourceError::Parse(format!("Failed to parse PubMed search XML: {}", e)))?;

        let ids: Vec<String> = result
            .IdList
            .map(|list| list.ids)
            .unwrap_or_default()
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        match result.error {
            Some(message) if ids.is_empty() => Err(SourceError::Api(format!(
                "PubMed search error: {}",
                message.trim()
            ))),
            _ => Ok(ids),
        }
    }

    /// Parse E-utilities fetch response XML (`PubmedArticleSet`)
    fn parse_fetch_response(xml: &str) -> Result<Vec<Paper>, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut papers = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == b"PubmedArticle" => {
                    papers.push(parse_article(&mut reader)?);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(papers)
    }
}

#[async_trait]
impl Source for PubMedSource {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search_ids(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        let url = self.build_search_url(query);
        let xml = self.get_text(&url).await?;

        let mut ids = Self::parse_search_response(&xml)?;
        ids.truncate(query.max_results);
        Ok(ids)
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Paper>, SourceError> {
        let mut papers = Vec::with_capacity(ids.len());

        for id in ids {
            let url = self.build_fetch_url(id);
            let xml = self.get_text(&url).await?;

            let Some(mut paper) = Self::parse_fetch_response(&xml)?.into_iter().next() else {
                tracing::warn!("PubMed returned no record for id {}", id);
                continue;
            };

            if paper.id.is_empty() {
                paper.id = id.clone();
            }
            papers.push(paper);
        }

        Ok(papers)
    }
}

fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn parse_article(reader: &mut Reader<&[u8]>) -> Result<Paper, SourceError> {
    let mut pmid: Option<String> = None;
    let mut title = String::new();
    let mut pub_date = PartialDate::default();
    let mut article_date = PartialDate::default();
    let mut authors = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                // Later PMIDs belong to comments/corrections.
                b"PMID" if pmid.is_none() => pmid = Some(read_text(reader)?),
                b"ArticleTitle" => title = read_collapsed_text(reader)?,
                b"PubDate" => pub_date = parse_date(reader, b"PubDate")?,
                b"ArticleDate" => article_date = parse_date(reader, b"ArticleDate")?,
                b"AuthorList" => authors = parse_author_list(reader)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"PubmedArticle" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let publication_date = pub_date
        .render()
        .or_else(|| article_date.render())
        .unwrap_or_default();

    Ok(PaperBuilder::new(pmid.unwrap_or_default(), title)
        .publication_date(publication_date)
        .authors(authors)
        .build())
}

fn parse_author_list(reader: &mut Reader<&[u8]>) -> Result<Vec<Author>, SourceError> {
    let mut authors = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Author" => {
                authors.push(parse_author(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"AuthorList" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(authors)
}

fn parse_author(reader: &mut Reader<&[u8]>) -> Result<Author, SourceError> {
    let mut last_name = String::new();
    let mut fore_name = String::new();
    let mut initials = String::new();
    let mut collective_name = String::new();
    let mut affiliations: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" => last_name = read_text(reader)?,
                b"ForeName" => fore_name = read_text(reader)?,
                b"Initials" => initials = read_text(reader)?,
                b"CollectiveName" => collective_name = read_collapsed_text(reader)?,
                b"Affiliation" => {
                    let affiliation = read_collapsed_text(reader)?;
                    if !affiliation.is_empty() {
                        affiliations.push(affiliation);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Author" => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let name = if !collective_name.is_empty() {
        collective_name
    } else {
        let given = if fore_name.is_empty() { initials } else { fore_name };
        format!("{} {}", given, last_name).trim().to_string()
    };

    let email = affiliations.iter().find_map(|a| extract_email(a));
    let mut author = Author::new(name, affiliations.join("; "));
    author.email = email;
    Ok(author)
}

/// First e-mail address embedded in a piece of text
fn extract_email(text: &str) -> Option<String> {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = EMAIL_RE
        .get_or_init(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").ok())
        .as_ref()?;
    re.find(text).map(|m| m.as_str().to_string())
}

/// Date parts as they appear in `PubDate` / `ArticleDate`
#[derive(Debug, Default)]
struct PartialDate {
    year: String,
    month: String,
    day: String,
    medline: String,
}

impl PartialDate {
    fn render(&self) -> Option<String> {
        if self.year.is_empty() {
            return (!self.medline.is_empty()).then(|| self.medline.clone());
        }

        let month = parse_month(&self.month);
        let day = self.day.parse::<u32>().ok();
        Some(match (month, day) {
            (Some(m), Some(d)) => format!("{}-{:02}-{:02}", self.year, m, d),
            (Some(m), None) => format!("{}-{:02}", self.year, m),
            _ => self.year.clone(),
        })
    }
}

fn parse_date(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<PartialDate, SourceError> {
    let mut date = PartialDate::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Year" => date.year = read_text(reader)?,
                b"Month" => date.month = read_text(reader)?,
                b"Day" => date.day = read_text(reader)?,
                b"MedlineDate" => date.medline = read_text(reader)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == end_tag => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(date)
}

fn parse_month(s: &str) -> Option<u32> {
    // Numeric or abbreviated English month
    if let Ok(n) = s.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    let lower = s.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Read text content until the current element closes, including text
/// inside nested inline markup. The result is trimmed.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, SourceError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text.trim().to_string())
}

/// Like [`read_text`], with runs of whitespace folded to single spaces
fn read_collapsed_text(reader: &mut Reader<&[u8]>) -> Result<String, SourceError> {
    Ok(collapse_whitespace(&read_text(reader)?))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
