//! Integration tests for get-papers-list
//!
//! These tests run the search → fetch → export pipeline against a local
//! mockito server standing in for the E-utilities endpoints.

use get_papers_list::export::{export, ExportOutcome, NOTHING_TO_SAVE};
use get_papers_list::models::{SearchQuery, EXPORT_COLUMNS};
use get_papers_list::sources::{PubMedSource, Source, SourceError};
use get_papers_list::utils::HttpClient;
use mockito::{Matcher, Server, ServerGuard};
use tempfile::tempdir;

struct TestAuthor<'a> {
    last: &'a str,
    fore: &'a str,
    affiliation: &'a str,
}

fn esearch_body(ids: &[&str]) -> String {
    let id_list: String = ids.iter().map(|id| format!("<Id>{}</Id>", id)).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult><Count>{count}</Count><RetMax>{count}</RetMax><RetStart>0</RetStart><QueryKey>1</QueryKey><WebEnv>MCID_test</WebEnv><IdList>{id_list}</IdList></eSearchResult>"#,
        count = ids.len(),
        id_list = id_list
    )
}

fn efetch_body(pmid: &str, title: &str, date: (&str, &str, &str), authors: &[TestAuthor]) -> String {
    let author_xml: String = authors
        .iter()
        .map(|a| {
            format!(
                "<Author ValidYN=\"Y\"><LastName>{}</LastName><ForeName>{}</ForeName><AffiliationInfo><Affiliation>{}</Affiliation></AffiliationInfo></Author>",
                a.last, a.fore, a.affiliation
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">{pmid}</PMID>
      <Article PubModel="Print">
        <Journal><JournalIssue><PubDate><Year>{year}</Year><Month>{month}</Month><Day>{day}</Day></PubDate></JournalIssue></Journal>
        <ArticleTitle>{title}</ArticleTitle>
        <AuthorList CompleteYN="Y">{author_xml}</AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#,
        pmid = pmid,
        year = date.0,
        month = date.1,
        day = date.2,
        title = title,
        author_xml = author_xml
    )
}

fn source_for(server: &ServerGuard) -> PubMedSource {
    PubMedSource::with_client(HttpClient::new().unwrap(), server.url())
}

fn fetch_query(id: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("db".into(), "pubmed".into()),
        Matcher::UrlEncoded("id".into(), id.into()),
        Matcher::UrlEncoded("retmode".into(), "xml".into()),
    ])
}

/// Search, fetch each id individually, and export the rows to CSV
#[tokio::test]
async fn test_end_to_end_csv_export() {
    let mut server = Server::new_async().await;

    let search_mock = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("db".into(), "pubmed".into()),
            Matcher::UrlEncoded("term".into(), "cancer AND biotech[affiliation]".into()),
            Matcher::UrlEncoded("retmax".into(), "100".into()),
            Matcher::UrlEncoded("usehistory".into(), "y".into()),
            Matcher::UrlEncoded("retmode".into(), "xml".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=UTF-8")
        .with_body(esearch_body(&["12345678", "87654321"]))
        .expect(1)
        .create_async()
        .await;

    let first_mock = server
        .mock("GET", "/efetch.fcgi")
        .match_query(fetch_query("12345678"))
        .with_status(200)
        .with_body(efetch_body(
            "12345678",
            "Sample Paper Title",
            ("2025", "Apr", "08"),
            &[
                TestAuthor {
                    last: "Doe",
                    fore: "John",
                    affiliation: "Some Biotech Company, Boston. Electronic address: john@biotech.com.",
                },
                TestAuthor {
                    last: "Smith",
                    fore: "Jane",
                    affiliation: "University of Test",
                },
            ],
        ))
        .expect(1)
        .create_async()
        .await;

    let second_mock = server
        .mock("GET", "/efetch.fcgi")
        .match_query(fetch_query("87654321"))
        .with_status(200)
        .with_body(efetch_body(
            "87654321",
            "Second Paper",
            ("2024", "12", "1"),
            &[
                TestAuthor {
                    last: "Lee",
                    fore: "Ann",
                    affiliation: "Hospital of Examples",
                },
                TestAuthor {
                    last: "Jones",
                    fore: "Bob",
                    affiliation: "GLOBAL PHARMA LTD",
                },
            ],
        ))
        .expect(1)
        .create_async()
        .await;

    let source = source_for(&server);
    let papers = source
        .search(&SearchQuery::new("cancer AND biotech[affiliation]"))
        .await
        .unwrap();

    search_mock.assert_async().await;
    first_mock.assert_async().await;
    second_mock.assert_async().await;

    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0].id, "12345678");
    assert_eq!(papers[1].id, "87654321");

    let dir = tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let mut out = Vec::new();
    let outcome = export(&papers, Some(path.as_path()), &mut out).unwrap();
    assert_eq!(
        outcome,
        ExportOutcome::Saved {
            path: path.clone(),
            rows: 2
        }
    );

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_COLUMNS.to_vec());

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);

    assert_eq!(&records[0][0], "12345678");
    assert_eq!(&records[0][1], "Sample Paper Title");
    assert_eq!(&records[0][2], "2025-04-08");
    assert_eq!(&records[0][3], "Jane Smith");
    assert_eq!(
        &records[0][4],
        "Some Biotech Company, Boston. Electronic address: john@biotech.com."
    );
    assert_eq!(&records[0][5], "john@biotech.com");

    assert_eq!(&records[1][0], "87654321");
    assert_eq!(&records[1][2], "2024-12-01");
    assert_eq!(&records[1][3], "Ann Lee");
    assert_eq!(&records[1][4], "GLOBAL PHARMA LTD");
    assert_eq!(&records[1][5], "");
}

/// A failed search yields no papers and makes no detail requests
#[tokio::test]
async fn test_search_failure_degrades_to_empty() {
    let mut server = Server::new_async().await;

    let search_mock = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let fetch_mock = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let source = source_for(&server);
    let papers = source.search(&SearchQuery::new("cancer")).await.unwrap();

    search_mock.assert_async().await;
    fetch_mock.assert_async().await;
    assert!(papers.is_empty());

    let dir = tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let mut out = Vec::new();
    let outcome = export(&papers, Some(path.as_path()), &mut out).unwrap();

    assert_eq!(outcome, ExportOutcome::NothingToSave);
    assert_eq!(String::from_utf8(out).unwrap().trim(), NOTHING_TO_SAVE);
    assert!(!path.exists());
}

/// search_ids itself still reports the failure
#[tokio::test]
async fn test_search_ids_reports_status() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let source = source_for(&server);
    let result = source.search_ids(&SearchQuery::new("cancer")).await;

    assert!(matches!(result, Err(SourceError::Api(msg)) if msg.contains("503")));
}

/// A failed detail request aborts the fetch
#[tokio::test]
async fn test_detail_failure_aborts() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(esearch_body(&["12345678", "87654321"]))
        .create_async()
        .await;

    let first_mock = server
        .mock("GET", "/efetch.fcgi")
        .match_query(fetch_query("12345678"))
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let second_mock = server
        .mock("GET", "/efetch.fcgi")
        .match_query(fetch_query("87654321"))
        .expect(0)
        .create_async()
        .await;

    let source = source_for(&server);
    let result = source.search(&SearchQuery::new("cancer")).await;

    first_mock.assert_async().await;
    second_mock.assert_async().await;
    assert!(matches!(result, Err(SourceError::Api(_))));
}

/// Identifiers beyond max_results are not fetched
#[tokio::test]
async fn test_max_results_caps_fetches() {
    let mut server = Server::new_async().await;

    let search_mock = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::UrlEncoded("retmax".into(), "2".into()))
        .with_status(200)
        .with_body(esearch_body(&["1", "2", "3"]))
        .create_async()
        .await;

    let fetch_mock = server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(efetch_body(
            "",
            "Any Paper",
            ("2020", "1", "1"),
            &[TestAuthor {
                last: "Doe",
                fore: "John",
                affiliation: "Acme Biotech",
            }],
        ))
        .expect(2)
        .create_async()
        .await;

    let source = source_for(&server);
    let papers = source
        .search(&SearchQuery::new("cancer").max_results(2))
        .await
        .unwrap();

    search_mock.assert_async().await;
    fetch_mock.assert_async().await;

    // An empty PMID falls back to the requested id.
    let ids: Vec<&str> = papers.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

/// An id with no record in the response is skipped
#[tokio::test]
async fn test_missing_record_is_skipped() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(esearch_body(&["11111111", "22222222"]))
        .create_async()
        .await;

    server
        .mock("GET", "/efetch.fcgi")
        .match_query(fetch_query("11111111"))
        .with_status(200)
        .with_body("<?xml version=\"1.0\" ?><PubmedArticleSet></PubmedArticleSet>")
        .create_async()
        .await;

    server
        .mock("GET", "/efetch.fcgi")
        .match_query(fetch_query("22222222"))
        .with_status(200)
        .with_body(efetch_body(
            "22222222",
            "Present Paper",
            ("2023", "Jun", "30"),
            &[TestAuthor {
                last: "Smith",
                fore: "Jane",
                affiliation: "University of Test",
            }],
        ))
        .create_async()
        .await;

    let source = source_for(&server);
    let papers = source.search(&SearchQuery::new("cancer")).await.unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].id, "22222222");
    assert_eq!(papers[0].publication_date, "2023-06-30");
}

/// Printing to the console writes no file
#[tokio::test]
async fn test_console_export() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(esearch_body(&["12345678"]))
        .create_async()
        .await;

    server
        .mock("GET", "/efetch.fcgi")
        .match_query(fetch_query("12345678"))
        .with_status(200)
        .with_body(efetch_body(
            "12345678",
            "Console Paper",
            ("2025", "Apr", "08"),
            &[TestAuthor {
                last: "Doe",
                fore: "John",
                affiliation: "Some Biotech Company",
            }],
        ))
        .create_async()
        .await;

    let source = source_for(&server);
    let papers = source.search(&SearchQuery::new("cancer")).await.unwrap();

    let mut out = Vec::new();
    let outcome = export(&papers, None, &mut out).unwrap();

    assert_eq!(outcome, ExportOutcome::Printed { rows: 1 });
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Corresponding Author Email"));
    assert!(printed.contains("Some Biotech Company"));
}
