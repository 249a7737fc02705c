//! Source downloads
//!
//! This module provides:
//! - Plain-text and zip-member dictionary downloads into the data directory
//! - Tatoeba per-language sentence exports (bzip2 TSV)
//! - The Tatoeba link table (bzip2 tar holding `links.csv`)
//!
//! There is no retry or checksum logic; any failed request aborts the run.

use crate::config::{Config, HttpConfig};
use crate::corpus::{parse_links, parse_sentences};
use crate::error::{Error, Result};
use crate::sources::{SourceDefinition, UnihanSource};
use bzip2::read::MultiBzDecoder;
use indexmap::IndexMap;
use reqwest::Client;
use std::fs::{self, File};
use std::io::{self, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Name of the link table inside `links.tar.bz2`
const LINKS_MEMBER: &str = "links.csv";

/// Downloads sources into the data directory
pub struct Fetcher {
    client: Client,
    data_dir: PathBuf,
}

impl Fetcher {
    /// Create a new fetcher
    pub fn new(http: &HttpConfig, data_dir: &Path) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&http.user_agent)
            .timeout(Duration::from_secs(http.timeout_secs))
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.http, &config.data_dir)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download(format!("HTTP {}: {}", status, url)));
        }

        let body = response.bytes().await?;
        debug!(url, bytes = body.len(), "Downloaded");
        Ok(body.to_vec())
    }

    /// Download `url` and store `out_filename` in the data directory; zip
    /// payloads are unpacked, plain text is written as-is
    async fn download_file(&self, url: &str, out_filename: &str, plain: bool) -> Result<PathBuf> {
        fs::create_dir_all(&self.data_dir)?;
        let body = self.get_bytes(url).await?;
        let out_path = self.data_dir.join(out_filename);

        if plain {
            fs::write(&out_path, &body)?;
        } else {
            extract_zip_member(&body, out_filename, &out_path)?;
        }

        info!(path = %out_path.display(), "Saved {}", out_filename);
        Ok(out_path)
    }

    /// Download one dictionary
    pub async fn download_dictionary(&self, source: &SourceDefinition) -> Result<PathBuf> {
        self.download_file(&source.url, &source.out_filename, source.is_plain_text())
            .await
    }

    /// Download the Unihan XML export
    pub async fn download_unihan(&self, unihan: &UnihanSource) -> Result<PathBuf> {
        self.download_file(&unihan.url, &unihan.out_filename, false)
            .await
    }

    /// Download one language's sentences as id → text
    pub async fn download_sentences(
        &self,
        download_root: &str,
        lang: &str,
    ) -> Result<IndexMap<String, String>> {
        let url = tatoeba_url(
            download_root,
            &format!("per_language/{lang}/{lang}_sentences.tsv.bz2"),
        )?;
        let body = self.get_bytes(url.as_str()).await?;
        let sentences = parse_sentences(BufReader::new(MultiBzDecoder::new(Cursor::new(body))))?;
        info!(lang, sentences = sentences.len(), "Loaded Tatoeba sentences");
        Ok(sentences)
    }

    /// Download the link table as id → linked id
    pub async fn download_links(&self, download_root: &str) -> Result<IndexMap<String, String>> {
        let url = tatoeba_url(download_root, "links.tar.bz2")?;
        let body = self.get_bytes(url.as_str()).await?;
        let links = read_links_archive(&body)?;
        info!(links = links.len(), "Loaded Tatoeba links");
        Ok(links)
    }
}

/// Resolve `path` under the Tatoeba export root
pub fn tatoeba_url(download_root: &str, path: &str) -> Result<Url> {
    let root = if download_root.ends_with('/') {
        Url::parse(download_root)?
    } else {
        Url::parse(&format!("{}/", download_root))?
    };
    Ok(root.join(path)?)
}

/// Extract `member` from an in-memory zip archive to `out_path`
pub fn extract_zip_member(archive: &[u8], member: &str, out_path: &Path) -> Result<()> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut file = match zip.by_name(member) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(Error::ArchiveMemberNotFound(member.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(out_path)?;
    io::copy(&mut file, &mut out)?;
    Ok(())
}

/// Parse `links.csv` out of a bzip2-compressed tar archive
pub fn read_links_archive(archive: &[u8]) -> Result<IndexMap<String, String>> {
    let mut tar = tar::Archive::new(MultiBzDecoder::new(Cursor::new(archive)));
    for entry in tar.entries()? {
        let entry = entry?;
        let is_links = entry
            .path()?
            .file_name()
            .is_some_and(|name| name == LINKS_MEMBER);
        if is_links {
            return parse_links(BufReader::new(entry));
        }
    }
    Err(Error::ArchiveMemberNotFound(LINKS_MEMBER.to_string()))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::sources::{GlossLang, LineFormat};
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(tmp: &TempDir) -> Fetcher {
        let http = HttpConfig {
            timeout_secs: 5,
            ..HttpConfig::default()
        };
        Fetcher::new(&http, tmp.path()).expect("fetcher should build")
    }

    fn source(url: String, out_filename: &str) -> SourceDefinition {
        SourceDefinition {
            name: "Test".to_string(),
            url,
            out_filename: out_filename.to_string(),
            lang: GlossLang::German,
            format: LineFormat::Cedict,
            license_stop_marker: None,
        }
    }

    #[test]
    fn test_tatoeba_url() {
        assert_eq!(
            tatoeba_url("https://downloads.tatoeba.org/exports", "links.tar.bz2")
                .unwrap()
                .as_str(),
            "https://downloads.tatoeba.org/exports/links.tar.bz2"
        );
        assert_eq!(
            tatoeba_url(
                "https://downloads.tatoeba.org/exports/",
                "per_language/cmn/cmn_sentences.tsv.bz2"
            )
            .unwrap()
            .as_str(),
            "https://downloads.tatoeba.org/exports/per_language/cmn/cmn_sentences.tsv.bz2"
        );
    }

    #[tokio::test]
    async fn test_download_plain_text_dictionary() {
        let mock_server = MockServer::start().await;
        let body = "# HanDeDict\n你好 你好 [ni3 hao3] /Hallo/\n";

        Mock::given(method("GET"))
            .and(path("/handedict.u8"))
            .and(header("user-agent", "Mozilla/5.0 Gecko/20100101 Firefox/84.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let tmp = TempDir::new().unwrap();
        let src = source(format!("{}/handedict.u8", mock_server.uri()), "handedict.u8");
        let saved = fetcher(&tmp).download_dictionary(&src).await.unwrap();

        assert_eq!(saved, tmp.path().join("handedict.u8"));
        assert_eq!(fs::read_to_string(saved).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_zip_dictionary_extracts_member() {
        let mock_server = MockServer::start().await;
        let content = "個 个 [ge4] /individual/\n";

        Mock::given(method("GET"))
            .and(path("/cedict.zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(zip_bytes("cedict_ts.u8", content), "application/zip"),
            )
            .mount(&mock_server)
            .await;

        let tmp = TempDir::new().unwrap();
        let src = source(format!("{}/cedict.zip", mock_server.uri()), "cedict_ts.u8");
        let saved = fetcher(&tmp).download_dictionary(&src).await.unwrap();
        assert_eq!(fs::read_to_string(saved).unwrap(), content);

        let missing = source(format!("{}/cedict.zip", mock_server.uri()), "other.u8");
        assert!(matches!(
            fetcher(&tmp).download_dictionary(&missing).await,
            Err(Error::ArchiveMemberNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_http_error_aborts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let tmp = TempDir::new().unwrap();
        let src = source(format!("{}/gone.u8", mock_server.uri()), "gone.u8");
        let result = fetcher(&tmp).download_dictionary(&src).await;
        assert!(matches!(result, Err(Error::Download(_))));
        assert!(!tmp.path().join("gone.u8").exists());
    }

    #[tokio::test]
    async fn test_download_sentences_and_links() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/per_language/cmn/cmn_sentences.tsv.bz2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                bz2_bytes("10\tcmn\t你好。\n20\tcmn\t谢谢。\n".as_bytes()),
                "application/x-bzip2",
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/links.tar.bz2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                tar_bz2_bytes("links.csv", "1\t10\n2\t20\n"),
                "application/x-bzip2",
            ))
            .mount(&mock_server)
            .await;

        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(&tmp);
        let root = format!("{}/", mock_server.uri());

        let sentences = fetcher.download_sentences(&root, "cmn").await.unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences.get("20").map(String::as_str), Some("谢谢。"));

        let links = fetcher.download_links(&root).await.unwrap();
        assert_eq!(links.get("1").map(String::as_str), Some("10"));
    }

    #[tokio::test]
    async fn test_download_multi_stream_sentences() {
        let mock_server = MockServer::start().await;
        let mut body = bz2_bytes("10\tcmn\t你好。\n".as_bytes());
        body.extend(bz2_bytes("20\tcmn\t谢谢。\n".as_bytes()));

        Mock::given(method("GET"))
            .and(path("/per_language/cmn/cmn_sentences.tsv.bz2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-bzip2"))
            .mount(&mock_server)
            .await;

        let tmp = TempDir::new().unwrap();
        let root = format!("{}/", mock_server.uri());
        let sentences = fetcher(&tmp).download_sentences(&root, "cmn").await.unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences.get("20").map(String::as_str), Some("谢谢。"));
    }

    #[test]
    fn test_links_archive_split_across_streams() {
        let content = "1\t10\n2\t20\n";
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "links.csv", content.as_bytes())
            .unwrap();
        let tar = builder.into_inner().unwrap();

        // Header block in the first stream, contents in the second
        let mut archive = bz2_bytes(&tar[..512]);
        archive.extend(bz2_bytes(&tar[512..]));

        let links = read_links_archive(&archive).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links.get("2").map(String::as_str), Some("20"));
    }

    #[test]
    fn test_links_archive_without_member() {
        let archive = tar_bz2_bytes("other.csv", "1\t2\n");
        assert!(matches!(
            read_links_archive(&archive),
            Err(Error::ArchiveMemberNotFound(_))
        ));
    }
}
