//! Live record backend speaking the hosted REST dialect.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{FETCH_CAP, RecordSource, SourceError};
use crate::config::Settings;
use crate::state::Record;
use crate::util::percent_encode;

/// REST client for one entity table.
///
/// Thin request/response plumbing; the backend's storage semantics stay
/// opaque behind its `rest/v1` surface. One instance per module, built once
/// at startup.
pub struct RestSource<R> {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    _entity: PhantomData<fn() -> R>,
}

impl<R: Record> RestSource<R> {
    /// Build a client from settings.
    ///
    /// Output: A client bound to one table; trailing slashes on the base
    /// URL are tolerated.
    ///
    /// # Errors
    /// - Returns [`SourceError::ConfigurationMissing`] when the base URL or
    ///   key is absent or blank
    pub fn from_settings(settings: &Settings) -> Result<Self, SourceError> {
        let (Some(url), Some(key)) = (
            settings.backend_url.as_deref(),
            settings.backend_key.as_deref(),
        ) else {
            return Err(SourceError::ConfigurationMissing);
        };
        if url.trim().is_empty() || key.trim().is_empty() {
            return Err(SourceError::ConfigurationMissing);
        }
        Ok(RestSource {
            client: reqwest::Client::new(),
            base_url: url.trim().trim_end_matches('/').to_owned(),
            api_key: key.trim().to_owned(),
            _entity: PhantomData,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, R::TABLE)
    }

    fn fetch_url(&self) -> String {
        format!(
            "{}?select=*&order=created_at.desc&limit={FETCH_CAP}",
            self.table_url()
        )
    }

    /// Delete endpoint with the id filter percent-encoded into the query.
    fn delete_url(&self, ids: &[String]) -> String {
        format!("{}?id={}", self.table_url(), percent_encode(&in_filter(ids)))
    }
}

/// Render an `in.(...)` filter over ids, quoting each value so commas or
/// quotes inside an id cannot split the list.
fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[async_trait]
impl<R> RecordSource<R> for RestSource<R>
where
    R: Record + DeserializeOwned,
{
    /// What: Fetch the full table, newest first.
    ///
    /// Output:
    /// - Up to [`FETCH_CAP`] rows ordered by `created_at` descending, or
    ///   [`SourceError::FetchFailed`] carrying the transport, status, or
    ///   decode error text.
    async fn fetch(&self) -> Result<Vec<R>, SourceError> {
        let fetch_failed = |reason: String| SourceError::FetchFailed {
            table: R::TABLE,
            reason,
        };
        let response = self
            .client
            .get(self.fetch_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| fetch_failed(err.to_string()))?
            .error_for_status()
            .map_err(|err| fetch_failed(err.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|err| fetch_failed(err.to_string()))?;
        let mut records: Vec<R> =
            serde_json::from_str(&body).map_err(|err| fetch_failed(err.to_string()))?;
        // The query already carries the limit; this guards against a
        // backend that ignores it.
        records.truncate(FETCH_CAP);
        tracing::debug!(table = R::TABLE, rows = records.len(), "fetched records");
        Ok(records)
    }

    /// What: Delete every record whose id is in `ids` with one request.
    async fn delete(&self, ids: &[String]) -> Result<(), SourceError> {
        if ids.is_empty() {
            return Ok(());
        }
        let delete_failed = |reason: String| SourceError::DeleteFailed {
            table: R::TABLE,
            reason,
        };
        self.client
            .delete(self.delete_url(ids))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| delete_failed(err.to_string()))?
            .error_for_status()
            .map_err(|err| delete_failed(err.to_string()))?;
        tracing::debug!(table = R::TABLE, deleted = ids.len(), "deleted records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TeamMember;

    fn configured() -> RestSource<TeamMember> {
        let settings = Settings {
            backend_url: Some("https://crm.example.com".into()),
            backend_key: Some("key".into()),
            ..Settings::default()
        };
        RestSource::from_settings(&settings).expect("Credentials are present")
    }

    #[test]
    /// What: Construction fails cleanly without credentials
    ///
    /// - Input: Default, blank, and one-sided settings
    /// - Output: ConfigurationMissing in every case
    fn rejects_missing_credentials() {
        let cases = [
            Settings::default(),
            Settings {
                backend_url: Some("https://crm.example.com".into()),
                ..Settings::default()
            },
            Settings {
                backend_url: Some("  ".into()),
                backend_key: Some("key".into()),
                ..Settings::default()
            },
        ];
        for settings in cases {
            let source = RestSource::<TeamMember>::from_settings(&settings);
            assert!(matches!(source, Err(SourceError::ConfigurationMissing)));
        }
    }

    #[test]
    /// What: The table URL drops trailing slashes and appends the table
    ///
    /// - Input: Base URL with a trailing slash
    /// - Output: `…/rest/v1/team_members` without a doubled slash
    fn table_url_is_normalized() {
        let settings = Settings {
            backend_url: Some("https://crm.example.com/".into()),
            backend_key: Some("key".into()),
            ..Settings::default()
        };
        let source =
            RestSource::<TeamMember>::from_settings(&settings).expect("Credentials are present");
        assert_eq!(
            source.table_url(),
            "https://crm.example.com/rest/v1/team_members"
        );
    }

    #[test]
    /// What: The fetch URL carries the whole query string inline
    ///
    /// - Input: A configured team-member source
    /// - Output: Select-all, newest-first order, and the row cap in one URL
    fn fetch_url_spells_out_the_query() {
        assert_eq!(
            configured().fetch_url(),
            "https://crm.example.com/rest/v1/team_members?select=*&order=created_at.desc&limit=1000"
        );
    }

    #[test]
    /// What: The delete URL percent-encodes the id filter
    ///
    /// - Input: Two plain ids
    /// - Output: Parens, quotes, and the comma in the filter become `%XX`
    fn delete_url_encodes_the_filter() {
        assert_eq!(
            configured().delete_url(&["A1".into(), "B2".into()]),
            "https://crm.example.com/rest/v1/team_members?id=in.%28%22A1%22%2C%22B2%22%29"
        );
    }

    #[test]
    /// What: The id filter quotes values against delimiter injection
    ///
    /// - Input: Plain ids and an id containing a comma and a quote
    /// - Output: Every id double-quoted; embedded quotes escaped
    fn in_filter_quotes_ids() {
        let plain = in_filter(&["A1".into(), "B2".into()]);
        assert_eq!(plain, "in.(\"A1\",\"B2\")");
        let tricky = in_filter(&["a,b".into(), "c\"d".into()]);
        assert_eq!(tricky, "in.(\"a,b\",\"c\\\"d\")");
    }
}
