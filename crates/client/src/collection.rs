//! Generic namespaced resource collections.
//!
//! Responsibilities:
//! - Filtered, paginated listing of any resource kind ([`ResourceCollection::fetch_slice`]).
//! - Submitting a creation form and extracting the new identity
//!   ([`ResourceCollection::submit`]).
//!
//! Does NOT handle:
//! - Waiting on server-side state; [`crate::jobs::JobCollection`] layers that on top.
//!
//! Invariants:
//! - A fetched page reflects exactly one listing request; each fetch replaces
//!   the previous page, it never merges.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::SplunkClient;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::{Entry, SliceFilter};
use crate::namespace::Namespace;

/// A kind of REST resource that can be listed and created.
pub trait Resource: DeserializeOwned + Sized {
    /// Path below the namespace prefix, e.g. `search/jobs`.
    const PATH: &'static str;

    /// Sort key used by [`Resource::default_filter`].
    const DEFAULT_SORT_KEY: &'static str;

    /// Build a resource from one listing entry.
    ///
    /// The default takes the entry content as-is.
    fn from_entry(entry: Entry<Self>) -> Self {
        entry.content
    }

    /// Extract the identity of a freshly created resource.
    ///
    /// The default reads `entry[0].name`.
    fn identity_from_created(resp: &serde_json::Value) -> Result<String> {
        resp.get("entry")
            .and_then(|e| e.as_array())
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("name"))
            .and_then(|n| n.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!(
                    "Missing identity in {} creation response",
                    Self::PATH
                ))
            })
    }

    fn default_filter() -> SliceFilter {
        SliceFilter::with_sort_key(Self::DEFAULT_SORT_KEY)
    }
}

/// One page of `R` in a namespace.
#[derive(Debug)]
pub struct ResourceCollection<'c, R: Resource> {
    client: &'c SplunkClient,
    namespace: Namespace,
    items: Vec<R>,
}

impl<'c, R: Resource> ResourceCollection<'c, R> {
    pub(crate) fn new(client: &'c SplunkClient, namespace: Namespace) -> Self {
        Self {
            client,
            namespace,
            items: Vec::new(),
        }
    }

    pub fn client(&self) -> &'c SplunkClient {
        self.client
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The page from the most recent [`Self::fetch_slice`].
    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take ownership of the current page, leaving the collection empty.
    pub fn into_items(self) -> Vec<R> {
        self.items
    }

    /// Fetch one page matching `filter`, replacing the current contents.
    ///
    /// On error the previous page is left untouched.
    pub async fn fetch_slice(&mut self, filter: &SliceFilter) -> Result<&[R]> {
        let entries = endpoints::list_entities::<R>(
            &self.client.http,
            &self.client.base_url,
            self.client.auth_token(),
            &self.namespace,
            R::PATH,
            filter,
            self.client.max_retries,
            self.client.metrics(),
        )
        .await?;

        self.items = entries.into_iter().map(R::from_entry).collect();
        debug!(resource = R::PATH, fetched = self.items.len(), "Replaced collection page");
        Ok(&self.items)
    }

    /// POST an ordered creation form and return the new identity.
    ///
    /// The server must answer `201 Created`.
    pub async fn submit(&self, form: &[(String, String)]) -> Result<String> {
        let resp = endpoints::create_entity(
            &self.client.http,
            &self.client.base_url,
            self.client.auth_token(),
            &self.namespace,
            R::PATH,
            form,
            self.client.max_retries,
            self.client.metrics(),
        )
        .await?;

        R::identity_from_created(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct SavedThing {
        #[allow(dead_code)]
        title: String,
    }

    impl Resource for SavedThing {
        const PATH: &'static str = "saved/things";
        const DEFAULT_SORT_KEY: &'static str = "name";
    }

    #[test]
    fn test_default_filter_uses_resource_sort_key() {
        let filter = SavedThing::default_filter();
        assert_eq!(filter.sort_key, "name");
        assert_eq!(filter.count, 30);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn test_identity_from_created_reads_entry_name() {
        let resp = json!({ "entry": [ { "name": "nightly", "content": { "title": "nightly" } } ] });
        assert_eq!(SavedThing::identity_from_created(&resp).unwrap(), "nightly");
        assert!(matches!(
            SavedThing::identity_from_created(&json!({})),
            Err(ClientError::InvalidResponse(_))
        ));
    }
}
