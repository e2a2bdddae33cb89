//! Paginated collection retrieval.

mod error;

pub use error::FetchError;

use crate::forge::{ForgeApi, ListResource, TransportError};
use serde::de::DeserializeOwned;
use tracing::{debug, info, info_span, Instrument};

/// Fetches every record of `resource`, walking pages from 1 until the source
/// returns an empty page.
///
/// Records keep the order the source returned them in. Nothing is cached;
/// every call goes back to the network.
///
/// # Errors
///
/// Returns [`FetchError`] with the records gathered so far if any page fails
/// to load or decode.
pub async fn fetch_all<T>(
    api: &dyn ForgeApi,
    resource: ListResource,
) -> Result<Vec<T>, FetchError<T>>
where
    T: DeserializeOwned + Send,
{
    let span = info_span!("fetch", resource = %resource);

    async {
        info!("Fetching collection");
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let items = match api.list_page(resource, page).await {
                Ok(items) => items,
                Err(source) => {
                    return Err(FetchError {
                        resource,
                        page,
                        partial: records,
                        source,
                    })
                }
            };

            if items.is_empty() {
                break;
            }

            debug!(page, count = items.len(), "Fetched page");
            for item in items {
                match serde_json::from_value(item) {
                    Ok(record) => records.push(record),
                    Err(source) => {
                        return Err(FetchError {
                            resource,
                            page,
                            partial: records,
                            source: TransportError::Decode { source },
                        })
                    }
                }
            }

            page += 1;
        }

        info!(count = records.len(), pages = page - 1, "Fetched collection");
        Ok(records)
    }
    .instrument(span)
    .await
}
