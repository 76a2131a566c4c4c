use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    api::{ApiError, RequestOptions, Transport},
    validation::FieldErrors,
};

/// Binds a remote collection to its wire and domain types.
pub trait Resource: Send + Sync + 'static {
    /// Collection path under the API base URL, e.g. `"Sensor"`.
    const PATH: &'static str;
    /// Used in log lines.
    const NAME: &'static str;

    /// Shape the API returns.
    type Wire: DeserializeOwned + Send;
    /// Domain type handed to callers.
    type Item: Send;
    /// Unvalidated input for create/update.
    type Draft: Sync;
    /// Body sent on create/update.
    type Payload: Serialize + Send;

    /// Validate the draft and map it to the wire body.
    fn prepare(draft: &Self::Draft) -> Result<Self::Payload, FieldErrors>;

    /// Coerce a wire value into the domain type.
    fn into_item(wire: Self::Wire) -> Result<Self::Item, ApiError>;
}

/// CRUD facade over one [`Resource`].
///
/// Built once with a shared transport and handed to whoever needs it.
pub struct ResourceService<R, T> {
    transport: Arc<T>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, T> Clone for ResourceService<R, T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource, T: Transport> ResourceService<R, T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub async fn list(&self) -> Result<Vec<R::Item>, ApiError> {
        self.fetch_many(R::PATH, RequestOptions::new())
            .await
            .inspect_err(|e| error!(resource = R::NAME, error = %e, "Failed to list"))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<R::Item, ApiError> {
        self.fetch_one(&item_path(R::PATH, id))
            .await
            .inspect_err(|e| error!(resource = R::NAME, id, error = %e, "Failed to fetch"))
    }

    /// Validates locally first; an invalid draft never reaches the transport.
    pub async fn create(&self, draft: &R::Draft) -> Result<R::Item, ApiError> {
        self.send_create(draft)
            .await
            .inspect_err(|e| error!(resource = R::NAME, error = %e, "Failed to create"))
    }

    /// Full replace. The response body, if any, is ignored.
    pub async fn update(&self, id: i64, draft: &R::Draft) -> Result<(), ApiError> {
        self.send_update(id, draft)
            .await
            .inspect_err(|e| error!(resource = R::NAME, id, error = %e, "Failed to update"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.transport
            .delete(&item_path(R::PATH, id))
            .await
            .map(|_| ())
            .inspect_err(|e| error!(resource = R::NAME, id, error = %e, "Failed to delete"))
    }

    async fn fetch_one(&self, path: &str) -> Result<R::Item, ApiError> {
        let value = self.transport.get(path).await?;
        R::into_item(decode(path, value)?)
    }

    async fn send_create(&self, draft: &R::Draft) -> Result<R::Item, ApiError> {
        let body = self.prepare_body(draft)?;
        let value = self.transport.post(R::PATH, body).await?;
        R::into_item(decode(R::PATH, value)?)
    }

    async fn send_update(&self, id: i64, draft: &R::Draft) -> Result<(), ApiError> {
        let body = self.prepare_body(draft)?;
        self.transport.put(&item_path(R::PATH, id), body).await?;
        Ok(())
    }

    /// GET `path` and decode a JSON array of items.
    pub(crate) async fn fetch_many(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Vec<R::Item>, ApiError> {
        let value = self.transport.get_with(path, options).await?;
        let wires: Vec<R::Wire> = decode(path, value)?;
        debug!(resource = R::NAME, count = wires.len(), "Fetched items");
        wires.into_iter().map(R::into_item).collect()
    }

    fn prepare_body(&self, draft: &R::Draft) -> Result<Value, ApiError> {
        let payload = R::prepare(draft).map_err(ApiError::ValidationFailed)?;
        serde_json::to_value(payload).map_err(|source| ApiError::Encode {
            endpoint: R::PATH.to_owned(),
            source,
        })
    }
}

pub(crate) fn item_path(collection: &str, id: i64) -> String {
    format!("{collection}/{id}")
}

fn decode<W: DeserializeOwned>(endpoint: &str, value: Value) -> Result<W, ApiError> {
    serde_json::from_value(value).map_err(|source| ApiError::MalformedResponse {
        endpoint: endpoint.to_owned(),
        source,
    })
}
