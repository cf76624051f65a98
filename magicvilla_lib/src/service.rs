//! Typed villa calls built on the generic dispatcher.

use magicvilla_api::{ApiRequest, Client, Error};

use crate::types::{
    ApiResponse, PatchOperation, VillaCreateDto, VillaDto, VillaID, VillaUpdateDto,
};

const VILLA_PATH: &str = "/api/villa";

/// Calls the `/api/villa` resource, attaching the configured token.
///
/// Each call returns its own envelope; the service holds no per-call state
/// and can be shared across tasks.
#[derive(Clone)]
pub struct VillaService {
    client: Client,
    token: Option<String>,
}

impl VillaService {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Creates a service for the API at `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Ok(Self::new(Client::new(base_url)?))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn authorize(&self, request: ApiRequest) -> ApiRequest {
        match &self.token {
            Some(token) => request.with_token(token.clone()),
            None => request,
        }
    }

    pub async fn get_all(&self) -> Result<ApiResponse<Vec<VillaDto>>, Error> {
        let request = self.authorize(ApiRequest::get(VILLA_PATH));
        self.client.send(&request).await
    }

    pub async fn get(&self, id: VillaID) -> Result<ApiResponse<VillaDto>, Error> {
        let request = self.authorize(ApiRequest::get(villa_url(id)));
        self.client.send(&request).await
    }

    pub async fn create(&self, dto: &VillaCreateDto) -> Result<ApiResponse<VillaDto>, Error> {
        let request = ApiRequest::post(VILLA_PATH)
            .with_data(dto)
            .map_err(Error::Serialization)?;
        self.client.send(&self.authorize(request)).await
    }

    pub async fn update(&self, dto: &VillaUpdateDto) -> Result<ApiResponse, Error> {
        let request = ApiRequest::put(villa_url(dto.id))
            .with_data(dto)
            .map_err(Error::Serialization)?;
        self.client.send(&self.authorize(request)).await
    }

    pub async fn patch(&self, id: VillaID, ops: &[PatchOperation]) -> Result<ApiResponse, Error> {
        let request = ApiRequest::patch(villa_url(id))
            .with_data(ops)
            .map_err(Error::Serialization)?;
        self.client.send(&self.authorize(request)).await
    }

    pub async fn delete(&self, id: VillaID) -> Result<ApiResponse, Error> {
        let request = self.authorize(ApiRequest::delete(villa_url(id)));
        self.client.send(&request).await
    }
}

fn villa_url(id: VillaID) -> String {
    format!("{}/{}", VILLA_PATH, id)
}
