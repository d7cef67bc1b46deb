//! Client registry operations.

// self
use crate::{
	_prelude::*,
	record::Client,
	service::AdminService,
	store::{self, StoreError},
};

/// Sparse update for a client registration; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateClientPatch {
	/// Id of the client to update.
	pub id: String,
	/// Replacement redirect URIs.
	pub redirect_uris: Option<Vec<String>>,
	/// Replacement trusted peer ids.
	pub trusted_peers: Option<Vec<String>>,
	/// Replacement display name.
	pub name: Option<String>,
	/// Replacement logo URL.
	pub logo_url: Option<String>,
}

/// Response returned by [`AdminService::create_client`], echoing any generated credentials.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClientResponse {
	/// Stored client, including the generated id and secret when the caller left them empty.
	pub client: Client,
}

impl AdminService {
	/// Registers a client, generating an id and secret when the caller leaves them empty.
	///
	/// Id collisions are detected by the storage engine at write time; there is no advance
	/// existence check that could race a concurrent create.
	pub async fn create_client(&self, mut client: Client) -> Result<CreateClientResponse> {
		if client.id.is_empty() {
			client.id = store::new_id();
		}
		if client.secret.is_empty() {
			// Two concatenated tokens, for extra length on the secret.
			client.secret = format!("{}{}", store::new_id(), store::new_id());
		}

		match self.store.create_client(client.clone()).await {
			Ok(()) => Ok(CreateClientResponse { client }),
			Err(StoreError::AlreadyExists) => Err(Error::already_exists("Client already exists.")),
			Err(err) => {
				tracing::error!(error = %err, "Failed to create client.");

				Err(Error::internal("Create client failed.", err))
			},
		}
	}

	/// Applies a sparse update to an existing client; fields absent from the patch are left
	/// untouched, so an all-`None` patch is a no-op write.
	pub async fn update_client(&self, patch: UpdateClientPatch) -> Result<()> {
		if patch.id.is_empty() {
			return Err(Error::invalid_argument("No client id supplied."));
		}

		let updater = |mut client: Client| {
			if let Some(redirect_uris) = patch.redirect_uris.clone() {
				client.redirect_uris = redirect_uris;
			}
			if let Some(trusted_peers) = patch.trusted_peers.clone() {
				client.trusted_peers = trusted_peers;
			}
			if let Some(name) = patch.name.clone() {
				client.name = name;
			}
			if let Some(logo_url) = patch.logo_url.clone() {
				client.logo_url = logo_url;
			}

			Ok(client)
		};

		match self.store.update_client(&patch.id, &updater).await {
			Ok(()) => Ok(()),
			Err(StoreError::NotFound) => Err(Error::not_found("Client not found, cannot update.")),
			Err(err) => {
				tracing::error!(error = %err, "Failed to update client.");

				Err(Error::internal("Update client failed.", err))
			},
		}
	}

	/// Deletes the client registered under `id`.
	pub async fn delete_client(&self, id: &str) -> Result<()> {
		if id.is_empty() {
			return Err(Error::invalid_argument("No client id supplied."));
		}

		match self.store.delete_client(id).await {
			Ok(()) => Ok(()),
			Err(StoreError::NotFound) => Err(Error::not_found("Client not found, cannot delete.")),
			Err(err) => {
				tracing::error!(error = %err, "Failed to delete client.");

				Err(Error::internal("Delete client failed.", err))
			},
		}
	}

	/// Lists all client registrations, secrets included; ordering follows the storage engine.
	pub async fn list_clients(&self) -> Result<Vec<Client>> {
		self.store.list_clients().await.map_err(|err| {
			tracing::error!(error = %err, "Failed to list clients.");

			Error::internal("List clients failed.", err)
		})
	}
}
